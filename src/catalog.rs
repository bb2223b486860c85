//! Catalog Cache
//!
//! The canonical table is built once per process and shared read-only by
//! every query. `CatalogCache` owns that construction-once contract; the
//! process-wide instance lives behind `global()`.

use crate::core::engine::normalize::Normalizer;
use crate::core::models::CanonicalTable;
use crate::error::Result;
use crate::ingestion::RecordSource;
use lazy_static::lazy_static;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

lazy_static! {
    static ref GLOBAL_CATALOG: CatalogCache = CatalogCache::new();
}

/// The process-wide catalog cache.
pub fn global() -> &'static CatalogCache {
    &GLOBAL_CATALOG
}

/// Holds the canonical table once it has been built
///
/// Only ever hands out `Arc<CanonicalTable>`, never `&mut`.
#[derive(Debug, Default)]
pub struct CatalogCache {
    table: OnceCell<Arc<CanonicalTable>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table, loading it from `source` on first access.
    ///
    /// Later calls return the same `Arc` and never touch `source`. If the
    /// load fails the cache stays empty and the error is returned.
    pub fn get_or_load<S: RecordSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<Arc<CanonicalTable>> {
        self.table
            .get_or_try_init(|| load_table(source))
            .map(Arc::clone)
    }

    /// The cached table, if it has been built.
    pub fn get(&self) -> Option<Arc<CanonicalTable>> {
        self.table.get().cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }
}

/// Ingest and normalize without caching.
pub fn load_table<S: RecordSource + ?Sized>(source: &mut S) -> Result<Arc<CanonicalTable>> {
    let started = Instant::now();
    let raw = source.fetch()?;
    let table = Normalizer::new()?.normalize(&raw);

    info!(
        "✅ Catalog '{}' ({} at {}) ready: {} records in {} ms",
        source.source_id(),
        source.source_type(),
        source.source_uri().unwrap_or("memory"),
        table.len(),
        started.elapsed().as_millis()
    );
    Ok(Arc::new(table))
}
