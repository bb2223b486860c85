//! Catalog explorer: normalizes a title catalog once, then answers filter,
//! search and aggregate queries against the immutable canonical table.

pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod observability;
pub mod report;

pub use crate::core::engine::{
    filter, normalize, FilterCriteria, FilterOptions, FilteredView, Normalizer, QueryEngine,
    SearchCriteria, SortKey, SortOrder, TemporalKey,
};
pub use crate::core::models::{
    CanonicalRecord, CanonicalTable, ContentType, DurationUnit, RawRecord, YearMonth,
};
pub use config::ExplorerConfig;
pub use error::{CatalogError, Result};
