//! Record Source Trait - Abstract interface for catalog data sources

use crate::core::models::RawRecord;
use crate::error::Result;

/// Record source
///
/// Implementations:
/// - CsvConnector: delimited text from a string or a file
pub trait RecordSource: Send + Sync {
    /// Fetch every raw record. Called once per process by the catalog cache.
    fn fetch(&mut self) -> Result<Vec<RawRecord>>;

    /// Get source ID (unique identifier)
    fn source_id(&self) -> &str;

    /// Get source type (e.g., "csv")
    fn source_type(&self) -> &str;

    /// Get source URI/path (if applicable)
    fn source_uri(&self) -> Option<&str> {
        None
    }
}
