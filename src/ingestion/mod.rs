//! Ingestion Module
//!
//! Loads raw catalog records from a record source. Ingestion only reads and
//! maps columns; all value cleanup belongs to the normalizer.

pub mod connector;
pub mod csv_connector;

pub use connector::RecordSource;
pub use csv_connector::CsvConnector;
