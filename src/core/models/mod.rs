pub mod canonical;
pub mod raw;

pub use canonical::{CanonicalRecord, CanonicalTable, ContentType, DurationUnit, YearMonth};
pub use raw::{RawRecord, REQUIRED_COLUMNS};
