//! Core Engine Module
//!
//! Contains the normalizer, the query engine and the aggregates computed
//! from its views.

pub mod normalize;
pub mod query;
pub mod options;
pub mod aggregate;

pub use normalize::{normalize, NormalizationStats, Normalizer};
pub use query::{
    filter, FilterCriteria, FilteredView, QueryEngine, SearchCriteria, SortKey, SortOrder, SortSpec,
    YearRange,
};
pub use options::FilterOptions;
pub use aggregate::{FrequencyEntry, FrequencyTable, Summary, TemporalKey};
