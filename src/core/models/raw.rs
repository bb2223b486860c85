//! Raw Catalog Record
//!
//! One row exactly as it came out of the record source. Every field is free
//! text and may be missing; nothing here is validated.

use serde::{Deserialize, Serialize};

/// Columns every record source must provide.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "type",
    "title",
    "director",
    "cast",
    "country",
    "date_added",
    "release_year",
    "rating",
    "duration",
    "listed_in",
    "description",
];

/// Raw record as ingested
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub title: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,

    /// Comma-separated country list, e.g. "United States, France"
    pub country: Option<String>,

    /// Free-text date, e.g. "September 9, 2019" (often with stray spaces)
    pub date_added: Option<String>,

    pub release_year: Option<String>,
    pub rating: Option<String>,

    /// Value and unit, e.g. "90 min" or "2 Seasons"
    pub duration: Option<String>,

    /// Comma-separated genre list
    pub listed_in: Option<String>,

    pub description: Option<String>,
}

impl RawRecord {
    /// Set a field by its schema column name. Unknown columns are ignored.
    pub fn set_field(&mut self, column: &str, value: Option<String>) {
        let slot = match column {
            "type" => &mut self.content_type,
            "title" => &mut self.title,
            "director" => &mut self.director,
            "cast" => &mut self.cast,
            "country" => &mut self.country,
            "date_added" => &mut self.date_added,
            "release_year" => &mut self.release_year,
            "rating" => &mut self.rating,
            "duration" => &mut self.duration,
            "listed_in" => &mut self.listed_in,
            "description" => &mut self.description,
            _ => return,
        };
        *slot = value;
    }
}
