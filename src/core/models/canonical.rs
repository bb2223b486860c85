//! Canonical Catalog Schema
//!
//! Defines the normalized, typed representation of a catalog entry and the
//! read-only table that every query runs against.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContentType {
    Movie,
    TvShow,
}

impl ContentType {
    /// Parse the dataset's spelling ("Movie", "TV Show").
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Movie" => Some(ContentType::Movie),
            "TV Show" | "TVShow" => Some(ContentType::TvShow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "Movie",
            ContentType::TvShow => "TV Show",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    /// Lenient parsing for user input ("movie", "tv", "tv-show", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "movie" | "movies" => Ok(ContentType::Movie),
            "tv" | "tvshow" | "tvshows" | "show" | "series" => Ok(ContentType::TvShow),
            _ => Err(format!("unknown content type '{}' (expected Movie or TV Show)", s)),
        }
    }
}

/// Unit token of a duration string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationUnit {
    Minutes,
    Season,
    Seasons,
}

impl DurationUnit {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "min" => Some(DurationUnit::Minutes),
            "Season" => Some(DurationUnit::Season),
            "Seasons" => Some(DurationUnit::Seasons),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Minutes => "min",
            DurationUnit::Season => "Season",
            DurationUnit::Seasons => "Seasons",
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A calendar month, the month-granularity truncation of a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Canonical representation of a catalog entry
///
/// Every derived field is a pure function of the raw field it comes from.
/// A field that failed to parse is `None`; the record itself always exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// `None` when the raw type is missing or unrecognized
    pub content_type: Option<ContentType>,
    pub title: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub description: Option<String>,
    pub rating: Option<String>,
    pub release_year: Option<i32>,

    /// Raw country list, kept for display and for the country filter
    pub country: Option<String>,

    /// Raw genre list, kept for display
    pub listed_in: Option<String>,

    /// Raw duration text, e.g. "2 Seasons"
    pub duration: Option<String>,

    pub date_added: Option<NaiveDate>,
    pub year_added: Option<i32>,
    pub month_added: Option<String>,
    pub month_year_added: Option<YearMonth>,

    pub primary_country: Option<String>,
    pub primary_genre: Option<String>,

    pub duration_num: Option<u32>,
    pub duration_type: Option<DurationUnit>,
}

impl CanonicalRecord {
    pub fn is_type(&self, content_type: ContentType) -> bool {
        self.content_type == Some(content_type)
    }

    /// Every trimmed, non-empty entry of the raw country list.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.country
            .as_deref()
            .into_iter()
            .flat_map(|list| list.split(','))
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
    }
}

/// The normalized catalog
///
/// Built once by the normalizer and never mutated afterwards. Queries borrow
/// it and produce views; there is no way to get a mutable reference to the
/// records once the table exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalTable {
    records: Vec<CanonicalRecord>,
}

impl CanonicalTable {
    pub fn new(records: Vec<CanonicalRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalRecord> {
        self.records.iter()
    }

    pub fn get(&self, index: usize) -> Option<&CanonicalRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
