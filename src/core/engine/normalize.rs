//! Catalog Normalization Layer
//!
//! Turns raw, loosely formatted records into canonical records with derived
//! columns. Normalization never fails because of a bad value: a field that
//! cannot be parsed degrades to `None` and the row is always kept.

use crate::core::models::{
    CanonicalRecord, CanonicalTable, ContentType, DurationUnit, RawRecord, YearMonth,
};
use crate::error::{CatalogError, Result};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::{debug, info};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Per-field degradation counters, reported after a normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationStats {
    pub records: usize,
    pub unparsed_dates: usize,
    pub unknown_types: usize,
    pub unparsed_release_years: usize,
    pub unparsed_durations: usize,
}

/// Catalog normalizer
///
/// Holds the compiled patterns; `normalize_record` is a pure function of its
/// input, so running it twice on the same raw data gives identical output.
pub struct Normalizer {
    date_pattern: Regex,
    digits_pattern: Regex,
    unit_pattern: Regex,
}

impl Normalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            // "Month-name day, year", nothing before or after; inner spacing may vary
            date_pattern: compile(r"^([A-Za-z]+)\s*(\d{1,2}),\s*(\d{4})$")?,
            digits_pattern: compile(r"[0-9]+")?,
            // Longest token first so "Seasons" is not read as "Season".
            // The token must not touch other letters: "90min" has a unit, "45 minutes" does not.
            unit_pattern: compile(r"(?:^|[^A-Za-z])(min|Seasons|Season)(?:$|[^A-Za-z])")?,
        })
    }

    /// Normalize a whole batch of raw records into the canonical table.
    pub fn normalize(&self, raw_records: &[RawRecord]) -> CanonicalTable {
        let (table, stats) = self.normalize_with_stats(raw_records);
        info!(
            "📦 Normalized {} records ({} unparsed dates, {} unknown types, \
             {} unparsed release years, {} unparsed durations)",
            stats.records,
            stats.unparsed_dates,
            stats.unknown_types,
            stats.unparsed_release_years,
            stats.unparsed_durations
        );
        table
    }

    /// Same as [`Normalizer::normalize`], also returning degradation counters.
    pub fn normalize_with_stats(
        &self,
        raw_records: &[RawRecord],
    ) -> (CanonicalTable, NormalizationStats) {
        let mut stats = NormalizationStats::default();
        let mut records = Vec::with_capacity(raw_records.len());

        for raw in raw_records {
            let record = self.normalize_record(raw);

            stats.records += 1;
            if present(&raw.date_added) && record.date_added.is_none() {
                stats.unparsed_dates += 1;
            }
            if present(&raw.content_type) && record.content_type.is_none() {
                stats.unknown_types += 1;
            }
            if present(&raw.release_year) && record.release_year.is_none() {
                stats.unparsed_release_years += 1;
            }
            if present(&raw.duration) && record.duration_num.is_none() {
                stats.unparsed_durations += 1;
            }

            records.push(record);
        }

        debug!("Normalization stats: {:?}", stats);
        (CanonicalTable::new(records), stats)
    }

    /// Normalize a single raw record.
    pub fn normalize_record(&self, raw: &RawRecord) -> CanonicalRecord {
        let date_added = raw
            .date_added
            .as_deref()
            .and_then(|text| self.parse_date_added(text));
        let (duration_num, duration_type) = raw
            .duration
            .as_deref()
            .map(|text| self.parse_duration(text))
            .unwrap_or((None, None));

        CanonicalRecord {
            content_type: raw.content_type.as_deref().and_then(ContentType::parse),
            title: non_empty(raw.title.as_deref()),
            director: non_empty(raw.director.as_deref()),
            cast: non_empty(raw.cast.as_deref()),
            description: non_empty(raw.description.as_deref()),
            rating: non_empty(raw.rating.as_deref()),
            release_year: raw.release_year.as_deref().and_then(parse_release_year),
            country: non_empty(raw.country.as_deref()),
            listed_in: non_empty(raw.listed_in.as_deref()),
            duration: non_empty(raw.duration.as_deref()),
            date_added,
            year_added: date_added.map(|d| d.year()),
            month_added: date_added.map(|d| d.format("%B").to_string()),
            month_year_added: date_added.map(YearMonth::from_date),
            primary_country: primary_entry(raw.country.as_deref()),
            primary_genre: primary_entry(raw.listed_in.as_deref()),
            duration_num,
            duration_type,
        }
    }

    /// Parse "September 9, 2019" style dates after trimming.
    ///
    /// Returns `None` for anything else, including impossible calendar dates.
    pub fn parse_date_added(&self, text: &str) -> Option<NaiveDate> {
        let caps = self.date_pattern.captures(text.trim())?;
        let month = month_from_name(caps.get(1)?.as_str())?;
        let day: u32 = caps.get(2)?.as_str().parse().ok()?;
        let year: i32 = caps.get(3)?.as_str().parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Split "90 min" / "2 Seasons" into the leading number and its unit.
    ///
    /// A digit run too large for `u32` saturates instead of being dropped.
    pub fn parse_duration(&self, text: &str) -> (Option<u32>, Option<DurationUnit>) {
        let number = self
            .digits_pattern
            .find(text)
            .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX));
        let unit = self
            .unit_pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| DurationUnit::from_token(m.as_str()));
        (number, unit)
    }
}

/// Normalize raw records with a fresh [`Normalizer`].
pub fn normalize(raw_records: &[RawRecord]) -> Result<CanonicalTable> {
    Ok(Normalizer::new()?.normalize(raw_records))
}

/// First comma-separated entry, trimmed. `None` when the list is missing or
/// its first entry is blank. Only the first entry is kept.
pub fn primary_entry(list: Option<&str>) -> Option<String> {
    let first = list?.split(',').next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

/// Copy a text value, treating empty or whitespace-only text as missing.
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.to_string())
}

pub fn parse_release_year(text: &str) -> Option<i32> {
    let trimmed = text.trim();
    trimmed.parse::<i32>().ok().or_else(|| {
        // Float-formatted years such as "2019.0"
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0 && v.abs() < i32::MAX as f64)
            .map(|v| v as i32)
    })
}

fn month_from_name(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|idx| idx as u32 + 1)
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| CatalogError::Ingestion(format!("Failed to create regex {}: {}", pattern, e)))
}
