//! Dashboard Aggregates
//!
//! Counts, frequency tables and series computed from a filtered view. These
//! are the shapes handed to the rendering layer; every function accepts an
//! empty view and returns an empty result rather than failing.

use crate::core::engine::query::FilteredView;
use crate::core::models::{CanonicalRecord, ContentType};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Headline metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub movies: usize,
    pub tv_shows: usize,

    /// `None` when no record in the view has a release year
    pub latest_release_year: Option<i32>,
}

pub fn summary(view: &FilteredView<'_>) -> Summary {
    Summary {
        total: view.len(),
        movies: view.iter().filter(|r| r.is_type(ContentType::Movie)).count(),
        tv_shows: view.iter().filter(|r| r.is_type(ContentType::TvShow)).count(),
        latest_release_year: view.iter().filter_map(|r| r.release_year).max(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub label: String,
    pub count: usize,
}

/// Value counts, most frequent first
///
/// Equal counts keep the order in which the values first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut entries: Vec<FrequencyEntry> = Vec::new();

        for value in values {
            match index.get(value) {
                Some(&pos) => entries[pos].count += 1,
                None => {
                    index.insert(value, entries.len());
                    entries.push(FrequencyEntry {
                        label: value.to_string(),
                        count: 1,
                    });
                }
            }
        }

        entries.sort_by(|a, b| b.count.cmp(&a.count));
        Self { entries }
    }

    /// The `n` most frequent values.
    pub fn top(&self, n: usize) -> Self {
        Self {
            entries: self.entries.iter().take(n).cloned().collect(),
        }
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.entries.iter().find(|e| e.label == label).map(|e| e.count)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn type_counts(view: &FilteredView<'_>) -> FrequencyTable {
    FrequencyTable::from_values(view.iter().filter_map(|r| r.content_type).map(|t| t.as_str()))
}

pub fn genre_counts(view: &FilteredView<'_>) -> FrequencyTable {
    FrequencyTable::from_values(view.iter().filter_map(|r| r.primary_genre.as_deref()))
}

pub fn rating_counts(view: &FilteredView<'_>) -> FrequencyTable {
    FrequencyTable::from_values(view.iter().filter_map(|r| r.rating.as_deref()))
}

/// Count per primary country. Titles listed under several countries count
/// only toward the first one.
pub fn country_counts(view: &FilteredView<'_>) -> FrequencyTable {
    FrequencyTable::from_values(view.iter().filter_map(|r| r.primary_country.as_deref()))
}

/// Raw duration text of TV shows ("1 Season", "2 Seasons", ...)
pub fn season_counts(view: &FilteredView<'_>) -> FrequencyTable {
    FrequencyTable::from_values(
        view.iter()
            .filter(|r| r.is_type(ContentType::TvShow))
            .filter_map(|r| r.duration.as_deref()),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryTypeCount {
    pub country: String,
    pub content_type: ContentType,
    pub count: usize,
}

/// Per-type counts for the `top_n` most frequent primary countries, in
/// country rank order.
pub fn country_type_breakdown(view: &FilteredView<'_>, top_n: usize) -> Vec<CountryTypeCount> {
    let top = country_counts(view).top(top_n);

    let mut counts: HashMap<(&str, ContentType), usize> = HashMap::new();
    for record in view.iter() {
        if let (Some(country), Some(content_type)) =
            (record.primary_country.as_deref(), record.content_type)
        {
            *counts.entry((country, content_type)).or_insert(0) += 1;
        }
    }

    top.entries
        .iter()
        .flat_map(|entry| {
            [ContentType::Movie, ContentType::TvShow]
                .into_iter()
                .filter_map(|content_type| {
                    counts
                        .get(&(entry.label.as_str(), content_type))
                        .map(|&count| CountryTypeCount {
                            country: entry.label.clone(),
                            content_type,
                            count,
                        })
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Titles added per year, oldest first.
pub fn yearly_additions(view: &FilteredView<'_>) -> Vec<YearCount> {
    view.iter()
        .filter_map(|r| r.year_added)
        .counts()
        .into_iter()
        .sorted()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Temporal grouping for the timeline chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemporalKey {
    #[default]
    ReleaseYear,
    YearAdded,
}

impl TemporalKey {
    fn value(&self, record: &CanonicalRecord) -> Option<i32> {
        match self {
            TemporalKey::ReleaseYear => record.release_year,
            TemporalKey::YearAdded => record.year_added,
        }
    }
}

impl fmt::Display for TemporalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemporalKey::ReleaseYear => f.write_str("release_year"),
            TemporalKey::YearAdded => f.write_str("year_added"),
        }
    }
}

impl FromStr for TemporalKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "release_year" | "release" => Ok(TemporalKey::ReleaseYear),
            "year_added" | "added" => Ok(TemporalKey::YearAdded),
            other => Err(format!(
                "unknown timeline key '{}' (expected release_year or year_added)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub year: i32,
    pub content_type: ContentType,
    pub count: usize,
}

/// Count per (year, type). Records missing the year or the type are left out.
pub fn timeline(view: &FilteredView<'_>, key: TemporalKey) -> Vec<TimelinePoint> {
    let mut groups: BTreeMap<(i32, ContentType), usize> = BTreeMap::new();
    for record in view.iter() {
        if let (Some(year), Some(content_type)) = (key.value(record), record.content_type) {
            *groups.entry((year, content_type)).or_insert(0) += 1;
        }
    }

    groups
        .into_iter()
        .map(|((year, content_type), count)| TimelinePoint {
            year,
            content_type,
            count,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width histogram of movie durations (minutes).
///
/// The last bin includes its upper edge.
pub fn duration_histogram(view: &FilteredView<'_>, bins: usize) -> Vec<HistogramBin> {
    let durations: Vec<f64> = view
        .iter()
        .filter(|r| r.is_type(ContentType::Movie))
        .filter_map(|r| r.duration_num)
        .map(f64::from)
        .collect();

    let bounds = durations
        .iter()
        .copied()
        .minmax_by(|a, b| a.total_cmp(b))
        .into_option();
    let (min, max) = match bounds {
        Some(bounds) => bounds,
        None => return Vec::new(),
    };
    if bins == 0 {
        return Vec::new();
    }

    let span = if max > min { max - min } else { 1.0 };
    let width = span / bins as f64;

    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for value in durations {
        let idx = (((value - min) / width) as usize).min(bins - 1);
        result[idx].count += 1;
    }

    result
}
