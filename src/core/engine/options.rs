//! Filter Options
//!
//! Values offered by the filter widgets, derived once from the full table.

use crate::core::engine::query::YearRange;
use crate::core::models::{CanonicalTable, ContentType};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// In order of first appearance
    pub types: Vec<ContentType>,

    /// Min and max release year present in the table; the default range
    pub release_years: Option<YearRange>,

    pub ratings: Vec<String>,

    /// Primary countries, sorted and truncated to the configured limit
    pub countries: Vec<String>,

    pub genres: Vec<String>,
}

impl FilterOptions {
    pub fn from_table(table: &CanonicalTable, country_limit: usize) -> Self {
        let types = table.iter().filter_map(|r| r.content_type).unique().collect();

        let release_years = table
            .iter()
            .filter_map(|r| r.release_year)
            .minmax()
            .into_option()
            .map(|(start, end)| YearRange::new(start, end));

        let ratings = sorted_distinct(table.iter().filter_map(|r| r.rating.as_deref()));
        let countries = sorted_distinct(table.iter().filter_map(|r| r.primary_country.as_deref()))
            .into_iter()
            .take(country_limit)
            .collect();
        let genres = sorted_distinct(table.iter().filter_map(|r| r.primary_genre.as_deref()));

        Self {
            types,
            release_years,
            ratings,
            countries,
            genres,
        }
    }
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values.unique().sorted().map(str::to_string).collect()
}
