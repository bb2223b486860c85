//! Explorer configuration, read from the environment (`.env` supported).

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Dataset location
    pub data_path: PathBuf,

    /// Records shown in the explorer detail list
    pub detail_limit: usize,

    /// Country options offered to the country filter
    pub country_option_limit: usize,

    pub top_genres: usize,
    pub top_ratings: usize,
    pub top_countries: usize,

    /// Countries included in the country-by-type chart
    pub country_type_top: usize,

    pub season_top: usize,
    pub histogram_bins: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/movies.csv"),
            detail_limit: 30,
            country_option_limit: 50,
            top_genres: 10,
            top_ratings: 8,
            top_countries: 15,
            country_type_top: 10,
            season_top: 10,
            histogram_bins: 20,
        }
    }
}

impl ExplorerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let number = |key: &str, default: usize| -> Result<usize> {
            match lookup(key) {
                Some(value) => value.trim().parse::<usize>().map_err(|e| {
                    CatalogError::Config(format!(
                        "{} must be a non-negative integer, got '{}': {}",
                        key, value, e
                    ))
                }),
                None => Ok(default),
            }
        };

        Ok(Self {
            data_path: lookup("CATALOG_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            detail_limit: number("CATALOG_DETAIL_LIMIT", defaults.detail_limit)?,
            country_option_limit: number(
                "CATALOG_COUNTRY_OPTION_LIMIT",
                defaults.country_option_limit,
            )?,
            top_genres: number("CATALOG_TOP_GENRES", defaults.top_genres)?,
            top_ratings: number("CATALOG_TOP_RATINGS", defaults.top_ratings)?,
            top_countries: number("CATALOG_TOP_COUNTRIES", defaults.top_countries)?,
            country_type_top: number("CATALOG_COUNTRY_TYPE_TOP", defaults.country_type_top)?,
            season_top: number("CATALOG_SEASON_TOP", defaults.season_top)?,
            histogram_bins: number("CATALOG_HISTOGRAM_BINS", defaults.histogram_bins)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_lookup_overrides_defaults() {
        let env: HashMap<&str, &str> = [
            ("CATALOG_DETAIL_LIMIT", "5"),
            ("CATALOG_DATA_PATH", "/tmp/titles.csv"),
        ]
        .into_iter()
        .collect();
        let config = ExplorerConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.detail_limit, 5);
        assert_eq!(config.data_path, PathBuf::from("/tmp/titles.csv"));
        assert_eq!(config.top_ratings, 8);
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let result = ExplorerConfig::from_lookup(|k| {
            (k == "CATALOG_HISTOGRAM_BINS").then(|| "many".to_string())
        });
        assert!(matches!(result, Err(CatalogError::Config(_))));
    }
}
