//! Query Engine - Filter, Search and Sort
//!
//! Applies a conjunction of independent predicates to the canonical table and
//! returns the matching records as a view. The engine never mutates the table
//! and never truncates: callers get every match and decide what to show.

use crate::core::models::{CanonicalRecord, CanonicalTable, ContentType};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Inclusive release-year range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Records without a release year are never inside a range.
    pub fn contains(&self, year: Option<i32>) -> bool {
        match year {
            Some(y) => y >= self.start && y <= self.end,
            None => false,
        }
    }
}

/// Sidebar filters
///
/// An empty list or `None` means "no constraint" for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub types: Vec<ContentType>,
    pub release_years: Option<YearRange>,
    pub ratings: Vec<String>,

    /// Matches any entry of a record's country list
    pub countries: Vec<String>,

    /// Matches a record's primary genre only
    pub genres: Vec<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = ContentType>) -> Self {
        self.types = types.into_iter().collect();
        self
    }

    pub fn with_release_years(mut self, start: i32, end: i32) -> Self {
        self.release_years = Some(YearRange::new(start, end));
        self
    }

    pub fn with_ratings<S: Into<String>>(mut self, ratings: impl IntoIterator<Item = S>) -> Self {
        self.ratings = ratings.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_countries<S: Into<String>>(
        mut self,
        countries: impl IntoIterator<Item = S>,
    ) -> Self {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_genres<S: Into<String>>(mut self, genres: impl IntoIterator<Item = S>) -> Self {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    /// True when no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
            && self.release_years.is_none()
            && self.ratings.is_empty()
            && self.countries.is_empty()
            && self.genres.is_empty()
    }
}

/// Explorer sort column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    Title,
    ReleaseYear,
    DateAdded,
    Rating,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Title => "title",
            SortKey::ReleaseYear => "release_year",
            SortKey::DateAdded => "date_added",
            SortKey::Rating => "rating",
        };
        f.write_str(name)
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "title" => Ok(SortKey::Title),
            "release_year" | "year" => Ok(SortKey::ReleaseYear),
            "date_added" | "added" => Ok(SortKey::DateAdded),
            "rating" => Ok(SortKey::Rating),
            other => Err(format!(
                "unknown sort key '{}' (expected title, release_year, date_added or rating)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(format!("unknown sort order '{}' (expected asc or desc)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }
}

/// Explorer-only criteria: free-text search plus ordering
///
/// An empty search string is "no constraint", same as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub title: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub sort: Option<SortSpec>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, needle: impl Into<String>) -> Self {
        self.title = Some(needle.into());
        self
    }

    pub fn with_director(mut self, needle: impl Into<String>) -> Self {
        self.director = Some(needle.into());
        self
    }

    pub fn with_cast(mut self, needle: impl Into<String>) -> Self {
        self.cast = Some(needle.into());
        self
    }

    pub fn sorted_by(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort = Some(SortSpec::new(key, order));
        self
    }
}

/// A single active predicate
#[derive(Debug)]
enum Predicate<'c> {
    Types(&'c [ContentType]),
    ReleaseYears(YearRange),
    Ratings(&'c [String]),
    Countries(&'c [String]),
    Genres(&'c [String]),
    Title(String),
    Director(String),
    Cast(String),
}

impl<'c> Predicate<'c> {
    /// Equality and range checks are cheap; substring search is not.
    fn cost(&self) -> u8 {
        match self {
            Predicate::ReleaseYears(_) | Predicate::Types(_) => 0,
            Predicate::Ratings(_) => 1,
            Predicate::Countries(_) | Predicate::Genres(_) => 2,
            Predicate::Title(_) | Predicate::Director(_) | Predicate::Cast(_) => 3,
        }
    }

    fn matches(&self, record: &CanonicalRecord) -> bool {
        match self {
            Predicate::Types(types) => record
                .content_type
                .map(|t| types.contains(&t))
                .unwrap_or(false),
            Predicate::ReleaseYears(range) => range.contains(record.release_year),
            Predicate::Ratings(ratings) => record
                .rating
                .as_ref()
                .map(|r| ratings.contains(r))
                .unwrap_or(false),
            Predicate::Countries(countries) => record
                .countries()
                .any(|c| countries.iter().any(|wanted| wanted == c)),
            Predicate::Genres(genres) => record
                .primary_genre
                .as_ref()
                .map(|g| genres.contains(g))
                .unwrap_or(false),
            Predicate::Title(needle) => contains_ignore_case(record.title.as_deref(), needle),
            Predicate::Director(needle) => contains_ignore_case(record.director.as_deref(), needle),
            Predicate::Cast(needle) => contains_ignore_case(record.cast.as_deref(), needle),
        }
    }
}

/// Absent text never matches a search.
fn contains_ignore_case(haystack: Option<&str>, lowered_needle: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(lowered_needle))
        .unwrap_or(false)
}

fn filter_predicates(criteria: &FilterCriteria) -> Vec<Predicate<'_>> {
    let mut predicates = Vec::new();
    if !criteria.types.is_empty() {
        predicates.push(Predicate::Types(&criteria.types));
    }
    if let Some(range) = criteria.release_years {
        predicates.push(Predicate::ReleaseYears(range));
    }
    if !criteria.ratings.is_empty() {
        predicates.push(Predicate::Ratings(&criteria.ratings));
    }
    if !criteria.countries.is_empty() {
        predicates.push(Predicate::Countries(&criteria.countries));
    }
    if !criteria.genres.is_empty() {
        predicates.push(Predicate::Genres(&criteria.genres));
    }
    predicates
}

fn search_predicates<'c>(search: &SearchCriteria) -> Vec<Predicate<'c>> {
    let lowered = |needle: &Option<String>| {
        needle
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(str::to_lowercase)
    };

    let mut predicates = Vec::new();
    if let Some(needle) = lowered(&search.title) {
        predicates.push(Predicate::Title(needle));
    }
    if let Some(needle) = lowered(&search.director) {
        predicates.push(Predicate::Director(needle));
    }
    if let Some(needle) = lowered(&search.cast) {
        predicates.push(Predicate::Cast(needle));
    }
    predicates
}

/// Records that satisfied every active predicate, in a defined order
///
/// Borrows from the canonical table; building a view never copies records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView<'a> {
    records: Vec<&'a CanonicalRecord>,
}

impl<'a> FilteredView<'a> {
    /// View over the whole table, in insertion order.
    pub fn all(table: &'a CanonicalTable) -> Self {
        Self {
            records: table.iter().collect(),
        }
    }

    pub fn records(&self) -> &[&'a CanonicalRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CanonicalRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First `limit` records. Display truncation for renderers.
    pub fn head(&self, limit: usize) -> Self {
        Self {
            records: self.records.iter().take(limit).copied().collect(),
        }
    }
}

/// Query engine over the canonical table
///
/// Stateless; every call is a pure function of the view and criteria passed
/// in, so the same engine can serve any number of sessions at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEngine;

impl QueryEngine {
    pub fn new() -> Self {
        Self
    }

    /// Apply the sidebar filters to the whole table.
    pub fn filter<'a>(
        &self,
        table: &'a CanonicalTable,
        criteria: &FilterCriteria,
    ) -> FilteredView<'a> {
        self.refine(&FilteredView::all(table), criteria)
    }

    /// Apply further filters to an existing view. Filters compose:
    /// refining by C2 after C1 equals filtering by both at once.
    pub fn refine<'a>(
        &self,
        view: &FilteredView<'a>,
        criteria: &FilterCriteria,
    ) -> FilteredView<'a> {
        let view = apply(view, filter_predicates(criteria));
        debug!("🔍 Filter kept {} records for {:?}", view.len(), criteria);
        view
    }

    /// Explorer search and ordering on top of an already-filtered view.
    pub fn search<'a>(&self, view: &FilteredView<'a>, search: &SearchCriteria) -> FilteredView<'a> {
        let matched = apply(view, search_predicates(search));
        let result = match search.sort {
            Some(spec) => self.sort(&matched, spec),
            None => matched,
        };
        debug!("🔎 Search kept {} of {} records", result.len(), view.len());
        result
    }

    /// Stable sort: records with equal keys keep their relative order in
    /// both directions. Records missing the key go last either way.
    pub fn sort<'a>(&self, view: &FilteredView<'a>, spec: SortSpec) -> FilteredView<'a> {
        let mut records = view.records.clone();
        records.sort_by(|a, b| compare_by_key(a, b, spec));
        FilteredView { records }
    }
}

/// Filter the whole table with a default engine.
pub fn filter<'a>(table: &'a CanonicalTable, criteria: &FilterCriteria) -> FilteredView<'a> {
    QueryEngine::new().filter(table, criteria)
}

fn apply<'a>(view: &FilteredView<'a>, mut predicates: Vec<Predicate<'_>>) -> FilteredView<'a> {
    if predicates.is_empty() {
        return view.clone();
    }
    predicates.sort_by_key(|p| p.cost());

    let records = view
        .records
        .iter()
        .copied()
        .filter(|record| predicates.iter().all(|p| p.matches(record)))
        .collect();
    FilteredView { records }
}

fn compare_by_key(a: &CanonicalRecord, b: &CanonicalRecord, spec: SortSpec) -> Ordering {
    match spec.key {
        SortKey::Title => compare_present(a.title.as_deref(), b.title.as_deref(), spec.order),
        SortKey::ReleaseYear => compare_present(a.release_year, b.release_year, spec.order),
        SortKey::DateAdded => compare_present(a.date_added, b.date_added, spec.order),
        SortKey::Rating => compare_present(a.rating.as_deref(), b.rating.as_deref(), spec.order),
    }
}

fn compare_present<T: Ord>(a: Option<T>, b: Option<T>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Ascending => a.cmp(&b),
            SortOrder::Descending => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::normalize::normalize;
    use crate::core::models::RawRecord;

    fn raw(kind: &str, title: &str, year: &str, rating: &str, country: Option<&str>) -> RawRecord {
        RawRecord {
            content_type: Some(kind.to_string()),
            title: Some(title.to_string()),
            release_year: Some(year.to_string()),
            rating: Some(rating.to_string()),
            country: country.map(str::to_string),
            ..Default::default()
        }
    }

    fn table() -> CanonicalTable {
        normalize(&[
            raw("Movie", "Alpha", "2015", "PG", Some("Brazil")),
            raw("TV Show", "Beta", "2020", "TV-MA", Some("United States, Canada")),
            raw("Movie", "Gamma", "2020", "PG", None),
            raw("Movie", "Delta", "2012", "R", Some("France")),
        ])
        .unwrap()
    }

    fn titles(view: &FilteredView<'_>) -> Vec<String> {
        view.iter().filter_map(|r| r.title.clone()).collect()
    }

    #[test]
    fn test_predicates_run_cheapest_first() {
        let criteria = FilterCriteria::new()
            .with_countries(["Brazil"])
            .with_release_years(2000, 2030)
            .with_ratings(["PG"]);
        let search = SearchCriteria::new().with_title("a");

        let mut predicates = filter_predicates(&criteria);
        predicates.extend(search_predicates(&search));
        predicates.sort_by_key(|p| p.cost());

        assert!(matches!(predicates[0], Predicate::ReleaseYears(_)));
        assert!(matches!(predicates[1], Predicate::Ratings(_)));
        assert!(matches!(predicates[2], Predicate::Countries(_)));
        assert!(matches!(predicates[3], Predicate::Title(_)));
    }

    #[test]
    fn test_rating_and_year_filters() {
        let table = table();
        let engine = QueryEngine::new();

        let criteria = FilterCriteria::new().with_ratings(["PG"]).with_release_years(2016, 2020);
        assert_eq!(titles(&engine.filter(&table, &criteria)), vec!["Gamma"]);
    }

    #[test]
    fn test_genre_filter_uses_primary_genre() {
        let listed = |title: &str, genres: &str| RawRecord {
            content_type: Some("Movie".to_string()),
            title: Some(title.to_string()),
            listed_in: Some(genres.to_string()),
            ..Default::default()
        };
        let table = normalize(&[
            listed("Comedy First", "Comedies, Dramas"),
            listed("Drama First", "Dramas, Comedies"),
        ])
        .unwrap();

        let criteria = FilterCriteria::new().with_genres(["Dramas"]);
        let view = QueryEngine::new().filter(&table, &criteria);
        assert_eq!(titles(&view), vec!["Drama First"]);
        assert_eq!(view.records()[0].primary_genre.as_deref(), Some("Dramas"));
    }

    #[test]
    fn test_sort_places_missing_keys_last() {
        let mut raws = vec![
            raw("Movie", "Zulu", "2001", "PG", None),
            raw("Movie", "Mike", "1999", "PG", None),
        ];
        raws.push(RawRecord {
            content_type: Some("Movie".to_string()),
            ..Default::default()
        });
        let table = normalize(&raws).unwrap();
        let engine = QueryEngine::new();
        let all = FilteredView::all(&table);

        let asc = engine.sort(&all, SortSpec::new(SortKey::ReleaseYear, SortOrder::Ascending));
        assert_eq!(asc.records()[0].release_year, Some(1999));
        assert_eq!(asc.records()[2].release_year, None);

        let desc = engine.sort(&all, SortSpec::new(SortKey::Title, SortOrder::Descending));
        assert_eq!(titles(&desc), vec!["Zulu", "Mike"]);
        assert_eq!(desc.records()[2].title, None);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("release-year".parse::<SortKey>(), Ok(SortKey::ReleaseYear));
        assert_eq!("Title".parse::<SortKey>(), Ok(SortKey::Title));
        assert!("duration".parse::<SortKey>().is_err());
        assert_eq!("DESC".parse::<SortOrder>(), Ok(SortOrder::Descending));
    }

    #[test]
    fn test_head_truncates_without_touching_the_view() {
        let table = table();
        let view = FilteredView::all(&table);
        assert_eq!(view.head(2).len(), 2);
        assert_eq!(view.len(), 4);
    }
}
