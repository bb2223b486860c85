//! Dashboard Report
//!
//! Bundles every region's data for one interaction cycle: one filtered view
//! in, one report out. Display truncation (top N, detail list length) happens
//! here, never in the query engine.

use crate::config::ExplorerConfig;
use crate::core::engine::aggregate::{
    self, CountryTypeCount, FrequencyTable, HistogramBin, Summary, TemporalKey, TimelinePoint,
    YearCount,
};
use crate::core::engine::query::{FilteredView, QueryEngine, SearchCriteria};
use crate::core::models::{CanonicalRecord, ContentType};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub summary: Summary,
    pub type_counts: FrequencyTable,
    pub yearly_additions: Vec<YearCount>,
    pub top_genres: FrequencyTable,
    pub ratings: FrequencyTable,
    pub movie_durations: Vec<HistogramBin>,
    pub season_counts: FrequencyTable,

    /// Every primary country, for map rendering
    pub country_map: FrequencyTable,
    pub top_countries: FrequencyTable,
    pub country_types: Vec<CountryTypeCount>,

    pub timeline_key: TemporalKey,
    pub timeline: Vec<TimelinePoint>,
}

impl DashboardReport {
    pub fn build(
        view: &FilteredView<'_>,
        config: &ExplorerConfig,
        timeline_key: TemporalKey,
    ) -> Self {
        let country_map = aggregate::country_counts(view);

        Self {
            summary: aggregate::summary(view),
            type_counts: aggregate::type_counts(view),
            yearly_additions: aggregate::yearly_additions(view),
            top_genres: aggregate::genre_counts(view).top(config.top_genres),
            ratings: aggregate::rating_counts(view).top(config.top_ratings),
            movie_durations: aggregate::duration_histogram(view, config.histogram_bins),
            season_counts: aggregate::season_counts(view).top(config.season_top),
            top_countries: country_map.top(config.top_countries),
            country_types: aggregate::country_type_breakdown(view, config.country_type_top),
            country_map,
            timeline_key,
            timeline: aggregate::timeline(view, timeline_key),
        }
    }

    /// Renderers show "no data" instead of empty charts.
    pub fn is_empty(&self) -> bool {
        self.summary.total == 0
    }
}

/// One row of the explorer detail list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailEntry {
    pub title: Option<String>,
    pub content_type: Option<ContentType>,
    pub release_year: Option<i32>,
    pub rating: Option<String>,

    /// "September 09, 2019"
    pub date_added: Option<String>,
    pub duration: Option<String>,
    pub primary_genre: Option<String>,
    pub primary_country: Option<String>,
    pub description: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
}

impl From<&CanonicalRecord> for DetailEntry {
    fn from(record: &CanonicalRecord) -> Self {
        Self {
            title: record.title.clone(),
            content_type: record.content_type,
            release_year: record.release_year,
            rating: record.rating.clone(),
            date_added: record.date_added.map(|d| d.format("%B %d, %Y").to_string()),
            duration: record.duration.clone(),
            primary_genre: record.primary_genre.clone(),
            primary_country: record.primary_country.clone(),
            description: record.description.clone(),
            director: record.director.clone(),
            cast: record.cast.clone(),
        }
    }
}

/// Explorer results: full match count plus the first `limit` entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerPage {
    pub total_matches: usize,
    pub entries: Vec<DetailEntry>,
}

impl ExplorerPage {
    pub fn build(view: &FilteredView<'_>, search: &SearchCriteria, limit: usize) -> Self {
        let results = QueryEngine::new().search(view, search);
        Self {
            total_matches: results.len(),
            entries: results.head(limit).iter().map(DetailEntry::from).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_matches == 0
    }
}

fn or_na<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

fn write_table(f: &mut fmt::Formatter<'_>, heading: &str, table: &FrequencyTable) -> fmt::Result {
    writeln!(f, "\n{}", heading)?;
    if table.is_empty() {
        return writeln!(f, "   (no data)");
    }
    for entry in &table.entries {
        writeln!(f, "   {:<40} {:>6}", entry.label, entry.count)?;
    }
    Ok(())
}

impl fmt::Display for DashboardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, " CATALOG OVERVIEW")?;
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "   Total titles:        {}", self.summary.total)?;
        writeln!(f, "   Movies:              {}", self.summary.movies)?;
        writeln!(f, "   TV shows:            {}", self.summary.tv_shows)?;
        writeln!(f, "   Latest release year: {}", or_na(&self.summary.latest_release_year))?;

        if self.is_empty() {
            return writeln!(f, "\nNo titles match the current filters.");
        }

        write_table(f, "By type", &self.type_counts)?;

        writeln!(f, "\nAdded per year")?;
        for point in &self.yearly_additions {
            writeln!(f, "   {:<40} {:>6}", point.year, point.count)?;
        }

        write_table(f, "Top genres", &self.top_genres)?;
        write_table(f, "Ratings", &self.ratings)?;

        writeln!(f, "\nMovie duration (minutes)")?;
        if self.movie_durations.is_empty() {
            writeln!(f, "   (no movies)")?;
        }
        for bin in &self.movie_durations {
            writeln!(f, "   {:>7.1} - {:<7.1} {:>6}", bin.start, bin.end, bin.count)?;
        }

        write_table(f, "TV shows by seasons", &self.season_counts)?;
        write_table(f, "Top countries", &self.top_countries)?;

        writeln!(f, "\nTop countries by type")?;
        for row in &self.country_types {
            writeln!(f, "   {:<30} {:<9} {:>6}", row.country, row.content_type, row.count)?;
        }

        writeln!(f, "\nTimeline ({})", self.timeline_key)?;
        if self.timeline.is_empty() {
            writeln!(f, "   (no data)")?;
        }
        for point in &self.timeline {
            writeln!(f, "   {:<6} {:<9} {:>6}", point.year, point.content_type, point.count)?;
        }
        Ok(())
    }
}

impl fmt::Display for ExplorerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} results found", self.total_matches)?;
        for entry in &self.entries {
            writeln!(f, "\n{}", "-".repeat(60))?;
            writeln!(
                f,
                " {} ({}) - {}",
                or_na(&entry.title),
                or_na(&entry.release_year),
                or_na(&entry.content_type)
            )?;
            writeln!(f, "   Rating:   {}", or_na(&entry.rating))?;
            if let Some(added) = &entry.date_added {
                writeln!(f, "   Added:    {}", added)?;
            }
            writeln!(f, "   Duration: {}", or_na(&entry.duration))?;
            writeln!(f, "   Genre:    {}", or_na(&entry.primary_genre))?;
            writeln!(f, "   Country:  {}", or_na(&entry.primary_country))?;
            if let Some(director) = &entry.director {
                writeln!(f, "   Director: {}", director)?;
            }
            if let Some(cast) = &entry.cast {
                writeln!(f, "   Cast:     {}", cast)?;
            }
            writeln!(f, "   {}", or_na(&entry.description))?;
        }
        Ok(())
    }
}
