//! Tabular export of a filtered view
//!
//! Converts a view into a polars DataFrame so charting tools and notebooks
//! can consume exactly what the dashboard shows.

use crate::core::engine::query::FilteredView;
use crate::error::{CatalogError, Result};
use polars::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Column order of the exported frame
pub const EXPORT_COLUMNS: [&str; 18] = [
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
    "year_added",
    "month_added",
    "month_year_added",
    "primary_country",
    "primary_genre",
    "duration_num",
    "duration_type",
];

fn text_column<F>(view: &FilteredView<'_>, name: &str, f: F) -> Series
where
    F: Fn(&crate::core::models::CanonicalRecord) -> Option<String>,
{
    let values: Vec<Option<String>> = view.iter().map(f).collect();
    Series::new(name, values)
}

/// One row per record, one column per canonical field. Dates are ISO
/// `YYYY-MM-DD`, month periods `YYYY-MM`.
pub fn view_to_dataframe(view: &FilteredView<'_>) -> Result<DataFrame> {
    let release_year: Vec<Option<i32>> = view.iter().map(|r| r.release_year).collect();
    let year_added: Vec<Option<i32>> = view.iter().map(|r| r.year_added).collect();
    let duration_num: Vec<Option<u32>> = view.iter().map(|r| r.duration_num).collect();

    let columns = vec![
        text_column(view, "type", |r| r.content_type.map(|t| t.as_str().to_string())),
        text_column(view, "title", |r| r.title.clone()),
        text_column(view, "director", |r| r.director.clone()),
        text_column(view, "cast", |r| r.cast.clone()),
        text_column(view, "country", |r| r.country.clone()),
        text_column(view, "date_added", |r| r.date_added.map(|d| d.format("%Y-%m-%d").to_string())),
        Series::new("release_year", release_year),
        text_column(view, "rating", |r| r.rating.clone()),
        text_column(view, "duration", |r| r.duration.clone()),
        text_column(view, "listed_in", |r| r.listed_in.clone()),
        text_column(view, "description", |r| r.description.clone()),
        Series::new("year_added", year_added),
        text_column(view, "month_added", |r| r.month_added.clone()),
        text_column(view, "month_year_added", |r| r.month_year_added.map(|m| m.to_string())),
        text_column(view, "primary_country", |r| r.primary_country.clone()),
        text_column(view, "primary_genre", |r| r.primary_genre.clone()),
        Series::new("duration_num", duration_num),
        text_column(view, "duration_type", |r| r.duration_type.map(|u| u.as_str().to_string())),
    ];

    DataFrame::new(columns)
        .map_err(|e| CatalogError::Export(format!("Failed to build export frame: {}", e)))
}

/// Write the view as CSV (with header) to any writer.
pub fn write_csv_to<W: Write>(view: &FilteredView<'_>, writer: &mut W) -> Result<()> {
    let mut df = view_to_dataframe(view)?;
    CsvWriter::new(writer)
        .finish(&mut df)
        .map_err(|e| CatalogError::Export(format!("Failed to write CSV: {}", e)))
}

pub fn write_csv(view: &FilteredView<'_>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path)?;
    write_csv_to(view, &mut file)?;
    info!("💾 Exported {} records to {}", view.len(), path.display());
    Ok(())
}
