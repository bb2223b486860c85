//! CSV Connector - Reads the catalog dataset from delimited text

use crate::core::models::{RawRecord, REQUIRED_COLUMNS};
use crate::error::{CatalogError, Result};
use crate::ingestion::connector::RecordSource;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// CSV Connector - Wraps CSV text and converts it into raw records.
pub struct CsvConnector {
    source_id: String,
    source_uri: Option<String>,
    csv_text: String,
    delimiter: u8,
    /// Source header -> schema column, for datasets with their own naming
    aliases: HashMap<String, String>,
    consumed: bool,
}

impl CsvConnector {
    pub fn new(source_id: impl Into<String>, csv_text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            source_uri: None,
            csv_text: csv_text.into(),
            delimiter: b',',
            aliases: HashMap::new(),
            consumed: false,
        }
    }

    /// Read the whole file up front; the dataset is loaded once per process.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let csv_text = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Ingestion(format!("Failed to read dataset {}: {}", path.display(), e))
        })?;

        let source_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "catalog".to_string());

        let mut connector = Self::new(source_id, csv_text);
        connector.source_uri = Some(path.display().to_string());
        Ok(connector)
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Map a differently named source header onto a schema column,
    /// e.g. `with_alias("genres", "listed_in")`.
    pub fn with_alias(
        mut self,
        source_header: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        self.aliases.insert(source_header.into(), column.into());
        self
    }

    /// Resolve every required column to a header position.
    ///
    /// Exact match first, then case-insensitive, then the alias table.
    /// Missing columns are fatal: the canonical schema cannot be built.
    pub fn infer_mapping(&self, headers: &[String]) -> Result<HashMap<&'static str, usize>> {
        let mut mapping = HashMap::new();
        let mut missing = Vec::new();

        for column in REQUIRED_COLUMNS {
            let position = headers
                .iter()
                .position(|h| h == column)
                .or_else(|| headers.iter().position(|h| h.eq_ignore_ascii_case(column)))
                .or_else(|| {
                    headers.iter().position(|h| {
                        self.aliases
                            .get(h)
                            .map(|target| target == column)
                            .unwrap_or(false)
                    })
                });

            match position {
                Some(idx) => {
                    if headers[idx] != column {
                        debug!("Mapped source column '{}' to '{}'", headers[idx], column);
                    }
                    mapping.insert(column, idx);
                }
                None => missing.push(column),
            }
        }

        if !missing.is_empty() {
            return Err(CatalogError::Schema(format!(
                "{} is missing required column(s): {}",
                self.source_id,
                missing.join(", ")
            )));
        }

        Ok(mapping)
    }

    fn parse_records(&self) -> Result<Vec<RawRecord>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(self.csv_text.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| CatalogError::Ingestion(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect::<Vec<_>>();

        let mapping = self.infer_mapping(&headers)?;
        let extra = headers.len().saturating_sub(mapping.len());
        if extra > 0 {
            debug!("Ignoring {} unmapped column(s) in {}", extra, self.source_id);
        }

        let mut out = Vec::new();
        let mut short_rows = 0usize;
        for result in rdr.records() {
            let record = result?;
            if record.len() < headers.len() {
                short_rows += 1;
            }

            let mut raw = RawRecord::default();
            for (column, &idx) in &mapping {
                let cell = record.get(idx).filter(|c| !c.is_empty()).map(str::to_string);
                raw.set_field(column, cell);
            }
            out.push(raw);
        }

        if short_rows > 0 {
            warn!("{} row(s) in {} had fewer cells than headers", short_rows, self.source_id);
        }

        Ok(out)
    }
}

impl RecordSource for CsvConnector {
    fn fetch(&mut self) -> Result<Vec<RawRecord>> {
        if self.consumed {
            return Ok(Vec::new());
        }

        let records = self.parse_records()?;
        self.consumed = true;
        info!("📥 Read {} raw records from {}", records.len(), self.source_id);
        Ok(records)
    }

    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn source_type(&self) -> &str {
        "csv"
    }

    fn source_uri(&self) -> Option<&str> {
        self.source_uri.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "show_id,type,title,director,cast,country,date_added,\
                          release_year,rating,duration,listed_in,description";

    #[test]
    fn test_fetch_maps_columns_and_blanks() {
        let csv_text = format!(
            "{}\ns1,Movie,Dick Johnson Is Dead,Kirsten Johnson,,United States,\
             \"September 25, 2021\",2020,PG-13,90 min,Documentaries,A film.\n",
            HEADER
        );
        let mut connector = CsvConnector::new("titles", csv_text);

        let records = connector.fetch().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content_type.as_deref(), Some("Movie"));
        assert_eq!(records[0].cast, None);
        assert_eq!(records[0].date_added.as_deref(), Some("September 25, 2021"));

        // Second fetch is a no-op
        assert!(connector.fetch().unwrap().is_empty());
    }

    #[test]
    fn test_case_insensitive_and_alias_headers() {
        let csv_text = "Type,Title,Director,Cast,Country,Date_Added,Release_Year,Rating,\
                        Duration,genres,Description\n\
                        TV Show,Blood & Water,,,South Africa,,2021,TV-MA,2 Seasons,\
                        \"International TV Shows, TV Dramas\",\n";
        let mut connector =
            CsvConnector::new("aliased", csv_text).with_alias("genres", "listed_in");

        let records = connector.fetch().unwrap();
        assert_eq!(
            records[0].listed_in.as_deref(),
            Some("International TV Shows, TV Dramas")
        );
        assert_eq!(records[0].release_year.as_deref(), Some("2021"));
        assert_eq!(records[0].description, None);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let csv_text = "type,title,country\nMovie,Test,Brazil\n";
        let mut connector = CsvConnector::new("broken", csv_text);

        match connector.fetch() {
            Err(CatalogError::Schema(msg)) => {
                assert!(msg.contains("director"));
                assert!(msg.contains("listed_in"));
                assert!(!msg.contains("country,"));
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_short_rows_are_kept() {
        let csv_text = format!("{}\ns1,Movie,Only Title\n", HEADER);
        let mut connector = CsvConnector::new("ragged", csv_text);

        let records = connector.fetch().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title.as_deref(), Some("Only Title"));
        assert_eq!(records[0].description, None);
    }

    #[test]
    fn test_from_path_records_location() {
        let path = std::env::temp_dir().join("catalog_explorer_from_path_titles.csv");
        std::fs::write(&path, format!("{}\ns1,Movie,On Disk\n", HEADER)).unwrap();

        let mut connector = CsvConnector::from_path(&path).unwrap();
        assert_eq!(connector.source_id(), "catalog_explorer_from_path_titles");
        assert_eq!(connector.source_uri(), Some(path.display().to_string().as_str()));
        assert_eq!(connector.fetch().unwrap().len(), 1);

        std::fs::remove_file(&path).ok();
        assert!(matches!(
            CsvConnector::from_path(&path),
            Err(CatalogError::Ingestion(_))
        ));
    }
}
