use catalog_explorer::catalog;
use catalog_explorer::export;
use catalog_explorer::ingestion::CsvConnector;
use catalog_explorer::observability::init_tracing;
use catalog_explorer::report::{DashboardReport, ExplorerPage};
use catalog_explorer::{
    ContentType, ExplorerConfig, FilterCriteria, FilterOptions, QueryEngine, SearchCriteria,
    SortKey, SortOrder, TemporalKey,
};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "catalog-explorer")]
#[command(about = "Filter, search and summarize a title catalog")]
#[command(version)]
struct Args {
    /// Dataset path (or set CATALOG_DATA_PATH)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Map a source header onto a schema column, e.g. --alias genres=listed_in
    #[arg(long = "alias", global = true)]
    aliases: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Sidebar filters shared by every subcommand
#[derive(ClapArgs, Debug, Default)]
struct FilterArgs {
    /// Content type (repeatable): movie, tv
    #[arg(long = "type")]
    types: Vec<ContentType>,

    /// First release year (inclusive)
    #[arg(long)]
    year_from: Option<i32>,

    /// Last release year (inclusive)
    #[arg(long)]
    year_to: Option<i32>,

    /// Rating (repeatable), e.g. TV-MA
    #[arg(long = "rating")]
    ratings: Vec<String>,

    /// Country (repeatable)
    #[arg(long = "country")]
    countries: Vec<String>,

    /// Genre (repeatable)
    #[arg(long = "genre")]
    genres: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Overview metrics, charts data and timeline for the filtered catalog
    Summary {
        #[command(flatten)]
        filters: FilterArgs,

        /// Timeline grouping: release_year or year_added
        #[arg(long, default_value = "release_year")]
        timeline: TemporalKey,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Search and sort the filtered catalog
    Explore {
        #[command(flatten)]
        filters: FilterArgs,

        /// Title contains (case-insensitive)
        #[arg(long)]
        title: Option<String>,

        /// Director contains (case-insensitive)
        #[arg(long)]
        director: Option<String>,

        /// Cast contains (case-insensitive)
        #[arg(long)]
        cast: Option<String>,

        /// Sort key: title, release_year, date_added, rating
        #[arg(long, default_value = "title")]
        sort: SortKey,

        /// Sort order: asc or desc
        #[arg(long, default_value = "asc")]
        order: SortOrder,

        /// Number of results to show (or set CATALOG_DETAIL_LIMIT)
        #[arg(long)]
        limit: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Values available to each filter
    Options {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write the filtered catalog to a CSV file
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output CSV path
        output: PathBuf,
    },
}

impl FilterArgs {
    /// An open-ended bound falls back to the catalog's own min/max year.
    fn to_criteria(&self, options: &FilterOptions) -> FilterCriteria {
        let mut criteria = FilterCriteria::new()
            .with_types(self.types.iter().copied())
            .with_ratings(self.ratings.iter().cloned())
            .with_countries(self.countries.iter().cloned())
            .with_genres(self.genres.iter().cloned());

        if self.year_from.is_some() || self.year_to.is_some() {
            let bounds = options.release_years;
            let start = self.year_from.or(bounds.map(|b| b.start)).unwrap_or(i32::MIN);
            let end = self.year_to.or(bounds.map(|b| b.end)).unwrap_or(i32::MAX);
            criteria = criteria.with_release_years(start, end);
        }
        criteria
    }
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    let args = Args::parse();
    let mut config = ExplorerConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    if let Some(data) = args.data.clone() {
        config.data_path = data;
    }

    info!("Loading catalog from {:?}", config.data_path);
    let mut connector = CsvConnector::from_path(&config.data_path)
        .map_err(|e| anyhow::anyhow!("Failed to open dataset: {}", e))?;
    for alias in &args.aliases {
        let (source, column) = alias
            .split_once('=')
            .with_context(|| format!("alias '{}' must look like source=column", alias))?;
        connector = connector.with_alias(source.trim(), column.trim());
    }

    let table = catalog::global()
        .get_or_load(&mut connector)
        .map_err(|e| anyhow::anyhow!("Failed to load catalog: {}", e))?;
    let options = FilterOptions::from_table(&table, config.country_option_limit);
    let engine = QueryEngine::new();

    match args.command {
        Commands::Summary { filters, timeline, json } => {
            let view = engine.filter(&table, &filters.to_criteria(&options));
            let report = DashboardReport::build(&view, &config, timeline);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report);
            }
        }
        Commands::Explore {
            filters,
            title,
            director,
            cast,
            sort,
            order,
            limit,
            json,
        } => {
            let view = engine.filter(&table, &filters.to_criteria(&options));
            let search = SearchCriteria {
                title,
                director,
                cast,
                ..SearchCriteria::default()
            }
            .sorted_by(sort, order);
            let page = ExplorerPage::build(&view, &search, limit.unwrap_or(config.detail_limit));
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                print!("{}", page);
            }
        }
        Commands::Options { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else {
                print_options(&options);
            }
        }
        Commands::Export { filters, output } => {
            let view = engine.filter(&table, &filters.to_criteria(&options));
            export::write_csv(&view, &output)
                .map_err(|e| anyhow::anyhow!("Failed to export {:?}: {}", output, e))?;
            println!("Exported {} records to {}", view.len(), output.display());
        }
    }

    Ok(())
}

fn print_options(options: &FilterOptions) {
    let types: Vec<&str> = options.types.iter().map(|t| t.as_str()).collect();
    println!("Types:     {}", types.join(", "));
    match options.release_years {
        Some(range) => println!("Years:     {} - {}", range.start, range.end),
        None => println!("Years:     N/A"),
    }
    println!("Ratings:   {}", options.ratings.join(", "));
    println!("Countries: {}", options.countries.join(", "));
    println!("Genres:    {}", options.genres.join(", "));
}
