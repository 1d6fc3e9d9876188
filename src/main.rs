//! CLI entry point for the Audit Rater dashboard.
//!
//! Loads an audit sheet from a file or URL and prints the dashboard summary,
//! the filter options, commented observations, or exports the records.

use anyhow::{Context, Result};
use audit_rater::{
    analyzers::{
        grade::PerformanceRating, observations::CommentQuery, types::SnapshotSlot,
    },
    config::DashboardConfig,
    dashboard::Dashboard,
    fetch::BasicClient,
    filter::{FilterState, Selection, filter_in_scope},
    ingest::RecordStore,
    loader::sync_source,
    output::{RecordView, format_display_date, print_pretty, render_json, write_records},
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "audit_rater")]
#[command(about = "A tool to score and compare store audit snapshots", long_about = None)]
struct Cli {
    /// JSON config file with `sheet_url` and `log_file_path`
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Path to a CSV file or sheet URL (defaults to the configured sheet)
    #[arg(value_name = "FILE_OR_URL")]
    source: Option<String>,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Location to scope to (defaults to the first location, `all` for every one)
    #[arg(long)]
    location: Option<Selection>,

    /// Section to scope to
    #[arg(long, default_value = "all")]
    section: Selection,

    /// Free-text match on location or section
    #[arg(long, default_value = "")]
    search: String,

    /// Date of the Audit 1 snapshot (YYYY-MM-DD)
    #[arg(long)]
    audit1: Option<NaiveDate>,

    /// Date of the Audit 2 snapshot (YYYY-MM-DD)
    #[arg(long)]
    audit2: Option<NaiveDate>,

    /// Date of the Audit 3 snapshot (YYYY-MM-DD)
    #[arg(long)]
    audit3: Option<NaiveDate>,
}

impl FilterArgs {
    /// Location, section and search only; no location means every location.
    fn to_scope(&self) -> FilterState {
        FilterState {
            location: self.location.clone().unwrap_or_default(),
            section: self.section.clone(),
            search_query: self.search.clone(),
            ..Default::default()
        }
    }

    /// Full dashboard state. Without `--location` the first location is used.
    fn to_state(&self, store: &RecordStore) -> FilterState {
        let base = self.to_scope();
        let scoped = match &self.location {
            Some(location) => base.with_location(location.clone()),
            None => base.with_default_location(&store.locations()),
        };
        let state = FilterState {
            audit1_date: self.audit1,
            audit2_date: self.audit2,
            audit3_date: self.audit3,
            ..scoped
        };

        let available = store.dates_for_location(&state.location);
        for (slot, date) in state.unavailable_dates(&available) {
            warn!(
                slot,
                date = %date,
                location = %state.location,
                "No audit on this date for the location; the snapshot will be empty"
            );
        }
        state
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the comparison, distribution, chart and section breakdown
    Summary {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List locations, sections and the audit dates of a location
    Options {
        #[command(flatten)]
        source: SourceArgs,

        /// Location whose audit dates to list (defaults to the first location)
        #[arg(long)]
        location: Option<Selection>,
    },
    /// Browse commented observations of one snapshot
    Comments {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filters: FilterArgs,

        /// Snapshot to browse (1, 2 or 3)
        #[arg(long, default_value = "1", value_parser = parse_slot)]
        audit: SnapshotSlot,

        /// Only this tier (Poor, Fair, Good or Excellent); every tier when omitted
        #[arg(long, value_parser = parse_rating)]
        rating: Option<PerformanceRating>,

        /// Only comments in this section
        #[arg(long, default_value = "all")]
        comment_section: Selection,

        /// Free-text match on comment, section or question
        #[arg(long, default_value = "")]
        query: String,

        /// Only critical observations (below 50% with a comment)
        #[arg(long, default_value_t = false)]
        critical: bool,
    },
    /// Write the canonical records to a CSV file
    Export {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filters: FilterArgs,

        /// Only the records of this snapshot (1, 2 or 3); every date otherwise
        #[arg(long, value_parser = parse_slot)]
        audit: Option<SnapshotSlot>,

        /// CSV file to write
        #[arg(short, long, default_value = "audit_records.csv")]
        output: String,
    },
}

fn parse_slot(raw: &str) -> Result<SnapshotSlot, String> {
    SnapshotSlot::parse(raw).ok_or_else(|| format!("unknown audit slot `{raw}`, expected 1, 2 or 3"))
}

fn parse_rating(raw: &str) -> Result<PerformanceRating, String> {
    PerformanceRating::parse(raw).ok_or_else(|| format!("unknown rating `{raw}`"))
}

#[derive(Serialize)]
struct Scope<'a> {
    location: String,
    section: String,
    audit_dates: Vec<(&'static str, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl<'a> Scope<'a> {
    fn new(filters: &FilterState, message: Option<&'a str>) -> Self {
        let audit_dates = SnapshotSlot::ALL
            .into_iter()
            .zip([filters.audit1_date, filters.audit2_date, filters.audit3_date])
            .filter_map(|(slot, date)| date.map(|d| (slot.label(), format_display_date(d))))
            .collect();
        Self {
            location: filters.location.to_string(),
            section: filters.section.to_string(),
            audit_dates,
            message,
        }
    }
}

const NO_MATCHES: &str = "No matching audits for the selected filters";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let config = DashboardConfig::resolve(cli.config.as_deref())?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = config.log_file_path.as_str();
    let log_dir = Path::new(log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("audit_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    match cli.command {
        Commands::Summary { source, filters } => {
            let store = load_store(&source, &config).await?;
            let records = store.snapshot();
            let state = filters.to_state(&store);
            let dash = Dashboard::build(&records, &state);
            let summary = dash.summary(records.len());
            print_pretty(&summary);

            #[derive(Serialize)]
            struct Report<'a> {
                scope: Scope<'a>,
                #[serde(flatten)]
                summary: audit_rater::dashboard::DashboardSummary,
            }
            let message = summary.no_matches.then_some(NO_MATCHES);
            let report = Report {
                scope: Scope::new(&state, message),
                summary,
            };
            println!("{}", render_json(&report)?);
        }
        Commands::Options { source, location } => {
            let store = load_store(&source, &config).await?;
            let locations = store.locations();
            let state = match location {
                Some(location) => FilterState::default().with_location(location),
                None => FilterState::default().with_default_location(&locations),
            };
            let dates: Vec<String> = store
                .dates_for_location(&state.location)
                .into_iter()
                .map(format_display_date)
                .collect();

            #[derive(Serialize)]
            struct Options {
                locations: Vec<String>,
                sections: Vec<String>,
                location: String,
                dates: Vec<String>,
            }
            let options = Options {
                sections: store.sections(),
                location: state.location.to_string(),
                locations,
                dates,
            };
            println!("{}", render_json(&options)?);
        }
        Commands::Comments {
            source,
            filters,
            audit,
            rating,
            comment_section,
            query,
            critical,
        } => {
            let store = load_store(&source, &config).await?;
            let records = store.snapshot();
            let state = filters.to_state(&store);
            let dash = Dashboard::build(&records, &state);

            let query = CommentQuery {
                section: comment_section,
                rating,
                search: query,
            };
            let hits = if critical {
                query.apply(&dash.critical(audit))
            } else {
                dash.comments(audit, &query)
            };
            info!(slot = audit.label(), matches = hits.len(), "Comments selected");

            let views: Vec<RecordView> = hits.into_iter().map(RecordView::from).collect();
            println!("{}", render_json(&views)?);
        }
        Commands::Export {
            source,
            filters,
            audit,
            output,
        } => {
            let store = load_store(&source, &config).await?;
            let records = store.snapshot();
            let written = match audit {
                Some(slot) => {
                    let state = filters.to_state(&store);
                    let dash = Dashboard::build(&records, &state);
                    write_records(&output, dash.slot(slot).iter().copied())?
                }
                None => {
                    let scope = filters.to_scope();
                    write_records(&output, filter_in_scope(&records, &scope))?
                }
            };
            if written == 0 {
                warn!(output = %output, "No records matched; wrote header only");
            }
        }
    }

    Ok(())
}

/// Resolves the sheet source and loads it into a fresh store.
#[tracing::instrument(skip(config))]
async fn load_store(source: &SourceArgs, config: &DashboardConfig) -> Result<RecordStore> {
    let source = source
        .source
        .clone()
        .or_else(|| config.sheet_url.clone())
        .context("no sheet given: pass FILE_OR_URL or set AUDIT_SHEET_URL")?;

    let client = BasicClient::new()?;
    let store = RecordStore::new();
    sync_source(&client, &store, &source).await?;
    Ok(store)
}
