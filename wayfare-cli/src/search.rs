//! Search command implementation for the Wayfare CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wayfare_core::{ScoringConfig, SmallCityThreshold, SqliteDestinationStore};
use wayfare_scorer::{HierarchicalSearch, ScoredResult, read_scoring_config};

use crate::{
    ARG_DATABASE, ARG_QUERY, ARG_WEIGHTS, CliError, DEFAULT_DATABASE, ENV_SEARCH_QUERY,
    require_existing,
};

/// Shortest accepted query, in characters after trimming.
pub(crate) const MIN_QUERY_CHARS: usize = 2;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// Pretty-printed JSON array of scored results.
    #[default]
    Json,
    /// Aligned plain-text table.
    Table,
}

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Match the query against city, area and hotel names in a \
                 destination database built by `ingest`. Locations are \
                 ranked first; hotels fill whatever remains of the twenty \
                 result slots.",
    about = "Search a destination database"
)]
#[ortho_config(prefix = "WAYFARE")]
pub(crate) struct SearchArgs {
    /// Free-text query, at least two characters.
    #[arg(value_name = "query")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Destination database written by `ingest`.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Scoring config written by `weights` (JSON or bincode).
    #[arg(long = ARG_WEIGHTS, value_name = "path")]
    #[serde(default)]
    pub(crate) weights: Option<Utf8PathBuf>,
    /// Override the small-city hotel-count threshold.
    #[arg(long, value_name = "count", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) threshold: Option<i64>,
    /// Output format.
    #[arg(long, value_enum)]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
}

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchConfig {
    /// Trimmed query text.
    pub(crate) query: String,
    pub(crate) database: Utf8PathBuf,
    pub(crate) weights: Option<Utf8PathBuf>,
    pub(crate) threshold: Option<SmallCityThreshold>,
    pub(crate) format: OutputFormat,
}

impl SearchConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.database, ARG_DATABASE)?;
        if let Some(weights) = &self.weights {
            require_existing(weights, ARG_WEIGHTS)?;
        }
        Ok(())
    }

    /// Load the scoring config and apply any threshold override.
    pub(crate) fn scoring_config(&self) -> Result<ScoringConfig, CliError> {
        let base = match &self.weights {
            Some(path) => read_scoring_config(path)?,
            None => ScoringConfig::default(),
        };
        Ok(match self.threshold {
            Some(threshold) => base.with_threshold(threshold),
            None => base,
        })
    }
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let raw = args.query.ok_or(CliError::MissingArgument {
            field: ARG_QUERY,
            env: ENV_SEARCH_QUERY,
        })?;
        let query = raw.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Err(CliError::QueryTooShort { query: raw });
        }
        Ok(Self {
            query: query.to_owned(),
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            weights: args.weights,
            threshold: args.threshold.map(SmallCityThreshold::new),
            format: args.format.unwrap_or_default(),
        })
    }
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_search_with(args, &mut stdout)
}

pub(crate) fn run_search_with(args: SearchArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_search_config(args)?;
    let results = execute_search(&config)?;
    write_results(writer, &results, config.format)
}

pub(crate) fn resolve_search_config(args: SearchArgs) -> Result<SearchConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn execute_search(config: &SearchConfig) -> Result<Vec<ScoredResult>, CliError> {
    let scoring = config.scoring_config()?;
    let store = SqliteDestinationStore::open(&config.database)?;
    let results = HierarchicalSearch::new(&store, &scoring).search(&config.query)?;
    debug!("query {:?} returned {} results", config.query, results.len());
    Ok(results)
}

pub(crate) fn write_results(
    writer: &mut dyn Write,
    results: &[ScoredResult],
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload =
                serde_json::to_string_pretty(results).map_err(CliError::SerialiseResults)?;
            writeln!(writer, "{payload}").map_err(CliError::WriteOutput)
        }
        OutputFormat::Table => write_table(writer, results).map_err(CliError::WriteOutput),
    }
}

fn write_table(writer: &mut dyn Write, results: &[ScoredResult]) -> std::io::Result<()> {
    if results.is_empty() {
        return writeln!(writer, "no destinations matched");
    }
    writeln!(
        writer,
        "{:>4}  {:<10}  {:>8}  {:<32}  {:<20}  {}",
        "rank", "kind", "score", "name", "city", "country"
    )?;
    for (rank, result) in results.iter().enumerate() {
        writeln!(
            writer,
            "{:>4}  {:<10}  {:>8.2}  {:<32}  {:<20}  {}",
            rank + 1,
            result.kind.to_string(),
            result.score,
            result.name,
            result.city_name,
            result.country_name
        )?;
    }
    Ok(())
}
