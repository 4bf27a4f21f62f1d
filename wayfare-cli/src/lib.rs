//! Command-line interface for building and querying Wayfare destination
//! databases.
//!
//! Three subcommands are exposed:
//! - `ingest` loads a JSON dataset (or the built-in sample), normalises it
//!   and writes the SQLite database read by `search`.
//! - `search` runs the hierarchical search against that database and prints
//!   the ranked results.
//! - `weights` writes a scoring config that `search --weights` can load.
//!
//! Every subcommand layers its options from CLI flags, `WAYFARE_`
//! environment variables and configuration files via `ortho_config`.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use clap::{Parser, Subcommand};

mod error;
mod ingest;
mod search;
mod weights;

pub use error::CliError;

use ingest::IngestArgs;
use search::SearchArgs;
use weights::WeightsArgs;

const ARG_DATASET: &str = "dataset";
const ARG_OUTPUT: &str = "output";
const ARG_QUERY: &str = "query";
const ARG_DATABASE: &str = "database";
const ARG_WEIGHTS: &str = "weights";
const ENV_INGEST_DATASET: &str = "WAYFARE_CMDS_INGEST_DATASET";
const ENV_SEARCH_QUERY: &str = "WAYFARE_CMDS_SEARCH_QUERY";
const ENV_WEIGHTS_OUTPUT: &str = "WAYFARE_CMDS_WEIGHTS_OUTPUT";

/// Database filename used when no `--database`/`--output` is given.
const DEFAULT_DATABASE: &str = "destinations.db";

/// Run the Wayfare CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration layering or the
/// selected command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Ingest(args) => ingest::run_ingest(args).map(|_| ()),
        Command::Search(args) => search::run_search(args),
        Command::Weights(args) => weights::run_weights(args),
    }
}

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match wayfare_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "wayfare",
    about = "Search and rank destinations: cities, areas and hotels",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a destination database from a dataset file.
    Ingest(IngestArgs),
    /// Search a destination database.
    Search(SearchArgs),
    /// Write a scoring config file.
    Weights(WeightsArgs),
}

#[cfg(test)]
mod tests;
