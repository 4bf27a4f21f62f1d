//! Ingest command implementation for the Wayfare CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wayfare_data::{
    Dataset, NormalisedDataset, PersistSummary, load_dataset, normalise, persist_dataset_to_sqlite,
};

use crate::{
    ARG_DATASET, ARG_OUTPUT, CliError, DEFAULT_DATABASE, ENV_INGEST_DATASET, require_existing,
};

/// CLI arguments for the `ingest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load a JSON destination dataset, normalise hotel counts, \
                 review scores and outbound indicators into 0 to 100 \
                 factors, and write the SQLite database used by `search`. \
                 Paths can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Build a destination database"
)]
#[ortho_config(prefix = "WAYFARE")]
pub(crate) struct IngestArgs {
    /// Path to the JSON dataset.
    #[arg(long = ARG_DATASET, value_name = "path")]
    #[serde(default)]
    pub(crate) dataset: Option<Utf8PathBuf>,
    /// Ingest the built-in sample dataset instead of a file.
    #[arg(long)]
    #[serde(default)]
    pub(crate) sample: bool,
    /// Destination database to create or replace.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl IngestArgs {
    pub(crate) fn into_config(self) -> Result<IngestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        IngestConfig::try_from(merged)
    }
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DatasetSource {
    File(Utf8PathBuf),
    Sample,
}

/// Resolved `ingest` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IngestConfig {
    pub(crate) source: DatasetSource,
    pub(crate) output: Utf8PathBuf,
}

impl IngestConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        match &self.source {
            DatasetSource::File(path) => require_existing(path, ARG_DATASET),
            DatasetSource::Sample => Ok(()),
        }
    }

    fn load(&self) -> Result<Dataset, CliError> {
        match &self.source {
            DatasetSource::File(path) => Ok(load_dataset(path)?),
            DatasetSource::Sample => {
                info!("using the built-in sample dataset");
                Ok(Dataset::sample())
            }
        }
    }
}

impl TryFrom<IngestArgs> for IngestConfig {
    type Error = CliError;

    fn try_from(args: IngestArgs) -> Result<Self, Self::Error> {
        let source = match (args.dataset, args.sample) {
            (Some(_), true) => return Err(CliError::ConflictingDatasetSources),
            (Some(path), false) => DatasetSource::File(path),
            (None, true) => DatasetSource::Sample,
            (None, false) => {
                return Err(CliError::MissingArgument {
                    field: ARG_DATASET,
                    env: ENV_INGEST_DATASET,
                });
            }
        };
        let output = args
            .output
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE));
        Ok(Self { source, output })
    }
}

pub(crate) fn run_ingest(args: IngestArgs) -> Result<PersistSummary, CliError> {
    let config = resolve_ingest_config(args)?;
    execute_ingest(&config)
}

pub(crate) fn resolve_ingest_config(args: IngestArgs) -> Result<IngestConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn execute_ingest(config: &IngestConfig) -> Result<PersistSummary, CliError> {
    let dataset = config.load()?;
    let normalised = normalise(&dataset);
    persist(&config.output, &normalised)
}

fn persist(path: &Utf8Path, normalised: &NormalisedDataset) -> Result<PersistSummary, CliError> {
    persist_dataset_to_sqlite(path, normalised).map_err(|source| CliError::PersistDataset {
        path: path.to_path_buf(),
        source,
    })
}
