//! Error types emitted by the Wayfare CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use wayfare_core::SqliteDestinationStoreError;
use wayfare_data::{IngestError, PersistDatasetError};
use wayfare_scorer::{PersistConfigError, SearchError};

/// Errors emitted by the Wayfare CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// `ingest` was given both a dataset path and `--sample`.
    #[error("pass either --dataset or --sample, not both")]
    ConflictingDatasetSources,
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The search query is shorter than two characters once trimmed.
    #[error("query {query:?} is too short; use at least two characters")]
    QueryTooShort {
        /// Rejected query as supplied.
        query: String,
    },
    /// Loading the dataset failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),
    /// Persisting the dataset to SQLite failed.
    #[error("failed to persist destinations to {path:?}: {source}")]
    PersistDataset {
        /// Target database.
        path: Utf8PathBuf,
        /// Underlying persistence error.
        #[source]
        source: PersistDatasetError,
    },
    /// Opening the destination database failed.
    #[error(transparent)]
    OpenStore(#[from] SqliteDestinationStoreError),
    /// Reading or writing a scoring config failed.
    #[error(transparent)]
    ScoringConfig(#[from] PersistConfigError),
    /// The search itself failed.
    #[error("search failed: {0}")]
    Search(#[from] SearchError),
    /// Serializing search results failed.
    #[error("failed to serialize search results: {0}")]
    SerialiseResults(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
