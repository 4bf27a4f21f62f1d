//! Error types raised while searching or persisting scoring configs.
#![forbid(unsafe_code)]

use camino::Utf8PathBuf;
use thiserror::Error;
use wayfare_core::{ConfigError, StoreError};

/// Errors raised by [`HierarchicalSearch`](crate::HierarchicalSearch).
#[derive(Debug, Error)]
pub enum SearchError {
    /// The destination store failed while matching or loading parents.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised while writing or reading a persisted [`ScoringConfig`].
///
/// [`ScoringConfig`]: wayfare_core::ScoringConfig
#[derive(Debug, Error)]
pub enum PersistConfigError {
    /// Creating the parent directory for the output file failed.
    #[error("failed to create parent directory {path}")]
    CreateParent {
        /// Path of the directory that could not be created.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Opening a config file for reading failed.
    #[error("failed to open scoring config at {path}")]
    Open {
        /// Requested file path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Creating, writing or flushing the config file failed.
    #[error("failed to write scoring config at {path}")]
    WriteFile {
        /// Target file path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Encoding the config as JSON failed.
    #[error("failed to encode scoring config as JSON into {path}")]
    EncodeJson {
        /// Target file path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// Decoding a JSON config failed.
    #[error("failed to decode JSON scoring config at {path}")]
    DecodeJson {
        /// Source file path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// Serialising the config to `bincode` failed.
    #[error("failed to serialise scoring config into {path}")]
    Serialise {
        /// Target file path.
        path: Utf8PathBuf,
        /// Source error from `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// Deserialising a `bincode` config failed.
    #[error("failed to deserialise scoring config at {path}")]
    Deserialise {
        /// Source file path.
        path: Utf8PathBuf,
        /// Source error from `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// The loaded config failed validation.
    #[error("scoring config at {path} is invalid")]
    Invalid {
        /// Source file path.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: ConfigError,
    },
}
