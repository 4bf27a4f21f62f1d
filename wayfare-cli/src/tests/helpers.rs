//! Test helpers for building temporary workspaces and sample databases.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;
use wayfare_data::Dataset;

use crate::ingest::{DatasetSource, IngestConfig, execute_ingest};

/// Temporary directory addressed through UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Ingest the sample dataset into `destinations.db` and return its path.
    pub(super) fn sample_database(&self) -> Utf8PathBuf {
        let output = self.path("destinations.db");
        let config = IngestConfig {
            source: DatasetSource::Sample,
            output: output.clone(),
        };
        execute_ingest(&config).expect("ingest sample dataset");
        output
    }

    /// Write the sample dataset as JSON and return its path.
    pub(super) fn sample_dataset_file(&self) -> Utf8PathBuf {
        let path = self.path("dataset.json");
        let json = serde_json::to_vec(&Dataset::sample()).expect("encode sample dataset");
        write_utf8(&path, &json);
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write file");
}
