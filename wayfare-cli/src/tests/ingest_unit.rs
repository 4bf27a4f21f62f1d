//! Focused unit tests covering ingest CLI configuration and execution.

use super::helpers::Workspace;
use super::*;
use crate::ingest::{DatasetSource, IngestArgs, IngestConfig, execute_ingest};
use camino::Utf8PathBuf;
use rstest::rstest;
use wayfare_core::SqliteDestinationStore;
use wayfare_data::PersistSummary;

const SAMPLE_SUMMARY: PersistSummary = PersistSummary {
    countries: 4,
    cities: 4,
    areas: 4,
    hotels: 5,
};

#[rstest]
fn converting_without_a_dataset_errors() {
    let err = IngestConfig::try_from(IngestArgs::default()).expect_err("missing dataset");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_DATASET);
            assert_eq!(env, ENV_INGEST_DATASET);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn dataset_and_sample_conflict() {
    let args = IngestArgs {
        dataset: Some(Utf8PathBuf::from("dataset.json")),
        sample: true,
        ..IngestArgs::default()
    };
    let err = IngestConfig::try_from(args).expect_err("conflicting sources");
    assert!(matches!(err, CliError::ConflictingDatasetSources));
}

#[rstest]
#[case::explicit(Some("out/db.sqlite"), "out/db.sqlite")]
#[case::default(None, DEFAULT_DATABASE)]
fn output_defaults_to_the_database_filename(
    #[case] output: Option<&str>,
    #[case] expected: &str,
) {
    let args = IngestArgs {
        sample: true,
        output: output.map(Utf8PathBuf::from),
        ..IngestArgs::default()
    };
    let config = IngestConfig::try_from(args).expect("config should build");
    assert_eq!(config.source, DatasetSource::Sample);
    assert_eq!(config.output, Utf8PathBuf::from(expected));
}

#[rstest]
fn validate_sources_reports_missing_dataset() {
    let workspace = Workspace::new();
    let config = IngestConfig {
        source: DatasetSource::File(workspace.path("absent.json")),
        output: workspace.path("destinations.db"),
    };
    let err = config.validate_sources().expect_err("dataset is missing");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_DATASET),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_rejects_directories() {
    let workspace = Workspace::new();
    let dir = workspace.path("dataset.json");
    std::fs::create_dir(dir.as_std_path()).expect("create directory");
    let config = IngestConfig {
        source: DatasetSource::File(dir),
        output: workspace.path("destinations.db"),
    };
    let err = config.validate_sources().expect_err("directory is not a dataset");
    assert!(matches!(err, CliError::MissingSourceFile { .. }));
}

#[rstest]
fn ingesting_the_sample_builds_a_searchable_database() {
    let workspace = Workspace::new();
    let output = workspace.path("nested/destinations.db");
    let config = IngestConfig {
        source: DatasetSource::Sample,
        output: output.clone(),
    };
    let summary = execute_ingest(&config).expect("ingest sample");
    assert_eq!(summary, SAMPLE_SUMMARY);
    SqliteDestinationStore::open(&output).expect("open ingested database");
}

#[rstest]
fn ingesting_a_dataset_file_matches_the_sample() {
    let workspace = Workspace::new();
    let config = IngestConfig {
        source: DatasetSource::File(workspace.sample_dataset_file()),
        output: workspace.path("destinations.db"),
    };
    config.validate_sources().expect("dataset exists");
    let summary = execute_ingest(&config).expect("ingest dataset file");
    assert_eq!(summary, SAMPLE_SUMMARY);
}

#[rstest]
fn malformed_datasets_surface_ingest_errors() {
    let workspace = Workspace::new();
    let path = workspace.path("dataset.json");
    super::helpers::write_utf8(&path, b"not json");
    let config = IngestConfig {
        source: DatasetSource::File(path),
        output: workspace.path("destinations.db"),
    };
    let err = execute_ingest(&config).expect_err("dataset is malformed");
    assert!(matches!(err, CliError::Ingest(_)));
}
