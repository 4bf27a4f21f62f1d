//! Focused unit tests covering search CLI configuration and output.

use super::helpers::Workspace;
use super::*;
use crate::search::{
    OutputFormat, SearchArgs, SearchConfig, execute_search, write_results,
};
use camino::Utf8PathBuf;
use rstest::rstest;
use wayfare_core::{DestinationKind, ScoringConfig, SmallCityThreshold};
use wayfare_scorer::{ScoredResult, write_scoring_config};

fn args_for(query: &str) -> SearchArgs {
    SearchArgs {
        query: Some(query.to_owned()),
        ..SearchArgs::default()
    }
}

fn config_for(database: Utf8PathBuf, query: &str) -> SearchConfig {
    SearchConfig {
        query: query.to_owned(),
        database,
        weights: None,
        threshold: None,
        format: OutputFormat::Json,
    }
}

fn names(results: &[ScoredResult]) -> Vec<&str> {
    results.iter().map(|result| result.name.as_str()).collect()
}

#[rstest]
fn converting_without_a_query_errors() {
    let err = SearchConfig::try_from(SearchArgs::default()).expect_err("missing query");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_QUERY);
            assert_eq!(env, ENV_SEARCH_QUERY);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case::empty("")]
#[case::single("p")]
#[case::padded("  p  ")]
#[case::single_multibyte("é")]
fn short_queries_are_rejected(#[case] query: &str) {
    let err = SearchConfig::try_from(args_for(query)).expect_err("query too short");
    match err {
        CliError::QueryTooShort { query: rejected } => assert_eq!(rejected, query),
        other => panic!("expected QueryTooShort, found {other:?}"),
    }
}

#[rstest]
fn queries_are_trimmed_and_defaults_applied() {
    let config = SearchConfig::try_from(args_for("  pa  ")).expect("config should build");
    assert_eq!(config.query, "pa");
    assert_eq!(config.database, Utf8PathBuf::from(DEFAULT_DATABASE));
    assert_eq!(config.weights, None);
    assert_eq!(config.threshold, None);
    assert_eq!(config.format, OutputFormat::Json);
}

#[rstest]
fn threshold_flags_become_typed_thresholds() {
    let args = SearchArgs {
        threshold: Some(-1),
        format: Some(OutputFormat::Table),
        ..args_for("paris")
    };
    let config = SearchConfig::try_from(args).expect("config should build");
    assert_eq!(config.threshold, Some(SmallCityThreshold::new(-1)));
    assert_eq!(config.format, OutputFormat::Table);
}

#[rstest]
fn validate_sources_reports_missing_database() {
    let workspace = Workspace::new();
    let config = config_for(workspace.path("absent.db"), "paris");
    let err = config.validate_sources().expect_err("database is missing");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_DATABASE),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_missing_weights() {
    let workspace = Workspace::new();
    let config = SearchConfig {
        weights: Some(workspace.path("absent.json")),
        ..config_for(workspace.sample_database(), "paris")
    };
    let err = config.validate_sources().expect_err("weights are missing");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_WEIGHTS),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn searching_the_sample_ranks_locations_before_hotels() {
    let workspace = Workspace::new();
    let config = config_for(workspace.sample_database(), "Paris");
    let results = execute_search(&config).expect("search succeeds");
    assert_eq!(
        names(&results),
        ["Paris", "Eiffel Tower", "Four Seasons Paris"]
    );
    let kinds: Vec<_> = results.iter().map(|result| result.kind).collect();
    assert_eq!(
        kinds,
        [DestinationKind::City, DestinationKind::Area, DestinationKind::Hotel]
    );
}

#[rstest]
fn threshold_override_reclassifies_cities() {
    let workspace = Workspace::new();
    let config = SearchConfig {
        threshold: Some(SmallCityThreshold::new(500)),
        ..config_for(workspace.sample_database(), "Paris")
    };
    let results = execute_search(&config).expect("search succeeds");
    let paris = results.first().expect("Paris matched");
    assert_eq!(paris.kind, DestinationKind::SmallCity);
}

#[rstest]
fn weights_files_are_loaded_before_the_override() {
    let workspace = Workspace::new();
    let weights = workspace.path("weights.json");
    let stored = ScoringConfig::default().with_threshold(SmallCityThreshold::new(500));
    write_scoring_config(&weights, &stored).expect("write weights");

    let config = SearchConfig {
        weights: Some(weights),
        ..config_for(workspace.sample_database(), "Paris")
    };
    config.validate_sources().expect("sources exist");
    assert_eq!(config.scoring_config().expect("load weights"), stored);

    let overridden = SearchConfig {
        threshold: Some(SmallCityThreshold::new(10)),
        ..config
    };
    let scoring = overridden.scoring_config().expect("load weights");
    assert_eq!(scoring.threshold(), SmallCityThreshold::new(10));
}

#[rstest]
fn json_output_is_an_array_of_results() {
    let workspace = Workspace::new();
    let config = config_for(workspace.sample_database(), "Tokyo");
    let results = execute_search(&config).expect("search succeeds");

    let mut buffer = Vec::new();
    write_results(&mut buffer, &results, OutputFormat::Json).expect("write json");
    let decoded: Vec<ScoredResult> = serde_json::from_slice(&buffer).expect("decode output");
    assert_eq!(decoded, results);
}

#[rstest]
fn table_output_lists_ranked_rows() {
    let workspace = Workspace::new();
    let config = config_for(workspace.sample_database(), "Tokyo");
    let results = execute_search(&config).expect("search succeeds");

    let mut buffer = Vec::new();
    write_results(&mut buffer, &results, OutputFormat::Table).expect("write table");
    let text = String::from_utf8(buffer).expect("utf-8 output");
    let mut lines = text.lines();
    assert!(lines.next().expect("header").starts_with("rank"));
    let first = lines.next().expect("first row");
    assert!(first.contains("Tokyo"), "unexpected row {first:?}");
    assert_eq!(lines.count() + 1, results.len());
}

#[rstest]
fn empty_results_print_a_notice() {
    let mut buffer = Vec::new();
    write_results(&mut buffer, &[], OutputFormat::Table).expect("write table");
    assert_eq!(
        String::from_utf8(buffer).expect("utf-8 output"),
        "no destinations matched\n"
    );
}
