//! Behaviour-driven step definitions driving the search CLI scenarios.

use super::helpers::Workspace;
use super::*;
use crate::search::run_search_with;
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

/// Aggregates search CLI scenario state so each step only needs a single
/// world argument.
#[derive(Debug)]
struct SearchCommandWorld {
    workspace: Workspace,
    database: RefCell<Option<Utf8PathBuf>>,
    cli_args: RefCell<Vec<String>>,
    outcome: RefCell<Option<Result<String, CliError>>>,
}

impl SearchCommandWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            database: RefCell::new(None),
            cli_args: RefCell::new(Vec::new()),
            outcome: RefCell::new(None),
        }
    }

    fn output(&self) -> String {
        let borrowed = self.outcome.borrow();
        borrowed
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect("expected success")
            .clone()
    }

    fn with_error(&self, check: impl FnOnce(&CliError)) {
        let borrowed = self.outcome.borrow();
        let error = borrowed
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect_err("expected error");
        check(error);
    }
}

#[fixture]
fn world() -> SearchCommandWorld {
    SearchCommandWorld::new()
}

#[given("an ingested sample database")]
fn sample_database(#[from(world)] world: &SearchCommandWorld) {
    let database = world.workspace.sample_database();
    world.database.replace(Some(database));
}

#[given("a database path that does not exist")]
fn missing_database(#[from(world)] world: &SearchCommandWorld) {
    let database = world.workspace.path("absent.db");
    world.database.replace(Some(database));
}

#[given("the search query {query}")]
fn search_query(#[from(world)] world: &SearchCommandWorld, query: String) {
    world.cli_args.borrow_mut().push(query);
}

#[given("table output")]
fn table_output(#[from(world)] world: &SearchCommandWorld) {
    world
        .cli_args
        .borrow_mut()
        .extend(["--format".to_owned(), "table".to_owned()]);
}

#[when("I run the search command")]
fn run_search_command(#[from(world)] world: &SearchCommandWorld) {
    let mut invocation = vec!["wayfare".to_owned(), "search".to_owned()];
    invocation.extend(world.cli_args.borrow().iter().cloned());
    if let Some(database) = world.database.borrow().as_ref() {
        invocation.extend([format!("--{ARG_DATABASE}"), database.to_string()]);
    }
    let outcome = Cli::try_parse_from(invocation)
        .map_err(CliError::ArgumentParsing)
        .and_then(|cli| match cli.command {
            Command::Search(args) => {
                let mut buffer = Vec::new();
                run_search_with(args, &mut buffer)?;
                Ok(String::from_utf8(buffer).expect("utf-8 output"))
            }
            other => panic!("unexpected command {other:?}"),
        });
    world.outcome.replace(Some(outcome));
}

#[then("the first printed result is {name}")]
fn first_result_is(#[from(world)] world: &SearchCommandWorld, name: String) {
    let results: Vec<serde_json::Value> =
        serde_json::from_str(&world.output()).expect("decode JSON output");
    let first = results.first().expect("at least one result");
    assert_eq!(first["name"], serde_json::Value::String(name));
}

#[then("every printed result has a score")]
fn every_result_has_a_score(#[from(world)] world: &SearchCommandWorld) {
    let results: Vec<serde_json::Value> =
        serde_json::from_str(&world.output()).expect("decode JSON output");
    assert!(results.iter().all(|result| result["score"].is_f64()));
}

#[then("the CLI reports that the query is too short")]
fn reports_short_query(#[from(world)] world: &SearchCommandWorld) {
    world.with_error(|error| match error {
        CliError::QueryTooShort { query } => assert_eq!(query, "p"),
        other => panic!("unexpected error {other:?}"),
    });
}

#[then("the CLI reports that the database flag points at a missing file")]
fn reports_missing_database(#[from(world)] world: &SearchCommandWorld) {
    world.with_error(|error| match error {
        CliError::MissingSourceFile { field, .. } => assert_eq!(*field, ARG_DATABASE),
        other => panic!("unexpected error {other:?}"),
    });
}

#[then("the table lists {name} on the first row")]
fn table_lists_first(#[from(world)] world: &SearchCommandWorld, name: String) {
    let output = world.output();
    let first_row = output.lines().nth(1).expect("first table row");
    assert!(first_row.contains(&name), "unexpected row {first_row:?}");
}

macro_rules! register_search_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/search_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: SearchCommandWorld) {
            let _ = world;
        }
    };
}

register_search_scenario!(searching_sample, "searching the sample database");
register_search_scenario!(rejecting_short_query, "rejecting a short query");
register_search_scenario!(rejecting_missing_database, "rejecting a missing database");
register_search_scenario!(printing_table, "printing a table");
