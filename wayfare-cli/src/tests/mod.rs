//! Shared test harness modules for the Wayfare CLI.

use super::*;

mod helpers;
mod ingest_unit;
mod search_unit;
mod steps;
