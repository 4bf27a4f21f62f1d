//! SQLite persistence for normalised destination datasets.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use rusqlite::{Connection, Error as SqliteError, Params, Transaction};
use thiserror::Error;
use wayfare_core::LocationKind;
use wayfare_core::store::{SQLITE_REBUILD_FTS, SQLITE_SCHEMA};
use wayfare_fs::ensure_parent_dir;

use crate::normalise::NormalisedDataset;

/// Tables cleared before a dataset is written, children first.
const CLEARED_TABLES: [&str; 8] = [
    "hotel_factors",
    "location_factors",
    "hotel_scores",
    "country_outbound",
    "hotel",
    "area",
    "city",
    "country",
];

/// Errors raised when persisting a dataset to SQLite.
#[derive(Debug, Error)]
pub enum PersistDatasetError {
    /// Failed to create the parent directory for the SQLite artefact.
    #[error("failed to create parent directory {path:?}")]
    CreateDirectory {
        /// Path of the directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path:?}")]
    Open {
        /// Destination database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Enabling SQLite foreign keys failed.
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Beginning the transaction failed.
    #[error("failed to begin dataset persistence transaction")]
    BeginTransaction {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Creating the destination schema failed.
    #[error("failed to create destination schema")]
    CreateSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Clearing rows from a previous ingestion failed.
    #[error("failed to clear table {table}")]
    ClearTable {
        /// Table being cleared.
        table: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// An identifier could not be represented as an SQLite integer.
    #[error("{table} id {id} exceeds SQLite i64 range")]
    IdOutOfRange {
        /// Table the row belongs to.
        table: &'static str,
        /// Identifier that failed the conversion.
        id: u64,
    },
    /// Preparing an insert statement failed.
    #[error("failed to prepare insert into {table}")]
    PrepareInsert {
        /// Target table.
        table: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Writing a row failed.
    #[error("failed to persist {table} row {id}")]
    PersistRow {
        /// Target table.
        table: &'static str,
        /// Identifier of the row being persisted.
        id: u64,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Rebuilding the full-text indexes failed.
    #[error("failed to rebuild full-text indexes")]
    RebuildIndex {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Committing the transaction failed.
    #[error("failed to commit dataset persistence transaction")]
    Commit {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Row counts written by [`persist_dataset_to_sqlite`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistSummary {
    /// Countries written.
    pub countries: usize,
    /// Cities written.
    pub cities: usize,
    /// Areas written.
    pub areas: usize,
    /// Hotels written.
    pub hotels: usize,
}

/// Persist a normalised dataset to a SQLite database on disk.
///
/// The function is idempotent: previous rows are cleared and the whole
/// dataset is written in one transaction. Parent directories are created
/// automatically, the schema is initialised if missing, and the FTS5 name
/// indexes are rebuilt before commit.
///
/// # Errors
/// Returns [`PersistDatasetError`] naming the step that failed.
pub fn persist_dataset_to_sqlite(
    path: &Utf8Path,
    dataset: &NormalisedDataset,
) -> Result<PersistSummary, PersistDatasetError> {
    ensure_parent_dir(path).map_err(|source| PersistDatasetError::CreateDirectory {
        path: path
            .parent()
            .map_or_else(|| Utf8Path::new(".").to_path_buf(), Utf8Path::to_path_buf),
        source,
    })?;
    let mut connection =
        Connection::open(path.as_std_path()).map_err(|source| PersistDatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| PersistDatasetError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| PersistDatasetError::BeginTransaction { source })?;

    transaction
        .execute_batch(SQLITE_SCHEMA)
        .map_err(|source| PersistDatasetError::CreateSchema { source })?;
    clear_tables(&transaction)?;
    persist_entities(&transaction, dataset)?;
    persist_raw_scores(&transaction, dataset)?;
    persist_factors(&transaction, dataset)?;
    transaction
        .execute_batch(SQLITE_REBUILD_FTS)
        .map_err(|source| PersistDatasetError::RebuildIndex { source })?;

    transaction
        .commit()
        .map_err(|source| PersistDatasetError::Commit { source })?;

    let summary = PersistSummary {
        countries: dataset.countries.len(),
        cities: dataset.cities.len(),
        areas: dataset.areas.len(),
        hotels: dataset.hotels.len(),
    };
    info!("persisted {summary:?} to {path}");
    Ok(summary)
}

fn clear_tables(transaction: &Transaction<'_>) -> Result<(), PersistDatasetError> {
    for table in CLEARED_TABLES {
        transaction
            .execute(&format!("DELETE FROM {table}"), [])
            .map_err(|source| PersistDatasetError::ClearTable { table, source })?;
    }
    Ok(())
}

fn sql_id(table: &'static str, id: u64) -> Result<i64, PersistDatasetError> {
    i64::try_from(id).map_err(|_| PersistDatasetError::IdOutOfRange { table, id })
}

/// Insert rows into `table` with one prepared statement.
fn insert_rows<T, P>(
    transaction: &Transaction<'_>,
    table: &'static str,
    sql: &str,
    rows: impl IntoIterator<Item = T>,
    mut bind: impl FnMut(T) -> Result<(u64, P), PersistDatasetError>,
) -> Result<(), PersistDatasetError>
where
    P: Params,
{
    let mut statement = transaction
        .prepare(sql)
        .map_err(|source| PersistDatasetError::PrepareInsert { table, source })?;
    for row in rows {
        let (id, params) = bind(row)?;
        statement
            .execute(params)
            .map_err(|source| PersistDatasetError::PersistRow { table, id, source })?;
    }
    Ok(())
}

fn persist_entities(
    transaction: &Transaction<'_>,
    dataset: &NormalisedDataset,
) -> Result<(), PersistDatasetError> {
    insert_rows(
        transaction,
        "country",
        "INSERT INTO country (id, name, total_hotels) VALUES (?1, ?2, ?3)",
        &dataset.countries,
        |country| {
            let params = (
                sql_id("country", country.id)?,
                country.name.as_str(),
                sql_id("country", country.total_hotels)?,
            );
            Ok((country.id, params))
        },
    )?;
    insert_rows(
        transaction,
        "city",
        "INSERT INTO city (id, name, country_id, total_hotels) VALUES (?1, ?2, ?3, ?4)",
        &dataset.cities,
        |city| {
            let params = (
                sql_id("city", city.id)?,
                city.name.as_str(),
                sql_id("country", city.country_id)?,
                sql_id("city", city.hotel_count)?,
            );
            Ok((city.id, params))
        },
    )?;
    insert_rows(
        transaction,
        "area",
        "INSERT INTO area (id, name, city_id, total_hotels) VALUES (?1, ?2, ?3, ?4)",
        &dataset.areas,
        |area| {
            let params = (
                sql_id("area", area.id)?,
                area.name.as_str(),
                sql_id("city", area.city_id)?,
                sql_id("area", area.hotel_count)?,
            );
            Ok((area.id, params))
        },
    )?;
    insert_rows(
        transaction,
        "hotel",
        "INSERT INTO hotel (id, name, city_id, area_id) VALUES (?1, ?2, ?3, ?4)",
        &dataset.hotels,
        |hotel| {
            let area_id = hotel.area_id.map(|id| sql_id("area", id)).transpose()?;
            let params = (
                sql_id("hotel", hotel.id)?,
                hotel.name.as_str(),
                sql_id("city", hotel.city_id)?,
                area_id,
            );
            Ok((hotel.id, params))
        },
    )
}

fn persist_raw_scores(
    transaction: &Transaction<'_>,
    dataset: &NormalisedDataset,
) -> Result<(), PersistDatasetError> {
    insert_rows(
        transaction,
        "hotel_scores",
        "INSERT INTO hotel_scores (hotel_id, agoda_score, google_score) VALUES (?1, ?2, ?3)",
        &dataset.hotel_scores,
        |score| {
            let params = (
                sql_id("hotel_scores", score.hotel_id)?,
                score.agoda_score,
                score.google_score,
            );
            Ok((score.hotel_id, params))
        },
    )?;
    insert_rows(
        transaction,
        "country_outbound",
        "INSERT INTO country_outbound (country_id, expenditure_score, departure_score)
         VALUES (?1, ?2, ?3)",
        &dataset.country_outbound,
        |outbound| {
            let params = (
                sql_id("country_outbound", outbound.country_id)?,
                outbound.expenditure_score,
                outbound.departure_score,
            );
            Ok((outbound.country_id, params))
        },
    )
}

fn persist_factors(
    transaction: &Transaction<'_>,
    dataset: &NormalisedDataset,
) -> Result<(), PersistDatasetError> {
    insert_rows(
        transaction,
        "location_factors",
        "INSERT INTO location_factors
             (kind, location_id, hotel_count, country_hotel_count, expenditure, departure)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        &dataset.location_factors,
        |(location, factors)| {
            let kind = match location.kind {
                LocationKind::City => "city",
                LocationKind::Area => "area",
            };
            let params = (
                kind,
                sql_id("location_factors", location.id)?,
                factors.hotel_count,
                factors.country_hotel_count,
                factors.expenditure,
                factors.departure,
            );
            Ok((location.id, params))
        },
    )?;
    insert_rows(
        transaction,
        "hotel_factors",
        "INSERT INTO hotel_factors (hotel_id, agoda, google, expenditure, departure)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        &dataset.hotel_factors,
        |(hotel_id, factors)| {
            let params = (
                sql_id("hotel_factors", *hotel_id)?,
                factors.agoda,
                factors.google,
                factors.expenditure,
                factors.departure,
            );
            Ok((*hotel_id, params))
        },
    )
}
