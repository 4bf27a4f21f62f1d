//! SQLite-backed destination store using FTS5 prefix matching.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use rusqlite::{Connection, OpenFlags, OptionalExtension, Params, Row};
use thiserror::Error;

use crate::entity::{Area, City, Country, Hotel, LocationRef};
use crate::factors::{HotelFactors, LocationFactors};
use crate::kind::LocationKind;
use crate::query::PrefixQuery;

use super::{DestinationStore, StoreError};

/// DDL for the destination database.
///
/// The FTS5 tables use external content, so they must be rebuilt with
/// [`SQLITE_REBUILD_FTS`] after the base tables are populated.
pub const SQLITE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS country (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    total_hotels INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS city (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    country_id INTEGER NOT NULL REFERENCES country(id),
    total_hotels INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS area (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    city_id INTEGER NOT NULL REFERENCES city(id),
    total_hotels INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS hotel (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    city_id INTEGER NOT NULL REFERENCES city(id),
    area_id INTEGER REFERENCES area(id)
);
CREATE TABLE IF NOT EXISTS hotel_scores (
    hotel_id INTEGER PRIMARY KEY REFERENCES hotel(id),
    agoda_score REAL,
    google_score REAL
);
CREATE TABLE IF NOT EXISTS country_outbound (
    country_id INTEGER PRIMARY KEY REFERENCES country(id),
    expenditure_score REAL,
    departure_score REAL
);
CREATE TABLE IF NOT EXISTS location_factors (
    kind TEXT NOT NULL CHECK (kind IN ('city', 'area')),
    location_id INTEGER NOT NULL,
    hotel_count REAL NOT NULL DEFAULT 0,
    country_hotel_count REAL NOT NULL DEFAULT 0,
    expenditure REAL NOT NULL DEFAULT 0,
    departure REAL NOT NULL DEFAULT 0,
    PRIMARY KEY (kind, location_id)
);
CREATE TABLE IF NOT EXISTS hotel_factors (
    hotel_id INTEGER PRIMARY KEY REFERENCES hotel(id),
    agoda REAL NOT NULL DEFAULT 0,
    google REAL NOT NULL DEFAULT 0,
    expenditure REAL NOT NULL DEFAULT 0,
    departure REAL NOT NULL DEFAULT 0
);
CREATE VIRTUAL TABLE IF NOT EXISTS country_fts USING fts5(name, content='country', content_rowid='id');
CREATE VIRTUAL TABLE IF NOT EXISTS city_fts USING fts5(name, content='city', content_rowid='id');
CREATE VIRTUAL TABLE IF NOT EXISTS area_fts USING fts5(name, content='area', content_rowid='id');
CREATE VIRTUAL TABLE IF NOT EXISTS hotel_fts USING fts5(name, content='hotel', content_rowid='id');
";

/// Rebuild every FTS5 index from its content table.
pub const SQLITE_REBUILD_FTS: &str = "
INSERT INTO country_fts(country_fts) VALUES ('rebuild');
INSERT INTO city_fts(city_fts) VALUES ('rebuild');
INSERT INTO area_fts(area_fts) VALUES ('rebuild');
INSERT INTO hotel_fts(hotel_fts) VALUES ('rebuild');
";

const REQUIRED_TABLES: [&str; 10] = [
    "country",
    "city",
    "area",
    "hotel",
    "location_factors",
    "hotel_factors",
    "country_fts",
    "city_fts",
    "area_fts",
    "hotel_fts",
];

const CITY_COLUMNS: &str = "city.id, city.name, city.country_id, city.total_hotels";
const AREA_COLUMNS: &str = "area.id, area.name, area.city_id, area.total_hotels";

/// Error raised when opening a destination database.
#[derive(Debug, Error)]
pub enum SqliteDestinationStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The database lacks a table the store queries.
    #[error("SQLite database at {path} has no `{table}` table")]
    MissingTable {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Missing table name.
        table: &'static str,
    },
    /// Generic SQLite error while inspecting the schema.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Read-only destination store backed by a SQLite file.
pub struct SqliteDestinationStore {
    path: PathBuf,
    connection: Connection,
}

impl fmt::Debug for SqliteDestinationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteDestinationStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteDestinationStore {
    /// Open an existing destination database read-only.
    ///
    /// # Errors
    /// Returns [`SqliteDestinationStoreError`] when the file cannot be opened
    /// or lacks the expected tables.
    pub fn open<P>(database_path: P) -> Result<Self, SqliteDestinationStoreError>
    where
        P: AsRef<Path>,
    {
        let path = database_path.as_ref().to_path_buf();
        let connection = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| SqliteDestinationStoreError::OpenDatabase {
                path: path.clone(),
                source,
            })?;
        ensure_tables_exist(&connection, &path)?;
        Ok(Self { path, connection })
    }

    /// Path of the backing database.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn rows<T, P, F>(
        &self,
        operation: &'static str,
        sql: &str,
        params: P,
        map: F,
    ) -> Result<Vec<T>, StoreError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut statement = self
            .connection
            .prepare_cached(sql)
            .map_err(|source| StoreError::query(operation, source))?;
        let rows = statement
            .query_map(params, map)
            .map_err(|source| StoreError::query(operation, source))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|source| StoreError::query(operation, source))
    }

    fn row<T, P, F>(
        &self,
        operation: &'static str,
        sql: &str,
        params: P,
        map: F,
    ) -> Result<Option<T>, StoreError>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut statement = self
            .connection
            .prepare_cached(sql)
            .map_err(|source| StoreError::query(operation, source))?;
        statement
            .query_row(params, map)
            .optional()
            .map_err(|source| StoreError::query(operation, source))
    }

    fn match_cities(
        &self,
        operation: &'static str,
        sql: &str,
        query: &PrefixQuery,
    ) -> Result<Vec<City>, StoreError> {
        let Some(expression) = query.to_fts5() else {
            return Ok(Vec::new());
        };
        self.rows(operation, sql, [expression], city_from_row)
    }

    fn match_areas(
        &self,
        operation: &'static str,
        sql: &str,
        query: &PrefixQuery,
    ) -> Result<Vec<Area>, StoreError> {
        let Some(expression) = query.to_fts5() else {
            return Ok(Vec::new());
        };
        self.rows(operation, sql, [expression], area_from_row)
    }
}

fn ensure_tables_exist(
    connection: &Connection,
    path: &Path,
) -> Result<(), SqliteDestinationStoreError> {
    let mut statement =
        connection.prepare("SELECT COUNT(*) FROM sqlite_master WHERE name = ?1")?;
    for table in REQUIRED_TABLES {
        let count: i64 = statement.query_row([table], |row| row.get(0))?;
        if count == 0 {
            return Err(SqliteDestinationStoreError::MissingTable {
                path: path.to_path_buf(),
                table,
            });
        }
    }
    Ok(())
}

fn city_from_row(row: &Row<'_>) -> rusqlite::Result<City> {
    Ok(City {
        id: row.get(0)?,
        name: row.get(1)?,
        country_id: row.get(2)?,
        hotel_count: row.get(3)?,
    })
}

fn area_from_row(row: &Row<'_>) -> rusqlite::Result<Area> {
    Ok(Area {
        id: row.get(0)?,
        name: row.get(1)?,
        city_id: row.get(2)?,
        hotel_count: row.get(3)?,
    })
}

fn hotel_from_row(row: &Row<'_>) -> rusqlite::Result<Hotel> {
    Ok(Hotel {
        id: row.get(0)?,
        name: row.get(1)?,
        city_id: row.get(2)?,
        area_id: row.get(3)?,
    })
}

const fn kind_column(kind: LocationKind) -> &'static str {
    match kind {
        LocationKind::City => "city",
        LocationKind::Area => "area",
    }
}

impl DestinationStore for SqliteDestinationStore {
    fn match_cities_by_name(&self, query: &PrefixQuery) -> Result<Vec<City>, StoreError> {
        let sql = format!(
            "SELECT {CITY_COLUMNS} FROM city_fts
             JOIN city ON city.id = city_fts.rowid
             WHERE city_fts MATCH ?1 ORDER BY city.id"
        );
        self.match_cities("match cities by name", &sql, query)
    }

    fn match_areas_by_name(&self, query: &PrefixQuery) -> Result<Vec<Area>, StoreError> {
        let sql = format!(
            "SELECT {AREA_COLUMNS} FROM area_fts
             JOIN area ON area.id = area_fts.rowid
             WHERE area_fts MATCH ?1 ORDER BY area.id"
        );
        self.match_areas("match areas by name", &sql, query)
    }

    fn match_cities_by_country_name(
        &self,
        query: &PrefixQuery,
    ) -> Result<Vec<City>, StoreError> {
        let sql = format!(
            "SELECT {CITY_COLUMNS} FROM country_fts
             JOIN city ON city.country_id = country_fts.rowid
             WHERE country_fts MATCH ?1 ORDER BY city.id"
        );
        self.match_cities("match cities by country name", &sql, query)
    }

    fn match_areas_by_city_name(&self, query: &PrefixQuery) -> Result<Vec<Area>, StoreError> {
        let sql = format!(
            "SELECT {AREA_COLUMNS} FROM city_fts
             JOIN area ON area.city_id = city_fts.rowid
             WHERE city_fts MATCH ?1 ORDER BY area.id"
        );
        self.match_areas("match areas by city name", &sql, query)
    }

    fn match_hotels_by_name(
        &self,
        query: &PrefixQuery,
        limit: Option<usize>,
    ) -> Result<Vec<Hotel>, StoreError> {
        let Some(expression) = query.to_fts5() else {
            return Ok(Vec::new());
        };
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map_or(-1, |cap| i64::try_from(cap).unwrap_or(i64::MAX));
        self.rows(
            "match hotels by name",
            "SELECT hotel.id, hotel.name, hotel.city_id, hotel.area_id FROM hotel_fts
             JOIN hotel ON hotel.id = hotel_fts.rowid
             WHERE hotel_fts MATCH ?1 ORDER BY hotel.id LIMIT ?2",
            (expression, limit),
            hotel_from_row,
        )
    }

    fn city(&self, id: u64) -> Result<Option<City>, StoreError> {
        let sql = format!("SELECT {CITY_COLUMNS} FROM city WHERE city.id = ?1");
        self.row("load city", &sql, [id], city_from_row)
    }

    fn area(&self, id: u64) -> Result<Option<Area>, StoreError> {
        let sql = format!("SELECT {AREA_COLUMNS} FROM area WHERE area.id = ?1");
        self.row("load area", &sql, [id], area_from_row)
    }

    fn country(&self, id: u64) -> Result<Option<Country>, StoreError> {
        self.row(
            "load country",
            "SELECT id, name, total_hotels FROM country WHERE id = ?1",
            [id],
            |row| {
                Ok(Country {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    total_hotels: row.get(2)?,
                })
            },
        )
    }

    fn location_factors(
        &self,
        location: LocationRef,
    ) -> Result<Option<LocationFactors>, StoreError> {
        self.row(
            "load location factors",
            "SELECT hotel_count, country_hotel_count, expenditure, departure
             FROM location_factors WHERE kind = ?1 AND location_id = ?2",
            (kind_column(location.kind), location.id),
            |row| {
                Ok(LocationFactors {
                    hotel_count: row.get(0)?,
                    country_hotel_count: row.get(1)?,
                    expenditure: row.get(2)?,
                    departure: row.get(3)?,
                })
            },
        )
    }

    fn hotel_factors(&self, hotel_id: u64) -> Result<Option<HotelFactors>, StoreError> {
        self.row(
            "load hotel factors",
            "SELECT agoda, google, expenditure, departure FROM hotel_factors WHERE hotel_id = ?1",
            [hotel_id],
            |row| {
                Ok(HotelFactors {
                    agoda: row.get(0)?,
                    google: row.get(1)?,
                    expenditure: row.get(2)?,
                    departure: row.get(3)?,
                })
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_store, write_sqlite_database};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn open_sample(temp_dir: &TempDir) -> SqliteDestinationStore {
        let path = temp_dir.path().join("destinations.db");
        write_sqlite_database(&path, &sample_store()).expect("persist fixture database");
        SqliteDestinationStore::open(&path).expect("open store")
    }

    #[rstest]
    fn prefix_queries_hit_fts_index(temp_dir: TempDir) {
        let store = open_sample(&temp_dir);
        let cities = store
            .match_cities_by_name(&PrefixQuery::parse("Par"))
            .expect("query cities");
        assert_eq!(
            cities.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            ["Paris"]
        );
        let by_country = store
            .match_cities_by_country_name(&PrefixQuery::parse("united"))
            .expect("query by country");
        assert_eq!(
            by_country.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            ["London", "New York"]
        );
    }

    #[rstest]
    #[case::country_index("country_fts")]
    #[case::area_index("area_fts")]
    #[case::hotel_index("hotel_fts")]
    fn opening_rejects_missing_name_indexes(temp_dir: TempDir, #[case] table: &'static str) {
        let path = temp_dir.path().join("destinations.db");
        write_sqlite_database(&path, &sample_store()).expect("persist fixture database");
        Connection::open(&path)
            .and_then(|connection| connection.execute_batch(&format!("DROP TABLE {table};")))
            .expect("drop index table");

        let err = SqliteDestinationStore::open(&path).expect_err("index table is missing");
        match err {
            SqliteDestinationStoreError::MissingTable { table: missing, .. } => {
                assert_eq!(missing, table);
            }
            other => panic!("expected MissingTable, found {other:?}"),
        }
    }

    #[rstest]
    fn hotel_limit_is_optional(temp_dir: TempDir) {
        let store = open_sample(&temp_dir);
        let query = PrefixQuery::parse("the");
        let all = store.match_hotels_by_name(&query, None).expect("unlimited");
        let capped = store.match_hotels_by_name(&query, Some(1)).expect("capped");
        assert_eq!(all.len(), 2);
        assert_eq!(capped.len(), 1);
    }

    #[rstest]
    fn punctuation_in_queries_is_harmless(temp_dir: TempDir) {
        let store = open_sample(&temp_dir);
        let hotels = store
            .match_hotels_by_name(&PrefixQuery::parse("\"park\" hy*"), None)
            .expect("quoted tokens never reach the FTS parser raw");
        assert_eq!(
            hotels.iter().map(|h| h.name.as_str()).collect::<Vec<_>>(),
            ["Park Hyatt Tokyo"]
        );
    }

    #[rstest]
    fn factors_round_trip_through_sqlite(temp_dir: TempDir) {
        let store = open_sample(&temp_dir);
        let factors = store
            .location_factors(LocationRef::city(1))
            .expect("load factors")
            .expect("paris has factors");
        assert_eq!(factors.hotel_count.to_bits(), 76.0_f64.to_bits());
        assert_eq!(
            store.location_factors(LocationRef::area(99)).expect("load"),
            None
        );
    }

    #[rstest]
    fn open_rejects_databases_without_schema(temp_dir: TempDir) {
        let path = temp_dir.path().join("empty.db");
        Connection::open(&path).expect("create empty database");
        let err = SqliteDestinationStore::open(&path).expect_err("schema check");
        assert!(matches!(
            err,
            SqliteDestinationStoreError::MissingTable { table: "country", .. }
        ));
    }

    #[rstest]
    fn open_reports_missing_files(temp_dir: TempDir) {
        let path = temp_dir.path().join("absent.db");
        let err = SqliteDestinationStore::open(&path).expect_err("missing file");
        assert!(matches!(
            err,
            SqliteDestinationStoreError::OpenDatabase { .. }
        ));
    }
}
