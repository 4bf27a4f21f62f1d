//! Dataset ingestion for the Wayfare engine.
//!
//! Responsibilities:
//! - Load raw destination datasets from JSON files.
//! - Normalise raw hotel counts, review scores and outbound indicators into
//!   0 to 100 factors.
//! - Persist the result to the SQLite schema read by
//!   [`SqliteDestinationStore`](wayfare_core::SqliteDestinationStore),
//!   including its FTS5 name indexes.
//!
//! Boundaries:
//! - Do not encode scoring rules (live in `wayfare-scorer`).
//! - The schema itself is owned by `wayfare-core` so reader and writer
//!   cannot drift.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use wayfare_data::{Dataset, normalise, persist_dataset_to_sqlite};
//!
//! let normalised = normalise(&Dataset::sample());
//! persist_dataset_to_sqlite(Utf8Path::new("artifacts/destinations.db"), &normalised)
//!     .expect("persist destinations");
//! ```

mod dataset;
mod normalise;
mod sqlite;

pub use dataset::{
    AreaRecord, CityRecord, CountryOutboundRecord, CountryRecord, Dataset, HotelRecord,
    HotelScoreRecord, IngestError, load_dataset,
};
pub use normalise::{COUNTRY_RELATIVE_MINIMUM, NormalisedDataset, normalise};
pub use sqlite::{PersistDatasetError, PersistSummary, persist_dataset_to_sqlite};
