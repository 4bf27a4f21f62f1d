//! Raw destination datasets as exchanged on disk.
#![forbid(unsafe_code)]

use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wayfare_fs::open_utf8_file;

/// Errors raised while loading a dataset file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Opening the dataset file failed.
    #[error("failed to open dataset at {path}")]
    Open {
        /// Requested dataset path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The dataset is not valid JSON or does not match the record layout.
    #[error("failed to parse dataset at {path}")]
    Parse {
        /// Dataset path.
        path: Utf8PathBuf,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
}

/// A country row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountryRecord {
    /// Country identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
}

/// A city row with its raw hotel count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CityRecord {
    /// City identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Owning country.
    pub country_id: u64,
    /// Number of hotels in the city.
    pub total_hotels: u64,
}

/// An area row; its hotel count is derived during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaRecord {
    /// Area identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Owning city.
    pub city_id: u64,
}

/// A hotel row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HotelRecord {
    /// Hotel identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Owning city.
    pub city_id: u64,
    /// Owning area, when the hotel sits in one.
    #[serde(default)]
    pub area_id: Option<u64>,
}

/// Raw review scores for a hotel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HotelScoreRecord {
    /// Scored hotel.
    pub hotel_id: u64,
    /// Agoda review score, if known.
    #[serde(default)]
    pub agoda_score: Option<f64>,
    /// Google review score, if known.
    #[serde(default)]
    pub google_score: Option<f64>,
}

/// Outbound travel indicators for a country, already on a 0 to 100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountryOutboundRecord {
    /// Country the indicators describe.
    pub country_id: u64,
    /// Outbound tourism expenditure score.
    #[serde(default)]
    pub expenditure_score: Option<f64>,
    /// Outbound departures score.
    #[serde(default)]
    pub departure_score: Option<f64>,
}

/// Every table of a raw destination dataset.
///
/// Missing tables deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    /// Countries.
    #[serde(default)]
    pub countries: Vec<CountryRecord>,
    /// Cities.
    #[serde(default)]
    pub cities: Vec<CityRecord>,
    /// Areas.
    #[serde(default)]
    pub areas: Vec<AreaRecord>,
    /// Hotels.
    #[serde(default)]
    pub hotels: Vec<HotelRecord>,
    /// Hotel review scores.
    #[serde(default)]
    pub hotel_scores: Vec<HotelScoreRecord>,
    /// Country outbound indicators.
    #[serde(default)]
    pub country_outbound: Vec<CountryOutboundRecord>,
}

impl Dataset {
    /// The built-in demo dataset: four countries with one city and one
    /// landmark area each, and five well-known hotels.
    #[must_use]
    pub fn sample() -> Self {
        let countries = [
            (1, "France"),
            (2, "United Kingdom"),
            (3, "United States"),
            (4, "Japan"),
        ];
        let cities = [
            (1, "Paris", 1, 320),
            (2, "London", 2, 270),
            (3, "New York", 3, 420),
            (4, "Tokyo", 4, 380),
        ];
        let areas = [
            (1, "Eiffel Tower", 1),
            (2, "Buckingham Palace", 2),
            (3, "Central Park", 3),
            (4, "Shibuya Crossing", 4),
        ];
        let hotels = [
            (1, "Hotel Le Meurice", 1, Some(1)),
            (2, "The Ritz London", 2, Some(2)),
            (3, "The Plaza", 3, Some(3)),
            (4, "Park Hyatt Tokyo", 4, Some(4)),
            (5, "Four Seasons Paris", 1, None),
        ];
        let scores = [
            (1, 95.0, 87.0),
            (2, 92.0, 89.0),
            (3, 88.0, 85.0),
            (4, 90.0, 91.0),
            (5, 93.0, 88.0),
        ];
        let outbound = [(1, 75.0, 65.0), (2, 70.0, 60.0), (3, 85.0, 55.0), (4, 80.0, 70.0)];

        Self {
            countries: countries
                .into_iter()
                .map(|(id, name)| CountryRecord {
                    id,
                    name: name.to_owned(),
                })
                .collect(),
            cities: cities
                .into_iter()
                .map(|(id, name, country_id, total_hotels)| CityRecord {
                    id,
                    name: name.to_owned(),
                    country_id,
                    total_hotels,
                })
                .collect(),
            areas: areas
                .into_iter()
                .map(|(id, name, city_id)| AreaRecord {
                    id,
                    name: name.to_owned(),
                    city_id,
                })
                .collect(),
            hotels: hotels
                .into_iter()
                .map(|(id, name, city_id, area_id)| HotelRecord {
                    id,
                    name: name.to_owned(),
                    city_id,
                    area_id,
                })
                .collect(),
            hotel_scores: scores
                .into_iter()
                .map(|(hotel_id, agoda, google)| HotelScoreRecord {
                    hotel_id,
                    agoda_score: Some(agoda),
                    google_score: Some(google),
                })
                .collect(),
            country_outbound: outbound
                .into_iter()
                .map(|(country_id, expenditure, departure)| CountryOutboundRecord {
                    country_id,
                    expenditure_score: Some(expenditure),
                    departure_score: Some(departure),
                })
                .collect(),
        }
    }
}

/// Load a JSON dataset from `path`.
///
/// # Errors
/// Returns [`IngestError::Open`] when the file cannot be opened and
/// [`IngestError::Parse`] when its contents do not match [`Dataset`].
pub fn load_dataset(path: &Utf8Path) -> Result<Dataset, IngestError> {
    let file = open_utf8_file(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset: Dataset =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| IngestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        "loaded dataset {path}: {} countries, {} cities, {} areas, {} hotels",
        dataset.countries.len(),
        dataset.cities.len(),
        dataset.areas.len(),
        dataset.hotels.len()
    );
    Ok(dataset)
}
