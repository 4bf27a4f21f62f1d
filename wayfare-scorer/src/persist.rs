//! Persist [`ScoringConfig`] values as JSON or `bincode`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use bincode::Options;
use camino::Utf8Path;
use log::info;
use wayfare_core::ScoringConfig;
use wayfare_fs::{ensure_parent_dir, open_utf8_file};

use crate::error::PersistConfigError;

/// On-disk encoding of a scoring config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// Pretty-printed JSON.
    Json,
    /// Compact `bincode`.
    Bincode,
}

impl ConfigFormat {
    /// JSON for a `.json` extension (any case), `bincode` otherwise.
    #[must_use]
    pub fn for_path(path: &Utf8Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Bincode,
        }
    }
}

fn bincode_options() -> impl bincode::Options {
    bincode::DefaultOptions::new()
}

/// Write `config` to `path`, creating parent directories.
///
/// # Errors
/// Returns [`PersistConfigError`] when the directory or file cannot be
/// created or the config cannot be encoded.
pub fn write_scoring_config(
    path: &Utf8Path,
    config: &ScoringConfig,
) -> Result<(), PersistConfigError> {
    ensure_parent_dir(path).map_err(|source| PersistConfigError::CreateParent {
        path: path
            .parent()
            .map_or_else(|| Utf8Path::new(".").to_path_buf(), Utf8Path::to_path_buf),
        source,
    })?;
    let file = File::create(path.as_std_path()).map_err(|source| PersistConfigError::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    let format = ConfigFormat::for_path(path);
    match format {
        ConfigFormat::Json => serde_json::to_writer_pretty(&mut writer, config).map_err(|source| {
            PersistConfigError::EncodeJson {
                path: path.to_path_buf(),
                source,
            }
        })?,
        ConfigFormat::Bincode => bincode_options()
            .serialize_into(&mut writer, config)
            .map_err(|source| PersistConfigError::Serialise {
                path: path.to_path_buf(),
                source,
            })?,
    }
    writer
        .flush()
        .map_err(|source| PersistConfigError::WriteFile {
            path: path.to_path_buf(),
            source,
        })?;
    info!("wrote {format:?} scoring config to {path}");
    Ok(())
}

/// Read and validate a config written by [`write_scoring_config`].
///
/// # Errors
/// Returns [`PersistConfigError`] when the file cannot be opened, decoded,
/// or fails validation.
pub fn read_scoring_config(path: &Utf8Path) -> Result<ScoringConfig, PersistConfigError> {
    let file = open_utf8_file(path).map_err(|source| PersistConfigError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let config: ScoringConfig = match ConfigFormat::for_path(path) {
        ConfigFormat::Json => {
            serde_json::from_reader(reader).map_err(|source| PersistConfigError::DecodeJson {
                path: path.to_path_buf(),
                source,
            })?
        }
        ConfigFormat::Bincode => bincode_options().deserialize_from(reader).map_err(|source| {
            PersistConfigError::Deserialise {
                path: path.to_path_buf(),
                source,
            }
        })?,
    };
    config
        .validate()
        .map_err(|source| PersistConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;
    use wayfare_core::test_support::sample_store;
    use wayfare_core::{CountryBoosts, HotelWeights, SmallCityThreshold};

    use crate::HierarchicalSearch;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temporary directory")
    }

    fn path_in(dir: &TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf8 path")
    }

    fn tuned_config() -> ScoringConfig {
        ScoringConfig::default()
            .with_threshold(SmallCityThreshold::new(50))
            .with_hotel_weights(
                HotelWeights::from_slice(&[0.3, 0.2, 0.7, 0.1, 0.05, 0.123_456_789])
                    .expect("valid weights"),
            )
            .with_country_boosts(CountryBoosts::historical_thailand())
    }

    #[rstest]
    #[case::json("weights.json", ConfigFormat::Json)]
    #[case::upper_json("WEIGHTS.JSON", ConfigFormat::Json)]
    #[case::bincode("weights.bin", ConfigFormat::Bincode)]
    #[case::bare("weights", ConfigFormat::Bincode)]
    fn format_follows_extension(#[case] name: &str, #[case] expected: ConfigFormat) {
        assert_eq!(ConfigFormat::for_path(Utf8Path::new(name)), expected);
    }

    #[rstest]
    #[case("nested/dir/weights.json")]
    #[case("nested/dir/weights.bin")]
    fn configs_round_trip_exactly(temp_dir: TempDir, #[case] name: &str) {
        let path = path_in(&temp_dir, name);
        let config = tuned_config();
        write_scoring_config(&path, &config).expect("write config");
        let loaded = read_scoring_config(&path).expect("read config");
        assert_eq!(loaded, config);

        let store = sample_store();
        let score_bits = |config: &ScoringConfig| -> Vec<(String, u64)> {
            HierarchicalSearch::new(&store, config)
                .search("par")
                .expect("memory store never fails")
                .into_iter()
                .map(|result| (result.name, result.score.to_bits()))
                .collect()
        };
        let original = score_bits(&config);
        assert!(original.iter().any(|(_, bits)| *bits != 0), "scores are non-trivial");
        assert_eq!(score_bits(&loaded), original);
    }

    #[rstest]
    fn missing_files_report_open_errors(temp_dir: TempDir) {
        let path = path_in(&temp_dir, "absent.json");
        let err = read_scoring_config(&path).expect_err("file is missing");
        assert!(matches!(err, PersistConfigError::Open { .. }));
    }

    #[rstest]
    fn out_of_range_json_is_rejected(temp_dir: TempDir) {
        let path = path_in(&temp_dir, "weights.json");
        let mut json = serde_json::to_value(ScoringConfig::default()).expect("encode config");
        json["weights"]["city"]["hotel_count"] = serde_json::json!(1.5);
        std::fs::write(path.as_std_path(), json.to_string()).expect("write json");
        let err = read_scoring_config(&path).expect_err("coefficient out of range");
        assert!(matches!(err, PersistConfigError::DecodeJson { .. }));
    }

    #[rstest]
    fn truncated_bincode_is_rejected(temp_dir: TempDir) {
        let path = path_in(&temp_dir, "weights.bin");
        std::fs::write(path.as_std_path(), [1_u8, 2, 3]).expect("write bytes");
        let err = read_scoring_config(&path).expect_err("payload is truncated");
        assert!(matches!(err, PersistConfigError::Deserialise { .. }));
    }
}
