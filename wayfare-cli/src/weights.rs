//! Weights command implementation for the Wayfare CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wayfare_core::{CountryBoosts, ScoringConfig, SmallCityThreshold};
use wayfare_scorer::write_scoring_config;

use crate::{ARG_OUTPUT, CliError, ENV_WEIGHTS_OUTPUT};

/// CLI arguments for the `weights` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Write the default scoring config so it can be edited and \
                 passed back to `search --weights`. A `.json` extension \
                 selects JSON; anything else is written as bincode.",
    about = "Write a scoring config file"
)]
#[ortho_config(prefix = "WAYFARE")]
pub(crate) struct WeightsArgs {
    /// File to write.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Small-city hotel-count threshold to store.
    #[arg(long, value_name = "count", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) threshold: Option<i64>,
    /// Include the legacy Thailand country boost.
    #[arg(long)]
    #[serde(default)]
    pub(crate) thailand_boost: bool,
}

impl WeightsArgs {
    pub(crate) fn into_config(self) -> Result<WeightsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        WeightsConfig::try_from(merged)
    }
}

/// Resolved `weights` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WeightsConfig {
    pub(crate) output: Utf8PathBuf,
    pub(crate) scoring: ScoringConfig,
}

impl TryFrom<WeightsArgs> for WeightsConfig {
    type Error = CliError;

    fn try_from(args: WeightsArgs) -> Result<Self, Self::Error> {
        let output = args.output.ok_or(CliError::MissingArgument {
            field: ARG_OUTPUT,
            env: ENV_WEIGHTS_OUTPUT,
        })?;
        let mut scoring = ScoringConfig::default();
        if let Some(threshold) = args.threshold {
            scoring = scoring.with_threshold(SmallCityThreshold::new(threshold));
        }
        if args.thailand_boost {
            scoring = scoring.with_country_boosts(CountryBoosts::historical_thailand());
        }
        Ok(Self { output, scoring })
    }
}

pub(crate) fn run_weights(args: WeightsArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    write_scoring_config(&config.output, &config.scoring)?;
    Ok(())
}
