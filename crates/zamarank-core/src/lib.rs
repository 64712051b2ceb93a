//! Shared domain types and configuration for the Zamarank profile aggregator.

pub mod app_config;
pub mod config;
pub mod handle;
pub mod profile;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use handle::normalize_handle;
pub use profile::{
    CurrentSeason, NormalizedProfile, ProfileStatus, SeasonsMap, Timeframe, SEASON_KEYS,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
