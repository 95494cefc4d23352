pub mod app_config;
pub mod artists;
pub mod config;
pub mod matcher;
pub mod report;
pub mod shows;

pub use app_config::{AppConfig, ChannelKind, ChannelSettings, Environment};
pub use artists::{load_artists, AliasTable, ArtistAlias};
pub use config::{load_app_config, load_app_config_from_env};
pub use matcher::{match_shows, MatchResult};
pub use report::{FormatError, Report, ReportFormatter};
pub use shows::ShowRecord;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read artists file {path}: {source}")]
    ArtistsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artists file: {0}")]
    ArtistsFileParse(#[from] serde_yaml::Error),

    #[error("artists config validation failed: {0}")]
    Validation(String),
}
