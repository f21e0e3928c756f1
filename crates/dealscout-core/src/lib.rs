//! Shared types and configuration for dealscout.
//!
//! Defines the canonical [`Deal`] record every provider must produce, the
//! request/filter parameter types used by the tool façade and CLI, and the
//! env/YAML configuration loaders used at startup.

pub mod app_config;
pub mod config;
pub mod deal;
pub mod params;
pub mod sources;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use deal::{Deal, ValidationError};
pub use params::{
    check_limit, DealFilter, NumericRange, ParamError, SearchParams, SortBy, SortOrder,
    DEFAULT_LIMIT, MAX_LIMIT, MIN_LIMIT,
};
pub use sources::{load_sources, SourceConfig, SourceKind, SourcesFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),

    #[error("config validation failed: {0}")]
    Validation(String),
}
