use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration for the server and CLI, loaded from the
/// environment by [`crate::config::load_app_config`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Path to the provider sources YAML file.
    pub sources_path: PathBuf,
    /// Per-provider call budget applied by the aggregator; a provider that
    /// exceeds it is treated as failed for that request.
    pub provider_timeout_secs: u64,
    pub provider_user_agent: String,
}
