//! Provider source declarations loaded from `config/sources.yaml`.
//!
//! Credentials never live in the file; a source references the environment
//! variable holding its key via `api_key_env`.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Which adapter family a source is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Authenticated JSON API (bearer credential).
    Api,
    /// Keyed JSON API (key + host headers).
    Keyed,
    /// HTML scraping.
    Scrape,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Api => write!(f, "api"),
            SourceKind::Keyed => write!(f, "keyed"),
            SourceKind::Scrape => write!(f, "scrape"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub kind: SourceKind,
    pub base_url: String,
    /// Display name used as the `store` fallback; defaults to `name`.
    pub display_name: Option<String>,
    /// Extra headers sent on every request to this source.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Name of the env var holding this source's API key, if it needs one.
    pub api_key_env: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl SourceConfig {
    /// Display name for `store` fallbacks: `display_name` or `name`.
    #[must_use]
    pub fn display(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<SourceConfig>,
}

/// Load and validate the provider sources configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let sources_file: SourcesFile = serde_yaml::from_str(&content)?;
    validate_sources(&sources_file)?;

    Ok(sources_file)
}

fn validate_sources(sources_file: &SourcesFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for source in &sources_file.sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(source.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate source name: '{}'",
                source.name
            )));
        }

        let parsed = url::Url::parse(&source.base_url).map_err(|e| {
            ConfigError::Validation(format!(
                "source '{}' has malformed base_url '{}': {e}",
                source.name, source.base_url
            ))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "source '{}' base_url must be http(s), got '{}'",
                source.name,
                parsed.scheme()
            )));
        }
    }

    Ok(())
}
