//! Runtime provider configuration and HTTP client construction.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use url::Url;

use dealscout_core::SourceConfig;

use crate::error::ProviderError;

/// Everything a provider adapter needs to talk to one source: identity,
/// normalized base URL, optional credential, extra headers, and HTTP policy.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub name: String,
    /// Human-readable name used as the `store` fallback.
    pub display_name: String,
    /// Always ends with a trailing slash so [`Url::join`] appends rather
    /// than replaces the last path segment.
    pub base_url: Url,
    pub api_key: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl ProviderConfig {
    /// Builds a runtime config from a declared source, resolving the API key
    /// from the environment when `api_key_env` is set.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::InvalidBaseUrl`] if the declared base URL does not
    ///   parse.
    /// - [`ProviderError::MissingCredential`] if `api_key_env` names an
    ///   unset env var; registration code skips such sources.
    pub fn from_source(
        source: &SourceConfig,
        user_agent: &str,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        let normalized = format!("{}/", source.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|e| ProviderError::InvalidBaseUrl {
            base_url: source.base_url.clone(),
            reason: e.to_string(),
        })?;

        let api_key = match &source.api_key_env {
            Some(env_var) => Some(std::env::var(env_var).map_err(|_| {
                ProviderError::MissingCredential {
                    source_name: source.name.clone(),
                    env_var: env_var.clone(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            name: source.name.clone(),
            display_name: source.display().to_owned(),
            base_url,
            api_key,
            headers: source.headers.clone(),
            timeout_secs,
            user_agent: user_agent.to_owned(),
        })
    }

    /// Builds the `reqwest::Client` for this source with configured timeout,
    /// `User-Agent`, declared headers, and any variant-specific extras.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidHeader`] for a header name or value
    /// that cannot be encoded, or [`ProviderError::Http`] if the client
    /// cannot be constructed.
    pub fn build_client(
        &self,
        extra_headers: &[(String, String)],
    ) -> Result<Client, ProviderError> {
        let mut default_headers = HeaderMap::new();
        let declared = self
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .chain(extra_headers.iter().cloned());

        for (name, value) in declared {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|_| ProviderError::InvalidHeader {
                    source_name: self.name.clone(),
                    name: name.clone(),
                })?;
            let header_value =
                HeaderValue::from_str(&value).map_err(|_| ProviderError::InvalidHeader {
                    source_name: self.name.clone(),
                    name,
                })?;
            default_headers.insert(header_name, header_value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(self.user_agent.as_str())
            .default_headers(default_headers)
            .build()?;
        Ok(client)
    }

    /// Joins a relative path onto the normalized base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidBaseUrl`] if the joined URL is not
    /// valid (e.g. a malformed path segment).
    pub fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.base_url
            .join(path)
            .map_err(|e| ProviderError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join \"{path}\": {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(base_url: &str) -> SourceConfig {
        SourceConfig {
            name: "test-source".to_owned(),
            kind: dealscout_core::SourceKind::Api,
            base_url: base_url.to_owned(),
            display_name: Some("Test Source".to_owned()),
            headers: BTreeMap::new(),
            api_key_env: None,
            enabled: true,
        }
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let config = ProviderConfig::from_source(&source("https://deals.example.com"), "ua", 10)
            .expect("config");
        assert_eq!(config.base_url.as_str(), "https://deals.example.com/");
    }

    #[test]
    fn endpoint_joins_relative_paths() {
        let config =
            ProviderConfig::from_source(&source("https://deals.example.com/api"), "ua", 10)
                .expect("config");
        let url = config.endpoint("v2/deals/search").expect("join");
        assert_eq!(url.as_str(), "https://deals.example.com/api/v2/deals/search");
    }

    #[test]
    fn malformed_base_url_is_rejected() {
        let result = ProviderConfig::from_source(&source("not a url"), "ua", 10);
        assert!(matches!(result, Err(ProviderError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn missing_credential_env_var_is_reported() {
        let mut src = source("https://deals.example.com");
        src.api_key_env = Some("DEALSCOUT_TEST_NO_SUCH_KEY".to_owned());
        let result = ProviderConfig::from_source(&src, "ua", 10);
        assert!(matches!(
            result,
            Err(ProviderError::MissingCredential { ref env_var, .. })
                if env_var == "DEALSCOUT_TEST_NO_SUCH_KEY"
        ));
    }
}
