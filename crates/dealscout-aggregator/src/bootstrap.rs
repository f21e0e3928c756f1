//! Aggregator construction from declared sources.
//!
//! Disabled sources are skipped, as are sources whose credential env var is
//! unset: a missing key demotes the source with a warning instead of
//! failing startup.

use std::sync::Arc;
use std::time::Duration;

use dealscout_core::{AppConfig, SourceConfig, SourceKind, SourcesFile};
use dealscout_providers::{
    ApiDealProvider, DealProvider, KeyedApiProvider, ProviderConfig, ProviderError, ScrapeProvider,
};

use crate::DealAggregator;

/// Builds an aggregator with one registered provider per usable source, in
/// file order.
#[must_use]
pub fn build_aggregator(config: &AppConfig, sources: &SourcesFile) -> DealAggregator {
    let mut aggregator = DealAggregator::new(Duration::from_secs(config.provider_timeout_secs));

    for source in &sources.sources {
        if !source.enabled {
            tracing::info!(source = %source.name, "source disabled; skipping");
            continue;
        }

        match build_provider(source, &config.provider_user_agent, config.provider_timeout_secs) {
            Ok(provider) => {
                tracing::info!(source = %source.name, kind = %source.kind, "registered provider");
                aggregator.add_provider(source.name.clone(), provider);
            }
            Err(ProviderError::MissingCredential { env_var, .. }) => {
                tracing::warn!(
                    source = %source.name,
                    env_var,
                    "credential env var unset; source skipped"
                );
            }
            Err(e) => {
                tracing::warn!(source = %source.name, error = %e, "source construction failed; skipped");
            }
        }
    }

    aggregator
}

fn build_provider(
    source: &SourceConfig,
    user_agent: &str,
    timeout_secs: u64,
) -> Result<Arc<dyn DealProvider>, ProviderError> {
    let config = ProviderConfig::from_source(source, user_agent, timeout_secs)?;
    let provider: Arc<dyn DealProvider> = match source.kind {
        SourceKind::Api => Arc::new(ApiDealProvider::new(config)?),
        SourceKind::Keyed => Arc::new(KeyedApiProvider::new(config)?),
        SourceKind::Scrape => Arc::new(ScrapeProvider::new(config)?),
    };
    Ok(provider)
}
