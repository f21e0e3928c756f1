//! The aggregator: provider registry, concurrent fan-out, merge passes.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use dealscout_core::{Deal, DealFilter, SearchParams, SortBy, SortOrder};
use dealscout_providers::DealProvider;

use crate::{compare, filter, rank};

/// Per-provider call budget applied to every fan-out call. One broken
/// source caps the aggregate latency at this bound instead of stalling it
/// indefinitely.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Aggregates deals across registered providers.
///
/// The registry is ordered: selection, sequential detail lookups, and
/// [`DealAggregator::get_providers`] all follow registration order. It is
/// owned by the instance and only mutable through explicit add/remove;
/// requests in flight never observe registry mutation.
pub struct DealAggregator {
    providers: Vec<(String, Arc<dyn DealProvider>)>,
    provider_timeout: Duration,
}

impl Default for DealAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_PROVIDER_TIMEOUT)
    }
}

impl DealAggregator {
    #[must_use]
    pub fn new(provider_timeout: Duration) -> Self {
        Self {
            providers: Vec::new(),
            provider_timeout,
        }
    }

    /// Registers a provider under `name`. Re-registering an existing name
    /// replaces the adapter but keeps its registration position.
    pub fn add_provider(&mut self, name: impl Into<String>, provider: Arc<dyn DealProvider>) {
        let name = name.into();
        if let Some(slot) = self.providers.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = provider;
        } else {
            self.providers.push((name, provider));
        }
    }

    pub fn remove_provider(&mut self, name: &str) {
        self.providers.retain(|(n, _)| n != name);
    }

    /// Registered provider names, in registration order.
    #[must_use]
    pub fn get_providers(&self) -> Vec<String> {
        self.providers.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Searches every selected provider concurrently, waits for all of
    /// them (a slow or failed provider never cancels its siblings), then
    /// filters, sorts, and truncates the merged set.
    ///
    /// Assumes `params` has already passed
    /// [`SearchParams::validate`](dealscout_core::SearchParams::validate).
    pub async fn search_deals(&self, params: &SearchParams) -> Vec<Deal> {
        let selected = self.select_providers(params.sources.as_deref());
        let timeout = self.provider_timeout;

        let calls = selected.iter().map(|(name, provider)| async move {
            match tokio::time::timeout(timeout, provider.search_deals(params)).await {
                Ok(deals) => deals,
                Err(_) => {
                    tracing::warn!(
                        source = %name,
                        timeout_secs = timeout.as_secs(),
                        "provider search timed out; treated like any failed source"
                    );
                    Vec::new()
                }
            }
        });

        let mut deals: Vec<Deal> = join_all(calls).await.into_iter().flatten().collect();

        apply_search_filters(&mut deals, params);

        let sort_by = params.sort_by.unwrap_or(SortBy::Popularity);
        let sort_order = params.sort_order.unwrap_or(SortOrder::Desc);
        rank::sort_deals(&mut deals, sort_by, sort_order);
        deals.truncate(params.limit);
        deals
    }

    /// Asks each selected provider for an even share of `limit`
    /// (`ceil(limit / provider_count)`) concurrently, then merges, sorts by
    /// popularity descending, and truncates.
    ///
    /// The even split is a simplicity/fairness trade-off, not a true
    /// global top-k: it under-serves stronger providers when shares are
    /// uneven.
    pub async fn get_top_deals(&self, limit: usize, sources: Option<&[String]>) -> Vec<Deal> {
        let selected = self.select_providers(sources);
        if selected.is_empty() {
            return Vec::new();
        }

        let per_provider = limit.div_ceil(selected.len());
        let timeout = self.provider_timeout;

        let calls = selected.iter().map(|(name, provider)| async move {
            match tokio::time::timeout(timeout, provider.get_top_deals(per_provider)).await {
                Ok(deals) => deals,
                Err(_) => {
                    tracing::warn!(
                        source = %name,
                        timeout_secs = timeout.as_secs(),
                        "provider top-deals timed out; treated like any failed source"
                    );
                    Vec::new()
                }
            }
        });

        let mut deals: Vec<Deal> = join_all(calls).await.into_iter().flatten().collect();
        rank::sort_deals(&mut deals, SortBy::Popularity, SortOrder::Desc);
        deals.truncate(limit);
        deals
    }

    /// Resolves a deal by source-local id.
    ///
    /// With a registered `source` the lookup goes straight to it.
    /// Otherwise providers are tried sequentially in registration order and
    /// the first hit wins; colliding ids across sources are not
    /// disambiguated. Sequential on purpose: once a match is found the
    /// remaining providers are never called.
    pub async fn get_deal_details(&self, deal_id: &str, source: Option<&str>) -> Option<Deal> {
        if let Some(source) = source {
            if let Some((name, provider)) = self.providers.iter().find(|(n, _)| n == source) {
                return self.details_with_timeout(name, provider, deal_id).await;
            }
        }

        for (name, provider) in &self.providers {
            if let Some(deal) = self.details_with_timeout(name, provider, deal_id).await {
                return Some(deal);
            }
        }
        None
    }

    /// Pure filter pass over an already-fetched set; independent of
    /// provider state. See [`filter::filter_deals`].
    #[must_use]
    pub fn filter_deals(&self, deals: Vec<Deal>, deal_filter: &DealFilter) -> Vec<Deal> {
        filter::filter_deals(deals, deal_filter)
    }

    /// Near-duplicate resolution over an already-fetched set. See
    /// [`compare::compare_deals`].
    #[must_use]
    pub fn compare_deals(&self, deals: &[Deal]) -> Vec<Deal> {
        compare::compare_deals(deals)
    }

    async fn details_with_timeout(
        &self,
        name: &str,
        provider: &Arc<dyn DealProvider>,
        deal_id: &str,
    ) -> Option<Deal> {
        match tokio::time::timeout(self.provider_timeout, provider.get_deal_details(deal_id)).await
        {
            Ok(deal) => deal,
            Err(_) => {
                tracing::warn!(
                    source = %name,
                    deal_id,
                    timeout_secs = self.provider_timeout.as_secs(),
                    "provider details timed out"
                );
                None
            }
        }
    }

    /// Providers named in `sources` (registration order preserved), or all
    /// providers when `sources` is absent or empty. Unknown names are
    /// ignored.
    fn select_providers(&self, sources: Option<&[String]>) -> Vec<(String, Arc<dyn DealProvider>)> {
        match sources {
            Some(wanted) if !wanted.is_empty() => self
                .providers
                .iter()
                .filter(|(name, _)| wanted.iter().any(|w| w == name))
                .cloned()
                .collect(),
            _ => self.providers.clone(),
        }
    }
}

/// Post-hoc filters from the search params. Unlike
/// [`filter::filter_deals`], records lacking a constrained numeric field
/// pass these bounds: upstream APIs already applied the caller's
/// constraints where they could, and dropping every unpriced record here
/// would silently erase whole scrape sources.
fn apply_search_filters(deals: &mut Vec<Deal>, params: &SearchParams) {
    if let Some(min_price) = params.min_price {
        deals.retain(|d| d.price.is_none_or(|p| p >= min_price));
    }
    if let Some(max_price) = params.max_price {
        deals.retain(|d| d.price.is_none_or(|p| p <= max_price));
    }
    if let Some(min_rating) = params.min_rating {
        deals.retain(|d| d.rating.is_none_or(|r| r >= min_rating));
    }
    if let Some(store) = &params.store {
        let store = store.to_lowercase();
        deals.retain(|d| d.store.to_lowercase().contains(&store));
    }
}
