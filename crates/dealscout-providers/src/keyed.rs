//! Keyed-API provider variant.
//!
//! Talks to marketplace-style JSON APIs that authenticate with an API key
//! and host header pair sent on every request, exposing `/search`,
//! `/trending`, and `/deal/{id}`. Raw items use a camelCase vocabulary
//! (`productName`, `currentPrice`, `listPrice`, …). Items without an id get
//! a deterministic one derived from the item URL.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use dealscout_core::{Deal, SearchParams};

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::http::get_json;
use crate::normalize::{
    any_true, derive_discount_percentage, fallback_created_at, first_count, first_number,
    first_string, first_string_array, url_fingerprint,
};
use crate::{validated, DealProvider};

pub struct KeyedApiProvider {
    config: ProviderConfig,
    client: Client,
}

impl KeyedApiProvider {
    /// Creates the provider. The configured key is sent as `x-api-key`, and
    /// the base URL's host as `x-api-host`, on every request.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the HTTP client cannot be built or a
    /// configured header is malformed.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let mut extra_headers = Vec::new();
        if let Some(key) = &config.api_key {
            extra_headers.push(("x-api-key".to_owned(), key.clone()));
            if let Some(host) = config.base_url.host_str() {
                extra_headers.push(("x-api-host".to_owned(), host.to_owned()));
            }
        }
        let client = config.build_client(&extra_headers)?;
        Ok(Self { config, client })
    }

    async fn try_search_deals(&self, params: &SearchParams) -> Result<Vec<Deal>, ProviderError> {
        let mut url = self.config.endpoint("search")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("query", &params.query);
            if let Some(category) = &params.category {
                query.append_pair("category", category);
            }
            if let Some(min_price) = params.min_price {
                query.append_pair("min_price", &min_price.to_string());
            }
            if let Some(max_price) = params.max_price {
                query.append_pair("max_price", &max_price.to_string());
            }
            if let Some(store) = &params.store {
                query.append_pair("store", store);
            }
            query.append_pair("limit", &params.limit.to_string());
        }

        let body = get_json(&self.client, url).await?;
        Ok(self.collect_deals(body.get("results")))
    }

    async fn try_top_deals(&self, limit: usize) -> Result<Vec<Deal>, ProviderError> {
        let mut url = self.config.endpoint("trending")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let body = get_json(&self.client, url).await?;
        Ok(self.collect_deals(body.get("deals")))
    }

    async fn try_deal_details(&self, deal_id: &str) -> Result<Option<Deal>, ProviderError> {
        let url = self.config.endpoint(&format!("deal/{deal_id}"))?;
        let body = get_json(&self.client, url).await?;
        Ok(self
            .transform_deal(&body)
            .and_then(|deal| validated(deal, &self.config.name)))
    }

    fn collect_deals(&self, raw_deals: Option<&Value>) -> Vec<Deal> {
        raw_deals
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|raw| self.transform_deal(raw))
                    .filter_map(|deal| validated(deal, &self.config.name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Maps one raw camelCase item onto the canonical schema,
    /// first-match-wins per field.
    fn transform_deal(&self, raw: &Value) -> Option<Deal> {
        let title = first_string(raw, &["title", "name", "productName"])?;
        let url = first_string(raw, &["url", "link", "dealUrl"])?;
        let id = first_string(raw, &["id", "dealId"])
            .unwrap_or_else(|| format!("{}-{}", self.config.name, url_fingerprint(&url)));

        let price = first_number(raw, &["price", "currentPrice"]);
        let original_price = first_number(raw, &["originalPrice", "listPrice"]);
        let discount_percentage = first_number(raw, &["discountPercent"]).or_else(|| {
            match (original_price, price) {
                (Some(original), Some(current)) => derive_discount_percentage(original, current),
                _ => None,
            }
        });

        Some(Deal {
            id,
            title,
            description: first_string(raw, &["description", "summary"]),
            price,
            original_price,
            discount: first_number(raw, &["savings", "discountAmount"]),
            discount_percentage,
            rating: first_number(raw, &["rating", "stars"]),
            review_count: first_count(raw, &["reviewCount", "numReviews"]),
            category: first_string(raw, &["category", "department"]),
            store: first_string(raw, &["store", "merchant", "retailer"])
                .unwrap_or_else(|| self.config.display_name.clone()),
            url,
            image_url: first_string(raw, &["image", "imageUrl", "thumbnail"]),
            expiration_date: first_string(raw, &["expires", "expirationDate"]),
            tags: first_string_array(raw, &["tags", "categories"]),
            source: self.config.name.clone(),
            created_at: first_string(raw, &["dateAdded", "publishDate"])
                .unwrap_or_else(fallback_created_at),
            popularity: first_number(raw, &["popularity", "score"]),
            verified: any_true(raw, &["verified", "featured"]),
        })
    }
}

#[async_trait]
impl DealProvider for KeyedApiProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn search_deals(&self, params: &SearchParams) -> Vec<Deal> {
        match self.try_search_deals(params).await {
            Ok(deals) => {
                tracing::debug!(
                    source = %self.config.name,
                    count = deals.len(),
                    "deal search complete"
                );
                deals
            }
            Err(e) => {
                tracing::warn!(source = %self.config.name, error = %e, "deal search failed");
                Vec::new()
            }
        }
    }

    async fn get_top_deals(&self, limit: usize) -> Vec<Deal> {
        match self.try_top_deals(limit).await {
            Ok(deals) => deals,
            Err(e) => {
                tracing::warn!(source = %self.config.name, error = %e, "top deals fetch failed");
                Vec::new()
            }
        }
    }

    async fn get_deal_details(&self, deal_id: &str) -> Option<Deal> {
        match self.try_deal_details(deal_id).await {
            Ok(deal) => deal,
            Err(e) => {
                tracing::warn!(
                    source = %self.config.name,
                    deal_id,
                    error = %e,
                    "deal details fetch failed"
                );
                None
            }
        }
    }
}
