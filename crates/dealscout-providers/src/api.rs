//! Authenticated-API provider variant.
//!
//! Talks to JSON deal APIs that take a bearer credential and expose
//! `/v2/deals/search`, `/v2/deals/trending`, and `/v2/deals/{id}`. Raw
//! items use a snake_case vocabulary (`deal_title`, `deal_price`,
//! `list_price`, …). One network call per operation; no retry: a single
//! failure is terminal for that call.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use dealscout_core::{Deal, SearchParams};

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::http::get_json;
use crate::normalize::{
    any_true, derive_discount_percentage, fallback_created_at, first_count, first_number,
    first_string, first_string_array,
};
use crate::{validated, DealProvider};

pub struct ApiDealProvider {
    config: ProviderConfig,
    client: Client,
}

impl ApiDealProvider {
    /// Creates the provider, attaching the bearer credential as an
    /// `Authorization` header on every request.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the HTTP client cannot be built or a
    /// configured header is malformed.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let mut extra_headers = Vec::new();
        if let Some(key) = &config.api_key {
            extra_headers.push(("authorization".to_owned(), format!("Bearer {key}")));
        }
        let client = config.build_client(&extra_headers)?;
        Ok(Self { config, client })
    }

    async fn try_search_deals(&self, params: &SearchParams) -> Result<Vec<Deal>, ProviderError> {
        let mut url = self.config.endpoint("v2/deals/search")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("q", &params.query);
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
        Ok(self.collect_deals(body.get("deals")))
    }

    async fn try_top_deals(&self, limit: usize) -> Result<Vec<Deal>, ProviderError> {
        let mut url = self.config.endpoint("v2/deals/trending")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let body = get_json(&self.client, url).await?;
        Ok(self.collect_deals(body.get("deals")))
    }

    async fn try_deal_details(&self, deal_id: &str) -> Result<Option<Deal>, ProviderError> {
        let url = self.config.endpoint(&format!("v2/deals/{deal_id}"))?;
        let body = get_json(&self.client, url).await?;
        Ok(body
            .get("deal")
            .and_then(|raw| self.transform_deal(raw))
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

    /// Maps one raw snake_case item onto the canonical schema,
    /// first-match-wins per field.
    fn transform_deal(&self, raw: &Value) -> Option<Deal> {
        let id = first_string(raw, &["id", "deal_id"])?;
        let title = first_string(raw, &["title", "deal_title"])?;
        let url = first_string(raw, &["url", "deal_url", "link"])?;

        let price = first_number(raw, &["price", "deal_price"]);
        let original_price = first_number(raw, &["original_price", "list_price"]);
        let discount_percentage = first_number(raw, &["discount_percentage"]).or_else(|| {
            match (original_price, price) {
                (Some(original), Some(current)) => derive_discount_percentage(original, current),
                _ => None,
            }
        });

        Some(Deal {
            id,
            title,
            description: first_string(raw, &["description", "deal_description"]),
            price,
            original_price,
            discount: first_number(raw, &["discount_amount"]),
            discount_percentage,
            rating: first_number(raw, &["rating", "deal_rating"]),
            review_count: first_count(raw, &["review_count", "reviews"]),
            category: first_string(raw, &["category", "deal_category"]),
            store: first_string(raw, &["store", "merchant", "retailer"])
                .unwrap_or_else(|| self.config.display_name.clone()),
            url,
            image_url: first_string(raw, &["image_url", "thumbnail", "image"]),
            expiration_date: first_string(raw, &["expiration_date", "expires_at"]),
            tags: first_string_array(raw, &["tags", "keywords"]),
            source: self.config.name.clone(),
            created_at: first_string(raw, &["created_at", "posted_at"])
                .unwrap_or_else(fallback_created_at),
            popularity: first_number(raw, &["popularity", "thumbs_up", "likes"]),
            verified: any_true(raw, &["verified", "staff_pick"]),
        })
    }
}

#[async_trait]
impl DealProvider for ApiDealProvider {
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
