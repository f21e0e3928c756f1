//! Scrape-based provider variant.
//!
//! Fetches an HTML document per call and extracts candidate deal blocks
//! with the ordered structural markers in [`extract`]. A block missing a
//! usable title or link is discarded silently; that is normal listing
//! noise, not an error. Relative URLs are resolved against the provider
//! base URL before validation. Scraped records carry deterministic ids
//! derived from their resolved URL.

mod extract;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use dealscout_core::{Deal, SearchParams};

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::http::get_text;
use crate::normalize::{
    clean_text_number, derive_discount_percentage, fallback_created_at, url_fingerprint,
};
use crate::{validated, DealProvider};

use extract::{
    extract_deal_blocks, first_href, first_img_src, heading_text, resolve_url, text_by_class,
    DESCRIPTION_CLASSES, ORIGINAL_PRICE_CLASSES, PRICE_CLASSES, RATING_CLASSES, STORE_CLASSES,
    TITLE_CLASSES,
};

pub struct ScrapeProvider {
    config: ProviderConfig,
    client: Client,
}

impl ScrapeProvider {
    /// Creates the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the HTTP client cannot be built or a
    /// configured header is malformed.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = config.build_client(&[])?;
        Ok(Self { config, client })
    }

    async fn try_search_deals(&self, params: &SearchParams) -> Result<Vec<Deal>, ProviderError> {
        let mut url = self.config.endpoint("search")?;
        url.query_pairs_mut().append_pair("q", &params.query);

        let html = get_text(&self.client, url).await?;
        Ok(self.deals_from_listing(&html, params.limit))
    }

    async fn try_top_deals(&self, limit: usize) -> Result<Vec<Deal>, ProviderError> {
        let url = self.config.endpoint("hot-deals")?;
        let html = get_text(&self.client, url).await?;
        Ok(self.deals_from_listing(&html, limit))
    }

    async fn try_deal_details(&self, deal_id: &str) -> Result<Option<Deal>, ProviderError> {
        let url = self.config.endpoint(&format!("deal/{deal_id}"))?;
        let html = get_text(&self.client, url.clone()).await?;
        Ok(self
            .deal_from_page(&html, deal_id, &url)
            .and_then(|deal| validated(deal, &self.config.name)))
    }

    fn deals_from_listing(&self, html: &str, limit: usize) -> Vec<Deal> {
        extract_deal_blocks(html)
            .into_iter()
            .filter_map(|block| self.deal_from_block(block))
            .filter_map(|deal| validated(deal, &self.config.name))
            .take(limit)
            .collect()
    }

    /// Builds one record from a listing block. Blocks without a title or
    /// link yield `None` and are skipped without ceremony.
    fn deal_from_block(&self, block: &str) -> Option<Deal> {
        let title = text_by_class(block, &TITLE_CLASSES).or_else(|| heading_text(block))?;
        let href = first_href(block)?;
        let url = resolve_url(&self.config.base_url, &href)?;

        let price = text_by_class(block, &PRICE_CLASSES)
            .as_deref()
            .and_then(clean_text_number);
        let original_price = text_by_class(block, &ORIGINAL_PRICE_CLASSES)
            .as_deref()
            .and_then(clean_text_number);
        let discount_percentage = match (original_price, price) {
            (Some(original), Some(current)) => derive_discount_percentage(original, current),
            _ => None,
        };

        let image_url = first_img_src(block)
            .and_then(|src| resolve_url(&self.config.base_url, &src));

        Some(Deal {
            id: format!("{}-{}", self.config.name, url_fingerprint(&url)),
            title,
            description: None,
            price,
            original_price,
            discount: None,
            discount_percentage,
            rating: None,
            review_count: None,
            category: None,
            store: text_by_class(block, &STORE_CLASSES)
                .unwrap_or_else(|| self.config.display_name.clone()),
            url,
            image_url,
            expiration_date: None,
            tags: Vec::new(),
            source: self.config.name.clone(),
            created_at: fallback_created_at(),
            popularity: None,
            verified: false,
        })
    }

    /// Builds one record from a detail page; the record URL is the page
    /// that was fetched.
    fn deal_from_page(&self, html: &str, deal_id: &str, page_url: &Url) -> Option<Deal> {
        let title = heading_text(html).or_else(|| text_by_class(html, &TITLE_CLASSES))?;

        let price = text_by_class(html, &PRICE_CLASSES)
            .as_deref()
            .and_then(clean_text_number);
        let original_price = text_by_class(html, &ORIGINAL_PRICE_CLASSES)
            .as_deref()
            .and_then(clean_text_number);
        let discount_percentage = match (original_price, price) {
            (Some(original), Some(current)) => derive_discount_percentage(original, current),
            _ => None,
        };

        Some(Deal {
            id: deal_id.to_owned(),
            title,
            description: text_by_class(html, &DESCRIPTION_CLASSES),
            price,
            original_price,
            discount: None,
            discount_percentage,
            rating: text_by_class(html, &RATING_CLASSES)
                .as_deref()
                .and_then(clean_text_number),
            review_count: None,
            category: None,
            store: text_by_class(html, &STORE_CLASSES)
                .unwrap_or_else(|| self.config.display_name.clone()),
            url: page_url.to_string(),
            image_url: first_img_src(html)
                .and_then(|src| resolve_url(&self.config.base_url, &src)),
            expiration_date: None,
            tags: Vec::new(),
            source: self.config.name.clone(),
            created_at: fallback_created_at(),
            popularity: None,
            verified: false,
        })
    }
}

#[async_trait]
impl DealProvider for ScrapeProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn search_deals(&self, params: &SearchParams) -> Vec<Deal> {
        match self.try_search_deals(params).await {
            Ok(deals) => {
                tracing::debug!(
                    source = %self.config.name,
                    count = deals.len(),
                    "scrape search complete"
                );
                deals
            }
            Err(e) => {
                tracing::warn!(source = %self.config.name, error = %e, "scrape search failed");
                Vec::new()
            }
        }
    }

    async fn get_top_deals(&self, limit: usize) -> Vec<Deal> {
        match self.try_top_deals(limit).await {
            Ok(deals) => deals,
            Err(e) => {
                tracing::warn!(source = %self.config.name, error = %e, "scrape top deals failed");
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
                    "scrape details failed"
                );
                None
            }
        }
    }
}
