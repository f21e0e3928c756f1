//! Provider adapters for dealscout.
//!
//! Each adapter converts one source's raw results into validated
//! [`dealscout_core::Deal`] records. Three variant families exist:
//! authenticated-API ([`ApiDealProvider`]), keyed-API
//! ([`KeyedApiProvider`]), and scrape-based ([`ScrapeProvider`]). They share
//! the normalization helpers in [`normalize`] but keep their own raw-field
//! vocabularies.

pub mod api;
pub mod config;
pub mod error;
pub mod keyed;
pub mod normalize;
pub mod scrape;

mod http;

use async_trait::async_trait;

use dealscout_core::{Deal, SearchParams};

pub use api::ApiDealProvider;
pub use config::ProviderConfig;
pub use error::ProviderError;
pub use keyed::KeyedApiProvider;
pub use scrape::ScrapeProvider;

/// A source of normalized deals.
///
/// Failure contract: transport and parse failures are recovered inside the
/// implementation (logged and mapped to an empty result) and never cross
/// this boundary. `get_deal_details` returns `None` both when the record is
/// not found and when the call fails; callers cannot distinguish the two at
/// this layer.
#[async_trait]
pub trait DealProvider: Send + Sync {
    /// Registered name of this provider (used for provenance and
    /// per-source selection).
    fn name(&self) -> &str;

    /// Free-text search with optional category/price/store constraints and
    /// a result cap. Returns validated records only.
    async fn search_deals(&self, params: &SearchParams) -> Vec<Deal>;

    /// Up to `limit` trending deals, ordered by the source's own notion of
    /// popularity.
    async fn get_top_deals(&self, limit: usize) -> Vec<Deal>;

    /// Resolve one record by source-local id.
    async fn get_deal_details(&self, deal_id: &str) -> Option<Deal>;
}

/// Validates a freshly normalized record, returning `None` (with a debug
/// log) for records that fail schema validation. A dropped record never
/// aborts its siblings.
fn validated(deal: Deal, source_name: &str) -> Option<Deal> {
    match deal.validate() {
        Ok(()) => Some(deal),
        Err(e) => {
            tracing::debug!(
                source = source_name,
                deal_id = %deal.id,
                error = %e,
                "dropping invalid deal record"
            );
            None
        }
    }
}
