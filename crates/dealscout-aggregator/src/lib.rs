//! Cross-provider deal aggregation.
//!
//! The [`DealAggregator`] owns an ordered provider registry, fans search
//! and top-deal requests out to the selected providers concurrently with a
//! per-provider timeout, merges whatever succeeded, and applies the
//! ranking, filtering, and near-duplicate comparison passes. A failing or
//! hanging provider never fails the aggregate; its contribution is simply
//! empty.

pub mod aggregator;
pub mod bootstrap;
pub mod compare;
pub mod filter;
pub mod rank;

pub use aggregator::DealAggregator;
pub use bootstrap::build_aggregator;
pub use compare::compare_deals;
pub use filter::filter_deals;
