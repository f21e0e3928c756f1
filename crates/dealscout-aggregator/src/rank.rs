//! Cross-source ranking.
//!
//! A record missing the active sort field ranks as the worst possible
//! value for that field: absent price is +∞ (last when ascending), absent
//! rating/popularity is 0 (last when descending), and an unparseable
//! `created_at` is the epoch.

use chrono::DateTime;

use dealscout_core::{Deal, SortBy, SortOrder};

/// Sorts in place. Stable, so records tied on the key keep their merge
/// order.
pub fn sort_deals(deals: &mut [Deal], sort_by: SortBy, sort_order: SortOrder) {
    deals.sort_by(|a, b| {
        let ordering = sort_key(a, sort_by).total_cmp(&sort_key(b, sort_by));
        match sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn sort_key(deal: &Deal, sort_by: SortBy) -> f64 {
    match sort_by {
        SortBy::Price => deal.price.unwrap_or(f64::INFINITY),
        SortBy::Rating => deal.rating.unwrap_or(0.0),
        SortBy::Popularity => deal.popularity.unwrap_or(0.0),
        SortBy::Date => parse_timestamp(&deal.created_at),
    }
}

/// Millisecond timestamp of `created_at`; RFC 3339 first, then RFC 2822
/// for providers that emit HTTP-style dates. Unparseable values rank as
/// the epoch.
#[allow(clippy::cast_precision_loss)]
fn parse_timestamp(raw: &str) -> f64 {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map_or(0.0, |dt| dt.timestamp_millis() as f64)
}
