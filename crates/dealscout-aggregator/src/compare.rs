//! Near-duplicate resolution across sources.
//!
//! Records are grouped by a normalized title key: lowercase, punctuation
//! stripped, whitespace collapsed, truncated to 50 characters. This is a
//! heuristic: long titles can over-merge past the truncation point and
//! reworded titles under-merge. The exact key construction is load-bearing
//! and must not change without revisiting the grouping trade-offs.

use std::collections::HashMap;

use dealscout_core::Deal;

/// Two prices within this window are considered equivalent; the higher
/// rating wins instead.
const PRICE_TIE_WINDOW: f64 = 5.0;

/// Returns one representative per normalized-title group, groups in
/// first-appearance order. Groups of size 1 pass through unchanged; larger
/// groups pick the cheapest record, except that within the $5 window the
/// higher-rated record wins. Pairs where either price is missing compare
/// by rating alone.
#[must_use]
pub fn compare_deals(deals: &[Deal]) -> Vec<Deal> {
    let mut key_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&Deal>> = HashMap::new();

    for deal in deals {
        let key = normalize_title(&deal.title);
        if !groups.contains_key(&key) {
            key_order.push(key.clone());
        }
        groups.entry(key).or_default().push(deal);
    }

    key_order
        .iter()
        .filter_map(|key| groups.get(key))
        .filter_map(|group| best_of_group(group))
        .cloned()
        .collect()
}

fn best_of_group<'a>(group: &[&'a Deal]) -> Option<&'a Deal> {
    if group.len() <= 1 {
        return group.first().copied();
    }

    let mut ranked: Vec<&Deal> = group.to_vec();
    // The $5 window makes this comparator intransitive in theory; groups
    // are small enough that the sort stays well-behaved.
    ranked.sort_by(|a, b| match (a.price, b.price) {
        (Some(price_a), Some(price_b)) => {
            if (price_a - price_b).abs() < PRICE_TIE_WINDOW {
                rating_of(b).total_cmp(&rating_of(a))
            } else {
                price_a.total_cmp(&price_b)
            }
        }
        _ => rating_of(b).total_cmp(&rating_of(a)),
    });
    ranked.first().copied()
}

fn rating_of(deal: &Deal) -> f64 {
    deal.rating.unwrap_or(0.0)
}

/// Grouping key: lowercase, keep only word characters and whitespace,
/// collapse runs of whitespace, trim, take the first 50 characters.
fn normalize_title(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect();
    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(50)
        .collect()
}
