//! Normalization helpers shared by every provider variant.
//!
//! Each variant maps its own vocabulary of raw field names onto the
//! canonical [`dealscout_core::Deal`] schema with the first-match-wins
//! helpers below; the candidate-name lists themselves are per-variant
//! configuration, not shared logic.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Parses a numeric field that may arrive as a JSON number or as text.
///
/// Textual values are stripped of every character except digits, `.`, and
/// `-` before parsing (`"$1,299.99"` → `1299.99`). Parse failure yields
/// `None`, never zero.
#[must_use]
pub fn clean_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => clean_text_number(s),
        _ => None,
    }
}

/// Text-only form of [`clean_number`], for scraped price/rating strings.
#[must_use]
pub fn clean_text_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// First candidate field that holds a parseable number.
#[must_use]
pub fn first_number(item: &Value, candidates: &[&str]) -> Option<f64> {
    candidates
        .iter()
        .find_map(|key| item.get(key).and_then(clean_number))
}

/// First candidate field that holds a non-negative integer count.
#[must_use]
pub fn first_count(item: &Value, candidates: &[&str]) -> Option<u64> {
    first_number(item, candidates)
        .filter(|n| *n >= 0.0)
        .map(|n| n.trunc() as u64)
}

/// First candidate field that holds a non-empty string.
#[must_use]
pub fn first_string(item: &Value, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|key| {
        item.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
    })
}

/// True if any candidate field is boolean `true`.
#[must_use]
pub fn any_true(item: &Value, candidates: &[&str]) -> bool {
    candidates
        .iter()
        .any(|key| item.get(key).and_then(Value::as_bool) == Some(true))
}

/// First candidate field that yields a non-empty tag list. Accepts either a
/// JSON array of strings or a comma-separated string.
#[must_use]
pub fn first_string_array(item: &Value, candidates: &[&str]) -> Vec<String> {
    for key in candidates {
        match item.get(key) {
            Some(Value::Array(values)) => {
                let tags: Vec<String> = values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToOwned::to_owned)
                    .collect();
                if !tags.is_empty() {
                    return tags;
                }
            }
            Some(Value::String(s)) => {
                let tags: Vec<String> = s
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(ToOwned::to_owned)
                    .collect();
                if !tags.is_empty() {
                    return tags;
                }
            }
            _ => {}
        }
    }
    Vec::new()
}

/// Derives a whole-percent discount from original and current prices.
///
/// Returns `None` when the original price is not positive; a provider that
/// supplies the percentage directly takes precedence over this derivation.
#[must_use]
pub fn derive_discount_percentage(original: f64, current: f64) -> Option<f64> {
    if original <= 0.0 {
        return None;
    }
    Some((((original - current) / original) * 100.0).round())
}

/// RFC 3339 timestamp for raw items that lack one: the time of
/// normalization.
#[must_use]
pub fn fallback_created_at() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Deterministic short fingerprint of a URL, for sources whose raw items
/// carry no id of their own. Same URL, same fingerprint: re-fetching a
/// page yields stable ids.
#[must_use]
pub fn url_fingerprint(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex.chars().take(16).collect()
}
