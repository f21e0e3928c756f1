//! The canonical deal record and its validation rules.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A normalized product deal from any provider.
///
/// Constructed once inside a provider adapter from one raw response item and
/// never mutated afterwards; aggregation only reorders and filters the set.
/// Every record surfaced to a caller has passed [`Deal::validate`].
///
/// Wire names are camelCase to match the tool façade contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    /// Unique within its source only; two sources may reuse the same id.
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Absent when the provider could not parse a price. Never coerced to zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    /// In [0.0, 5.0] when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Falls back to the provider's display name during normalization.
    pub store: String,
    /// Absolute http(s) URL. A record with a missing or malformed URL is
    /// invalid and dropped before it reaches a caller.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Name of the originating provider.
    pub source: String,
    /// RFC 3339 timestamp; defaults to the time of normalization when the
    /// raw source item lacks one.
    pub created_at: String,
    /// Source-defined scale; not comparable across sources but used
    /// heuristically for cross-source ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("required field `{0}` is missing or empty")]
    MissingField(&'static str),

    #[error("field `{field}` is not an absolute http(s) URL: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("field `{field}` value {value} is out of range")]
    OutOfRange { field: &'static str, value: f64 },
}

impl Deal {
    /// Checks the schema invariants: required fields present and non-empty,
    /// `url`/`image_url` absolute and well-formed, `rating` within [0, 5].
    ///
    /// A failing record is dropped at normalization; siblings are unaffected.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingField("id"));
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.store.trim().is_empty() {
            return Err(ValidationError::MissingField("store"));
        }
        if self.source.trim().is_empty() {
            return Err(ValidationError::MissingField("source"));
        }

        check_absolute_url("url", &self.url)?;
        if let Some(image_url) = &self.image_url {
            check_absolute_url("imageUrl", image_url)?;
        }

        if let Some(rating) = self.rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(ValidationError::OutOfRange {
                    field: "rating",
                    value: rating,
                });
            }
        }

        Ok(())
    }
}

fn check_absolute_url(field: &'static str, raw: &str) -> Result<(), ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }

    let parsed = url::Url::parse(raw).map_err(|e| ValidationError::InvalidUrl {
        field,
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ValidationError::InvalidUrl {
            field,
            reason: format!("unsupported scheme \"{other}\""),
        }),
    }
}
