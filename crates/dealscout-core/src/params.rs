//! Request parameter and filter types shared by the façade, CLI, and
//! aggregator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest accepted result cap.
pub const MIN_LIMIT: usize = 1;
/// Largest accepted result cap.
pub const MAX_LIMIT: usize = 100;

/// Default result cap when a caller does not specify one.
pub const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Price,
    Rating,
    Popularity,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Parameters for a cross-provider deal search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Provider names to restrict the search to. Empty or absent means all
    /// registered providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl SearchParams {
    /// A minimal parameter set for the given query, with defaults elsewhere.
    #[must_use]
    pub fn for_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: None,
            min_price: None,
            max_price: None,
            min_rating: None,
            store: None,
            sort_by: None,
            sort_order: None,
            limit: DEFAULT_LIMIT,
            sources: None,
        }
    }

    /// Range-checks the parameters. The aggregator assumes its inputs have
    /// already passed this; the façade and CLI call it before dispatching.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError`] for an empty query, an out-of-bounds limit, an
    /// inverted price range, or a rating outside [0, 5].
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.query.trim().is_empty() {
            return Err(ParamError::EmptyQuery);
        }
        check_limit(self.limit)?;
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(ParamError::InvertedPriceRange { min, max });
            }
        }
        if let Some(rating) = self.min_rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(ParamError::RatingOutOfRange(rating));
            }
        }
        Ok(())
    }
}

/// Range-checks a result cap against [`MIN_LIMIT`]..=[`MAX_LIMIT`].
///
/// # Errors
///
/// Returns [`ParamError::LimitOutOfBounds`] when outside the bound.
pub fn check_limit(limit: usize) -> Result<(), ParamError> {
    if (MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        Ok(())
    } else {
        Err(ParamError::LimitOutOfBounds(limit))
    }
}

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("query must be non-empty")]
    EmptyQuery,

    #[error("limit {0} is outside {MIN_LIMIT}..={MAX_LIMIT}")]
    LimitOutOfBounds(usize),

    #[error("minPrice {min} exceeds maxPrice {max}")]
    InvertedPriceRange { min: f64, max: f64 },

    #[error("minRating {0} is outside [0, 5]")]
    RatingOutOfRange(f64),
}

/// An inclusive numeric range where either bound may be open.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NumericRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Predicate set for filtering an already-fetched deal list.
///
/// All constrained dimensions are ANDed. A record lacking a field fails any
/// dimension that constrains it; absence is not a wildcard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stores: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<NumericRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_range: Option<NumericRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
