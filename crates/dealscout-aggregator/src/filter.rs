//! Pure predicate filtering over an already-fetched deal set.

use dealscout_core::{Deal, DealFilter, NumericRange};

/// Applies every constrained filter dimension, ANDed. A record lacking a
/// field fails any dimension that constrains it; absence is not a
/// wildcard. Independent of provider state.
#[must_use]
pub fn filter_deals(deals: Vec<Deal>, filter: &DealFilter) -> Vec<Deal> {
    deals
        .into_iter()
        .filter(|deal| matches_filter(deal, filter))
        .collect()
}

fn matches_filter(deal: &Deal, filter: &DealFilter) -> bool {
    if let Some(categories) = non_empty(filter.categories.as_deref()) {
        let Some(category) = &deal.category else {
            return false;
        };
        let category = category.to_lowercase();
        if !categories.iter().any(|c| c.to_lowercase() == category) {
            return false;
        }
    }

    if let Some(stores) = non_empty(filter.stores.as_deref()) {
        let store = deal.store.to_lowercase();
        if !stores.iter().any(|s| store.contains(&s.to_lowercase())) {
            return false;
        }
    }

    if !in_range(deal.price, filter.price_range.as_ref()) {
        return false;
    }
    if !in_range(deal.rating, filter.rating_range.as_ref()) {
        return false;
    }

    if let Some(tags) = non_empty(filter.tags.as_deref()) {
        if deal.tags.is_empty() {
            return false;
        }
        let deal_tags: Vec<String> = deal.tags.iter().map(|t| t.to_lowercase()).collect();
        let any_match = tags.iter().any(|wanted| {
            let wanted = wanted.to_lowercase();
            deal_tags.iter().any(|tag| tag.contains(&wanted))
        });
        if !any_match {
            return false;
        }
    }

    true
}

fn non_empty(values: Option<&[String]>) -> Option<&[String]> {
    values.filter(|v| !v.is_empty())
}

/// An open range (both bounds absent) constrains nothing; otherwise a
/// record without the field fails.
fn in_range(value: Option<f64>, range: Option<&NumericRange>) -> bool {
    let Some(range) = range else {
        return true;
    };
    if range.min.is_none() && range.max.is_none() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    if range.min.is_some_and(|min| value < min) {
        return false;
    }
    if range.max.is_some_and(|max| value > max) {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(id: &str, price: Option<f64>, rating: Option<f64>) -> Deal {
        Deal {
            id: id.to_owned(),
            title: format!("Deal {id}"),
            description: None,
            price,
            original_price: None,
            discount: None,
            discount_percentage: None,
            rating,
            review_count: None,
            category: Some("electronics".to_owned()),
            store: "Best Buy".to_owned(),
            url: format!("https://example.com/{id}"),
            image_url: None,
            expiration_date: None,
            tags: vec!["gaming".to_owned()],
            source: "test".to_owned(),
            created_at: "2025-06-01T00:00:00Z".to_owned(),
            popularity: None,
            verified: false,
        }
    }

    fn range(min: Option<f64>, max: Option<f64>) -> NumericRange {
        NumericRange { min, max }
    }

    #[test]
    fn empty_filter_passes_everything() {
        let deals = vec![deal("a", Some(10.0), None), deal("b", None, None)];
        let kept = filter_deals(deals, &DealFilter::default());
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn price_and_rating_ranges_are_anded() {
        // Five records; keep only price in [100, 500] AND rating >= 4.5.
        let deals = vec![
            deal("in-both", Some(250.0), Some(4.7)),
            deal("price-only", Some(250.0), Some(3.9)),
            deal("rating-only", Some(999.0), Some(5.0)),
            deal("neither", Some(50.0), Some(2.0)),
            deal("no-fields", None, None),
        ];
        let filter = DealFilter {
            price_range: Some(range(Some(100.0), Some(500.0))),
            rating_range: Some(range(Some(4.5), None)),
            ..DealFilter::default()
        };
        let kept = filter_deals(deals, &filter);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "in-both");
    }

    #[test]
    fn absent_field_fails_a_constraining_range() {
        let deals = vec![deal("unpriced", None, Some(5.0))];
        let filter = DealFilter {
            price_range: Some(range(Some(1.0), None)),
            ..DealFilter::default()
        };
        assert!(filter_deals(deals, &filter).is_empty());
    }

    #[test]
    fn open_range_does_not_constrain() {
        let deals = vec![deal("unpriced", None, None)];
        let filter = DealFilter {
            price_range: Some(range(None, None)),
            ..DealFilter::default()
        };
        assert_eq!(filter_deals(deals, &filter).len(), 1);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let deals = vec![deal("low-edge", Some(100.0), None), deal("high-edge", Some(500.0), None)];
        let filter = DealFilter {
            price_range: Some(range(Some(100.0), Some(500.0))),
            ..DealFilter::default()
        };
        assert_eq!(filter_deals(deals, &filter).len(), 2);
    }

    #[test]
    fn category_membership_is_case_insensitive() {
        let deals = vec![deal("a", None, None)];
        let filter = DealFilter {
            categories: Some(vec!["Electronics".to_owned()]),
            ..DealFilter::default()
        };
        assert_eq!(filter_deals(deals, &filter).len(), 1);
    }

    #[test]
    fn missing_category_fails_category_filter() {
        let mut d = deal("a", None, None);
        d.category = None;
        let filter = DealFilter {
            categories: Some(vec!["electronics".to_owned()]),
            ..DealFilter::default()
        };
        assert!(filter_deals(vec![d], &filter).is_empty());
    }

    #[test]
    fn store_filter_is_substring_contains_any() {
        let deals = vec![deal("a", None, None)];
        let filter = DealFilter {
            stores: Some(vec!["best".to_owned(), "walmart".to_owned()]),
            ..DealFilter::default()
        };
        assert_eq!(filter_deals(deals, &filter).len(), 1);

        let filter = DealFilter {
            stores: Some(vec!["target".to_owned()]),
            ..DealFilter::default()
        };
        assert!(filter_deals(vec![deal("a", None, None)], &filter).is_empty());
    }

    #[test]
    fn tag_filter_is_substring_and_case_insensitive() {
        let deals = vec![deal("a", None, None)];
        let filter = DealFilter {
            tags: Some(vec!["GAME".to_owned()]),
            ..DealFilter::default()
        };
        assert_eq!(filter_deals(deals, &filter).len(), 1, "\"GAME\" is a substring of \"gaming\"");
    }

    #[test]
    fn empty_tag_list_on_record_fails_tag_filter() {
        let mut d = deal("a", None, None);
        d.tags = Vec::new();
        let filter = DealFilter {
            tags: Some(vec!["gaming".to_owned()]),
            ..DealFilter::default()
        };
        assert!(filter_deals(vec![d], &filter).is_empty());
    }

    #[test]
    fn empty_constraint_lists_pass_everything() {
        let deals = vec![deal("a", None, None)];
        let filter = DealFilter {
            categories: Some(Vec::new()),
            stores: Some(Vec::new()),
            tags: Some(Vec::new()),
            ..DealFilter::default()
        };
        assert_eq!(filter_deals(deals, &filter).len(), 1);
    }
}
