//! Referential integrity checks over loaded fixtures.

use std::collections::HashSet;
use std::fmt;

use papalote_core::{ProductId, ShopId};

use super::Fixtures;

/// One integrity problem found in the fixtures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// Fixture file the offending record lives in.
    pub file: &'static str,
    /// Record id.
    pub record: String,
    pub message: String,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.file, self.record, self.message)
    }
}

/// Check that every cross-reference resolves and ratings are in range.
#[must_use]
pub fn validate(fixtures: &Fixtures) -> Vec<Problem> {
    use super::files;

    let shops: HashSet<&ShopId> = fixtures.shops.iter().map(|s| &s.id).collect();
    let mut products: HashSet<&ProductId> = fixtures.products.iter().map(|p| &p.id).collect();
    products.extend(fixtures.seller_products.iter().map(|p| &p.id));

    let mut problems = Vec::new();
    let mut push = |file: &'static str, record: &str, message: String| {
        problems.push(Problem {
            file,
            record: record.to_string(),
            message,
        });
    };

    let mut seen = HashSet::new();
    for product in &fixtures.products {
        if !seen.insert(&product.id) {
            push(files::PRODUCTS, product.id.as_str(), "duplicate id".to_string());
        }
        if !shops.contains(&product.shop_id) {
            push(
                files::PRODUCTS,
                product.id.as_str(),
                format!("unknown shop {}", product.shop_id),
            );
        }
        if !(0.0..=5.0).contains(&product.rating) {
            push(
                files::PRODUCTS,
                product.id.as_str(),
                format!("rating {} outside 0..=5", product.rating),
            );
        }
        if product.price.is_sign_negative() {
            push(files::PRODUCTS, product.id.as_str(), "negative price".to_string());
        }
    }

    for review in &fixtures.reviews {
        if !products.contains(&review.product_id) {
            push(
                files::REVIEWS,
                review.id.as_str(),
                format!("unknown product {}", review.product_id),
            );
        }
        if !(1..=5).contains(&review.rating) {
            push(
                files::REVIEWS,
                review.id.as_str(),
                format!("rating {} outside 1..=5", review.rating),
            );
        }
    }

    for order in &fixtures.orders {
        for item in &order.items {
            if !products.contains(&item.product_id) {
                push(
                    files::ORDERS,
                    order.id.as_str(),
                    format!("unknown product {}", item.product_id),
                );
            }
            if !shops.contains(&item.shop_id) {
                push(
                    files::ORDERS,
                    order.id.as_str(),
                    format!("unknown shop {}", item.shop_id),
                );
            }
        }
    }

    for listing in &fixtures.seller_products {
        if !shops.contains(&listing.shop_id) {
            push(
                files::SELLER_PRODUCTS,
                listing.id.as_str(),
                format!("unknown shop {}", listing.shop_id),
            );
        }
    }

    for message in &fixtures.messages {
        if !shops.contains(&message.shop_id) {
            push(
                files::MESSAGES,
                message.id.as_str(),
                format!("unknown shop {}", message.shop_id),
            );
        }
    }

    for favorite in &fixtures.favorites {
        if !products.contains(&favorite.product_id) {
            push(
                files::FAVORITES,
                favorite.buyer_id.as_str(),
                format!("unknown product {}", favorite.product_id),
            );
        }
    }

    problems
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::tests::bundled;

    #[test]
    fn test_bundled_fixtures_are_consistent() {
        let problems = validate(&bundled());
        assert!(problems.is_empty(), "{problems:?}");
    }

    #[test]
    fn test_reports_dangling_shop_and_bad_rating() {
        let mut fixtures = bundled();
        fixtures.products[0].shop_id = ShopId::new("shop-ghost");
        fixtures.reviews[0].rating = 7;

        let problems = validate(&fixtures);
        assert!(problems.iter().any(|p| p.message.contains("shop-ghost")));
        assert!(problems.iter().any(|p| p.message.contains("outside 1..=5")));
        assert!(problems[0].to_string().starts_with("products.json ["));
    }
}
