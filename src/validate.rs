//! Business-rule validation and partitioning of normalized products.

use crate::normalize::Product;
use log::{debug, warn};
use serde::Serialize;

pub const NAME_REQUIRED: &str = "name must be non-empty";
pub const URL_REQUIRED: &str = "url must be present";
pub const PRICE_NOT_POSITIVE: &str = "price must be > 0";
pub const RATING_OUT_OF_RANGE: &str = "rating must be between 0 and 5";
pub const REVIEWS_NEGATIVE: &str = "reviews_count must be >= 0";

/// A product that failed one or more rules.
///
/// Serializes as `{"errors": [...], "id": ..., "item": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub id: String,
    /// Violated rules, in rule order.
    pub errors: Vec<String>,
    /// Full snapshot of the rejected record.
    pub item: Product,
}

/// Products split by validity, each side sorted by identifier.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub valid: Vec<Product>,
    pub invalid: Vec<ValidationError>,
}

/// Returns every rule the product violates, in fixed rule order.
///
/// All rules are evaluated; an empty result means the product is valid.
pub fn validate_product(product: &Product) -> Vec<String> {
    let mut errors = Vec::new();

    if product.name.is_empty() {
        errors.push(NAME_REQUIRED.to_string());
    }
    if product.url.is_empty() {
        errors.push(URL_REQUIRED.to_string());
    }

    let price_ok = product.price > 0.0;
    if !price_ok {
        errors.push(PRICE_NOT_POSITIVE.to_string());
    }
    if !(0.0..=5.0).contains(&product.rating) {
        errors.push(RATING_OUT_OF_RANGE.to_string());
    }
    if product.reviews_count < 0 {
        errors.push(REVIEWS_NEGATIVE.to_string());
    }

    errors
}

/// Splits products into valid and invalid sets.
///
/// Both sets are sorted ascending by identifier. The sort is stable, so
/// records sharing an identifier keep their input order.
pub fn partition_valid(products: Vec<Product>) -> Partition {
    let mut partition = Partition::default();

    for product in products {
        let errors = validate_product(&product);
        if errors.is_empty() {
            debug!("Product {} is valid", product.id);
            partition.valid.push(product);
        } else {
            warn!("Product {} rejected: {}", product.id, errors.join(", "));
            partition.invalid.push(ValidationError {
                id: product.id.clone(),
                errors,
                item: product,
            });
        }
    }

    partition.valid.sort_by(|a, b| a.id.cmp(&b.id));
    partition.invalid.sort_by(|a, b| a.id.cmp(&b.id));
    partition
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: "Kettle".to_string(),
            price: 39.99,
            currency: "USD".to_string(),
            category: "kitchen".to_string(),
            rating: 4.5,
            reviews_count: 10,
            in_stock: true,
            url: "/p/kettle".to_string(),
        }
    }

    #[test]
    fn test_valid_product_has_no_errors() {
        assert!(validate_product(&product("a")).is_empty());
    }

    #[test]
    fn test_all_rules_collected_in_order() {
        let p = Product {
            name: String::new(),
            url: String::new(),
            price: -1.0,
            rating: -1.0,
            reviews_count: -1,
            ..product("a")
        };

        assert_eq!(
            validate_product(&p),
            vec![
                NAME_REQUIRED,
                URL_REQUIRED,
                PRICE_NOT_POSITIVE,
                RATING_OUT_OF_RANGE,
                REVIEWS_NEGATIVE
            ]
        );
    }

    #[test]
    fn test_price_boundary() {
        let zero = Product {
            price: 0.0,
            ..product("a")
        };
        assert_eq!(validate_product(&zero), vec![PRICE_NOT_POSITIVE]);

        let tiny = Product {
            price: 0.01,
            ..product("a")
        };
        assert!(validate_product(&tiny).is_empty());
    }

    #[test]
    fn test_rating_bounds_are_inclusive() {
        for rating in [0.0, 5.0] {
            let p = Product {
                rating,
                ..product("a")
            };
            assert!(validate_product(&p).is_empty(), "rating {rating}");
        }

        let over = Product {
            rating: 5.01,
            ..product("a")
        };
        assert_eq!(validate_product(&over), vec![RATING_OUT_OF_RANGE]);
    }

    #[test]
    fn test_zero_reviews_is_valid() {
        let p = Product {
            reviews_count: 0,
            ..product("a")
        };
        assert!(validate_product(&p).is_empty());
    }

    #[test]
    fn test_partition_sorts_by_id() {
        let bad = |id: &str| Product {
            price: -1.0,
            ..product(id)
        };
        let products = vec![product("c"), bad("z"), product("a"), bad("m"), product("b")];

        let partition = partition_valid(products);

        let valid_ids: Vec<_> = partition.valid.iter().map(|p| p.id.as_str()).collect();
        let invalid_ids: Vec<_> = partition.invalid.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(valid_ids, vec!["a", "b", "c"]);
        assert_eq!(invalid_ids, vec!["m", "z"]);
    }

    #[test]
    fn test_invalid_keeps_full_snapshot() {
        let p = Product {
            rating: 7.0,
            ..product("x")
        };

        let partition = partition_valid(vec![p.clone()]);
        assert!(partition.valid.is_empty());

        let error = &partition.invalid[0];
        assert_eq!(error.id, "x");
        assert_eq!(error.errors, vec![RATING_OUT_OF_RANGE]);
        assert_eq!(error.item, p);
    }

    #[test]
    fn test_partition_empty() {
        let partition = partition_valid(Vec::new());
        assert!(partition.valid.is_empty());
        assert!(partition.invalid.is_empty());
    }
}
