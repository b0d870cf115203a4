//! Summary statistics over the valid partition and the plain-text summary.

use crate::decimal::{decimal_from_f64, decimal_mean, Fixed2};
use crate::normalize::Product;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Aggregates for one run.
///
/// Price and rating aggregates cover valid records only and are zero when
/// there are none.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportStats {
    pub extracted: usize,
    pub valid: usize,
    pub invalid: usize,
    /// Valid records per category, keys ascending. The empty category is its own bucket.
    pub categories: BTreeMap<String, usize>,
    pub min_price: Decimal,
    pub avg_price: Decimal,
    pub max_price: Decimal,
    pub avg_rating: Decimal,
}

/// Computes [`ReportStats`] from the partition sizes and the valid records.
pub fn compute_stats(extracted: usize, valid: &[Product], invalid: usize) -> ReportStats {
    let mut categories = BTreeMap::new();
    for product in valid {
        *categories.entry(product.category.clone()).or_insert(0) += 1;
    }

    let prices: Vec<f64> = valid.iter().map(|p| p.price).collect();
    let ratings: Vec<f64> = valid.iter().map(|p| p.rating).collect();

    let min_price = prices.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max_price = prices.iter().copied().reduce(f64::max).unwrap_or(0.0);

    ReportStats {
        extracted,
        valid: valid.len(),
        invalid,
        categories,
        min_price: decimal_from_f64(min_price),
        avg_price: decimal_mean(&prices),
        max_price: decimal_from_f64(max_price),
        avg_rating: decimal_mean(&ratings),
    }
}

/// Renders the summary text. Numeric aggregates use two places, half-up.
pub fn render_summary(timestamp_utc: &str, stats: &ReportStats) -> String {
    let mut out = String::new();

    out.push_str(&format!("timestamp_utc: {timestamp_utc}\n"));
    out.push_str(&format!("extracted_items: {}\n", stats.extracted));
    out.push_str(&format!("valid_items: {}\n", stats.valid));
    out.push_str(&format!("invalid_items: {}\n", stats.invalid));
    out.push('\n');

    out.push_str("categories_breakdown:\n");
    for (category, count) in &stats.categories {
        out.push_str(&format!("  - {category}: {count}\n"));
    }
    out.push('\n');

    out.push_str(&format!("price_min: {}\n", Fixed2::new(stats.min_price)));
    out.push_str(&format!("price_avg: {}\n", Fixed2::new(stats.avg_price)));
    out.push_str(&format!("price_max: {}\n", Fixed2::new(stats.max_price)));
    out.push_str(&format!("rating_avg: {}\n", Fixed2::new(stats.avg_rating)));
    out
}
