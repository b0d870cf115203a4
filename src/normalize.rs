//! Normalization from [`RawRecord`] text into typed [`Product`] values.
//!
//! Normalization never fails. A field that cannot be parsed is stored as an
//! out-of-range sentinel (`-1.0` for price and rating, `-1` for the review
//! count) so that [`crate::validate`] can reject the record with a message.

use crate::extract::RawRecord;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use sha1::{Digest, Sha1};
use std::num::IntErrorKind;
use std::str::FromStr;
use std::sync::LazyLock;

/// Sentinel stored when a price or rating cannot be parsed.
pub const MISSING_NUMBER: f64 = -1.0;
/// Sentinel stored when a review count cannot be parsed.
pub const MISSING_COUNT: i64 = -1;
/// Currency code used when none can be detected.
pub const UNKNOWN_CURRENCY: &str = "UNK";

/// Length of a derived identifier, in hex characters.
const DERIVED_ID_LEN: usize = 12;

/// Currency symbols, checked in this order; the first one present wins.
const CURRENCY_SYMBOLS: [(&str, &str); 3] = [("$", "USD"), ("€", "EUR"), ("£", "GBP")];
/// Literal codes checked against the uppercased text when no symbol matched.
const CURRENCY_CODES: [&str; 3] = ["USD", "EUR", "GBP"];

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?[0-9]+(?:\.[0-9]+)?").expect("valid decimal regex"));
static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?[0-9]+").expect("valid integer regex"));

/// A typed product listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    /// ISO code or [`UNKNOWN_CURRENCY`].
    pub currency: String,
    /// Empty when the card had no category.
    pub category: String,
    pub rating: f64,
    pub reviews_count: i64,
    pub in_stock: bool,
    pub url: String,
}

/// Converts a raw card into a [`Product`], substituting sentinels for
/// unparseable numbers.
pub fn normalize(record: &RawRecord) -> Product {
    let name = record.name.trim();
    let url = record.url.trim();

    Product {
        id: stable_id(name, url, record.index, record.data_id.as_deref()),
        name: name.to_string(),
        price: parse_price(&record.price_text).unwrap_or(MISSING_NUMBER),
        currency: parse_currency(&record.price_text).to_string(),
        category: record
            .category
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        rating: parse_rating(&record.rating_text).unwrap_or(MISSING_NUMBER),
        reviews_count: parse_reviews_count(&record.reviews_text).unwrap_or(MISSING_COUNT),
        in_stock: parse_in_stock(&record.stock_text),
        url: url.to_string(),
    }
}

/// Returns the explicit identifier if it is non-blank, otherwise the first 12
/// hex characters of the SHA-1 of `name|url|index`.
///
/// # Example
///
/// ```
/// use listing_pipeline::normalize::stable_id;
///
/// assert_eq!(stable_id("Mug", "/mug", 1, Some(" sku-9 ")), "sku-9");
///
/// let derived = stable_id("Mug", "/mug", 1, None);
/// assert_eq!(derived, "203b49575906");
/// assert_eq!(derived, stable_id("Mug", "/mug", 1, Some("   ")));
/// assert_ne!(derived, stable_id("Mug", "/mug", 2, None));
/// ```
pub fn stable_id(name: &str, url: &str, index: usize, explicit: Option<&str>) -> String {
    if let Some(id) = explicit.map(str::trim).filter(|id| !id.is_empty()) {
        return id.to_string();
    }

    let digest = Sha1::digest(format!("{name}|{url}|{index}").as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(DERIVED_ID_LEN);
    id
}

/// Detects the currency from price text: symbols first, then literal codes.
pub fn parse_currency(price_text: &str) -> &'static str {
    if let Some((_, code)) = CURRENCY_SYMBOLS
        .iter()
        .find(|(symbol, _)| price_text.contains(symbol))
    {
        return *code;
    }

    let upper = price_text.to_uppercase();
    CURRENCY_CODES
        .iter()
        .find(|code| upper.contains(*code))
        .copied()
        .unwrap_or(UNKNOWN_CURRENCY)
}

/// Parses the first decimal number in the text, ignoring thousands commas.
///
/// Tokens beyond the range of `Decimal` fall back to a float parse.
pub fn parse_price(price_text: &str) -> Option<f64> {
    let cleaned = price_text.replace(',', "");
    let token = DECIMAL_RE.find(&cleaned)?.as_str();
    match Decimal::from_str(token.trim_start_matches('+')) {
        Ok(decimal) => decimal.to_f64(),
        Err(_) => token.parse().ok(),
    }
}

/// Parses the first decimal number in the text. Commas are not stripped, so
/// `"4,5"` reads as `4`.
pub fn parse_rating(rating_text: &str) -> Option<f64> {
    let token = DECIMAL_RE.find(rating_text)?;
    token.as_str().parse().ok()
}

/// Parses the first integer in the text, ignoring thousands commas.
/// Counts outside the `i64` range saturate.
pub fn parse_reviews_count(reviews_text: &str) -> Option<i64> {
    let cleaned = reviews_text.replace(',', "");
    let token = INTEGER_RE.find(&cleaned)?;
    match token.as_str().parse::<i64>() {
        Ok(count) => Some(count),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// `true` if the stock text contains "in stock", case-insensitively.
pub fn parse_in_stock(stock_text: &str) -> bool {
    stock_text.trim().to_lowercase().contains("in stock")
}
