//! Structured (JSON) and tabular (CSV) output.
//!
//! Both writers expect records already sorted by identifier. JSON keeps
//! numbers numeric; CSV renders price and rating with exactly 2 decimal
//! places, rounded half-up.

use crate::decimal::Fixed2;
use crate::error::Result;
use crate::normalize::Product;
use crate::validate::ValidationError;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::io::Write;

/// Column order of the tabular output.
pub const CSV_COLUMNS: [&str; 9] = [
    "id",
    "name",
    "price",
    "currency",
    "category",
    "rating",
    "reviews_count",
    "in_stock",
    "url",
];

/// Caller-supplied run metadata, emitted under `meta`.
pub type Metadata = BTreeMap<String, Value>;

/// Writes `{"errors", "items", "meta"}` as 2-space indented JSON with sorted
/// keys, followed by a single newline.
pub fn write_json<W: Write>(
    mut writer: W,
    valid: &[Product],
    invalid: &[ValidationError],
    meta: &Metadata,
) -> Result<()> {
    // serde_json's default map is ordered by key, so going through `Value`
    // sorts the keys of every nested record too.
    let payload = json!({
        "meta": meta,
        "items": serde_json::to_value(valid)?,
        "errors": serde_json::to_value(invalid)?,
    });

    serde_json::to_writer_pretty(&mut writer, &payload)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Writes the header row and one row per valid product.
pub fn write_csv<W: Write>(writer: W, valid: &[Product]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(CSV_COLUMNS)?;

    for product in valid {
        let price = Fixed2::from_f64(product.price).to_string();
        let rating = Fixed2::from_f64(product.rating).to_string();
        let reviews_count = product.reviews_count.to_string();
        let in_stock = product.in_stock.to_string();

        csv_writer.write_record([
            product.id.as_str(),
            product.name.as_str(),
            price.as_str(),
            product.currency.as_str(),
            product.category.as_str(),
            rating.as_str(),
            reviews_count.as_str(),
            in_stock.as_str(),
            product.url.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: f64) -> Product {
        Product {
            id: id.to_string(),
            name: "Desk Lamp, brass".to_string(),
            price,
            currency: "EUR".to_string(),
            category: "home".to_string(),
            rating: 4.0,
            reviews_count: 12,
            in_stock: false,
            url: "/p/lamp".to_string(),
        }
    }

    fn json_string(valid: &[Product], invalid: &[ValidationError], meta: &Metadata) -> String {
        let mut out = Vec::new();
        write_json(&mut out, valid, invalid, meta).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn csv_string(valid: &[Product]) -> String {
        let mut out = Vec::new();
        write_csv(&mut out, valid).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_json_keys_sorted_and_numbers_numeric() {
        let mut meta = Metadata::new();
        meta.insert("deterministic".to_string(), Value::Bool(true));
        meta.insert("input_sha256".to_string(), Value::from("abc"));

        let invalid = vec![ValidationError {
            id: "b".to_string(),
            errors: vec!["price must be > 0".to_string()],
            item: product("b", -1.0),
        }];
        let out = json_string(&[product("a", 24.5)], &invalid, &meta);

        assert!(out.ends_with("}\n"));
        assert!(!out.ends_with("\n\n"));

        let errors_at = out.find("\"errors\"").unwrap();
        let items_at = out.find("\"items\"").unwrap();
        let meta_at = out.find("\"meta\"").unwrap();
        assert!(errors_at < items_at && items_at < meta_at);

        // Record keys are alphabetical: category, currency, id, in_stock, ...
        let category_at = out.find("\"category\"").unwrap();
        let url_at = out.find("\"url\"").unwrap();
        assert!(category_at < url_at);

        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["items"][0]["price"], json!(24.5));
        assert_eq!(parsed["items"][0]["reviews_count"], json!(12));
        assert_eq!(parsed["errors"][0]["item"]["price"], json!(-1.0));
        assert_eq!(parsed["errors"][0]["errors"][0], "price must be > 0");
        assert_eq!(parsed["meta"]["deterministic"], json!(true));
    }

    #[test]
    fn test_json_indented_two_spaces() {
        let out = json_string(&[], &[], &Metadata::new());
        assert_eq!(out, "{\n  \"errors\": [],\n  \"items\": [],\n  \"meta\": {}\n}\n");
    }

    #[test]
    fn test_json_keeps_unicode_unescaped() {
        let mut p = product("a", 3.0);
        p.name = "Crème brûlée set".to_string();
        let out = json_string(&[p], &[], &Metadata::new());
        assert!(out.contains("Crème brûlée set"));
    }

    #[test]
    fn test_csv_header_and_fixed_decimals() {
        let out = csv_string(&[product("a", 39.995)]);
        let mut lines = out.lines();

        assert_eq!(
            lines.next().unwrap(),
            "id,name,price,currency,category,rating,reviews_count,in_stock,url"
        );
        assert_eq!(
            lines.next().unwrap(),
            "a,\"Desk Lamp, brass\",40.00,EUR,home,4.00,12,false,/p/lamp"
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_empty_has_header_only() {
        let out = csv_string(&[]);
        assert_eq!(out.lines().count(), 1);
    }
}
