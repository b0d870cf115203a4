//! Record extraction from the listing page.
//!
//! Walks the parsed document, isolates every product card in document order,
//! and snapshots the raw text of each field. No type conversion happens here;
//! see [`crate::normalize`] for that.

use crate::error::{PipelineError, Result};
use log::debug;
use scraper::{ElementRef, Html, Selector};

/// Selector matching one record fragment.
pub const CARD_SELECTOR: &str = "article.product-card";
/// Selector for the product display name.
pub const NAME_SELECTOR: &str = ".product-name";
/// Selector for the price text.
pub const PRICE_SELECTOR: &str = ".price";
/// Selector for the rating text.
pub const RATING_SELECTOR: &str = ".rating";
/// Selector for the review count text.
pub const REVIEWS_SELECTOR: &str = ".reviews";
/// Selector for the stock status text.
pub const STOCK_SELECTOR: &str = ".stock";
/// Selector for the product link; its `href` is the target reference.
pub const LINK_SELECTOR: &str = "a.product-link";

const ID_ATTR: &str = "data-id";
const CATEGORY_ATTR: &str = "data-category";
const HREF_ATTR: &str = "href";

/// Raw snapshot of one product card.
///
/// Text fields are empty when the corresponding element is absent.
/// `data_id` and `category` are `None` when the attribute is absent or empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Position in document order, starting at 1.
    pub index: usize,
    pub data_id: Option<String>,
    pub category: Option<String>,
    pub name: String,
    pub price_text: String,
    pub rating_text: String,
    pub reviews_text: String,
    pub stock_text: String,
    pub url: String,
}

/// Compiled selectors for one card layout.
pub struct CardSelectors {
    card: Selector,
    name: Selector,
    price: Selector,
    rating: Selector,
    reviews: Selector,
    stock: Selector,
    link: Selector,
}

impl CardSelectors {
    /// Compiles the product card selectors.
    pub fn new() -> Result<Self> {
        Ok(CardSelectors {
            card: compile(CARD_SELECTOR)?,
            name: compile(NAME_SELECTOR)?,
            price: compile(PRICE_SELECTOR)?,
            rating: compile(RATING_SELECTOR)?,
            reviews: compile(REVIEWS_SELECTOR)?,
            stock: compile(STOCK_SELECTOR)?,
            link: compile(LINK_SELECTOR)?,
        })
    }

    /// Extracts every card in `html`, in document order.
    pub fn extract(&self, html: &str) -> Vec<RawRecord> {
        let document = Html::parse_document(html);
        if !document.errors.is_empty() {
            debug!("HTML parser recovered from {} errors", document.errors.len());
        }

        let records: Vec<RawRecord> = document
            .select(&self.card)
            .enumerate()
            .map(|(i, card)| self.extract_card(card, i + 1))
            .collect();

        debug!("Extracted {} product cards", records.len());
        records
    }

    fn extract_card(&self, card: ElementRef<'_>, index: usize) -> RawRecord {
        let url = card
            .select(&self.link)
            .next()
            .and_then(|link| link.value().attr(HREF_ATTR))
            .unwrap_or_default()
            .trim()
            .to_string();

        RawRecord {
            index,
            data_id: non_empty_attr(card, ID_ATTR),
            category: non_empty_attr(card, CATEGORY_ATTR),
            name: field_text(card, &self.name),
            price_text: field_text(card, &self.price),
            rating_text: field_text(card, &self.rating),
            reviews_text: field_text(card, &self.reviews),
            stock_text: field_text(card, &self.stock),
            url,
        }
    }
}

/// Parses `html` and extracts every product card with the default selectors.
///
/// # Example
///
/// ```
/// use listing_pipeline::extract_records;
///
/// let html = r#"<article class="product-card"><h2 class="product-name"> Mug </h2></article>"#;
/// let records = extract_records(html).unwrap();
/// assert_eq!(records[0].name, "Mug");
/// assert_eq!(records[0].price_text, "");
/// ```
pub fn extract_records(html: &str) -> Result<Vec<RawRecord>> {
    Ok(CardSelectors::new()?.extract(html))
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| PipelineError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Text of the first descendant matching `selector`, or empty if none matches.
fn field_text(card: ElementRef<'_>, selector: &Selector) -> String {
    card.select(selector)
        .next()
        .map(stripped_text)
        .unwrap_or_default()
}

/// Concatenation of all descendant text nodes, each stripped, empties dropped.
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

fn non_empty_attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
