//! # Listing Pipeline
//!
//! An offline batch processor that extracts product cards from a saved HTML
//! page, normalizes their fields into typed values, validates them, and
//! writes reproducible JSON, CSV, summary and log outputs.
//!
//! ## Design Principles
//!
//! - **Tolerant parsing, strict validation**: unparseable fields become
//!   sentinels (`-1`) and are rejected by validation, never by extraction
//! - **Deterministic output**: records sorted by identifier, sorted JSON keys,
//!   fixed timestamps unless running in realtime mode
//! - **Half-up decimals**: rendered prices and ratings use `rust_decimal`
//!   rounding on the shortest decimal representation
//!
//! ## Example
//!
//! ```
//! use listing_pipeline::{extract_records, normalize, partition_valid};
//!
//! let html = r#"<article class="product-card">
//!   <h2 class="product-name">Kettle</h2>
//!   <span class="price">$39.99</span>
//!   <span class="rating">4.5 out of 5</span>
//!   <span class="reviews">1,234 reviews</span>
//!   <span class="stock">In Stock</span>
//!   <a class="product-link" href="/p/kettle">View</a>
//! </article>"#;
//!
//! let products = extract_records(html).unwrap().iter().map(normalize).collect();
//! let partition = partition_valid(products);
//! assert_eq!(partition.valid[0].reviews_count, 1234);
//! ```

pub mod decimal;
pub mod error;
pub mod export;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod runlog;
pub mod validate;

pub use decimal::Fixed2;
pub use error::{PipelineError, Result};
pub use export::{write_csv, write_json, Metadata};
pub use extract::{extract_records, CardSelectors, RawRecord};
pub use normalize::{normalize, Product};
pub use pipeline::{run_pipeline, RunConfig, RunSummary};
pub use report::{compute_stats, render_summary, ReportStats};
pub use runlog::RunLog;
pub use validate::{partition_valid, validate_product, Partition, ValidationError};
