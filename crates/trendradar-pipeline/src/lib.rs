//! Niche research pipeline.
//!
//! Expands a seed keyword through autocomplete, enriches each candidate with
//! a marketplace listing count and a forum mention count inside a bounded
//! worker pool, scores and ranks the results, and renders the report.

pub mod pipeline;
pub mod rank;
pub mod report;
pub mod scan;
pub mod scorer;
pub mod suggest;

pub use pipeline::enrich;
pub use rank::rank;
pub use report::RankedReport;
pub use scan::{run_scan, ScanOptions, Sources};
pub use scorer::score;
pub use suggest::suggest;
