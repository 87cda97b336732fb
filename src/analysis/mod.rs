//! Aggregation engine.
//!
//! Award statistics over the post and comment sets of a report window.

pub mod aggregator;
pub mod awards;
pub mod text_metrics;

pub use aggregator::AuthorTotals;
pub use awards::*;
