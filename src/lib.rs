//! Award statistics for a subreddit's posts and comments.
//!
//! The [`analysis`] module holds the statistics engine; [`report`] merges its
//! results into the flat mapping rendered by the report templates.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod lookup;
pub mod models;
pub mod period;
pub mod records;
pub mod report;
pub mod sanitize;

pub use error::{StatsError, StatsResult};
pub use models::{Comment, Post, ReportValue};
pub use records::RecordSet;
pub use report::{assemble_report, ReportEnv};
