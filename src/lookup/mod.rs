//! Out-of-band comment lookup.
//!
//! The most-discussed comment may have been posted before the report window.
//! The statistics engine then asks a [`CommentLookup`] for it instead of
//! talking to the forum directly.

pub mod reddit;

pub use reddit::{RedditLookup, RedditLookupConfig};

use crate::error::{StatsError, StatsResult};
use async_trait::async_trait;

/// A comment fetched live from the forum.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveComment {
    pub author: String,
    pub body: String,
    pub permalink: String,
    pub reply_count: usize,
}

/// Capability to fetch a single comment by id.
#[async_trait]
pub trait CommentLookup: Send + Sync {
    /// Fetch comment `id` (without type prefix). Fails with `NotFound` when
    /// the forum does not know it.
    async fn fetch_comment(&self, id: &str) -> StatsResult<LiveComment>;
}

/// Lookup used when running without network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineLookup;

#[async_trait]
impl CommentLookup for OfflineLookup {
    async fn fetch_comment(&self, id: &str) -> StatsResult<LiveComment> {
        Err(StatsError::NotFound { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_lookup_never_finds() {
        let result = tokio_test::block_on(OfflineLookup.fetch_comment("abc"));
        assert!(matches!(result, Err(StatsError::NotFound { ref id }) if id == "abc"));
    }
}
