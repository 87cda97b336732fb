//! Loading and normalization of the post and comment record sets.
//!
//! The fetching collaborator hands over a JSON document holding both record
//! sets. Normalization applies the text sanitizer field by field, recomputes
//! comment lengths and checks the invariants the statistics rely on.

use crate::config::ForumConfig;
use crate::error::{StatsError, StatsResult};
use crate::models::{Comment, Post, COMMENT_PREFIX, POST_PREFIX};
use crate::sanitize::{absolute_link, link_with_context, profile_link, sanitize_comment_body};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// Both record sets of one report window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl RecordSet {
    /// Parse a record document. Missing fields surface as `MalformedRecord`.
    pub fn from_json(content: &str) -> StatsResult<Self> {
        serde_json::from_str(content).map_err(|e| StatsError::malformed("record file", e.to_string()))
    }

    /// Read and parse a record file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read record file: {}", path.display()))?;
        let records = Self::from_json(&content)
            .with_context(|| format!("Failed to parse record file: {}", path.display()))?;

        info!(
            "Loaded {} posts and {} comments from {}",
            records.posts.len(),
            records.comments.len(),
            path.display()
        );
        Ok(records)
    }

    /// Validate the records and bring every field into its canonical form.
    pub fn normalize(self, forum: &ForumConfig) -> StatsResult<Self> {
        validate_posts(&self.posts)?;
        validate_comments(&self.comments)?;

        let posts = self
            .posts
            .into_iter()
            .map(|post| Post {
                author: profile_link(&post.author),
                permalink: absolute_link(&post.permalink, &forum.base_url),
                ..post
            })
            .collect();

        let comments = self
            .comments
            .into_iter()
            .map(|comment| {
                let body = sanitize_comment_body(&comment.body);
                Comment {
                    author: profile_link(&comment.author),
                    permalink: link_with_context(
                        &comment.permalink,
                        &forum.base_url,
                        forum.context,
                    ),
                    length: body.chars().count(),
                    body,
                    ..comment
                }
            })
            .collect();

        Ok(Self { posts, comments })
    }

    /// Keep only the records of threads opened in `[min_timestamp, max_timestamp]`.
    ///
    /// Posts are kept on their own timestamp. A comment follows the post its
    /// thread belongs to, so late answers to a kept post stay in the report.
    /// Comments whose post is not part of the record set fall back to their
    /// own timestamp.
    pub fn within(self, min_timestamp: i64, max_timestamp: i64) -> Self {
        let in_range = |ts: i64| ts >= min_timestamp && ts <= max_timestamp;
        let before = (self.posts.len(), self.comments.len());

        let post_in_range: HashMap<&str, bool> = self
            .posts
            .iter()
            .map(|p| (p.id.as_str(), in_range(p.timestamp)))
            .collect();
        let by_id: HashMap<&str, &Comment> =
            self.comments.iter().map(|c| (c.id.as_str(), c)).collect();

        let keep_comment: Vec<bool> = self
            .comments
            .iter()
            .map(|c| {
                thread_post(c, &by_id)
                    .and_then(|post| post_in_range.get(post).copied())
                    .unwrap_or_else(|| in_range(c.timestamp))
            })
            .collect();

        let posts: Vec<Post> = self.posts.into_iter().filter(|p| in_range(p.timestamp)).collect();
        let comments: Vec<Comment> = self
            .comments
            .into_iter()
            .zip(keep_comment)
            .filter_map(|(c, keep)| keep.then_some(c))
            .collect();

        debug!(
            "Window {}..={} kept {}/{} posts and {}/{} comments",
            min_timestamp,
            max_timestamp,
            posts.len(),
            before.0,
            comments.len(),
            before.1
        );
        Self { posts, comments }
    }

    /// Number of distinct authors across posts and comments.
    pub fn unique_authors(&self) -> usize {
        self.posts
            .iter()
            .map(|p| p.author.as_str())
            .chain(self.comments.iter().map(|c| c.author.as_str()))
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Id of the post a comment's thread hangs from, following parent comments.
fn thread_post<'a>(comment: &'a Comment, by_id: &HashMap<&str, &'a Comment>) -> Option<&'a str> {
    let mut current = comment;
    // Bounded walk, a malformed file may contain parent cycles
    for _ in 0..=by_id.len() {
        if let Some(post) = current.parent.strip_prefix(POST_PREFIX) {
            return Some(post);
        }
        current = by_id.get(current.parent_comment_id()?).copied()?;
    }
    None
}

fn validate_posts(posts: &[Post]) -> StatsResult<()> {
    let mut seen = HashSet::new();
    for post in posts {
        if post.id.is_empty() {
            return Err(StatsError::malformed(&post.title, "post without id"));
        }
        if !seen.insert(post.id.as_str()) {
            return Err(StatsError::malformed(&post.id, "duplicate post id"));
        }
    }
    Ok(())
}

fn validate_comments(comments: &[Comment]) -> StatsResult<()> {
    let mut seen = HashSet::new();
    for comment in comments {
        if comment.id.is_empty() {
            return Err(StatsError::malformed(&comment.permalink, "comment without id"));
        }
        if !seen.insert(comment.id.as_str()) {
            return Err(StatsError::malformed(&comment.id, "duplicate comment id"));
        }
        if !comment.parent.starts_with(COMMENT_PREFIX) && !comment.parent.starts_with(POST_PREFIX) {
            return Err(StatsError::malformed(
                &comment.id,
                format!("unknown parent reference '{}'", comment.parent),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "posts": [
            {"id": "p1", "author": "alice", "score": 5, "title": "Hello",
             "permalink": "/r/test/comments/p1/", "num_comments": 2, "timestamp": 100}
        ],
        "comments": [
            {"id": "c1", "author": "bob", "score": 2, "body": "> quoted\nreal text\n",
             "permalink": "/r/test/comments/p1/_/c1/", "parent": "t3_p1",
             "length": 9999, "timestamp": 150},
            {"id": "c2", "author": "None", "score": -1, "body": "late",
             "permalink": "/r/test/comments/p1/_/c2/", "parent": "t1_c1", "timestamp": 500}
        ]
    }"#;

    #[test]
    fn test_from_json_and_normalize() {
        let records = RecordSet::from_json(DOCUMENT)
            .unwrap()
            .normalize(&ForumConfig::default())
            .unwrap();

        assert_eq!(records.posts[0].author, "/u/alice");
        assert_eq!(
            records.posts[0].permalink,
            "https://reddit.com/r/test/comments/p1/"
        );

        let first = &records.comments[0];
        assert_eq!(first.author, "/u/bob");
        assert_eq!(first.body, "real text");
        assert_eq!(first.length, 9);
        assert_eq!(
            first.permalink,
            "https://reddit.com/r/test/comments/p1/_/c1/?context=2"
        );
        assert_eq!(records.comments[1].author, "/u/None");
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let err = RecordSet::from_json(r#"{"posts": [{"id": "p1"}]}"#).unwrap_err();
        assert!(matches!(err, StatsError::MalformedRecord { .. }));
    }

    #[test]
    fn test_unknown_parent_prefix_is_malformed() {
        let mut records = RecordSet::from_json(DOCUMENT).unwrap();
        records.comments[0].parent = "p1".to_string();
        let err = records.normalize(&ForumConfig::default()).unwrap_err();
        assert!(matches!(err, StatsError::MalformedRecord { ref record, .. } if record == "c1"));
    }

    #[test]
    fn test_duplicate_id_is_malformed() {
        let mut records = RecordSet::from_json(DOCUMENT).unwrap();
        records.comments[1].id = "c1".to_string();
        assert!(records.normalize(&ForumConfig::default()).is_err());
    }

    #[test]
    fn test_within_window_keeps_late_answers() {
        let records = RecordSet::from_json(DOCUMENT).unwrap().within(100, 200);
        assert_eq!(records.posts.len(), 1);
        assert_eq!(records.comments.len(), 2);
        assert_eq!(records.comments[1].id, "c2");
    }

    #[test]
    fn test_within_window_drops_threads_of_old_posts() {
        let records = RecordSet::from_json(DOCUMENT).unwrap().within(120, 600);
        assert!(records.posts.is_empty());
        assert!(records.comments.is_empty());
    }

    #[test]
    fn test_within_window_orphans_use_own_timestamp() {
        let mut records = RecordSet::from_json(DOCUMENT).unwrap();
        records.comments[0].parent = "t3_elsewhere".to_string();

        let kept = records.within(100, 200);
        assert_eq!(kept.comments.len(), 1);
        assert_eq!(kept.comments[0].id, "c1");
    }

    #[test]
    fn test_unique_authors() {
        let mut records = RecordSet::from_json(DOCUMENT)
            .unwrap()
            .normalize(&ForumConfig::default())
            .unwrap();
        assert_eq!(records.unique_authors(), 3);

        records.comments[1].author = "/u/alice".to_string();
        assert_eq!(records.unique_authors(), 2);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, DOCUMENT).unwrap();

        let records = RecordSet::load(&path).unwrap();
        assert_eq!(records.posts.len(), 1);
        assert_eq!(records.comments.len(), 2);

        assert!(RecordSet::load(&dir.path().join("missing.json")).is_err());
    }
}
