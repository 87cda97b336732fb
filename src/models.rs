//! Data models for the award report.
//!
//! This module contains the normalized post and comment records consumed by
//! the statistics engine, the projected award results it produces, and the
//! display values handed to the report templates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of a `parent` reference pointing at a comment.
pub const COMMENT_PREFIX: &str = "t1_";

/// Prefix of a `parent` reference pointing at a post.
pub const POST_PREFIX: &str = "t3_";

/// A post published in the report window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique post identifier.
    pub id: String,
    /// Author profile link (`/u/name`), or the deleted-author marker.
    pub author: String,
    /// Net score, may be negative.
    pub score: i64,
    /// Post title.
    pub title: String,
    /// Link to the post.
    pub permalink: String,
    /// Number of comments reported by the forum.
    pub num_comments: u64,
    /// Creation time in unix seconds.
    pub timestamp: i64,
}

/// A comment published under one of the report's posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment identifier, unique within the report window.
    pub id: String,
    /// Author profile link (`/u/name`), or the deleted-author marker.
    pub author: String,
    /// Net score, may be negative.
    pub score: i64,
    /// Sanitized body.
    pub body: String,
    /// Link to the comment.
    pub permalink: String,
    /// Reference to the parent comment (`t1_`) or post (`t3_`).
    pub parent: String,
    /// Character count of `body`. Recomputed on normalization.
    #[serde(default)]
    pub length: usize,
    /// Creation time in unix seconds.
    pub timestamp: i64,
}

impl Comment {
    /// Id of the parent comment, if this comment answers another comment.
    pub fn parent_comment_id(&self) -> Option<&str> {
        self.parent.strip_prefix(COMMENT_PREFIX)
    }
}

/// Post selected by a superlative statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostAward {
    pub author: String,
    /// Value the post won on (score or comment count).
    pub value: i64,
    pub title: String,
    pub link: String,
    pub id: String,
}

/// Comment selected by a superlative statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentAward {
    pub author: String,
    /// Value the comment won on (score or reply count).
    pub value: i64,
    /// Truncated body.
    pub body: String,
    pub link: String,
    pub id: String,
}

/// Author winning a per-author statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorAward {
    pub author: String,
    pub score: i64,
}

/// Author winning the quality award, scored in milliSPHKS.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityAward {
    pub author: String,
    /// Karma per 1000 characters, rounded to two decimals.
    pub score: f64,
}

/// Two authors who answered each other the most.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairAward {
    pub author1: String,
    pub author2: String,
    pub score: i64,
}

/// A single value of the report mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportValue {
    Text(String),
    Integer(i64),
    /// Rendered with exactly two decimals.
    Decimal(f64),
}

impl fmt::Display for ReportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportValue::Text(s) => write!(f, "{}", s),
            ReportValue::Integer(n) => write!(f, "{}", n),
            ReportValue::Decimal(x) => write!(f, "{:.2}", x),
        }
    }
}

impl From<String> for ReportValue {
    fn from(s: String) -> Self {
        ReportValue::Text(s)
    }
}

impl From<&str> for ReportValue {
    fn from(s: &str) -> Self {
        ReportValue::Text(s.to_string())
    }
}

impl From<i64> for ReportValue {
    fn from(n: i64) -> Self {
        ReportValue::Integer(n)
    }
}

impl From<usize> for ReportValue {
    fn from(n: usize) -> Self {
        ReportValue::Integer(n as i64)
    }
}

impl From<f64> for ReportValue {
    fn from(x: f64) -> Self {
        ReportValue::Decimal(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_comment_id() {
        let mut comment = Comment {
            id: "c1".to_string(),
            author: "/u/a".to_string(),
            score: 1,
            body: "body".to_string(),
            permalink: "/p".to_string(),
            parent: "t1_abc".to_string(),
            length: 4,
            timestamp: 0,
        };
        assert_eq!(comment.parent_comment_id(), Some("abc"));

        comment.parent = "t3_abc".to_string();
        assert_eq!(comment.parent_comment_id(), None);
    }

    #[test]
    fn test_report_value_display() {
        assert_eq!(ReportValue::from("x").to_string(), "x");
        assert_eq!(ReportValue::from(-12i64).to_string(), "-12");
        assert_eq!(ReportValue::from(153.846_f64).to_string(), "153.85");
        assert_eq!(ReportValue::from(100.0_f64).to_string(), "100.00");
    }

    #[test]
    fn test_report_value_serializes_untagged() {
        let json = serde_json::to_string(&vec![
            ReportValue::from("a"),
            ReportValue::from(3usize),
        ])
        .unwrap();
        assert_eq!(json, r#"["a",3]"#);
    }
}
