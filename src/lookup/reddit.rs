//! Comment lookup against reddit's public JSON API.

use crate::config::ForumConfig;
use crate::error::{StatsError, StatsResult};
use crate::lookup::{CommentLookup, LiveComment};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Author name the API reports for deleted accounts.
const API_DELETED_AUTHOR: &str = "[deleted]";

/// Connection settings for [`RedditLookup`].
#[derive(Debug, Clone)]
pub struct RedditLookupConfig {
    pub api_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl From<&ForumConfig> for RedditLookupConfig {
    fn from(forum: &ForumConfig) -> Self {
        Self {
            api_url: forum.api_url.trim_end_matches('/').to_string(),
            user_agent: forum.user_agent.clone(),
            timeout_seconds: forum.timeout_seconds,
        }
    }
}

/// Fetches single comments over HTTP.
pub struct RedditLookup {
    config: RedditLookupConfig,
    http_client: reqwest::Client,
}

impl RedditLookup {
    pub fn new(config: RedditLookupConfig) -> StatsResult<Self> {
        info!("Comment lookups will use {}", config.api_url);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| StatsError::Lookup(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    async fn get_json(&self, url: &str) -> StatsResult<Value> {
        debug!("GET {}", url);

        let response = self.http_client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                StatsError::Lookup(format!(
                    "Request timed out after {}s",
                    self.config.timeout_seconds
                ))
            } else if e.is_connect() {
                StatsError::Lookup(format!("Cannot connect to {}", self.config.api_url))
            } else {
                StatsError::Lookup(format!("Failed to send request: {}", e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StatsError::Lookup(format!("API error {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| StatsError::Lookup(format!("Failed to parse API response: {}", e)))
    }
}

#[async_trait]
impl CommentLookup for RedditLookup {
    async fn fetch_comment(&self, id: &str) -> StatsResult<LiveComment> {
        let info_url = format!("{}/api/info.json?id=t1_{}", self.config.api_url, id);
        let info = self.get_json(&info_url).await?;
        let mut comment = parse_info_response(&info, id)?;

        let thread_url = format!(
            "{}{}.json",
            self.config.api_url,
            comment.permalink.trim_end_matches('/')
        );
        let thread = self.get_json(&thread_url).await?;
        comment.reply_count = count_replies(&thread);

        Ok(comment)
    }
}

/// Extract author, body and permalink of comment `id` from an info listing.
/// The reply count is left at zero.
fn parse_info_response(json: &Value, id: &str) -> StatsResult<LiveComment> {
    let not_found = || StatsError::NotFound { id: id.to_string() };

    let data = json["data"]["children"]
        .as_array()
        .and_then(|children| children.iter().find(|c| c["kind"] == "t1"))
        .map(|child| &child["data"])
        .ok_or_else(not_found)?;

    let author = match data["author"].as_str() {
        Some(API_DELETED_AUTHOR) | None => crate::sanitize::DELETED_AUTHOR,
        Some(name) => name,
    };

    Ok(LiveComment {
        author: author.to_string(),
        body: data["body"].as_str().unwrap_or_default().to_string(),
        permalink: data["permalink"].as_str().ok_or_else(not_found)?.to_string(),
        reply_count: 0,
    })
}

/// Count the direct replies of the comment a thread page is focused on.
fn count_replies(thread: &Value) -> usize {
    thread[1]["data"]["children"][0]["data"]["replies"]["data"]["children"]
        .as_array()
        .map(|replies| replies.iter().filter(|r| r["kind"] == "t1").count())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_info_response() {
        let info = json!({
            "kind": "Listing",
            "data": {"children": [{"kind": "t1", "data": {
                "author": "someone",
                "body": "old comment",
                "permalink": "/r/test/comments/p1/_/abc/"
            }}]}
        });
        let comment = parse_info_response(&info, "abc").unwrap();
        assert_eq!(comment.author, "someone");
        assert_eq!(comment.body, "old comment");
        assert_eq!(comment.permalink, "/r/test/comments/p1/_/abc/");
    }

    #[test]
    fn test_parse_info_response_deleted_author() {
        let info = json!({"data": {"children": [{"kind": "t1", "data": {
            "author": "[deleted]", "body": "[deleted]", "permalink": "/x/"
        }}]}});
        let comment = parse_info_response(&info, "abc").unwrap();
        assert_eq!(comment.author, "None");
    }

    #[test]
    fn test_parse_info_response_not_found() {
        let info = json!({"data": {"children": []}});
        assert!(matches!(
            parse_info_response(&info, "abc"),
            Err(StatsError::NotFound { .. })
        ));
    }

    #[test]
    fn test_count_replies() {
        let thread = json!([
            {"data": {"children": [{"kind": "t3"}]}},
            {"data": {"children": [{"kind": "t1", "data": {"replies": {"data": {"children": [
                {"kind": "t1"}, {"kind": "t1"}, {"kind": "more"}
            ]}}}}]}}
        ]);
        assert_eq!(count_replies(&thread), 2);

        let no_replies = json!([{}, {"data": {"children": [{"kind": "t1", "data": {"replies": ""}}]}}]);
        assert_eq!(count_replies(&no_replies), 0);
    }

    fn lookup_for(server: &wiremock::MockServer) -> RedditLookup {
        RedditLookup::new(RedditLookupConfig {
            api_url: server.uri(),
            user_agent: "rust:bestof:test".to_string(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_comment_success() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/api/info.json"))
            .and(wiremock::matchers::query_param("id", "t1_abc"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(json!({
                "kind": "Listing",
                "data": {"children": [{"kind": "t1", "data": {
                    "author": "veteran",
                    "body": "posted yesterday",
                    "permalink": "/r/test/comments/p1/_/abc/"
                }}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        // The trailing slash of the permalink is trimmed before `.json`
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/r/test/comments/p1/_/abc.json"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(json!([
                {"kind": "Listing", "data": {"children": [{"kind": "t3"}]}},
                {"kind": "Listing", "data": {"children": [{"kind": "t1", "data": {
                    "replies": {"data": {"children": [
                        {"kind": "t1"}, {"kind": "t1"}, {"kind": "t1"}, {"kind": "more"}
                    ]}}
                }}]}}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let comment = lookup_for(&server).fetch_comment("abc").await.unwrap();
        assert_eq!(
            comment,
            LiveComment {
                author: "veteran".to_string(),
                body: "posted yesterday".to_string(),
                permalink: "/r/test/comments/p1/_/abc/".to_string(),
                reply_count: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_comment_server_error() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = lookup_for(&server).fetch_comment("abc").await;
        match result {
            Err(StatsError::Lookup(message)) => assert!(message.contains("500")),
            other => panic!("expected a lookup error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_comment_empty_listing() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/api/info.json"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_json(json!({"kind": "Listing", "data": {"children": []}})),
            )
            .mount(&server)
            .await;

        let result = lookup_for(&server).fetch_comment("gone").await;
        assert!(matches!(result, Err(StatsError::NotFound { ref id }) if id == "gone"));
    }

    #[test]
    fn test_config_from_forum() {
        let forum = ForumConfig {
            api_url: "https://www.reddit.com/".to_string(),
            ..ForumConfig::default()
        };
        let config = RedditLookupConfig::from(&forum);
        assert_eq!(config.api_url, "https://www.reddit.com");
        assert_eq!(config.timeout_seconds, 30);
    }
}
