//! Award statistics.
//!
//! Every function reads the post or comment set of the report window and
//! returns the winning record, author or author pair. Extremes use strict
//! comparisons, so on a tie the first record in input order wins.

use crate::analysis::aggregator::{first_max_by_key, first_min_by_key, AuthorTotals};
use crate::error::{StatsError, StatsResult};
use crate::lookup::CommentLookup;
use crate::models::{
    AuthorAward, Comment, CommentAward, PairAward, Post, PostAward, QualityAward, COMMENT_PREFIX,
};
use crate::sanitize::{is_deleted_author, link_with_context, profile_link, sanitize_long_text};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Knobs shared by the award functions.
#[derive(Debug, Clone)]
pub struct AwardSettings {
    /// Title prefix of the open-discussion thread.
    pub open_thread_marker: String,
    /// Maximum length of comment excerpts.
    pub max_text_length: usize,
    /// Characters an author must exceed to compete for the quality award.
    pub qualite_min_length: usize,
    /// Base URL and context depth for links built from live comments.
    pub base_url: String,
    pub context: u32,
}

impl Default for AwardSettings {
    fn default() -> Self {
        Self::from_config(&crate::config::Config::default())
    }
}

impl AwardSettings {
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            open_thread_marker: config.awards.open_thread_marker.clone(),
            max_text_length: config.awards.max_text_length,
            qualite_min_length: config.awards.qualite_min_length,
            base_url: config.forum.base_url.clone(),
            context: config.forum.context,
        }
    }
}

fn post_award(post: &Post, value: i64) -> PostAward {
    PostAward {
        author: post.author.clone(),
        value,
        title: post.title.clone(),
        link: post.permalink.clone(),
        id: post.id.clone(),
    }
}

fn comment_award(comment: &Comment, value: i64, settings: &AwardSettings) -> CommentAward {
    CommentAward {
        author: comment.author.clone(),
        value,
        body: sanitize_long_text(&comment.body, settings.max_text_length),
        link: comment.permalink.clone(),
        id: comment.id.clone(),
    }
}

/// Post with the best score.
pub fn get_best_post(posts: &[Post]) -> StatsResult<PostAward> {
    first_max_by_key(posts.iter(), |p| p.score)
        .map(|p| post_award(p, p.score))
        .ok_or(StatsError::empty("best_post"))
}

/// Most commented post, open-discussion threads excluded.
///
/// An empty marker excludes nothing.
pub fn get_commented_post(posts: &[Post], settings: &AwardSettings) -> StatsResult<PostAward> {
    let marker = settings.open_thread_marker.as_str();
    let candidates = posts
        .iter()
        .filter(|p| marker.is_empty() || !p.title.starts_with(marker));

    first_max_by_key(candidates, |p| p.num_comments)
        .map(|p| post_award(p, p.num_comments as i64))
        .ok_or(StatsError::empty("commented_post"))
}

/// Comment with the best score.
pub fn get_best_comment(comments: &[Comment], settings: &AwardSettings) -> StatsResult<CommentAward> {
    first_max_by_key(comments.iter(), |c| c.score)
        .map(|c| comment_award(c, c.score, settings))
        .ok_or(StatsError::empty("best_comment"))
}

/// Comment with the worst score.
pub fn get_worst_comment(
    comments: &[Comment],
    settings: &AwardSettings,
) -> StatsResult<CommentAward> {
    first_min_by_key(comments.iter(), |c| c.score)
        .map(|c| comment_award(c, c.score, settings))
        .ok_or(StatsError::empty("worst_comment"))
}

/// Id of the comment with the most replies, and that reply count.
///
/// Only replies to comments are considered. On a tie the parent seen first
/// wins.
pub fn find_discussed_parent(comments: &[Comment]) -> StatsResult<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for parent in comments.iter().filter_map(Comment::parent_comment_id) {
        let count = counts.entry(parent).or_insert_with(|| {
            order.push(parent);
            0
        });
        *count += 1;
    }

    first_max_by_key(order.into_iter(), |parent| counts[parent])
        .map(|parent| (parent.to_string(), counts[parent]))
        .ok_or(StatsError::empty("discussed_comment"))
}

/// Comment with the most replies.
///
/// When the discussed comment predates the report window it is missing from
/// `comments`; it is then fetched through `lookup` and its live reply count
/// is reported instead.
pub async fn get_discussed_comment(
    lookup: &dyn CommentLookup,
    comments: &[Comment],
    settings: &AwardSettings,
) -> StatsResult<CommentAward> {
    let (parent_id, answers) = find_discussed_parent(comments)?;
    debug!("Most discussed comment is {} with {} answers", parent_id, answers);

    if let Some(comment) = comments.iter().find(|c| c.id == parent_id) {
        return Ok(comment_award(comment, answers as i64, settings));
    }

    warn!(
        "Most discussed comment {} is outside the report window, fetching it separately",
        parent_id
    );
    let live = lookup.fetch_comment(&parent_id).await?;

    Ok(CommentAward {
        author: profile_link(&live.author),
        value: live.reply_count as i64,
        body: sanitize_long_text(&live.body, settings.max_text_length),
        link: link_with_context(&live.permalink, &settings.base_url, settings.context),
        id: parent_id,
    })
}

/// The two authors who answered each other the most.
///
/// Every reply to a comment of the set is an edge between its author and the
/// parent's author; edges are counted per unordered pair. Parents are walked
/// in input order and their replies in input order, and the pair is reported
/// as (parent author, reply author) of its first edge.
pub fn get_amoureux(comments: &[Comment]) -> StatsResult<PairAward> {
    let mut replies: HashMap<&str, Vec<&Comment>> = HashMap::new();
    for comment in comments {
        if let Some(parent) = comment.parent_comment_id() {
            replies.entry(parent).or_default().push(comment);
        }
    }

    // (first edge orientation, count), indexed by the unordered pair
    let mut pairs: Vec<((&str, &str), i64)> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    for parent in comments {
        let Some(children) = replies.get(parent.id.as_str()) else {
            continue;
        };
        for child in children {
            let (a, b) = (parent.author.as_str(), child.author.as_str());
            if a == b || is_deleted_author(a) || is_deleted_author(b) {
                continue;
            }
            let key = if a <= b { (a, b) } else { (b, a) };
            let slot = *index.entry(key).or_insert_with(|| {
                pairs.push(((a, b), 0));
                pairs.len() - 1
            });
            pairs[slot].1 += 1;
        }
    }

    first_max_by_key(pairs.into_iter(), |(_, count)| *count)
        .map(|((author1, author2), score)| PairAward {
            author1: author1.to_string(),
            author2: author2.to_string(),
            score,
        })
        .ok_or(StatsError::empty("amoureux"))
}

/// Best karma per 1000 typed characters, in milliSPHKS.
pub fn get_qualite(comments: &[Comment], settings: &AwardSettings) -> StatsResult<QualityAward> {
    AuthorTotals::from_comments(comments).qualite(settings.qualite_min_length)
}

/// Author who posted the most comments.
pub fn get_poc(comments: &[Comment]) -> StatsResult<AuthorAward> {
    AuthorTotals::from_comments(comments).poc()
}

/// Author who typed the most characters.
pub fn get_tartine(comments: &[Comment]) -> StatsResult<AuthorAward> {
    AuthorTotals::from_comments(comments).tartine()
}

/// Author who typed the most characters in uppercase words.
pub fn get_capslock(comments: &[Comment]) -> StatsResult<AuthorAward> {
    AuthorTotals::from_comments(comments).capslock()
}

/// Author who asked the most questions.
pub fn get_indecision(comments: &[Comment]) -> StatsResult<AuthorAward> {
    AuthorTotals::from_comments(comments).indecision()
}

/// Author who gained the most karma.
pub fn get_jackpot(comments: &[Comment]) -> StatsResult<AuthorAward> {
    AuthorTotals::from_comments(comments).jackpot()
}

/// Author who lost the most karma.
pub fn get_krach(comments: &[Comment]) -> StatsResult<AuthorAward> {
    AuthorTotals::from_comments(comments).krach()
}
