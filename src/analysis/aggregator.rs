//! Per-author aggregation and tie-stable selection helpers.
//!
//! All per-author awards are derived from a single pass over the comments
//! that accumulates every running total at once. Authors keep the order in
//! which they first appear, so strict comparisons resolve ties in favour of
//! the earliest author.

use crate::analysis::text_metrics::{capslock_count, question_count};
use crate::error::{StatsError, StatsResult};
use crate::models::{AuthorAward, Comment, QualityAward};
use crate::sanitize::is_deleted_author;
use std::collections::HashMap;

/// First item holding the strictly greatest key.
pub fn first_max_by_key<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Option<T>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    select_first(items, key, |candidate, best| candidate > best)
}

/// First item holding the strictly smallest key.
pub fn first_min_by_key<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Option<T>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    select_first(items, key, |candidate, best| candidate < best)
}

fn select_first<T, K, F>(
    items: impl IntoIterator<Item = T>,
    key: F,
    replaces: impl Fn(&K, &K) -> bool,
) -> Option<T>
where
    F: Fn(&T) -> K,
{
    let mut best: Option<(T, K)> = None;
    for item in items {
        let k = key(&item);
        let take = match best {
            Some((_, ref best_key)) => replaces(&k, best_key),
            None => true,
        };
        if take {
            best = Some((item, k));
        }
    }
    best.map(|(item, _)| item)
}

/// Running totals of one author.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorTally {
    pub author: String,
    pub comments: i64,
    pub length: i64,
    pub score: i64,
    pub capslock: i64,
    pub questions: i64,
    /// Record index at which the author reached each comment count.
    reached_at: Vec<usize>,
}

impl AuthorTally {
    fn new(author: &str) -> Self {
        Self {
            author: author.to_string(),
            ..Self::default()
        }
    }

    fn add(&mut self, position: usize, comment: &Comment) {
        self.comments += 1;
        self.length += comment.length as i64;
        self.score += comment.score;
        self.capslock += capslock_count(&comment.body) as i64;
        self.questions += question_count(&comment.body) as i64;
        self.reached_at.push(position);
    }

    /// Karma per 1000 characters.
    fn milli_sphks(&self) -> f64 {
        1000.0 * self.score as f64 / self.length as f64
    }

    fn award(&self, score: i64) -> AuthorAward {
        AuthorAward {
            author: self.author.clone(),
            score,
        }
    }
}

/// Per-author totals over a comment set, deleted authors excluded.
#[derive(Debug, Clone, Default)]
pub struct AuthorTotals {
    tallies: Vec<AuthorTally>,
}

impl AuthorTotals {
    /// Accumulate every per-author total in one pass.
    pub fn from_comments(comments: &[Comment]) -> Self {
        let mut tallies: Vec<AuthorTally> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for (position, comment) in comments.iter().enumerate() {
            if is_deleted_author(&comment.author) {
                continue;
            }
            let slot = *index.entry(comment.author.as_str()).or_insert_with(|| {
                tallies.push(AuthorTally::new(&comment.author));
                tallies.len() - 1
            });
            tallies[slot].add(position, comment);
        }

        Self { tallies }
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    /// Tallies in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = &AuthorTally> {
        self.tallies.iter()
    }

    pub fn get(&self, author: &str) -> Option<&AuthorTally> {
        self.tallies.iter().find(|t| t.author == author)
    }

    /// Author with the most comments. On a tie, the author who reached the
    /// top count first wins.
    pub fn poc(&self) -> StatsResult<AuthorAward> {
        let max = self
            .tallies
            .iter()
            .map(|t| t.comments)
            .max()
            .ok_or(StatsError::empty("poc"))?;

        let winner = first_min_by_key(
            self.tallies.iter().filter(|t| t.comments == max),
            |t| t.reached_at[max as usize - 1],
        )
        .ok_or(StatsError::empty("poc"))?;

        Ok(winner.award(max))
    }

    /// Author who typed the most characters.
    pub fn tartine(&self) -> StatsResult<AuthorAward> {
        self.max_by("tartine", |t| t.length)
    }

    /// Author who typed the most characters in uppercase words.
    pub fn capslock(&self) -> StatsResult<AuthorAward> {
        self.max_by("capslock", |t| t.capslock)
    }

    /// Author who asked the most questions.
    pub fn indecision(&self) -> StatsResult<AuthorAward> {
        self.max_by("indecision", |t| t.questions)
    }

    /// Author who gained the most karma.
    pub fn jackpot(&self) -> StatsResult<AuthorAward> {
        self.max_by("jackpot", |t| t.score)
    }

    /// Author who lost the most karma.
    pub fn krach(&self) -> StatsResult<AuthorAward> {
        first_min_by_key(self.tallies.iter(), |t| t.score)
            .map(|t| t.award(t.score))
            .ok_or(StatsError::empty("krach"))
    }

    /// Best karma per character among authors who typed more than
    /// `min_length` characters in total.
    pub fn qualite(&self, min_length: usize) -> StatsResult<QualityAward> {
        let eligible = self
            .tallies
            .iter()
            .filter(|t| t.length > min_length as i64);

        first_max_by_key(eligible, |t| t.milli_sphks())
            .map(|t| QualityAward {
                author: t.author.clone(),
                score: round2(t.milli_sphks()),
            })
            .ok_or(StatsError::empty("qualite"))
    }

    fn max_by(&self, stat: &'static str, key: impl Fn(&AuthorTally) -> i64) -> StatsResult<AuthorAward> {
        first_max_by_key(self.tallies.iter(), |t| key(*t))
            .map(|t| t.award(key(t)))
            .ok_or(StatsError::empty(stat))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(author: &str, score: i64, body: &str) -> Comment {
        Comment {
            id: String::new(),
            author: author.to_string(),
            score,
            body: body.to_string(),
            permalink: String::new(),
            parent: "t3_p".to_string(),
            length: body.chars().count(),
            timestamp: 0,
        }
    }

    #[test]
    fn test_first_max_and_min_keep_first_on_tie() {
        let values = [(1, "a"), (3, "b"), (3, "c"), (-2, "d"), (-2, "e")];
        assert_eq!(first_max_by_key(values.iter(), |v| v.0).unwrap().1, "b");
        assert_eq!(first_min_by_key(values.iter(), |v| v.0).unwrap().1, "d");
        assert!(first_max_by_key(Vec::<i32>::new(), |v| *v).is_none());
    }

    #[test]
    fn test_totals_per_author() {
        let comments = vec![
            comment("a", 3, "HELLO?"),
            comment("b", -1, "hi"),
            comment("a", 2, "ok"),
        ];
        let totals = AuthorTotals::from_comments(&comments);

        let a = totals.get("a").unwrap();
        assert_eq!(a.comments, 2);
        assert_eq!(a.length, 8);
        assert_eq!(a.score, 5);
        assert_eq!(a.capslock, 5);
        assert_eq!(a.questions, 1);

        let b = totals.get("b").unwrap();
        assert_eq!(b.comments, 1);
        assert_eq!(b.score, -1);
    }

    #[test]
    fn test_deleted_authors_are_skipped() {
        let comments = vec![comment("None", 100, "x"), comment("/u/None", 50, "y")];
        let totals = AuthorTotals::from_comments(&comments);
        assert!(totals.is_empty());
        assert!(matches!(
            totals.jackpot(),
            Err(StatsError::EmptyInput { stat: "jackpot" })
        ));
    }

    #[test]
    fn test_poc_tie_goes_to_first_to_reach_count() {
        let comments = vec![
            comment("a", 1, "x"),
            comment("b", 1, "x"),
            comment("b", 1, "x"),
            comment("a", 1, "x"),
        ];
        let award = AuthorTotals::from_comments(&comments).poc().unwrap();
        assert_eq!(award.author, "b");
        assert_eq!(award.score, 2);
    }

    #[test]
    fn test_qualite_rounding() {
        let comments = vec![comment("a", 2, "abc")];
        let award = AuthorTotals::from_comments(&comments).qualite(0).unwrap();
        assert_eq!(award.score, 666.67);
        assert!(AuthorTotals::from_comments(&comments).qualite(3).is_err());
    }
}
