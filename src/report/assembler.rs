//! Report assembly.
//!
//! Runs every award once over the report window and flattens the results
//! into the named mapping consumed by the templates.

use crate::analysis::{self, AuthorTotals, AwardSettings};
use crate::error::StatsResult;
use crate::lookup::CommentLookup;
use crate::models::{AuthorAward, CommentAward, PostAward, ReportValue};
use crate::records::RecordSet;
use crate::sanitize::sanitize_username;
use std::collections::BTreeMap;
use tracing::info;

/// Flat mapping from template variable to value.
pub type ReportEnv = BTreeMap<String, ReportValue>;

/// Report-level facts that do not come from the records.
#[derive(Debug, Clone)]
pub struct ReportContext {
    /// Display date of the report window.
    pub date: String,
    /// Subreddit the records come from.
    pub subreddit: String,
}

fn insert(env: &mut ReportEnv, key: &str, value: impl Into<ReportValue>) {
    env.insert(key.to_string(), value.into());
}

fn insert_post(env: &mut ReportEnv, prefix: &str, value_key: &str, award: PostAward) {
    insert(env, &format!("{}_author", prefix), sanitize_username(&award.author));
    insert(env, &format!("{}_{}", prefix, value_key), award.value);
    insert(env, &format!("{}_title", prefix), award.title);
    insert(env, &format!("{}_link", prefix), award.link);
    insert(env, &format!("{}_id", prefix), award.id);
}

fn insert_comment(env: &mut ReportEnv, prefix: &str, value_key: &str, award: CommentAward) {
    insert(env, &format!("{}_author", prefix), sanitize_username(&award.author));
    insert(env, &format!("{}_{}", prefix, value_key), award.value);
    insert(env, &format!("{}_body", prefix), award.body);
    insert(env, &format!("{}_link", prefix), award.link);
    insert(env, &format!("{}_id", prefix), award.id);
}

fn insert_author(env: &mut ReportEnv, prefix: &str, award: AuthorAward) {
    insert(env, &format!("{}_author", prefix), sanitize_username(&award.author));
    insert(env, &format!("{}_score", prefix), award.score);
}

/// Compute every award and merge them into one mapping.
///
/// The first failing award aborts the whole report.
pub async fn assemble_report(
    records: &RecordSet,
    context: &ReportContext,
    settings: &AwardSettings,
    lookup: &dyn CommentLookup,
) -> StatsResult<ReportEnv> {
    let posts = &records.posts;
    let comments = &records.comments;
    let mut env = ReportEnv::new();

    insert(&mut env, "date", context.date.as_str());
    insert(&mut env, "subreddit", context.subreddit.as_str());
    insert(&mut env, "number_total_posts", posts.len());
    insert(&mut env, "number_total_comments", comments.len());
    insert(&mut env, "number_unique_users", records.unique_authors());

    insert_post(&mut env, "best_post", "score", analysis::get_best_post(posts)?);
    insert_post(
        &mut env,
        "commented_post",
        "comments",
        analysis::get_commented_post(posts, settings)?,
    );
    insert_comment(
        &mut env,
        "best_comment",
        "score",
        analysis::get_best_comment(comments, settings)?,
    );
    insert_comment(
        &mut env,
        "worst_comment",
        "score",
        analysis::get_worst_comment(comments, settings)?,
    );
    insert_comment(
        &mut env,
        "discussed_comment",
        "answers",
        analysis::get_discussed_comment(lookup, comments, settings).await?,
    );

    let amoureux = analysis::get_amoureux(comments)?;
    insert(&mut env, "amoureux_author1", sanitize_username(&amoureux.author1));
    insert(&mut env, "amoureux_author2", sanitize_username(&amoureux.author2));
    insert(&mut env, "amoureux_score", amoureux.score);

    // One pass feeds every per-author award.
    let totals = AuthorTotals::from_comments(comments);

    let qualite = totals.qualite(settings.qualite_min_length)?;
    insert(&mut env, "qualite_author", sanitize_username(&qualite.author));
    insert(&mut env, "qualite_score", qualite.score);

    insert_author(&mut env, "poc", totals.poc()?);
    insert_author(&mut env, "tartine", totals.tartine()?);
    insert_author(&mut env, "capslock", totals.capslock()?);
    insert_author(&mut env, "indecision", totals.indecision()?);
    insert_author(&mut env, "jackpot", totals.jackpot()?);
    insert_author(&mut env, "krach", totals.krach()?);

    info!("Assembled report with {} values", env.len());
    Ok(env)
}

/// Values for the title template: the bare period date and the best comment.
pub fn title_env(env: &ReportEnv, title_date: &str) -> ReportEnv {
    let mut title = ReportEnv::new();
    insert(&mut title, "date", title_date);
    if let Some(body) = env.get("best_comment_body") {
        title.insert("title".to_string(), body.clone());
    }
    title
}
