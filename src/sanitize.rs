//! Text sanitizing for comment bodies, long excerpts, usernames and links.

/// Literal the forum client reports for a deleted or unknown author.
pub const DELETED_AUTHOR: &str = "None";

/// Prefix turning a username into a profile link.
pub const PROFILE_PREFIX: &str = "/u/";

/// Display string substituted for a deleted or unknown author.
pub const UNKNOWN_USER: &str = "un inconnu";

pub const DEFAULT_BASE_URL: &str = "https://reddit.com";
pub const DEFAULT_CONTEXT: u32 = 2;
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 150;

const ELLIPSIS: char = '…';

/// Drop quoted lines (`>`) and join what is left into a single line.
pub fn sanitize_comment_body(body: &str) -> String {
    body.split('\n')
        .filter(|line| !line.starts_with('>'))
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Shorten `text` to fewer than `max_length` characters without splitting a word.
///
/// Newlines are removed first. Text shorter than `max_length` is returned as
/// is; anything else is cut at `max_length - 1` characters, backed up to the
/// last whitespace and terminated by an ellipsis.
pub fn sanitize_long_text(text: &str, max_length: usize) -> String {
    let text: String = text.chars().filter(|c| *c != '\n').collect();
    if text.chars().count() < max_length {
        return text;
    }

    let cut: String = text.chars().take(max_length.saturating_sub(1)).collect();
    let kept = match cut.rfind(char::is_whitespace) {
        Some(pos) => &cut[..pos],
        None => cut.as_str(),
    };

    format!("{}{}", kept, ELLIPSIS)
}

/// Whether `name` is the deleted-author marker, bare or as a profile link.
pub fn is_deleted_author(name: &str) -> bool {
    name == DELETED_AUTHOR || name.strip_prefix(PROFILE_PREFIX) == Some(DELETED_AUTHOR)
}

/// Replace the deleted-author marker with a readable placeholder.
pub fn sanitize_username(name: &str) -> String {
    if is_deleted_author(name) {
        UNKNOWN_USER.to_string()
    } else {
        name.to_string()
    }
}

/// Prefix a bare username with the profile-link prefix.
pub fn profile_link(name: &str) -> String {
    if name.starts_with(PROFILE_PREFIX) {
        name.to_string()
    } else {
        format!("{}{}", PROFILE_PREFIX, name)
    }
}

/// Absolute link to a permalink, asking the forum to show parent context.
pub fn sanitize_link(permalink: &str) -> String {
    link_with_context(permalink, DEFAULT_BASE_URL, DEFAULT_CONTEXT)
}

pub fn link_with_context(permalink: &str, base_url: &str, context: u32) -> String {
    format!("{}?context={}", absolute_link(permalink, base_url), context)
}

/// Absolute link to a permalink. Already absolute links are kept.
pub fn absolute_link(permalink: &str, base_url: &str) -> String {
    if permalink.starts_with("http://") || permalink.starts_with("https://") {
        permalink.to_string()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), permalink)
    }
}
