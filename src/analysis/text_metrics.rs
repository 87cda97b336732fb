//! Per-comment text measurements feeding the capslock and indecision awards.

/// Stand-in for punctuation other than `?` while counting questions.
const FILLER: char = '.';

/// Number of characters typed in fully uppercase words.
///
/// ASCII punctuation is removed before splitting on whitespace, so
/// `"COMPTE!!#$@!"` still counts as a six letter word. A word is uppercase
/// when it has at least one uppercase letter and no lowercase one.
pub fn capslock_count(body: &str) -> usize {
    let stripped: String = body.chars().filter(|c| !c.is_ascii_punctuation()).collect();

    stripped
        .split_whitespace()
        .filter(|word| is_uppercase_word(word))
        .map(|word| word.chars().count())
        .sum()
}

fn is_uppercase_word(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

/// Number of distinct questions asked in a comment.
///
/// Punctuation other than `?` collapses into a filler, runs of `?` and of
/// filler collapse into one character, and each `?` closing a segment with
/// real word content counts once. `"Quoi ?!!?!!"` is one question and a bare
/// `"?????"` is none.
pub fn question_count(body: &str) -> usize {
    let mut collapsed = String::with_capacity(body.len());
    for c in body.chars() {
        let c = if c != '?' && c.is_ascii_punctuation() {
            FILLER
        } else {
            c
        };
        if (c == '?' || c == FILLER) && collapsed.ends_with(c) {
            continue;
        }
        collapsed.push(c);
    }

    let segments: Vec<&str> = collapsed.split('?').collect();
    // The trailing segment is not closed by a `?`.
    segments[..segments.len() - 1]
        .iter()
        .filter(|segment| segment.chars().any(char::is_alphanumeric))
        .count()
}
