//! `$name` template substitution.
//!
//! Placeholders are `$name` or `${name}`, where a name is made of ASCII
//! letters, digits and underscores and does not start with a digit. `$$`
//! produces a literal dollar sign. Placeholders without a value and stray
//! dollar signs are copied through unchanged.

use crate::report::assembler::ReportEnv;

/// Substitute every known placeholder of `template` with its value from `env`.
pub fn render_template(template: &str, env: &ReportEnv) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        output.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            output.push('$');
            rest = tail;
            continue;
        }

        let (name, consumed) = match after.strip_prefix('{') {
            Some(braced) => match braced.find('}') {
                Some(end) if is_identifier(&braced[..end]) => (&braced[..end], end + 2),
                _ => ("", 0),
            },
            None => {
                let len = identifier_len(after);
                (&after[..len], len)
            }
        };

        match env.get(name) {
            Some(value) if !name.is_empty() => {
                output.push_str(&value.to_string());
                rest = &after[consumed..];
            }
            _ => {
                output.push('$');
                rest = after;
            }
        }
    }

    output.push_str(rest);
    output
}

fn identifier_len(text: &str) -> usize {
    let mut len = 0;
    for (i, c) in text.char_indices() {
        let valid = c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit());
        if !valid {
            break;
        }
        len = i + c.len_utf8();
    }
    len
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty() && identifier_len(text) == text.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportValue;

    fn env() -> ReportEnv {
        let mut env = ReportEnv::new();
        env.insert("poc_author".to_string(), ReportValue::from("/u/bob"));
        env.insert("poc_score".to_string(), ReportValue::from(12i64));
        env.insert("qualite_score".to_string(), ReportValue::from(153.846));
        env
    }

    #[test]
    fn test_render_simple_placeholders() {
        let rendered = render_template("$poc_author a posté $poc_score commentaires.", &env());
        assert_eq!(rendered, "/u/bob a posté 12 commentaires.");
    }

    #[test]
    fn test_render_braced_placeholder() {
        let rendered = render_template("${poc_score}x et ${qualite_score} mSPHKS", &env());
        assert_eq!(rendered, "12x et 153.85 mSPHKS");
    }

    #[test]
    fn test_render_keeps_unknown_placeholders() {
        let rendered = render_template("$missing ${missing} $ 5$ ${poc_author", &env());
        assert_eq!(rendered, "$missing ${missing} $ 5$ ${poc_author");
    }

    #[test]
    fn test_render_escaped_dollar() {
        assert_eq!(render_template("$$poc_score", &env()), "$poc_score");
        assert_eq!(render_template("cost: $$5", &env()), "cost: $5");
    }

    #[test]
    fn test_identifier_stops_at_punctuation() {
        assert_eq!(render_template("[$poc_author](link)", &env()), "[/u/bob](link)");
        assert_eq!(render_template("$poc_score€", &env()), "12€");
    }
}
