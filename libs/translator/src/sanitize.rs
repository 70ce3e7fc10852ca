use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<.*?>").expect("tag pattern is valid"));

/// Removes every `<...>` tag-like substring, including tags spanning several lines.
///
/// This is a best-effort cleanup of Intercom's HTML bodies, not an HTML parser: entities are
/// left alone and an unmatched `<` passes through.
///
/// ```
/// use ic_translator::strip_markup;
///
/// assert_eq!(strip_markup("<p>Hello <b>there</b></p>"), "Hello there");
/// assert_eq!(strip_markup("1 < 2"), "1 < 2");
/// ```
pub fn strip_markup(raw: &str) -> Cow<'_, str> {
    TAG.replace_all(raw, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_multiline_tags() {
        assert_eq!(strip_markup("<a\nhref=\"x\">link</a>"), "link");
    }

    #[test]
    fn non_greedy_keeps_text_between_tags() {
        assert_eq!(strip_markup("<i>a</i> and <i>b</i>"), "a and b");
    }

    #[test]
    fn plain_text_is_borrowed_unchanged() {
        let out = strip_markup("no tags here > really");
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, "no tags here > really");
    }

    #[test]
    fn malformed_markup_does_not_fail() {
        assert_eq!(strip_markup("<b>unterminated <i"), "unterminated <i");
        assert_eq!(strip_markup("<>"), "");
        assert_eq!(strip_markup(""), "");
    }
}
