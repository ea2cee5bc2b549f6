//! Input Sanitization

use once_cell::sync::Lazy;
use regex::Regex;

// An unterminated tag runs to the end of the input; a lone '<' is text
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[a-zA-Z/!?][^>]*(?:>|$)").unwrap());
static OCTET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"%[a-fA-F0-9]{2}").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Clean a single-line text identifier.
///
/// Strips markup tags and percent-encoded octets, turns tabs and line breaks
/// into spaces, collapses whitespace runs and trims the result.
pub fn sanitize_text_field(input: &str) -> String {
    let stripped = TAG_RE.replace_all(input, "");
    let stripped = OCTET_RE.replace_all(&stripped, "");

    WHITESPACE_RE.replace_all(&stripped, " ").trim().to_string()
}

/// Sanitize an optional identifier; blank results become `None`
pub fn sanitize_identifier(input: Option<&str>) -> Option<String> {
    input
        .map(sanitize_text_field)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifier_unchanged() {
        assert_eq!(sanitize_text_field("wc_order_AbC123"), "wc_order_AbC123");
        assert_eq!(sanitize_text_field("42"), "42");
    }

    #[test]
    fn test_whitespace_collapsed_and_trimmed() {
        assert_eq!(sanitize_text_field("  42\t\n "), "42");
        assert_eq!(sanitize_text_field("a \r\n  b"), "a b");
    }

    #[test]
    fn test_tags_removed() {
        assert_eq!(sanitize_text_field("<b>42</b>"), "42");
        assert_eq!(sanitize_text_field("<i>4</i>2"), "42");
        assert_eq!(sanitize_text_field("42<img src=x"), "42");
        assert_eq!(sanitize_text_field("1 < 2"), "1 < 2");
    }

    #[test]
    fn test_octets_removed() {
        assert_eq!(sanitize_text_field("42%0A%3c"), "42");
        assert_eq!(sanitize_text_field("100%"), "100%");
        assert_eq!(sanitize_text_field("%zz"), "%zz");
    }

    #[test]
    fn test_identifier_blank_becomes_none() {
        assert_eq!(sanitize_identifier(None), None);
        assert_eq!(sanitize_identifier(Some("   ")), None);
        assert_eq!(sanitize_identifier(Some("<br>")), None);
        assert_eq!(sanitize_identifier(Some(" 42 ")), Some("42".into()));
    }

    #[test]
    fn test_non_ascii_preserved() {
        assert_eq!(sanitize_text_field("commande-é"), "commande-é");
    }
}
