//! HTML element classification tables
//!
//! Tag names are compared case-insensitively; callers lowercase before
//! lookup.

/// Elements with no closing tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose rendered content does not introduce a structural line break
pub const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "acronym", "b", "bdo", "big", "br", "button", "cite", "code", "dfn", "em", "i",
    "img", "input", "kbd", "label", "mark", "q", "samp", "small", "span", "strong", "sub", "sup",
    "textarea", "time", "var",
];

/// Elements whose internal whitespace is semantically significant
pub const WHITESPACE_SENSITIVE_ELEMENTS: &[&str] = &["pre", "code", "textarea", "script", "style"];

/// Check if `tag` (lowercase) is a void element
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Check if `tag` (lowercase) is an inline element
pub fn is_inline(tag: &str) -> bool {
    INLINE_ELEMENTS.contains(&tag)
}

/// Check if `tag` (lowercase) is whitespace-sensitive
pub fn is_whitespace_sensitive(tag: &str) -> bool {
    WHITESPACE_SENSITIVE_ELEMENTS.contains(&tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(is_void("br"));
        assert!(!is_void("div"));
        assert!(is_inline("span"));
        assert!(!is_inline("p"));
        assert!(is_whitespace_sensitive("pre"));
        assert!(is_whitespace_sensitive("script"));
        assert!(!is_whitespace_sensitive("div"));
    }

    #[test]
    fn test_overlapping_sets() {
        // code and textarea are both inline and whitespace-sensitive; the
        // emitter gives sensitivity precedence.
        assert!(is_inline("code") && is_whitespace_sensitive("code"));
        assert!(is_inline("textarea") && is_whitespace_sensitive("textarea"));
    }
}
