//! Placeholder substitution for scripting directives
//!
//! Replaces every scripting region with a unique sentinel token so the
//! remaining document is lexically pure HTML. Tokens are `{prefix}{id}{suffix}`
//! where the suffix terminates the decimal id, so no token is a substring
//! of another. The prefix is salted until it appears nowhere in the
//! source, which makes token uniqueness hold for any input.

use crate::segmenter::Region;

const TOKEN_SUFFIX: &str = "__";

/// A placeholder standing in for one scripting region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderEntry {
    /// Sequential id, starting at 0
    pub id: usize,
    /// Index of the scripting region this token replaces
    pub region_index: usize,
    /// The sentinel token as it appears in the placeholder document
    pub token: String,
}

/// The source with every scripting directive replaced by a token
#[derive(Debug, Clone)]
pub struct PlaceholderDocument {
    /// Pure-HTML rendition of the source
    pub html: String,
    /// Entries in document order
    pub placeholders: Vec<PlaceholderEntry>,
    /// Token prefix chosen for this document
    pub token_prefix: String,
    /// Token suffix (fixed)
    pub token_suffix: String,
}

/// A token occurrence found by [`scan_tokens`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenHit {
    pub id: usize,
    pub start: usize,
    pub end: usize,
}

/// Build the placeholder document for a region list
pub fn build(regions: &[Region]) -> PlaceholderDocument {
    let prefix = choose_prefix(regions);
    let mut html = String::new();
    let mut placeholders = Vec::new();

    for (region_index, region) in regions.iter().enumerate() {
        if region.is_scripting() {
            let id = placeholders.len();
            let token = format!("{prefix}{id}{TOKEN_SUFFIX}");
            html.push_str(&token);
            placeholders.push(PlaceholderEntry {
                id,
                region_index,
                token,
            });
        } else {
            html.push_str(region.text());
        }
    }

    PlaceholderDocument {
        html,
        placeholders,
        token_prefix: prefix,
        token_suffix: TOKEN_SUFFIX.to_string(),
    }
}

/// Substitute each entry's token back with its region's original text
///
/// Single-occurrence substitution in entry order; the round-trip law
/// `restore(build(regions).html, ...) == concat(region.text)` holds for
/// any region list.
pub fn restore(document_html: &str, placeholders: &[PlaceholderEntry], regions: &[Region]) -> String {
    let mut result = document_html.to_string();
    for entry in placeholders {
        if let Some(region) = regions.get(entry.region_index) {
            result = result.replacen(&entry.token, region.text(), 1);
        }
    }
    result
}

/// Find all token occurrences in `text`, left to right
pub fn scan_tokens(text: &str, prefix: &str, suffix: &str) -> Vec<TokenHit> {
    let mut hits = Vec::new();
    if prefix.is_empty() {
        return hits;
    }

    let mut search_from = 0;
    while let Some(found) = text[search_from..].find(prefix) {
        let start = search_from + found;
        let digits_start = start + prefix.len();
        let digits_end = text[digits_start..]
            .char_indices()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(i, c)| digits_start + i + c.len_utf8());

        match digits_end {
            Some(digits_end) if text[digits_end..].starts_with(suffix) => {
                let id = text[digits_start..digits_end]
                    .parse::<usize>()
                    .unwrap_or(usize::MAX);
                let end = digits_end + suffix.len();
                hits.push(TokenHit { id, start, end });
                search_from = end;
            }
            _ => {
                search_from = start + prefix.len();
            }
        }
    }

    hits
}

/// Pick a prefix that occurs nowhere in the source
fn choose_prefix(regions: &[Region]) -> String {
    let mut salt = 0usize;
    loop {
        let candidate = format!("__t{salt}_");
        if regions.iter().all(|r| !r.text().contains(&candidate)) {
            return candidate;
        }
        salt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LanguageParser;
    use crate::segmenter::segment;

    fn regions_of(source: &str) -> Vec<Region> {
        let mut template = LanguageParser::template().unwrap();
        let mut ruby = LanguageParser::ruby().unwrap();
        let outcome = template.parse(source).unwrap();
        segment(source, &outcome, &mut ruby).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let source = "<h1>Hi <%= name %></h1>\n<% if a %>\n<p>x</p>\n<% end %>\n";
        let regions = regions_of(source);
        let doc = build(&regions);
        assert_eq!(restore(&doc.html, &doc.placeholders, &regions), source);
    }

    #[test]
    fn test_entry_count_matches_scripting_regions() {
        let source = "<% a %><p><%= b %></p><%# c %>";
        let regions = regions_of(source);
        let doc = build(&regions);
        let scripting = regions.iter().filter(|r| r.is_scripting()).count();
        assert_eq!(doc.placeholders.len(), scripting);
    }

    #[test]
    fn test_entries_ordered_by_region_index() {
        let source = "<% a %>x<%= b %>y<% c %>";
        let regions = regions_of(source);
        let doc = build(&regions);
        let indices: Vec<usize> = doc.placeholders.iter().map(|e| e.region_index).collect();
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(indices, sorted);
    }

    #[test]
    fn test_tokens_unique_in_document() {
        let source = "<% a %><% b %><% c %>";
        let regions = regions_of(source);
        let doc = build(&regions);
        for entry in &doc.placeholders {
            assert_eq!(doc.html.matches(&entry.token).count(), 1);
        }
    }

    #[test]
    fn test_tokens_contain_no_html_meaningful_characters() {
        let regions = regions_of("<% a %>");
        let doc = build(&regions);
        let token = &doc.placeholders[0].token;
        assert!(!token.contains('<'));
        assert!(!token.contains('>'));
        assert!(!token.contains('"'));
        assert!(!token.contains('\''));
        assert!(!token.contains('&'));
    }

    #[test]
    fn test_prefix_salting_avoids_collisions() {
        // The source itself contains what would be the first-choice prefix.
        let source = "<p>__t0_0__</p><% code %>";
        let regions = regions_of(source);
        let doc = build(&regions);
        let token = &doc.placeholders[0].token;
        assert_eq!(doc.html.matches(token.as_str()).count(), 1);
        assert_eq!(restore(&doc.html, &doc.placeholders, &regions), source);
    }

    #[test]
    fn test_scan_tokens() {
        let hits = scan_tokens("a __t0_0__ b __t0_12__ c", "__t0_", "__");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, 0);
        assert_eq!(hits[1].id, 12);
        assert_eq!(&"a __t0_0__ b __t0_12__ c"[hits[0].start..hits[0].end], "__t0_0__");
    }

    #[test]
    fn test_scan_tokens_ignores_bare_prefix() {
        let hits = scan_tokens("__t0_ no digits __t0_x__", "__t0_", "__");
        assert!(hits.is_empty());
    }
}
