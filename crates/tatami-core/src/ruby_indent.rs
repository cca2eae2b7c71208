//! Indent-delta classification for scripting directives
//!
//! A logic directive can open a block (`if`, `each do`), continue one
//! (`else`, `when`), or close one (`end`). The classifier prefers the
//! Ruby parse subtree; directives that are only block fragments (`else`,
//! `end`) never parse cleanly, so a keyword-prefix fallback covers them.
//! Both paths agree on the canonical opener/closer keywords.

use tree_sitter::Node;

use crate::segmenter::{DirectiveFlavor, ScriptingRegion};

/// How a directive shifts indentation: `before` applies to its own line,
/// `after` to everything that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndentDelta {
    pub before: i32,
    pub after: i32,
}

impl IndentDelta {
    pub const NONE: IndentDelta = IndentDelta { before: 0, after: 0 };

    fn new(before: i32, after: i32) -> Self {
        Self { before, after }
    }
}

/// Node kinds that wrap the first significant statement
const CONTAINER_KINDS: &[&str] = &["program", "body_statement", "then", "do", "statements"];

/// Block-opening statement kinds
const OPENER_KINDS: &[&str] = &[
    "if",
    "unless",
    "while",
    "until",
    "for",
    "case",
    "case_match",
    "begin",
    "class",
    "module",
    "method",
    "singleton_method",
];

/// Modifier (trailing conditional) kinds; self-contained, no indent shift
const MODIFIER_KINDS: &[&str] = &[
    "if_modifier",
    "unless_modifier",
    "while_modifier",
    "until_modifier",
    "rescue_modifier",
    "conditional_modifier",
];

/// Branch continuation kinds: dedent their own line, re-indent after
const BRANCH_KINDS: &[&str] = &["else", "elsif", "when", "in_clause", "rescue", "ensure"];

/// Keywords the fallback treats as block openers
const OPENER_KEYWORDS: &[&str] = &[
    "if", "unless", "while", "until", "for", "case", "class", "module", "begin", "def",
];

/// Keywords the fallback treats as branch continuations
const BRANCH_KEYWORDS: &[&str] = &["else", "elsif", "when", "rescue", "ensure"];

/// Classify the indent deltas of a scripting region
pub fn classify(region: &ScriptingRegion) -> IndentDelta {
    if region.flavor != DirectiveFlavor::Logic {
        return IndentDelta::NONE;
    }

    if let Some(parse) = &region.code_parse {
        if !parse.root_node().has_error() {
            if let Some(delta) = classify_subtree(parse.root_node()) {
                return delta;
            }
        }
    }

    classify_keyword(&region.code)
}

fn classify_subtree(root: Node<'_>) -> Option<IndentDelta> {
    let node = first_significant(root)?;
    let kind = node.kind();

    if OPENER_KINDS.contains(&kind) {
        return Some(IndentDelta::new(0, 1));
    }
    if MODIFIER_KINDS.contains(&kind) {
        return Some(IndentDelta::NONE);
    }
    if BRANCH_KINDS.contains(&kind) {
        return Some(IndentDelta::new(-1, 1));
    }
    if kind == "do_block" || kind == "block" {
        return Some(IndentDelta::new(0, 1));
    }
    if kind == "call" || kind == "method_call" {
        if let Some(block) = node.child_by_field_name("block") {
            if block.kind() == "do_block" {
                return Some(IndentDelta::new(0, 1));
            }
        }
        return Some(IndentDelta::NONE);
    }

    None
}

/// Descend through container nodes to the first significant statement
fn first_significant(root: Node<'_>) -> Option<Node<'_>> {
    let mut node = root;
    loop {
        if !CONTAINER_KINDS.contains(&node.kind()) {
            return Some(node);
        }
        node = (0..node.named_child_count())
            .filter_map(|i| node.named_child(i))
            .find(|c| c.kind() != "comment")?;
    }
}

/// Keyword-prefix fallback for code that does not parse cleanly
fn classify_keyword(code: &str) -> IndentDelta {
    let word = leading_word(code);

    if word == "end" {
        return IndentDelta::new(-1, 0);
    }
    if BRANCH_KEYWORDS.contains(&word) {
        return IndentDelta::new(-1, 1);
    }
    if OPENER_KEYWORDS.contains(&word) {
        return IndentDelta::new(0, 1);
    }
    if ends_with_do(code) {
        return IndentDelta::new(0, 1);
    }

    IndentDelta::NONE
}

fn leading_word(code: &str) -> &str {
    let code = code.trim_start();
    let end = code
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(code.len());
    &code[..end]
}

/// True for code ending in `do` or `do |params|`
fn ends_with_do(code: &str) -> bool {
    let trimmed = code.trim_end();

    if let Some(head) = trimmed.strip_suffix("do") {
        return head.is_empty() || head.ends_with(char::is_whitespace);
    }

    if let Some(inner) = trimmed.strip_suffix('|') {
        if let Some(open) = inner.rfind('|') {
            let head = inner[..open].trim_end();
            if let Some(before_do) = head.strip_suffix("do") {
                return before_do.is_empty() || before_do.ends_with(char::is_whitespace);
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LanguageParser;
    use crate::segmenter::{segment, Region};

    fn region_for(directive: &str) -> Region {
        let mut template = LanguageParser::template().unwrap();
        let mut ruby = LanguageParser::ruby().unwrap();
        let outcome = template.parse(directive).unwrap();
        let mut regions = segment(directive, &outcome, &mut ruby).unwrap();
        regions.remove(0)
    }

    fn delta_of(directive: &str) -> IndentDelta {
        let region = region_for(directive);
        classify(region.as_scripting().unwrap())
    }

    #[test]
    fn test_openers() {
        assert_eq!(delta_of("<% if @user %>"), IndentDelta::new(0, 1));
        assert_eq!(delta_of("<% unless done %>"), IndentDelta::new(0, 1));
        assert_eq!(delta_of("<% while x < 3 %>"), IndentDelta::new(0, 1));
        assert_eq!(delta_of("<% case status %>"), IndentDelta::new(0, 1));
        assert_eq!(delta_of("<% def helper %>"), IndentDelta::new(0, 1));
    }

    #[test]
    fn test_closer() {
        assert_eq!(delta_of("<% end %>"), IndentDelta::new(-1, 0));
    }

    #[test]
    fn test_branches() {
        assert_eq!(delta_of("<% else %>"), IndentDelta::new(-1, 1));
        assert_eq!(delta_of("<% elsif other %>"), IndentDelta::new(-1, 1));
        assert_eq!(delta_of("<% when :draft %>"), IndentDelta::new(-1, 1));
        assert_eq!(delta_of("<% rescue Error %>"), IndentDelta::new(-1, 1));
        assert_eq!(delta_of("<% ensure %>"), IndentDelta::new(-1, 1));
    }

    #[test]
    fn test_do_blocks() {
        assert_eq!(delta_of("<% items.each do %>"), IndentDelta::new(0, 1));
        assert_eq!(delta_of("<% items.each do |item| %>"), IndentDelta::new(0, 1));
        assert_eq!(delta_of("<% form_for @user do |f| %>"), IndentDelta::new(0, 1));
    }

    #[test]
    fn test_modifier_is_neutral() {
        assert_eq!(delta_of("<% raise if broken %>"), IndentDelta::NONE);
        assert_eq!(delta_of("<% next unless valid %>"), IndentDelta::NONE);
    }

    #[test]
    fn test_plain_statements_are_neutral() {
        assert_eq!(delta_of("<% x = 5 %>"), IndentDelta::NONE);
        assert_eq!(delta_of("<% render partial %>"), IndentDelta::NONE);
        assert_eq!(delta_of("<% items.map { |i| i * 2 } %>"), IndentDelta::NONE);
    }

    #[test]
    fn test_output_and_comment_are_neutral() {
        assert_eq!(delta_of("<%= link_to name, path %>"), IndentDelta::NONE);
        assert_eq!(delta_of("<%# if this were code %>"), IndentDelta::NONE);
    }

    #[test]
    fn test_keyword_fallback_word_boundaries() {
        // `endpoint` must not be read as `end`
        assert_eq!(classify_keyword("endpoint.call"), IndentDelta::NONE);
        assert_eq!(classify_keyword("iffy = 1"), IndentDelta::NONE);
        assert_eq!(classify_keyword("end"), IndentDelta::new(-1, 0));
    }

    #[test]
    fn test_ends_with_do_detection() {
        assert!(ends_with_do("items.each do"));
        assert!(ends_with_do("items.each do |a, b|"));
        assert!(!ends_with_do("avocado"));
        assert!(!ends_with_do("x = 1"));
    }
}
