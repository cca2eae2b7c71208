//! Region segmentation of template sources
//!
//! Walks the embedded-template tree's top-level named children and maps
//! each to a region. Regions tile the source exactly: gaps the grammar
//! leaves between named children (stray delimiters, error recovery) are
//! captured as HTML regions so that concatenating every region's text
//! reproduces the source byte-for-byte.

use tree_sitter::Node;

use crate::parser::{LanguageParser, ParseOutcome};
use crate::result::Result;

/// A position in the source: byte offset plus 0-based row/column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePosition {
    pub offset: usize,
    pub row: usize,
    pub column: usize,
}

impl SourcePosition {
    fn from_node_start(node: Node<'_>) -> Self {
        let point = node.start_position();
        Self {
            offset: node.start_byte(),
            row: point.row,
            column: point.column,
        }
    }

    fn from_node_end(node: Node<'_>) -> Self {
        let point = node.end_position();
        Self {
            offset: node.end_byte(),
            row: point.row,
            column: point.column,
        }
    }
}

/// A half-open byte span of the source with row/column endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSpan {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl SourceSpan {
    /// Span covering a single tree-sitter node
    pub fn of_node(node: Node<'_>) -> Self {
        Self {
            start: SourcePosition::from_node_start(node),
            end: SourcePosition::from_node_end(node),
        }
    }

    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset >= self.end.offset
    }
}

/// The directive flavor of a scripting region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveFlavor {
    /// `<% ... %>` — code that produces no output
    Logic,
    /// `<%= ... %>` — expression interpolation
    Output,
    /// `<%# ... %>` — comment
    Comment,
    /// Anything the grammar labelled differently
    Unknown,
}

/// A scripting directive region
#[derive(Debug)]
pub struct ScriptingRegion {
    pub span: SourceSpan,
    /// Full source slice including delimiters
    pub text: String,
    pub flavor: DirectiveFlavor,
    /// Opening delimiter as written (`<%`, `<%=`, `<%#`, `<%-`, ...)
    pub open_delim: String,
    /// Closing delimiter as written (`%>` or `-%>`)
    pub close_delim: String,
    /// Trimmed inner code text
    pub code: String,
    /// Span of the inner code node, when the grammar produced one
    pub code_span: Option<SourceSpan>,
    /// Ruby parse of the trimmed code (logic and output flavors only)
    pub code_parse: Option<ParseOutcome>,
}

/// One region of the segmented source
#[derive(Debug)]
pub enum Region {
    /// A span of plain HTML markup
    Html { span: SourceSpan, text: String },
    /// An embedded scripting directive
    Scripting(ScriptingRegion),
    /// A node the template grammar labelled with an unexpected kind
    Unknown {
        span: SourceSpan,
        text: String,
        node_kind: String,
    },
}

impl Region {
    /// The source slice this region covers
    pub fn text(&self) -> &str {
        match self {
            Region::Html { text, .. } => text,
            Region::Scripting(s) => &s.text,
            Region::Unknown { text, .. } => text,
        }
    }

    /// The source span this region covers
    pub fn span(&self) -> SourceSpan {
        match self {
            Region::Html { span, .. } => *span,
            Region::Scripting(s) => s.span,
            Region::Unknown { span, .. } => *span,
        }
    }

    pub fn is_scripting(&self) -> bool {
        matches!(self, Region::Scripting(_))
    }

    pub fn as_scripting(&self) -> Option<&ScriptingRegion> {
        match self {
            Region::Scripting(s) => Some(s),
            _ => None,
        }
    }
}

/// Opening delimiters, longest first so prefixes don't shadow each other
const OPEN_DELIMS: &[&str] = &["<%%=", "<%#", "<%=", "<%-", "<%%", "<%"];
/// Closing delimiters, longest first
const CLOSE_DELIMS: &[&str] = &["-%>", "%%>", "%>"];

fn detect_open_delim(text: &str) -> &str {
    OPEN_DELIMS
        .iter()
        .find(|d| text.starts_with(**d))
        .copied()
        .unwrap_or("<%")
}

fn detect_close_delim(text: &str) -> &str {
    CLOSE_DELIMS
        .iter()
        .find(|d| text.ends_with(**d))
        .copied()
        .unwrap_or("%>")
}

/// Segment a parsed template into an ordered region list tiling the source
pub fn segment(
    source: &str,
    template: &ParseOutcome,
    ruby: &mut LanguageParser,
) -> Result<Vec<Region>> {
    let root = template.root_node();
    let mut regions = Vec::new();
    let mut cursor = SourcePosition::default();

    for i in 0..root.named_child_count() {
        let child = match root.named_child(i) {
            Some(c) => c,
            None => continue,
        };

        // Gap the grammar did not cover with a named child.
        if child.start_byte() > cursor.offset {
            let span = SourceSpan {
                start: cursor,
                end: SourcePosition::from_node_start(child),
            };
            regions.push(Region::Html {
                span,
                text: source[span.start.offset..span.end.offset].to_string(),
            });
        }

        let span = SourceSpan::of_node(child);
        let text = source[child.start_byte()..child.end_byte()].to_string();

        match child.kind() {
            "content" => regions.push(Region::Html { span, text }),
            "directive" => {
                regions.push(scripting_region(source, child, DirectiveFlavor::Logic, ruby)?)
            }
            "output_directive" => regions.push(scripting_region(
                source,
                child,
                DirectiveFlavor::Output,
                ruby,
            )?),
            "comment_directive" => regions.push(scripting_region(
                source,
                child,
                DirectiveFlavor::Comment,
                ruby,
            )?),
            other => regions.push(Region::Unknown {
                span,
                text,
                node_kind: other.to_string(),
            }),
        }

        cursor = SourcePosition::from_node_end(child);
    }

    // Trailing bytes the grammar did not cover.
    if cursor.offset < source.len() {
        let span = SourceSpan {
            start: cursor,
            end: SourcePosition::from_node_end(root),
        };
        regions.push(Region::Html {
            span,
            text: source[cursor.offset..].to_string(),
        });
    }

    tracing::debug!(
        regions = regions.len(),
        scripting = regions.iter().filter(|r| r.is_scripting()).count(),
        "segmented template"
    );

    Ok(regions)
}

fn scripting_region(
    source: &str,
    node: Node<'_>,
    flavor: DirectiveFlavor,
    ruby: &mut LanguageParser,
) -> Result<Region> {
    let span = SourceSpan::of_node(node);
    let text = source[node.start_byte()..node.end_byte()].to_string();
    let open_delim = detect_open_delim(&text).to_string();
    let close_delim = detect_close_delim(&text).to_string();

    // The grammar nests the inner text as a `code` child (`comment` for
    // comment directives). Fall back to stripping delimiters textually.
    let code_node = named_child_of_kind(node, "code").or_else(|| named_child_of_kind(node, "comment"));
    let (code, code_span) = match code_node {
        Some(c) => (
            source[c.start_byte()..c.end_byte()].trim().to_string(),
            Some(SourceSpan::of_node(c)),
        ),
        None => (inner_code_text(&text, &open_delim, &close_delim), None),
    };

    let code_parse = if code.is_empty()
        || !matches!(flavor, DirectiveFlavor::Logic | DirectiveFlavor::Output)
    {
        None
    } else {
        // Trailing newline keeps terminator-hungry grammars happy.
        Some(ruby.parse(&format!("{code}\n"))?)
    };

    Ok(Region::Scripting(ScriptingRegion {
        span,
        text,
        flavor,
        open_delim,
        close_delim,
        code,
        code_span,
        code_parse,
    }))
}

fn named_child_of_kind<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .find(|c| c.kind() == kind)
}

fn inner_code_text(text: &str, open_delim: &str, close_delim: &str) -> String {
    let start = open_delim.len().min(text.len());
    let end = text.len().saturating_sub(close_delim.len()).max(start);
    text[start..end].trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment_source(source: &str) -> Vec<Region> {
        let mut template = LanguageParser::template().unwrap();
        let mut ruby = LanguageParser::ruby().unwrap();
        let outcome = template.parse(source).unwrap();
        segment(source, &outcome, &mut ruby).unwrap()
    }

    #[test]
    fn test_regions_tile_source() {
        let source = "<h1>Hi <%= name %></h1>\n<% if a %>\n<p>x</p>\n<% end %>\n";
        let regions = segment_source(source);
        let rebuilt: String = regions.iter().map(|r| r.text()).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_flavors() {
        let source = "<% code %><%= out %><%# note %>text";
        let regions = segment_source(source);
        let flavors: Vec<DirectiveFlavor> = regions
            .iter()
            .filter_map(|r| r.as_scripting())
            .map(|s| s.flavor)
            .collect();
        assert_eq!(
            flavors,
            vec![
                DirectiveFlavor::Logic,
                DirectiveFlavor::Output,
                DirectiveFlavor::Comment
            ]
        );
    }

    #[test]
    fn test_code_is_trimmed() {
        let source = "<%=   user.name   %>";
        let regions = segment_source(source);
        let scripting = regions[0].as_scripting().unwrap();
        assert_eq!(scripting.code, "user.name");
        assert_eq!(scripting.open_delim, "<%=");
        assert_eq!(scripting.close_delim, "%>");
        assert!(scripting.code_parse.is_some());
    }

    #[test]
    fn test_empty_directive_has_no_subtree() {
        let source = "<%  %>";
        let regions = segment_source(source);
        let scripting = regions[0].as_scripting().unwrap();
        assert!(scripting.code.is_empty());
        assert!(scripting.code_parse.is_none());
    }

    #[test]
    fn test_comment_directive_is_not_ruby_parsed() {
        let source = "<%# not ruby at all !!! %>";
        let regions = segment_source(source);
        let scripting = regions[0].as_scripting().unwrap();
        assert_eq!(scripting.flavor, DirectiveFlavor::Comment);
        assert!(scripting.code_parse.is_none());
    }

    #[test]
    fn test_trim_delimiters_detected() {
        let source = "<%- value -%>";
        let regions = segment_source(source);
        let scripting = regions[0].as_scripting().unwrap();
        assert_eq!(scripting.open_delim, "<%-");
        assert_eq!(scripting.close_delim, "-%>");
    }

    #[test]
    fn test_plain_html_is_single_region() {
        let source = "<div><p>no directives here</p></div>";
        let regions = segment_source(source);
        assert_eq!(regions.len(), 1);
        assert!(matches!(regions[0], Region::Html { .. }));
    }
}
