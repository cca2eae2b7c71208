//! Placeholder document analysis
//!
//! Parses the placeholder document with the HTML grammar and resolves,
//! for every placeholder token, the enclosing tree context: element
//! depth, attribute position, whitespace-sensitive enclosure, and the
//! nearest parent element name. Token lookup scans left to right with a
//! cursor so duplicate text cannot shadow a later token.

use tree_sitter::Node;

use crate::diagnostics::{Diagnostic, UNATTACHED};
use crate::html_tags;
use crate::parser::{LanguageParser, ParseOutcome};
use crate::placeholder::PlaceholderDocument;
use crate::result::Result;

/// Tree context for one placeholder token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderContext {
    /// Id of the placeholder entry this context belongs to
    pub entry_id: usize,
    /// Number of enclosing elements
    pub element_depth: usize,
    /// Token sits inside an attribute or attribute value
    pub inside_attribute: bool,
    /// Token sits inside a whitespace-sensitive element
    pub inside_sensitive_element: bool,
    /// Tag name of the nearest enclosing element (empty at top level)
    pub parent_element_name: String,
}

/// Output of the analyzer stage
#[derive(Debug)]
pub struct PlaceholderAnalysis {
    /// HTML parse of the placeholder document
    pub outcome: ParseOutcome,
    /// Context per locatable placeholder, in document order
    pub contexts: Vec<PlaceholderContext>,
    /// Diagnostics raised during analysis
    pub diagnostics: Vec<Diagnostic>,
    /// The placeholder document failed to parse as HTML
    pub failed: bool,
}

/// Analyze a placeholder document
pub fn analyze(
    document: &PlaceholderDocument,
    html: &mut LanguageParser,
    regions_len: usize,
) -> Result<PlaceholderAnalysis> {
    let outcome = html.parse(&document.html)?;
    let failed = outcome.root_node().has_error();

    let mut diagnostics = Vec::new();
    if failed {
        diagnostics.push(Diagnostic::error(
            UNATTACHED,
            "HTML parse error in placeholder document",
        ));
    }

    let mut contexts = Vec::new();
    let mut cursor = 0usize;

    for entry in &document.placeholders {
        let found = document.html[cursor..].find(&entry.token);
        let start = match found {
            Some(offset) => cursor + offset,
            None => {
                let region_index = if entry.region_index < regions_len {
                    entry.region_index as i32
                } else {
                    UNATTACHED
                };
                diagnostics.push(Diagnostic::error(
                    region_index,
                    format!("Placeholder {} not found in placeholder document", entry.id),
                ));
                continue;
            }
        };
        let end = start + entry.token.len();
        cursor = end;

        let root = outcome.root_node();
        let node = root
            .descendant_for_byte_range(start, end)
            .unwrap_or(root);
        contexts.push(context_for(entry.id, node, &outcome));
    }

    tracing::debug!(
        placeholders = document.placeholders.len(),
        resolved = contexts.len(),
        failed,
        "analyzed placeholder document"
    );

    Ok(PlaceholderAnalysis {
        outcome,
        contexts,
        diagnostics,
        failed,
    })
}

fn context_for(entry_id: usize, node: Node<'_>, outcome: &ParseOutcome) -> PlaceholderContext {
    let mut element_depth = 0usize;
    let mut inside_attribute = false;
    let mut inside_sensitive_element = false;
    let mut parent_element_name = String::new();

    let mut current = Some(node);
    while let Some(n) = current {
        match n.kind() {
            "element" | "script_element" | "style_element" => {
                element_depth += 1;
                let tag = element_tag_name(n, outcome).unwrap_or_default();
                if parent_element_name.is_empty() {
                    parent_element_name = tag.clone();
                }
                if html_tags::is_whitespace_sensitive(&tag) {
                    inside_sensitive_element = true;
                }
            }
            "attribute" | "attribute_value" | "quoted_attribute_value" => {
                inside_attribute = true;
            }
            _ => {}
        }
        current = n.parent();
    }

    PlaceholderContext {
        entry_id,
        element_depth,
        inside_attribute,
        inside_sensitive_element,
        parent_element_name,
    }
}

/// Tag name of an element node, lowercased
pub fn element_tag_name(element: Node<'_>, outcome: &ParseOutcome) -> Option<String> {
    let mut tag_holder = None;
    for i in 0..element.child_count() {
        if let Some(child) = element.child(i) {
            if matches!(child.kind(), "start_tag" | "self_closing_tag") {
                tag_holder = Some(child);
                break;
            }
        }
    }
    let tag = tag_holder?;
    (0..tag.named_child_count())
        .filter_map(|i| tag.named_child(i))
        .find(|c| c.kind() == "tag_name")
        .map(|c| outcome.text_of(c).to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::build;
    use crate::segmenter::segment;

    fn analyze_source(source: &str) -> (PlaceholderDocument, PlaceholderAnalysis) {
        let mut template = LanguageParser::template().unwrap();
        let mut ruby = LanguageParser::ruby().unwrap();
        let mut html = LanguageParser::html().unwrap();
        let outcome = template.parse(source).unwrap();
        let regions = segment(source, &outcome, &mut ruby).unwrap();
        let doc = build(&regions);
        let analysis = analyze(&doc, &mut html, regions.len()).unwrap();
        (doc, analysis)
    }

    #[test]
    fn test_depth_and_parent() {
        let (_, analysis) = analyze_source("<div><p><%= x %></p></div>");
        assert_eq!(analysis.contexts.len(), 1);
        let ctx = &analysis.contexts[0];
        assert_eq!(ctx.element_depth, 2);
        assert_eq!(ctx.parent_element_name, "p");
        assert!(!ctx.inside_attribute);
        assert!(!ctx.inside_sensitive_element);
    }

    #[test]
    fn test_top_level_token() {
        let (_, analysis) = analyze_source("<% if a %>");
        let ctx = &analysis.contexts[0];
        assert_eq!(ctx.element_depth, 0);
        assert_eq!(ctx.parent_element_name, "");
    }

    #[test]
    fn test_inside_attribute() {
        let (_, analysis) = analyze_source("<div class=\"<%= klass %>\">x</div>");
        let ctx = &analysis.contexts[0];
        assert!(ctx.inside_attribute);
    }

    #[test]
    fn test_inside_sensitive_element() {
        let (_, analysis) = analyze_source("<pre>\n  <%= frozen %>\n</pre>");
        let ctx = &analysis.contexts[0];
        assert!(ctx.inside_sensitive_element);
        assert_eq!(ctx.parent_element_name, "pre");
    }

    #[test]
    fn test_script_element_is_sensitive() {
        let (_, analysis) = analyze_source("<script>var x = <%= v %>;</script>");
        let ctx = &analysis.contexts[0];
        assert!(ctx.inside_sensitive_element);
        assert_eq!(ctx.parent_element_name, "script");
    }

    #[test]
    fn test_clean_parse_has_no_diagnostics() {
        let (_, analysis) = analyze_source("<p><%= x %></p>");
        assert!(analysis.diagnostics.is_empty());
        assert!(!analysis.failed);
    }
}
