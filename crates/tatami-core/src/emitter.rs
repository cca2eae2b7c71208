//! Structural HTML emission
//!
//! Prints the placeholder document's HTML tree as re-indented text while
//! keeping placeholder tokens in place. Every token that reaches the
//! output is recorded as a [`PlaceholderPrintInfo`] in print order; the
//! composer later replays those records while splicing scripting text
//! back in.
//!
//! Element handling:
//! - void elements emit a start tag only;
//! - whitespace-sensitive elements copy their inner byte range verbatim;
//! - inline elements and elements whose children are all text render on
//!   one line when the content carries no line break;
//! - everything else renders block-style, children one level deeper.

use tree_sitter::Node;

use crate::analyzer::PlaceholderAnalysis;
use crate::config::{AttributeWrapping, CollapseMode, FormatConfig};
use crate::html_tags;
use crate::placeholder::{scan_tokens, PlaceholderDocument};

/// Print record for one placeholder occurrence, in print order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderPrintInfo {
    /// Id of the placeholder entry
    pub entry_id: usize,
    /// Indentation level of the line the token was printed on
    pub indentation_level: usize,
    /// Token shares its line with other content
    pub inline: bool,
    /// Token sits inside a start tag's attribute list
    pub in_attribute: bool,
    /// Token sits inside a whitespace-sensitive element
    pub sensitive: bool,
}

/// Emitter output: formatted HTML still carrying placeholder tokens
#[derive(Debug)]
pub struct EmittedHtml {
    pub html: String,
    pub print_infos: Vec<PlaceholderPrintInfo>,
}

/// A rendered piece of output together with the print records it carries
#[derive(Debug, Default)]
struct Rendered {
    text: String,
    infos: Vec<PlaceholderPrintInfo>,
}

impl Rendered {
    fn append(&mut self, other: Rendered) {
        self.text.push_str(&other.text);
        self.infos.extend(other.infos);
    }
}

/// A rendered start tag
struct OpenTag {
    rendered: Rendered,
    multiline: bool,
}

/// Emit the analyzed placeholder document as formatted HTML
pub fn emit(
    analysis: &PlaceholderAnalysis,
    document: &PlaceholderDocument,
    config: &FormatConfig,
) -> EmittedHtml {
    let mut emitter = Emitter {
        src: &analysis.outcome.source,
        prefix: &document.token_prefix,
        suffix: &document.token_suffix,
        config,
        out: String::new(),
        infos: Vec::new(),
    };

    let root = analysis.outcome.root_node();
    for i in 0..root.named_child_count() {
        if let Some(child) = root.named_child(i) {
            emitter.emit_node(child, 0);
        }
    }

    if !emitter.out.is_empty() && !emitter.out.ends_with('\n') {
        emitter.out.push('\n');
    }

    tracing::debug!(
        bytes = emitter.out.len(),
        placeholders = emitter.infos.len(),
        "emitted placeholder html"
    );

    EmittedHtml {
        html: emitter.out,
        print_infos: emitter.infos,
    }
}

struct Emitter<'a> {
    src: &'a str,
    prefix: &'a str,
    suffix: &'a str,
    config: &'a FormatConfig,
    out: String,
    infos: Vec<PlaceholderPrintInfo>,
}

impl<'a> Emitter<'a> {
    fn slice(&self, node: Node<'_>) -> &'a str {
        let src = self.src;
        &src[node.start_byte()..node.end_byte()]
    }

    fn write_indent(&mut self, depth: usize) {
        let indent = self.config.indent(depth);
        self.out.push_str(&indent);
    }

    fn push_line(&mut self, depth: usize, content: &str) {
        self.write_indent(depth);
        self.out.push_str(content);
        self.out.push('\n');
    }

    /// Write a line and record any tokens it carries
    fn push_line_with_tokens(&mut self, depth: usize, content: &str) {
        let infos = record_tokens(content, self.prefix, self.suffix, depth, None, false, false);
        self.infos.extend(infos);
        self.push_line(depth, content);
    }

    fn commit(&mut self, rendered: Rendered) {
        self.out.push_str(&rendered.text);
        self.infos.extend(rendered.infos);
    }

    fn emit_node(&mut self, node: Node<'_>, depth: usize) {
        match node.kind() {
            "element" | "script_element" | "style_element" => self.emit_element(node, depth),
            "text" | "entity" => self.emit_text(node, depth),
            "comment" => self.emit_comment(node, depth),
            "doctype" => {
                let slice = self.slice(node);
                self.push_line_with_tokens(depth, slice.trim_end());
            }
            _ => self.emit_raw(node, depth),
        }
    }

    /// Verbatim fallback for erroneous or unexpected nodes
    fn emit_raw(&mut self, node: Node<'_>, depth: usize) {
        let slice = self.slice(node);
        for (i, line) in slice.split('\n').enumerate() {
            let infos = record_tokens(line, self.prefix, self.suffix, depth, None, false, false);
            self.infos.extend(infos);
            if i == 0 {
                self.push_line(depth, line.trim_end());
            } else {
                self.out.push_str(line.trim_end());
                self.out.push('\n');
            }
        }
    }

    fn emit_text(&mut self, node: Node<'_>, depth: usize) {
        let raw = self.slice(node);
        match self.config.html.collapse_whitespace {
            CollapseMode::Conservative => {
                let collapsed = collapse_runs(raw, false);
                for line in collapsed.split('\n') {
                    let line = line.trim();
                    if !line.is_empty() {
                        self.push_line_with_tokens(depth, line);
                    }
                }
            }
            CollapseMode::Aggressive => {
                let collapsed = collapse_runs(raw, true);
                let line = collapsed.trim();
                if !line.is_empty() {
                    self.push_line_with_tokens(depth, line);
                }
            }
            CollapseMode::Preserve => {
                for line in raw.split('\n') {
                    let line = line.trim_end();
                    if line.trim().is_empty() {
                        continue;
                    }
                    self.push_line_with_tokens(depth, line.trim_start());
                }
            }
        }
    }

    fn emit_comment(&mut self, node: Node<'_>, depth: usize) {
        let slice = self.slice(node);
        for (i, line) in slice.split('\n').enumerate() {
            let infos = record_tokens(line, self.prefix, self.suffix, depth, None, false, false);
            self.infos.extend(infos);
            if i == 0 {
                self.write_indent(depth);
            }
            self.out.push_str(line.trim_end());
            self.out.push('\n');
        }
    }

    fn emit_element(&mut self, node: Node<'_>, depth: usize) {
        let Some(opening) = opening_tag(node) else {
            self.emit_raw(node, depth);
            return;
        };
        let tag = element_tag_name_of(opening, self.src).unwrap_or_default();
        let tag_display = tag_display_of(opening, self.src).unwrap_or(&tag).to_string();
        let self_closing = opening.kind() == "self_closing_tag";
        let end_tag = child_of_kind(node, "end_tag");

        if self_closing || html_tags::is_void(&tag) {
            let open = self.render_open_tag(opening, &tag_display, depth, self_closing);
            self.write_indent(depth);
            self.commit(open.rendered);
            self.out.push('\n');
            return;
        }

        if html_tags::is_whitespace_sensitive(&tag) {
            self.emit_sensitive(node, opening, end_tag, &tag_display, depth);
            return;
        }

        let children = content_children(node, self.src);
        let open = self.render_open_tag(opening, &tag_display, depth, false);

        if children.is_empty() {
            self.write_indent(depth);
            self.commit(open.rendered);
            if open.multiline {
                self.out.push('\n');
                self.push_line(depth, &format!("</{tag_display}>"));
            } else {
                self.out.push_str(&format!("</{tag_display}>\n"));
            }
            return;
        }

        let all_textlike = children
            .iter()
            .all(|c| matches!(c.kind(), "text" | "entity"));

        if !open.multiline && (html_tags::is_inline(&tag) || all_textlike) {
            if let Some(content) =
                self.render_inline_content(&children, html_tags::is_inline(&tag), depth)
            {
                if !content.text.contains('\n') {
                    self.write_indent(depth);
                    self.commit(open.rendered);
                    self.commit(content);
                    self.out.push_str(&format!("</{tag_display}>\n"));
                    return;
                }
            }
        }

        if open.multiline && all_textlike {
            if let Some(content) = self.render_inline_content(&children, false, depth) {
                if !content.text.contains('\n') {
                    // Wide open tag: `>` sits on its own line, then the
                    // content and close tag follow unindented.
                    self.write_indent(depth);
                    self.commit(open.rendered);
                    self.out.push('\n');
                    self.commit(content);
                    self.out.push_str(&format!("</{tag_display}>\n"));
                    return;
                }
            }
        }

        self.write_indent(depth);
        self.commit(open.rendered);
        self.out.push('\n');
        for child in children {
            self.emit_node(child, depth + 1);
        }
        self.push_line(depth, &format!("</{tag_display}>"));
    }

    fn emit_sensitive(
        &mut self,
        node: Node<'_>,
        opening: Node<'_>,
        end_tag: Option<Node<'_>>,
        tag_display: &str,
        depth: usize,
    ) {
        let open = self.render_open_tag(opening, tag_display, depth, false);
        self.write_indent(depth);
        self.commit(open.rendered);

        let inner_start = opening.end_byte();
        let inner_end = end_tag.map(|e| e.start_byte()).unwrap_or(node.end_byte());
        let src = self.src;
        let inner = &src[inner_start..inner_end];

        let infos = record_tokens(
            inner,
            self.prefix,
            self.suffix,
            depth + 1,
            Some(true),
            false,
            true,
        );
        self.infos.extend(infos);
        self.out.push_str(inner);

        if end_tag.is_some() {
            if inner.ends_with('\n') {
                self.write_indent(depth);
            }
            self.out.push_str(&format!("</{tag_display}>"));
        }
        self.out.push('\n');
    }

    /// Render the content between an element's tags on a single line
    ///
    /// `collapse_newlines` joins multi-line text (inline elements only);
    /// otherwise content containing a line break makes the render fail.
    /// Inter-child whitespace dropped by the grammar is restored from the
    /// source as a single space.
    fn render_inline_content(
        &self,
        children: &[Node<'_>],
        collapse_newlines: bool,
        depth: usize,
    ) -> Option<Rendered> {
        let mut rendered = Rendered::default();
        let mut previous_end: Option<usize> = None;

        for child in children {
            if let Some(prev) = previous_end {
                let gap = &self.src[prev..child.start_byte()];
                if !rendered.text.is_empty() {
                    if gap.trim().is_empty() {
                        if !gap.is_empty() {
                            rendered.text.push(' ');
                        }
                    } else {
                        rendered.text.push_str(&collapse_runs(gap, true));
                    }
                }
            }
            previous_end = Some(child.end_byte());

            match child.kind() {
                "text" | "entity" => {
                    let mut piece = collapse_runs(self.slice(*child), false);
                    if piece.contains('\n') {
                        if !collapse_newlines {
                            return None;
                        }
                        piece = piece.replace('\n', " ");
                    }
                    rendered.infos.extend(record_tokens(
                        &piece,
                        self.prefix,
                        self.suffix,
                        depth,
                        Some(true),
                        false,
                        false,
                    ));
                    rendered.text.push_str(&piece);
                }
                "element" => {
                    let piece = self.render_inline_element(*child, depth)?;
                    rendered.append(piece);
                }
                _ => return None,
            }
        }

        rendered.text = rendered.text.trim().to_string();
        Some(rendered)
    }

    /// Render an inline element (and its content) on a single line
    fn render_inline_element(&self, node: Node<'_>, depth: usize) -> Option<Rendered> {
        let opening = opening_tag(node)?;
        let tag = element_tag_name_of(opening, self.src)?;
        if !html_tags::is_inline(&tag) {
            return None;
        }
        let tag_display = tag_display_of(opening, self.src).unwrap_or(&tag).to_string();
        let self_closing = opening.kind() == "self_closing_tag";

        let open = self.render_open_tag(opening, &tag_display, depth, self_closing);
        if open.multiline {
            return None;
        }
        let mut rendered = open.rendered;

        if self_closing || html_tags::is_void(&tag) {
            return Some(rendered);
        }

        let end_tag = child_of_kind(node, "end_tag");

        if html_tags::is_whitespace_sensitive(&tag) {
            let inner_start = opening.end_byte();
            let inner_end = end_tag.map(|e| e.start_byte()).unwrap_or(node.end_byte());
            let inner = &self.src[inner_start..inner_end];
            if inner.contains('\n') {
                return None;
            }
            rendered.infos.extend(record_tokens(
                inner,
                self.prefix,
                self.suffix,
                depth + 1,
                Some(true),
                false,
                true,
            ));
            rendered.text.push_str(inner);
        } else {
            let children = content_children(node, self.src);
            let content = self.render_inline_content(&children, true, depth)?;
            rendered.append(content);
        }

        rendered.text.push_str(&format!("</{tag_display}>"));
        Some(rendered)
    }

    /// Render a start tag with normalized attributes and wrapping policy
    fn render_open_tag(
        &self,
        opening: Node<'_>,
        tag_display: &str,
        depth: usize,
        self_closing: bool,
    ) -> OpenTag {
        let attrs: Vec<Node<'_>> = (0..opening.named_child_count())
            .filter_map(|i| opening.named_child(i))
            .filter(|c| c.kind() == "attribute")
            .collect();
        let normalized: Vec<String> = attrs.iter().map(|a| self.normalize_attribute(*a)).collect();

        let mut inline = format!("<{tag_display}");
        for attr in &normalized {
            inline.push(' ');
            inline.push_str(attr);
        }
        inline.push_str(if self_closing { " />" } else { ">" });

        let multiline = !attrs.is_empty() && self.wants_multiline(&attrs, &inline, depth);

        let mut infos = Vec::new();
        for attr in &normalized {
            infos.extend(record_tokens(
                attr,
                self.prefix,
                self.suffix,
                0,
                Some(true),
                true,
                false,
            ));
        }

        if !multiline {
            return OpenTag {
                rendered: Rendered { text: inline, infos },
                multiline: false,
            };
        }

        let attr_indent = self.attribute_indent(depth);
        let mut text = format!("<{tag_display}");
        for attr in &normalized {
            text.push('\n');
            text.push_str(&attr_indent);
            text.push_str(attr);
        }
        text.push('\n');
        text.push_str(&self.config.indent(depth));
        text.push_str(if self_closing { "/>" } else { ">" });

        OpenTag {
            rendered: Rendered { text, infos },
            multiline: true,
        }
    }

    fn wants_multiline(&self, attrs: &[Node<'_>], inline: &str, depth: usize) -> bool {
        let original_spans_lines = {
            let start = attrs.first().map(|a| a.start_byte()).unwrap_or(0);
            let end = attrs.last().map(|a| a.end_byte()).unwrap_or(start);
            self.src[start..end].contains('\n')
        };

        match self.config.html.attribute_wrapping {
            AttributeWrapping::Preserve => original_spans_lines,
            AttributeWrapping::Auto => {
                let too_wide = self.config.html.line_width.is_some_and(|width| {
                    self.config.indent_width(depth) + inline.chars().count() > width
                });
                original_spans_lines || too_wide
            }
            AttributeWrapping::ForceMultiLine => true,
        }
    }

    fn attribute_indent(&self, depth: usize) -> String {
        match self.config.indentation.style {
            crate::config::IndentStyle::Space => {
                let mut s = self.config.indent(depth);
                s.push_str(&" ".repeat(self.config.indentation.continuation));
                s
            }
            crate::config::IndentStyle::Tab => self.config.indent(depth + 1),
        }
    }

    /// Normalize one attribute: `name=value` with the value kept verbatim
    fn normalize_attribute(&self, attr: Node<'_>) -> String {
        let name = (0..attr.named_child_count())
            .filter_map(|i| attr.named_child(i))
            .find(|c| c.kind() == "attribute_name")
            .map(|c| self.slice(c).to_string());

        let Some(name) = name else {
            return self.slice(attr).trim().to_string();
        };

        let value = (0..attr.named_child_count())
            .filter_map(|i| attr.named_child(i))
            .find(|c| matches!(c.kind(), "quoted_attribute_value" | "attribute_value"))
            .map(|c| self.slice(c));

        match value {
            Some(v) => format!("{name}={v}"),
            None => name,
        }
    }
}

/// Collapse whitespace runs: runs containing a line break become `\n`
/// (or a space when `join_lines`), other runs a single space.
fn collapse_runs(raw: &str, join_lines: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            let mut has_newline = c == '\n' || c == '\r';
            while let Some(&next) = chars.peek() {
                if next.is_whitespace() {
                    has_newline |= next == '\n' || next == '\r';
                    chars.next();
                } else {
                    break;
                }
            }
            out.push(if has_newline && !join_lines { '\n' } else { ' ' });
        } else {
            out.push(c);
        }
    }
    out
}

/// Scan `text` for tokens and build print records
///
/// With `force_inline` unset, a token is inline unless it is the line's
/// sole content.
fn record_tokens(
    text: &str,
    prefix: &str,
    suffix: &str,
    level: usize,
    force_inline: Option<bool>,
    in_attribute: bool,
    sensitive: bool,
) -> Vec<PlaceholderPrintInfo> {
    scan_tokens(text, prefix, suffix)
        .into_iter()
        .map(|hit| {
            let inline = force_inline.unwrap_or_else(|| text.trim() != &text[hit.start..hit.end]);
            PlaceholderPrintInfo {
                entry_id: hit.id,
                indentation_level: level,
                inline,
                in_attribute,
                sensitive,
            }
        })
        .collect()
}

fn opening_tag(node: Node<'_>) -> Option<Node<'_>> {
    (0..node.child_count())
        .filter_map(|i| node.child(i))
        .find(|c| matches!(c.kind(), "start_tag" | "self_closing_tag"))
}

fn child_of_kind<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    (0..node.child_count())
        .filter_map(|i| node.child(i))
        .find(|c| c.kind() == kind)
}

/// Lowercased tag name of a start tag
fn element_tag_name_of(opening: Node<'_>, src: &str) -> Option<String> {
    tag_display_of(opening, src).map(|t| t.to_ascii_lowercase())
}

/// Tag name of a start tag as written
fn tag_display_of<'a>(opening: Node<'a>, src: &'a str) -> Option<&'a str> {
    (0..opening.named_child_count())
        .filter_map(|i| opening.named_child(i))
        .find(|c| c.kind() == "tag_name")
        .map(|c| &src[c.start_byte()..c.end_byte()])
}

/// Content children of an element (tags and whitespace-only text excluded)
fn content_children<'tree>(node: Node<'tree>, src: &str) -> Vec<Node<'tree>> {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .filter(|c| !matches!(c.kind(), "start_tag" | "self_closing_tag" | "end_tag"))
        .filter(|c| {
            c.kind() != "text" || !src[c.start_byte()..c.end_byte()].trim().is_empty()
        })
        .collect()
}

// The emitter is exercised end-to-end through the formatter tests; the
// unit tests here cover the pure helpers.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_runs_conservative() {
        assert_eq!(collapse_runs("a   b", false), "a b");
        assert_eq!(collapse_runs("a \n  b", false), "a\nb");
        assert_eq!(collapse_runs("a\t\tb", false), "a b");
        assert_eq!(collapse_runs("a \r\n b", false), "a\nb");
    }

    #[test]
    fn test_collapse_runs_joining() {
        assert_eq!(collapse_runs("a \n  b", true), "a b");
    }

    #[test]
    fn test_record_tokens_inline_detection() {
        let sole = record_tokens("__t0_3__", "__t0_", "__", 2, None, false, false);
        assert_eq!(sole.len(), 1);
        assert_eq!(sole[0].entry_id, 3);
        assert_eq!(sole[0].indentation_level, 2);
        assert!(!sole[0].inline);

        let mixed = record_tokens("Hello __t0_3__!", "__t0_", "__", 1, None, false, false);
        assert!(mixed[0].inline);
    }

    #[test]
    fn test_record_tokens_forced_flags() {
        let infos = record_tokens("x=\"__t0_1__\"", "__t0_", "__", 0, Some(true), true, false);
        assert_eq!(infos.len(), 1);
        assert!(infos[0].inline);
        assert!(infos[0].in_attribute);
        assert!(!infos[0].sensitive);
    }
}
