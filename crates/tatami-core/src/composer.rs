//! Composition of the final output
//!
//! Sweeps the emitter output left to right, replacing each placeholder
//! token with its region's original scripting text. A single scripting
//! indent counter advances across own-line logic directives; positive
//! values push the HTML fragments in between one indent unit deeper per
//! level, which propagates Ruby block nesting into the markup. Ends with
//! the newline and trailing-whitespace policy, or degrades to passthrough
//! when the placeholder document failed to parse as HTML.

use serde::{Deserialize, Serialize};

use crate::analyzer::PlaceholderAnalysis;
use crate::config::{FormatConfig, NewlineMode, ScriptingFormat};
use crate::diagnostics::Diagnostic;
use crate::emitter::EmittedHtml;
use crate::placeholder::PlaceholderDocument;
use crate::ruby_indent::{classify, IndentDelta};
use crate::segmenter::{Region, ScriptingRegion, SourceSpan};

/// What kind of source material a segment carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Html,
    Scripting,
    Unknown,
}

/// How a segment's text was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentMode {
    HtmlNormalized,
    ScriptingNormalized,
    Passthrough,
    Unknown,
}

/// One contiguous piece of the composed output
#[derive(Debug, Clone)]
pub struct FormatSegment {
    /// Position in emission order
    pub index: usize,
    pub kind: SegmentKind,
    /// Region this segment was spliced from, when it maps to one
    pub region_index: Option<usize>,
    /// Source span of that region
    pub span: Option<SourceSpan>,
    /// Text as it appears in the output
    pub formatted: String,
    pub indentation_level: usize,
    pub mode: SegmentMode,
}

/// Result of the composition stage
#[derive(Debug)]
pub struct Composition {
    pub output: String,
    pub segments: Vec<FormatSegment>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compose the final output from the emitter's HTML and the region list
pub fn compose(
    source: &str,
    emitted: Option<&EmittedHtml>,
    document: &PlaceholderDocument,
    regions: &[Region],
    analysis: &PlaceholderAnalysis,
    config: &FormatConfig,
) -> Composition {
    let mut diagnostics = analysis.diagnostics.clone();

    let Some(emitted) = (if analysis.failed { None } else { emitted }) else {
        return passthrough(source, config, diagnostics);
    };

    let unit = config.indent_unit();
    let mut out = String::new();
    let mut segments: Vec<FormatSegment> = Vec::new();
    let mut scripting_indent: usize = 0;
    let mut cursor = 0usize;

    for info in &emitted.print_infos {
        let Some(entry) = document.placeholders.get(info.entry_id) else {
            continue;
        };
        let region = regions.get(entry.region_index).and_then(|r| r.as_scripting());

        let Some(found) = emitted.html[cursor..].find(&entry.token) else {
            diagnostics.push(Diagnostic::error(
                entry.region_index as i32,
                format!("Placeholder {} not found in emitted output", entry.id),
            ));
            continue;
        };
        let token_start = cursor + found;
        let token_end = token_start + entry.token.len();

        // An inline or sensitive splice keeps the surrounding bytes as
        // they are; only own-line placeholders shed the emitter's
        // indentation (the composer re-indents those lines itself).
        let own_line = !(info.inline || info.in_attribute || info.sensitive);

        let at_line_start = out.is_empty() || out.ends_with('\n');
        let fragment = process_fragment(
            &emitted.html[cursor..token_start],
            scripting_indent,
            &unit,
            at_line_start,
            own_line,
        );
        if !fragment.is_empty() {
            out.push_str(&fragment);
            segments.push(FormatSegment {
                index: 0,
                kind: SegmentKind::Html,
                region_index: None,
                span: None,
                formatted: fragment,
                indentation_level: scripting_indent,
                mode: SegmentMode::HtmlNormalized,
            });
        }
        cursor = token_end;

        let Some(region) = region else {
            diagnostics.push(Diagnostic::error(
                entry.region_index as i32,
                format!("Placeholder {} does not refer to a scripting region", entry.id),
            ));
            continue;
        };

        if !own_line {
            let spliced = region.text.trim().to_string();
            out.push_str(&spliced);
            segments.push(FormatSegment {
                index: 0,
                kind: SegmentKind::Scripting,
                region_index: Some(entry.region_index),
                span: Some(region.span),
                formatted: spliced,
                indentation_level: info.indentation_level,
                mode: SegmentMode::Passthrough,
            });
        } else {
            let delta = if config.scripting.format == ScriptingFormat::Heuristic {
                classify(region)
            } else {
                IndentDelta::NONE
            };
            let effective = (scripting_indent as i32 + delta.before).max(0) as usize;
            let total = info.indentation_level + effective;

            let spliced = indent_scripting(region, total, &unit, config);
            out.push_str(&spliced);
            segments.push(FormatSegment {
                index: 0,
                kind: SegmentKind::Scripting,
                region_index: Some(entry.region_index),
                span: Some(region.span),
                formatted: spliced,
                indentation_level: total,
                mode: SegmentMode::ScriptingNormalized,
            });

            scripting_indent = (effective as i32 + delta.after).max(0) as usize;
        }
    }

    let at_line_start = out.is_empty() || out.ends_with('\n');
    let tail = process_fragment(
        &emitted.html[cursor..],
        scripting_indent,
        &unit,
        at_line_start,
        false,
    );
    if !tail.is_empty() {
        out.push_str(&tail);
        segments.push(FormatSegment {
            index: 0,
            kind: SegmentKind::Html,
            region_index: None,
            span: None,
            formatted: tail,
            indentation_level: scripting_indent,
            mode: SegmentMode::HtmlNormalized,
        });
    }

    for (index, segment) in segments.iter_mut().enumerate() {
        segment.index = index;
    }

    let output = finalize(out, source, config);

    Composition {
        output,
        segments,
        diagnostics,
    }
}

/// Degraded mode: structural analysis is unsafe, return the source as-is
fn passthrough(source: &str, config: &FormatConfig, diagnostics: Vec<Diagnostic>) -> Composition {
    let mut output = source.to_string();
    if config.whitespace.ensure_final_newline && !output.ends_with('\n') {
        output.push('\n');
    }

    tracing::debug!("composing in passthrough mode");

    let segment = FormatSegment {
        index: 0,
        kind: SegmentKind::Html,
        region_index: None,
        span: None,
        formatted: output.clone(),
        indentation_level: 0,
        mode: SegmentMode::Passthrough,
    };

    Composition {
        output,
        segments: vec![segment],
        diagnostics,
    }
}

/// Re-indent an HTML fragment by the current scripting indent
///
/// `drop_trailing_run` removes a run of spaces/tabs left by the emitter's
/// own indentation right before a placeholder token, so the token's line
/// is not indented twice.
fn process_fragment(
    fragment: &str,
    scripting_indent: usize,
    unit: &str,
    at_line_start: bool,
    drop_trailing_run: bool,
) -> String {
    let fragment = if drop_trailing_run {
        let head = fragment.trim_end_matches([' ', '\t']);
        if head.len() != fragment.len() && (head.ends_with('\n') || (head.is_empty() && at_line_start))
        {
            head
        } else {
            fragment
        }
    } else {
        fragment
    };

    if scripting_indent == 0 || fragment.is_empty() {
        return fragment.to_string();
    }

    let extra = unit.repeat(scripting_indent);
    let mut result = String::with_capacity(fragment.len());
    for (i, line) in fragment.split('\n').enumerate() {
        if i > 0 {
            result.push('\n');
        }
        let begins_line = i > 0 || at_line_start;
        if begins_line && !line.trim().is_empty() {
            result.push_str(&extra);
        }
        result.push_str(line);
    }
    result
}

/// Splice a scripting region at a computed indentation level
fn indent_scripting(
    region: &ScriptingRegion,
    total_indent: usize,
    unit: &str,
    config: &FormatConfig,
) -> String {
    let indent = unit.repeat(total_indent);

    let text = if config.newline == NewlineMode::Preserve {
        region.text.clone()
    } else {
        region.text.replace("\r\n", "\n")
    };

    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() == 1 {
        return format!("{indent}{}", lines[0].trim());
    }

    let mut result = format!("{indent}{}", lines[0].trim_end());

    if config.scripting.format == ScriptingFormat::None {
        for line in &lines[1..] {
            result.push('\n');
            result.push_str(line);
        }
        return result;
    }

    // Strip the continuation lines' common leading whitespace, then anchor
    // them at the computed indent; deeper lines keep their relative offset.
    let min_ws = lines[1..]
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    for line in &lines[1..] {
        result.push('\n');
        if line.trim().is_empty() {
            continue;
        }
        result.push_str(&indent);
        result.push_str(line[min_ws..].trim_end());
    }

    result
}

/// Apply trailing-whitespace, final-newline and terminator policy
fn finalize(mut output: String, source: &str, config: &FormatConfig) -> String {
    if config.whitespace.trim_trailing {
        output = output
            .split('\n')
            .map(|l| l.trim_end_matches([' ', '\t']))
            .collect::<Vec<_>>()
            .join("\n");
    }

    if config.whitespace.ensure_final_newline {
        let trimmed = output.trim_end();
        output = if trimmed.is_empty() {
            String::new()
        } else {
            format!("{trimmed}\n")
        };
    }

    match line_terminator(config, source) {
        "\r\n" => output.replace('\n', "\r\n"),
        _ => output,
    }
}

fn line_terminator(config: &FormatConfig, source: &str) -> &'static str {
    match config.newline {
        NewlineMode::Lf => "\n",
        NewlineMode::Crlf => "\r\n",
        NewlineMode::Preserve => {
            if source.contains("\r\n") {
                "\r\n"
            } else {
                "\n"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_fragment_indents_new_lines_only() {
        let result = process_fragment("tail of line\n<p>x</p>\n", 1, "  ", false, false);
        assert_eq!(result, "tail of line\n  <p>x</p>\n");
    }

    #[test]
    fn test_process_fragment_indents_first_line_at_line_start() {
        let result = process_fragment("<p>x</p>\n", 2, "  ", true, false);
        assert_eq!(result, "    <p>x</p>\n");
    }

    #[test]
    fn test_process_fragment_skips_blank_lines() {
        let result = process_fragment("\n\n<p>x</p>\n", 1, "  ", false, false);
        assert_eq!(result, "\n\n  <p>x</p>\n");
    }

    #[test]
    fn test_process_fragment_drops_pre_token_indentation() {
        // Emitter wrote "\n  " before a token that the composer indents itself.
        let result = process_fragment("<div>\n  ", 0, "  ", true, true);
        assert_eq!(result, "<div>\n");
    }

    #[test]
    fn test_process_fragment_keeps_mid_line_spaces() {
        // The space before the token is real content, not indentation.
        let result = process_fragment("Welcome, ", 0, "  ", true, true);
        assert_eq!(result, "Welcome, ");
    }

    #[test]
    fn test_finalize_trims_and_terminates() {
        let config = FormatConfig::default();
        let result = finalize("a  \nb\t\n".to_string(), "", &config);
        assert_eq!(result, "a\nb\n");
    }

    #[test]
    fn test_finalize_collapses_trailing_newlines() {
        let config = FormatConfig::default();
        let result = finalize("a\n\n\n".to_string(), "", &config);
        assert_eq!(result, "a\n");
    }

    #[test]
    fn test_finalize_crlf_conversion() {
        let mut config = FormatConfig::default();
        config.newline = NewlineMode::Crlf;
        let result = finalize("a\nb\n".to_string(), "", &config);
        assert_eq!(result, "a\r\nb\r\n");
    }

    #[test]
    fn test_line_terminator_preserve_detects_crlf() {
        let mut config = FormatConfig::default();
        config.newline = NewlineMode::Preserve;
        assert_eq!(line_terminator(&config, "a\r\nb"), "\r\n");
        assert_eq!(line_terminator(&config, "a\nb"), "\n");
    }
}
