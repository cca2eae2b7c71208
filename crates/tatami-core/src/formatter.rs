//! The format pipeline entry point
//!
//! `format(source, config)` runs the four stages in order: region
//! segmentation, placeholder substitution, structural HTML emission, and
//! composition. Input-driven failures surface as diagnostics on the
//! result; `Err` is reserved for host-level faults such as a parser
//! returning no tree.

use tracing::debug;

use crate::analyzer::analyze;
use crate::composer::{compose, FormatSegment};
use crate::config::FormatConfig;
use crate::diagnostics::{Diagnostic, UNATTACHED};
use crate::emitter::emit;
use crate::parser::LanguageParser;
use crate::placeholder;
use crate::result::Result;
use crate::segmenter::segment;

/// Debug payload exposing the intermediate placeholder document
#[derive(Debug, Clone)]
pub struct DebugInfo {
    pub placeholder_html: String,
    pub placeholder_count: usize,
}

/// Result of one `format` call
#[derive(Debug)]
pub struct FormatterResult {
    /// The formatted output; always safe to display
    pub output: String,
    /// Per-segment metadata in emission order
    pub segments: Vec<FormatSegment>,
    /// Diagnostics raised by any stage
    pub diagnostics: Vec<Diagnostic>,
    /// The configuration the pipeline ran with
    pub config: FormatConfig,
    /// Intermediate state, when the formatter was built with debug output
    pub debug: Option<DebugInfo>,
}

impl FormatterResult {
    /// Check whether any diagnostic has error severity
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    /// Check whether formatting changed the source
    pub fn changed(&self, source: &str) -> bool {
        self.output != source
    }
}

/// Formatter owning one parser per grammar
///
/// Parsers are reusable across calls; each call is a pure function of its
/// inputs and leaves no state behind. Callers that format many files
/// concurrently give each worker its own formatter.
pub struct TemplateFormatter {
    template: LanguageParser,
    html: LanguageParser,
    ruby: LanguageParser,
    debug: bool,
}

impl TemplateFormatter {
    /// Create a formatter, loading all three grammars
    pub fn new() -> Result<Self> {
        Ok(Self {
            template: LanguageParser::template()?,
            html: LanguageParser::html()?,
            ruby: LanguageParser::ruby()?,
            debug: false,
        })
    }

    /// Enable the debug payload on results
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Format a template source
    pub fn format(&mut self, source: &str, config: &FormatConfig) -> Result<FormatterResult> {
        let template_outcome = self.template.parse(source)?;

        let mut diagnostics = Vec::new();
        if let Some(first) = template_outcome.errors.first() {
            diagnostics.push(Diagnostic::error(
                UNATTACHED,
                format!(
                    "Template parse error at line {}, column {}: {}",
                    first.line + 1,
                    first.column + 1,
                    first.message
                ),
            ));
        }

        let regions = segment(source, &template_outcome, &mut self.ruby)?;
        let document = placeholder::build(&regions);
        let analysis = analyze(&document, &mut self.html, regions.len())?;

        let emitted = if analysis.failed {
            None
        } else {
            Some(emit(&analysis, &document, config))
        };

        let composition = compose(source, emitted.as_ref(), &document, &regions, &analysis, config);
        diagnostics.extend(composition.diagnostics);

        debug!(
            input_bytes = source.len(),
            output_bytes = composition.output.len(),
            segments = composition.segments.len(),
            diagnostics = diagnostics.len(),
            "formatted template"
        );

        Ok(FormatterResult {
            output: composition.output,
            segments: composition.segments,
            diagnostics,
            config: config.clone(),
            debug: self.debug.then(|| DebugInfo {
                placeholder_html: document.html.clone(),
                placeholder_count: document.placeholders.len(),
            }),
        })
    }
}

/// Format a template source with a one-shot formatter
pub fn format(source: &str, config: &FormatConfig) -> Result<FormatterResult> {
    TemplateFormatter::new()?.format(source, config)
}
