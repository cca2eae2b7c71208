//! tatami core
//!
//! Format pipeline for HTML templates with embedded Ruby (ERB). The
//! pipeline segments a source into HTML and scripting regions, replaces
//! scripting directives with placeholder tokens, re-prints the resulting
//! pure-HTML document structurally, and splices the original scripting
//! text back in with indentation matched to the surrounding markup.

pub mod analyzer;
pub mod composer;
pub mod config;
pub mod diagnostics;
pub mod emitter;
pub mod error;
pub mod formatter;
pub mod html_tags;
pub mod parser;
pub mod placeholder;
pub mod result;
pub mod ruby_indent;
pub mod segmenter;

// Re-export commonly used types
pub use composer::{Composition, FormatSegment, SegmentKind, SegmentMode};
pub use config::{
    AttributeWrapping, CollapseMode, ConfigLoader, FormatConfig, FormatOverrides, IndentStyle,
    NewlineMode, ScriptingFormat,
};
pub use diagnostics::{Diagnostic, Severity, UNATTACHED};
pub use emitter::{EmittedHtml, PlaceholderPrintInfo};
pub use error::{ErrorKind, TatamiError};
pub use formatter::{format, DebugInfo, FormatterResult, TemplateFormatter};
pub use parser::{Grammar, LanguageParser, ParseError, ParseOutcome};
pub use placeholder::{PlaceholderDocument, PlaceholderEntry};
pub use result::Result;
pub use ruby_indent::IndentDelta;
pub use segmenter::{DirectiveFlavor, Region, ScriptingRegion, SourcePosition, SourceSpan};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tatami=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
