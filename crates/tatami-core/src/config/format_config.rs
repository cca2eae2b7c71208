//! Configuration types for the template formatter

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Indentation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    /// Use spaces for indentation
    Space,
    /// Use tabs for indentation
    Tab,
}

/// Line terminator policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NewlineMode {
    /// Normalize all terminators to `\n`
    Lf,
    /// Normalize all terminators to `\r\n`
    Crlf,
    /// Keep the source's dominant terminator
    Preserve,
}

/// Whitespace collapsing policy for HTML text nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CollapseMode {
    /// Keep text content as written
    Preserve,
    /// Collapse horizontal runs and re-indent lines (default)
    Conservative,
    /// Additionally join lines within a text node
    Aggressive,
}

/// Attribute layout policy for start tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeWrapping {
    /// Multi-line only when the original attribute list spanned lines
    Preserve,
    /// Multi-line when the original spanned lines or the inline tag is too wide
    Auto,
    /// Always one attribute per line
    ForceMultiLine,
}

/// How embedded scripting is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScriptingFormat {
    /// Re-indent logic directives from their parse tree or keyword heuristics
    Heuristic,
    /// Splice scripting back without any re-indentation
    None,
}

/// Resolved indentation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentationConfig {
    /// Width of one indentation level (spaces; ignored for tabs). Always >= 1.
    pub size: usize,
    /// Character used for indentation
    pub style: IndentStyle,
    /// Extra columns for wrapped constructs (attribute lines)
    pub continuation: usize,
}

/// Resolved whitespace policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhitespaceConfig {
    /// Strip trailing spaces and tabs from every output line
    pub trim_trailing: bool,
    /// End the output with exactly one line terminator
    pub ensure_final_newline: bool,
}

/// Resolved HTML layout settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlConfig {
    /// Text node collapsing policy
    pub collapse_whitespace: CollapseMode,
    /// Maximum line width for layout decisions (`None` disables the limit)
    pub line_width: Option<usize>,
    /// Attribute wrapping policy
    pub attribute_wrapping: AttributeWrapping,
}

/// Resolved scripting settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptingConfig {
    /// Indentation treatment for embedded scripting
    pub format: ScriptingFormat,
    /// Reserved width for scripting layout decisions (`None` disables the limit)
    pub line_width: Option<usize>,
}

/// Fully-resolved formatter configuration
///
/// Immutable once built; every pipeline stage borrows it read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    pub indentation: IndentationConfig,
    pub newline: NewlineMode,
    pub whitespace: WhitespaceConfig,
    pub html: HtmlConfig,
    pub scripting: ScriptingConfig,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indentation: IndentationConfig {
                size: 2,
                style: IndentStyle::Space,
                continuation: 2,
            },
            newline: NewlineMode::Lf,
            whitespace: WhitespaceConfig {
                trim_trailing: true,
                ensure_final_newline: true,
            },
            html: HtmlConfig {
                collapse_whitespace: CollapseMode::Conservative,
                line_width: Some(100),
                attribute_wrapping: AttributeWrapping::Preserve,
            },
            scripting: ScriptingConfig {
                format: ScriptingFormat::Heuristic,
                line_width: Some(100),
            },
        }
    }
}

impl FormatConfig {
    /// The string for a single indentation level
    pub fn indent_unit(&self) -> String {
        match self.indentation.style {
            IndentStyle::Space => " ".repeat(self.indentation.size),
            IndentStyle::Tab => "\t".to_string(),
        }
    }

    /// The indentation string for `level` levels
    pub fn indent(&self, level: usize) -> String {
        self.indent_unit().repeat(level)
    }

    /// Column width of `level` indentation levels (tabs count as `size` columns)
    pub fn indent_width(&self, level: usize) -> usize {
        level * self.indentation.size
    }
}

/// Partial indentation overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndentationOverrides {
    /// Width of one indentation level
    #[schemars(description = "Number of columns per indentation level")]
    pub size: Option<usize>,
    /// Indentation style: 'space' or 'tab'
    #[schemars(description = "Indentation style: 'space' or 'tab'")]
    pub style: Option<IndentStyle>,
    /// Extra columns for wrapped constructs
    #[schemars(description = "Extra columns for wrapped attribute lines")]
    pub continuation: Option<usize>,
}

/// Partial whitespace overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WhitespaceOverrides {
    #[schemars(description = "Strip trailing whitespace from output lines")]
    pub trim_trailing: Option<bool>,
    #[schemars(description = "End the output with exactly one line terminator")]
    pub ensure_final_newline: Option<bool>,
}

/// Partial HTML layout overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HtmlOverrides {
    #[schemars(description = "Text collapsing policy: 'preserve', 'conservative' or 'aggressive'")]
    pub collapse_whitespace: Option<CollapseMode>,
    /// Maximum line width; `0` disables the limit
    #[schemars(description = "Maximum line width before wrapping (0 disables)")]
    pub line_width: Option<usize>,
    #[schemars(description = "Attribute wrapping: 'preserve', 'auto' or 'force-multi-line'")]
    pub attribute_wrapping: Option<AttributeWrapping>,
}

/// Partial scripting overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScriptingOverrides {
    #[schemars(description = "Scripting indentation: 'heuristic' or 'none'")]
    pub format: Option<ScriptingFormat>,
    /// Reserved width for scripting layout; `0` disables the limit
    #[schemars(description = "Maximum line width for scripting (0 disables)")]
    pub line_width: Option<usize>,
}

/// Partial formatter configuration as read from a config file
///
/// Every branch is optional; missing leaves inherit defaults at
/// [`FormatOverrides::resolve`] time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormatOverrides {
    pub indentation: Option<IndentationOverrides>,
    #[schemars(description = "Line terminator policy: 'lf', 'crlf' or 'preserve'")]
    pub newline: Option<NewlineMode>,
    pub whitespace: Option<WhitespaceOverrides>,
    pub html: Option<HtmlOverrides>,
    pub scripting: Option<ScriptingOverrides>,
}

impl FormatOverrides {
    /// Fold these overrides into the default configuration
    ///
    /// Out-of-domain values are clamped silently: an indent size of 0
    /// becomes 1, and a line width of 0 means "no limit".
    pub fn resolve(&self) -> FormatConfig {
        let defaults = FormatConfig::default();

        let indentation = match &self.indentation {
            Some(i) => IndentationConfig {
                size: i.size.unwrap_or(defaults.indentation.size).max(1),
                style: i.style.unwrap_or(defaults.indentation.style),
                continuation: i.continuation.unwrap_or(defaults.indentation.continuation),
            },
            None => defaults.indentation,
        };

        let whitespace = match &self.whitespace {
            Some(w) => WhitespaceConfig {
                trim_trailing: w.trim_trailing.unwrap_or(defaults.whitespace.trim_trailing),
                ensure_final_newline: w
                    .ensure_final_newline
                    .unwrap_or(defaults.whitespace.ensure_final_newline),
            },
            None => defaults.whitespace,
        };

        let html = match &self.html {
            Some(h) => HtmlConfig {
                collapse_whitespace: h
                    .collapse_whitespace
                    .unwrap_or(defaults.html.collapse_whitespace),
                line_width: resolve_width(h.line_width, defaults.html.line_width),
                attribute_wrapping: h
                    .attribute_wrapping
                    .unwrap_or(defaults.html.attribute_wrapping),
            },
            None => defaults.html,
        };

        let scripting = match &self.scripting {
            Some(s) => ScriptingConfig {
                format: s.format.unwrap_or(defaults.scripting.format),
                line_width: resolve_width(s.line_width, defaults.scripting.line_width),
            },
            None => defaults.scripting,
        };

        FormatConfig {
            indentation,
            newline: self.newline.unwrap_or(defaults.newline),
            whitespace,
            html,
            scripting,
        }
    }
}

fn resolve_width(override_width: Option<usize>, default: Option<usize>) -> Option<usize> {
    match override_width {
        Some(0) => None,
        Some(w) => Some(w),
        None => default,
    }
}
