//! Configuration for the template formatter
//!
//! Two layers, following the same split the rest of the pipeline uses for
//! its inputs: a partial [`FormatOverrides`] record deserialized from a
//! config file (every field optional), and a fully-defaulted immutable
//! [`FormatConfig`] consumed by the pipeline stages. `resolve()` folds an
//! overrides record into the defaults; merging never mutates the default
//! record.

mod format_config;
mod loader;
mod merge;

pub use format_config::{
    AttributeWrapping, CollapseMode, FormatConfig, FormatOverrides, HtmlConfig, HtmlOverrides,
    IndentStyle, IndentationConfig, IndentationOverrides, NewlineMode, ScriptingConfig,
    ScriptingFormat, ScriptingOverrides, WhitespaceConfig, WhitespaceOverrides,
};
pub use loader::ConfigLoader;
