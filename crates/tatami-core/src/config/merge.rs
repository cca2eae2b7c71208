//! Configuration merging logic
//!
//! Merge functionality for combining configuration sources (e.g. a
//! project config refined by a nested directory config). The current
//! (child) record always takes precedence; values only flow in from the
//! other (parent) record where the child leaves a field unset.

use super::format_config::*;

impl FormatOverrides {
    /// Merge another overrides record into this one (current takes precedence)
    pub fn merge_with(&mut self, other: FormatOverrides) {
        if let Some(other_indentation) = other.indentation {
            if let Some(ref mut indentation) = self.indentation {
                indentation.merge_with(other_indentation);
            } else {
                self.indentation = Some(other_indentation);
            }
        }

        if self.newline.is_none() {
            self.newline = other.newline;
        }

        if let Some(other_whitespace) = other.whitespace {
            if let Some(ref mut whitespace) = self.whitespace {
                whitespace.merge_with(other_whitespace);
            } else {
                self.whitespace = Some(other_whitespace);
            }
        }

        if let Some(other_html) = other.html {
            if let Some(ref mut html) = self.html {
                html.merge_with(other_html);
            } else {
                self.html = Some(other_html);
            }
        }

        if let Some(other_scripting) = other.scripting {
            if let Some(ref mut scripting) = self.scripting {
                scripting.merge_with(other_scripting);
            } else {
                self.scripting = Some(other_scripting);
            }
        }
    }
}

impl IndentationOverrides {
    /// Merge indentation overrides (current takes precedence)
    pub fn merge_with(&mut self, other: IndentationOverrides) {
        if self.size.is_none() {
            self.size = other.size;
        }
        if self.style.is_none() {
            self.style = other.style;
        }
        if self.continuation.is_none() {
            self.continuation = other.continuation;
        }
    }
}

impl WhitespaceOverrides {
    /// Merge whitespace overrides (current takes precedence)
    pub fn merge_with(&mut self, other: WhitespaceOverrides) {
        if self.trim_trailing.is_none() {
            self.trim_trailing = other.trim_trailing;
        }
        if self.ensure_final_newline.is_none() {
            self.ensure_final_newline = other.ensure_final_newline;
        }
    }
}

impl HtmlOverrides {
    /// Merge HTML overrides (current takes precedence)
    pub fn merge_with(&mut self, other: HtmlOverrides) {
        if self.collapse_whitespace.is_none() {
            self.collapse_whitespace = other.collapse_whitespace;
        }
        if self.line_width.is_none() {
            self.line_width = other.line_width;
        }
        if self.attribute_wrapping.is_none() {
            self.attribute_wrapping = other.attribute_wrapping;
        }
    }
}

impl ScriptingOverrides {
    /// Merge scripting overrides (current takes precedence)
    pub fn merge_with(&mut self, other: ScriptingOverrides) {
        if self.format.is_none() {
            self.format = other.format;
        }
        if self.line_width.is_none() {
            self.line_width = other.line_width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_current_takes_precedence() {
        let mut base = FormatOverrides {
            indentation: Some(IndentationOverrides {
                size: Some(4),
                style: None,
                continuation: None,
            }),
            newline: None,
            ..Default::default()
        };

        let parent = FormatOverrides {
            indentation: Some(IndentationOverrides {
                size: Some(2),
                style: Some(IndentStyle::Tab),
                continuation: None,
            }),
            newline: Some(NewlineMode::Crlf),
            ..Default::default()
        };

        base.merge_with(parent);

        let indentation = base.indentation.unwrap();
        assert_eq!(indentation.size, Some(4)); // current wins
        assert_eq!(indentation.style, Some(IndentStyle::Tab)); // filled from parent
        assert_eq!(base.newline, Some(NewlineMode::Crlf)); // filled from parent
    }

    #[test]
    fn test_merge_fills_missing_branch() {
        let mut base = FormatOverrides::default();
        let parent = FormatOverrides {
            html: Some(HtmlOverrides {
                attribute_wrapping: Some(AttributeWrapping::Auto),
                ..Default::default()
            }),
            ..Default::default()
        };

        base.merge_with(parent);
        assert_eq!(
            base.html.unwrap().attribute_wrapping,
            Some(AttributeWrapping::Auto)
        );
    }

    #[test]
    fn test_merge_does_not_disturb_unrelated_leaves() {
        let mut base = FormatOverrides {
            whitespace: Some(WhitespaceOverrides {
                trim_trailing: Some(false),
                ensure_final_newline: None,
            }),
            ..Default::default()
        };

        base.merge_with(FormatOverrides::default());

        let whitespace = base.whitespace.unwrap();
        assert_eq!(whitespace.trim_trailing, Some(false));
        assert_eq!(whitespace.ensure_final_newline, None);
    }
}
