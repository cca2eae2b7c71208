//! Grammar facade over the tree-sitter runtime
//!
//! Three grammars drive the pipeline: the embedded-template grammar that
//! splits a source into HTML and scripting regions, the HTML grammar that
//! parses the placeholder document, and the Ruby grammar used to classify
//! scripting directives. Each is wrapped in the same [`LanguageParser`]
//! facade; a grammar that cannot be loaded is a constructor error, while
//! malformed input yields a tree whose root carries an error flag, never
//! an `Err`.

use tree_sitter::{Language, Node, Parser as TreeSitterParser, Tree, TreeCursor};

use crate::error::TatamiError;
use crate::result::Result;

/// Which grammar a [`LanguageParser`] was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// `tree-sitter-embedded-template` (ERB/EJS region grammar)
    Template,
    /// `tree-sitter-html`
    Html,
    /// `tree-sitter-ruby`
    Ruby,
}

impl Grammar {
    fn language(self) -> Language {
        match self {
            Grammar::Template => tree_sitter_embedded_template::language(),
            Grammar::Html => tree_sitter_html::language(),
            Grammar::Ruby => tree_sitter_ruby::language(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Grammar::Template => "embedded-template",
            Grammar::Html => "html",
            Grammar::Ruby => "ruby",
        }
    }
}

/// Result of parsing a piece of source text
#[derive(Debug)]
pub struct ParseOutcome {
    /// The parsed syntax tree
    pub tree: Tree,
    /// Parse errors encountered during parsing
    pub errors: Vec<ParseError>,
    /// Whether the parse was successful (no errors)
    pub is_valid: bool,
    /// Source content that was parsed
    pub source: String,
}

/// Parse error information extracted from ERROR and MISSING nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Line number (0-based)
    pub line: usize,
    /// Column number (0-based)
    pub column: usize,
    /// Byte offset in source
    pub offset: usize,
    /// Length of the error span
    pub length: usize,
}

/// Tree-sitter based parser for one grammar
pub struct LanguageParser {
    parser: TreeSitterParser,
    grammar: Grammar,
}

impl LanguageParser {
    /// Create a parser for the embedded-template grammar
    pub fn template() -> Result<Self> {
        Self::for_grammar(Grammar::Template)
    }

    /// Create a parser for the HTML grammar
    pub fn html() -> Result<Self> {
        Self::for_grammar(Grammar::Html)
    }

    /// Create a parser for the Ruby grammar
    pub fn ruby() -> Result<Self> {
        Self::for_grammar(Grammar::Ruby)
    }

    fn for_grammar(grammar: Grammar) -> Result<Self> {
        let mut parser = TreeSitterParser::new();
        parser.set_language(grammar.language()).map_err(|e| {
            TatamiError::grammar_error(format!(
                "Failed to load {} grammar: {}",
                grammar.name(),
                e
            ))
        })?;

        Ok(Self { parser, grammar })
    }

    /// The grammar this parser was built for
    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    /// Parse `content` and return the tree plus extracted errors
    pub fn parse(&mut self, content: &str) -> Result<ParseOutcome> {
        let tree = self.parser.parse(content, None).ok_or_else(|| {
            TatamiError::parser_error(format!(
                "The {} parser returned no tree",
                self.grammar.name()
            ))
        })?;

        let errors = extract_errors(&tree, content);
        let is_valid = errors.is_empty();

        Ok(ParseOutcome {
            tree,
            errors,
            is_valid,
            source: content.to_string(),
        })
    }
}

/// Extract parse errors from a syntax tree
fn extract_errors(tree: &Tree, source: &str) -> Vec<ParseError> {
    let mut errors = Vec::new();
    if !tree.root_node().has_error() {
        return errors;
    }
    let mut cursor = tree.walk();
    collect_errors_recursive(&mut cursor, source, &mut errors);
    errors
}

fn collect_errors_recursive(cursor: &mut TreeCursor, source: &str, errors: &mut Vec<ParseError>) {
    let node = cursor.node();

    if node.is_error() || node.is_missing() {
        let start_byte = node.start_byte();
        let end_byte = node.end_byte();
        let start_point = node.start_position();

        let message = if node.is_missing() {
            format!("Missing {}", node.kind())
        } else {
            format!("Syntax error: unexpected {}", node.kind())
        };

        errors.push(ParseError {
            message,
            line: start_point.row,
            column: start_point.column,
            offset: start_byte,
            length: end_byte.saturating_sub(start_byte),
        });
        return;
    }

    if cursor.goto_first_child() {
        loop {
            collect_errors_recursive(cursor, source, errors);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }
}

impl ParseOutcome {
    /// Get the root node of the syntax tree
    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Check whether the parse produced any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Slice the source for a node of this tree
    pub fn text_of(&self, node: Node<'_>) -> &str {
        &self.source[node.start_byte()..node.end_byte()]
    }
}
