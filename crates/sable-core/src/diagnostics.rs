//! Lexical error kinds and source-anchored diagnostic rendering.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::token::Token;

/// The recoverable lexical error kinds.
///
/// None of these stop the scan; the malformed span is still emitted as a
/// token and the cursor moves past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LexErrorKind {
    /// The automaton died with no accepting prefix, or a digit run was
    /// immediately followed by letters.
    #[error("Invalid or unexpected token")]
    InvalidToken,
    /// A string literal hit a line terminator or end of input before its
    /// closing quote.
    #[error("Unclosed string")]
    UnclosedString,
}

/// A lexical error anchored to its source location.
///
/// The offending line's text is captured from the input at construction
/// time via the line-start offset; nothing here refers back to the lexer,
/// so diagnostics outlive the lex that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: LexErrorKind,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column of the first offending character (0-indexed)
    pub column: usize,
    /// Length of the offending span in characters
    pub length: usize,
    /// Full text of the offending line, without its terminator
    pub line_text: String,
}

impl Diagnostic {
    pub fn new(
        kind: LexErrorKind,
        line: usize,
        column: usize,
        length: usize,
        line_text: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            line,
            column,
            length,
            line_text: line_text.into(),
        }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Diagnostic {
    /// Renders the header, the numbered source line, and a caret row that
    /// lines up under the offending span in a monospaced rendering:
    ///
    /// ```text
    /// Syntax Error: Invalid or unexpected token on line 2
    /// 2: let 3x = 1
    ///        ^^
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Syntax Error: {} on line {}", self.kind, self.line)?;
        let prefix = format!("{}: ", self.line);
        writeln!(f, "{}{}", prefix, self.line_text)?;
        write!(
            f,
            "{}{}",
            " ".repeat(prefix.len() + self.column),
            "^".repeat(self.length)
        )
    }
}

/// Collection of diagnostics from one lex.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

/// JSON output envelope for a lex run.
#[derive(Debug, Serialize, Deserialize)]
pub struct LexOutput {
    pub version: String,
    pub status: String,
    pub tokens: Vec<Token>,
    pub errors: Vec<Diagnostic>,
    pub summary: LexSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LexSummary {
    pub total_tokens: usize,
    pub total_errors: usize,
}

impl LexOutput {
    pub fn new(tokens: Vec<Token>, diagnostics: &Diagnostics) -> Self {
        let errors: Vec<_> = diagnostics.iter().cloned().collect();
        Self {
            version: "1.0".to_string(),
            status: if errors.is_empty() { "ok" } else { "error" }.to_string(),
            summary: LexSummary {
                total_tokens: tokens.len(),
                total_errors: errors.len(),
            },
            tokens,
            errors,
        }
    }
}
