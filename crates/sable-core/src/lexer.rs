//! Maximal-munch lexer for the Sable language.
//!
//! Each call to [`Lexer::next_token`] drives the state machine from the
//! current offset, keeps the longest prefix that ended in an accepting
//! state, and emits exactly one token. Characters examined past the last
//! accept point are not consumed; the next call re-examines them.
//! Lexical errors never stop the scan: the malformed span is emitted as an
//! `Invalid` or `UnclosedString` token, a diagnostic is recorded, and the
//! cursor moves on.

use crate::diagnostics::{Diagnostic, Diagnostics, LexErrorKind};
use crate::span::{Position, Span};
use crate::state::{self, State, StateClass};
use crate::token::{self, Token, TokenKind};

/// Cursor state threaded through a single lex: the current character
/// offset, the 1-based line number, and the offset of the current line's
/// first character. Columns are `offset - line_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPosition {
    pub offset: usize,
    pub line: usize,
    pub line_start: usize,
}

impl ScanPosition {
    pub fn new() -> Self {
        Self {
            offset: 0,
            line: 1,
            line_start: 0,
        }
    }

    /// Current column (0-indexed).
    pub fn column(&self) -> usize {
        self.offset - self.line_start
    }
}

impl Default for ScanPosition {
    fn default() -> Self {
        Self::new()
    }
}

/// Lexer for Sable source text.
///
/// Each lexer owns its own cursor and diagnostics, so independent lexes
/// (including lexes of different inputs on different threads) never share
/// state.
pub struct Lexer {
    chars: Vec<char>,
    pos: ScanPosition,
    diagnostics: Diagnostics,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: ScanPosition::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Current cursor state.
    pub fn position(&self) -> ScanPosition {
        self.pos
    }

    /// True once any lexical error has been recorded.
    pub fn had_error(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Scan the next token with maximal munch.
    ///
    /// Returns `None` once the input is exhausted. Every call consumes at
    /// least one character, so the scan always terminates.
    pub fn next_token(&mut self) -> Option<Token> {
        let start = self.pos.offset;
        if start >= self.chars.len() {
            return None;
        }

        let start_pos = Position::new(self.pos.line, self.pos.column(), start);

        let mut current = State::Start;
        let mut accepted: Option<(usize, TokenKind, Option<LexErrorKind>)> = None;
        let mut cursor = start;

        while let Some(&ch) = self.chars.get(cursor) {
            current = state::step(current, ch);
            match state::classify(current) {
                StateClass::Dead => break,
                StateClass::Live => {}
                // Longest match wins: overwrite any earlier accept point.
                StateClass::Accept(kind) => accepted = Some((cursor + 1, kind, None)),
                StateClass::ErrorAccept(error) => {
                    accepted = Some((cursor + 1, error_token_kind(error), Some(error)));
                }
            }
            cursor += 1;
        }

        let (end, kind, error) = match accepted {
            Some(accept) => accept,
            // Even the first character matched nothing; consume it alone so
            // the cursor still advances.
            None => (
                start + 1,
                TokenKind::Invalid,
                Some(LexErrorKind::InvalidToken),
            ),
        };

        if let Some(error) = error {
            self.report(error, start_pos, end - start);
        }

        // Advance over the consumed span, reacting to every line terminator
        // physically consumed, even inside comments or whitespace runs.
        for offset in start..end {
            if self.chars[offset] == '\n' {
                self.pos.line += 1;
                self.pos.line_start = offset + 1;
            }
        }
        self.pos.offset = end;

        let end_pos = Position::new(self.pos.line, self.pos.column(), end);
        let lexeme: String = self.chars[start..end].iter().collect();
        let value = token::decode(kind, &lexeme);

        Some(Token::new(kind, value, Span::new(start_pos, end_pos)))
    }

    /// Tokenize the remaining input.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }

    fn report(&mut self, kind: LexErrorKind, at: Position, length: usize) {
        let line_text = self.line_text(at.offset - at.column);
        self.diagnostics
            .push(Diagnostic::new(kind, at.line, at.column, length, line_text));
    }

    /// Full text of the line starting at `line_start`, without its
    /// terminator, recomputed from the input.
    fn line_text(&self, line_start: usize) -> String {
        self.chars[line_start..]
            .iter()
            .take_while(|&&ch| ch != '\n')
            .collect()
    }
}

fn error_token_kind(error: LexErrorKind) -> TokenKind {
    match error {
        LexErrorKind::InvalidToken => TokenKind::Invalid,
        LexErrorKind::UnclosedString => TokenKind::UnclosedString,
    }
}

/// Lex `source` into its complete token stream.
///
/// Returns the ordered tokens plus a flag that is true when any lexical
/// error occurred. The stream is complete and usable even on error: the
/// malformed spans are present as `Invalid`/`UnclosedString` tokens.
pub fn lex(source: &str) -> (Vec<Token>, bool) {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize();
    (tokens, lexer.had_error())
}
