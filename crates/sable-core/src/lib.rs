//! Sable Core Library
//!
//! This crate provides lexical analysis for the Sable language: the token
//! model, the maximal-munch scanner and its state machine, source span
//! tracking, and source-anchored diagnostics.

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod span;
pub mod token;

mod state;

pub use ast::{Ast, Symbol};
pub use diagnostics::{Diagnostic, Diagnostics, LexErrorKind, LexOutput};
pub use lexer::{lex, Lexer, ScanPosition};
pub use span::{Position, Span};
pub use token::{Token, TokenKind, TokenValue};
