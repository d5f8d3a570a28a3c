//! Deterministic finite automaton driving the scanner.
//!
//! `step` is a pure, total transition function: every (state, character)
//! pair maps to a state, possibly `Dead`. `classify` partitions the states
//! into dead, live, accepting, and error-accepting groups and maps each
//! accepting state onto its public [`TokenKind`]. That mapping is the one
//! place where intermediate states (keyword prefixes, the newline state,
//! the terminated-comment state) are collapsed into public categories.
//!
//! Keyword recognition is embedded in the state graph as a
//! character-by-character trie; deviating from a keyword spelling with an
//! identifier character falls through to the generic identifier state, and
//! every prefix state already accepts as an identifier.

use crate::diagnostics::LexErrorKind;
use crate::token::TokenKind;

/// States of the automaton.
///
/// Only the scanner ever sees these; tokens carry the public [`TokenKind`]
/// produced by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    Start,

    // Live but non-accepting: a second character must complete these.
    Equal,
    Backslash,

    // Error-accepting: recording these as accept points lets the whole
    // malformed run surface as a single token.
    IntAlpha,
    StringBody,
    StringEscape,

    // One-character operators and punctuation.
    Bang,
    Minus,
    Plus,
    Slash,
    Less,
    Greater,
    Dot,
    Star,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Newline,

    // Two-character operators.
    BangEqual,
    EqualEqual,
    PlusPlus,
    FatArrow,
    Arrow,
    SlashSlash,
    LessEqual,
    GreaterEqual,
    StarStar,
    AmpAmp,
    PipePipe,

    // Keywords and the boolean spellings.
    TypeStr,
    TypeInt,
    TypeUint,
    TypeDbl,
    TypeBool,
    Else,
    Boolean,

    // Keyword-prefix trie. All of these accept as identifiers.
    IdB,
    IdBo,
    IdBoo,
    IdD,
    IdDb,
    IdE,
    IdEl,
    IdEls,
    IdF,
    IdFa,
    IdFal,
    IdFals,
    IdI,
    IdIn,
    IdS,
    IdSt,
    IdT,
    IdTr,
    IdTru,
    IdU,
    IdUi,
    IdUin,

    // Generic literal states.
    Identifier,
    Integer,
    Comment,
    CommentEnd,
    StringClosed,
    Whitespace,

    Dead,
}

/// How the scanner should treat a state it has just reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StateClass {
    /// No token can ever be completed by continuing from here.
    Dead,
    /// Consuming may continue, but stopping here yields nothing.
    Live,
    /// Stopping here yields a token of the given public kind.
    Accept(TokenKind),
    /// Stopping here yields a malformed span of the given error kind.
    ErrorAccept(LexErrorKind),
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_space_char(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\x0b' | '\x0c' | '\n')
}

/// Line terminators end comments and are illegal inside strings.
fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\x0c')
}

/// Take one step through the automaton.
pub(crate) fn step(state: State, ch: char) -> State {
    match state {
        State::Start => match ch {
            '\\' => State::Backslash,
            '!' => State::Bang,
            '=' => State::Equal,
            '-' => State::Minus,
            '+' => State::Plus,
            '/' => State::Slash,
            '<' => State::Less,
            '>' => State::Greater,
            '.' => State::Dot,
            '*' => State::Star,
            '%' => State::Percent,
            '&' => State::Amp,
            '|' => State::Pipe,
            '~' => State::Tilde,
            '^' => State::Caret,
            '(' => State::LParen,
            ')' => State::RParen,
            '[' => State::LBracket,
            ']' => State::RBracket,
            '{' => State::LBrace,
            '}' => State::RBrace,
            ',' => State::Comma,
            ':' => State::Colon,
            '#' => State::Comment,
            '\'' => State::StringBody,
            '\n' => State::Newline,
            'b' => State::IdB,
            'd' => State::IdD,
            'e' => State::IdE,
            'f' => State::IdF,
            'i' => State::IdI,
            's' => State::IdS,
            't' => State::IdT,
            'u' => State::IdU,
            c if is_space_char(c) => State::Whitespace,
            c if c.is_ascii_alphabetic() => State::Identifier,
            c if c.is_ascii_digit() => State::Integer,
            _ => State::Dead,
        },

        // Operators that may extend by one more character.
        State::Bang => match ch {
            '=' => State::BangEqual,
            _ => State::Dead,
        },
        State::Equal => match ch {
            '>' => State::FatArrow,
            '=' => State::EqualEqual,
            _ => State::Dead,
        },
        State::Minus => match ch {
            '>' => State::Arrow,
            c if c.is_ascii_digit() => State::Integer,
            _ => State::Dead,
        },
        State::Plus => match ch {
            '+' => State::PlusPlus,
            c if c.is_ascii_digit() => State::Integer,
            _ => State::Dead,
        },
        State::Slash => match ch {
            '/' => State::SlashSlash,
            _ => State::Dead,
        },
        State::Less => match ch {
            '=' => State::LessEqual,
            _ => State::Dead,
        },
        State::Greater => match ch {
            '=' => State::GreaterEqual,
            _ => State::Dead,
        },
        State::Star => match ch {
            '*' => State::StarStar,
            _ => State::Dead,
        },
        State::Amp => match ch {
            '&' => State::AmpAmp,
            _ => State::Dead,
        },
        State::Pipe => match ch {
            '|' => State::PipePipe,
            _ => State::Dead,
        },

        // Keyword trie: `bool`
        State::IdB => match ch {
            'o' => State::IdBo,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },
        State::IdBo => match ch {
            'o' => State::IdBoo,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },
        State::IdBoo => match ch {
            'l' => State::TypeBool,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },

        // Keyword trie: `dbl`
        State::IdD => match ch {
            'b' => State::IdDb,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },
        State::IdDb => match ch {
            'l' => State::TypeDbl,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },

        // Keyword trie: `else`
        State::IdE => match ch {
            'l' => State::IdEl,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },
        State::IdEl => match ch {
            's' => State::IdEls,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },
        State::IdEls => match ch {
            'e' => State::Else,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },

        // Keyword trie: `false`
        State::IdF => match ch {
            'a' => State::IdFa,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },
        State::IdFa => match ch {
            'l' => State::IdFal,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },
        State::IdFal => match ch {
            's' => State::IdFals,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },
        State::IdFals => match ch {
            'e' => State::Boolean,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },

        // Keyword trie: `int`
        State::IdI => match ch {
            'n' => State::IdIn,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },
        State::IdIn => match ch {
            't' => State::TypeInt,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },

        // Keyword trie: `str`
        State::IdS => match ch {
            't' => State::IdSt,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },
        State::IdSt => match ch {
            'r' => State::TypeStr,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },

        // Keyword trie: `true`
        State::IdT => match ch {
            'r' => State::IdTr,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },
        State::IdTr => match ch {
            'u' => State::IdTru,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },
        State::IdTru => match ch {
            'e' => State::Boolean,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },

        // Keyword trie: `uint`
        State::IdU => match ch {
            'i' => State::IdUi,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },
        State::IdUi => match ch {
            'n' => State::IdUin,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },
        State::IdUin => match ch {
            't' => State::TypeUint,
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },

        // A keyword followed by an identifier character is an identifier
        // after all: `integer`, `strs`, `truest`.
        State::TypeStr
        | State::TypeInt
        | State::TypeUint
        | State::TypeDbl
        | State::TypeBool
        | State::Else
        | State::Boolean => match ch {
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },

        State::Identifier => match ch {
            c if is_ident_char(c) => State::Identifier,
            _ => State::Dead,
        },

        State::Integer => match ch {
            c if c.is_ascii_digit() => State::Integer,
            // Letters glued onto digits flag the whole run as malformed.
            c if c.is_ascii_alphabetic() => State::IntAlpha,
            _ => State::Dead,
        },
        State::IntAlpha => match ch {
            c if is_ident_char(c) => State::IntAlpha,
            _ => State::Dead,
        },

        State::Comment => match ch {
            '#' => State::CommentEnd,
            c if is_line_terminator(c) => State::Dead,
            _ => State::Comment,
        },

        State::StringBody => match ch {
            '\\' => State::StringEscape,
            '\'' => State::StringClosed,
            c if is_line_terminator(c) => State::Dead,
            _ => State::StringBody,
        },
        State::StringEscape => match ch {
            c if is_line_terminator(c) => State::Dead,
            _ => State::StringBody,
        },

        State::Newline | State::Whitespace => match ch {
            c if is_space_char(c) => State::Whitespace,
            _ => State::Dead,
        },

        // Nothing extends these.
        State::Backslash
        | State::BangEqual
        | State::EqualEqual
        | State::PlusPlus
        | State::FatArrow
        | State::Arrow
        | State::SlashSlash
        | State::LessEqual
        | State::GreaterEqual
        | State::StarStar
        | State::AmpAmp
        | State::PipePipe
        | State::Dot
        | State::Percent
        | State::Tilde
        | State::Caret
        | State::LParen
        | State::RParen
        | State::LBracket
        | State::RBracket
        | State::LBrace
        | State::RBrace
        | State::Comma
        | State::Colon
        | State::CommentEnd
        | State::StringClosed
        | State::Dead => State::Dead,
    }
}

/// Classify a state, mapping accepting states onto public token kinds.
pub(crate) fn classify(state: State) -> StateClass {
    match state {
        State::Dead => StateClass::Dead,

        State::Start | State::Equal | State::Backslash => StateClass::Live,

        State::IntAlpha => StateClass::ErrorAccept(LexErrorKind::InvalidToken),
        State::StringBody | State::StringEscape => {
            StateClass::ErrorAccept(LexErrorKind::UnclosedString)
        }

        State::Bang => StateClass::Accept(TokenKind::Bang),
        State::Minus => StateClass::Accept(TokenKind::Minus),
        State::Plus => StateClass::Accept(TokenKind::Plus),
        State::Slash => StateClass::Accept(TokenKind::Slash),
        State::Less => StateClass::Accept(TokenKind::Less),
        State::Greater => StateClass::Accept(TokenKind::Greater),
        State::Dot => StateClass::Accept(TokenKind::Dot),
        State::Star => StateClass::Accept(TokenKind::Star),
        State::Percent => StateClass::Accept(TokenKind::Percent),
        State::Amp => StateClass::Accept(TokenKind::Amp),
        State::Pipe => StateClass::Accept(TokenKind::Pipe),
        State::Caret => StateClass::Accept(TokenKind::Caret),
        State::Tilde => StateClass::Accept(TokenKind::Tilde),
        State::LParen => StateClass::Accept(TokenKind::LParen),
        State::RParen => StateClass::Accept(TokenKind::RParen),
        State::LBracket => StateClass::Accept(TokenKind::LBracket),
        State::RBracket => StateClass::Accept(TokenKind::RBracket),
        State::LBrace => StateClass::Accept(TokenKind::LBrace),
        State::RBrace => StateClass::Accept(TokenKind::RBrace),
        State::Comma => StateClass::Accept(TokenKind::Comma),
        State::Colon => StateClass::Accept(TokenKind::Colon),

        State::BangEqual => StateClass::Accept(TokenKind::BangEqual),
        State::EqualEqual => StateClass::Accept(TokenKind::EqualEqual),
        State::PlusPlus => StateClass::Accept(TokenKind::PlusPlus),
        State::FatArrow => StateClass::Accept(TokenKind::FatArrow),
        State::Arrow => StateClass::Accept(TokenKind::Arrow),
        State::SlashSlash => StateClass::Accept(TokenKind::SlashSlash),
        State::LessEqual => StateClass::Accept(TokenKind::LessEqual),
        State::GreaterEqual => StateClass::Accept(TokenKind::GreaterEqual),
        State::StarStar => StateClass::Accept(TokenKind::StarStar),
        State::AmpAmp => StateClass::Accept(TokenKind::AmpAmp),
        State::PipePipe => StateClass::Accept(TokenKind::PipePipe),

        State::TypeStr => StateClass::Accept(TokenKind::TypeStr),
        State::TypeInt => StateClass::Accept(TokenKind::TypeInt),
        State::TypeUint => StateClass::Accept(TokenKind::TypeUint),
        State::TypeDbl => StateClass::Accept(TokenKind::TypeDbl),
        State::TypeBool => StateClass::Accept(TokenKind::TypeBool),
        State::Else => StateClass::Accept(TokenKind::Else),
        State::Boolean => StateClass::Accept(TokenKind::Boolean),

        // Normalization: keyword prefixes are plain identifiers, a
        // terminated comment is a plain comment, a newline is whitespace.
        State::IdB
        | State::IdBo
        | State::IdBoo
        | State::IdD
        | State::IdDb
        | State::IdE
        | State::IdEl
        | State::IdEls
        | State::IdF
        | State::IdFa
        | State::IdFal
        | State::IdFals
        | State::IdI
        | State::IdIn
        | State::IdS
        | State::IdSt
        | State::IdT
        | State::IdTr
        | State::IdTru
        | State::IdU
        | State::IdUi
        | State::IdUin
        | State::Identifier => StateClass::Accept(TokenKind::Identifier),

        State::Integer => StateClass::Accept(TokenKind::Integer),
        State::Comment | State::CommentEnd => StateClass::Accept(TokenKind::Comment),
        State::StringClosed => StateClass::Accept(TokenKind::String),
        State::Newline | State::Whitespace => StateClass::Accept(TokenKind::Whitespace),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run a whole lexeme through the automaton from the start state.
    fn walk(input: &str) -> State {
        input.chars().fold(State::Start, step)
    }

    #[test]
    fn single_then_double_operators() {
        assert_eq!(walk("!"), State::Bang);
        assert_eq!(walk("!="), State::BangEqual);
        assert_eq!(step(State::Bang, 'x'), State::Dead);
        assert_eq!(walk("=>"), State::FatArrow);
        assert_eq!(walk("=="), State::EqualEqual);
        assert_eq!(walk("->"), State::Arrow);
        assert_eq!(walk("++"), State::PlusPlus);
        assert_eq!(walk("**"), State::StarStar);
        assert_eq!(walk("&&"), State::AmpAmp);
        assert_eq!(walk("||"), State::PipePipe);
        assert_eq!(walk("//"), State::SlashSlash);
    }

    #[test]
    fn bare_equal_and_backslash_are_live_not_accepting() {
        assert_eq!(classify(State::Equal), StateClass::Live);
        assert_eq!(classify(State::Backslash), StateClass::Live);
        assert_eq!(step(State::Backslash, 'n'), State::Dead);
    }

    #[test]
    fn keyword_trie_reaches_every_keyword() {
        assert_eq!(walk("str"), State::TypeStr);
        assert_eq!(walk("int"), State::TypeInt);
        assert_eq!(walk("uint"), State::TypeUint);
        assert_eq!(walk("dbl"), State::TypeDbl);
        assert_eq!(walk("bool"), State::TypeBool);
        assert_eq!(walk("else"), State::Else);
        assert_eq!(walk("true"), State::Boolean);
        assert_eq!(walk("false"), State::Boolean);
    }

    #[test]
    fn keyword_prefixes_accept_as_identifiers() {
        assert_eq!(classify(walk("uin")), StateClass::Accept(TokenKind::Identifier));
        assert_eq!(classify(walk("fals")), StateClass::Accept(TokenKind::Identifier));
        // Deviating from the trie keeps the identifier path alive.
        assert_eq!(walk("inx"), State::Identifier);
        // A non-identifier character after a prefix is dead, so the scanner
        // falls back to the identifier accept recorded at the prefix.
        assert_eq!(step(State::IdS, '+'), State::Dead);
    }

    #[test]
    fn keywords_extend_into_identifiers() {
        assert_eq!(walk("integer"), State::Identifier);
        assert_eq!(walk("int8"), State::Identifier);
        assert_eq!(walk("truest"), State::Identifier);
    }

    #[test]
    fn integers_and_malformed_literals() {
        assert_eq!(walk("123"), State::Integer);
        assert_eq!(walk("-9"), State::Integer);
        assert_eq!(walk("+9"), State::Integer);
        assert_eq!(walk("123abc"), State::IntAlpha);
        assert_eq!(walk("1a2_b"), State::IntAlpha);
        assert_eq!(
            classify(State::IntAlpha),
            StateClass::ErrorAccept(LexErrorKind::InvalidToken)
        );
    }

    #[test]
    fn string_states() {
        assert_eq!(walk("'ab"), State::StringBody);
        assert_eq!(walk("'ab'"), State::StringClosed);
        assert_eq!(walk(r"'a\"), State::StringEscape);
        assert_eq!(walk(r"'a\'b'"), State::StringClosed);
        assert_eq!(step(State::StringBody, '\n'), State::Dead);
        assert_eq!(step(State::StringEscape, '\n'), State::Dead);
        assert_eq!(
            classify(State::StringEscape),
            StateClass::ErrorAccept(LexErrorKind::UnclosedString)
        );
    }

    #[test]
    fn comment_terminator_handling() {
        assert_eq!(walk("#hi"), State::Comment);
        assert_eq!(walk("#hi#"), State::CommentEnd);
        // A line terminator ends the comment without being consumed.
        assert_eq!(step(State::Comment, '\n'), State::Dead);
        assert_eq!(classify(State::CommentEnd), StateClass::Accept(TokenKind::Comment));
    }

    #[test]
    fn whitespace_runs_and_newline_normalization() {
        assert_eq!(walk("\n"), State::Newline);
        assert_eq!(walk("\n \t"), State::Whitespace);
        assert_eq!(walk("  \n  "), State::Whitespace);
        assert_eq!(classify(State::Newline), StateClass::Accept(TokenKind::Whitespace));
    }

    #[test]
    fn dead_state_is_absorbing() {
        for ch in ['a', '0', ' ', '\n', '\'', '#', '\u{0}'] {
            assert_eq!(step(State::Dead, ch), State::Dead);
        }
        // Leading underscores and non-ASCII have no transition out of start.
        assert_eq!(step(State::Start, '_'), State::Dead);
        assert_eq!(step(State::Start, 'é'), State::Dead);
    }
}
