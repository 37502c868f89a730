//! Logos-based tokenizer for calculation expressions
//!
//! Tokenization happens in two steps:
//!
//! 1. [`normalize`] rewrites the raw text: whitespace variants become a space,
//!    unicode minus/multiply/divide signs become `-`, `*`, `/`, and an `x`
//!    between two operands becomes `*`.
//! 2. The logos-generated [`TokenKind`] lexer runs over the normalized text.
//!
//! All offsets in [`Token`] and [`LexError`] point into the normalized text.

use logos::Logos;
use smol_str::SmolStr;
use std::fmt;
use text_size::{TextRange, TextSize};

use super::errors::LexError;

/// A token with its kind and position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

impl Token {
    pub fn offset(&self) -> TextSize {
        self.range.start()
    }
}

/// Logos token enum
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[0-9]+(,[0-9]+)*(\.[0-9]*)?", |lex| parse_amount(lex.slice()))]
    #[regex(r"\.[0-9]+", |lex| parse_amount(lex.slice()))]
    Number(f64),

    /// Percent points as written (`20%` carries `20.0`)
    #[regex(r"[0-9]+(,[0-9]+)*(\.[0-9]*)?%", |lex| parse_amount(strip_suffix(lex.slice())))]
    #[regex(r"\.[0-9]+%", |lex| parse_amount(strip_suffix(lex.slice())))]
    Percent(f64),

    #[regex(r"\$[0-9]+(,[0-9]+)*(\.[0-9]*)?", |lex| parse_amount(&lex.slice()[1..]))]
    #[regex(r"\$\.[0-9]+", |lex| parse_amount(&lex.slice()[1..]))]
    // A currency amount cannot carry a percent suffix
    #[regex(r"\$[0-9]+(,[0-9]+)*(\.[0-9]*)?%", |_| None::<f64>)]
    Currency(f64),

    #[regex(r"\\[0-9]+", |lex| lex.slice()[1..].parse::<usize>().ok())]
    Reference(usize),

    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*", |lex| SmolStr::new(lex.slice().to_ascii_lowercase()))]
    Ident(SmolStr),

    // =========================================================================
    // COMPARISON (multi-character first)
    // =========================================================================
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token(">=")]
    GtEq,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token("<")]
    Lt,

    // =========================================================================
    // ARITHMETIC
    // =========================================================================
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    /// The result separator; never reaches the parser
    #[token("=", logos::skip)]
    Separator,
}

impl TokenKind {
    /// Comparison operators
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::EqEq | Self::BangEq | Self::GtEq | Self::LtEq | Self::Gt | Self::Lt
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "number {n}"),
            Self::Percent(p) => write!(f, "percent {p}%"),
            Self::Currency(c) => write!(f, "amount ${c}"),
            Self::Reference(n) => write!(f, "reference \\{n}"),
            Self::Ident(name) => write!(f, "identifier `{name}`"),
            Self::EqEq => f.write_str("`==`"),
            Self::BangEq => f.write_str("`!=`"),
            Self::GtEq => f.write_str("`>=`"),
            Self::LtEq => f.write_str("`<=`"),
            Self::Gt => f.write_str("`>`"),
            Self::Lt => f.write_str("`<`"),
            Self::Plus => f.write_str("`+`"),
            Self::Minus => f.write_str("`-`"),
            Self::Star => f.write_str("`*`"),
            Self::Slash => f.write_str("`/`"),
            Self::Caret => f.write_str("`^`"),
            Self::LParen => f.write_str("`(`"),
            Self::RParen => f.write_str("`)`"),
            Self::Separator => f.write_str("`=`"),
        }
    }
}

fn strip_suffix(slice: &str) -> &str {
    &slice[..slice.len() - 1]
}

/// Parse a numeric literal with `,` digit grouping.
fn parse_amount(slice: &str) -> Option<f64> {
    let digits: String = slice.chars().filter(|&c| c != ',').collect();
    digits.parse().ok()
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Rewrite whitespace and operator variants into the lexer's ASCII forms.
pub fn normalize(expr: &str) -> String {
    let chars: Vec<char> = expr
        .chars()
        .map(|c| match c {
            '\u{2212}' | '\u{2013}' | '\u{2014}' | '\u{FE63}' | '\u{FF0D}' => '-',
            '\u{00D7}' | '\u{22C5}' | '\u{00B7}' | '\u{2219}' => '*',
            '\u{00F7}' => '/',
            c if c.is_whitespace() => ' ',
            c => c,
        })
        .collect();

    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if matches!(c, 'x' | 'X') && is_multiplication_context(&chars, i) {
                '*'
            } else {
                c
            }
        })
        .collect()
}

/// Check whether the `x` at `index` sits between two operands.
fn is_multiplication_context(chars: &[char], index: usize) -> bool {
    let left = chars[..index].iter().rev().find(|c| **c != ' ');
    let right = chars[index + 1..].iter().find(|c| **c != ' ');

    let left_ok = matches!(left, Some(c) if c.is_ascii_digit() || matches!(c, ')' | '%' | '$' | '.'));
    let right_ok = matches!(
        right,
        Some(c) if c.is_ascii_digit()
            || matches!(c, '(' | '$' | '.' | '\\')
            || unicode_ident::is_xid_start(*c)
    );

    left_ok && right_ok
}

// ============================================================================
// TOKENIZE
// ============================================================================

/// Tokenize an expression.
///
/// The expression is normalized first; see the module docs.
pub fn tokenize(expr: &str) -> Result<Vec<Token>, LexError> {
    let normalized = normalize(expr);
    tokenize_normalized(&normalized)
}

/// Tokenize text that has already gone through [`normalize`].
pub fn tokenize_normalized(text: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    for (result, span) in TokenKind::lexer(text).spanned() {
        let range = TextRange::new(
            TextSize::new(span.start as u32),
            TextSize::new(span.end as u32),
        );
        match result {
            Ok(kind) => tokens.push(Token { kind, range }),
            Err(()) => return Err(classify_error(&text[span], range.start())),
        }
    }
    Ok(tokens)
}

fn classify_error(slice: &str, offset: TextSize) -> LexError {
    match slice.chars().next() {
        Some('\\') => LexError::DanglingReference { offset },
        Some('$') => LexError::DanglingCurrency { offset },
        Some(ch) => LexError::UnexpectedCharacter { ch, offset },
        // logos never reports an empty error slice
        None => LexError::UnexpectedCharacter { ch: '\0', offset },
    }
}
