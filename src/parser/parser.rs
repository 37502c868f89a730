//! Operator-precedence parser and evaluator
//!
//! The parser evaluates while it parses; there is no intermediate tree.
//!
//! ```text
//! comparison     → additive (CMP additive)?
//! additive       → multiplicative (('+' | '-') multiplicative)*
//! multiplicative → unary (('*' | '/') unary)*
//! unary          → ('-' | '+') unary | power
//! power          → primary ('^' unary)?          (right-associative)
//! primary        → NUMBER | PERCENT | CURRENCY | REFERENCE
//!                | IDENT '(' additive ')' | IDENT | '(' additive ')'
//! ```
//!
//! A percent literal that is the immediate right operand of `+` or `-`
//! applies to the left operand: `A + P%` is `A * (1 + P/100)`. Everywhere
//! else it is its plain fraction.

use smol_str::SmolStr;
use text_size::TextSize;

use super::errors::ParseError;
use super::functions::{lookup_constant, lookup_function};
use super::lexer::{Token, TokenKind, tokenize};
use super::value::{Outcome, Value};

/// Supplies the numeric value behind a `\N` reference.
pub trait ReferenceResolver {
    fn resolve(&self, line: usize) -> Result<f64, ParseError>;
}

impl<F> ReferenceResolver for F
where
    F: Fn(usize) -> Result<f64, ParseError>,
{
    fn resolve(&self, line: usize) -> Result<f64, ParseError> {
        self(line)
    }
}

/// Parser over a borrowed token slice
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    resolver: Option<&'a dyn ReferenceResolver>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            resolver: None,
        }
    }

    /// Attach the resolver used for `\N` references.
    pub fn with_resolver(mut self, resolver: &'a dyn ReferenceResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Evaluate the whole token stream.
    pub fn parse(mut self) -> Result<Outcome, ParseError> {
        let outcome = self.parse_comparison()?;
        match self.next() {
            None => Ok(outcome),
            Some(token) => Err(ParseError::unexpected(&token.kind, token.offset())),
        }
    }

    // ========================================================================
    // Token cursor
    // ========================================================================

    fn peek_kind(&self) -> Option<&'a TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Precedence levels
    // ========================================================================

    fn parse_comparison(&mut self) -> Result<Outcome, ParseError> {
        let left = self.parse_additive()?;
        let op = match self.peek_kind() {
            Some(kind) if kind.is_comparison() => kind,
            _ => return Ok(Outcome::Number(left)),
        };
        self.pos += 1;

        let right = self.parse_additive()?;
        if self.peek_kind().is_some_and(TokenKind::is_comparison) {
            return Err(ParseError::ChainedComparison);
        }

        let (l, r) = (left.number, right.number);
        let result = match op {
            TokenKind::EqEq => l == r,
            TokenKind::BangEq => l != r,
            TokenKind::Gt => l > r,
            TokenKind::Lt => l < r,
            TokenKind::GtEq => l >= r,
            TokenKind::LtEq => l <= r,
            _ => unreachable!("guarded by is_comparison"),
        };
        Ok(Outcome::Boolean(result))
    }

    fn parse_additive(&mut self) -> Result<Value, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let subtract = match self.peek_kind() {
                Some(TokenKind::Plus) => false,
                Some(TokenKind::Minus) => true,
                _ => return Ok(left),
            };
            self.pos += 1;

            let right = self.parse_multiplicative()?;
            let number = match (right.is_percent, subtract) {
                (true, false) => left.number * (1.0 + right.number),
                (true, true) => left.number * (1.0 - right.number),
                (false, false) => left.number + right.number,
                (false, true) => left.number - right.number,
            };
            left = Value::number(number);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Value, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let divide = match self.peek_kind() {
                Some(TokenKind::Star) => false,
                Some(TokenKind::Slash) => true,
                _ => return Ok(left),
            };
            self.pos += 1;

            let right = self.parse_unary()?;
            left = if divide {
                Value::number(left.number / right.number)
            } else {
                Value::number(left.number * right.number)
            };
        }
    }

    fn parse_unary(&mut self) -> Result<Value, ParseError> {
        if self.eat(&TokenKind::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Value {
                number: -operand.number,
                ..operand
            });
        }
        if self.eat(&TokenKind::Plus) {
            return self.parse_unary();
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Value, ParseError> {
        let base = self.parse_primary()?;
        if self.eat(&TokenKind::Caret) {
            let exponent = self.parse_unary()?;
            return Ok(Value::number(base.number.powf(exponent.number)));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Value, ParseError> {
        let token = self.next().ok_or(ParseError::UnexpectedEnd)?;
        match &token.kind {
            TokenKind::Number(n) | TokenKind::Currency(n) => Ok(Value::number(*n)),
            TokenKind::Percent(points) => Ok(Value::percent(*points)),
            TokenKind::Reference(line) => self.resolve(*line).map(Value::number),
            TokenKind::Ident(name) => self.parse_identifier(name, token.offset()),
            TokenKind::LParen => {
                let inner = self.parse_additive()?;
                self.expect_close(token.offset())?;
                Ok(inner)
            }
            other => Err(ParseError::unexpected(other, token.offset())),
        }
    }

    fn parse_identifier(&mut self, name: &SmolStr, offset: TextSize) -> Result<Value, ParseError> {
        if self.peek_kind() != Some(&TokenKind::LParen) {
            return lookup_constant(name)
                .map(Value::number)
                .ok_or_else(|| ParseError::UnknownIdentifier(name.clone()));
        }

        let function =
            lookup_function(name).ok_or_else(|| ParseError::UnknownFunction(name.clone()))?;
        let open = self.next().map_or(offset, Token::offset);
        let argument = self.parse_additive()?;
        self.expect_close(open)?;
        Ok(Value::number(function(argument.number)))
    }

    fn expect_close(&mut self, open: TextSize) -> Result<(), ParseError> {
        if self.eat(&TokenKind::RParen) {
            Ok(())
        } else {
            Err(ParseError::UnmatchedParen { offset: open })
        }
    }

    fn resolve(&self, line: usize) -> Result<f64, ParseError> {
        match self.resolver {
            Some(resolver) => resolver.resolve(line),
            None => Err(ParseError::NoResolver(line)),
        }
    }
}

/// Tokenize and evaluate an expression in one step.
pub fn evaluate(
    expr: &str,
    resolver: Option<&dyn ReferenceResolver>,
) -> Result<Outcome, ParseError> {
    let tokens = tokenize(expr)?;
    let parser = Parser::new(&tokens);
    match resolver {
        Some(resolver) => parser.with_resolver(resolver).parse(),
        None => parser.parse(),
    }
}
