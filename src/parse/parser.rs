use super::{ast::*, lexer::*};
use crate::common::*;
use logos_iter::LogosIter;
use std::fmt;
use std::ops::Range;

type PResult<T = Expression> = Result<T, ParseError>;

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("error at position {} ({slice:?}): {kind}", .span.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
    pub slice: String,
}

#[derive(Debug, PartialEq)]
pub enum ParseErrorKind {
    EmptyExpression,
    UnexpectedToken {
        found: Option<TokenKind>,
        expected: Vec<TokenKind>,
    },
    UnexpectedString {
        expected: Vec<TokenKind>,
    },
    TrailingInput(TokenKind),
    InvalidDice,
    UnknownOperator,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyExpression => f.write_str("expression is empty"),
            Self::UnexpectedToken {
                found: Some(found),
                expected,
            } => {
                write!(f, "unexpected token: found {}, expected ", found)?;
                fmt_expected(expected, f)
            }
            Self::UnexpectedToken {
                found: None,
                expected,
            } => {
                write!(f, "unexpected end of input, expected ")?;
                fmt_expected(expected, f)
            }
            Self::UnexpectedString { expected } => {
                write!(f, "expected ")?;
                fmt_expected(expected, f)
            }
            Self::TrailingInput(found) => {
                write!(f, "unexpected {} after a complete expression", found)
            }
            Self::InvalidDice => f.write_str("invalid dice literal"),
            Self::UnknownOperator => f.write_str("unknown binary operator"),
        }
    }
}

fn fmt_expected(expected: &[TokenKind], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match expected {
        [] => Ok(()),
        [a] => f.write_str(a.as_str()),
        [a, b] => write!(f, "{} or {}", a, b),
        [rest @ .., last] => {
            for exp in rest {
                write!(f, "{}, ", exp)?;
            }
            write!(f, "or {}", last)
        }
    }
}

pub struct Parser<'a> {
    source: &'a str,
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            source: s,
            lexer: lexer(s),
        }
    }

    pub fn parse(mut self) -> PResult {
        if self.source.is_empty() {
            return Err(ParseError {
                kind: ParseErrorKind::EmptyExpression,
                span: 0..0,
                slice: String::new(),
            });
        }

        let expr = self.parse_addition()?;
        match self.advance() {
            None => {
                log::trace!("parsed {:?} as {}", self.source, expr);
                Ok(expr)
            }
            Some(TokenKind::Error) => {
                let mut expected = TokenKind::ADDITION_OPS.to_vec();
                expected.extend_from_slice(TokenKind::MULTIPLICATION_OPS);
                self.error(ParseErrorKind::UnexpectedString { expected })
            }
            Some(found) => self.error(ParseErrorKind::TrailingInput(found)),
        }
    }

    fn advance(&mut self) -> Option<TokenKind> {
        self.lexer.next()
    }

    fn peek(&mut self) -> Option<TokenKind> {
        self.lexer.peek().copied()
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        self.peek() == Some(kind)
    }

    fn matches_any(&mut self, options: &[TokenKind]) -> bool {
        self.peek().map_or(false, |peeked| options.contains(&peeked))
    }

    fn consume(&mut self, expected: TokenKind) -> PResult<()> {
        if self.matches(expected) {
            self.advance();
            Ok(())
        } else {
            self.unexpected_token(vec![expected])
        }
    }

    fn error<T>(&mut self, kind: ParseErrorKind) -> PResult<T> {
        Err(ParseError {
            kind,
            span: self.lexer.span(),
            slice: self.lexer.slice().to_string(),
        })
    }

    fn unexpected_token<T>(&mut self, expected: Vec<TokenKind>) -> PResult<T> {
        match self.advance() {
            None => {
                let end = self.source.len();
                Err(ParseError {
                    kind: ParseErrorKind::UnexpectedToken {
                        found: None,
                        expected,
                    },
                    span: end..end,
                    slice: String::new(),
                })
            }
            Some(TokenKind::Error) => self.error(ParseErrorKind::UnexpectedString { expected }),
            found => self.error(ParseErrorKind::UnexpectedToken { found, expected }),
        }
    }

    fn parse_addition(&mut self) -> PResult {
        let mut lhs = self.parse_multiplication()?;

        while self.matches_any(TokenKind::ADDITION_OPS) {
            let op = self.parse_operator()?;
            let rhs = self.parse_multiplication()?;

            lhs = Expression::math(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_multiplication(&mut self) -> PResult {
        let mut lhs = self.parse_term()?;

        while self.matches_any(TokenKind::MULTIPLICATION_OPS) {
            let op = self.parse_operator()?;
            let rhs = self.parse_term()?;

            lhs = Expression::math(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_operator(&mut self) -> PResult<BinaryOperator> {
        match self.advance().and_then(|kind| kind.as_binary_op()) {
            Some(op) => Ok(op),
            None => self.error(ParseErrorKind::UnknownOperator),
        }
    }

    fn parse_term(&mut self) -> PResult {
        match self.peek() {
            Some(TokenKind::LeftParen) => self.parse_parens(),
            Some(TokenKind::Minus) => self.parse_negated(),
            Some(TokenKind::Integer | TokenKind::Decimal) => {
                self.advance();
                self.number().map(Expression::number)
            }
            Some(TokenKind::Dice) => {
                self.advance();
                let (count, sides) = self.dice()?;
                Ok(Expression::roll(count.unwrap_or(1), sides))
            }
            Some(TokenKind::Advantage) => {
                self.advance();
                let (_, sides) = self.dice()?;
                Ok(Expression::advantage(sides))
            }
            Some(TokenKind::Disadvantage) => {
                self.advance();
                let (_, sides) = self.dice()?;
                Ok(Expression::disadvantage(sides))
            }
            _ => self.unexpected_token(TokenKind::TERM_START.to_vec()),
        }
    }

    fn parse_parens(&mut self) -> PResult {
        self.consume(TokenKind::LeftParen)?;
        let inner = self.parse_addition()?;
        self.consume(TokenKind::RightParen)?;
        Ok(inner)
    }

    /// A leading `-` only binds to the literal directly after it.
    fn parse_negated(&mut self) -> PResult {
        self.consume(TokenKind::Minus)?;
        match self.peek() {
            Some(TokenKind::Integer | TokenKind::Decimal) => {
                self.advance();
                self.number().map(|n| Expression::number(-n))
            }
            Some(TokenKind::Dice) => {
                self.advance();
                let (count, sides) = self.dice()?;
                Ok(Expression::roll(-count.unwrap_or(1), sides))
            }
            _ => self.unexpected_token(TokenKind::NEGATABLE.to_vec()),
        }
    }

    fn number(&mut self) -> PResult<Float> {
        let parsed = self.lexer.slice().parse::<Float>();
        match parsed {
            Ok(n) => Ok(n),
            Err(_) => self.error(ParseErrorKind::UnexpectedString {
                expected: vec![TokenKind::Integer, TokenKind::Decimal],
            }),
        }
    }

    /// Splits the current dice token into its optional count and its faces. The `^` and
    /// `v` prefixes carry no count.
    fn dice(&mut self) -> PResult<(Option<Int>, Sides)> {
        let parsed = self
            .lexer
            .slice()
            .split_once('d')
            .and_then(|(prefix, sides)| {
                let sides = sides.parse::<Sides>().ok()?;
                let count = match prefix {
                    "" | "^" | "v" => None,
                    count => Some(count.parse::<Int>().ok()?),
                };
                Some((count, sides))
            });

        match parsed {
            Some(dice) => Ok(dice),
            None => self.error(ParseErrorKind::InvalidDice),
        }
    }
}
