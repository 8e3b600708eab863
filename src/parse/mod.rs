pub mod ast;
mod lexer;
mod parser;
pub mod visit;

pub use lexer::TokenKind;
pub use parser::{ParseError, ParseErrorKind, Parser};

/// Parses a dice expression such as `(10d20 + 10) * 2` or `^d20 + 4` into an [`ast::Expression`].
pub fn parse(s: &str) -> Result<ast::Expression, ParseError> {
    Parser::new(s).parse()
}
