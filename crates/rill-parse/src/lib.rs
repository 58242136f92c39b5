#![doc = include_str!("../README.md")]

mod ast;
mod diagnostic;
mod lexer;
mod parser;
mod span;
mod token;

pub use ast::{Body, Document, Entry, Key, List, Scalar, ScalarKind, Value};
pub use diagnostic::{ParseError, ParseErrorKind};
pub use lexer::Lexer;
pub use parser::Parser;
pub use span::Span;
pub use token::{Token, TokenKind};

/// Parse a Rill document.
pub fn parse(source: &str) -> Result<Document, ParseError> {
    Parser::new(source).parse_document()
}
