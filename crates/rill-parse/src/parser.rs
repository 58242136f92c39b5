//! Recursive-descent parser for Rill documents.

use tracing::trace;

use crate::ast::{Body, Document, Entry, Key, List, Scalar, ScalarKind, Value};
use crate::{Lexer, ParseError, ParseErrorKind, Span, Token, TokenKind};

/// A parser that builds a [`Document`] from source text.
///
/// Parsing is fail-fast: the first error aborts this source. Collecting
/// failures across many sources is the ingestion layer's job.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    peeked: Option<Token<'src>>,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            peeked: None,
        }
    }

    /// Peek at the current token without consuming it.
    fn peek(&mut self) -> Token<'src> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token());
        }
        self.peeked.unwrap()
    }

    /// Consume and return the current token.
    fn bump(&mut self) -> Token<'src> {
        let token = self.peek();
        self.peeked = None;
        token
    }

    /// Parse a whole document.
    pub fn parse_document(mut self) -> Result<Document, ParseError> {
        let first = self.peek();
        let root = match first.kind {
            // A bare number or list parses, but the root is then not
            // block-list-shaped; callers detect that via Document::body.
            TokenKind::Number | TokenKind::LBracket => {
                let value = self.parse_value()?;
                let next = self.peek();
                if next.kind != TokenKind::Eof {
                    return Err(self.error(ParseErrorKind::TrailingContent, next));
                }
                value
            }
            _ => Value::Object(self.parse_entries(None)?),
        };
        Ok(Document { root })
    }

    /// Parse entries until EOF, or until the `}` closing `open`.
    ///
    /// The closing brace itself is left for the caller to consume.
    fn parse_entries(&mut self, open: Option<Token<'src>>) -> Result<Body, ParseError> {
        let start = self.peek().span;
        let mut entries: Vec<Entry> = Vec::new();
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => {
                    if let Some(open) = open {
                        return Err(self.error(ParseErrorKind::UnclosedBlock, open));
                    }
                    break;
                }
                TokenKind::RBrace if open.is_some() => break,
                // entries may be separated by optional commas
                TokenKind::Comma => {
                    self.bump();
                }
                kind if kind.is_key_start() => entries.push(self.parse_entry()?),
                kind if kind.is_error() => return Err(self.token_error(token)),
                _ => return Err(self.error(ParseErrorKind::ExpectedKey, token)),
            }
        }
        let span = match (entries.first(), entries.last()) {
            (Some(first), Some(last)) => first.span.join(last.span),
            _ => Span::empty(start.start),
        };
        Ok(Body { entries, span })
    }

    /// Parse one entry: `key... = value` or `key... { ... }`.
    fn parse_entry(&mut self) -> Result<Entry, ParseError> {
        let first = self.peek();
        trace!("entry at line {}", first.line);

        let mut keys = Vec::new();
        while self.peek().kind.is_key_start() {
            keys.push(self.parse_key()?);
        }

        let token = self.peek();
        let value = match token.kind {
            TokenKind::Assign => {
                self.bump();
                self.parse_value()?
            }
            TokenKind::LBrace => self.parse_block()?,
            kind if kind.is_error() => return Err(self.token_error(token)),
            _ => return Err(self.error(ParseErrorKind::ExpectedAssignOrBlock, token)),
        };

        let span = keys[0].span.join(value.span());
        Ok(Entry {
            keys,
            value,
            line: first.line,
            span,
        })
    }

    fn parse_key(&mut self) -> Result<Key, ParseError> {
        let token = self.bump();
        match token.kind {
            TokenKind::Ident => Ok(Key {
                text: token.text.to_string(),
                quoted: false,
                span: token.span,
            }),
            TokenKind::Str => Ok(Key {
                text: self.unescape(token)?,
                quoted: true,
                span: token.span,
            }),
            _ => Err(self.error(ParseErrorKind::ExpectedKey, token)),
        }
    }

    /// Parse a braced body, starting at `{`.
    fn parse_block(&mut self) -> Result<Value, ParseError> {
        let open = self.bump();
        let body = self.parse_entries(Some(open))?;
        let close = self.bump();
        Ok(Value::Object(Body {
            entries: body.entries,
            span: open.span.join(close.span),
        }))
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let token = self.peek();
        match token.kind {
            TokenKind::Str => {
                self.bump();
                let text = self.unescape(token)?;
                Ok(Value::Scalar(Scalar {
                    text,
                    kind: ScalarKind::Str,
                    span: token.span,
                }))
            }
            TokenKind::Number => {
                self.bump();
                Ok(Value::Scalar(Scalar {
                    text: token.text.to_string(),
                    kind: ScalarKind::Number,
                    span: token.span,
                }))
            }
            TokenKind::Ident if matches!(token.text, "true" | "false") => {
                self.bump();
                Ok(Value::Scalar(Scalar {
                    text: token.text.to_string(),
                    kind: ScalarKind::Bool,
                    span: token.span,
                }))
            }
            TokenKind::LBracket => self.parse_list(),
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Eof => Err(self.error(ParseErrorKind::UnexpectedEof, token)),
            kind if kind.is_error() => Err(self.token_error(token)),
            _ => Err(self.error(ParseErrorKind::ExpectedValue, token)),
        }
    }

    /// Parse a `[v, v, ...]` list, starting at `[`. Trailing commas are
    /// allowed.
    fn parse_list(&mut self) -> Result<Value, ParseError> {
        let open = self.bump();
        let mut items = Vec::new();
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::RBracket => break,
                TokenKind::Eof => return Err(self.error(ParseErrorKind::UnclosedList, open)),
                _ => {}
            }

            items.push(self.parse_value()?);

            let sep = self.peek();
            match sep.kind {
                TokenKind::Comma => {
                    self.bump();
                }
                TokenKind::RBracket => break,
                TokenKind::Eof => return Err(self.error(ParseErrorKind::UnclosedList, open)),
                kind if kind.is_error() => return Err(self.token_error(sep)),
                _ => return Err(self.error(ParseErrorKind::UnexpectedToken, sep)),
            }
        }
        let close = self.bump();
        Ok(Value::List(List {
            items,
            span: open.span.join(close.span),
        }))
    }

    /// Strip the quotes from a string token and process escapes.
    fn unescape(&self, token: Token<'src>) -> Result<String, ParseError> {
        let inner = &token.text[1..token.text.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.char_indices();
        while let Some((offset, c)) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            let Some((_, esc)) = chars.next() else {
                return Err(self.escape_error(token, offset, "\\"));
            };
            match esc {
                '\\' => out.push('\\'),
                '"' => out.push('"'),
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                'u' => {
                    let mut code = 0u32;
                    for _ in 0..4 {
                        let digit = chars.next().and_then(|(_, h)| h.to_digit(16));
                        let Some(digit) = digit else {
                            return Err(self.escape_error(token, offset, "\\u"));
                        };
                        code = code * 16 + digit;
                    }
                    match char::from_u32(code) {
                        Some(decoded) => out.push(decoded),
                        None => return Err(self.escape_error(token, offset, "\\u")),
                    }
                }
                other => {
                    let seq = format!("\\{}", other);
                    return Err(self.escape_error(token, offset, &seq));
                }
            }
        }
        Ok(out)
    }

    fn escape_error(&self, token: Token<'src>, offset: usize, seq: &str) -> ParseError {
        let start = token.span.start + 1 + offset as u32;
        let end = (start + seq.len() as u32).min(token.span.end);
        ParseError::new(
            ParseErrorKind::InvalidEscape(seq.to_string()),
            Span::new(start, end),
            token.line,
        )
    }

    fn error(&self, kind: ParseErrorKind, token: Token<'src>) -> ParseError {
        ParseError::new(kind, token.span, token.line)
    }

    /// Turn a lexer error token into a parse error.
    fn token_error(&self, token: Token<'src>) -> ParseError {
        let kind = match token.kind {
            TokenKind::UnterminatedString => ParseErrorKind::UnterminatedString,
            TokenKind::UnclosedComment => ParseErrorKind::UnclosedComment,
            TokenKind::InvalidNumber => ParseErrorKind::InvalidNumber,
            _ => ParseErrorKind::UnexpectedToken,
        };
        ParseError::new(kind, token.span, token.line)
    }
}
