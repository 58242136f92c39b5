//! Lexer for the Rill configuration language.

use tracing::trace;

use crate::{Span, Token, TokenKind};

/// A lexer that produces tokens from Rill source text.
///
/// Whitespace and comments are not tokens: the lexer swallows them and
/// hands the parser only the next significant token. Malformed input is
/// surfaced as error tokens rather than panics so the parser owns all
/// reporting.
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
    /// Current 1-based line number.
    line: u32,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
            line: 1,
        }
    }

    /// Get the current byte position.
    #[inline]
    pub fn position(&self) -> u32 {
        self.pos
    }

    /// Get the current 1-based line number.
    #[inline]
    pub fn current_line(&self) -> u32 {
        self.line
    }

    /// Check if we're at the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Peek at the nth character (0-indexed) without consuming.
    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        if c == '\n' {
            self.line += 1;
        }
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    /// Check if the remaining text starts with the given prefix.
    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    /// Create a token from the given start position to the current position.
    fn token(&self, kind: TokenKind, start: u32, line: u32) -> Token<'src> {
        let span = Span::new(start, self.pos);
        let text = &self.source[start as usize..self.pos as usize];
        trace!("token {:?} at {:?}: {:?}", kind, span, text);
        Token::new(kind, span, line, text)
    }

    /// Get the next significant token.
    pub fn next_token(&mut self) -> Token<'src> {
        loop {
            while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n')) {
                self.advance();
            }

            let start = self.pos;
            let line = self.line;
            let Some(c) = self.peek() else {
                return self.token(TokenKind::Eof, start, line);
            };

            match c {
                '#' => self.skip_line_comment(),
                '/' if self.starts_with("//") => self.skip_line_comment(),
                '/' if self.starts_with("/*") => {
                    if !self.skip_block_comment() {
                        return self.token(TokenKind::UnclosedComment, start, line);
                    }
                }

                '{' => return self.single(TokenKind::LBrace, start, line),
                '}' => return self.single(TokenKind::RBrace, start, line),
                '[' => return self.single(TokenKind::LBracket, start, line),
                ']' => return self.single(TokenKind::RBracket, start, line),
                ',' => return self.single(TokenKind::Comma, start, line),
                '=' => return self.single(TokenKind::Assign, start, line),

                '"' => return self.lex_string(start, line),

                '-' if matches!(self.peek_nth(1), Some(d) if d.is_ascii_digit()) => {
                    return self.lex_number(start, line);
                }
                d if d.is_ascii_digit() => return self.lex_number(start, line),

                c if is_ident_start(c) => return self.lex_ident(start, line),

                _ => return self.single(TokenKind::Error, start, line),
            }
        }
    }

    fn single(&mut self, kind: TokenKind, start: u32, line: u32) -> Token<'src> {
        self.advance();
        self.token(kind, start, line)
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip a `/* ... */` comment. Returns false if it never closes.
    fn skip_block_comment(&mut self) -> bool {
        self.advance();
        self.advance();
        while !self.is_eof() {
            if self.starts_with("*/") {
                self.advance();
                self.advance();
                return true;
            }
            self.advance();
        }
        false
    }

    /// Lex a quoted string. The token text includes the quotes; escape
    /// processing happens in the parser.
    fn lex_string(&mut self, start: u32, line: u32) -> Token<'src> {
        self.advance();
        loop {
            match self.peek() {
                // Strings do not span lines
                None | Some('\n') => {
                    return self.token(TokenKind::UnterminatedString, start, line);
                }
                Some('"') => {
                    self.advance();
                    return self.token(TokenKind::Str, start, line);
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn lex_number(&mut self, start: u32, line: u32) -> Token<'src> {
        let mut valid = true;

        if self.peek() == Some('-') {
            self.advance();
        }
        self.eat_digits();

        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.eat_digits();
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.eat_digits();
            } else {
                valid = false;
            }
        }

        // A number must end at a boundary: `12abc` and `1.2.3` are malformed.
        // Consume the junk so the error span covers all of it.
        if self.peek().is_some_and(|c| is_ident_char(c) || c == '.') {
            while self.peek().is_some_and(|c| is_ident_char(c) || c == '.') {
                self.advance();
            }
            valid = false;
        }

        let kind = if valid {
            TokenKind::Number
        } else {
            TokenKind::InvalidNumber
        };
        self.token(kind, start, line)
    }

    fn lex_ident(&mut self, start: u32, line: u32) -> Token<'src> {
        while self.peek().is_some_and(is_ident_char) {
            self.advance();
        }
        self.token(TokenKind::Ident, start, line)
    }

    fn eat_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token();
            let kind = token.kind;
            out.push(kind);
            if kind == TokenKind::Eof {
                return out;
            }
        }
    }

    #[test]
    fn test_structural_tokens() {
        assert_eq!(
            kinds("{ } [ ] , ="),
            vec![
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Comma,
                TokenKind::Assign,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_atoms() {
        assert_eq!(
            kinds(r#"service "web" 42 -3.14 1e9"#),
            vec![
                TokenKind::Ident,
                TokenKind::Str,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("# one\n// two\n/* three */ a"),
            vec![TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn test_line_numbers() {
        let mut lexer = Lexer::new("a\nb\n\nc");
        assert_eq!(lexer.next_token().line, 1);
        assert_eq!(lexer.next_token().line, 2);
        assert_eq!(lexer.next_token().line, 4);
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("\"abc");
        assert_eq!(lexer.next_token().kind, TokenKind::UnterminatedString);
    }

    #[test]
    fn test_unclosed_comment() {
        let mut lexer = Lexer::new("/* never ends");
        assert_eq!(lexer.next_token().kind, TokenKind::UnclosedComment);
    }

    #[test]
    fn test_malformed_number() {
        let mut lexer = Lexer::new("12abc");
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::InvalidNumber);
        assert_eq!(token.text, "12abc");
    }

    #[test]
    fn test_string_with_escaped_quote() {
        let mut lexer = Lexer::new(r#""a\"b" x"#);
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Str);
        assert_eq!(token.text, r#""a\"b""#);
    }
}
