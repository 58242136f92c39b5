//! Parse errors and diagnostic rendering.

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::Span;

/// Parse error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Unexpected token.
    UnexpectedToken,
    /// Unexpected end of input.
    UnexpectedEof,
    /// Expected an entry key.
    ExpectedKey,
    /// Expected a value.
    ExpectedValue,
    /// A key must be followed by `=` or a `{` body.
    ExpectedAssignOrBlock,
    /// Unclosed block (missing `}`).
    UnclosedBlock,
    /// Unclosed list (missing `]`).
    UnclosedList,
    /// A string literal that never closes.
    UnterminatedString,
    /// A `/* ... */` comment that never closes.
    UnclosedComment,
    /// Invalid escape sequence in a quoted string.
    InvalidEscape(String),
    /// Malformed number.
    InvalidNumber,
    /// Content after a bare root value.
    TrailingContent,
}

/// A parse error with source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Source location.
    pub span: Span,
    /// 1-based line of the error.
    pub line: u32,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span, line: u32) -> Self {
        Self { kind, span, line }
    }

    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with
    /// source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let report = self.build_report(filename);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        let range = self.span.start as usize..self.span.end as usize;

        match &self.kind {
            ParseErrorKind::UnexpectedToken => {
                Report::build(ReportKind::Error, (filename, range.clone())).with_message("unexpected token").with_label(
                    Label::new((filename, range))
                        .with_message("unexpected")
                        .with_color(Color::Red),
                )
            }

            ParseErrorKind::UnexpectedEof => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message("unexpected end of input")
                    .with_label(
                        Label::new((filename, range))
                            .with_message("input ends here")
                            .with_color(Color::Red),
                    )
            }

            ParseErrorKind::ExpectedKey => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("expected key")
                .with_label(
                    Label::new((filename, range))
                        .with_message("expected a key here")
                        .with_color(Color::Red),
                )
                .with_help("entries start with a bare or quoted key"),

            ParseErrorKind::ExpectedValue => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("expected value")
                .with_label(
                    Label::new((filename, range))
                        .with_message("expected a value here")
                        .with_color(Color::Red),
                )
                .with_help("values are strings, numbers, true/false, lists, or { ... } bodies"),

            ParseErrorKind::ExpectedAssignOrBlock => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message("expected '=' or '{' after key")
                    .with_label(
                        Label::new((filename, range))
                            .with_message("expected '=' or '{' here")
                            .with_color(Color::Red),
                    )
            }

            ParseErrorKind::UnclosedBlock => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("unclosed block")
                .with_label(
                    Label::new((filename, range))
                        .with_message("block opened here")
                        .with_color(Color::Red),
                )
                .with_help("add a closing '}'"),

            ParseErrorKind::UnclosedList => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("unclosed list")
                .with_label(
                    Label::new((filename, range))
                        .with_message("list opened here")
                        .with_color(Color::Red),
                )
                .with_help("add a closing ']'"),

            ParseErrorKind::UnterminatedString => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message("unterminated string")
                    .with_label(
                        Label::new((filename, range))
                            .with_message("string opened here")
                            .with_color(Color::Red),
                    )
                    .with_help("strings must close on the same line")
            }

            ParseErrorKind::UnclosedComment => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message("unclosed comment")
                    .with_label(
                        Label::new((filename, range))
                            .with_message("comment opened here")
                            .with_color(Color::Red),
                    )
                    .with_help("add a closing '*/'")
            }

            ParseErrorKind::InvalidEscape(seq) => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message(format!("invalid escape sequence '{}'", seq))
                    .with_label(
                        Label::new((filename, range))
                            .with_message("invalid escape")
                            .with_color(Color::Red),
                    )
                    .with_help("valid escapes are: \\\\, \\\", \\n, \\r, \\t, \\uXXXX")
            }

            ParseErrorKind::InvalidNumber => Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("malformed number")
                .with_label(
                    Label::new((filename, range))
                        .with_message("not a valid number")
                        .with_color(Color::Red),
                ),

            ParseErrorKind::TrailingContent => {
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message("trailing content after root value")
                    .with_label(
                        Label::new((filename, range))
                            .with_message("unexpected content here")
                            .with_color(Color::Red),
                    )
                    .with_help("a bare root value is the entire document; nothing can follow it")
            }
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ParseErrorKind::UnexpectedToken => write!(f, "unexpected token"),
            ParseErrorKind::UnexpectedEof => write!(f, "unexpected end of input"),
            ParseErrorKind::ExpectedKey => write!(f, "expected key"),
            ParseErrorKind::ExpectedValue => write!(f, "expected value"),
            ParseErrorKind::ExpectedAssignOrBlock => {
                write!(f, "expected '=' or '{{' after key")
            }
            ParseErrorKind::UnclosedBlock => write!(f, "unclosed block"),
            ParseErrorKind::UnclosedList => write!(f, "unclosed list"),
            ParseErrorKind::UnterminatedString => write!(f, "unterminated string"),
            ParseErrorKind::UnclosedComment => write!(f, "unclosed comment"),
            ParseErrorKind::InvalidEscape(seq) => {
                write!(f, "invalid escape sequence '{}'", seq)
            }
            ParseErrorKind::InvalidNumber => write!(f, "malformed number"),
            ParseErrorKind::TrailingContent => write!(f, "trailing content after root value"),
        }?;
        write!(f, " at line {}", self.line)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_render_names_the_line() {
        let source = "a = 1\nb = ]";
        let error = parse(source).unwrap_err();
        assert_eq!(error.line, 2);
        assert_eq!(format!("{}", error), "expected value at line 2");
    }

    #[test]
    fn test_render_includes_source_context() {
        let source = "tls {\n  cert = \"x\"";
        let error = parse(source).unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::UnclosedBlock);
        let rendered = error.render("site.rill", source);
        assert!(rendered.contains("unclosed block"));
        assert!(rendered.contains("site.rill"));
    }
}
