//! Syntax tree for Rill documents.
//!
//! A document is a flat list of entries (the block list). Each entry is
//! one or more keys followed by either an assigned value (`listen =
//! "..."`) or a braced body (`tls { ... }`). The first key names the
//! entry's block type; any further keys are labels.

use crate::{ParseError, Parser, Span};

/// A parsed Rill source.
///
/// The root is normally a block list ([`Value::Object`]); sources whose
/// root is a bare value (a number or a list) parse successfully but
/// [`Document::body`] returns `None`, which callers treat as a shape
/// error.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The root value.
    pub root: Value,
}

impl Document {
    /// Parse a Rill document.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        Parser::new(source).parse_document()
    }

    /// The root block list, if the root is block-list-shaped.
    pub fn body(&self) -> Option<&Body> {
        self.root.as_object()
    }
}

/// An ordered list of entries: the document root or a block's body.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Entries in source order.
    pub entries: Vec<Entry>,
    /// Source span.
    pub span: Span,
}

impl Body {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries whose block-type key equals `key`, in source order.
    pub fn filter<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Entry> + 'a {
        self.entries.iter().filter(move |entry| entry.key() == key)
    }

    /// The value of the first entry whose block-type key equals `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|entry| entry.key() == key)
            .map(|entry| &entry.value)
    }
}

/// A single entry: keys plus an assigned value or a body.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// The keys; the parser guarantees at least one.
    pub keys: Vec<Key>,
    /// The assigned value, or the body as [`Value::Object`].
    pub value: Value,
    /// 1-based line the entry starts on.
    pub line: u32,
    /// Source span of the whole entry.
    pub span: Span,
}

impl Entry {
    /// The block-type key (the first key).
    pub fn key(&self) -> &str {
        &self.keys[0].text
    }

    /// The labels (every key after the first).
    pub fn labels(&self) -> &[Key] {
        &self.keys[1..]
    }

    /// The entry's body, if its value is a block body.
    pub fn body(&self) -> Option<&Body> {
        self.value.as_object()
    }
}

/// A key in an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    /// The key text, after escape processing for quoted keys.
    pub text: String,
    /// Whether the key was written as a quoted string.
    pub quoted: bool,
    /// Source span.
    pub span: Span,
}

/// A Rill value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string, number, or boolean.
    Scalar(Scalar),
    /// A bracketed list `[v, v, ...]`.
    List(List),
    /// A braced body `{ ... }`.
    Object(Body),
}

impl Value {
    /// Source span.
    pub fn span(&self) -> Span {
        match self {
            Value::Scalar(scalar) => scalar.span,
            Value::List(list) => list.span,
            Value::Object(body) => body.span,
        }
    }

    /// Get as scalar.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Get as string (for string scalars).
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    /// Get as boolean (for `true`/`false` scalars).
    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar().and_then(Scalar::as_bool)
    }

    /// Get as integer (for number scalars).
    pub fn as_i64(&self) -> Option<i64> {
        self.as_scalar().and_then(Scalar::as_i64)
    }

    /// Get as float (for number scalars).
    pub fn as_f64(&self) -> Option<f64> {
        self.as_scalar().and_then(Scalar::as_f64)
    }

    /// Get as list.
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Get as block body.
    pub fn as_object(&self) -> Option<&Body> {
        match self {
            Value::Object(body) => Some(body),
            _ => None,
        }
    }
}

/// What kind of scalar a [`Scalar`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Quoted string.
    Str,
    /// Number; the text keeps the source digits untouched.
    Number,
    /// `true` or `false`.
    Bool,
}

/// A scalar value.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    /// The text content, after escape processing for strings.
    pub text: String,
    /// What kind of scalar this is.
    pub kind: ScalarKind,
    /// Source span.
    pub span: Span,
}

impl Scalar {
    /// The string content, for string scalars.
    pub fn as_str(&self) -> Option<&str> {
        match self.kind {
            ScalarKind::Str => Some(&self.text),
            _ => None,
        }
    }

    /// The boolean value, for boolean scalars.
    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            ScalarKind::Bool => Some(self.text == "true"),
            _ => None,
        }
    }

    /// The integer value, for number scalars that are integers.
    pub fn as_i64(&self) -> Option<i64> {
        match self.kind {
            ScalarKind::Number => self.text.parse().ok(),
            _ => None,
        }
    }

    /// The float value, for number scalars.
    pub fn as_f64(&self) -> Option<f64> {
        match self.kind {
            ScalarKind::Number => self.text.parse().ok(),
            _ => None,
        }
    }
}

/// A list of values.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    /// Items in the list.
    pub items: Vec<Value>,
    /// Source span.
    pub span: Span,
}

impl List {
    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the items.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }
}
