//! Top-level key validation.

use std::collections::HashSet;

use rill_parse::Body;

use crate::{IngestError, MultiError};

/// Check that every top-level key of `body` is in the permitted set.
///
/// One failure is recorded per offending entry, carrying the entry's
/// source line. The body is not mutated, and nested bodies are not
/// visited — validate each block against its own permitted set.
pub fn check_keys(body: &Body, valid: &[&str]) -> MultiError {
    let permitted: HashSet<&str> = valid.iter().copied().collect();
    let mut errors = MultiError::new();
    for entry in &body.entries {
        if !permitted.contains(entry.key()) {
            errors.push(IngestError::InvalidKey {
                key: entry.key().to_string(),
                line: entry.line,
            });
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(source: &str) -> Body {
        rill_parse::parse(source).unwrap().body().unwrap().clone()
    }

    #[test]
    fn test_all_keys_permitted() {
        let body = body("a = 1\nb = 2");
        assert!(check_keys(&body, &["a", "b", "c"]).is_empty());
    }

    #[test]
    fn test_reports_each_offender_with_line() {
        let body = body("a = 1\nbad = 2\n\nworse { }");
        let errors = check_keys(&body, &["a"]);
        assert_eq!(errors.len(), 2);
        match &errors.errors()[0] {
            IngestError::InvalidKey { key, line } => {
                assert_eq!(key, "bad");
                assert_eq!(*line, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(
            errors.errors()[1].to_string(),
            "invalid key \"worse\" on line 4"
        );
    }

    #[test]
    fn test_does_not_recurse() {
        let body = body("a { hidden = 1 }");
        assert!(check_keys(&body, &["a"]).is_empty());
    }

    #[test]
    fn test_block_body_is_checked_like_a_root() {
        let doc = rill_parse::parse("a { inner = 1\nbad = 2 }").unwrap();
        let root = doc.body().unwrap();
        let block = root.entries[0].body().unwrap();
        let errors = check_keys(block, &["inner"]);
        assert_eq!(errors.len(), 1);
    }
}
