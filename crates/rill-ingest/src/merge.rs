//! Reading and merging configuration sources.

use std::io::Read;

use rill_parse::Document;
use tracing::trace;

use crate::{IngestError, MultiError};

/// Parse each source into its own document.
///
/// Sources that cannot be read, do not parse, or do not have a
/// block-list root are recorded in the returned [`MultiError`] and
/// skipped. Partial success is expected: callers may receive both
/// documents and a non-empty error collection.
pub fn parse_sources<R: Read>(sources: impl IntoIterator<Item = R>) -> (Vec<Document>, MultiError) {
    let mut errors = MultiError::new();
    let mut documents = Vec::new();
    for source in sources {
        let Some(text) = buffer_source(source, &mut errors) else {
            continue;
        };
        let Some(document) = parse_block_list(&text, &mut errors) else {
            continue;
        };
        documents.push(document);
    }
    (documents, errors)
}

/// Concatenate every readable, block-list-shaped source and parse the
/// concatenation as one document.
///
/// Per-source failures are recorded and the source excluded from the
/// merge. A failure at the final reparse stage is fatal for the whole
/// call: no document is returned, and the failure joins the collection.
pub fn parse_merged<R: Read>(sources: impl IntoIterator<Item = R>) -> (Option<Document>, MultiError) {
    let mut errors = MultiError::new();
    let mut merged = String::new();
    for source in sources {
        let Some(text) = buffer_source(source, &mut errors) else {
            continue;
        };
        if parse_block_list(&text, &mut errors).is_none() {
            continue;
        }
        merged.push_str(&text);
        merged.push('\n');
    }

    trace!(bytes = merged.len(), "reparsing merged sources");
    let document = parse_block_list(&merged, &mut errors);
    (document, errors)
}

/// Buffer one source fully, recording a read failure.
fn buffer_source<R: Read>(mut source: R, errors: &mut MultiError) -> Option<String> {
    let mut text = String::new();
    match source.read_to_string(&mut text) {
        Ok(_) => Some(text),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

/// Parse one source, requiring a block-list root.
fn parse_block_list(text: &str, errors: &mut MultiError) -> Option<Document> {
    match rill_parse::parse(text) {
        Ok(document) if document.body().is_some() => Some(document),
        Ok(_) => {
            errors.push(IngestError::RootNotObject);
            None
        }
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// A reader that always fails.
    struct BrokenPipe;

    impl Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn test_parse_sources_one_document_each() {
        let (documents, errors) = parse_sources(["a = 1".as_bytes(), "b = 2".as_bytes()]);
        assert!(errors.is_empty());
        assert_eq!(documents.len(), 2);
        assert!(documents[0].body().unwrap().get("a").is_some());
        assert!(documents[1].body().unwrap().get("b").is_some());
    }

    #[test]
    fn test_parse_sources_skips_failing_source() {
        let (documents, errors) = parse_sources(["a = ".as_bytes(), "b = 2".as_bytes()]);
        assert_eq!(documents.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors.errors()[0], IngestError::Parse(_)));
    }

    #[test]
    fn test_parse_sources_rejects_bare_root() {
        let (documents, errors) = parse_sources(["[1, 2]".as_bytes(), "b = 2".as_bytes()]);
        assert_eq!(documents.len(), 1);
        assert!(matches!(errors.errors()[0], IngestError::RootNotObject));
    }

    #[test]
    fn test_read_failure_does_not_abort_others() {
        let mut sources: Vec<Box<dyn Read>> = Vec::new();
        sources.push(Box::new(BrokenPipe));
        sources.push(Box::new("b = 2".as_bytes()));
        let (documents, errors) = parse_sources(sources);
        assert_eq!(documents.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors.errors()[0], IngestError::Read(_)));
    }

    #[test]
    fn test_parse_merged_combines_sources() {
        let (document, errors) =
            parse_merged(["x { id = \"a\" }".as_bytes(), "x { id = \"b\" }".as_bytes()]);
        assert!(errors.is_empty());
        let document = document.unwrap();
        assert_eq!(document.body().unwrap().filter("x").count(), 2);
    }

    #[test]
    fn test_parse_merged_excludes_failing_source() {
        let (document, errors) = parse_merged([
            "x { id = \"a\" }".as_bytes(),
            "x {".as_bytes(),
            "x { id = \"c\" }".as_bytes(),
        ]);
        assert_eq!(errors.len(), 1);
        let document = document.unwrap();
        assert_eq!(document.body().unwrap().filter("x").count(), 2);
    }

    #[test]
    fn test_parse_merged_all_sources_bad() {
        let (document, errors) = parse_merged(["a = ".as_bytes(), "42".as_bytes()]);
        // nothing survived to merge; the merged document is empty
        assert_eq!(errors.len(), 2);
        assert!(document.unwrap().body().unwrap().is_empty());
    }

    #[test]
    fn test_final_reparse_failure_yields_no_document() {
        // drive the final-stage helper directly: pre-validation of each
        // source keeps this unreachable through parse_merged itself
        let mut errors = MultiError::new();
        assert!(parse_block_list("a = ", &mut errors).is_none());
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors.errors()[0], IngestError::Parse(_)));
    }

    #[test]
    fn test_parse_merged_empty_input() {
        let sources: Vec<&[u8]> = Vec::new();
        let (document, errors) = parse_merged(sources);
        assert!(errors.is_empty());
        assert!(document.unwrap().body().unwrap().is_empty());
    }
}
