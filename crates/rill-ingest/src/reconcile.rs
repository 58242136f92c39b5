//! Block decoding: the plugin protocol and the list reconciler.

use rill_parse::{Document, Entry};
use tracing::trace;

use crate::{DecodeError, IngestError, MultiError};

/// Decodes one raw block into a typed object.
///
/// Implemented once per object kind a caller wants to extract from
/// configuration; the reconciler is generic over it.
pub trait ObjectDecoder {
    /// This object's identifier, optionally qualified by ancestor
    /// identifiers for hierarchically named blocks.
    ///
    /// Must be pure: repeated calls return the same value.
    fn id(&self, parents: &[&str]) -> String;

    /// Populate this decoder from one raw entry.
    ///
    /// On failure the partially populated decoder is discarded by the
    /// reconciler.
    fn decode(&mut self, entry: &Entry) -> Result<(), DecodeError>;
}

/// Collects the unique objects of one block type.
pub trait ListDecoder {
    /// The object decoder this list collects.
    type Object: ObjectDecoder;

    /// Create a fresh, zero-valued object decoder.
    fn empty(&self) -> Self::Object;

    /// Accept one unique decoded object.
    ///
    /// Called exactly once per unique identifier, in ascending
    /// identifier order. A failure here is recorded but does not stop
    /// the remaining appends.
    fn append(&mut self, object: Self::Object) -> Result<(), DecodeError>;
}

/// Decode every block matching `key` across `documents` and hand the
/// unique results to `list` in ascending identifier order.
///
/// Blocks that fail to decode contribute nothing further; two objects
/// sharing an identifier produce a duplicate error and a single append
/// (which of the two is unspecified). The returned [`MultiError`]
/// collects every failure; it is empty on full success.
pub fn decode_list<L: ListDecoder>(documents: &[Document], key: &str, list: &mut L) -> MultiError {
    let mut errors = MultiError::new();
    let mut decoded: Vec<L::Object> = Vec::new();

    for document in documents {
        let Some(body) = document.body() else {
            continue;
        };
        for entry in body.filter(key) {
            let mut object = list.empty();
            match object.decode(entry) {
                Ok(()) => decoded.push(object),
                Err(e) => errors.push(IngestError::Decode(e)),
            }
        }
    }
    trace!(count = decoded.len(), key, "decoded blocks");

    // Sorting collapses duplicate detection to an adjacent-pair scan
    // and fixes the append order regardless of input order. Equal ids
    // are duplicates, so sort stability is moot.
    decoded.sort_unstable_by(|a, b| a.id(&[]).cmp(&b.id(&[])));

    let mut last_id: Option<String> = None;
    for object in decoded {
        let id = object.id(&[]);
        if last_id.as_deref() == Some(id.as_str()) {
            errors.push(IngestError::Duplicate {
                key: key.to_string(),
                id,
            });
            continue;
        }
        last_id = Some(id);
        if let Err(e) = list.append(object) {
            errors.push(IngestError::Append(e));
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Named {
        id: String,
    }

    impl ObjectDecoder for Named {
        fn id(&self, parents: &[&str]) -> String {
            if parents.is_empty() {
                self.id.clone()
            } else {
                format!("{}/{}", parents.join("/"), self.id)
            }
        }

        fn decode(&mut self, entry: &Entry) -> Result<(), DecodeError> {
            let body = entry
                .body()
                .ok_or_else(|| DecodeError::new("block needs a body"))?;
            self.id = body
                .get("id")
                .and_then(|v| v.as_str())
                .ok_or_else(|| DecodeError::new("block needs a string id"))?
                .to_string();
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct NamedList {
        ids: Vec<String>,
    }

    impl ListDecoder for NamedList {
        type Object = Named;

        fn empty(&self) -> Named {
            Named::default()
        }

        fn append(&mut self, object: Named) -> Result<(), DecodeError> {
            self.ids.push(object.id);
            Ok(())
        }
    }

    fn documents(sources: &[&str]) -> Vec<Document> {
        let (documents, errors) = crate::parse_sources(sources.iter().map(|s| s.as_bytes()));
        assert!(errors.is_empty());
        documents
    }

    #[test]
    fn test_appends_in_id_order_across_documents() {
        let docs = documents(&[
            "x { id = \"c\" }\nx { id = \"a\" }",
            "x { id = \"b\" }",
        ]);
        let mut list = NamedList::default();
        let errors = decode_list(&docs, "x", &mut list);
        assert!(errors.is_empty());
        assert_eq!(list.ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_other_keys_are_ignored() {
        let docs = documents(&["x { id = \"a\" }\ny { id = \"z\" }"]);
        let mut list = NamedList::default();
        let errors = decode_list(&docs, "x", &mut list);
        assert!(errors.is_empty());
        assert_eq!(list.ids, vec!["a"]);
    }

    #[test]
    fn test_decode_failure_skips_only_that_block() {
        let docs = documents(&["x { id = \"a\" }\nx { }\nx { id = \"b\" }"]);
        let mut list = NamedList::default();
        let errors = decode_list(&docs, "x", &mut list);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors.errors()[0], IngestError::Decode(_)));
        assert_eq!(list.ids, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_id_is_not_a_phantom_duplicate() {
        let docs = documents(&["x { id = \"\" }"]);
        let mut list = NamedList::default();
        let errors = decode_list(&docs, "x", &mut list);
        assert!(errors.is_empty());
        assert_eq!(list.ids, vec![""]);
    }

    #[test]
    fn test_hierarchical_id_uses_parents() {
        let named = Named { id: "leaf".into() };
        assert_eq!(named.id(&["root", "mid"]), "root/mid/leaf");
    }
}
