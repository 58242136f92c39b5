//! The aggregated error value threaded through every pipeline call.

use std::fmt;

use crate::IngestError;

/// An ordered, growable collection of ingestion failures.
///
/// Every recoverable failure in a pipeline call lands here instead of
/// aborting the call. Failures keep their insertion order and are never
/// deduplicated or dropped; emptiness is the "no error" state, and
/// [`MultiError::into_result`] turns it into an ordinary `Result`.
#[derive(Debug, Default)]
pub struct MultiError {
    errors: Vec<IngestError>,
}

impl MultiError {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure.
    pub fn push(&mut self, error: impl Into<IngestError>) {
        self.errors.push(error.into());
    }

    /// Move every failure from `other` onto the end of this collection.
    pub fn merge(&mut self, other: MultiError) {
        self.errors.extend(other.errors);
    }

    /// Whether no failures were recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The recorded failures, in insertion order.
    pub fn errors(&self) -> &[IngestError] {
        &self.errors
    }

    /// Finalize: `Ok(())` when nothing was recorded, the collection
    /// itself otherwise.
    pub fn into_result(self) -> Result<(), MultiError> {
        if self.errors.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Consume the collection, yielding the failures.
    pub fn into_errors(self) -> Vec<IngestError> {
        self.errors
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.len() == 1 {
            write!(f, "1 error occurred:")?;
        } else {
            write!(f, "{} errors occurred:", self.errors.len())?;
        }
        for error in &self.errors {
            write!(f, "\n  * {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for MultiError {}

impl Extend<IngestError> for MultiError {
    fn extend<I: IntoIterator<Item = IngestError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl IntoIterator for MultiError {
    type Item = IngestError;
    type IntoIter = std::vec::IntoIter<IngestError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a MultiError {
    type Item = &'a IngestError;
    type IntoIter = std::slice::Iter<'a, IngestError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
