//! # Snapshots
//!
//! Every read, write and change notification hands back a [`Snapshot`]: the
//! document as the store holds it (or `None` when absent) tagged with the
//! document's revision and the time of its last write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A versioned view of one document key.
///
/// `revision` grows by one on every successful write to the key, deletes
/// included, and never goes back, even after the document is deleted and
/// re-created. A reader holding revision `r` can discard any snapshot with a
/// lower revision as stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub revision: u64,
    pub updated_at: Option<DateTime<Utc>>,
    pub document: Option<T>,
}

impl<T> Snapshot<T> {
    /// Snapshot of a key that has never been written.
    pub fn missing() -> Self {
        Self {
            revision: 0,
            updated_at: None,
            document: None,
        }
    }

    pub fn exists(&self) -> bool {
        self.document.is_some()
    }

    /// True when `self` is at least as recent as a local view at `revision`.
    pub fn is_newer_or_equal(&self, revision: u64) -> bool {
        self.revision >= revision
    }

    pub fn into_document(self) -> Option<T> {
        self.document
    }
}
