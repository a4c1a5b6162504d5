//! Store-assigned identity for persisted records.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the store when a record is inserted.
pub type RecordId = u64;

/// A record together with its store-assigned id.
///
/// Serializes flat, so a stored shift reads as the shift's fields plus `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stored<T> {
    /// The store-assigned id.
    pub id: RecordId,
    /// The record itself.
    #[serde(flatten)]
    pub record: T,
}

impl<T> Stored<T> {
    /// Wraps a record with its id.
    pub fn new(id: RecordId, record: T) -> Self {
        Self { id, record }
    }
}

impl<T> std::ops::Deref for Stored<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}
