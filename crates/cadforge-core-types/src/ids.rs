//! Identifier types for documents and modeled objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a document within a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generate a new random DocumentId
    pub fn new() -> Self {
        Self(format!("doc-{}", Uuid::new_v4()))
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a modeled object, unique within its document
///
/// Object ids are derived from the operation kind and a per-document
/// counter (`box-1`, `cylinder-2`, ...) rather than random UUIDs, so that
/// replaying an identical command sequence under the simulation backend
/// allocates identical ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(String);

impl ObjectId {
    /// Build an id from an operation label and a per-document counter
    pub fn derived(label: &str, counter: u64) -> Self {
        Self(format!("{}-{}", label, counter))
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    /// The trailing counter of a derived id, if present
    ///
    /// Used when restoring a snapshot so the document's id counter resumes
    /// past the highest restored object.
    pub fn counter_suffix(&self) -> Option<u64> {
        self.0.rsplit_once('-').and_then(|(_, n)| n.parse().ok())
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
