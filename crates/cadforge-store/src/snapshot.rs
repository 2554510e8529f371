//! Versioned document snapshots
//!
//! A snapshot captures a document's object set (ids, operations,
//! validated parameters, derived properties) but not its history: replay
//! provenance belongs to the session that produced the snapshot. Each
//! snapshot embeds a sha256 digest over its payload; a digest mismatch or
//! an unsupported schema version is rejected on read.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use cadforge_core::errors::{CadError, Result};
use cadforge_core::model::CadObject;
use cadforge_core_types::{DerivedProps, ObjectId, Params};

/// Current snapshot schema version
pub const SNAPSHOT_VERSION: u32 = 1;

/// One object as captured in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotObject {
    /// Object id within the document
    pub id: ObjectId,
    /// Operation that produced the object
    pub operation: String,
    /// Validated parameters (defaults filled in)
    pub params: Params,
    /// Derived properties at capture time, if any
    pub props: Option<DerivedProps>,
}

impl From<&CadObject> for SnapshotObject {
    fn from(obj: &CadObject) -> Self {
        Self {
            id: obj.id.clone(),
            operation: obj.operation.clone(),
            params: obj.params.clone(),
            props: obj.props,
        }
    }
}

/// Serialized capture of a document's object set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Schema version of this snapshot
    pub schema_version: u32,
    /// Document name at capture time
    pub name: String,
    /// Objects in insertion order
    pub objects: Vec<SnapshotObject>,
    /// sha256 over the payload, hex-encoded; empty until sealed
    #[serde(default)]
    pub digest: String,
}

impl DocumentSnapshot {
    /// Capture a snapshot from a name and ordered objects
    pub fn capture<'a>(name: &str, objects: impl Iterator<Item = &'a CadObject>) -> Self {
        let mut snapshot = Self {
            schema_version: SNAPSHOT_VERSION,
            name: name.to_string(),
            objects: objects.map(SnapshotObject::from).collect(),
            digest: String::new(),
        };
        snapshot.digest = snapshot.compute_digest();
        snapshot
    }

    /// sha256 over the canonical JSON of (version, name, objects)
    fn compute_digest(&self) -> String {
        #[derive(Serialize)]
        struct Payload<'a> {
            schema_version: u32,
            name: &'a str,
            objects: &'a [SnapshotObject],
        }
        let payload = serde_json::to_vec(&Payload {
            schema_version: self.schema_version,
            name: &self.name,
            objects: &self.objects,
        })
        .unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&payload);
        hex::encode(hasher.finalize())
    }

    /// Verify the embedded digest and schema version
    ///
    /// # Errors
    ///
    /// Returns `Snapshot` if the version is unsupported or the digest does
    /// not match the payload.
    pub fn verify(&self) -> Result<()> {
        if self.schema_version != SNAPSHOT_VERSION {
            return Err(CadError::Snapshot {
                message: format!(
                    "unsupported snapshot version {} (expected {})",
                    self.schema_version, SNAPSHOT_VERSION
                ),
            });
        }
        let expected = self.compute_digest();
        if self.digest != expected {
            return Err(CadError::Snapshot {
                message: "snapshot digest mismatch".to_string(),
            });
        }
        Ok(())
    }
}

/// Write a snapshot to disk as pretty-printed JSON
///
/// # Errors
///
/// Returns `Io` on filesystem failure or `Serialization` on encoding
/// failure.
pub fn write_snapshot(snapshot: &DocumentSnapshot, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    tracing::debug!(path = %path.display(), objects = snapshot.objects.len(), "snapshot written");
    Ok(())
}

/// Read and verify a snapshot from disk
///
/// # Errors
///
/// Returns `Io` on filesystem failure, `Serialization` on malformed JSON,
/// or `Snapshot` on version/digest mismatch.
pub fn read_snapshot(path: &Path) -> Result<DocumentSnapshot> {
    let json = fs::read_to_string(path)?;
    let snapshot: DocumentSnapshot = serde_json::from_str(&json)?;
    snapshot.verify()?;
    tracing::debug!(path = %path.display(), objects = snapshot.objects.len(), "snapshot read");
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> DocumentSnapshot {
        let obj = CadObject::new(
            ObjectId::derived("box", 1),
            "create_box",
            Params::new(),
            None,
            1,
        );
        DocumentSnapshot::capture("Part", [&obj].into_iter())
    }

    #[test]
    fn test_capture_seals_digest() {
        let snapshot = sample_snapshot();
        assert!(!snapshot.digest.is_empty());
        snapshot.verify().unwrap();
    }

    #[test]
    fn test_tampered_snapshot_fails_verification() {
        let mut snapshot = sample_snapshot();
        snapshot.name = "Renamed".to_string();
        let result = snapshot.verify();
        assert!(matches!(result, Err(CadError::Snapshot { .. })));
    }

    #[test]
    fn test_wrong_version_is_rejected() {
        let mut snapshot = sample_snapshot();
        snapshot.schema_version = 99;
        let result = snapshot.verify();
        assert!(matches!(result, Err(CadError::Snapshot { .. })));
    }
}
