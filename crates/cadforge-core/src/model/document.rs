use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::history::HistoryRecord;
use super::object::CadObject;
use crate::errors::{CadError, Result};
use cadforge_core_types::{DocumentId, ObjectId};

/// One CAD modeling session's object collection
///
/// Holds the named objects, their insertion order, and the append-only
/// history ledger. Mutation goes through the executor only; external
/// callers read via the engine API. That single-writer discipline is what
/// keeps history and state consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier within the session
    pub id: DocumentId,

    /// User-visible name, unique within the session
    pub name: String,

    /// When the document was created
    pub created_at: DateTime<Utc>,

    /// Unsaved-changes flag
    pub dirty: bool,

    /// Object id → object
    objects: HashMap<ObjectId, CadObject>,

    /// Insertion order of object ids
    object_order: Vec<ObjectId>,

    /// Per-document counter feeding deterministic object ids
    next_object: u64,

    /// Append-only command ledger
    history: Vec<HistoryRecord>,
}

impl Document {
    /// Create an empty document with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new(),
            name: name.into(),
            created_at: Utc::now(),
            dirty: false,
            objects: HashMap::new(),
            object_order: Vec::new(),
            next_object: 0,
            history: Vec::new(),
        }
    }

    /// Get an object by id
    ///
    /// # Errors
    ///
    /// Returns `ObjectNotFound` if the id does not resolve.
    pub fn get_object(&self, id: &ObjectId) -> Result<&CadObject> {
        self.objects.get(id).ok_or_else(|| CadError::ObjectNotFound {
            doc_id: self.id.to_string(),
            object_id: id.to_string(),
        })
    }

    /// Whether an object id resolves in this document
    pub fn contains_object(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Iterate objects in insertion order
    pub fn objects(&self) -> impl Iterator<Item = &CadObject> {
        self.object_order
            .iter()
            .filter_map(|id| self.objects.get(id))
    }

    /// Number of objects in the document
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Allocate the next deterministic object id for the given label
    ///
    /// Called only after a backend call succeeds, so failed commands never
    /// advance the counter and replays of the successful prefix allocate
    /// identical ids.
    pub fn allocate_object_id(&mut self, label: &str) -> ObjectId {
        self.next_object += 1;
        ObjectId::derived(label, self.next_object)
    }

    /// Register an object (executor only)
    pub fn insert_object(&mut self, object: CadObject) {
        self.object_order.push(object.id.clone());
        self.objects.insert(object.id.clone(), object);
        self.dirty = true;
    }

    /// Re-register an object restored from a snapshot
    ///
    /// Keeps the recorded id, advances the id counter past it, and leaves
    /// the dirty flag untouched: a freshly loaded document is clean.
    pub fn restore_object(&mut self, object: CadObject) {
        if let Some(counter) = object.id.counter_suffix() {
            self.next_object = self.next_object.max(counter);
        }
        self.object_order.push(object.id.clone());
        self.objects.insert(object.id.clone(), object);
    }

    /// Sequence number the next history record must carry
    pub fn next_seq(&self) -> u64 {
        self.history.len() as u64 + 1
    }

    /// Append a history record (executor only)
    ///
    /// The ledger is append-only; records are never updated or deleted.
    pub fn append_record(&mut self, record: HistoryRecord) {
        debug_assert_eq!(record.seq, self.next_seq(), "history sequence gap");
        self.history.push(record);
    }

    /// The full ordered history
    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    /// Clear all objects and history, keeping the document id valid
    pub fn reset(&mut self) {
        self.objects.clear();
        self.object_order.clear();
        self.history.clear();
        self.next_object = 0;
        self.dirty = false;
    }

    /// Mark the document clean after a successful save
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }
}
