//! Cadforge Engine - session orchestration
//!
//! The [`SessionEngine`] owns the live documents of one modeling session
//! and is the only writer of document state and history (the
//! single-writer invariant). It coordinates the operation registry, the
//! selected geometry backend, and the store:
//!
//! - `create_document` / `load_document` / `save_document` / `reset`
//! - `execute`: the command execution path (see [`executor`])
//! - `get_history` / `export_history` for auditing and dataset generation
//!
//! Calls against the same document are serialized through a per-document
//! mutex; distinct documents proceed concurrently.

pub mod config;
pub mod executor;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use cadforge_backend::{BackendError, BackendHandle, GeometryBackend};
use cadforge_core::errors::{CadError, Result};
use cadforge_core::model::{CadObject, Document, HistoryRecord};
use cadforge_core::registry::OperationRegistry;
use cadforge_core_types::{BackendMode, DocumentId, ObjectId};
use cadforge_store::DocumentSnapshot;

pub use config::EngineConfig;
pub use executor::ExecutionResult;

/// One document plus the backend handles of its objects
pub(crate) struct DocEntry {
    pub(crate) doc: Document,
    pub(crate) handles: HashMap<ObjectId, BackendHandle>,
}

/// Read-only summary of a document, for agents and the CLI
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    pub id: DocumentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub dirty: bool,
    pub object_count: usize,
    pub object_ids: Vec<ObjectId>,
}

/// The session orchestrator
///
/// Holds the registry (process-wide, immutable), the backend selected at
/// session start, and the document table. All mutation of documents and
/// history goes through this type.
pub struct SessionEngine {
    registry: Arc<OperationRegistry>,
    backend: Arc<dyn GeometryBackend>,
    config: EngineConfig,
    documents: RwLock<HashMap<DocumentId, Arc<Mutex<DocEntry>>>>,
    names: RwLock<HashMap<String, DocumentId>>,
    active: RwLock<Option<DocumentId>>,
}

impl SessionEngine {
    /// Create an engine with the built-in registry
    pub fn new(backend: Arc<dyn GeometryBackend>, config: EngineConfig) -> Self {
        Self::with_registry(Arc::new(OperationRegistry::builtin()), backend, config)
    }

    /// Create an engine with a custom registry
    pub fn with_registry(
        registry: Arc<OperationRegistry>,
        backend: Arc<dyn GeometryBackend>,
        config: EngineConfig,
    ) -> Self {
        Self {
            registry,
            backend,
            config,
            documents: RwLock::new(HashMap::new()),
            names: RwLock::new(HashMap::new()),
            active: RwLock::new(None),
        }
    }

    /// The operation registry backing this session
    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Which backend mode this session runs in
    pub fn backend_mode(&self) -> BackendMode {
        self.backend.mode()
    }

    /// The currently active document, if any
    pub fn active_document(&self) -> Option<DocumentId> {
        self.active.read().clone()
    }

    /// Create a new empty document and make it active
    ///
    /// # Errors
    ///
    /// Returns `DuplicateDocument` if the name is already in use within
    /// this session.
    pub fn create_document(&self, name: &str) -> Result<DocumentId> {
        let mut names = self.names.write();
        if names.contains_key(name) {
            return Err(CadError::DuplicateDocument {
                name: name.to_string(),
            });
        }
        let doc = Document::new(name);
        let doc_id = doc.id.clone();
        names.insert(name.to_string(), doc_id.clone());
        drop(names);

        self.documents.write().insert(
            doc_id.clone(),
            Arc::new(Mutex::new(DocEntry {
                doc,
                handles: HashMap::new(),
            })),
        );
        *self.active.write() = Some(doc_id.clone());
        tracing::info!(doc_id = %doc_id, name, "document created");
        Ok(doc_id)
    }

    /// Look up a document entry
    pub(crate) fn entry(&self, doc_id: &DocumentId) -> Result<Arc<Mutex<DocEntry>>> {
        self.documents
            .read()
            .get(doc_id)
            .cloned()
            .ok_or_else(|| CadError::DocumentNotFound {
                doc_id: doc_id.to_string(),
            })
    }

    /// Read-only summary of a document
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` if the id does not resolve.
    pub fn document_info(&self, doc_id: &DocumentId) -> Result<DocumentInfo> {
        let entry = self.entry(doc_id)?;
        let entry = entry.lock();
        Ok(DocumentInfo {
            id: entry.doc.id.clone(),
            name: entry.doc.name.clone(),
            created_at: entry.doc.created_at,
            dirty: entry.doc.dirty,
            object_count: entry.doc.object_count(),
            object_ids: entry.doc.objects().map(|o| o.id.clone()).collect(),
        })
    }

    /// Get a copy of one object
    ///
    /// # Errors
    ///
    /// `DocumentNotFound` or `ObjectNotFound`.
    pub fn get_object(&self, doc_id: &DocumentId, object_id: &ObjectId) -> Result<CadObject> {
        let entry = self.entry(doc_id)?;
        let entry = entry.lock();
        entry.doc.get_object(object_id).cloned()
    }

    /// The full ordered history of a document
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` if the id does not resolve.
    pub fn get_history(&self, doc_id: &DocumentId) -> Result<Vec<HistoryRecord>> {
        let entry = self.entry(doc_id)?;
        let entry = entry.lock();
        Ok(entry.doc.history().to_vec())
    }

    /// Serialize a document's history as JSON Lines for the dataset
    /// pipeline
    ///
    /// # Errors
    ///
    /// `DocumentNotFound` or `Serialization`.
    pub fn export_history(&self, doc_id: &DocumentId) -> Result<String> {
        let records = self.get_history(doc_id)?;
        cadforge_store::export_history(&records)
    }

    /// Write a document's history export to a file
    ///
    /// # Errors
    ///
    /// `DocumentNotFound`, `Serialization`, or `Io`.
    pub fn export_history_to(&self, doc_id: &DocumentId, path: &Path) -> Result<()> {
        let records = self.get_history(doc_id)?;
        cadforge_store::write_history(&records, path)
    }

    /// Clear a document's objects and history; the id stays valid
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` if the id does not resolve.
    pub fn reset(&self, doc_id: &DocumentId) -> Result<()> {
        let entry = self.entry(doc_id)?;
        let mut entry = entry.lock();
        entry.doc.reset();
        entry.handles.clear();
        tracing::info!(doc_id = %doc_id, "document reset");
        Ok(())
    }

    /// Persist a document through the session backend
    ///
    /// # Errors
    ///
    /// `DocumentNotFound`, or a backend error mapped onto
    /// `BackendExecution`/`BackendTimeout`.
    pub fn save_document(&self, doc_id: &DocumentId, path: &Path) -> Result<()> {
        let entry = self.entry(doc_id)?;
        let mut entry = entry.lock();
        let snapshot = DocumentSnapshot::capture(&entry.doc.name, entry.doc.objects());
        self.backend
            .save_document(&snapshot, path)
            .map_err(|e| map_backend_error("save_document", self.config.backend_timeout_ms, e))?;
        entry.doc.mark_saved();
        tracing::info!(doc_id = %doc_id, path = %path.display(), "document saved");
        Ok(())
    }

    /// Restore a document from disk and make it active
    ///
    /// The restored document starts with an empty history: a snapshot
    /// captures the object set, not the command sequence that produced
    /// it. If the snapshot's name is already in use in this session, a
    /// numeric suffix is appended deterministically.
    ///
    /// # Errors
    ///
    /// Backend errors are mapped onto `BackendExecution`/`BackendTimeout`;
    /// malformed snapshots surface as `Snapshot` from the store.
    pub fn load_document(&self, path: &Path) -> Result<DocumentId> {
        let loaded = self
            .backend
            .load_document(path)
            .map_err(|e| map_backend_error("load_document", self.config.backend_timeout_ms, e))?;

        let mut names = self.names.write();
        let name = unique_name(&names, &loaded.snapshot.name);
        let mut doc = Document::new(&name);
        let mut handles = HashMap::new();
        for (obj, handle) in loaded.snapshot.objects.iter().zip(&loaded.handles) {
            doc.restore_object(CadObject::new(
                obj.id.clone(),
                obj.operation.clone(),
                obj.params.clone(),
                obj.props,
                0,
            ));
            handles.insert(obj.id.clone(), *handle);
        }

        let doc_id = doc.id.clone();
        names.insert(name, doc_id.clone());
        drop(names);

        self.documents
            .write()
            .insert(doc_id.clone(), Arc::new(Mutex::new(DocEntry { doc, handles })));
        *self.active.write() = Some(doc_id.clone());
        tracing::info!(doc_id = %doc_id, path = %path.display(), "document loaded");
        Ok(doc_id)
    }
}

/// First free name: the snapshot name itself, then `name-2`, `name-3`, ...
fn unique_name(names: &HashMap<String, DocumentId>, wanted: &str) -> String {
    if !names.contains_key(wanted) {
        return wanted.to_string();
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{}-{}", wanted, n);
        if !names.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Map an adapter-boundary error onto the core taxonomy
pub(crate) fn map_backend_error(operation: &str, timeout_ms: u64, err: BackendError) -> CadError {
    match err {
        BackendError::Timeout { .. } => CadError::BackendTimeout {
            operation: operation.to_string(),
            timeout_ms,
        },
        other => CadError::BackendExecution {
            operation: operation.to_string(),
            message: other.to_string(),
        },
    }
}
