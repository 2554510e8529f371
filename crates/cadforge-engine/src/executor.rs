//! Command execution path
//!
//! `execute` is all-or-nothing: either the command passes validation,
//! target resolution, and the backend call, in which case the resulting
//! object is registered and a success record appended, or it fails at
//! some step, in which case the only side effect is a failed history
//! record. A failed command never leaves a partial object behind.

use cadforge_backend::BackendHandle;
use cadforge_core::errors::{CadError, Result};
use cadforge_core::model::{CadObject, HistoryRecord};
use cadforge_core::registry::OperationKind;
use cadforge_core::Command;
use cadforge_core_types::{BackendMode, DerivedProps, DocumentId, ObjectId};
use serde::Serialize;

use crate::{map_backend_error, DocEntry, SessionEngine};

/// Outcome of a successful `execute` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    /// Sequence number of the appended history record
    pub seq: u64,
    /// Identifiers of the resulting object(s)
    pub object_ids: Vec<ObjectId>,
    /// Derived properties of the resulting object
    pub props: Option<DerivedProps>,
    /// Backend mode that executed the command
    pub backend: BackendMode,
}

impl SessionEngine {
    /// Execute a structured command against a document
    ///
    /// Serialized per document: the entry mutex is held across
    /// validation, backend call, state mutation, and ledger append, so
    /// sequence numbers exactly mirror submission order. Commands for
    /// different documents run concurrently.
    ///
    /// # Errors
    ///
    /// `DocumentNotFound` if the document id does not resolve (nothing is
    /// recorded, since there is no ledger to write to). Every other failure
    /// appends a failed history record and is then returned:
    /// `UnknownOperation`, `InvalidParameter` (with the full violation
    /// list), `ObjectNotFound` for dangling targets, and
    /// `BackendExecution`/`BackendTimeout` from the backend boundary.
    pub fn execute(&self, doc_id: &DocumentId, command: Command) -> Result<ExecutionResult> {
        let entry = self.entry(doc_id)?;
        let mut entry = entry.lock();

        let _span =
            tracing::debug_span!("execute", doc_id = %doc_id, op = %command.operation).entered();

        // Validation failures must be side-effect-free apart from the
        // audit trail: nothing below touches state until the backend call
        // has succeeded.
        let kind = match self.registry().get(&command.operation) {
            Ok(spec) => spec.kind,
            Err(err) => return self.fail(&mut entry, command, err),
        };
        let resolved = match self.registry().validate_command(&command) {
            Ok(params) => params,
            Err(err) => return self.fail(&mut entry, command, err),
        };

        let mut target_handles = Vec::with_capacity(command.targets.len());
        for target in &command.targets {
            if !entry.doc.contains_object(target) {
                let err = CadError::ObjectNotFound {
                    doc_id: doc_id.to_string(),
                    object_id: target.to_string(),
                };
                return self.fail(&mut entry, command, err);
            }
            match entry.handles.get(target) {
                Some(handle) => target_handles.push(*handle),
                None => {
                    let err = CadError::BackendExecution {
                        operation: command.operation.clone(),
                        message: format!("no backend shape registered for object {}", target),
                    };
                    return self.fail(&mut entry, command, err);
                }
            }
        }

        let handle = match self.invoke_backend(kind, &target_handles, &resolved) {
            Ok(handle) => handle,
            Err(err) => {
                let err =
                    map_backend_error(&command.operation, self.config().backend_timeout_ms, err);
                return self.fail(&mut entry, command, err);
            }
        };
        let props = match self.describe(handle) {
            Ok(props) => props,
            Err(err) => {
                let err =
                    map_backend_error(&command.operation, self.config().backend_timeout_ms, err);
                return self.fail(&mut entry, command, err);
            }
        };

        // Point of no return: register the object, then the record.
        let seq = entry.doc.next_seq();
        let object_id = entry.doc.allocate_object_id(kind.label());
        entry.doc.insert_object(CadObject::new(
            object_id.clone(),
            command.operation.clone(),
            resolved,
            Some(props),
            seq,
        ));
        entry.handles.insert(object_id.clone(), handle);
        entry.doc.append_record(HistoryRecord::success(
            seq,
            command,
            vec![object_id.clone()],
            Some(props),
            self.backend_mode(),
        ));

        tracing::info!(doc_id = %doc_id, object_id = %object_id, seq, "command executed");
        Ok(ExecutionResult {
            seq,
            object_ids: vec![object_id],
            props: Some(props),
            backend: self.backend_mode(),
        })
    }

    /// Dispatch the validated command onto the backend capability
    fn invoke_backend(
        &self,
        kind: OperationKind,
        targets: &[BackendHandle],
        params: &cadforge_core_types::Params,
    ) -> std::result::Result<BackendHandle, cadforge_backend::BackendError> {
        match kind {
            OperationKind::Primitive(k) => self.backend.create_primitive(k, params),
            OperationKind::Transform(k) => self.backend.apply_transform(k, targets[0], params),
            OperationKind::Boolean(k) => self.backend.boolean_op(k, targets[0], targets[1]),
            OperationKind::Modify(k) => self.backend.apply_modifier(k, targets[0], params),
        }
    }

    fn describe(
        &self,
        handle: BackendHandle,
    ) -> std::result::Result<DerivedProps, cadforge_backend::BackendError> {
        self.backend.describe(handle)
    }

    /// Append a failed record and surface the error
    fn fail(
        &self,
        entry: &mut DocEntry,
        command: Command,
        err: CadError,
    ) -> Result<ExecutionResult> {
        let seq = entry.doc.next_seq();
        entry
            .doc
            .append_record(HistoryRecord::failure(seq, command, &err, self.backend_mode()));
        tracing::warn!(code = err.code(), seq, "command failed");
        Err(err)
    }
}
