//! Executor behavior: validation, side-effect discipline, ledger append

use std::path::Path;
use std::sync::Arc;

use cadforge_backend::{
    BackendError, BackendHandle, BackendResult, GeometryBackend, LoadedDocument, SimulatedBackend,
};
use cadforge_core::registry::{BooleanKind, ModifyKind, PrimitiveKind, TransformKind};
use cadforge_core::{CadError, Command};
use cadforge_core_types::{BackendMode, ObjectId, Params};
use cadforge_engine::{EngineConfig, SessionEngine};
use cadforge_store::DocumentSnapshot;

fn sim_engine() -> SessionEngine {
    SessionEngine::new(Arc::new(SimulatedBackend::new()), EngineConfig::default())
}

fn box_command() -> Command {
    Command::new("create_box")
        .with_param("length", 10.0)
        .with_param("width", 5.0)
        .with_param("height", 3.0)
}

#[test]
fn successful_command_appends_one_record() {
    let engine = sim_engine();
    let doc_id = engine.create_document("Part").unwrap();

    let result = engine.execute(&doc_id, box_command()).unwrap();
    assert_eq!(result.seq, 1);
    assert_eq!(result.object_ids, vec![ObjectId::derived("box", 1)]);
    assert_eq!(result.backend, BackendMode::Simulated);
    assert_eq!(result.props.unwrap().volume, 150.0);

    let history = engine.get_history(&doc_id).unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].succeeded());

    let second = engine.execute(&doc_id, box_command()).unwrap();
    assert_eq!(second.seq, 2);
}

#[test]
fn repeated_command_creates_a_new_object_each_time() {
    let engine = sim_engine();
    let doc_id = engine.create_document("Part").unwrap();

    engine.execute(&doc_id, box_command()).unwrap();
    engine.execute(&doc_id, box_command()).unwrap();

    let info = engine.document_info(&doc_id).unwrap();
    assert_eq!(info.object_count, 2);
    assert_eq!(
        info.object_ids,
        vec![ObjectId::derived("box", 1), ObjectId::derived("box", 2)]
    );
}

#[test]
fn invalid_params_leave_state_unchanged_and_list_every_violation() {
    let engine = sim_engine();
    let doc_id = engine.create_document("Part").unwrap();

    let bad = Command::new("create_box")
        .with_param("length", -2.0)
        .with_param("width", 5.0);
    let err = engine.execute(&doc_id, bad).unwrap_err();

    match &err {
        CadError::InvalidParameter { violations, .. } => {
            assert_eq!(violations.len(), 2);
        }
        other => panic!("expected InvalidParameter, got {:?}", other),
    }

    // Audit trail only: no object, one failed record
    let info = engine.document_info(&doc_id).unwrap();
    assert_eq!(info.object_count, 0);
    let history = engine.get_history(&doc_id).unwrap();
    assert_eq!(history.len(), 1);
    assert!(!history[0].succeeded());
}

#[test]
fn unknown_operation_is_recorded_and_returned() {
    let engine = sim_engine();
    let doc_id = engine.create_document("Part").unwrap();

    let err = engine.execute(&doc_id, Command::new("warp_drive")).unwrap_err();
    assert!(matches!(err, CadError::UnknownOperation { .. }));

    let history = engine.get_history(&doc_id).unwrap();
    assert_eq!(history.len(), 1);
    assert!(!history[0].succeeded());
}

#[test]
fn dangling_target_reports_object_not_found() {
    let engine = sim_engine();
    let doc_id = engine.create_document("Part").unwrap();

    let cmd = Command::new("scale")
        .with_param("factor", 2.0)
        .with_target(ObjectId::derived("box", 99));
    let err = engine.execute(&doc_id, cmd).unwrap_err();
    assert!(matches!(err, CadError::ObjectNotFound { .. }));
    assert_eq!(engine.document_info(&doc_id).unwrap().object_count, 0);
}

#[test]
fn missing_document_is_not_recorded_anywhere() {
    let engine = sim_engine();
    let err = engine
        .execute(&cadforge_core_types::DocumentId::new(), box_command())
        .unwrap_err();
    assert!(matches!(err, CadError::DocumentNotFound { .. }));
}

#[test]
fn transform_targets_an_existing_object() {
    let engine = sim_engine();
    let doc_id = engine.create_document("Part").unwrap();
    let created = engine.execute(&doc_id, box_command()).unwrap();
    let box_id = created.object_ids[0].clone();

    let moved = engine
        .execute(
            &doc_id,
            Command::new("translate")
                .with_param("x", 100.0)
                .with_target(box_id.clone()),
        )
        .unwrap();

    let props = moved.props.unwrap();
    assert_eq!(props.volume, 150.0);
    assert_eq!(props.bbox.min[0], 100.0);

    // The original object is untouched; the transform created a new one
    let original = engine.get_object(&doc_id, &box_id).unwrap();
    assert_eq!(original.props.unwrap().bbox.min[0], 0.0);
    assert_eq!(engine.document_info(&doc_id).unwrap().object_count, 2);
}

#[test]
fn boolean_consumes_two_targets() {
    let engine = sim_engine();
    let doc_id = engine.create_document("Part").unwrap();
    let a = engine.execute(&doc_id, box_command()).unwrap().object_ids[0].clone();
    let b = engine
        .execute(
            &doc_id,
            Command::new("create_cylinder")
                .with_param("radius", 5.0)
                .with_param("height", 15.0),
        )
        .unwrap()
        .object_ids[0]
        .clone();

    let cut = engine
        .execute(
            &doc_id,
            Command::new("cut").with_target(b).with_target(a),
        )
        .unwrap();
    assert_eq!(cut.object_ids, vec![ObjectId::derived("cut", 3)]);
    assert!(cut.props.unwrap().volume > 0.0);
}

#[test]
fn reset_clears_history_and_objects_but_keeps_the_document_usable() {
    let engine = sim_engine();
    let doc_id = engine.create_document("Part").unwrap();
    engine.execute(&doc_id, box_command()).unwrap();
    engine.execute(&doc_id, Command::new("bogus")).unwrap_err();

    engine.reset(&doc_id).unwrap();

    assert!(engine.get_history(&doc_id).unwrap().is_empty());
    assert_eq!(engine.document_info(&doc_id).unwrap().object_count, 0);

    // Still valid for further execution, and ids restart
    let again = engine.execute(&doc_id, box_command()).unwrap();
    assert_eq!(again.seq, 1);
    assert_eq!(again.object_ids, vec![ObjectId::derived("box", 1)]);
}

// ===== Backend failure injection =====

/// Backend that fails every geometry call, in the chosen flavor
struct FailingBackend {
    timeout: bool,
}

impl FailingBackend {
    fn error(&self) -> BackendError {
        if self.timeout {
            BackendError::Timeout { timeout_ms: 5000 }
        } else {
            BackendError::Execution {
                message: "shape solver rejected input".into(),
            }
        }
    }
}

impl GeometryBackend for FailingBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Kernel
    }

    fn create_primitive(&self, _: PrimitiveKind, _: &Params) -> BackendResult<BackendHandle> {
        Err(self.error())
    }

    fn apply_transform(
        &self,
        _: TransformKind,
        _: BackendHandle,
        _: &Params,
    ) -> BackendResult<BackendHandle> {
        Err(self.error())
    }

    fn boolean_op(
        &self,
        _: BooleanKind,
        _: BackendHandle,
        _: BackendHandle,
    ) -> BackendResult<BackendHandle> {
        Err(self.error())
    }

    fn apply_modifier(
        &self,
        _: ModifyKind,
        _: BackendHandle,
        _: &Params,
    ) -> BackendResult<BackendHandle> {
        Err(self.error())
    }

    fn describe(&self, handle: BackendHandle) -> BackendResult<cadforge_core_types::DerivedProps> {
        Err(BackendError::UnknownHandle { handle: handle.0 })
    }

    fn save_document(&self, _: &DocumentSnapshot, _: &Path) -> BackendResult<()> {
        Err(self.error())
    }

    fn load_document(&self, _: &Path) -> BackendResult<LoadedDocument> {
        Err(self.error())
    }
}

#[test]
fn backend_failure_leaves_no_partial_object() {
    let engine = SessionEngine::new(
        Arc::new(FailingBackend { timeout: false }),
        EngineConfig::default(),
    );
    let doc_id = engine.create_document("Part").unwrap();

    let err = engine.execute(&doc_id, box_command()).unwrap_err();
    assert!(matches!(err, CadError::BackendExecution { .. }));

    assert_eq!(engine.document_info(&doc_id).unwrap().object_count, 0);
    let history = engine.get_history(&doc_id).unwrap();
    assert_eq!(history.len(), 1);
    assert!(!history[0].succeeded());
    assert_eq!(history[0].backend, BackendMode::Kernel);
}

#[test]
fn backend_timeout_maps_onto_the_taxonomy() {
    let engine = SessionEngine::new(
        Arc::new(FailingBackend { timeout: true }),
        EngineConfig::default(),
    );
    let doc_id = engine.create_document("Part").unwrap();

    let err = engine.execute(&doc_id, box_command()).unwrap_err();
    match err {
        CadError::BackendTimeout { timeout_ms, .. } => assert_eq!(timeout_ms, 5000),
        other => panic!("expected BackendTimeout, got {:?}", other),
    }
}
