//! Agent-facing surface: catalog, context window, wire execution

use std::sync::Arc;

use cadforge_agent_api::AgentInterface;
use cadforge_backend::SimulatedBackend;
use cadforge_core::CadError;
use cadforge_core_types::BackendMode;
use cadforge_engine::{EngineConfig, SessionEngine};

fn agent() -> AgentInterface {
    let engine = Arc::new(SessionEngine::new(
        Arc::new(SimulatedBackend::new()),
        EngineConfig::default(),
    ));
    AgentInterface::new(engine)
}

#[test]
fn catalog_lists_every_builtin_operation() {
    let agent = agent();
    let catalog = agent.available_operations();
    assert_eq!(catalog.len(), 14);

    let create_box = catalog
        .iter()
        .find(|op| op.name == "create_box")
        .expect("create_box in catalog");
    assert_eq!(create_box.target_count, 0);
    let names: Vec<_> = create_box.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["length", "width", "height"]);
    assert!(create_box.parameters.iter().all(|p| p.required));
    assert!(!create_box.example.is_empty());

    let cut = catalog.iter().find(|op| op.name == "cut").unwrap();
    assert_eq!(cut.target_count, 2);
}

#[test]
fn context_info_reports_backend_and_caps_recent_window() {
    let agent = agent();
    let engine = agent.engine();
    let doc_id = engine.create_document("Part").unwrap();

    for _ in 0..7 {
        agent
            .execute_wire(
                &doc_id,
                &serde_json::json!({
                    "action": "create_box",
                    "parameters": {"length": 1.0, "width": 1.0, "height": 1.0},
                }),
            )
            .unwrap();
    }

    let context = agent.context_info();
    assert_eq!(context.backend, BackendMode::Simulated);
    assert_eq!(context.operation_names.len(), 14);

    let doc = context.active_document.expect("active document");
    assert_eq!(doc.object_count, 7);

    // Window of five, and it is the latest five
    assert_eq!(context.recent_operations.len(), 5);
    let seqs: Vec<u64> = context.recent_operations.iter().map(|r| r.seq).collect();
    assert_eq!(seqs, vec![3, 4, 5, 6, 7]);
}

#[test]
fn context_info_without_documents_is_empty_but_valid() {
    let agent = agent();
    let context = agent.context_info();
    assert!(context.active_document.is_none());
    assert!(context.recent_operations.is_empty());
}

#[test]
fn wire_command_with_targets_executes() {
    let agent = agent();
    let engine = agent.engine();
    let doc_id = engine.create_document("Part").unwrap();

    let boxed = agent
        .execute_wire(
            &doc_id,
            &serde_json::json!({
                "action": "create_box",
                "parameters": {"length": 4.0, "width": 4.0, "height": 4.0},
            }),
        )
        .unwrap();

    let rotated = agent
        .execute_wire(
            &doc_id,
            &serde_json::json!({
                "action": "rotate",
                "parameters": {"angle": 90.0, "axis": "X"},
                "targets": [boxed.object_ids[0].as_str()],
            }),
        )
        .unwrap();
    assert_eq!(rotated.seq, 2);
    assert_eq!(rotated.object_ids[0].as_str(), "rotate-2");
}

#[test]
fn failed_wire_command_is_surfaced_with_full_feedback() {
    let agent = agent();
    let engine = agent.engine();
    let doc_id = engine.create_document("Part").unwrap();

    let err = agent
        .execute_wire(
            &doc_id,
            &serde_json::json!({
                "action": "create_cylinder",
                "parameters": {"radius": -1.0},
            }),
        )
        .unwrap_err();

    match err {
        CadError::InvalidParameter { violations, .. } => {
            assert_eq!(violations.len(), 2); // bad radius + missing height
        }
        other => panic!("expected InvalidParameter, got {:?}", other),
    }
}

#[test]
fn active_execution_requires_an_active_document() {
    let agent = agent();
    let err = agent
        .execute_wire_active(&serde_json::json!({"action": "create_sphere"}))
        .unwrap_err();
    assert!(matches!(err, CadError::DocumentNotFound { .. }));
}

#[test]
fn exported_history_parses_back() {
    let agent = agent();
    let engine = agent.engine();
    let doc_id = engine.create_document("Part").unwrap();
    agent
        .execute_wire(
            &doc_id,
            &serde_json::json!({
                "action": "create_sphere",
                "parameters": {"radius": 3.0},
            }),
        )
        .unwrap();

    let jsonl = agent.export_history(&doc_id).unwrap();
    let records = cadforge_store::parse_history(&jsonl).unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].succeeded());
}
