//! Ordering guarantees: strict per-document sequencing, cross-document
//! independence

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cadforge_backend::{
    BackendHandle, BackendResult, GeometryBackend, LoadedDocument, SimulatedBackend,
};
use cadforge_core::registry::{BooleanKind, ModifyKind, PrimitiveKind, TransformKind};
use cadforge_core::Command;
use cadforge_core_types::{BackendMode, Params};
use cadforge_engine::{EngineConfig, SessionEngine};
use cadforge_store::DocumentSnapshot;

fn box_command() -> Command {
    Command::new("create_box")
        .with_param("length", 1.0)
        .with_param("width", 1.0)
        .with_param("height", 1.0)
}

/// Simulation backend with an induced scheduling delay on every call
struct SlowBackend {
    inner: SimulatedBackend,
    delay: Duration,
}

impl SlowBackend {
    fn new(delay: Duration) -> Self {
        Self {
            inner: SimulatedBackend::new(),
            delay,
        }
    }
}

impl GeometryBackend for SlowBackend {
    fn mode(&self) -> BackendMode {
        self.inner.mode()
    }

    fn create_primitive(&self, kind: PrimitiveKind, params: &Params) -> BackendResult<BackendHandle> {
        thread::sleep(self.delay);
        self.inner.create_primitive(kind, params)
    }

    fn apply_transform(
        &self,
        kind: TransformKind,
        base: BackendHandle,
        params: &Params,
    ) -> BackendResult<BackendHandle> {
        thread::sleep(self.delay);
        self.inner.apply_transform(kind, base, params)
    }

    fn boolean_op(
        &self,
        kind: BooleanKind,
        a: BackendHandle,
        b: BackendHandle,
    ) -> BackendResult<BackendHandle> {
        thread::sleep(self.delay);
        self.inner.boolean_op(kind, a, b)
    }

    fn apply_modifier(
        &self,
        kind: ModifyKind,
        base: BackendHandle,
        params: &Params,
    ) -> BackendResult<BackendHandle> {
        thread::sleep(self.delay);
        self.inner.apply_modifier(kind, base, params)
    }

    fn describe(&self, handle: BackendHandle) -> BackendResult<cadforge_core_types::DerivedProps> {
        self.inner.describe(handle)
    }

    fn save_document(&self, snapshot: &DocumentSnapshot, path: &std::path::Path) -> BackendResult<()> {
        self.inner.save_document(snapshot, path)
    }

    fn load_document(&self, path: &std::path::Path) -> BackendResult<LoadedDocument> {
        self.inner.load_document(path)
    }
}

#[test]
fn same_document_records_append_in_submission_order() {
    let engine = Arc::new(SessionEngine::new(
        Arc::new(SimulatedBackend::new()),
        EngineConfig::default(),
    ));
    let doc_id = engine.create_document("Part").unwrap();

    for expected_seq in 1..=10 {
        let result = engine.execute(&doc_id, box_command()).unwrap();
        assert_eq!(result.seq, expected_seq);
    }

    let history = engine.get_history(&doc_id).unwrap();
    let seqs: Vec<u64> = history.iter().map(|r| r.seq).collect();
    assert_eq!(seqs, (1..=10).collect::<Vec<u64>>());
}

#[test]
fn concurrent_writers_on_one_document_never_tear_the_sequence() {
    let engine = Arc::new(SessionEngine::new(
        Arc::new(SlowBackend::new(Duration::from_millis(5))),
        EngineConfig::default(),
    ));
    let doc_id = engine.create_document("Part").unwrap();

    let mut workers = Vec::new();
    for _ in 0..8 {
        let engine = Arc::clone(&engine);
        let doc_id = doc_id.clone();
        workers.push(thread::spawn(move || {
            engine.execute(&doc_id, box_command()).unwrap();
        }));
    }
    for worker in workers {
        worker.join().unwrap();
    }

    // Whatever interleaving the scheduler produced, the ledger is gapless
    // and strictly ordered
    let history = engine.get_history(&doc_id).unwrap();
    let seqs: Vec<u64> = history.iter().map(|r| r.seq).collect();
    assert_eq!(seqs, (1..=8).collect::<Vec<u64>>());
    assert_eq!(engine.document_info(&doc_id).unwrap().object_count, 8);
}

#[test]
fn distinct_documents_execute_independently() {
    let engine = Arc::new(SessionEngine::new(
        Arc::new(SlowBackend::new(Duration::from_millis(2))),
        EngineConfig::default(),
    ));
    let doc_a = engine.create_document("A").unwrap();
    let doc_b = engine.create_document("B").unwrap();

    let handles: Vec<_> = [doc_a.clone(), doc_b.clone()]
        .into_iter()
        .map(|doc_id| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..5 {
                    engine.execute(&doc_id, box_command()).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for doc_id in [&doc_a, &doc_b] {
        let seqs: Vec<u64> = engine
            .get_history(doc_id)
            .unwrap()
            .iter()
            .map(|r| r.seq)
            .collect();
        assert_eq!(seqs, (1..=5).collect::<Vec<u64>>());
    }
}
