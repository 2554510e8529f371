//! Session Engine Demonstration
//!
//! This example drives one modeling session end to end.
#![allow(clippy::unwrap_used, clippy::expect_used)]
//!
//! Key concepts illustrated:
//! 1. Backend selection with simulation fallback
//! 2. Structured command execution with validation feedback
//! 3. The append-only history ledger
//! 4. Snapshot save/load round trip
//! 5. History export for dataset generation

use std::sync::Arc;

use cadforge_backend::select_backend;
use cadforge_core::Command;
use cadforge_engine::{EngineConfig, SessionEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Cadforge Session Demo ===\n");

    // No kernel supplied: the session comes up in simulation mode
    let config = EngineConfig::default();
    let backend = select_backend(None, config.backend_timeout());
    let engine = SessionEngine::new(backend, config);
    println!("backend mode: {}\n", engine.backend_mode());

    // ===== Part 1: Building a small part =====
    let doc_id = engine.create_document("Bracket")?;

    let plate = engine.execute(
        &doc_id,
        Command::new("create_box")
            .with_param("length", 40.0)
            .with_param("width", 20.0)
            .with_param("height", 5.0),
    )?;
    println!("✓ plate {} (volume {})", plate.object_ids[0], plate.props.unwrap().volume);

    let hole = engine.execute(
        &doc_id,
        Command::new("create_cylinder")
            .with_param("radius", 3.0)
            .with_param("height", 5.0),
    )?;
    println!("✓ hole  {} (volume {:.1})", hole.object_ids[0], hole.props.unwrap().volume);

    let drilled = engine.execute(
        &doc_id,
        Command::new("cut")
            .with_target(plate.object_ids[0].clone())
            .with_target(hole.object_ids[0].clone()),
    )?;
    println!(
        "✓ drilled {} (volume {:.1})\n",
        drilled.object_ids[0],
        drilled.props.unwrap().volume
    );

    // ===== Part 2: Validation feedback is complete, not first-error =====
    let err = engine
        .execute(
            &doc_id,
            Command::new("create_box").with_param("length", -1.0),
        )
        .unwrap_err();
    println!("rejected as expected [{}]:\n  {}\n", err.code(), err);

    // ===== Part 3: The ledger holds every attempt =====
    let history = engine.get_history(&doc_id)?;
    println!("ledger: {} records", history.len());
    for record in &history {
        println!(
            "  #{} {} → {}",
            record.seq,
            record.command.operation,
            if record.succeeded() { "ok" } else { "failed" }
        );
    }
    println!();

    // ===== Part 4: Snapshot round trip =====
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bracket.json");
    engine.save_document(&doc_id, &path)?;
    let restored = engine.load_document(&path)?;
    let info = engine.document_info(&restored)?;
    println!("restored '{}' with {} objects", info.name, info.object_count);

    // ===== Part 5: Export for the training pipeline =====
    let jsonl = engine.export_history(&doc_id)?;
    println!("export: {} JSONL lines", jsonl.lines().count());

    Ok(())
}
