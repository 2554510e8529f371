//! `run` subcommand: execute a command script against a fresh document
//!
//! The script is JSON Lines in the translator wire format, one command
//! per line:
//!
//! ```text
//! {"action": "create_box", "parameters": {"length": 10, "width": 5, "height": 3}}
//! {"action": "create_cylinder", "parameters": {"radius": 2, "height": 8}}
//! {"action": "cut", "targets": ["cylinder-2", "box-1"]}
//! ```
//!
//! A failed command is reported and the run continues; no single command
//! failure aborts the session.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use cadforge_agent_api::AgentInterface;
use cadforge_backend::select_backend;
use cadforge_core::model::CommandOutcome;
use cadforge_engine::{EngineConfig, SessionEngine};

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Script file in JSON Lines wire format, or `-` for stdin
    pub script: PathBuf,

    /// Name for the session document
    #[arg(long, default_value = "NewDocument")]
    pub doc_name: String,

    /// Engine configuration file (TOML)
    #[arg(long, default_value = "cadforge.toml")]
    pub config: PathBuf,

    /// Save a document snapshot here after the run
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Export the history ledger here (JSON Lines) after the run
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let script = read_script(&args.script)?;
    let config = EngineConfig::load(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;

    let backend = select_backend(None, config.backend_timeout());
    let engine = Arc::new(SessionEngine::new(backend, config));
    let agent = AgentInterface::new(Arc::clone(&engine));

    let doc_id = engine.create_document(&args.doc_name)?;
    println!("document {} ({})", args.doc_name, doc_id);
    println!("backend: {}", engine.backend_mode());

    for (lineno, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("line {}: not valid JSON", lineno + 1))?;
        match agent.execute_wire(&doc_id, &value) {
            Ok(result) => {
                let volume = result
                    .props
                    .map(|p| format!("{:.3}", p.volume))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  #{} ok: {} (volume {})",
                    result.seq,
                    result.object_ids[0],
                    volume
                );
            }
            Err(err) => {
                println!("  failed [{}]: {}", err.code(), err);
            }
        }
    }

    let info = engine.document_info(&doc_id)?;
    let history = engine.get_history(&doc_id)?;
    let failures = history
        .iter()
        .filter(|r| matches!(r.outcome, CommandOutcome::Failure { .. }))
        .count();
    println!(
        "done: {} objects, {} records ({} failed)",
        info.object_count,
        history.len(),
        failures
    );

    if let Some(path) = &args.save {
        engine.save_document(&doc_id, path)?;
        println!("snapshot written to {}", path.display());
    }
    if let Some(path) = &args.export {
        engine.export_history_to(&doc_id, path)?;
        println!("history exported to {}", path.display());
    }
    Ok(())
}

fn read_script(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading script from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading script from {}", path.display()))
    }
}
