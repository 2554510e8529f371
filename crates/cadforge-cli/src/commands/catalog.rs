//! `catalog` subcommand: print the operation catalog

use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use cadforge_agent_api::AgentInterface;
use cadforge_backend::select_backend;
use cadforge_engine::{EngineConfig, SessionEngine};

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Emit the catalog as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: CatalogArgs) -> Result<()> {
    let config = EngineConfig::default();
    let backend = select_backend(None, config.backend_timeout());
    let agent = AgentInterface::new(Arc::new(SessionEngine::new(backend, config)));

    let catalog = agent.available_operations();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    for op in catalog {
        let params: Vec<String> = op
            .parameters
            .iter()
            .map(|p| {
                if p.required {
                    format!("{}: {}", p.name, p.kind)
                } else {
                    format!("[{}: {}]", p.name, p.kind)
                }
            })
            .collect();
        println!("{:<16} {}", op.name, op.description);
        println!(
            "{:<16}   params: {}  targets: {}",
            "",
            if params.is_empty() {
                "none".to_string()
            } else {
                params.join(", ")
            },
            op.target_count
        );
        println!("{:<16}   e.g. \"{}\"", "", op.example);
    }
    Ok(())
}
