//! Cadforge Core - domain kernel for agent-driven CAD sessions
//!
//! This crate provides the foundational data structures and contracts for
//! cadforge, including:
//! - Document, CadObject and HistoryRecord models
//! - The structured Command type consumed from the translator
//! - The Operation Registry with parameter schemas and full-violation
//!   validation
//! - The error taxonomy with stable `ERR_*` codes
//! - The logging facility
//!
//! Geometry itself is never computed here: backends live in
//! `cadforge-backend`, orchestration in `cadforge-engine`.

pub mod commands;
pub mod errors;
pub mod logging;
pub mod model;
pub mod registry;

// Re-export commonly used types
pub use commands::Command;
pub use errors::{CadError, Result};
pub use model::{CadObject, CommandOutcome, Document, HistoryRecord};
pub use registry::{OperationKind, OperationRegistry, OperationSpec};
