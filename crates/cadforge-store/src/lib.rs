//! Cadforge Store - persistence boundary
//!
//! Two concerns live here:
//! - **Snapshots**: versioned, digest-checked JSON captures of a
//!   document's object set, used as the simulation-mode save/load format.
//! - **Export**: JSON Lines serialization of the history ledger for the
//!   dataset-generation pipeline.
//!
//! The real CAD kernel owns its own file format; this crate only handles
//! the simulation substitute and the training-data export.

pub mod export;
pub mod snapshot;

pub use export::{export_history, parse_history, write_history};
pub use snapshot::{read_snapshot, write_snapshot, DocumentSnapshot, SnapshotObject};
