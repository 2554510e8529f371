//! Domain model: documents, objects, and the history ledger

pub mod document;
pub mod history;
pub mod object;

pub use document::Document;
pub use history::{CommandOutcome, HistoryRecord};
pub use object::CadObject;
