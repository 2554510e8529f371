//! Canonical schema constants for history export and structured logging
//!
//! These constants keep the exported JSONL field names and the wire format
//! accepted from the natural-language translator consistent.

// History export field keys
pub const FIELD_SEQ: &str = "seq";
pub const FIELD_COMMAND: &str = "command";
pub const FIELD_OUTCOME: &str = "outcome";
pub const FIELD_BACKEND: &str = "backend";
pub const FIELD_TIMESTAMP: &str = "timestamp";

// Structured command wire keys (translator → agent API)
pub const WIRE_ACTION: &str = "action";
pub const WIRE_PARAMETERS: &str = "parameters";
pub const WIRE_TARGETS: &str = "targets";

// Logging field keys
pub const FIELD_DOC_ID: &str = "doc_id";
pub const FIELD_OP: &str = "op";
pub const FIELD_ERR_CODE: &str = "err.code";
