use thiserror::Error;

/// Result type alias using CadError
pub type Result<T> = std::result::Result<T, CadError>;

/// Comprehensive error taxonomy for cadforge operations
///
/// Every variant maps to a stable `ERR_*` code via [`CadError::code`],
/// suitable for 1:1 mapping onto HTTP statuses by an external REST layer
/// and for stamping into failed history records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CadError {
    // ===== Registry / Validation Errors =====
    /// Operation name is not present in the registry
    #[error("Unknown operation: {name}")]
    UnknownOperation { name: String },

    /// Operation name is already registered
    #[error("Operation already registered: {name}")]
    DuplicateOperation { name: String },

    /// Command parameters violate the operation's schema
    ///
    /// Carries every violated constraint, not just the first, so an LLM
    /// caller can correct all of them in one round trip.
    #[error("Invalid parameters for '{operation}': {}", .violations.join("; "))]
    InvalidParameter {
        operation: String,
        violations: Vec<String>,
    },

    // ===== Session / Document Errors =====
    /// Document id does not resolve within the session
    #[error("Document not found: {doc_id}")]
    DocumentNotFound { doc_id: String },

    /// Document name is already in use within the session
    #[error("Duplicate document name: {name}")]
    DuplicateDocument { name: String },

    /// Referenced object does not exist in the document
    #[error("Object not found: {object_id} in document {doc_id}")]
    ObjectNotFound { doc_id: String, object_id: String },

    // ===== Backend Errors =====
    /// The geometry backend rejected or failed the operation
    #[error("Backend execution failed in '{operation}': {message}")]
    BackendExecution { operation: String, message: String },

    /// The backend call exceeded its time bound
    #[error("Backend call timed out after {timeout_ms} ms in '{operation}'")]
    BackendTimeout { operation: String, timeout_ms: u64 },

    // ===== Ambient Errors =====
    /// File I/O failure (snapshots, exports)
    #[error("I/O error: {message}")]
    Io { message: String },

    /// JSON encoding/decoding failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Snapshot is malformed or carries an unsupported version
    #[error("Snapshot error: {message}")]
    Snapshot { message: String },
}

impl CadError {
    /// Get the stable error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            CadError::UnknownOperation { .. } => "ERR_UNKNOWN_OPERATION",
            CadError::DuplicateOperation { .. } => "ERR_DUPLICATE_OPERATION",
            CadError::InvalidParameter { .. } => "ERR_INVALID_PARAMETER",
            CadError::DocumentNotFound { .. } => "ERR_DOCUMENT_NOT_FOUND",
            CadError::DuplicateDocument { .. } => "ERR_DUPLICATE_DOCUMENT",
            CadError::ObjectNotFound { .. } => "ERR_OBJECT_NOT_FOUND",
            CadError::BackendExecution { .. } => "ERR_BACKEND_EXECUTION",
            CadError::BackendTimeout { .. } => "ERR_BACKEND_TIMEOUT",
            CadError::Io { .. } => "ERR_IO",
            CadError::Serialization { .. } => "ERR_SERIALIZATION",
            CadError::Snapshot { .. } => "ERR_SNAPSHOT",
        }
    }
}

/// Conversion from serde_json::Error to CadError
impl From<serde_json::Error> for CadError {
    fn from(err: serde_json::Error) -> Self {
        CadError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from std::io::Error to CadError
impl From<std::io::Error> for CadError {
    fn from(err: std::io::Error) -> Self {
        CadError::Io {
            message: err.to_string(),
        }
    }
}
