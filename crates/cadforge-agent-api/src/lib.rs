//! Cadforge Agent API - the LLM/agent-facing surface
//!
//! What an agent needs to drive a modeling session:
//! - the **operation catalog** (names, parameters, descriptions, example
//!   requests) so it can choose and shape commands,
//! - **context info** (active document summary, recent history, backend
//!   mode) so it can ground its next request,
//! - **wire-command execution**: the translator's JSON shape
//!   (`{"action": ..., "parameters": {...}, "targets": [...]}`) parsed
//!   into a structured [`Command`] and executed.
//!
//! Free natural language never reaches this crate; the external
//! translator owns that boundary.

use std::sync::Arc;

use serde::Serialize;

use cadforge_core::errors::{CadError, Result};
use cadforge_core::model::HistoryRecord;
use cadforge_core::registry::ParamType;
use cadforge_core::Command;
use cadforge_core_types::schema::{WIRE_ACTION, WIRE_PARAMETERS, WIRE_TARGETS};
use cadforge_core_types::{BackendMode, DocumentId, ObjectId, ParamValue};
use cadforge_engine::{DocumentInfo, ExecutionResult, SessionEngine};

// Re-exported so agent-facing callers need only this crate
pub use cadforge_engine::EngineConfig;

/// One parameter as presented in the operation catalog
#[derive(Debug, Clone, Serialize)]
pub struct ParameterInfo {
    pub name: String,
    /// "number", "axis", or "text"
    pub kind: &'static str,
    pub required: bool,
}

/// One operation as presented in the operation catalog
#[derive(Debug, Clone, Serialize)]
pub struct OperationInfo {
    pub name: String,
    pub description: String,
    /// Example natural-language request the translator might map here
    pub example: String,
    pub parameters: Vec<ParameterInfo>,
    /// Number of existing-object references the operation consumes
    pub target_count: usize,
}

/// Session context handed to the agent before its next request
#[derive(Debug, Clone, Serialize)]
pub struct ContextInfo {
    /// Which substrate is executing commands this session
    pub backend: BackendMode,
    /// Summary of the active document, if one exists
    pub active_document: Option<DocumentInfo>,
    /// The most recent history records of the active document
    pub recent_operations: Vec<HistoryRecord>,
    /// Names of every operation the session supports
    pub operation_names: Vec<String>,
}

/// Agent-facing facade over one session engine
pub struct AgentInterface {
    engine: Arc<SessionEngine>,
}

impl AgentInterface {
    pub fn new(engine: Arc<SessionEngine>) -> Self {
        Self { engine }
    }

    /// The underlying engine, for callers that need the full API
    pub fn engine(&self) -> &Arc<SessionEngine> {
        &self.engine
    }

    /// The operation catalog, in name order
    pub fn available_operations(&self) -> Vec<OperationInfo> {
        self.engine
            .registry()
            .iter()
            .map(|spec| OperationInfo {
                name: spec.name.clone(),
                description: spec.description.clone(),
                example: spec.example.clone(),
                parameters: spec
                    .params
                    .iter()
                    .map(|p| ParameterInfo {
                        name: p.name.clone(),
                        kind: match p.ty {
                            ParamType::Number(_) => "number",
                            ParamType::Axis => "axis",
                            ParamType::Text => "text",
                        },
                        required: p.required,
                    })
                    .collect(),
                target_count: spec.kind.target_arity(),
            })
            .collect()
    }

    /// Context for the agent's next request
    ///
    /// The recent-operations window is capped by the engine's
    /// `context_window` configuration.
    pub fn context_info(&self) -> ContextInfo {
        let active = self.engine.active_document();
        let active_document = active
            .as_ref()
            .and_then(|doc_id| self.engine.document_info(doc_id).ok());
        let recent_operations = active
            .as_ref()
            .and_then(|doc_id| self.engine.get_history(doc_id).ok())
            .map(|history| {
                let window = self.engine.config().context_window;
                let skip = history.len().saturating_sub(window);
                history.into_iter().skip(skip).collect()
            })
            .unwrap_or_default();

        ContextInfo {
            backend: self.engine.backend_mode(),
            active_document,
            recent_operations,
            operation_names: self
                .engine
                .registry()
                .iter()
                .map(|spec| spec.name.clone())
                .collect(),
        }
    }

    /// Execute a wire-format command against a document
    ///
    /// # Errors
    ///
    /// `Serialization` if the JSON does not match the wire shape; the
    /// full executor taxonomy otherwise.
    pub fn execute_wire(
        &self,
        doc_id: &DocumentId,
        value: &serde_json::Value,
    ) -> Result<ExecutionResult> {
        let command = parse_wire_command(value)?;
        tracing::debug!(op = %command.operation, "wire command accepted");
        self.engine.execute(doc_id, command)
    }

    /// Execute a wire-format command against the active document
    ///
    /// # Errors
    ///
    /// `DocumentNotFound` if no document is active; otherwise as
    /// [`AgentInterface::execute_wire`].
    pub fn execute_wire_active(&self, value: &serde_json::Value) -> Result<ExecutionResult> {
        let doc_id = self
            .engine
            .active_document()
            .ok_or_else(|| CadError::DocumentNotFound {
                doc_id: "(no active document)".to_string(),
            })?;
        self.execute_wire(&doc_id, value)
    }

    /// History export for the dataset pipeline, as JSON Lines
    ///
    /// # Errors
    ///
    /// `DocumentNotFound` or `Serialization`.
    pub fn export_history(&self, doc_id: &DocumentId) -> Result<String> {
        self.engine.export_history(doc_id)
    }
}

/// Parse the translator's wire shape into a structured command
///
/// # Errors
///
/// Returns `Serialization` naming the offending field on any shape
/// mismatch.
pub fn parse_wire_command(value: &serde_json::Value) -> Result<Command> {
    let obj = value
        .as_object()
        .ok_or_else(|| wire_error("command must be a JSON object"))?;

    let action = obj
        .get(WIRE_ACTION)
        .and_then(|v| v.as_str())
        .ok_or_else(|| wire_error("command is missing the 'action' field"))?;
    let mut command = Command::new(action);

    if let Some(params) = obj.get(WIRE_PARAMETERS) {
        let map = params
            .as_object()
            .ok_or_else(|| wire_error("'parameters' must be a JSON object"))?;
        for (name, value) in map {
            let param = match value {
                serde_json::Value::Number(n) => {
                    let n = n
                        .as_f64()
                        .ok_or_else(|| wire_error(&format!("parameter '{}' is out of range", name)))?;
                    ParamValue::Number(n)
                }
                serde_json::Value::String(s) => ParamValue::Text(s.clone()),
                _ => {
                    return Err(wire_error(&format!(
                        "parameter '{}' must be a number or a string",
                        name
                    )))
                }
            };
            command.params.insert(name.clone(), param);
        }
    }

    if let Some(targets) = obj.get(WIRE_TARGETS) {
        let list = targets
            .as_array()
            .ok_or_else(|| wire_error("'targets' must be a JSON array"))?;
        for target in list {
            let id = target
                .as_str()
                .ok_or_else(|| wire_error("targets must be object id strings"))?;
            command.targets.push(ObjectId::from_string(id.to_string()));
        }
    }

    Ok(command)
}

fn wire_error(message: &str) -> CadError {
    CadError::Serialization {
        message: message.to_string(),
    }
}
