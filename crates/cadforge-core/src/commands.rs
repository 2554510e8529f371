//! Structured command types
//!
//! A [`Command`] is the validated-typed representation of one operation
//! request, as distinct from free natural language. The external
//! translator (LLM or rule-based frontend) emits these; this core never
//! parses free text itself.

use serde::{Deserialize, Serialize};

use cadforge_core_types::{ObjectId, ParamValue, Params};

/// One structured operation request
///
/// Immutable once submitted: the executor clones it into the history
/// record before any state is touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Registry name of the operation (e.g. `create_box`, `union`)
    pub operation: String,

    /// Parameter mapping (name → value)
    #[serde(default)]
    pub params: Params,

    /// Target object references for operations that mutate existing
    /// objects (transforms, booleans, modifiers). Empty for primitives.
    #[serde(default)]
    pub targets: Vec<ObjectId>,
}

impl Command {
    /// Create a command with no parameters or targets
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            params: Params::new(),
            targets: Vec::new(),
        }
    }

    /// Add a parameter (builder style)
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Add a target object reference (builder style)
    pub fn with_target(mut self, target: ObjectId) -> Self {
        self.targets.push(target);
        self
    }
}
