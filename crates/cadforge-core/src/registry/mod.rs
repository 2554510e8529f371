//! Operation registry
//!
//! Declares the set of supported CAD operations with their parameter
//! schemas. Populated once at process start via [`OperationRegistry::builtin`]
//! and treated as read-only afterwards, so arbitrarily many sessions can
//! validate against it concurrently without locking.

pub mod builtin;
pub mod spec;

use std::collections::BTreeMap;

use crate::commands::Command;
use crate::errors::{CadError, Result};
use cadforge_core_types::Params;

pub use spec::{
    BooleanKind, ModifyKind, NumberBounds, OperationKind, OperationRule, OperationSpec, ParamSpec,
    ParamType, PrimitiveKind, TransformKind,
};

/// Immutable map of operation name → specification
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    specs: BTreeMap<String, OperationSpec>,
}

impl OperationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            specs: BTreeMap::new(),
        }
    }

    /// Registry pre-populated with the built-in operation set
    pub fn builtin() -> Self {
        builtin::build()
    }

    /// Register an operation specification
    ///
    /// # Errors
    ///
    /// Returns `DuplicateOperation` if the name is already registered.
    pub fn register(&mut self, spec: OperationSpec) -> Result<()> {
        if self.specs.contains_key(&spec.name) {
            return Err(CadError::DuplicateOperation {
                name: spec.name.clone(),
            });
        }
        self.specs.insert(spec.name.clone(), spec);
        Ok(())
    }

    /// Look up an operation specification by name
    ///
    /// # Errors
    ///
    /// Returns `UnknownOperation` if the name is not registered.
    pub fn get(&self, name: &str) -> Result<&OperationSpec> {
        self.specs
            .get(name)
            .ok_or_else(|| CadError::UnknownOperation {
                name: name.to_string(),
            })
    }

    /// Iterate all specifications in name order
    pub fn iter(&self) -> impl Iterator<Item = &OperationSpec> {
        self.specs.values()
    }

    /// Number of registered operations
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Validate parameters against an operation's schema
    ///
    /// Checks presence, type, and range of every parameter and returns the
    /// validated parameter set with schema defaults filled in. On failure
    /// the error lists **every** violated constraint, not just the first;
    /// the caller is often an LLM that needs complete feedback to
    /// self-correct.
    ///
    /// # Errors
    ///
    /// `UnknownOperation` if the name is not registered;
    /// `InvalidParameter` carrying the full violation list otherwise.
    pub fn validate(&self, name: &str, params: &Params) -> Result<Params> {
        self.validate_inner(name, params, None)
    }

    /// Validate a full command, including its target reference arity
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`OperationRegistry::validate`]; a wrong number of
    /// target references appears in the violation list.
    pub fn validate_command(&self, command: &Command) -> Result<Params> {
        self.validate_inner(&command.operation, &command.params, Some(command.targets.len()))
    }

    fn validate_inner(
        &self,
        name: &str,
        params: &Params,
        target_count: Option<usize>,
    ) -> Result<Params> {
        let spec = self.get(name)?;
        let mut violations = Vec::new();
        let mut resolved = Params::new();

        for param in &spec.params {
            match params.get(&param.name) {
                Some(value) => {
                    if let Some(violation) = param.check(value) {
                        violations.push(violation);
                    } else {
                        resolved.insert(param.name.clone(), value.clone());
                    }
                }
                None => {
                    if let Some(default) = &param.default {
                        resolved.insert(param.name.clone(), default.clone());
                    } else if param.required {
                        violations.push(format!("{}: missing required parameter", param.name));
                    }
                }
            }
        }

        // Parameters the schema does not declare are violations too: a
        // silently dropped parameter reads as accepted to the caller.
        for supplied in params.keys() {
            if !spec.params.iter().any(|p| &p.name == supplied) {
                violations.push(format!("{}: unexpected parameter", supplied));
            }
        }

        if let Some(count) = target_count {
            let arity = spec.kind.target_arity();
            if count != arity {
                violations.push(format!(
                    "targets: expected {} object reference(s), got {}",
                    arity, count
                ));
            }
        }

        // Cross-parameter rules only make sense over a fully valid set
        if violations.is_empty() {
            if let Some(rule) = spec.rule {
                if let Some(violation) = rule(&resolved) {
                    violations.push(violation);
                }
            }
        }

        if violations.is_empty() {
            Ok(resolved)
        } else {
            Err(CadError::InvalidParameter {
                operation: name.to_string(),
                violations,
            })
        }
    }
}
