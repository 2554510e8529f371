//! Backend mode flag
//!
//! Every history record is stamped with the mode that executed it so the
//! training pipeline can tell kernel-produced records from simulated ones.

use serde::{Deserialize, Serialize};

/// Which geometry substrate executed an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    /// A real external CAD kernel
    Kernel,
    /// The deterministic simulation substitute
    Simulated,
}

impl BackendMode {
    /// Canonical lowercase name, as written into exports
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendMode::Kernel => "kernel",
            BackendMode::Simulated => "simulated",
        }
    }
}

impl std::fmt::Display for BackendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
