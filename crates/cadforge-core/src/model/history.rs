use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commands::Command;
use crate::errors::CadError;
use cadforge_core_types::{BackendMode, DerivedProps, ObjectId};

/// Outcome of one attempted command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// The command executed and produced the listed objects
    Success {
        /// Identifiers of the resulting object(s)
        object_ids: Vec<ObjectId>,
        /// Derived properties of the resulting object, if reported
        props: Option<DerivedProps>,
    },
    /// The command failed before or during execution
    Failure {
        /// Stable error code (`ERR_*`)
        code: String,
        /// Human-readable error detail
        detail: String,
    },
}

/// Immutable audit entry for one attempted command
///
/// Appended by the executor for every execution, success or failure, and
/// never mutated afterwards. Sequence numbers are monotonic per document
/// and mirror submission order exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Monotonic per-document sequence number, starting at 1
    pub seq: u64,

    /// The command as submitted (validated before execution)
    pub command: Command,

    /// Execution outcome
    pub outcome: CommandOutcome,

    /// Which backend mode executed (or rejected) the command
    pub backend: BackendMode,

    /// When the record was appended
    pub at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Build a success record
    pub fn success(
        seq: u64,
        command: Command,
        object_ids: Vec<ObjectId>,
        props: Option<DerivedProps>,
        backend: BackendMode,
    ) -> Self {
        Self {
            seq,
            command,
            outcome: CommandOutcome::Success { object_ids, props },
            backend,
            at: Utc::now(),
        }
    }

    /// Build a failure record from a typed error
    pub fn failure(seq: u64, command: Command, error: &CadError, backend: BackendMode) -> Self {
        Self {
            seq,
            command,
            outcome: CommandOutcome::Failure {
                code: error.code().to_string(),
                detail: error.to_string(),
            },
            backend,
            at: Utc::now(),
        }
    }

    /// Whether this record describes a successful execution
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, CommandOutcome::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_record_carries_stable_code() {
        let err = CadError::UnknownOperation {
            name: "warp".into(),
        };
        let record = HistoryRecord::failure(
            1,
            Command::new("warp"),
            &err,
            BackendMode::Simulated,
        );
        assert!(!record.succeeded());
        match record.outcome {
            CommandOutcome::Failure { code, .. } => assert_eq!(code, "ERR_UNKNOWN_OPERATION"),
            other => panic!("expected failure outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let record = HistoryRecord::success(
            3,
            Command::new("create_sphere").with_param("radius", 2.0),
            vec![ObjectId::derived("sphere", 1)],
            None,
            BackendMode::Simulated,
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: HistoryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
