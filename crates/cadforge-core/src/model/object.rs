use serde::{Deserialize, Serialize};

use cadforge_core_types::{DerivedProps, ObjectId, Params};

/// One modeled entity within a document
///
/// Either a primitive or the result of a transform/boolean/modifier.
/// The `created_by_seq` field points back at the history record that
/// produced the object (traceability, not ownership).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadObject {
    /// Identifier, unique within the owning document
    pub id: ObjectId,

    /// Name of the operation that produced this object (e.g. `create_box`)
    pub operation: String,

    /// Validated parameters the operation ran with (defaults filled in)
    pub params: Params,

    /// Derived properties reported by the backend, if any
    pub props: Option<DerivedProps>,

    /// Sequence number of the history record that created this object
    pub created_by_seq: u64,
}

impl CadObject {
    pub fn new(
        id: ObjectId,
        operation: impl Into<String>,
        params: Params,
        props: Option<DerivedProps>,
        created_by_seq: u64,
    ) -> Self {
        Self {
            id,
            operation: operation.into(),
            params,
            props,
            created_by_seq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadforge_core_types::ParamValue;

    #[test]
    fn test_object_round_trips_through_json() {
        let mut params = Params::new();
        params.insert("radius".into(), ParamValue::Number(3.0));
        let obj = CadObject::new(ObjectId::derived("sphere", 1), "create_sphere", params, None, 1);

        let json = serde_json::to_string(&obj).unwrap();
        let back: CadObject = serde_json::from_str(&json).unwrap();
        assert_eq!(obj, back);
    }
}
