//! Operation specifications and parameter schemas

use serde::{Deserialize, Serialize};

use cadforge_core_types::{Axis, ParamValue, Params};

/// Primitive creation operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Box,
    Cylinder,
    Sphere,
    Cone,
    Torus,
}

impl PrimitiveKind {
    /// Lowercase label used to derive object ids (`box-1`, `torus-4`, ...)
    pub fn label(&self) -> &'static str {
        match self {
            PrimitiveKind::Box => "box",
            PrimitiveKind::Cylinder => "cylinder",
            PrimitiveKind::Sphere => "sphere",
            PrimitiveKind::Cone => "cone",
            PrimitiveKind::Torus => "torus",
        }
    }
}

/// Transform operations applied to one existing object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    Translate,
    Rotate,
    Scale,
    Extrude,
}

impl TransformKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransformKind::Translate => "translate",
            TransformKind::Rotate => "rotate",
            TransformKind::Scale => "scale",
            TransformKind::Extrude => "extrude",
        }
    }
}

/// Boolean operations combining two existing objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanKind {
    Union,
    Cut,
    Intersection,
}

impl BooleanKind {
    pub fn label(&self) -> &'static str {
        match self {
            BooleanKind::Union => "union",
            BooleanKind::Cut => "cut",
            BooleanKind::Intersection => "intersection",
        }
    }
}

/// Edge-modifier operations applied to one existing object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifyKind {
    Fillet,
    Chamfer,
}

impl ModifyKind {
    pub fn label(&self) -> &'static str {
        match self {
            ModifyKind::Fillet => "fillet",
            ModifyKind::Chamfer => "chamfer",
        }
    }
}

/// Closed operation-kind set, resolved through the registry map
///
/// The registry maps open operation *names* onto this closed variant set;
/// dispatch downstream of validation is exhaustive over these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "op", rename_all = "snake_case")]
pub enum OperationKind {
    Primitive(PrimitiveKind),
    Transform(TransformKind),
    Boolean(BooleanKind),
    Modify(ModifyKind),
}

impl OperationKind {
    /// Label used to derive the resulting object's id
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::Primitive(k) => k.label(),
            OperationKind::Transform(k) => k.label(),
            OperationKind::Boolean(k) => k.label(),
            OperationKind::Modify(k) => k.label(),
        }
    }

    /// Number of target object references the operation consumes
    pub fn target_arity(&self) -> usize {
        match self {
            OperationKind::Primitive(_) => 0,
            OperationKind::Transform(_) | OperationKind::Modify(_) => 1,
            OperationKind::Boolean(_) => 2,
        }
    }
}

/// Bounds on a numeric parameter
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NumberBounds {
    /// Lower bound, if any
    pub min: Option<f64>,
    /// Whether the lower bound itself is excluded (`> min` vs `>= min`)
    pub min_exclusive: bool,
    /// Upper bound, if any (always inclusive)
    pub max: Option<f64>,
}

impl NumberBounds {
    /// No bounds
    pub fn any() -> Self {
        Self::default()
    }

    /// Strictly positive (`> 0`)
    pub fn positive() -> Self {
        Self {
            min: Some(0.0),
            min_exclusive: true,
            max: None,
        }
    }

    /// Zero or greater (`>= 0`)
    pub fn non_negative() -> Self {
        Self {
            min: Some(0.0),
            min_exclusive: false,
            max: None,
        }
    }

    /// Check a value, returning a violation description on failure
    pub fn check(&self, value: f64) -> Option<String> {
        if !value.is_finite() {
            return Some("must be a finite number".to_string());
        }
        if let Some(min) = self.min {
            if self.min_exclusive && value <= min {
                return Some(format!("must be greater than {}", min));
            }
            if !self.min_exclusive && value < min {
                return Some(format!("must be at least {}", min));
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return Some(format!("must be at most {}", max));
            }
        }
        None
    }
}

/// Declared type of one parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    /// Numeric value constrained by bounds
    Number(NumberBounds),
    /// One of the principal axes (X/Y/Z), case-insensitive
    Axis,
    /// Free-form text
    Text,
}

impl ParamType {
    /// Human-readable type name for violation messages
    pub fn describe(&self) -> &'static str {
        match self {
            ParamType::Number(_) => "a number",
            ParamType::Axis => "an axis name (X, Y or Z)",
            ParamType::Text => "a text value",
        }
    }
}

/// Schema for one parameter of an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name as it appears in commands
    pub name: String,
    /// Declared type and bounds
    pub ty: ParamType,
    /// Whether the parameter must be supplied when no default exists
    pub required: bool,
    /// Default filled in when the parameter is omitted
    pub default: Option<ParamValue>,
}

impl ParamSpec {
    /// A required parameter with no default
    pub fn required(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            default: None,
        }
    }

    /// An optional parameter with a default value
    pub fn optional(name: impl Into<String>, ty: ParamType, default: impl Into<ParamValue>) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
            default: Some(default.into()),
        }
    }

    /// Validate a supplied value against this schema
    ///
    /// Returns a violation description on mismatch, prefixed with the
    /// parameter name.
    pub fn check(&self, value: &ParamValue) -> Option<String> {
        match (&self.ty, value) {
            (ParamType::Number(bounds), ParamValue::Number(n)) => bounds
                .check(*n)
                .map(|reason| format!("{}: {}", self.name, reason)),
            (ParamType::Axis, ParamValue::Text(s)) => {
                if Axis::parse(s).is_none() {
                    Some(format!(
                        "{}: expected an axis name (X, Y or Z), got '{}'",
                        self.name, s
                    ))
                } else {
                    None
                }
            }
            (ParamType::Text, ParamValue::Text(_)) => None,
            (expected, got) => Some(format!(
                "{}: expected {}, got {:?}",
                self.name,
                expected.describe(),
                got
            )),
        }
    }
}

/// Cross-parameter validation rule, run once per-parameter checks pass
pub type OperationRule = fn(&Params) -> Option<String>;

/// Declaration of one supported CAD operation
///
/// Loaded once at process start and immutable thereafter; the registry is
/// shared read-only across sessions.
#[derive(Debug, Clone)]
pub struct OperationSpec {
    /// Registry name (e.g. `create_box`)
    pub name: String,
    /// Resolved closed kind used for dispatch
    pub kind: OperationKind,
    /// Human-readable description, surfaced to agents in the catalog
    pub description: String,
    /// Example natural-language request the translator might map here
    pub example: String,
    /// Parameter schemas
    pub params: Vec<ParamSpec>,
    /// Optional cross-parameter rule (e.g. torus tube inside ring)
    pub rule: Option<OperationRule>,
}

impl OperationSpec {
    pub fn new(
        name: impl Into<String>,
        kind: OperationKind,
        description: impl Into<String>,
        example: impl Into<String>,
        params: Vec<ParamSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            example: example.into(),
            params,
            rule: None,
        }
    }

    /// Attach a cross-parameter rule (builder style)
    pub fn with_rule(mut self, rule: OperationRule) -> Self {
        self.rule = Some(rule);
        self
    }
}
