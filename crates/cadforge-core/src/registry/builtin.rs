//! Built-in operation set
//!
//! The inventory an agent can drive: five primitives, four transforms,
//! three booleans, and two edge modifiers. Registered once at startup.

use cadforge_core_types::Params;

use super::spec::{
    BooleanKind, ModifyKind, NumberBounds, OperationKind, OperationSpec, ParamSpec, ParamType,
    PrimitiveKind, TransformKind,
};
use super::OperationRegistry;

fn number(bounds: NumberBounds) -> ParamType {
    ParamType::Number(bounds)
}

/// Torus rule: the tube radius must fit inside the ring radius
fn torus_tube_inside_ring(params: &Params) -> Option<String> {
    let ring = params.get("radius1")?.as_number()?;
    let tube = params.get("radius2")?.as_number()?;
    if tube >= ring {
        Some(format!(
            "radius2: tube radius {} must be smaller than ring radius {}",
            tube, ring
        ))
    } else {
        None
    }
}

/// Build the registry with every built-in operation
pub fn build() -> OperationRegistry {
    let mut registry = OperationRegistry::new();

    let specs = vec![
        OperationSpec::new(
            "create_box",
            OperationKind::Primitive(PrimitiveKind::Box),
            "Create a rectangular box",
            "Create a box of size 10x5x3",
            vec![
                ParamSpec::required("length", number(NumberBounds::positive())),
                ParamSpec::required("width", number(NumberBounds::positive())),
                ParamSpec::required("height", number(NumberBounds::positive())),
            ],
        ),
        OperationSpec::new(
            "create_cylinder",
            OperationKind::Primitive(PrimitiveKind::Cylinder),
            "Create a cylinder",
            "Create a cylinder with radius 5 and height 10",
            vec![
                ParamSpec::required("radius", number(NumberBounds::positive())),
                ParamSpec::required("height", number(NumberBounds::positive())),
            ],
        ),
        OperationSpec::new(
            "create_sphere",
            OperationKind::Primitive(PrimitiveKind::Sphere),
            "Create a sphere",
            "Create a sphere with radius 3",
            vec![ParamSpec::required(
                "radius",
                number(NumberBounds::positive()),
            )],
        ),
        OperationSpec::new(
            "create_cone",
            OperationKind::Primitive(PrimitiveKind::Cone),
            "Create a cone or truncated cone",
            "Create a cone with base radius 4 and height 9",
            vec![
                ParamSpec::required("radius1", number(NumberBounds::positive())),
                ParamSpec::optional("radius2", number(NumberBounds::non_negative()), 0.0),
                ParamSpec::required("height", number(NumberBounds::positive())),
            ],
        ),
        OperationSpec::new(
            "create_torus",
            OperationKind::Primitive(PrimitiveKind::Torus),
            "Create a torus",
            "Create a torus with ring radius 10 and tube radius 2",
            vec![
                ParamSpec::required("radius1", number(NumberBounds::positive())),
                ParamSpec::required("radius2", number(NumberBounds::positive())),
            ],
        )
        .with_rule(torus_tube_inside_ring),
        OperationSpec::new(
            "translate",
            OperationKind::Transform(TransformKind::Translate),
            "Move an object along the axes",
            "Move the box 10 units along X",
            vec![
                ParamSpec::optional("x", number(NumberBounds::any()), 0.0),
                ParamSpec::optional("y", number(NumberBounds::any()), 0.0),
                ParamSpec::optional("z", number(NumberBounds::any()), 0.0),
            ],
        ),
        OperationSpec::new(
            "rotate",
            OperationKind::Transform(TransformKind::Rotate),
            "Rotate an object around a principal axis",
            "Rotate the part 90 degrees around Z",
            vec![
                ParamSpec::required("angle", number(NumberBounds::any())),
                ParamSpec::optional("axis", ParamType::Axis, "Z"),
            ],
        ),
        OperationSpec::new(
            "scale",
            OperationKind::Transform(TransformKind::Scale),
            "Scale an object uniformly",
            "Make the object twice as large",
            vec![ParamSpec::required(
                "factor",
                number(NumberBounds::positive()),
            )],
        ),
        OperationSpec::new(
            "extrude",
            OperationKind::Transform(TransformKind::Extrude),
            "Stretch an object along its height",
            "Extrude the profile by 5 units",
            vec![ParamSpec::required(
                "distance",
                number(NumberBounds::positive()),
            )],
        ),
        OperationSpec::new(
            "union",
            OperationKind::Boolean(BooleanKind::Union),
            "Fuse two objects into one",
            "Join the box and the cylinder",
            vec![],
        ),
        OperationSpec::new(
            "cut",
            OperationKind::Boolean(BooleanKind::Cut),
            "Subtract the second object from the first",
            "Cut the cylinder out of the box",
            vec![],
        ),
        OperationSpec::new(
            "intersection",
            OperationKind::Boolean(BooleanKind::Intersection),
            "Keep only the common region of two objects",
            "Intersect the box with the sphere",
            vec![],
        ),
        OperationSpec::new(
            "fillet",
            OperationKind::Modify(ModifyKind::Fillet),
            "Round the edges of an object",
            "Round the edges with radius 1",
            vec![ParamSpec::required(
                "radius",
                number(NumberBounds::positive()),
            )],
        ),
        OperationSpec::new(
            "chamfer",
            OperationKind::Modify(ModifyKind::Chamfer),
            "Bevel the edges of an object",
            "Chamfer the edges by 0.5",
            vec![ParamSpec::required(
                "distance",
                number(NumberBounds::positive()),
            )],
        ),
    ];

    for spec in specs {
        // Names are compile-time constants here; a clash is a programming
        // error, not a runtime condition.
        registry
            .register(spec)
            .expect("builtin operation names are unique");
    }

    tracing::debug!(operations = registry.len(), "builtin registry constructed");
    registry
}
