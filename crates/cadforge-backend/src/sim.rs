//! Deterministic simulation backend
//!
//! Pure-function substitute used when no real kernel is attached. Given
//! identical operation + parameters it always produces identical synthetic
//! properties, so an identical command sequence replays to identical
//! derived properties, which is the reproducibility the training pipeline needs.
//!
//! Derived-property formulas:
//! - Primitives use closed-form volumes (box `l·w·h`, cylinder `πr²h`,
//!   sphere `4/3·πr³`, truncated cone `πh(r1²+r1·r2+r2²)/3`, torus
//!   `2π²·R·r²`) and exact axis-aligned bounding boxes.
//! - Translate/rotate preserve volume; the rotated bounding box is the
//!   axis-aligned box of the rotated corners (exact for boxes,
//!   conservative otherwise). Scale multiplies volume by `factor³`.
//! - Extrude stretches the bounding box upward and scales volume by the
//!   height ratio.
//! - Booleans estimate the overlap as the bounding-box intersection
//!   volume, capped by both operand volumes, and combine by
//!   inclusion/exclusion.
//! - Fillet/chamfer shave a fraction of the volume proportional to the
//!   radius (resp. distance) relative to the smallest box extent, capped
//!   at 30%.
//!
//! These composite formulas are documented approximations: they guarantee
//! determinism and monotonic plausibility, not numeric agreement with any
//! real kernel.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use cadforge_core::registry::{BooleanKind, ModifyKind, PrimitiveKind, TransformKind};
use cadforge_core_types::{Axis, BackendMode, Bbox, DerivedProps, Params};
use cadforge_store::{read_snapshot, write_snapshot, DocumentSnapshot};

use crate::traits::{
    BackendError, BackendHandle, BackendResult, GeometryBackend, LoadedDocument,
};

/// Deterministic simulation substitute for a real CAD kernel
#[derive(Debug, Default)]
pub struct SimulatedBackend {
    shapes: Mutex<HashMap<u64, DerivedProps>>,
    next_handle: AtomicU64,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, props: DerivedProps) -> BackendHandle {
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed) + 1;
        self.shapes.lock().insert(handle, props);
        BackendHandle(handle)
    }

    fn props_of(&self, handle: BackendHandle) -> BackendResult<DerivedProps> {
        self.shapes
            .lock()
            .get(&handle.0)
            .copied()
            .ok_or(BackendError::UnknownHandle { handle: handle.0 })
    }
}

fn number(params: &Params, name: &str) -> BackendResult<f64> {
    params
        .get(name)
        .and_then(|v| v.as_number())
        .ok_or_else(|| BackendError::Execution {
            message: format!("missing numeric parameter '{}'", name),
        })
}

fn axis_param(params: &Params, name: &str) -> BackendResult<Axis> {
    let text = params
        .get(name)
        .and_then(|v| v.as_text())
        .unwrap_or(Axis::Z.as_str());
    Axis::parse(text).ok_or_else(|| BackendError::Execution {
        message: format!("invalid axis '{}'", text),
    })
}

/// Closed-form properties for a primitive
fn primitive_props(kind: PrimitiveKind, params: &Params) -> BackendResult<DerivedProps> {
    match kind {
        PrimitiveKind::Box => {
            let (l, w, h) = (
                number(params, "length")?,
                number(params, "width")?,
                number(params, "height")?,
            );
            Ok(DerivedProps::new(
                l * w * h,
                Bbox::new([0.0, 0.0, 0.0], [l, w, h]),
            ))
        }
        PrimitiveKind::Cylinder => {
            let (r, h) = (number(params, "radius")?, number(params, "height")?);
            Ok(DerivedProps::new(
                PI * r * r * h,
                Bbox::new([-r, -r, 0.0], [r, r, h]),
            ))
        }
        PrimitiveKind::Sphere => {
            let r = number(params, "radius")?;
            Ok(DerivedProps::new(
                4.0 / 3.0 * PI * r * r * r,
                Bbox::new([-r, -r, -r], [r, r, r]),
            ))
        }
        PrimitiveKind::Cone => {
            let (r1, r2, h) = (
                number(params, "radius1")?,
                number(params, "radius2")?,
                number(params, "height")?,
            );
            let r_max = r1.max(r2);
            Ok(DerivedProps::new(
                PI * h * (r1 * r1 + r1 * r2 + r2 * r2) / 3.0,
                Bbox::new([-r_max, -r_max, 0.0], [r_max, r_max, h]),
            ))
        }
        PrimitiveKind::Torus => {
            let (ring, tube) = (number(params, "radius1")?, number(params, "radius2")?);
            let reach = ring + tube;
            Ok(DerivedProps::new(
                2.0 * PI * PI * ring * tube * tube,
                Bbox::new([-reach, -reach, -tube], [reach, reach, tube]),
            ))
        }
    }
}

/// Rotate a point about a principal axis through the origin
fn rotate_point(p: [f64; 3], axis: Axis, radians: f64) -> [f64; 3] {
    let (sin, cos) = radians.sin_cos();
    let [x, y, z] = p;
    match axis {
        Axis::X => [x, y * cos - z * sin, y * sin + z * cos],
        Axis::Y => [x * cos + z * sin, y, -x * sin + z * cos],
        Axis::Z => [x * cos - y * sin, x * sin + y * cos, z],
    }
}

/// Transformed properties derived from an existing shape
fn transform_props(
    kind: TransformKind,
    base: DerivedProps,
    params: &Params,
) -> BackendResult<DerivedProps> {
    match kind {
        TransformKind::Translate => {
            let offset = [
                number(params, "x")?,
                number(params, "y")?,
                number(params, "z")?,
            ];
            Ok(DerivedProps::new(base.volume, base.bbox.translated(offset)))
        }
        TransformKind::Rotate => {
            let angle = number(params, "angle")?.to_radians();
            let axis = axis_param(params, "axis")?;
            let corners = base.bbox.corners();
            let rotated: Vec<[f64; 3]> = corners
                .iter()
                .map(|&c| rotate_point(c, axis, angle))
                .collect();
            Ok(DerivedProps::new(base.volume, Bbox::of_points(&rotated)))
        }
        TransformKind::Scale => {
            let factor = number(params, "factor")?;
            Ok(DerivedProps::new(
                base.volume * factor * factor * factor,
                base.bbox.scaled(factor),
            ))
        }
        TransformKind::Extrude => {
            let distance = number(params, "distance")?;
            let height = base.bbox.extent()[2];
            if height <= 0.0 {
                return Err(BackendError::Execution {
                    message: "cannot extrude a shape with no height".to_string(),
                });
            }
            let mut bbox = base.bbox;
            bbox.max[2] += distance;
            Ok(DerivedProps::new(
                base.volume * (height + distance) / height,
                bbox,
            ))
        }
    }
}

/// Combined properties for a boolean operation
///
/// Overlap is estimated as the bounding-box intersection volume, capped by
/// both operand volumes so the estimate never exceeds either body.
fn boolean_props(kind: BooleanKind, a: DerivedProps, b: DerivedProps) -> DerivedProps {
    let overlap_box = a.bbox.intersection(&b.bbox);
    let overlap = overlap_box
        .map(|bb| bb.volume())
        .unwrap_or(0.0)
        .min(a.volume)
        .min(b.volume);
    match kind {
        BooleanKind::Union => DerivedProps::new(a.volume + b.volume - overlap, a.bbox.union(&b.bbox)),
        BooleanKind::Cut => DerivedProps::new((a.volume - overlap).max(0.0), a.bbox),
        BooleanKind::Intersection => {
            let bbox = overlap_box.unwrap_or(Bbox::new(a.bbox.min, a.bbox.min));
            DerivedProps::new(overlap, bbox)
        }
    }
}

/// Edge-modifier properties: shave a bounded fraction of the volume
fn modifier_props(
    kind: ModifyKind,
    base: DerivedProps,
    params: &Params,
) -> BackendResult<DerivedProps> {
    let (size, weight) = match kind {
        ModifyKind::Fillet => (number(params, "radius")?, 0.10),
        ModifyKind::Chamfer => (number(params, "distance")?, 0.15),
    };
    let min_extent = base.bbox.min_extent().max(f64::EPSILON);
    let shave = (weight * size / min_extent).min(0.30);
    Ok(DerivedProps::new(base.volume * (1.0 - shave), base.bbox))
}

impl GeometryBackend for SimulatedBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Simulated
    }

    fn create_primitive(
        &self,
        kind: PrimitiveKind,
        params: &Params,
    ) -> BackendResult<BackendHandle> {
        let props = primitive_props(kind, params)?;
        Ok(self.register(props))
    }

    fn apply_transform(
        &self,
        kind: TransformKind,
        base: BackendHandle,
        params: &Params,
    ) -> BackendResult<BackendHandle> {
        let base_props = self.props_of(base)?;
        let props = transform_props(kind, base_props, params)?;
        Ok(self.register(props))
    }

    fn boolean_op(
        &self,
        kind: BooleanKind,
        a: BackendHandle,
        b: BackendHandle,
    ) -> BackendResult<BackendHandle> {
        let (pa, pb) = (self.props_of(a)?, self.props_of(b)?);
        Ok(self.register(boolean_props(kind, pa, pb)))
    }

    fn apply_modifier(
        &self,
        kind: ModifyKind,
        base: BackendHandle,
        params: &Params,
    ) -> BackendResult<BackendHandle> {
        let base_props = self.props_of(base)?;
        let props = modifier_props(kind, base_props, params)?;
        Ok(self.register(props))
    }

    fn describe(&self, handle: BackendHandle) -> BackendResult<DerivedProps> {
        self.props_of(handle)
    }

    fn save_document(&self, snapshot: &DocumentSnapshot, path: &Path) -> BackendResult<()> {
        write_snapshot(snapshot, path).map_err(|e| BackendError::Execution {
            message: e.to_string(),
        })
    }

    fn load_document(&self, path: &Path) -> BackendResult<LoadedDocument> {
        let snapshot = read_snapshot(path).map_err(|e| BackendError::Execution {
            message: e.to_string(),
        })?;
        let handles = snapshot
            .objects
            .iter()
            .map(|obj| {
                let props = obj
                    .props
                    .unwrap_or(DerivedProps::new(0.0, Bbox::new([0.0; 3], [0.0; 3])));
                self.register(props)
            })
            .collect();
        Ok(LoadedDocument { snapshot, handles })
    }
}
