//! Derived geometric properties reported by a backend

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    /// Minimum corner (x, y, z)
    pub min: [f64; 3],
    /// Maximum corner (x, y, z)
    pub max: [f64; 3],
}

impl Bbox {
    /// Build a box from two corners, normalizing min/max per component
    pub fn new(a: [f64; 3], b: [f64; 3]) -> Self {
        let mut min = [0.0; 3];
        let mut max = [0.0; 3];
        for i in 0..3 {
            min[i] = a[i].min(b[i]);
            max[i] = a[i].max(b[i]);
        }
        Self { min, max }
    }

    /// Extent along each axis
    pub fn extent(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Volume enclosed by the box
    pub fn volume(&self) -> f64 {
        let e = self.extent();
        e[0] * e[1] * e[2]
    }

    /// Smallest extent across the three axes
    pub fn min_extent(&self) -> f64 {
        let e = self.extent();
        e[0].min(e[1]).min(e[2])
    }

    /// Smallest box containing both operands
    pub fn union(&self, other: &Bbox) -> Bbox {
        Bbox {
            min: [
                self.min[0].min(other.min[0]),
                self.min[1].min(other.min[1]),
                self.min[2].min(other.min[2]),
            ],
            max: [
                self.max[0].max(other.max[0]),
                self.max[1].max(other.max[1]),
                self.max[2].max(other.max[2]),
            ],
        }
    }

    /// Overlap region of two boxes, or None if they are disjoint
    pub fn intersection(&self, other: &Bbox) -> Option<Bbox> {
        let mut min = [0.0; 3];
        let mut max = [0.0; 3];
        for i in 0..3 {
            min[i] = self.min[i].max(other.min[i]);
            max[i] = self.max[i].min(other.max[i]);
            if min[i] >= max[i] {
                return None;
            }
        }
        Some(Bbox { min, max })
    }

    /// Translate the box by an offset
    pub fn translated(&self, offset: [f64; 3]) -> Bbox {
        Bbox {
            min: [
                self.min[0] + offset[0],
                self.min[1] + offset[1],
                self.min[2] + offset[2],
            ],
            max: [
                self.max[0] + offset[0],
                self.max[1] + offset[1],
                self.max[2] + offset[2],
            ],
        }
    }

    /// Scale the box about the origin
    pub fn scaled(&self, factor: f64) -> Bbox {
        Bbox::new(
            [
                self.min[0] * factor,
                self.min[1] * factor,
                self.min[2] * factor,
            ],
            [
                self.max[0] * factor,
                self.max[1] * factor,
                self.max[2] * factor,
            ],
        )
    }

    /// The eight corner points of the box
    pub fn corners(&self) -> [[f64; 3]; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            [lo[0], lo[1], lo[2]],
            [hi[0], lo[1], lo[2]],
            [lo[0], hi[1], lo[2]],
            [hi[0], hi[1], lo[2]],
            [lo[0], lo[1], hi[2]],
            [hi[0], lo[1], hi[2]],
            [lo[0], hi[1], hi[2]],
            [hi[0], hi[1], hi[2]],
        ]
    }

    /// Smallest axis-aligned box containing the given points
    pub fn of_points(points: &[[f64; 3]]) -> Bbox {
        let mut min = [f64::MAX; 3];
        let mut max = [f64::MIN; 3];
        for p in points {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Bbox { min, max }
    }
}

/// Synthetic or kernel-reported properties of one modeled object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedProps {
    /// Estimated enclosed volume
    pub volume: f64,
    /// Axis-aligned bounding box
    pub bbox: Bbox,
}

impl DerivedProps {
    pub fn new(volume: f64, bbox: Bbox) -> Self {
        Self { volume, bbox }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_normalizes_corners() {
        let b = Bbox::new([1.0, 2.0, 3.0], [-1.0, 0.0, 5.0]);
        assert_eq!(b.min, [-1.0, 0.0, 3.0]);
        assert_eq!(b.max, [1.0, 2.0, 5.0]);
    }

    #[test]
    fn test_bbox_volume_and_extent() {
        let b = Bbox::new([0.0, 0.0, 0.0], [2.0, 3.0, 4.0]);
        assert_eq!(b.extent(), [2.0, 3.0, 4.0]);
        assert_eq!(b.volume(), 24.0);
        assert_eq!(b.min_extent(), 2.0);
    }

    #[test]
    fn test_bbox_intersection_disjoint() {
        let a = Bbox::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = Bbox::new([2.0, 2.0, 2.0], [3.0, 3.0, 3.0]);
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_bbox_intersection_overlap() {
        let a = Bbox::new([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
        let b = Bbox::new([1.0, 1.0, 1.0], [3.0, 3.0, 3.0]);
        let i = a.intersection(&b).unwrap();
        assert_eq!(i.min, [1.0, 1.0, 1.0]);
        assert_eq!(i.max, [2.0, 2.0, 2.0]);
        assert_eq!(i.volume(), 1.0);
    }
}
