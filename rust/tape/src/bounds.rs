// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding boxes and per-axis contact tests.

use crate::point::Point3D;

/// How two boxes relate along a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisRelation {
    /// A gap wider than the tolerance.
    Separated,
    /// Extents meet at one end, overlapping by at most the tolerance.
    Touching,
    /// Extents overlap by more than the tolerance.
    Overlapping,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3D,
    pub max: Point3D,
}

impl BoundingBox {
    pub fn new(min: Point3D, max: Point3D) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all points, or `None` for an empty slice.
    pub fn from_points(points: &[Point3D]) -> Option<Self> {
        let first = *points.first()?;
        let mut bbox = Self::new(first, first);
        for p in &points[1..] {
            for axis in 0..3 {
                bbox.min[axis] = bbox.min[axis].min(p[axis]);
                bbox.max[axis] = bbox.max[axis].max(p[axis]);
            }
        }
        Some(bbox)
    }

    /// Grows the box by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: self.min.map(|c| c - margin),
            max: self.max.map(|c| c + margin),
        }
    }

    /// Inclusive box-box intersection.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        (0..3).all(|axis| self.min[axis] <= other.max[axis] && other.min[axis] <= self.max[axis])
    }

    /// Inclusive point containment.
    pub fn contains(&self, p: &Point3D) -> bool {
        (0..3).all(|axis| self.min[axis] <= p[axis] && p[axis] <= self.max[axis])
    }

    pub fn center(&self) -> Point3D {
        nalgebra::center(&self.min, &self.max)
    }

    /// Returns `true` when the box has no extent (within `tolerance`) on `axis`.
    pub fn is_flat(&self, axis: usize, tolerance: f64) -> bool {
        self.max[axis] - self.min[axis] <= tolerance
    }

    /// Classifies the two extents along `axis`.
    pub fn axis_relation(&self, other: &BoundingBox, axis: usize, tolerance: f64) -> AxisRelation {
        let overlap = self.max[axis].min(other.max[axis]) - self.min[axis].max(other.min[axis]);
        if overlap < -tolerance {
            AxisRelation::Separated
        } else if overlap <= tolerance
            && ((self.max[axis] - other.min[axis]).abs() <= tolerance
                || (other.max[axis] - self.min[axis]).abs() <= tolerance)
        {
            AxisRelation::Touching
        } else {
            AxisRelation::Overlapping
        }
    }
}
