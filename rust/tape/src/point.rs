// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loop points and boundary segments.

use nalgebra::{Point3, Vector3};
use serde::Deserialize;

use crate::error::{Result, TapeError};

/// A point in scene working units.
pub type Point3D = Point3<f64>;

/// A loop vertex as supplied by a caller.
///
/// Deserializes from `{"x": .., "y": .., "z": ..}` (z optional) or from a
/// `[x, y]` / `[x, y, z]` array. Already-built points convert through `From`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LoopPoint {
    #[serde(skip_deserializing)]
    Point(Point3D),
    Xyz {
        x: f64,
        y: f64,
        #[serde(default)]
        z: f64,
    },
    Coords(Vec<f64>),
}

impl LoopPoint {
    /// Normalizes to a finite [`Point3D`]; a missing z is 0.
    pub fn to_point(&self) -> Result<Point3D> {
        let p = match self {
            LoopPoint::Point(p) => *p,
            LoopPoint::Xyz { x, y, z } => Point3D::new(*x, *y, *z),
            LoopPoint::Coords(c) => match c.as_slice() {
                [x, y] => Point3D::new(*x, *y, 0.0),
                [x, y, z] => Point3D::new(*x, *y, *z),
                _ => {
                    return Err(TapeError::InvalidPoint(format!(
                        "expected 2 or 3 coordinates, got {}",
                        c.len()
                    )))
                }
            },
        };
        if p.coords.iter().all(|c| c.is_finite()) {
            Ok(p)
        } else {
            Err(TapeError::InvalidPoint(format!("non-finite coordinate {p:?}")))
        }
    }
}

impl From<Point3D> for LoopPoint {
    fn from(p: Point3D) -> Self {
        LoopPoint::Point(p)
    }
}

impl From<[f64; 3]> for LoopPoint {
    fn from([x, y, z]: [f64; 3]) -> Self {
        LoopPoint::Xyz { x, y, z }
    }
}

impl From<[f64; 2]> for LoopPoint {
    fn from([x, y]: [f64; 2]) -> Self {
        LoopPoint::Xyz { x, y, z: 0.0 }
    }
}

impl From<(f64, f64, f64)> for LoopPoint {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        LoopPoint::Xyz { x, y, z }
    }
}

/// Returns `true` when two points are within `tolerance` of each other.
pub fn coincident(a: &Point3D, b: &Point3D, tolerance: f64) -> bool {
    (a - b).norm() <= tolerance
}

/// Converts a point to a plain array for logs and reports.
pub fn to_array(p: &Point3D) -> [f64; 3] {
    [p.x, p.y, p.z]
}

/// One boundary edge of a cleaned loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: Point3D,
    pub end: Point3D,
    /// Position of the edge in the loop walk (edge `i` runs from point `i`).
    pub index: usize,
    /// Nearest loop point before `start`, used to mitre the start corner.
    pub before: Option<Point3D>,
    /// Nearest loop point after `end`, used to mitre the end corner.
    pub after: Option<Point3D>,
}

impl Segment {
    /// Creates an isolated segment with no neighbours (square ends).
    pub fn new(start: Point3D, end: Point3D) -> Self {
        Self {
            start,
            end,
            index: 0,
            before: None,
            after: None,
        }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    pub fn vector(&self) -> Vector3<f64> {
        self.end - self.start
    }

    /// Point at parameter `t` (0 = start, 1 = end).
    pub fn point_at(&self, t: f64) -> Point3D {
        self.start + self.vector() * t
    }

    /// Whether both segments join the same endpoints, in either direction,
    /// to within `tolerance`.
    pub fn same_edge(&self, other: &Segment, tolerance: f64) -> bool {
        let near = |a: &Point3D, b: &Point3D| coincident(a, b, tolerance);
        (near(&self.start, &other.start) && near(&self.end, &other.end))
            || (near(&self.start, &other.end) && near(&self.end, &other.start))
    }
}
