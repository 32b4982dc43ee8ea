// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric queries on scene faces.
//!
//! Computes normals, areas, centroids, bounding boxes and ray hits using
//! standard computational geometry algorithms (no external kernel required).

use nalgebra::{Point3, Vector3};

use crate::arena::SceneArena;
use crate::keys::*;

/// Points closer than this are treated as the same point when building faces.
pub const POINT_EPSILON: f64 = 1e-9;

/// Maximum distance of a face point from the face plane.
pub const PLANE_TOLERANCE: f64 = 1e-6;

/// Result of a successful ray test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub face: FaceKey,
    pub point: Point3<f64>,
    /// Distance from the ray origin to `point`.
    pub distance: f64,
}

/// Computes a unit polygon normal using Newell's method.
///
/// Works for any planar polygon (convex or concave). The normal direction
/// follows the right-hand rule relative to the winding order. Returns `None`
/// for degenerate (zero-area) input.
pub fn newell_normal(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    if points.len() < 3 {
        return None;
    }

    let mut normal = Vector3::new(0.0, 0.0, 0.0);
    let n = points.len();

    for i in 0..n {
        let curr = points[i];
        let next = points[(i + 1) % n];

        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }

    let len = normal.norm();
    if len < 1e-12 {
        return None; // degenerate polygon
    }

    Some(normal / len)
}

/// Drops consecutive points closer than `epsilon`, including a repeated
/// closing point.
pub fn strip_repeated(points: &[Point3<f64>], epsilon: f64) -> Vec<Point3<f64>> {
    let mut out: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().map_or(true, |last| (p - last).norm() > epsilon) {
            out.push(*p);
        }
    }
    while out.len() > 1 && (out[out.len() - 1] - out[0]).norm() <= epsilon {
        out.pop();
    }
    out
}

impl SceneArena {
    /// Returns the 3D position of a vertex as a nalgebra Point3.
    pub fn vertex_point(&self, key: VertexKey) -> Option<Point3<f64>> {
        self.vertices
            .get(key)
            .map(|v| Point3::new(v.x, v.y, v.z))
    }

    /// Returns the outer loop of a face as points, in winding order.
    pub fn face_points(&self, key: FaceKey) -> Option<Vec<Point3<f64>>> {
        let face = self.faces.get(key)?;
        face.outer.iter().map(|&vk| self.vertex_point(vk)).collect()
    }

    /// Computes the unit face normal (right-hand rule on the outer loop).
    pub fn face_normal(&self, key: FaceKey) -> Option<Vector3<f64>> {
        newell_normal(&self.face_points(key)?)
    }

    /// Computes the area of a face using the cross-product triangle fan method.
    pub fn face_area(&self, key: FaceKey) -> Option<f64> {
        let pts = self.face_points(key)?;
        if pts.len() < 3 {
            return Some(0.0);
        }

        let p0 = pts[0];
        let mut total = Vector3::new(0.0, 0.0, 0.0);
        for i in 1..pts.len() - 1 {
            total += (pts[i] - p0).cross(&(pts[i + 1] - p0));
        }

        Some(total.norm() / 2.0)
    }

    /// Computes the vertex centroid of a face.
    pub fn face_centroid(&self, key: FaceKey) -> Option<Point3<f64>> {
        let pts = self.face_points(key)?;
        if pts.is_empty() {
            return None;
        }

        let sum = pts
            .iter()
            .fold(Vector3::new(0.0, 0.0, 0.0), |acc, p| acc + p.coords);
        Some(Point3::from(sum / pts.len() as f64))
    }

    /// Returns the axis-aligned bounding box of a face as `(min, max)`.
    pub fn face_bounds(&self, key: FaceKey) -> Option<(Point3<f64>, Point3<f64>)> {
        let pts = self.face_points(key)?;
        let first = *pts.first()?;

        let mut min = first;
        let mut max = first;
        for p in &pts[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some((min, max))
    }

    /// Triangulates a face into point triples.
    ///
    /// Uses ear-clipping via projection onto the face's dominant plane.
    pub fn triangulate_face(&self, key: FaceKey) -> Option<Vec<[Point3<f64>; 3]>> {
        let pts = self.face_points(key)?;
        if pts.len() < 3 {
            return None;
        }
        if pts.len() == 3 {
            return Some(vec![[pts[0], pts[1], pts[2]]]);
        }

        let normal = newell_normal(&pts)?;

        // Determine dominant axis for 2D projection
        let abs_n = Vector3::new(normal.x.abs(), normal.y.abs(), normal.z.abs());
        let (ax_u, ax_v) = if abs_n.z >= abs_n.x && abs_n.z >= abs_n.y {
            (0, 1) // project onto XY
        } else if abs_n.y >= abs_n.x {
            (0, 2) // project onto XZ
        } else {
            (1, 2) // project onto YZ
        };

        let mut coords_2d: Vec<f64> = Vec::with_capacity(pts.len() * 2);
        for p in &pts {
            let c = [p.x, p.y, p.z];
            coords_2d.push(c[ax_u]);
            coords_2d.push(c[ax_v]);
        }

        let indices = earcutr::earcut(&coords_2d, &[], 2).ok()?;

        Some(
            indices
                .chunks_exact(3)
                .map(|c| [pts[c[0]], pts[c[1]], pts[c[2]]])
                .collect(),
        )
    }

    /// Casts a ray against every face in the document and returns the
    /// nearest hit in front of the origin.
    ///
    /// `direction` does not need to be normalized; `RayHit::distance` is
    /// always a Euclidean distance.
    pub fn ray_test(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Option<RayHit> {
        let len = direction.norm();
        if len < 1e-15 {
            return None;
        }
        let dir = direction / len;

        let mut best: Option<RayHit> = None;
        for fk in self.faces.keys() {
            let Some(triangles) = self.triangulate_face(fk) else {
                continue;
            };
            for [v0, v1, v2] in &triangles {
                if let Some(t) = ray_triangle_distance(origin, &dir, v0, v1, v2) {
                    if best.map_or(true, |b| t < b.distance) {
                        best = Some(RayHit {
                            face: fk,
                            point: origin + dir * t,
                            distance: t,
                        });
                    }
                }
            }
        }

        best
    }
}

/// Möller–Trumbore ray-triangle intersection.
///
/// Casts a ray from `origin` along `dir` and returns the ray parameter of
/// the hit on triangle (v0, v1, v2), if any. With a unit `dir` the
/// parameter is the hit distance.
fn ray_triangle_distance(
    origin: &Point3<f64>,
    dir: &Vector3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = dir.cross(&edge2);
    let a = edge1.dot(&h);

    if a.abs() < 1e-12 {
        return None; // ray parallel to triangle
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(&h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * dir.dot(&q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > 1e-9).then_some(t) // intersection is in front of origin
}
