// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adjacency scan and classification.
//!
//! Finds sibling faces near a band and tells an ordinary shared edge apart
//! from a genuine overlap. Only overlaps are handed to repair.

use serde::Serialize;
use tracing::debug;

use crate::band::ROLE_KEY;
use crate::bounds::{AxisRelation, BoundingBox};
use crate::config::TapeConfig;
use crate::context::EngineContext;
use crate::extrude::ROLE_TAPE_SOLID;
use crate::host::{AttributeValue, HostKernel};
use crate::point::{coincident, Point3D};

/// Classification of a band / sibling pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjacency {
    /// The faces meet along a boundary (or not at all); nothing to repair.
    SharedBoundary,
    /// The faces overlap and the band must move.
    RealConflict,
}

/// A sibling face close enough to the band to be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjacencyRecord<F> {
    pub band: F,
    pub sibling: F,
    pub class: Adjacency,
}

/// Faces of `parent` (other than `band`) whose bounds, grown by the
/// adjacency tolerance, intersect the band's bounds. Caps and sides of
/// extruded bands are never neighbours.
pub fn scan<H: HostKernel>(
    host: &H,
    config: &TapeConfig,
    parent: H::Container,
    band: H::Face,
) -> Vec<H::Face> {
    let Some(band_box) = host.face_bounds(band) else {
        return Vec::new();
    };
    let solid = AttributeValue::Text(ROLE_TAPE_SOLID.into());

    host.faces_in(parent)
        .into_iter()
        .filter(|&f| f != band)
        .filter(|&f| host.get_attribute(f, ROLE_KEY).as_ref() != Some(&solid))
        .filter(|&f| {
            host.face_bounds(f).is_some_and(|b| {
                b.expanded(config.adjacency_tolerance).intersects(&band_box)
            })
        })
        .collect()
}

/// Scans and classifies every neighbour of `band`.
pub fn survey<H: HostKernel>(
    host: &H,
    ctx: &EngineContext<'_>,
    parent: H::Container,
    band: H::Face,
) -> Vec<AdjacencyRecord<H::Face>> {
    let Some(band_points) = host.face_vertices(band) else {
        return Vec::new();
    };

    scan(host, ctx.config, parent, band)
        .into_iter()
        .filter_map(|sibling| {
            let sibling_points = host.face_vertices(sibling)?;
            let class = classify(&band_points, &sibling_points, ctx.config);
            debug!(zone = ctx.zone, band = ?band, sibling = ?sibling, class = ?class, "adjacency");
            Some(AdjacencyRecord {
                band,
                sibling,
                class,
            })
        })
        .collect()
}

/// Classifies a band against one sibling from their vertex loops.
pub fn classify(band: &[Point3D], sibling: &[Point3D], config: &TapeConfig) -> Adjacency {
    let (Some(band_box), Some(sibling_box)) =
        (BoundingBox::from_points(band), BoundingBox::from_points(sibling))
    else {
        return Adjacency::SharedBoundary;
    };
    let tol = config.tolerance;

    let shared_vertices = band
        .iter()
        .filter(|p| sibling.iter().any(|q| coincident(p, q, tol)))
        .count();

    if shared_vertices == 0 {
        let reach = sibling_box.expanded(config.adjacency_tolerance);
        return if band.iter().any(|p| reach.contains(p)) {
            Adjacency::RealConflict
        } else {
            Adjacency::SharedBoundary
        };
    }

    if config.edge_coincidence_check && shares_edge(band, sibling, tol) {
        return Adjacency::SharedBoundary;
    }

    if touches_on_one_axis(&band_box, &sibling_box, tol) {
        Adjacency::SharedBoundary
    } else {
        Adjacency::RealConflict
    }
}

/// True when the loops share a full edge and lie on opposite sides of it.
fn shares_edge(band: &[Point3D], sibling: &[Point3D], tol: f64) -> bool {
    let (n, m) = (band.len(), sibling.len());
    let band_centroid = centroid(band);
    let sibling_centroid = centroid(sibling);

    (0..n).any(|i| {
        let (a, b) = (band[i], band[(i + 1) % n]);
        let ia = sibling.iter().position(|q| coincident(q, &a, tol));
        let ib = sibling.iter().position(|q| coincident(q, &b, tol));
        let (Some(ia), Some(ib)) = (ia, ib) else {
            return false;
        };
        if (ia + 1) % m != ib && (ib + 1) % m != ia {
            return false;
        }

        let edge = b - a;
        let band_side = edge.cross(&(band_centroid - a));
        let sibling_side = edge.cross(&(sibling_centroid - a));
        band_side.dot(&sibling_side) < 0.0
    })
}

/// Bounding boxes touch along exactly one axis. Axes on which both boxes
/// are flat (their common plane) are not counted.
fn touches_on_one_axis(a: &BoundingBox, b: &BoundingBox, tol: f64) -> bool {
    let mut touching = 0;
    for axis in 0..3 {
        if a.is_flat(axis, tol) && b.is_flat(axis, tol) {
            continue;
        }
        match a.axis_relation(b, axis, tol) {
            AxisRelation::Touching => touching += 1,
            AxisRelation::Separated => return false,
            AxisRelation::Overlapping => {}
        }
    }
    touching == 1
}

fn centroid(points: &[Point3D]) -> Point3D {
    let sum = points.iter().fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.coords);
    Point3D::from(sum / points.len().max(1) as f64)
}
