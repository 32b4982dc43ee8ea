// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adjacency repair.
//!
//! A band that genuinely overlaps a sibling is moved a small distance away
//! from it and rebuilt. Vertex adjustments are tried as an ordered chain of
//! named strategies; the first one that yields a valid loop is used.

use nalgebra::Vector3;
use serde::Serialize;
use tracing::{debug, warn};

use crate::adjacency::{survey, Adjacency};
use crate::band::normalize_orientation;
use crate::bounds::BoundingBox;
use crate::config::TapeConfig;
use crate::context::EngineContext;
use crate::elevator::{BandSnapshot, BandState};
use crate::error::{Result, StrategyFailure, TapeError};
use crate::host::HostKernel;
use crate::point::{coincident, to_array, Point3D};

/// A way of producing the rebuilt band's vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStrategy {
    /// Every vertex moved along the avoidance direction.
    Nudged,
    /// The band's current vertices, deduplicated.
    OriginalVertices,
}

impl RepairStrategy {
    /// Strategies in the order they are tried.
    pub const CHAIN: [RepairStrategy; 2] =
        [RepairStrategy::Nudged, RepairStrategy::OriginalVertices];

    pub fn name(self) -> &'static str {
        match self {
            RepairStrategy::Nudged => "nudged",
            RepairStrategy::OriginalVertices => "original_vertices",
        }
    }

    /// Produces the adjusted loop, or why it is unusable.
    pub fn apply(
        self,
        vertices: &[Point3D],
        direction: &Vector3<f64>,
        config: &TapeConfig,
    ) -> std::result::Result<Vec<Point3D>, String> {
        let candidate: Vec<Point3D> = match self {
            RepairStrategy::Nudged => vertices
                .iter()
                .map(|p| p + direction * config.nudge_distance)
                .collect(),
            RepairStrategy::OriginalVertices => vertices.to_vec(),
        };
        let unique = dedup_within(&candidate, config.tolerance);
        if unique.len() < 3 {
            return Err(format!("{} unique vertices", unique.len()));
        }
        Ok(unique)
    }
}

/// What repair did to a band.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RepairOutcome {
    NotNeeded {
        shared_boundaries: usize,
    },
    Repaired {
        strategy: RepairStrategy,
        conflicts: usize,
        shared_boundaries: usize,
        direction: [f64; 3],
    },
}

/// Classifies the band's neighbours and rebuilds it away from any overlap.
///
/// Returns the handle of the (possibly rebuilt) band. When every strategy
/// fails, or the host refuses the rebuilt face, the band is erased and
/// [`TapeError::RepairExhausted`] is returned.
pub fn repair_adjacency<H: HostKernel>(
    host: &mut H,
    ctx: &EngineContext<'_>,
    parent: H::Container,
    face: H::Face,
) -> Result<(H::Face, RepairOutcome)> {
    let records = survey(host, ctx, parent, face);
    let conflicts: Vec<H::Face> = records
        .iter()
        .filter(|r| r.class == Adjacency::RealConflict)
        .map(|r| r.sibling)
        .collect();
    let shared_boundaries = records.len() - conflicts.len();

    if conflicts.is_empty() {
        return Ok((face, RepairOutcome::NotNeeded { shared_boundaries }));
    }
    debug!(
        zone = ctx.zone,
        band = ?face,
        conflicts = conflicts.len(),
        state = ?BandState::NeedsRepair,
        "band overlaps existing geometry"
    );

    let band = format!("{face:?}");
    let Some(snapshot) = BandSnapshot::capture(host, face) else {
        host.erase(face);
        return Err(TapeError::RepairExhausted {
            band,
            attempts: vec![StrategyFailure::new("snapshot", "band has no readable vertices")],
        });
    };

    let direction = avoidance_direction(host, &conflicts, &snapshot.vertices, ctx.config.tolerance);

    let mut attempts = Vec::new();
    let mut adjusted = None;
    for strategy in RepairStrategy::CHAIN {
        match strategy.apply(&snapshot.vertices, &direction, ctx.config) {
            Ok(points) => {
                adjusted = Some((strategy, points));
                break;
            }
            Err(reason) => {
                debug!(
                    band = %band,
                    strategy = strategy.name(),
                    reason = %reason,
                    "repair strategy failed"
                );
                attempts.push(StrategyFailure::new(strategy.name(), reason));
            }
        }
    }

    // The old face goes first, so a failed rebuild leaves a gap, never a
    // stray overlapping band.
    host.erase(face);

    let rebuilt = match adjusted {
        Some((strategy, points)) => match host.create_planar_face(parent, &points) {
            Some(rebuilt) => Some((strategy, rebuilt)),
            None => {
                attempts.push(StrategyFailure::new(strategy.name(), "host refused rebuilt face"));
                None
            }
        },
        None => None,
    };

    let Some((strategy, rebuilt)) = rebuilt else {
        warn!(
            zone = ctx.zone,
            band = %band,
            state = ?BandState::Failed,
            attempts = attempts.len(),
            "adjacency repair exhausted"
        );
        return Err(TapeError::RepairExhausted { band, attempts });
    };

    snapshot.restore_materials(host, rebuilt);
    normalize_orientation(host, rebuilt);
    debug!(
        zone = ctx.zone,
        band = ?rebuilt,
        strategy = strategy.name(),
        direction = ?to_array(&Point3D::from(direction)),
        state = ?BandState::Repaired,
        "band rebuilt"
    );

    Ok((
        rebuilt,
        RepairOutcome::Repaired {
            strategy,
            conflicts: conflicts.len(),
            shared_boundaries,
            direction: [direction.x, direction.y, direction.z],
        },
    ))
}

/// Direction a conflicting band is moved in.
///
/// The reversed average of the conflicting siblings' normals, unless that is
/// degenerate or mostly vertical; then the dominant horizontal axis pointing
/// from the first sibling's bounds centre to the band's.
pub fn avoidance_direction<H: HostKernel>(
    host: &H,
    conflicts: &[H::Face],
    band_vertices: &[Point3D],
    tolerance: f64,
) -> Vector3<f64> {
    let normals: Vec<Vector3<f64>> =
        conflicts.iter().filter_map(|&f| host.face_normal(f)).collect();
    let band_center = BoundingBox::from_points(band_vertices).map(|b| b.center());
    let sibling_center = conflicts
        .first()
        .and_then(|&f| host.face_bounds(f))
        .map(|b| b.center());
    choose_direction(&normals, band_center, sibling_center, tolerance)
}

fn choose_direction(
    normals: &[Vector3<f64>],
    band_center: Option<Point3D>,
    sibling_center: Option<Point3D>,
    tolerance: f64,
) -> Vector3<f64> {
    if !normals.is_empty() {
        let sum = normals.iter().fold(Vector3::zeros(), |acc, n| acc + n);
        let average = sum / normals.len() as f64;
        if let Some(away) = (-average).try_normalize(1e-9) {
            if away.z.abs() <= away.x.abs().max(away.y.abs()) {
                return away;
            }
        }
    }

    let (Some(band), Some(sibling)) = (band_center, sibling_center) else {
        return Vector3::x();
    };
    let offset = band - sibling;
    if offset.x.hypot(offset.y) < tolerance {
        Vector3::x()
    } else if offset.x.abs() >= offset.y.abs() {
        Vector3::new(offset.x.signum(), 0.0, 0.0)
    } else {
        Vector3::new(0.0, offset.y.signum(), 0.0)
    }
}

/// Drops every point within `tolerance` of an earlier kept point.
fn dedup_within(points: &[Point3D], tolerance: f64) -> Vec<Point3D> {
    let mut kept: Vec<Point3D> = Vec::with_capacity(points.len());
    for p in points {
        if !kept.iter().any(|k| coincident(k, p, tolerance)) {
            kept.push(*p);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Vec<Point3D> {
        vec![
            Point3D::new(0.0, 0.0, 1.0),
            Point3D::new(10.0, 0.0, 1.0),
            Point3D::new(10.0, 5.0, 1.0),
            Point3D::new(0.0, 5.0, 1.0),
        ]
    }

    #[test]
    fn nudge_moves_every_vertex() {
        let config = TapeConfig::default();
        let moved = RepairStrategy::Nudged
            .apply(&square(), &Vector3::y(), &config)
            .unwrap();
        assert_eq!(moved.len(), 4);
        assert!(moved.iter().zip(square()).all(|(m, p)| m.y == p.y + 1.0));
    }

    #[test]
    fn strategies_reject_collapsed_loops() {
        let config = TapeConfig::default();
        let sliver = vec![
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(0.5, 0.0, 0.0),
            Point3D::new(10.0, 0.0, 0.0),
            Point3D::new(10.2, 0.3, 0.0),
        ];
        for strategy in RepairStrategy::CHAIN {
            assert_eq!(
                strategy.apply(&sliver, &Vector3::x(), &config),
                Err("2 unique vertices".to_string())
            );
        }
    }

    #[test]
    fn direction_from_vertical_sibling_normals() {
        let normals = [Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 1.0, 0.1)];
        let dir = choose_direction(&normals, None, None, 1.0);
        assert_relative_eq!(dir.y, -1.0, epsilon = 1e-2);
        assert_relative_eq!(dir.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn horizontal_siblings_fall_back_to_lateral_axis() {
        let up = [Vector3::z()];
        let dir = choose_direction(
            &up,
            Some(Point3D::new(5.0, 2.5, 1.0)),
            Some(Point3D::new(5.0, -14.75, 1.0)),
            1.0,
        );
        assert_eq!(dir, Vector3::y());

        let dir = choose_direction(
            &up,
            Some(Point3D::new(-20.0, 2.0, 1.0)),
            Some(Point3D::new(0.0, 0.0, 1.0)),
            1.0,
        );
        assert_eq!(dir, -Vector3::x());
    }

    #[test]
    fn indeterminate_direction_defaults_to_x() {
        let opposed = [Vector3::y(), -Vector3::y()];
        let center = Some(Point3D::new(1.0, 1.0, 0.0));
        assert_eq!(choose_direction(&opposed, center, center, 1.0), Vector3::x());
        assert_eq!(choose_direction(&[], None, None, 1.0), Vector3::x());
    }
}
