// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loop cleanup and segment extraction.
//!
//! Raw loops arrive with repeated points, an explicitly repeated closing
//! point, mixed point forms and occasionally revisited edges. [`clean`] turns
//! them into a loop of distinct points; [`extract_segments`] walks that loop
//! and emits each undirected edge at most once.

use tracing::{debug, warn};

use crate::error::{Result, TapeError};
use crate::point::{coincident, to_array, LoopPoint, Point3D, Segment};

/// Orientation of a loop seen from above (+Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}

/// Normalizes a raw point sequence into a closed loop of distinct points.
///
/// Consecutive points within `tolerance` are merged into the first one,
/// and a repeated closing point is dropped. Fewer than 3 remaining points is
/// an [`TapeError::InsufficientPoints`] error.
pub fn clean(points: &[LoopPoint], tolerance: f64) -> Result<Vec<Point3D>> {
    let mut cleaned: Vec<Point3D> = Vec::with_capacity(points.len());
    for raw in points {
        let p = raw.to_point()?;
        match cleaned.last() {
            Some(last) if coincident(last, &p, tolerance) => {}
            _ => cleaned.push(p),
        }
    }

    // Closing point repeated (possibly several times)
    while cleaned.len() > 1 {
        let (first, last) = (cleaned[0], cleaned[cleaned.len() - 1]);
        if !coincident(&first, &last, tolerance) {
            break;
        }
        cleaned.pop();
    }

    if cleaned.len() < 3 {
        warn!(
            input = points.len(),
            remaining = cleaned.len(),
            "loop has fewer than 3 distinct points, skipping"
        );
        return Err(TapeError::InsufficientPoints {
            count: cleaned.len(),
        });
    }

    let n = cleaned.len();
    for i in 0..n {
        let (a, b) = (&cleaned[i], &cleaned[(i + 1) % n]);
        if coincident(a, b, tolerance) {
            warn!(
                index = i,
                a = ?to_array(a),
                b = ?to_array(b),
                "cleaned loop still has near-coincident neighbours"
            );
        }
    }

    Ok(cleaned)
}

/// Walks the loop (including the closing edge) and returns its segments.
///
/// Edges whose endpoints are [`coincident`] are skipped. An edge already
/// emitted in either direction during this call, within `tolerance`, is
/// skipped as a duplicate.
pub fn extract_segments(points: &[Point3D], tolerance: f64) -> Vec<Segment> {
    let n = points.len();
    let mut segments: Vec<Segment> = Vec::with_capacity(n);
    if n < 2 {
        return segments;
    }

    for i in 0..n {
        let start = points[i];
        let end = points[(i + 1) % n];

        if coincident(&start, &end, tolerance) {
            debug!(index = i, at = ?to_array(&start), "skipping zero-length edge");
            continue;
        }

        let segment = Segment {
            start,
            end,
            index: i,
            before: neighbour(points, i, tolerance, Step::Back),
            after: neighbour(points, (i + 1) % n, tolerance, Step::Forward),
        };

        if segments.iter().any(|s| s.same_edge(&segment, tolerance)) {
            debug!(
                index = i,
                start = ?to_array(&start),
                end = ?to_array(&end),
                "skipping duplicate edge"
            );
            continue;
        }
        segments.push(segment);
    }

    segments
}

/// Signed area of the loop projected onto the XY plane (positive for CCW).
pub fn signed_area_xy(points: &[Point3D]) -> f64 {
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice / 2.0
}

/// Orientation of the loop seen from above. Degenerate loops count as CCW.
pub fn winding(points: &[Point3D]) -> Winding {
    if signed_area_xy(points) < 0.0 {
        Winding::Clockwise
    } else {
        Winding::CounterClockwise
    }
}

enum Step {
    Back,
    Forward,
}

/// Nearest loop point more than `tolerance` away from `points[from]`.
fn neighbour(points: &[Point3D], from: usize, tolerance: f64, step: Step) -> Option<Point3D> {
    let n = points.len();
    let origin = points[from];
    (1..n)
        .map(|k| match step {
            Step::Back => points[(from + n - k) % n],
            Step::Forward => points[(from + k) % n],
        })
        .find(|p| !coincident(p, &origin, tolerance))
}
