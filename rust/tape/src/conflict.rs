// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ray-sampled obstruction test for a band's volume.
//!
//! The band volume is the thin box between the elevated band plane and the
//! same plane raised by the band thickness. At each of `K` interior
//! positions along the band, four rays cross it: one vertical ray at each
//! lateral edge and one lateral ray across the bottom and the top face. A
//! final ray runs down through the middle of the volume. A hit counts only
//! when it lies within the ray's own length.

use nalgebra::Vector3;
use tracing::debug;

use crate::band::BandFrame;
use crate::context::EngineContext;
use crate::host::HostKernel;
use crate::point::{to_array, Point3D};

/// One sample ray and its result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConflictSample {
    pub origin: Point3D,
    pub target: Point3D,
    /// Distance to the nearest hit along the ray, if the host reported one.
    pub hit: Option<f64>,
}

impl ConflictSample {
    pub fn length(&self) -> f64 {
        (self.target - self.origin).norm()
    }

    /// A hit counts when it is no further than the ray length plus `epsilon`.
    pub fn in_range(&self, epsilon: f64) -> bool {
        self.hit.is_some_and(|d| d <= self.length() + epsilon)
    }
}

/// The sample rays for a band volume as `(origin, target)` pairs.
pub fn sample_rays(
    frame: &BandFrame,
    elevation: f64,
    thickness: f64,
    count: usize,
) -> Vec<(Point3D, Point3D)> {
    let lift = |p: Point3D, dz: f64| p + Vector3::new(0.0, 0.0, dz);
    let bottom = elevation;
    let top = elevation + thickness;

    let mut rays = Vec::with_capacity(count * 4 + 1);
    for k in 0..count {
        let t = (k + 1) as f64 / (count + 1) as f64;
        let axis = frame.segment.point_at(t);
        let near = axis + frame.lateral * frame.near;
        let far = axis + frame.lateral * frame.far;

        rays.push((lift(near, bottom), lift(near, top)));
        rays.push((lift(far, bottom), lift(far, top)));
        rays.push((lift(near, bottom), lift(far, bottom)));
        rays.push((lift(near, top), lift(far, top)));
    }

    let center = frame.segment.point_at(0.5) + frame.lateral * ((frame.near + frame.far) / 2.0);
    rays.push((lift(center, top), lift(center, bottom)));
    rays
}

/// Casts every sample ray for the band. Zero-length rays are skipped.
pub fn cast_samples<H: HostKernel>(
    host: &H,
    ctx: &EngineContext<'_>,
    frame: &BandFrame,
) -> Vec<ConflictSample> {
    let config = ctx.config;
    sample_rays(frame, config.elevation, config.thickness, config.sample_count)
        .into_iter()
        .filter(|(origin, target)| (target - origin).norm() > f64::EPSILON)
        .map(|(origin, target)| ConflictSample {
            origin,
            target,
            hit: host.raytest(&origin, &(target - origin)).map(|h| h.distance),
        })
        .collect()
}

/// Number of in-range hits in the band volume; 0 when detection is disabled.
///
/// All rays are cast even after the first hit.
pub fn conflict_hits<H: HostKernel>(
    host: &H,
    ctx: &EngineContext<'_>,
    frame: &BandFrame,
) -> usize {
    if !ctx.config.conflict_detection {
        return 0;
    }

    let samples = cast_samples(host, ctx, frame);
    let hits = samples
        .iter()
        .filter(|s| s.in_range(ctx.config.ray_epsilon))
        .inspect(|s| {
            debug!(
                zone = ctx.zone,
                segment = frame.segment.index,
                origin = ?to_array(&s.origin),
                target = ?to_array(&s.target),
                distance = ?s.hit,
                "conflict ray hit"
            )
        })
        .count();
    debug!(
        zone = ctx.zone,
        segment = frame.segment.index,
        rays = samples.len(),
        hits,
        "conflict sampling done"
    );
    hits
}

/// Whether existing geometry obstructs the band volume.
pub fn has_conflict<H: HostKernel>(host: &H, ctx: &EngineContext<'_>, frame: &BandFrame) -> bool {
    conflict_hits(host, ctx, frame) > 0
}
