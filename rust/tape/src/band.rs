// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Band geometry and per-segment band construction.
//!
//! A band is the planar quad between two lines parallel to its segment, at
//! lateral offsets `near` and `far`. Its ends are mitred against the
//! neighbouring loop edges so that consecutive bands of a loop meet along a
//! shared diagonal instead of overlapping at the corner.

use nalgebra::Vector3;
use tracing::{debug, warn};

use crate::config::{Placement, TapeConfig};
use crate::context::EngineContext;
use crate::elevator::{elevate, BandState};
use crate::error::{Result, TapeError};
use crate::extrude::{extrude_band, ExtrusionReport};
use crate::host::{AttributeValue, HostKernel};
use crate::loop_cleaner::{signed_area_xy, Winding};
use crate::material;
use crate::point::{to_array, Point3D, Segment};
use crate::repair::{repair_adjacency, RepairOutcome};

/// Corners whose neighbours fold back sharper than this get a square end.
const FLAT_CAP_COS: f64 = -0.98;

/// Attribute keys stored on finished bands.
pub const ROLE_KEY: &str = "role";
pub const ZONE_KEY: &str = "zone";
pub const SEGMENT_KEY: &str = "segment";
/// Value of [`ROLE_KEY`] on every band.
pub const ROLE_TAPE: &str = "tape";

/// Lateral placement of a band relative to its segment, in the XY plane.
#[derive(Debug, Clone, PartialEq)]
pub struct BandFrame {
    pub segment: Segment,
    /// Unit XY direction from start to end.
    pub direction: Vector3<f64>,
    /// Unit XY direction from the segment towards the band.
    pub lateral: Vector3<f64>,
    pub near: f64,
    pub far: f64,
    /// +1 when `lateral` is the left-hand normal of the walk, −1 otherwise.
    side: f64,
}

impl BandFrame {
    /// Returns `None` for segments without horizontal extent.
    pub fn new(segment: &Segment, config: &TapeConfig, winding: Winding) -> Option<Self> {
        let direction = xy_unit(&segment.vector())?;
        let side = match (config.placement, winding) {
            (Placement::Centered, _)
            | (Placement::Inside, Winding::CounterClockwise)
            | (Placement::Outside, Winding::Clockwise) => 1.0,
            _ => -1.0,
        };
        let (near, far) = match config.placement {
            Placement::Centered => (-config.band_width / 2.0, config.band_width / 2.0),
            Placement::Inside | Placement::Outside => (0.0, config.band_width),
        };

        Some(Self {
            segment: segment.clone(),
            direction,
            lateral: left_normal(&direction) * side,
            near,
            far,
            side,
        })
    }

    pub fn width(&self) -> f64 {
        self.far - self.near
    }

    /// The four band corners `[start near, end near, end far, start far]`.
    pub fn corners(&self, miter_limit: f64) -> [Point3D; 4] {
        let square = self.lateral;
        let start_miter = self
            .segment
            .before
            .and_then(|b| self.miter(&b, &self.segment.start, miter_limit))
            .unwrap_or(square);
        let end_miter = self
            .segment
            .after
            .and_then(|a| self.miter(&self.segment.end, &a, miter_limit))
            .unwrap_or(square);

        let mitred = self.quad(&start_miter, &end_miter);
        if self.is_inverted(&mitred) {
            debug!(segment = self.segment.index, "miters invert the band, using square ends");
            return self.quad(&square, &square);
        }
        mitred
    }

    fn quad(&self, start_miter: &Vector3<f64>, end_miter: &Vector3<f64>) -> [Point3D; 4] {
        let (s, e) = (self.segment.start, self.segment.end);
        [
            s + start_miter * self.near,
            e + end_miter * self.near,
            e + end_miter * self.far,
            s + start_miter * self.far,
        ]
    }

    /// Miter vector for the corner between this band and the neighbouring
    /// edge `from → to`; it meets both offset lines at unit offset.
    fn miter(&self, from: &Point3D, to: &Point3D, miter_limit: f64) -> Option<Vector3<f64>> {
        let neighbour = left_normal(&xy_unit(&(to - from))?) * self.side;
        let cos = neighbour.dot(&self.lateral);
        if cos < FLAT_CAP_COS {
            return None;
        }
        let miter = (neighbour + self.lateral) / (1.0 + cos);
        let reach = self.near.abs().max(self.far.abs());
        (miter.norm() * reach <= miter_limit * self.width()).then_some(miter)
    }

    /// Either long edge running backwards means the miters crossed.
    fn is_inverted(&self, q: &[Point3D; 4]) -> bool {
        (q[1] - q[0]).dot(&self.direction) <= 0.0 || (q[2] - q[3]).dot(&self.direction) <= 0.0
    }
}

fn xy_unit(v: &Vector3<f64>) -> Option<Vector3<f64>> {
    Vector3::new(v.x, v.y, 0.0).try_normalize(1e-12)
}

fn left_normal(direction: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(-direction.y, direction.x, 0.0)
}

/// A band that made it through construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Band<F> {
    pub face: F,
    pub state: BandState,
    pub repair: RepairOutcome,
    pub extrusion: Option<ExtrusionReport>,
    /// Why the band is uncolored, if material assignment failed.
    pub uncolored: Option<String>,
}

/// Creates, elevates, repairs, colors and tags the band for one segment.
///
/// Any error leaves no band geometry behind.
pub fn build_band<H: HostKernel>(
    host: &mut H,
    ctx: &EngineContext<'_>,
    parent: H::Container,
    frame: &BandFrame,
) -> Result<Band<H::Face>> {
    let config = ctx.config;
    let segment = &frame.segment;

    let mut corners = frame.corners(config.miter_limit).to_vec();
    if signed_area_xy(&corners) < 0.0 {
        corners.reverse();
    }
    let face = host
        .create_planar_face(parent, &corners)
        .ok_or(TapeError::FaceCreationFailure {
            start: to_array(&segment.start),
            end: to_array(&segment.end),
        })?;
    debug!(
        zone = ctx.zone,
        segment = segment.index,
        band = ?face,
        state = ?BandState::Created,
        "band created"
    );

    let face = elevate(host, ctx, parent, face)?;
    debug!(
        zone = ctx.zone,
        segment = segment.index,
        band = ?face,
        state = ?BandState::Elevated,
        "band elevated"
    );

    let (face, repair) = repair_adjacency(host, ctx, parent, face)?;
    let state = match repair {
        RepairOutcome::NotNeeded { .. } => BandState::Clean,
        RepairOutcome::Repaired { .. } => BandState::Repaired,
    };

    let extrusion = config
        .extrude_bands
        .then(|| extrude_band(host, ctx, parent, face));

    let uncolored = match material::apply(host, config, face) {
        Ok(_) => None,
        Err(err) => {
            warn!(
                zone = ctx.zone,
                segment = segment.index,
                band = ?face,
                error = %err,
                "band left uncolored"
            );
            Some(err.to_string())
        }
    };

    tag_band(host, ctx, face, segment.index);
    debug!(zone = ctx.zone, segment = segment.index, band = ?face, state = ?state, "band finished");

    Ok(Band {
        face,
        state,
        repair,
        extrusion,
        uncolored,
    })
}

/// Flips a face whose normal points downward. Returns `true` if flipped.
pub fn normalize_orientation<H: HostKernel>(host: &mut H, face: H::Face) -> bool {
    match host.face_normal(face) {
        Some(n) if n.z < 0.0 => host.reverse_face(face),
        _ => false,
    }
}

fn tag_band<H: HostKernel>(host: &mut H, ctx: &EngineContext<'_>, face: H::Face, index: usize) {
    let tags = [
        (ROLE_KEY, AttributeValue::Text(ROLE_TAPE.into())),
        (ZONE_KEY, AttributeValue::Text(ctx.zone.into())),
        (SEGMENT_KEY, AttributeValue::Int(index as i64)),
    ];
    for (key, value) in tags {
        if !host.set_attribute(face, key, value) {
            warn!(band = ?face, key, "host refused band attribute");
        }
    }
}
