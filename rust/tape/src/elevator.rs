// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertical elevation of freshly created bands.
//!
//! A band is lifted by the configured elevation so it does not z-fight with
//! the surface it traces. If the host cannot move it, the band is rebuilt at
//! the target height from a snapshot taken before the move.

use nalgebra::Vector3;
use serde::Serialize;
use tracing::warn;

use crate::context::EngineContext;
use crate::error::{Result, TapeError};
use crate::host::{FaceSide, HostKernel};
use crate::point::Point3D;

/// Lifecycle of a band through construction.
///
/// `Created → Elevated → (Clean | NeedsRepair) → Repaired | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BandState {
    Created,
    Elevated,
    Clean,
    NeedsRepair,
    Repaired,
    Failed,
}

/// Vertex positions and materials of a band, captured before mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSnapshot<M> {
    pub vertices: Vec<Point3D>,
    pub front: Option<M>,
    pub back: Option<M>,
}

impl<M: Copy> BandSnapshot<M> {
    pub fn capture<H>(host: &H, face: H::Face) -> Option<Self>
    where
        H: HostKernel<Material = M>,
    {
        Some(Self {
            vertices: host.face_vertices(face)?,
            front: host.face_material(face, FaceSide::Front),
            back: host.face_material(face, FaceSide::Back),
        })
    }

    /// Paints the captured materials onto `face`.
    pub fn restore_materials<H>(&self, host: &mut H, face: H::Face)
    where
        H: HostKernel<Material = M>,
    {
        for (side, material) in [(FaceSide::Front, self.front), (FaceSide::Back, self.back)] {
            if material.is_some() && !host.set_face_material(face, side, material) {
                warn!(band = ?face, ?side, "could not restore band material");
            }
        }
    }
}

/// Moves a band up by the configured elevation.
///
/// Returns the handle holding the elevated band. On failure the band is
/// erased and [`TapeError::TransformFailure`] is returned.
pub fn elevate<H: HostKernel>(
    host: &mut H,
    ctx: &EngineContext<'_>,
    parent: H::Container,
    face: H::Face,
) -> Result<H::Face> {
    let band = format!("{face:?}");
    let Some(snapshot) = BandSnapshot::capture(host, face) else {
        host.erase(face);
        return Err(TapeError::TransformFailure {
            band,
            detail: "band has no readable vertices".into(),
        });
    };

    let offset = Vector3::new(0.0, 0.0, ctx.config.elevation);
    let moved = host
        .translate(&[face], &offset)
        .and_then(|faces| faces.first().copied())
        .filter(|&f| host.is_valid(f));
    if let Some(moved) = moved {
        return Ok(moved);
    }

    warn!(
        zone = ctx.zone,
        band = %band,
        "translation returned no usable geometry, rebuilding from snapshot"
    );
    if host.is_valid(face) {
        host.erase(face);
    }

    let lifted: Vec<Point3D> = snapshot.vertices.iter().map(|p| p + offset).collect();
    match host.create_planar_face(parent, &lifted) {
        Some(rebuilt) => {
            snapshot.restore_materials(host, rebuilt);
            Ok(rebuilt)
        }
        None => {
            warn!(
                zone = ctx.zone,
                band = %band,
                state = ?BandState::Failed,
                "snapshot rebuild refused"
            );
            Err(TapeError::TransformFailure {
                band,
                detail: "translation failed and the snapshot rebuild was refused".into(),
            })
        }
    }
}
