// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Idempotent tape material assignment.

use tracing::{debug, warn};

use crate::config::TapeConfig;
use crate::error::{Result, TapeError};
use crate::host::{FaceSide, HostKernel};

/// Paints `face` with the configured tape material.
///
/// The front side is always painted; the back side only in volumetric mode.
/// A mismatch on read-back is logged, not returned. The host view is
/// refreshed on success.
pub fn apply<H: HostKernel>(
    host: &mut H,
    config: &TapeConfig,
    face: H::Face,
) -> Result<H::Material> {
    let material = ensure_material(host, config)?;

    if !host.set_face_material(face, FaceSide::Front, Some(material)) {
        return Err(TapeError::MaterialFailure(format!(
            "host refused front material on {face:?}"
        )));
    }
    if config.volumetric_mode && !host.set_face_material(face, FaceSide::Back, Some(material)) {
        return Err(TapeError::MaterialFailure(format!(
            "host refused back material on {face:?}"
        )));
    }

    let assigned = host.face_material(face, FaceSide::Front);
    if assigned != Some(material) {
        warn!(band = ?face, expected = ?material, found = ?assigned, "material read-back mismatch");
    }

    host.refresh_view();
    Ok(material)
}

/// Finds or creates the tape material and makes sure it carries the
/// configured colour.
pub fn ensure_material<H: HostKernel>(host: &mut H, config: &TapeConfig) -> Result<H::Material> {
    let material = match host.find_material(&config.material_name) {
        Some(existing) => {
            if !host.set_material_color(existing, config.color) {
                warn!(material = %config.material_name, "could not re-assert material colour");
            }
            existing
        }
        None => create(host, config)?,
    };

    if host.material_is_valid(material) {
        return Ok(material);
    }

    warn!(material = %config.material_name, "material failed validation, recreating");
    host.remove_material(material);
    let material = create(host, config)?;
    if host.material_is_valid(material) {
        Ok(material)
    } else {
        Err(TapeError::MaterialFailure(format!(
            "material {:?} is invalid after recreation",
            config.material_name
        )))
    }
}

fn create<H: HostKernel>(host: &mut H, config: &TapeConfig) -> Result<H::Material> {
    let material = host
        .create_material(&config.material_name, config.color)
        .ok_or_else(|| {
            TapeError::MaterialFailure(format!(
                "host refused to create material {:?}",
                config.material_name
            ))
        })?;
    if !host.clear_material_texture(material) {
        debug!(material = %config.material_name, "could not clear material texture");
    }
    Ok(material)
}
