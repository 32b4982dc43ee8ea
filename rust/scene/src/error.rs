// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for scene operations.

use crate::keys::{FaceKey, GroupKey, MaterialKey};

/// Result type alias for scene operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing a scene.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Face key not found in the arena (never created or already erased).
    #[error("face not found: {0:?}")]
    FaceNotFound(FaceKey),

    /// Group key not found in the arena.
    #[error("group not found: {0:?}")]
    GroupNotFound(GroupKey),

    /// Material key not found in the registry.
    #[error("material not found: {0:?}")]
    MaterialNotFound(MaterialKey),

    /// A face needs at least three distinct points.
    #[error("face needs at least 3 distinct points, got {0}")]
    TooFewPoints(usize),

    /// All face points lie on one line.
    #[error("face points are collinear")]
    Collinear,

    /// A face point lies off the plane of the others.
    #[error("face points are not coplanar (deviation {0:.6})")]
    NonPlanar(f64),

    /// A coordinate is NaN or infinite.
    #[error("non-finite coordinate in face input")]
    NonFinite,

    /// Push/pull distance is zero or not finite.
    #[error("push/pull distance must be finite and non-zero, got {0}")]
    InvalidDistance(f64),

    /// A material with this name is already registered.
    #[error("material name already in use: {0}")]
    DuplicateMaterial(String),

    /// The root group cannot be erased or exploded.
    #[error("operation not allowed on the root group")]
    RootGroup,

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
