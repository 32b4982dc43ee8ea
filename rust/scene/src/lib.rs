// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # FloorTape Scene
//!
//! In-memory scene document used as the reference host for tape generation.
//!
//! Planar faces, groups, materials and attribute dictionaries are stored in
//! slot maps inside a [`SceneArena`]. Faces own their vertices, groups form a
//! tree under a single root, and materials are unique by name. The arena
//! offers the editing primitives a modelling host usually exposes: face
//! creation, translation, push/pull, per-side painting, ray tests and
//! group explode.

pub mod arena;
pub mod construction;
pub mod dictionary;
pub mod error;
pub mod geometry;
pub mod keys;
pub mod material;
pub mod serialization;
pub mod transform;

pub use arena::{Color, FaceData, GroupData, MaterialData, SceneArena, Side};
pub use dictionary::{DictValue, Dictionary};
pub use error::{Error, Result};
pub use geometry::{newell_normal, RayHit};
pub use keys::{EntityKey, FaceKey, GroupKey, MaterialKey, VertexKey};
pub use serialization::{FaceSnapshot, GroupSnapshot, SceneSnapshot};
