// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for arena-based scene storage.
//!
//! Every scene entity gets a unique, type-safe key for O(1) lookup in the
//! arena. Keys are created by `slotmap::SlotMap` and stay valid after other
//! entities are erased (generational indices), so an erased face can be
//! detected instead of silently aliasing a newer one.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a vertex (point in 3D space owned by exactly one face).
    pub struct VertexKey;

    /// Key for a planar face bounded by a single outer loop.
    pub struct FaceKey;

    /// Key for a group (container of faces and nested groups).
    pub struct GroupKey;

    /// Key for a named material in the document registry.
    pub struct MaterialKey;
}

/// A key that can reference any scene entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Vertex(VertexKey),
    Face(FaceKey),
    Group(GroupKey),
    Material(MaterialKey),
}

impl From<VertexKey> for EntityKey {
    fn from(k: VertexKey) -> Self {
        EntityKey::Vertex(k)
    }
}

impl From<FaceKey> for EntityKey {
    fn from(k: FaceKey) -> Self {
        EntityKey::Face(k)
    }
}

impl From<GroupKey> for EntityKey {
    fn from(k: GroupKey) -> Self {
        EntityKey::Group(k)
    }
}

impl From<MaterialKey> for EntityKey {
    fn from(k: MaterialKey) -> Self {
        EntityKey::Material(k)
    }
}
