// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for scene entities.
//!
//! The [`SceneArena`] is the central owner of all document data. Vertices,
//! faces, groups and materials live inside slot maps with stable,
//! generational keys. Each face owns its vertices (no vertex sharing between
//! faces), so moving one face never drags a neighbour along. Groups form a
//! tree rooted at [`SceneArena::root`]; a group's child list is the only
//! record of which faces it contains.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::dictionary::Dictionary;
use crate::keys::*;

/// Data stored for a vertex: a point in 3D space.
#[derive(Debug, Clone)]
pub struct VertexData {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Data stored for a face: a planar polygon with front/back materials.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// Outer loop in winding order. The normal follows the right-hand rule.
    pub outer: Vec<VertexKey>,
    /// Group that owns this face.
    pub group: GroupKey,
    pub front_material: Option<MaterialKey>,
    pub back_material: Option<MaterialKey>,
}

/// Data stored for a group: ordered child faces and nested groups.
#[derive(Debug, Clone, Default)]
pub struct GroupData {
    /// `None` only for the root group.
    pub parent: Option<GroupKey>,
    pub name: Option<String>,
    pub faces: Vec<FaceKey>,
    pub groups: Vec<GroupKey>,
}

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Data stored for a named material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialData {
    pub name: String,
    pub color: Color,
    /// Image texture path, if any. `None` means a pure colour material.
    pub texture: Option<String>,
}

/// Which side of a face a material is painted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
}

/// The central arena that owns all scene entities.
///
/// # Example
///
/// ```
/// use floortape_scene::SceneArena;
/// use nalgebra::Point3;
///
/// let mut scene = SceneArena::new();
/// let root = scene.root();
/// let face = scene
///     .add_face(
///         root,
///         &[
///             Point3::new(0.0, 0.0, 0.0),
///             Point3::new(1.0, 0.0, 0.0),
///             Point3::new(1.0, 1.0, 0.0),
///         ],
///     )
///     .unwrap();
///
/// assert_eq!(scene.face_count(), 1);
/// assert_eq!(scene.vertex_count(), 3);
/// assert_eq!(scene.face(face).unwrap().group, root);
/// ```
#[derive(Debug)]
pub struct SceneArena {
    // Entity storage
    pub(crate) vertices: SlotMap<VertexKey, VertexData>,
    pub(crate) faces: SlotMap<FaceKey, FaceData>,
    pub(crate) groups: SlotMap<GroupKey, GroupData>,
    pub(crate) materials: SlotMap<MaterialKey, MaterialData>,

    // Registry index: material name → key
    pub(crate) material_names: FxHashMap<String, MaterialKey>,

    // Metadata
    pub(crate) dictionaries: FxHashMap<EntityKey, Dictionary>,

    pub(crate) root: GroupKey,
    pub(crate) redraws: u64,
}

impl SceneArena {
    /// Creates a new scene containing only the root group.
    pub fn new() -> Self {
        let mut groups = SlotMap::with_key();
        let root = groups.insert(GroupData::default());

        Self {
            vertices: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            groups,
            materials: SlotMap::with_key(),

            material_names: FxHashMap::default(),

            dictionaries: FxHashMap::default(),

            root,
            redraws: 0,
        }
    }

    /// Returns the root group of the document.
    pub fn root(&self) -> GroupKey {
        self.root
    }

    // --- Vertex operations ---

    /// Returns the number of vertices in the arena.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Face operations ---

    /// Returns the face data for the given key, or `None` if not found.
    pub fn face(&self, key: FaceKey) -> Option<&FaceData> {
        self.faces.get(key)
    }

    /// Returns the number of faces in the arena.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    // --- Group operations ---

    /// Returns the group data for the given key, or `None` if not found.
    pub fn group(&self, key: GroupKey) -> Option<&GroupData> {
        self.groups.get(key)
    }

    /// Returns the number of groups in the arena, including the root.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns the faces directly owned by a group, in insertion order.
    pub fn group_faces(&self, key: GroupKey) -> &[FaceKey] {
        self.groups
            .get(key)
            .map(|g| g.faces.as_slice())
            .unwrap_or(&[])
    }

    /// Sets the display name of a group.
    pub fn set_group_name(&mut self, key: GroupKey, name: impl Into<String>) -> bool {
        match self.groups.get_mut(key) {
            Some(group) => {
                group.name = Some(name.into());
                true
            }
            None => false,
        }
    }

    // --- Material operations ---

    /// Returns the material data for the given key, or `None` if not found.
    pub fn material(&self, key: MaterialKey) -> Option<&MaterialData> {
        self.materials.get(key)
    }

    /// Returns the number of registered materials.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    // --- View ---

    /// Records a viewport refresh request.
    pub fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    /// Returns how many refreshes have been requested since creation.
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    // --- Entity existence checks ---

    /// Returns `true` if the given key references a live entity.
    pub fn contains(&self, key: EntityKey) -> bool {
        match key {
            EntityKey::Vertex(k) => self.vertices.contains_key(k),
            EntityKey::Face(k) => self.faces.contains_key(k),
            EntityKey::Group(k) => self.groups.contains_key(k),
            EntityKey::Material(k) => self.materials.contains_key(k),
        }
    }
}

impl Default for SceneArena {
    fn default() -> Self {
        Self::new()
    }
}
