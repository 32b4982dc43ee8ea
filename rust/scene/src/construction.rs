// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction and destruction of scene entities.
//!
//! Every entity is created through the arena, which checks referential
//! integrity (the owning group must exist) and keeps the group child lists
//! and the vertex → face index in sync.

use nalgebra::Point3;

use crate::arena::*;
use crate::error::{Error, Result};
use crate::geometry::{newell_normal, strip_repeated, PLANE_TOLERANCE, POINT_EPSILON};
use crate::keys::*;

impl SceneArena {
    /// Creates an empty group nested inside `parent`.
    pub fn add_group(&mut self, parent: GroupKey) -> Result<GroupKey> {
        if !self.groups.contains_key(parent) {
            return Err(Error::GroupNotFound(parent));
        }

        let key = self.groups.insert(GroupData {
            parent: Some(parent),
            ..GroupData::default()
        });
        self.groups[parent].groups.push(key);
        Ok(key)
    }

    /// Creates a planar face from an ordered point loop inside `group`.
    ///
    /// Repeated consecutive points (and a repeated closing point) are dropped
    /// first. The face is refused if fewer than 3 points remain, if they are
    /// collinear, or if any point lies off the common plane.
    pub fn add_face(&mut self, group: GroupKey, points: &[Point3<f64>]) -> Result<FaceKey> {
        if !self.groups.contains_key(group) {
            return Err(Error::GroupNotFound(group));
        }
        if points
            .iter()
            .any(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(Error::NonFinite);
        }

        let loop_points = strip_repeated(points, POINT_EPSILON);
        if loop_points.len() < 3 {
            return Err(Error::TooFewPoints(loop_points.len()));
        }

        let normal = newell_normal(&loop_points).ok_or(Error::Collinear)?;
        let origin = loop_points[0];
        let deviation = loop_points
            .iter()
            .map(|p| (p - origin).dot(&normal).abs())
            .fold(0.0, f64::max);
        if deviation > PLANE_TOLERANCE {
            return Err(Error::NonPlanar(deviation));
        }

        let outer: Vec<VertexKey> = loop_points
            .iter()
            .map(|p| self.vertices.insert(VertexData { x: p.x, y: p.y, z: p.z }))
            .collect();

        let key = self.faces.insert(FaceData {
            outer,
            group,
            front_material: None,
            back_material: None,
        });

        self.groups[group].faces.push(key);
        Ok(key)
    }

    /// Erases a face, its vertices and its attributes.
    pub fn erase_face(&mut self, key: FaceKey) -> Result<()> {
        let face = self.faces.remove(key).ok_or(Error::FaceNotFound(key))?;

        for vk in &face.outer {
            self.vertices.remove(*vk);
        }
        if let Some(group) = self.groups.get_mut(face.group) {
            group.faces.retain(|&f| f != key);
        }
        self.dictionaries.remove(&EntityKey::Face(key));
        Ok(())
    }

    /// Erases a group together with everything nested inside it.
    pub fn erase_group(&mut self, key: GroupKey) -> Result<()> {
        if key == self.root {
            return Err(Error::RootGroup);
        }
        let group = self.groups.get(key).ok_or(Error::GroupNotFound(key))?;
        let faces = group.faces.clone();
        let children = group.groups.clone();
        let parent = group.parent;

        for fk in faces {
            self.erase_face(fk)?;
        }
        for gk in children {
            self.erase_group(gk)?;
        }

        if let Some(parent) = parent.and_then(|p| self.groups.get_mut(p)) {
            parent.groups.retain(|&g| g != key);
        }
        self.groups.remove(key);
        self.dictionaries.remove(&EntityKey::Group(key));
        Ok(())
    }

    /// Dissolves a group, moving its faces and nested groups into its parent.
    ///
    /// Returns the faces that were moved, in their original order.
    pub fn explode_group(&mut self, key: GroupKey) -> Result<Vec<FaceKey>> {
        if key == self.root {
            return Err(Error::RootGroup);
        }
        let group = self.groups.remove(key).ok_or(Error::GroupNotFound(key))?;
        // Only the root has no parent, and the root was rejected above.
        let parent = group.parent.ok_or(Error::RootGroup)?;

        for &fk in &group.faces {
            if let Some(face) = self.faces.get_mut(fk) {
                face.group = parent;
            }
        }
        for &gk in &group.groups {
            if let Some(child) = self.groups.get_mut(gk) {
                child.parent = Some(parent);
            }
        }

        if let Some(parent_group) = self.groups.get_mut(parent) {
            parent_group.groups.retain(|&g| g != key);
            parent_group.faces.extend_from_slice(&group.faces);
            parent_group.groups.extend_from_slice(&group.groups);
        }
        self.dictionaries.remove(&EntityKey::Group(key));
        Ok(group.faces)
    }

    /// Reverses the winding of a face, flipping its normal.
    pub fn reverse_face(&mut self, key: FaceKey) -> Result<()> {
        let face = self.faces.get_mut(key).ok_or(Error::FaceNotFound(key))?;
        face.outer.reverse();
        Ok(())
    }
}
