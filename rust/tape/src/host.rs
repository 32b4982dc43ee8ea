// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The narrow host-kernel interface the engine is written against.
//!
//! A host is any modelling environment that can create planar faces, move
//! them, ray-test the document and store named materials. Handles are opaque
//! `Copy` values; an erased handle must report `is_valid == false` rather
//! than alias a newer entity. Operations that can be refused return `Option`
//! or `bool` so the engine decides how to recover.

use std::fmt::Debug;
use std::hash::Hash;

use nalgebra::Vector3;
use serde::Serialize;

use crate::bounds::BoundingBox;
use crate::config::Rgba;
use crate::point::Point3D;

/// Nearest intersection of a ray with the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<F> {
    pub face: F,
    pub point: Point3D,
    /// Euclidean distance from the ray origin to `point`.
    pub distance: f64,
}

/// Side of a face a material is painted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceSide {
    Front,
    Back,
}

/// Element counts of a face, reported when every extrusion strategy fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaceTopology {
    pub vertices: usize,
    pub edges: usize,
    pub loops: usize,
}

/// Attribute values the engine stores on bands.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Int(i64),
    Double(f64),
    Text(String),
}

/// Operations the tape engine needs from a host geometry kernel.
pub trait HostKernel {
    type Face: Copy + Eq + Hash + Debug;
    type Container: Copy + Eq + Debug;
    type Material: Copy + Eq + Debug;

    // --- Geometry ---

    /// Creates a planar face from an ordered loop inside `parent`.
    fn create_planar_face(&mut self, parent: Self::Container, points: &[Point3D])
        -> Option<Self::Face>;

    /// Moves faces by `offset`, returning the handles that now hold the moved
    /// geometry (which may differ from the inputs).
    fn translate(&mut self, faces: &[Self::Face], offset: &Vector3<f64>) -> Option<Vec<Self::Face>>;

    /// Nearest hit of a ray cast from `origin` along `direction`.
    fn raytest(&self, origin: &Point3D, direction: &Vector3<f64>) -> Option<RayHit<Self::Face>>;

    /// Faces directly contained in `container`.
    fn faces_in(&self, container: Self::Container) -> Vec<Self::Face>;

    fn erase(&mut self, face: Self::Face) -> bool;
    fn is_valid(&self, face: Self::Face) -> bool;
    fn face_normal(&self, face: Self::Face) -> Option<Vector3<f64>>;
    fn face_vertices(&self, face: Self::Face) -> Option<Vec<Point3D>>;
    fn reverse_face(&mut self, face: Self::Face) -> bool;
    fn face_topology(&self, face: Self::Face) -> Option<FaceTopology>;

    /// Axis-aligned bounds of a face.
    fn face_bounds(&self, face: Self::Face) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.face_vertices(face)?)
    }

    // --- Solids ---

    /// Thickens a face along its normal, keeping the face as the base.
    fn pushpull(&mut self, face: Self::Face, distance: f64) -> bool;
    fn create_container(&mut self, parent: Self::Container) -> Option<Self::Container>;
    /// Dissolves a container into its parent.
    fn explode(&mut self, container: Self::Container) -> bool;

    // --- Materials ---

    fn find_material(&self, name: &str) -> Option<Self::Material>;
    fn create_material(&mut self, name: &str, color: Rgba) -> Option<Self::Material>;
    fn set_material_color(&mut self, material: Self::Material, color: Rgba) -> bool;
    fn clear_material_texture(&mut self, material: Self::Material) -> bool;
    fn material_is_valid(&self, material: Self::Material) -> bool;
    fn remove_material(&mut self, material: Self::Material) -> bool;
    fn set_face_material(
        &mut self,
        face: Self::Face,
        side: FaceSide,
        material: Option<Self::Material>,
    ) -> bool;
    fn face_material(&self, face: Self::Face, side: FaceSide) -> Option<Self::Material>;

    /// Asks the host to redraw its viewport.
    fn refresh_view(&mut self);

    // --- Attributes ---

    fn set_attribute(&mut self, face: Self::Face, key: &str, value: AttributeValue) -> bool;
    fn get_attribute(&self, face: Self::Face, key: &str) -> Option<AttributeValue>;
}
