// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared fixtures for the engine integration tests.

#![allow(dead_code)]

use floortape_engine::{
    AttributeValue, FaceSide, FaceTopology, HostKernel, Point3D, RayHit, Rgba, TapeConfig,
};
use floortape_scene::{FaceKey, GroupKey, MaterialKey, SceneArena};
use nalgebra::Vector3;

/// Default configuration with a 5-unit band.
pub fn config() -> TapeConfig {
    TapeConfig {
        band_width: 5.0,
        ..TapeConfig::default()
    }
}

pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64, z: f64) -> Vec<Point3D> {
    vec![
        Point3D::new(x0, y0, z),
        Point3D::new(x1, y0, z),
        Point3D::new(x1, y1, z),
        Point3D::new(x0, y1, z),
    ]
}

pub fn rect_loop(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<[f64; 3]> {
    rect(x0, y0, x1, y1, 0.0)
        .into_iter()
        .map(|p| [p.x, p.y, p.z])
        .collect()
}

/// A scene host that can be told to refuse specific operations.
#[derive(Debug, Default)]
pub struct FlakyHost {
    pub scene: SceneArena,
    pub fail_translate: bool,
    /// Number of faces the host still agrees to create (`None` = unlimited).
    pub face_budget: Option<usize>,
    pub fail_materials: bool,
    pub fail_pushpull: bool,
    pub fail_containers: bool,
}

impl FlakyHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> GroupKey {
        self.scene.root()
    }
}

impl HostKernel for FlakyHost {
    type Face = FaceKey;
    type Container = GroupKey;
    type Material = MaterialKey;

    fn create_planar_face(&mut self, parent: GroupKey, points: &[Point3D]) -> Option<FaceKey> {
        match self.face_budget {
            Some(0) => return None,
            Some(ref mut n) => *n -= 1,
            None => {}
        }
        HostKernel::create_planar_face(&mut self.scene, parent, points)
    }

    fn translate(&mut self, faces: &[FaceKey], offset: &Vector3<f64>) -> Option<Vec<FaceKey>> {
        if self.fail_translate {
            return None;
        }
        HostKernel::translate(&mut self.scene, faces, offset)
    }

    fn raytest(&self, origin: &Point3D, direction: &Vector3<f64>) -> Option<RayHit<FaceKey>> {
        HostKernel::raytest(&self.scene, origin, direction)
    }

    fn faces_in(&self, container: GroupKey) -> Vec<FaceKey> {
        HostKernel::faces_in(&self.scene, container)
    }

    fn erase(&mut self, face: FaceKey) -> bool {
        HostKernel::erase(&mut self.scene, face)
    }

    fn is_valid(&self, face: FaceKey) -> bool {
        HostKernel::is_valid(&self.scene, face)
    }

    fn face_normal(&self, face: FaceKey) -> Option<Vector3<f64>> {
        HostKernel::face_normal(&self.scene, face)
    }

    fn face_vertices(&self, face: FaceKey) -> Option<Vec<Point3D>> {
        HostKernel::face_vertices(&self.scene, face)
    }

    fn reverse_face(&mut self, face: FaceKey) -> bool {
        HostKernel::reverse_face(&mut self.scene, face)
    }

    fn face_topology(&self, face: FaceKey) -> Option<FaceTopology> {
        HostKernel::face_topology(&self.scene, face)
    }

    fn pushpull(&mut self, face: FaceKey, distance: f64) -> bool {
        !self.fail_pushpull && HostKernel::pushpull(&mut self.scene, face, distance)
    }

    fn create_container(&mut self, parent: GroupKey) -> Option<GroupKey> {
        if self.fail_containers {
            return None;
        }
        HostKernel::create_container(&mut self.scene, parent)
    }

    fn explode(&mut self, container: GroupKey) -> bool {
        HostKernel::explode(&mut self.scene, container)
    }

    fn find_material(&self, name: &str) -> Option<MaterialKey> {
        HostKernel::find_material(&self.scene, name)
    }

    fn create_material(&mut self, name: &str, color: Rgba) -> Option<MaterialKey> {
        if self.fail_materials {
            return None;
        }
        HostKernel::create_material(&mut self.scene, name, color)
    }

    fn set_material_color(&mut self, material: MaterialKey, color: Rgba) -> bool {
        HostKernel::set_material_color(&mut self.scene, material, color)
    }

    fn clear_material_texture(&mut self, material: MaterialKey) -> bool {
        HostKernel::clear_material_texture(&mut self.scene, material)
    }

    fn material_is_valid(&self, material: MaterialKey) -> bool {
        HostKernel::material_is_valid(&self.scene, material)
    }

    fn remove_material(&mut self, material: MaterialKey) -> bool {
        HostKernel::remove_material(&mut self.scene, material)
    }

    fn set_face_material(
        &mut self,
        face: FaceKey,
        side: FaceSide,
        material: Option<MaterialKey>,
    ) -> bool {
        HostKernel::set_face_material(&mut self.scene, face, side, material)
    }

    fn face_material(&self, face: FaceKey, side: FaceSide) -> Option<MaterialKey> {
        HostKernel::face_material(&self.scene, face, side)
    }

    fn refresh_view(&mut self) {
        HostKernel::refresh_view(&mut self.scene)
    }

    fn set_attribute(&mut self, face: FaceKey, key: &str, value: AttributeValue) -> bool {
        HostKernel::set_attribute(&mut self.scene, face, key, value)
    }

    fn get_attribute(&self, face: FaceKey, key: &str) -> Option<AttributeValue> {
        HostKernel::get_attribute(&self.scene, face, key)
    }
}
