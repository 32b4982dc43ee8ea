// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! [`HostKernel`] implementation for the in-memory scene document.

use floortape_scene::{
    Color, DictValue, EntityKey, FaceKey, GroupKey, MaterialKey, SceneArena, Side,
};
use nalgebra::Vector3;
use tracing::debug;

use crate::config::Rgba;
use crate::host::{AttributeValue, FaceSide, FaceTopology, HostKernel, RayHit};
use crate::point::Point3D;

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Self {
        Color::new(c.r, c.g, c.b, c.a)
    }
}

impl From<FaceSide> for Side {
    fn from(side: FaceSide) -> Self {
        match side {
            FaceSide::Front => Side::Front,
            FaceSide::Back => Side::Back,
        }
    }
}

impl From<AttributeValue> for DictValue {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Int(v) => DictValue::Int(v),
            AttributeValue::Double(v) => DictValue::Double(v),
            AttributeValue::Text(v) => DictValue::String(v),
        }
    }
}

impl HostKernel for SceneArena {
    type Face = FaceKey;
    type Container = GroupKey;
    type Material = MaterialKey;

    fn create_planar_face(&mut self, parent: GroupKey, points: &[Point3D]) -> Option<FaceKey> {
        self.add_face(parent, points)
            .map_err(|e| debug!(error = %e, "scene refused face"))
            .ok()
    }

    fn translate(&mut self, faces: &[FaceKey], offset: &Vector3<f64>) -> Option<Vec<FaceKey>> {
        self.translate_faces(faces, offset)
            .map_err(|e| debug!(error = %e, "scene refused translation"))
            .ok()?;
        Some(faces.to_vec())
    }

    fn raytest(&self, origin: &Point3D, direction: &Vector3<f64>) -> Option<RayHit<FaceKey>> {
        self.ray_test(origin, direction).map(|hit| RayHit {
            face: hit.face,
            point: hit.point,
            distance: hit.distance,
        })
    }

    fn faces_in(&self, container: GroupKey) -> Vec<FaceKey> {
        self.group_faces(container).to_vec()
    }

    fn erase(&mut self, face: FaceKey) -> bool {
        self.erase_face(face).is_ok()
    }

    fn is_valid(&self, face: FaceKey) -> bool {
        self.contains(EntityKey::Face(face))
    }

    fn face_normal(&self, face: FaceKey) -> Option<Vector3<f64>> {
        SceneArena::face_normal(self, face)
    }

    fn face_vertices(&self, face: FaceKey) -> Option<Vec<Point3D>> {
        self.face_points(face)
    }

    fn reverse_face(&mut self, face: FaceKey) -> bool {
        SceneArena::reverse_face(self, face).is_ok()
    }

    fn face_topology(&self, face: FaceKey) -> Option<FaceTopology> {
        // Faces are single-loop polygons: one edge per vertex.
        let n = self.face(face)?.outer.len();
        Some(FaceTopology {
            vertices: n,
            edges: n,
            loops: 1,
        })
    }

    fn pushpull(&mut self, face: FaceKey, distance: f64) -> bool {
        SceneArena::pushpull(self, face, distance)
            .map_err(|e| debug!(error = %e, "scene refused push/pull"))
            .is_ok()
    }

    fn create_container(&mut self, parent: GroupKey) -> Option<GroupKey> {
        self.add_group(parent).ok()
    }

    fn explode(&mut self, container: GroupKey) -> bool {
        self.explode_group(container).is_ok()
    }

    fn find_material(&self, name: &str) -> Option<MaterialKey> {
        self.material_by_name(name)
    }

    fn create_material(&mut self, name: &str, color: Rgba) -> Option<MaterialKey> {
        self.add_material(name, color.into())
            .map_err(|e| debug!(error = %e, "scene refused material"))
            .ok()
    }

    fn set_material_color(&mut self, material: MaterialKey, color: Rgba) -> bool {
        SceneArena::set_material_color(self, material, color.into()).is_ok()
    }

    fn clear_material_texture(&mut self, material: MaterialKey) -> bool {
        self.set_material_texture(material, None).is_ok()
    }

    fn material_is_valid(&self, material: MaterialKey) -> bool {
        self.material(material)
            .is_some_and(|m| !m.name.is_empty() && self.material_by_name(&m.name) == Some(material))
    }

    fn remove_material(&mut self, material: MaterialKey) -> bool {
        SceneArena::remove_material(self, material).is_ok()
    }

    fn set_face_material(
        &mut self,
        face: FaceKey,
        side: FaceSide,
        material: Option<MaterialKey>,
    ) -> bool {
        SceneArena::set_face_material(self, face, side.into(), material).is_ok()
    }

    fn face_material(&self, face: FaceKey, side: FaceSide) -> Option<MaterialKey> {
        SceneArena::face_material(self, face, side.into())
    }

    fn refresh_view(&mut self) {
        self.request_redraw();
    }

    fn set_attribute(&mut self, face: FaceKey, key: &str, value: AttributeValue) -> bool {
        SceneArena::set_attribute(self, face, key, value.into())
    }

    fn get_attribute(&self, face: FaceKey, key: &str) -> Option<AttributeValue> {
        match SceneArena::get_attribute(self, face, key)? {
            DictValue::Int(v) => Some(AttributeValue::Int(*v)),
            DictValue::Double(v) => Some(AttributeValue::Double(*v)),
            DictValue::String(v) => Some(AttributeValue::Text(v.clone())),
            DictValue::List(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(z: f64) -> Vec<Point3D> {
        vec![
            Point3D::new(0.0, 0.0, z),
            Point3D::new(10.0, 0.0, z),
            Point3D::new(10.0, 10.0, z),
            Point3D::new(0.0, 10.0, z),
        ]
    }

    #[test]
    fn face_lifecycle_through_trait() {
        let mut scene = SceneArena::new();
        let root = scene.root();
        let face = HostKernel::create_planar_face(&mut scene, root, &square(0.0)).unwrap();

        assert!(HostKernel::is_valid(&scene, face));
        assert_eq!(HostKernel::faces_in(&scene, root), vec![face]);
        let moved =
            HostKernel::translate(&mut scene, &[face], &Vector3::new(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(moved, vec![face]);
        assert_eq!(HostKernel::face_bounds(&scene, face).unwrap().min.z, 1.0);

        assert!(HostKernel::erase(&mut scene, face));
        assert!(!HostKernel::is_valid(&scene, face));
        assert!(HostKernel::translate(&mut scene, &[face], &Vector3::zeros()).is_none());
    }

    #[test]
    fn degenerate_face_is_refused() {
        let mut scene = SceneArena::new();
        let root = scene.root();
        let line = [
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(2.0, 0.0, 0.0),
        ];
        assert!(HostKernel::create_planar_face(&mut scene, root, &line).is_none());
    }

    #[test]
    fn materials_and_attributes_through_trait() {
        let mut scene = SceneArena::new();
        let root = scene.root();
        let face = HostKernel::create_planar_face(&mut scene, root, &square(0.0)).unwrap();

        let m = HostKernel::create_material(&mut scene, "Tape", Rgba::new(1, 2, 3, 4)).unwrap();
        assert!(HostKernel::material_is_valid(&scene, m));
        assert!(HostKernel::create_material(&mut scene, "Tape", Rgba::new(0, 0, 0, 0)).is_none());
        assert!(HostKernel::set_face_material(&mut scene, face, FaceSide::Front, Some(m)));
        assert_eq!(HostKernel::face_material(&scene, face, FaceSide::Front), Some(m));
        assert_eq!(scene.material(m).unwrap().color, Color::new(1, 2, 3, 4));

        assert!(HostKernel::set_attribute(
            &mut scene,
            face,
            "role",
            AttributeValue::Text("tape".into())
        ));
        assert_eq!(
            HostKernel::get_attribute(&scene, face, "role"),
            Some(AttributeValue::Text("tape".into()))
        );

        assert!(HostKernel::remove_material(&mut scene, m));
        assert!(!HostKernel::material_is_valid(&scene, m));
    }

    #[test]
    fn topology_counts() {
        let mut scene = SceneArena::new();
        let root = scene.root();
        let face = HostKernel::create_planar_face(&mut scene, root, &square(0.0)).unwrap();
        assert_eq!(
            HostKernel::face_topology(&scene, face),
            Some(FaceTopology {
                vertices: 4,
                edges: 4,
                loops: 1
            })
        );
    }
}
