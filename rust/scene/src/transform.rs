// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rigid moves and push/pull on scene faces.
//!
//! Faces reference their vertices through keys, so moving the vertices moves
//! the face. Because faces never share vertices, translating one face leaves
//! every neighbour untouched.

use nalgebra::{Point3, Vector3};

use crate::arena::SceneArena;
use crate::error::{Error, Result};
use crate::keys::*;

impl SceneArena {
    /// Translates every vertex of the given faces by `offset`.
    ///
    /// All keys are checked before anything moves, so a missing face leaves
    /// the scene unchanged.
    pub fn translate_faces(&mut self, faces: &[FaceKey], offset: &Vector3<f64>) -> Result<()> {
        if let Some(&missing) = faces.iter().find(|&&fk| !self.faces.contains_key(fk)) {
            return Err(Error::FaceNotFound(missing));
        }

        for &fk in faces {
            let outer = self.faces[fk].outer.clone();
            for vk in outer {
                if let Some(v) = self.vertices.get_mut(vk) {
                    v.x += offset.x;
                    v.y += offset.y;
                    v.z += offset.z;
                }
            }
        }
        Ok(())
    }

    /// Thickens a face into a prism along its normal.
    ///
    /// The original face stays in place as the base; a cap face offset by
    /// `distance` and one side face per boundary edge are added to the same
    /// group. Returns the new faces (cap first). Nothing is created if any
    /// face would be degenerate.
    pub fn pushpull(&mut self, key: FaceKey, distance: f64) -> Result<Vec<FaceKey>> {
        let group = self.faces.get(key).ok_or(Error::FaceNotFound(key))?.group;
        let base = self.face_points(key).ok_or(Error::FaceNotFound(key))?;
        let normal = self.face_normal(key).ok_or(Error::Collinear)?;
        if distance.abs() < f64::EPSILON || !distance.is_finite() {
            return Err(Error::InvalidDistance(distance));
        }

        let offset = normal * distance;
        let cap: Vec<Point3<f64>> = base.iter().map(|p| p + offset).collect();

        let mut created = Vec::with_capacity(base.len() + 1);
        let result = (|| -> Result<()> {
            created.push(self.add_face(group, &cap)?);
            let n = base.len();
            for i in 0..n {
                let j = (i + 1) % n;
                created.push(self.add_face(group, &[base[i], base[j], cap[j], cap[i]])?);
            }
            Ok(())
        })();

        if let Err(err) = result {
            for fk in created {
                let _ = self.erase_face(fk);
            }
            return Err(err);
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square(scene: &mut SceneArena) -> FaceKey {
        let root = scene.root();
        scene
            .add_face(
                root,
                &[
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(1.0, 0.0, 0.0),
                    Point3::new(1.0, 1.0, 0.0),
                    Point3::new(0.0, 1.0, 0.0),
                ],
            )
            .unwrap()
    }

    #[test]
    fn translate_moves_only_target_face() {
        let mut scene = SceneArena::new();
        let a = unit_square(&mut scene);
        let b = unit_square(&mut scene);

        scene
            .translate_faces(&[a], &Vector3::new(0.0, 0.0, 2.5))
            .unwrap();

        assert!(scene.face_points(a).unwrap().iter().all(|p| p.z == 2.5));
        assert!(scene.face_points(b).unwrap().iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn translate_missing_face_changes_nothing() {
        let mut scene = SceneArena::new();
        let a = unit_square(&mut scene);
        let gone = unit_square(&mut scene);
        scene.erase_face(gone).unwrap();

        let result = scene.translate_faces(&[a, gone], &Vector3::new(1.0, 0.0, 0.0));
        assert!(matches!(result, Err(Error::FaceNotFound(k)) if k == gone));
        assert_relative_eq!(scene.face_points(a).unwrap()[0].x, 0.0);
    }

    #[test]
    fn pushpull_builds_closed_prism() {
        let mut scene = SceneArena::new();
        let base = unit_square(&mut scene);

        let created = scene.pushpull(base, 2.0).unwrap();
        assert_eq!(created.len(), 5); // cap + 4 sides
        assert_eq!(scene.face_count(), 6);

        let cap = scene.face_points(created[0]).unwrap();
        assert!(cap.iter().all(|p| (p.z - 2.0).abs() < 1e-12));
        for side in &created[1..] {
            assert_relative_eq!(scene.face_area(*side).unwrap(), 2.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn pushpull_rejects_zero_distance() {
        let mut scene = SceneArena::new();
        let base = unit_square(&mut scene);
        assert!(matches!(scene.pushpull(base, 0.0), Err(Error::InvalidDistance(_))));
        assert_eq!(scene.face_count(), 1);
    }
}
