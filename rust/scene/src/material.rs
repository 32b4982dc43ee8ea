// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document material registry and per-side face painting.
//!
//! Materials are unique by name. Removing a material clears it from every
//! face that still references it.

use crate::arena::*;
use crate::error::{Error, Result};
use crate::keys::*;

impl SceneArena {
    /// Registers a new pure-colour material.
    pub fn add_material(&mut self, name: &str, color: Color) -> Result<MaterialKey> {
        if self.material_names.contains_key(name) {
            return Err(Error::DuplicateMaterial(name.to_string()));
        }

        let key = self.materials.insert(MaterialData {
            name: name.to_string(),
            color,
            texture: None,
        });
        self.material_names.insert(name.to_string(), key);
        Ok(key)
    }

    /// Looks up a material by name.
    pub fn material_by_name(&self, name: &str) -> Option<MaterialKey> {
        self.material_names.get(name).copied()
    }

    /// Replaces the colour of a material.
    pub fn set_material_color(&mut self, key: MaterialKey, color: Color) -> Result<()> {
        let material = self
            .materials
            .get_mut(key)
            .ok_or(Error::MaterialNotFound(key))?;
        material.color = color;
        Ok(())
    }

    /// Sets or clears the image texture of a material.
    pub fn set_material_texture(
        &mut self,
        key: MaterialKey,
        texture: Option<String>,
    ) -> Result<()> {
        let material = self
            .materials
            .get_mut(key)
            .ok_or(Error::MaterialNotFound(key))?;
        material.texture = texture;
        Ok(())
    }

    /// Removes a material from the registry and from every face using it.
    pub fn remove_material(&mut self, key: MaterialKey) -> Result<MaterialData> {
        let material = self
            .materials
            .remove(key)
            .ok_or(Error::MaterialNotFound(key))?;
        self.material_names.remove(&material.name);

        for face in self.faces.values_mut() {
            if face.front_material == Some(key) {
                face.front_material = None;
            }
            if face.back_material == Some(key) {
                face.back_material = None;
            }
        }
        self.dictionaries.remove(&EntityKey::Material(key));
        Ok(material)
    }

    /// Paints one side of a face. `None` clears the side.
    pub fn set_face_material(
        &mut self,
        face: FaceKey,
        side: Side,
        material: Option<MaterialKey>,
    ) -> Result<()> {
        if let Some(mk) = material {
            if !self.materials.contains_key(mk) {
                return Err(Error::MaterialNotFound(mk));
            }
        }

        let data = self.faces.get_mut(face).ok_or(Error::FaceNotFound(face))?;
        match side {
            Side::Front => data.front_material = material,
            Side::Back => data.back_material = material,
        }
        Ok(())
    }

    /// Returns the material painted on one side of a face.
    pub fn face_material(&self, face: FaceKey, side: Side) -> Option<MaterialKey> {
        let data = self.faces.get(face)?;
        match side {
            Side::Front => data.front_material,
            Side::Back => data.back_material,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    const YELLOW: Color = Color::new(255, 204, 0, 255);

    fn triangle(scene: &mut SceneArena) -> FaceKey {
        let root = scene.root();
        scene
            .add_face(
                root,
                &[
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(1.0, 0.0, 0.0),
                    Point3::new(0.0, 1.0, 0.0),
                ],
            )
            .unwrap()
    }

    #[test]
    fn names_are_unique() {
        let mut scene = SceneArena::new();
        let key = scene.add_material("Tape", YELLOW).unwrap();

        assert_eq!(scene.material_by_name("Tape"), Some(key));
        assert!(matches!(
            scene.add_material("Tape", YELLOW),
            Err(Error::DuplicateMaterial(_))
        ));
    }

    #[test]
    fn color_and_texture_updates() {
        let mut scene = SceneArena::new();
        let key = scene.add_material("Tape", YELLOW).unwrap();
        scene
            .set_material_texture(key, Some("stripes.png".into()))
            .unwrap();
        scene.set_material_color(key, Color::new(1, 2, 3, 4)).unwrap();

        let data = scene.material(key).unwrap();
        assert_eq!(data.color, Color::new(1, 2, 3, 4));
        assert_eq!(data.texture.as_deref(), Some("stripes.png"));
    }

    #[test]
    fn paint_both_sides() {
        let mut scene = SceneArena::new();
        let face = triangle(&mut scene);
        let key = scene.add_material("Tape", YELLOW).unwrap();

        scene.set_face_material(face, Side::Front, Some(key)).unwrap();
        assert_eq!(scene.face_material(face, Side::Front), Some(key));
        assert_eq!(scene.face_material(face, Side::Back), None);

        scene.set_face_material(face, Side::Back, Some(key)).unwrap();
        assert_eq!(scene.face_material(face, Side::Back), Some(key));
    }

    #[test]
    fn remove_clears_assignments() {
        let mut scene = SceneArena::new();
        let face = triangle(&mut scene);
        let key = scene.add_material("Tape", YELLOW).unwrap();
        scene.set_face_material(face, Side::Front, Some(key)).unwrap();

        let removed = scene.remove_material(key).unwrap();
        assert_eq!(removed.name, "Tape");
        assert_eq!(scene.face_material(face, Side::Front), None);
        assert!(scene.material_by_name("Tape").is_none());
        assert!(matches!(
            scene.set_face_material(face, Side::Front, Some(key)),
            Err(Error::MaterialNotFound(_))
        ));
    }
}
