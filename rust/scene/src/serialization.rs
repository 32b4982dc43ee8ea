// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON serialization for scenes.
//!
//! Provides round-trip serialization of groups, faces, materials and
//! attribute dictionaries. Slot map keys are replaced by sequential integer
//! IDs; groups are written parent-first so a snapshot can be replayed in
//! order. Group 0 is always the root.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::arena::*;
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::keys::*;

/// Serializable representation of a full scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneSnapshot {
    #[serde(default)]
    pub groups: Vec<GroupSnapshot>,
    #[serde(default)]
    pub materials: Vec<MaterialData>,
    #[serde(default)]
    pub faces: Vec<FaceSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub id: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary: Option<Dictionary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceSnapshot {
    /// Owning group ID. Defaults to the root.
    #[serde(default)]
    pub group: usize,
    pub points: Vec<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary: Option<Dictionary>,
}

impl SceneArena {
    /// Serializes the scene to a pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserializes a scene from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: SceneSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_snapshot(&snapshot)
    }

    /// Creates a serializable snapshot of the scene.
    pub fn to_snapshot(&self) -> SceneSnapshot {
        // Depth-first group order: every parent precedes its children.
        let mut order = Vec::with_capacity(self.groups.len());
        let mut stack = vec![self.root];
        while let Some(gk) = stack.pop() {
            order.push(gk);
            if let Some(g) = self.groups.get(gk) {
                stack.extend(g.groups.iter().rev());
            }
        }

        let group_ids: FxHashMap<GroupKey, usize> =
            order.iter().enumerate().map(|(i, &gk)| (gk, i)).collect();

        let groups = order
            .iter()
            .enumerate()
            .map(|(i, &gk)| {
                let g = &self.groups[gk];
                GroupSnapshot {
                    id: i,
                    parent: g.parent.and_then(|p| group_ids.get(&p).copied()),
                    name: g.name.clone(),
                    dictionary: self.dictionaries.get(&EntityKey::Group(gk)).cloned(),
                }
            })
            .collect();

        let material_name = |mk: Option<MaterialKey>| {
            mk.and_then(|k| self.materials.get(k))
                .map(|m| m.name.clone())
        };

        let mut faces = Vec::with_capacity(self.faces.len());
        for &gk in &order {
            for &fk in self.group_faces(gk) {
                let Some(points) = self.face_points(fk) else {
                    continue;
                };
                let data = &self.faces[fk];
                faces.push(FaceSnapshot {
                    group: group_ids[&gk],
                    points: points.iter().map(|p| [p.x, p.y, p.z]).collect(),
                    front_material: material_name(data.front_material),
                    back_material: material_name(data.back_material),
                    dictionary: self.dictionaries.get(&EntityKey::Face(fk)).cloned(),
                });
            }
        }

        SceneSnapshot {
            groups,
            materials: self.materials.values().cloned().collect(),
            faces,
        }
    }

    /// Reconstructs a scene from a snapshot.
    pub fn from_snapshot(snap: &SceneSnapshot) -> Result<Self> {
        let mut scene = SceneArena::new();

        // Rebuild groups (id → GroupKey mapping)
        let mut group_keys: FxHashMap<usize, GroupKey> = FxHashMap::default();
        group_keys.insert(0, scene.root);
        for gs in &snap.groups {
            let gk = match gs.parent {
                None if gs.id == 0 => scene.root,
                None => {
                    return Err(Error::Serialization(format!(
                        "group {} has no parent and is not the root",
                        gs.id
                    )))
                }
                Some(parent) => {
                    let parent_key = group_keys.get(&parent).copied().ok_or_else(|| {
                        Error::Serialization(format!(
                            "group {} references unknown parent {}",
                            gs.id, parent
                        ))
                    })?;
                    scene.add_group(parent_key)?
                }
            };
            if let Some(ref name) = gs.name {
                scene.set_group_name(gk, name.clone());
            }
            if let Some(ref dict) = gs.dictionary {
                scene.set_dictionary(EntityKey::Group(gk), dict.clone());
            }
            group_keys.insert(gs.id, gk);
        }

        // Rebuild materials
        for ms in &snap.materials {
            let mk = scene.add_material(&ms.name, ms.color)?;
            scene.set_material_texture(mk, ms.texture.clone())?;
        }

        // Rebuild faces
        for fs in &snap.faces {
            let gk = group_keys.get(&fs.group).copied().ok_or_else(|| {
                Error::Serialization(format!("face references unknown group {}", fs.group))
            })?;
            let points: Vec<nalgebra::Point3<f64>> = fs
                .points
                .iter()
                .map(|p| nalgebra::Point3::new(p[0], p[1], p[2]))
                .collect();
            let fk = scene.add_face(gk, &points)?;

            for (side, name) in [
                (Side::Front, fs.front_material.as_deref()),
                (Side::Back, fs.back_material.as_deref()),
            ] {
                if let Some(name) = name {
                    let mk = scene.material_by_name(name).ok_or_else(|| {
                        Error::Serialization(format!("face references unknown material {name}"))
                    })?;
                    scene.set_face_material(fk, side, Some(mk))?;
                }
            }
            if let Some(ref dict) = fs.dictionary {
                scene.set_dictionary(EntityKey::Face(fk), dict.clone());
            }
        }

        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DictValue;
    use nalgebra::Point3;

    #[test]
    fn roundtrip_empty_scene() {
        let scene = SceneArena::new();
        let json = scene.to_json().unwrap();
        let restored = SceneArena::from_json(&json).unwrap();

        assert_eq!(restored.face_count(), 0);
        assert_eq!(restored.group_count(), 1);
    }

    #[test]
    fn roundtrip_nested_groups_materials_and_attributes() {
        let mut scene = SceneArena::new();
        let root = scene.root();
        let tape = scene.add_group(root).unwrap();
        scene.set_group_name(tape, "Tape");
        let face = scene
            .add_face(
                tape,
                &[
                    Point3::new(0.0, 0.0, 1.0),
                    Point3::new(10.0, 0.0, 1.0),
                    Point3::new(10.0, 5.0, 1.0),
                    Point3::new(0.0, 5.0, 1.0),
                ],
            )
            .unwrap();
        let mk = scene.add_material("Tape", Color::new(255, 204, 0, 255)).unwrap();
        scene.set_face_material(face, Side::Front, Some(mk)).unwrap();
        scene.set_attribute(EntityKey::Face(face), "zone", DictValue::String("A".into()));

        let restored = SceneArena::from_json(&scene.to_json().unwrap()).unwrap();

        assert_eq!(restored.group_count(), 2);
        let restored_root = restored.root();
        let restored_tape = restored.group(restored_root).unwrap().groups[0];
        assert_eq!(
            restored.group(restored_tape).unwrap().name.as_deref(),
            Some("Tape")
        );

        let restored_face = restored.group_faces(restored_tape)[0];
        assert_eq!(restored.face_area(restored_face), Some(50.0));
        let restored_mk = restored.material_by_name("Tape").unwrap();
        assert_eq!(restored.face_material(restored_face, Side::Front), Some(restored_mk));
        assert_eq!(
            restored.get_attribute(EntityKey::Face(restored_face), "zone"),
            Some(&DictValue::String("A".into()))
        );
    }

    #[test]
    fn faces_default_to_root_group() {
        let json = r#"{ "faces": [ { "points": [[0,0,0],[1,0,0],[0,1,0]] } ] }"#;
        let scene = SceneArena::from_json(json).unwrap();
        assert_eq!(scene.group_faces(scene.root()).len(), 1);
    }

    #[test]
    fn unknown_references_are_rejected() {
        let json = r#"{ "faces": [ { "group": 7, "points": [[0,0,0],[1,0,0],[0,1,0]] } ] }"#;
        assert!(matches!(
            SceneArena::from_json(json),
            Err(Error::Serialization(_))
        ));

        let json = r#"{ "groups": [ { "id": 0 }, { "id": 1, "parent": 5 } ] }"#;
        assert!(matches!(
            SceneArena::from_json(json),
            Err(Error::Serialization(_))
        ));
    }
}
