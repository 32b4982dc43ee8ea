// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed key-value attributes that can be attached to any scene entity.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::arena::SceneArena;
use crate::keys::{EntityKey, FaceKey, GroupKey};

/// A typed value stored in a dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DictValue {
    Int(i64),
    Double(f64),
    String(String),
    List(Vec<DictValue>),
}

/// A dictionary is a typed key-value map attached to a scene entity.
pub type Dictionary = FxHashMap<String, DictValue>;

impl SceneArena {
    /// Attaches a dictionary to an entity, replacing any existing one.
    pub fn set_dictionary(&mut self, key: impl Into<EntityKey>, dict: Dictionary) {
        self.dictionaries.insert(key.into(), dict);
    }

    /// Returns the dictionary attached to an entity, if any.
    pub fn get_dictionary(&self, key: impl Into<EntityKey>) -> Option<&Dictionary> {
        self.dictionaries.get(&key.into())
    }

    /// Removes the dictionary from an entity.
    pub fn remove_dictionary(&mut self, key: impl Into<EntityKey>) -> Option<Dictionary> {
        self.dictionaries.remove(&key.into())
    }

    /// Sets a single attribute, creating the dictionary if needed.
    ///
    /// Returns `false` (and stores nothing) if the entity does not exist.
    pub fn set_attribute(
        &mut self,
        key: impl Into<EntityKey>,
        name: &str,
        value: DictValue,
    ) -> bool {
        let key = key.into();
        if !self.contains(key) {
            return false;
        }
        self.dictionaries
            .entry(key)
            .or_default()
            .insert(name.to_string(), value);
        true
    }

    /// Reads a single attribute.
    pub fn get_attribute(&self, key: impl Into<EntityKey>, name: &str) -> Option<&DictValue> {
        self.dictionaries.get(&key.into())?.get(name)
    }

    /// Returns the faces of `group` whose attribute `name` equals `value`,
    /// in group order.
    pub fn faces_with_attribute(
        &self,
        group: GroupKey,
        name: &str,
        value: &DictValue,
    ) -> Vec<FaceKey> {
        self.group_faces(group)
            .iter()
            .copied()
            .filter(|&fk| self.get_attribute(fk, name) == Some(value))
            .collect()
    }
}
