// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layout files and the generation run built from them.

use anyhow::Context;
use floortape_engine::{BatchReport, TapeConfig, TapeEngine, ZoneLoop};
use floortape_scene::{SceneArena, SceneSnapshot};
use serde::Deserialize;

fn default_group() -> String {
    "Tape".into()
}

/// Contents of a layout JSON file.
#[derive(Debug, Deserialize)]
pub struct LayoutInput {
    pub zones: Vec<ZoneLoop>,
    /// Existing geometry the bands must respect.
    #[serde(default)]
    pub scene: Option<SceneSnapshot>,
    #[serde(default)]
    pub config: Option<TapeConfig>,
    /// Name of the group that receives the bands.
    #[serde(default = "default_group")]
    pub group: String,
}

impl LayoutInput {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid layout JSON")
    }
}

/// Outcome of one generation run.
pub struct Generated {
    pub scene: SceneArena,
    pub report: BatchReport,
}

/// Loads the layout's scene, adds the tape group and generates every zone.
pub fn generate(input: &LayoutInput, config: TapeConfig) -> anyhow::Result<Generated> {
    let engine = TapeEngine::new(config).context("invalid tape configuration")?;

    let mut scene = match &input.scene {
        Some(snapshot) => SceneArena::from_snapshot(snapshot).context("invalid scene snapshot")?,
        None => SceneArena::new(),
    };
    let root = scene.root();
    let group = scene.add_group(root)?;
    scene.set_group_name(group, input.group.clone());

    tracing::debug!(
        zones = input.zones.len(),
        existing_faces = scene.face_count(),
        group = %input.group,
        "layout loaded"
    );

    let report = engine.generate(&mut scene, group, &input.zones);
    Ok(Generated { scene, report })
}
