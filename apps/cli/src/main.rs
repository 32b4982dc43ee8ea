// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! FloorTape command-line tool.
//!
//! Reads a layout JSON file (zone outlines, an optional existing scene and an
//! optional engine configuration), generates tape bands for every zone and
//! writes the resulting scene snapshot and batch report as JSON.
//!
//! Configuration precedence: `--config` file, then the layout's `config`
//! object, then `FLOORTAPE_*` environment variables over the defaults.

use std::fs;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use floortape_engine::TapeConfig;

mod args;
mod layout;

use args::Args;
use layout::{Generated, LayoutInput};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,floortape_engine=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let input = LayoutInput::from_json(&read(&args.layout)?)?;

    let config = match (&args.config, &input.config) {
        (Some(path), _) => {
            serde_json::from_str(&read(path)?)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        (None, Some(config)) => config.clone(),
        (None, None) => TapeConfig::from_env(),
    };

    tracing::info!(
        layout = %args.layout.display(),
        zones = input.zones.len(),
        band_width = config.band_width,
        placement = %config.placement,
        conflict_detection = config.conflict_detection,
        "Starting tape generation"
    );

    let Generated { scene, report } = layout::generate(&input, config)?;

    let scene_json = scene.to_json()?;
    match &args.output {
        Some(path) => write(path, &scene_json)?,
        None => println!("{scene_json}"),
    }
    if let Some(path) = &args.report {
        write(path, &report.to_json()?)?;
    }

    for zone in report.zones.iter().filter(|z| z.failure.is_some()) {
        tracing::warn!(zone = %zone.label, "zone produced no bands");
    }
    Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write(path: &Path, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "written");
    Ok(())
}
