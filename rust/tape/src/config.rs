// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration.
//!
//! A [`TapeConfig`] is built once per invocation (defaults, environment or a
//! JSON file) and validated before any geometry is touched. Units are scene
//! working units; the defaults assume millimetres.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TapeError};

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl FromStr for Rgba {
    type Err = String;

    /// Parses `r,g,b` or `r,g,b,a`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u8>().map_err(|e| format!("{p:?}: {e}")))
            .collect::<std::result::Result<Vec<u8>, String>>()?;
        match parts.as_slice() {
            [r, g, b] => Ok(Rgba::new(*r, *g, *b, 255)),
            [r, g, b, a] => Ok(Rgba::new(*r, *g, *b, *a)),
            _ => Err(format!("expected 3 or 4 components, got {}", parts.len())),
        }
    }
}

/// Which side of its boundary edge a band is laid on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Interior side of the loop.
    #[default]
    Inside,
    /// Straddling the edge, half the width on each side.
    Centered,
    /// Exterior side of the loop.
    Outside,
}

impl FromStr for Placement {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inside" => Ok(Placement::Inside),
            "centered" | "centred" | "center" => Ok(Placement::Centered),
            "outside" => Ok(Placement::Outside),
            other => Err(format!("unknown placement {other:?}")),
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Placement::Inside => "inside",
            Placement::Centered => "centered",
            Placement::Outside => "outside",
        })
    }
}

/// Tunables for tape generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TapeConfig {
    /// Band width W.
    pub band_width: f64,
    /// Vertical clearance E above the traced surface.
    pub elevation: f64,
    /// Band thickness T (conflict volume height and extrusion distance).
    pub thickness: f64,
    /// Point merge distance, vertex coincidence and minimum segment length.
    pub tolerance: f64,
    /// Bounding-box expansion used by the adjacency scan.
    pub adjacency_tolerance: f64,
    /// Distance a conflicting band is moved during repair.
    pub nudge_distance: f64,
    /// Slack added to a conflict ray's length.
    pub ray_epsilon: f64,
    /// Number of sample positions K along a band.
    pub sample_count: usize,
    pub placement: Placement,
    /// Longest allowed corner miter, as a multiple of the band width.
    pub miter_limit: f64,
    /// Run the ray-sampling conflict detector before building each band.
    pub conflict_detection: bool,
    /// Skip a segment whose band volume is obstructed.
    pub skip_obstructed: bool,
    /// Test for a true shared edge before the bounding-box touch proxy.
    pub edge_coincidence_check: bool,
    /// Paint the back side of bands too.
    pub volumetric_mode: bool,
    /// Thicken bands into solids after elevation.
    pub extrude_bands: bool,
    pub material_name: String,
    pub color: Rgba,
}

impl Default for TapeConfig {
    fn default() -> Self {
        Self {
            band_width: 50.0,
            elevation: 1.0,
            thickness: 1.0,
            tolerance: 1.0,
            adjacency_tolerance: 10.0,
            nudge_distance: 1.0,
            ray_epsilon: 0.001,
            sample_count: 5,
            placement: Placement::Inside,
            miter_limit: 4.0,
            conflict_detection: false,
            skip_obstructed: true,
            edge_coincidence_check: true,
            volumetric_mode: false,
            extrude_bands: false,
            material_name: "FloorTape".into(),
            color: Rgba::new(255, 204, 0, 255),
        }
    }
}

impl TapeConfig {
    /// Load configuration from `FLOORTAPE_*` environment variables, falling
    /// back to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`TapeConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let get = |key: &str| lookup(&format!("FLOORTAPE_{key}"));

        fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
            value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
        }
        fn flag_or(value: Option<String>, default: bool) -> bool {
            match value.as_deref().map(str::trim) {
                Some("1") | Some("true") | Some("yes") | Some("on") => true,
                Some("0") | Some("false") | Some("no") | Some("off") => false,
                _ => default,
            }
        }

        Self {
            band_width: parse_or(get("BAND_WIDTH"), d.band_width),
            elevation: parse_or(get("ELEVATION"), d.elevation),
            thickness: parse_or(get("THICKNESS"), d.thickness),
            tolerance: parse_or(get("TOLERANCE"), d.tolerance),
            adjacency_tolerance: parse_or(get("ADJACENCY_TOLERANCE"), d.adjacency_tolerance),
            nudge_distance: parse_or(get("NUDGE_DISTANCE"), d.nudge_distance),
            ray_epsilon: parse_or(get("RAY_EPSILON"), d.ray_epsilon),
            sample_count: parse_or(get("SAMPLE_COUNT"), d.sample_count),
            placement: parse_or(get("PLACEMENT"), d.placement),
            miter_limit: parse_or(get("MITER_LIMIT"), d.miter_limit),
            conflict_detection: flag_or(get("CONFLICT_DETECTION"), d.conflict_detection),
            skip_obstructed: flag_or(get("SKIP_OBSTRUCTED"), d.skip_obstructed),
            edge_coincidence_check: flag_or(
                get("EDGE_COINCIDENCE_CHECK"),
                d.edge_coincidence_check,
            ),
            volumetric_mode: flag_or(get("VOLUMETRIC_MODE"), d.volumetric_mode),
            extrude_bands: flag_or(get("EXTRUDE_BANDS"), d.extrude_bands),
            material_name: get("MATERIAL_NAME")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(d.material_name),
            color: parse_or(get("COLOR"), d.color),
        }
    }

    /// Checks that every tunable is usable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("band_width", self.band_width),
            ("tolerance", self.tolerance),
            ("nudge_distance", self.nudge_distance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TapeError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("elevation", self.elevation),
            ("thickness", self.thickness),
            ("adjacency_tolerance", self.adjacency_tolerance),
            ("ray_epsilon", self.ray_epsilon),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TapeError::InvalidConfig(format!(
                    "{name} must be zero or positive, got {value}"
                )));
            }
        }

        if self.sample_count == 0 {
            return Err(TapeError::InvalidConfig(
                "sample_count must be at least 1".into(),
            ));
        }
        if !(self.miter_limit.is_finite() && self.miter_limit >= 1.0) {
            return Err(TapeError::InvalidConfig(format!(
                "miter_limit must be at least 1, got {}",
                self.miter_limit
            )));
        }
        if self.extrude_bands && self.thickness <= 0.0 {
            return Err(TapeError::InvalidConfig(
                "extrude_bands needs a positive thickness".into(),
            ));
        }
        if self.material_name.trim().is_empty() {
            return Err(TapeError::InvalidConfig("material_name is empty".into()));
        }
        Ok(())
    }
}
