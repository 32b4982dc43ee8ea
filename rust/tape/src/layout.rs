// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zone outlines handed to the engine by the layout importer.

use serde::Deserialize;

use crate::point::LoopPoint;

/// A labelled, implicitly closed zone outline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZoneLoop {
    #[serde(alias = "name")]
    pub label: String,
    pub points: Vec<LoopPoint>,
}

impl ZoneLoop {
    pub fn new<P: Into<LoopPoint>>(
        label: impl Into<String>,
        points: impl IntoIterator<Item = P>,
    ) -> Self {
        Self {
            label: label.into(),
            points: points.into_iter().map(Into::into).collect(),
        }
    }
}
