// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-invocation state threaded through every pipeline stage.

use crate::config::TapeConfig;

/// Read-only context for one zone's tape generation.
#[derive(Debug, Clone, Copy)]
pub struct EngineContext<'a> {
    pub config: &'a TapeConfig,
    /// Label of the zone being processed, carried into logs and band tags.
    pub zone: &'a str,
}

impl<'a> EngineContext<'a> {
    pub fn new(config: &'a TapeConfig, zone: &'a str) -> Self {
        Self { config, zone }
    }
}
