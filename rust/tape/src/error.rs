// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error taxonomy for tape generation.
//!
//! Every stage returns a [`TapeError`] instead of unwinding; the engine turns
//! each one into a skipped (or uncolored) entry of the batch report.

use serde::Serialize;
use thiserror::Error;

/// Result type for tape engine operations.
pub type Result<T> = std::result::Result<T, TapeError>;

/// A named strategy in a fallback chain and why it did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyFailure {
    pub strategy: &'static str,
    pub reason: String,
}

impl StrategyFailure {
    pub fn new(strategy: &'static str, reason: impl Into<String>) -> Self {
        Self {
            strategy,
            reason: reason.into(),
        }
    }
}

/// Errors produced by the tape pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TapeError {
    #[error("loop has {count} usable points after cleaning, need at least 3")]
    InsufficientPoints { count: usize },

    #[error("invalid loop point: {0}")]
    InvalidPoint(String),

    #[error("segment {start:?} -> {end:?} is degenerate: {reason}")]
    DegenerateSegment {
        start: [f64; 3],
        end: [f64; 3],
        reason: String,
    },

    #[error("host refused band face for segment {start:?} -> {end:?}")]
    FaceCreationFailure { start: [f64; 3], end: [f64; 3] },

    #[error("elevating band {band} failed: {detail}")]
    TransformFailure { band: String, detail: String },

    #[error("adjacency repair of band {band} exhausted {} strategies", attempts.len())]
    RepairExhausted {
        band: String,
        attempts: Vec<StrategyFailure>,
    },

    #[error("material failure: {0}")]
    MaterialFailure(String),

    #[error("band volume obstructed by existing geometry ({hits} ray hits)")]
    Obstructed { hits: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Serializable discriminant of [`TapeError`], used by reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InsufficientPoints,
    InvalidPoint,
    DegenerateSegment,
    FaceCreationFailure,
    TransformFailure,
    RepairExhausted,
    MaterialFailure,
    Obstructed,
    InvalidConfig,
}

impl TapeError {
    /// Returns the taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TapeError::InsufficientPoints { .. } => ErrorKind::InsufficientPoints,
            TapeError::InvalidPoint(_) => ErrorKind::InvalidPoint,
            TapeError::DegenerateSegment { .. } => ErrorKind::DegenerateSegment,
            TapeError::FaceCreationFailure { .. } => ErrorKind::FaceCreationFailure,
            TapeError::TransformFailure { .. } => ErrorKind::TransformFailure,
            TapeError::RepairExhausted { .. } => ErrorKind::RepairExhausted,
            TapeError::MaterialFailure(_) => ErrorKind::MaterialFailure,
            TapeError::Obstructed { .. } => ErrorKind::Obstructed,
            TapeError::InvalidConfig(_) => ErrorKind::InvalidConfig,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let err = TapeError::RepairExhausted {
            band: "FaceKey(1v1)".into(),
            attempts: vec![
                StrategyFailure::new("nudged", "2 unique vertices"),
                StrategyFailure::new("original_vertices", "2 unique vertices"),
            ],
        };
        assert_eq!(err.kind(), ErrorKind::RepairExhausted);
        assert!(err.to_string().contains("exhausted 2 strategies"));
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::FaceCreationFailure).unwrap();
        assert_eq!(json, "\"face_creation_failure\"");
    }
}
