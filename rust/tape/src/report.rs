// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-segment and per-zone outcomes of a batch run.

use serde::Serialize;

use crate::elevator::BandState;
use crate::error::{ErrorKind, TapeError};
use crate::extrude::ExtrusionReport;
use crate::repair::RepairOutcome;

/// Final status of one boundary segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SegmentStatus {
    Built,
    /// Geometry kept without its material.
    BuiltUncolored { reason: String },
    Skipped { kind: ErrorKind, detail: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentReport {
    pub index: usize,
    pub start: [f64; 3],
    pub end: [f64; 3],
    pub status: SegmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<BandState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair: Option<RepairOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extrusion: Option<ExtrusionReport>,
    /// In-range conflict ray hits (always 0 with detection disabled).
    pub obstruction_hits: usize,
}

impl SegmentReport {
    pub fn is_built(&self) -> bool {
        !matches!(self.status, SegmentStatus::Skipped { .. })
    }
}

/// Why a whole zone produced no segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneFailure {
    pub kind: ErrorKind,
    pub detail: String,
}

impl From<&TapeError> for ZoneFailure {
    fn from(err: &TapeError) -> Self {
        Self {
            kind: err.kind(),
            detail: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneReport {
    pub label: String,
    /// Raw input points.
    pub input_points: usize,
    /// Points left after cleaning.
    pub loop_points: usize,
    pub segments: Vec<SegmentReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ZoneFailure>,
}

impl ZoneReport {
    pub fn bands_built(&self) -> usize {
        self.segments.iter().filter(|s| s.is_built()).count()
    }

    pub fn count(&self, pred: impl Fn(&SegmentReport) -> bool) -> usize {
        self.segments.iter().filter(|s| pred(*s)).count()
    }
}

/// Outcome of a whole batch, one entry per zone in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub zones: Vec<ZoneReport>,
}

impl BatchReport {
    pub fn bands_built(&self) -> usize {
        self.zones.iter().map(ZoneReport::bands_built).sum()
    }

    pub fn uncolored(&self) -> usize {
        self.total(|s| matches!(s.status, SegmentStatus::BuiltUncolored { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.total(|s| !s.is_built())
    }

    pub fn repaired(&self) -> usize {
        self.total(|s| matches!(s.repair, Some(RepairOutcome::Repaired { .. })))
    }

    pub fn failed_zones(&self) -> usize {
        self.zones.iter().filter(|z| z.failure.is_some()).count()
    }

    fn total(&self, pred: impl Fn(&SegmentReport) -> bool) -> usize {
        self.zones.iter().map(|z| z.count(&pred)).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(index: usize, status: SegmentStatus) -> SegmentReport {
        SegmentReport {
            index,
            start: [0.0; 3],
            end: [1.0, 0.0, 0.0],
            status,
            state: None,
            repair: None,
            extrusion: None,
            obstruction_hits: 0,
        }
    }

    #[test]
    fn totals_and_json_shape() {
        let report = BatchReport {
            zones: vec![ZoneReport {
                label: "Assembly".into(),
                input_points: 4,
                loop_points: 4,
                segments: vec![
                    segment(0, SegmentStatus::Built),
                    segment(
                        1,
                        SegmentStatus::BuiltUncolored {
                            reason: "no material".into(),
                        },
                    ),
                    segment(
                        2,
                        SegmentStatus::Skipped {
                            kind: ErrorKind::FaceCreationFailure,
                            detail: "refused".into(),
                        },
                    ),
                ],
                failure: None,
            }],
        };

        assert_eq!(report.bands_built(), 2);
        assert_eq!(report.uncolored(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.repaired(), 0);

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        let skipped = &json["zones"][0]["segments"][2]["status"];
        assert_eq!(skipped["status"], "skipped");
        assert_eq!(skipped["kind"], "face_creation_failure");
        assert!(json["zones"][0].get("failure").is_none());
    }
}
