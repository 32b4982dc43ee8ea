// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batch orchestration.
//!
//! For every zone: clean the loop, extract its segments and build one band
//! per segment. A failure skips only the segment (or zone) it belongs to and
//! is recorded in the [`BatchReport`]; the batch always runs to completion.

use tracing::{debug, info, info_span, warn};

use crate::band::{build_band, Band, BandFrame, ROLE_KEY, ROLE_TAPE};
use crate::config::TapeConfig;
use crate::conflict::conflict_hits;
use crate::context::EngineContext;
use crate::error::{Result, TapeError};
use crate::host::{AttributeValue, HostKernel};
use crate::layout::ZoneLoop;
use crate::loop_cleaner::{clean, extract_segments, winding, Winding};
use crate::point::{to_array, Segment};
use crate::report::{BatchReport, SegmentReport, SegmentStatus, ZoneFailure, ZoneReport};

/// Tape generation engine, configured once per invocation.
///
/// # Example
///
/// ```
/// use floortape_engine::{TapeConfig, TapeEngine, ZoneLoop};
/// use floortape_scene::SceneArena;
///
/// let engine = TapeEngine::new(TapeConfig { band_width: 5.0, ..TapeConfig::default() }).unwrap();
/// let mut scene = SceneArena::new();
/// let root = scene.root();
///
/// let zone = ZoneLoop::new(
///     "Assembly",
///     [[0.0, 0.0, 0.0], [100.0, 0.0, 0.0], [100.0, 50.0, 0.0], [0.0, 50.0, 0.0]],
/// );
/// let report = engine.generate(&mut scene, root, &[zone]);
///
/// assert_eq!(report.bands_built(), 4);
/// assert_eq!(engine.bands_in(&scene, root).len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct TapeEngine {
    config: TapeConfig,
}

impl TapeEngine {
    /// Creates an engine, rejecting unusable configuration.
    pub fn new(config: TapeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TapeConfig {
        &self.config
    }

    /// Generates bands for every zone, in order, under `parent`.
    pub fn generate<H: HostKernel>(
        &self,
        host: &mut H,
        parent: H::Container,
        zones: &[ZoneLoop],
    ) -> BatchReport {
        let report = BatchReport {
            zones: zones
                .iter()
                .map(|zone| self.generate_zone(host, parent, zone))
                .collect(),
        };

        info!(
            zones = report.zones.len(),
            failed_zones = report.failed_zones(),
            bands = report.bands_built(),
            skipped = report.skipped(),
            uncolored = report.uncolored(),
            repaired = report.repaired(),
            "tape generation finished"
        );
        report
    }

    /// Generates the bands of one zone outline.
    pub fn generate_zone<H: HostKernel>(
        &self,
        host: &mut H,
        parent: H::Container,
        zone: &ZoneLoop,
    ) -> ZoneReport {
        let span = info_span!("zone", zone = %zone.label);
        let _enter = span.enter();
        let ctx = EngineContext::new(&self.config, &zone.label);

        let points = match clean(&zone.points, self.config.tolerance) {
            Ok(points) => points,
            Err(err) => {
                warn!(error = %err, "zone skipped");
                return ZoneReport {
                    label: zone.label.clone(),
                    input_points: zone.points.len(),
                    loop_points: 0,
                    segments: Vec::new(),
                    failure: Some(ZoneFailure::from(&err)),
                };
            }
        };

        let loop_winding = winding(&points);
        let segments = extract_segments(&points, self.config.tolerance);
        debug!(
            points = points.len(),
            segments = segments.len(),
            winding = ?loop_winding,
            "loop cleaned"
        );

        let reports = segments
            .iter()
            .map(|segment| self.process_segment(host, &ctx, parent, segment, loop_winding))
            .collect();

        ZoneReport {
            label: zone.label.clone(),
            input_points: zone.points.len(),
            loop_points: points.len(),
            segments: reports,
            failure: None,
        }
    }

    /// Bands previously generated under `parent`, found by attribute.
    pub fn bands_in<H: HostKernel>(&self, host: &H, parent: H::Container) -> Vec<H::Face> {
        let tape = AttributeValue::Text(ROLE_TAPE.into());
        host.faces_in(parent)
            .into_iter()
            .filter(|&f| host.get_attribute(f, ROLE_KEY).as_ref() == Some(&tape))
            .collect()
    }

    fn process_segment<H: HostKernel>(
        &self,
        host: &mut H,
        ctx: &EngineContext<'_>,
        parent: H::Container,
        segment: &Segment,
        loop_winding: Winding,
    ) -> SegmentReport {
        let mut report = SegmentReport {
            index: segment.index,
            start: to_array(&segment.start),
            end: to_array(&segment.end),
            status: SegmentStatus::Built,
            state: None,
            repair: None,
            extrusion: None,
            obstruction_hits: 0,
        };

        match self.try_segment(host, ctx, parent, segment, loop_winding, &mut report) {
            Ok(band) => {
                report.status = match band.uncolored {
                    Some(reason) => SegmentStatus::BuiltUncolored { reason },
                    None => SegmentStatus::Built,
                };
                report.state = Some(band.state);
                report.repair = Some(band.repair);
                report.extrusion = band.extrusion;
            }
            Err(err) => {
                warn!(
                    segment = segment.index,
                    start = ?report.start,
                    end = ?report.end,
                    error = %err,
                    "segment skipped"
                );
                report.status = SegmentStatus::Skipped {
                    kind: err.kind(),
                    detail: err.to_string(),
                };
            }
        }
        report
    }

    fn try_segment<H: HostKernel>(
        &self,
        host: &mut H,
        ctx: &EngineContext<'_>,
        parent: H::Container,
        segment: &Segment,
        loop_winding: Winding,
        report: &mut SegmentReport,
    ) -> Result<Band<H::Face>> {
        let frame = BandFrame::new(segment, &self.config, loop_winding).ok_or_else(|| {
            TapeError::DegenerateSegment {
                start: report.start,
                end: report.end,
                reason: "segment has no horizontal extent".into(),
            }
        })?;

        let hits = conflict_hits(host, ctx, &frame);
        report.obstruction_hits = hits;
        if hits > 0 {
            if self.config.skip_obstructed {
                return Err(TapeError::Obstructed { hits });
            }
            warn!(segment = segment.index, hits, "band volume obstructed, building anyway");
        }

        build_band(host, ctx, parent, &frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floortape_scene::SceneArena;

    #[test]
    fn invalid_config_is_rejected() {
        let config = TapeConfig {
            band_width: -5.0,
            ..TapeConfig::default()
        };
        assert!(matches!(TapeEngine::new(config), Err(TapeError::InvalidConfig(_))));
    }

    #[test]
    fn short_zone_is_reported_and_batch_continues() {
        let engine = TapeEngine::new(TapeConfig {
            band_width: 5.0,
            ..TapeConfig::default()
        })
        .unwrap();
        let mut scene = SceneArena::new();
        let root = scene.root();

        let zones = [
            ZoneLoop::new("Line", [[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]]),
            ZoneLoop::new(
                "Square",
                [[0.0, 100.0, 0.0], [20.0, 100.0, 0.0], [20.0, 120.0, 0.0], [0.0, 120.0, 0.0]],
            ),
        ];
        let report = engine.generate(&mut scene, root, &zones);

        assert_eq!(report.failed_zones(), 1);
        assert_eq!(
            report.zones[0].failure.as_ref().unwrap().kind,
            crate::error::ErrorKind::InsufficientPoints
        );
        assert_eq!(report.zones[1].bands_built(), 4);
    }

    #[test]
    fn bands_are_tagged_with_zone_and_segment() {
        let engine = TapeEngine::new(TapeConfig {
            band_width: 5.0,
            ..TapeConfig::default()
        })
        .unwrap();
        let mut scene = SceneArena::new();
        let root = scene.root();
        let zone = ZoneLoop::new("Dock", [[0.0, 0.0, 0.0], [40.0, 0.0, 0.0], [0.0, 30.0, 0.0]]);

        engine.generate_zone(&mut scene, root, &zone);
        let bands = engine.bands_in(&scene, root);
        assert_eq!(bands.len(), 3);
        for (i, band) in bands.iter().enumerate() {
            assert_eq!(
                HostKernel::get_attribute(&scene, *band, "zone"),
                Some(AttributeValue::Text("Dock".into()))
            );
            assert_eq!(
                HostKernel::get_attribute(&scene, *band, "segment"),
                Some(AttributeValue::Int(i as i64))
            );
        }
    }
}
