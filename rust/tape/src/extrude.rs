// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Optional thickening of bands into solids.
//!
//! Used only when `extrude_bands` is set. Three strategies are tried in
//! order; when all of them fail the band is kept flat and its topology is
//! logged for diagnosis.

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, warn};

use crate::band::ROLE_KEY;
use crate::context::EngineContext;
use crate::error::StrategyFailure;
use crate::host::{AttributeValue, FaceTopology, HostKernel};
use crate::point::Point3D;

/// Value of [`ROLE_KEY`] on the caps and sides of an extruded band.
pub const ROLE_TAPE_SOLID: &str = "tape_solid";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrudeStrategy {
    /// Push/pull the band face itself.
    DirectPushPull,
    /// Push/pull a copy inside a temporary container, then explode it.
    SubContainer,
    /// Build the top face and one side face per edge by hand.
    ManualFaces,
}

impl ExtrudeStrategy {
    pub const CHAIN: [ExtrudeStrategy; 3] = [
        ExtrudeStrategy::DirectPushPull,
        ExtrudeStrategy::SubContainer,
        ExtrudeStrategy::ManualFaces,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExtrudeStrategy::DirectPushPull => "direct_pushpull",
            ExtrudeStrategy::SubContainer => "sub_container",
            ExtrudeStrategy::ManualFaces => "manual_faces",
        }
    }

    fn run<H: HostKernel>(
        self,
        host: &mut H,
        parent: H::Container,
        face: H::Face,
        distance: f64,
    ) -> Result<(), String> {
        match self {
            ExtrudeStrategy::DirectPushPull => {
                if host.pushpull(face, distance) {
                    Ok(())
                } else {
                    Err("host refused push/pull".into())
                }
            }
            ExtrudeStrategy::SubContainer => sub_container(host, parent, face, distance),
            ExtrudeStrategy::ManualFaces => manual_faces(host, parent, face, distance),
        }
    }
}

/// Result of the extrusion chain for one band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtrusionReport {
    /// The strategy that succeeded, if any.
    pub strategy: Option<ExtrudeStrategy>,
    pub failures: Vec<StrategyFailure>,
    /// Band topology, captured only when every strategy failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topology: Option<FaceTopology>,
}

/// Thickens the band by the configured thickness along its normal.
pub fn extrude_band<H: HostKernel>(
    host: &mut H,
    ctx: &EngineContext<'_>,
    parent: H::Container,
    face: H::Face,
) -> ExtrusionReport {
    let distance = ctx.config.thickness;
    let mut failures = Vec::new();

    for strategy in ExtrudeStrategy::CHAIN {
        let before: FxHashSet<H::Face> = host.faces_in(parent).into_iter().collect();
        match strategy.run(host, parent, face, distance) {
            Ok(()) => {
                let solid = tag_solid_faces(host, parent, face, &before);
                debug!(
                    zone = ctx.zone,
                    band = ?face,
                    strategy = strategy.name(),
                    solid,
                    "band extruded"
                );
                return ExtrusionReport {
                    strategy: Some(strategy),
                    failures,
                    topology: None,
                };
            }
            Err(reason) => {
                debug!(
                    zone = ctx.zone,
                    band = ?face,
                    strategy = strategy.name(),
                    reason = %reason,
                    "extrusion strategy failed"
                );
                failures.push(StrategyFailure::new(strategy.name(), reason));
            }
        }
    }

    let topology = host.face_topology(face);
    match topology {
        Some(t) => warn!(
            zone = ctx.zone,
            band = ?face,
            vertices = t.vertices,
            edges = t.edges,
            loops = t.loops,
            "every extrusion strategy failed, band left flat"
        ),
        None => warn!(
            zone = ctx.zone,
            band = ?face,
            "every extrusion strategy failed and the band is unreadable"
        ),
    }
    ExtrusionReport {
        strategy: None,
        failures,
        topology,
    }
}

/// Marks every face of `parent` missing from `before` as part of the
/// band's solid so later adjacency scans skip it. Returns the count.
fn tag_solid_faces<H: HostKernel>(
    host: &mut H,
    parent: H::Container,
    band: H::Face,
    before: &FxHashSet<H::Face>,
) -> usize {
    let added: Vec<H::Face> = host
        .faces_in(parent)
        .into_iter()
        .filter(|f| *f != band && !before.contains(f))
        .collect();
    for &f in &added {
        host.set_attribute(f, ROLE_KEY, AttributeValue::Text(ROLE_TAPE_SOLID.into()));
    }
    added.len()
}

fn sub_container<H: HostKernel>(
    host: &mut H,
    parent: H::Container,
    face: H::Face,
    distance: f64,
) -> Result<(), String> {
    let vertices = host.face_vertices(face).ok_or("band has no vertices")?;
    let container = host
        .create_container(parent)
        .ok_or("host refused temporary container")?;

    let Some(copy) = host.create_planar_face(container, &vertices) else {
        host.explode(container);
        return Err("host refused band copy".into());
    };
    if !host.pushpull(copy, distance) {
        host.erase(copy);
        host.explode(container);
        return Err("host refused push/pull of the copy".into());
    }

    // The copy duplicates the band, which stays as the base.
    host.erase(copy);
    if host.explode(container) {
        Ok(())
    } else {
        Err("host refused to explode the temporary container".into())
    }
}

fn manual_faces<H: HostKernel>(
    host: &mut H,
    parent: H::Container,
    face: H::Face,
    distance: f64,
) -> Result<(), String> {
    let base = host.face_vertices(face).ok_or("band has no vertices")?;
    let normal = host.face_normal(face).ok_or("band has no normal")?;
    let top: Vec<Point3D> = base.iter().map(|p| p + normal * distance).collect();

    let n = base.len();
    let mut loops = Vec::with_capacity(n + 1);
    loops.push(top.clone());
    for i in 0..n {
        let j = (i + 1) % n;
        loops.push(vec![base[i], base[j], top[j], top[i]]);
    }

    let mut created = Vec::with_capacity(loops.len());
    for points in &loops {
        match host.create_planar_face(parent, points) {
            Some(f) => created.push(f),
            None => {
                for f in created {
                    host.erase(f);
                }
                return Err("host refused a manual face".into());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TapeConfig;
    use floortape_scene::SceneArena;

    #[test]
    fn direct_pushpull_succeeds_on_scene() {
        let mut scene = SceneArena::new();
        let root = scene.root();
        let face = scene
            .add_face(
                root,
                &[
                    Point3D::new(0.0, 0.0, 1.0),
                    Point3D::new(10.0, 0.0, 1.0),
                    Point3D::new(10.0, 5.0, 1.0),
                    Point3D::new(0.0, 5.0, 1.0),
                ],
            )
            .unwrap();
        let config = TapeConfig {
            thickness: 2.0,
            ..TapeConfig::default()
        };
        let ctx = EngineContext::new(&config, "Zone");

        let report = extrude_band(&mut scene, &ctx, root, face);
        assert_eq!(report.strategy, Some(ExtrudeStrategy::DirectPushPull));
        assert!(report.failures.is_empty());
        assert_eq!(scene.face_count(), 6);

        let solid = AttributeValue::Text(ROLE_TAPE_SOLID.into());
        let tagged = HostKernel::faces_in(&scene, root)
            .into_iter()
            .filter(|&f| HostKernel::get_attribute(&scene, f, ROLE_KEY).as_ref() == Some(&solid))
            .count();
        assert_eq!(tagged, 5);
        assert_eq!(HostKernel::get_attribute(&scene, face, ROLE_KEY), None);
    }

    #[test]
    fn sub_container_and_manual_strategies_build_prisms() {
        for strategy in [ExtrudeStrategy::SubContainer, ExtrudeStrategy::ManualFaces] {
            let mut scene = SceneArena::new();
            let root = scene.root();
            let face = scene
                .add_face(
                    root,
                    &[
                        Point3D::new(0.0, 0.0, 1.0),
                        Point3D::new(10.0, 0.0, 1.0),
                        Point3D::new(10.0, 5.0, 1.0),
                    ],
                )
                .unwrap();

            strategy.run(&mut scene, root, face, 1.0).unwrap();
            assert_eq!(scene.group_faces(root).len(), 5, "{strategy:?}");
            assert_eq!(scene.group_count(), 1, "{strategy:?}");
            assert!(scene.face_points(face).unwrap().iter().all(|p| p.z == 1.0));
        }
    }
}
