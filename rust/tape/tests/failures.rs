// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recovery paths, driven by a host that refuses chosen operations.

mod common;

use approx::assert_relative_eq;
use common::{config, rect, rect_loop, FlakyHost};
use floortape_engine::extrude::extrude_band;
use floortape_engine::repair::repair_adjacency;
use floortape_engine::{
    EngineContext, ErrorKind, ExtrudeStrategy, HostKernel, SegmentStatus, TapeConfig, TapeEngine,
    TapeError, ZoneLoop,
};

fn skipped_kind(status: &SegmentStatus) -> Option<ErrorKind> {
    match status {
        SegmentStatus::Skipped { kind, .. } => Some(*kind),
        _ => None,
    }
}

#[test]
fn failed_translation_rebuilds_band_at_elevation() {
    let engine = TapeEngine::new(config()).unwrap();
    let mut host = FlakyHost {
        fail_translate: true,
        ..FlakyHost::new()
    };
    let root = host.root();

    let report = engine.generate(
        &mut host,
        root,
        &[ZoneLoop::new("Zone", rect_loop(0.0, 0.0, 100.0, 50.0))],
    );

    assert_eq!(report.bands_built(), 4);
    let bands = engine.bands_in(&host, root);
    assert_eq!(bands.len(), 4);
    assert_eq!(host.faces_in(root).len(), 4);
    for band in bands {
        for p in host.face_vertices(band).unwrap() {
            assert_relative_eq!(p.z, 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn refused_snapshot_rebuild_is_a_transform_failure() {
    let config = config();
    let engine = TapeEngine::new(config).unwrap();
    let mut host = FlakyHost {
        fail_translate: true,
        face_budget: Some(1),
        ..FlakyHost::new()
    };
    let root = host.root();

    let report = engine.generate(
        &mut host,
        root,
        &[ZoneLoop::new("Zone", rect_loop(0.0, 0.0, 100.0, 50.0))],
    );
    let segments = &report.zones[0].segments;

    assert_eq!(skipped_kind(&segments[0].status), Some(ErrorKind::TransformFailure));
    assert!(segments[1..]
        .iter()
        .all(|s| skipped_kind(&s.status) == Some(ErrorKind::FaceCreationFailure)));
    // Neither the original band nor a partial rebuild is left behind.
    assert!(host.faces_in(root).is_empty());
}

#[test]
fn refused_faces_skip_segments_and_batch_continues() {
    let engine = TapeEngine::new(config()).unwrap();
    let mut host = FlakyHost {
        face_budget: Some(0),
        ..FlakyHost::new()
    };
    let root = host.root();

    let zones = [
        ZoneLoop::new("First", rect_loop(0.0, 0.0, 100.0, 50.0)),
        ZoneLoop::new("Second", rect_loop(0.0, 100.0, 30.0, 130.0)),
    ];
    let report = engine.generate(&mut host, root, &zones);

    assert_eq!(report.zones.len(), 2);
    assert_eq!(report.failed_zones(), 0);
    assert_eq!(report.skipped(), 8);
    assert_eq!(report.bands_built(), 0);
    for segment in report.zones.iter().flat_map(|z| &z.segments) {
        assert_eq!(skipped_kind(&segment.status), Some(ErrorKind::FaceCreationFailure));
    }
}

#[test]
fn material_failure_keeps_geometry_uncolored() {
    let engine = TapeEngine::new(config()).unwrap();
    let mut host = FlakyHost {
        fail_materials: true,
        ..FlakyHost::new()
    };
    let root = host.root();

    let report = engine.generate(
        &mut host,
        root,
        &[ZoneLoop::new("Zone", rect_loop(0.0, 0.0, 100.0, 50.0))],
    );

    assert_eq!(report.bands_built(), 4);
    assert_eq!(report.uncolored(), 4);
    for segment in &report.zones[0].segments {
        assert!(matches!(segment.status, SegmentStatus::BuiltUncolored { .. }));
    }
    for band in engine.bands_in(&host, root) {
        assert_eq!(host.face_material(band, floortape_engine::FaceSide::Front), None);
    }
}

#[test]
fn extrusion_falls_back_to_manual_faces() {
    let mut host = FlakyHost {
        fail_pushpull: true,
        ..FlakyHost::new()
    };
    let root = host.root();
    let band = host.create_planar_face(root, &rect(0.0, 0.0, 10.0, 5.0, 1.0)).unwrap();
    let config = TapeConfig {
        thickness: 0.5,
        ..config()
    };
    let ctx = EngineContext::new(&config, "Zone");

    let report = extrude_band(&mut host, &ctx, root, band);

    assert_eq!(report.strategy, Some(ExtrudeStrategy::ManualFaces));
    let tried: Vec<&str> = report.failures.iter().map(|f| f.strategy).collect();
    assert_eq!(tried, ["direct_pushpull", "sub_container"]);
    assert!(report.topology.is_none());
    // Base, cap and four sides; the temporary container is gone.
    assert_eq!(host.faces_in(root).len(), 6);
    assert_eq!(host.scene.group_count(), 1);
}

#[test]
fn exhausted_extrusion_reports_topology() {
    let mut host = FlakyHost {
        fail_pushpull: true,
        fail_containers: true,
        ..FlakyHost::new()
    };
    let root = host.root();
    let band = host.create_planar_face(root, &rect(0.0, 0.0, 10.0, 5.0, 1.0)).unwrap();
    host.face_budget = Some(2);
    let config = config();
    let ctx = EngineContext::new(&config, "Zone");

    let report = extrude_band(&mut host, &ctx, root, band);

    assert_eq!(report.strategy, None);
    assert_eq!(report.failures.len(), 3);
    let topology = report.topology.unwrap();
    assert_eq!((topology.vertices, topology.edges, topology.loops), (4, 4, 1));
    // Partial manual faces are rolled back.
    assert_eq!(host.faces_in(root), vec![band]);
}

#[test]
fn refused_repair_rebuild_removes_band() {
    let mut host = FlakyHost::new();
    let root = host.root();
    host.create_planar_face(root, &rect(0.0, -20.0, 10.0, -9.5, 1.0)).unwrap();
    let band = host.create_planar_face(root, &rect(0.0, 0.0, 10.0, 5.0, 1.0)).unwrap();
    host.face_budget = Some(0);

    let config = config();
    let ctx = EngineContext::new(&config, "Zone");
    let err = repair_adjacency(&mut host, &ctx, root, band).unwrap_err();

    match err {
        TapeError::RepairExhausted { attempts, .. } => {
            assert_eq!(attempts.len(), 1);
            assert_eq!(attempts[0].strategy, "nudged");
        }
        other => panic!("expected exhausted repair, got {other:?}"),
    }
    assert!(!host.is_valid(band));
    assert_eq!(host.faces_in(root).len(), 1);
}
