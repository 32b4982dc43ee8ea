// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # FloorTape Engine
//!
//! Generates fixed-width boundary "tape" bands along zone outlines inside a
//! host modelling document.
//!
//! Per zone, the pipeline is:
//!
//! 1. [`loop_cleaner`] turns raw points into a loop of distinct points and
//!    extracts each undirected edge once.
//! 2. [`conflict`] optionally ray-samples the band volume for obstructions.
//! 3. [`band`] creates the mitred band face, [`elevator`] lifts it off the
//!    traced surface, [`adjacency`] and [`repair`] separate shared edges
//!    from real overlaps and rebuild overlapping bands.
//! 4. [`extrude`] optionally thickens the band, [`material`] paints it.
//!
//! Every stage returns a [`TapeError`] instead of aborting; the
//! [`TapeEngine`] records each segment's outcome in a [`BatchReport`].
//!
//! The engine talks to its host only through the [`HostKernel`] trait. An
//! implementation for the in-memory [`floortape_scene::SceneArena`] is
//! provided.

pub mod adapter;
pub mod adjacency;
pub mod band;
pub mod bounds;
pub mod config;
pub mod conflict;
pub mod context;
pub mod elevator;
pub mod engine;
pub mod error;
pub mod extrude;
pub mod host;
pub mod layout;
pub mod loop_cleaner;
pub mod material;
pub mod point;
pub mod report;
pub mod repair;

pub use adjacency::{Adjacency, AdjacencyRecord};
pub use band::{build_band, Band, BandFrame};
pub use bounds::{AxisRelation, BoundingBox};
pub use config::{Placement, Rgba, TapeConfig};
pub use conflict::{has_conflict, ConflictSample};
pub use context::EngineContext;
pub use elevator::{BandSnapshot, BandState};
pub use engine::TapeEngine;
pub use error::{ErrorKind, Result, StrategyFailure, TapeError};
pub use extrude::{ExtrudeStrategy, ExtrusionReport, ROLE_TAPE_SOLID};
pub use host::{AttributeValue, FaceSide, FaceTopology, HostKernel, RayHit};
pub use layout::ZoneLoop;
pub use loop_cleaner::{clean, extract_segments, Winding};
pub use point::{LoopPoint, Point3D, Segment};
pub use repair::{RepairOutcome, RepairStrategy};
pub use report::{BatchReport, SegmentReport, SegmentStatus, ZoneFailure, ZoneReport};
