//! Shared schema types for the city world core.
//!
//! Everything here is plain data: identifiers, axis-aligned rectangles, road
//! records and district names. Generator, mesh builder and chunk manager all
//! speak these types so the mesh builder never has to depend on the
//! generator itself.
//!
//! # Conventions
//! - Ground-plane positions are `glam::DVec2` where `x` is world X and `y` is
//!   world Z. Height is always a separate scalar.
//! - Identifiers are dense indices assigned in generation order, so they are
//!   stable across regenerations with the same seed.

mod types;

pub use types::{
    BlockId, DistrictType, IntersectionId, IntersectionNode, PlotId, Rect, RoadId, RoadKind,
    RoadSegment, WorldSeed,
};

pub fn crate_info() -> &'static str {
    "cityforge-common v0.1.0"
}
