//! Layout Generator: roads, intersections, alleys, blocks, plots and
//! landmarks, produced in one synchronous pass into an immutable
//! [`CityLayout`].
//!
//! # Invariants
//! - Same seed and configuration reproduce the same snapshot, bit for bit.
//! - Every stage reads only earlier stages' output.
//! - Every plot's centre lies inside its block and shares its district.
//! - A plot's buildable flag can be revoked but never granted afterwards.
//! - Nothing is dropped silently: undersized blocks, unmatched landmarks and
//!   fallback classifications are recorded in [`Diagnostics`].

mod blocks;
mod config;
mod diagnostics;
mod generator;
mod landmarks;
mod plots;
mod roads;
mod snapshot;

pub use blocks::CityBlock;
pub use config::{LayoutConfig, LayoutError};
pub use diagnostics::{Diagnostics, DropReason, DroppedBlock};
pub use generator::LayoutGenerator;
pub use landmarks::{LandmarkCatalog, LandmarkDefinition, PlacedLandmark};
pub use plots::{plot_grid, Plot, PlotCell, PlotRefs};
pub use snapshot::{CityLayout, DistrictStats};

pub fn crate_info() -> &'static str {
    "cityforge-layout v0.1.0"
}
