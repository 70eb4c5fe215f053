//! District Geometry: named district polygons, classification and zoning.
//!
//! # Invariants
//! - Boundaries are immutable once built for a world size.
//! - Classification is a pure function of the point and the boundary list.
//! - Coverage is not a partition of the world square: points outside every
//!   polygon resolve to [`FALLBACK_DISTRICT`].

mod boundary;
mod zoning;

pub use boundary::{
    classify, classify_detailed, generate_district_boundaries, point_in_polygon, Classification,
    DistrictBoundary, DistrictMap, DistrictTemplate, FALLBACK_DISTRICT,
};
pub use zoning::{DistrictProfile, PlotTier, VenueKind, ZoneConfig, ZoningTable};

pub fn crate_info() -> &'static str {
    "cityforge-district v0.1.0"
}
