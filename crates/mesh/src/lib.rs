//! Road Mesh Builder: turns road segments and intersection nodes into plain
//! vertex/index buffers seated on sampled terrain.
//!
//! # Invariants
//! - Builders are pure: same segment, sampler and config give the same buffers.
//! - Every index in a [`MeshBuffers`] points at one of its own vertices,
//!   including after [`merge_road_geometries`].
//! - Top faces wind counter-clockwise seen from above (+Y).
//! - Alleys carry no markings; only boulevards carry edge lines.

mod buffers;
mod config;
mod heights;
mod intersection;
mod queue;
mod road;

pub use buffers::{MeshBuffers, RoadMeshSet, RoadVertex};
pub use config::{MeshConfig, MeshError};
pub use heights::{FlatGround, HeightSampler};
pub use intersection::build_intersection_patch;
pub use queue::{BatchedMeshQueue, InlineMeshQueue, MeshJob, MeshQueue, MeshTicket};
pub use road::{MAX_STEPS, build_road_mesh, clip_to_rect, merge_road_geometries};

pub fn crate_info() -> &'static str {
    "cityforge-mesh v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("mesh"));
    }
}
