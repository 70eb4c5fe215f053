//! World/Chunk Manager: partitions the ground plane into square chunks,
//! decides which are visible around a moving observer and at what detail,
//! and queues them for loading and unloading.
//!
//! # Invariants
//! - A chunk is visible iff its centre lies inside the world and within the
//!   view distance of the observer.
//! - LOD never decreases in detail with distance.
//! - The load queue is ordered by descending priority and holds only
//!   visible chunks.
//! - The chunk cache never holds more than `max_chunks` entries and never
//!   evicts a visible chunk.
//! - Snapshots are shared read-only; a reseed swaps in a new one.

mod budget;
mod chunk;
mod config;
mod grid;
mod manager;
mod state;
mod world;

pub use budget::{FrameTimer, StreamStats};
pub use chunk::{ChunkPhase, ChunkState, Lod, UnloadRequest};
pub use config::{ChunkConfig, ConfigError, MAX_RINGS, StreamError, WorldConfig};
pub use grid::{ChunkCoord, ChunkIndex};
pub use manager::{ChunkManager, UpdateCallback};
pub use state::{VisibleChunk, WorldState};
pub use world::CityWorld;

pub fn crate_info() -> &'static str {
    "cityforge-stream v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("stream"));
    }
}
