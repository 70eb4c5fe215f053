use cityforge_common::{DistrictType, PlotId, RoadId};
use glam::DVec3;
use serde::Serialize;

use crate::chunk::Lod;
use crate::grid::ChunkCoord;

/// One visible chunk as reported to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisibleChunk {
    pub coord: ChunkCoord,
    pub distance: f64,
    pub lod: Lod,
    pub priority: f64,
    pub loaded: bool,
}

/// Immutable summary produced once per position update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldState {
    /// Update counter; increases by one per position update.
    pub tick: u64,
    pub observer: DVec3,
    pub observer_chunk: ChunkCoord,
    /// District under the observer.
    pub district: DistrictType,
    /// Visible chunks, nearest first.
    pub visible: Vec<VisibleChunk>,
    pub loaded_count: usize,
    pub load_queue_len: usize,
    pub unload_queue_len: usize,
    /// Plots within two chunk widths of the observer, by id.
    pub nearby_plots: Vec<PlotId>,
    /// Roads within two chunk widths of the observer, by id.
    pub nearby_roads: Vec<RoadId>,
}

impl WorldState {
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn is_visible(&self, coord: ChunkCoord) -> bool {
        self.visible.iter().any(|c| c.coord == coord)
    }

    pub fn lod_of(&self, coord: ChunkCoord) -> Option<Lod> {
        self.visible.iter().find(|c| c.coord == coord).map(|c| c.lod)
    }
}
