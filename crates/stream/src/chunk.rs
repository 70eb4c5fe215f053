use cityforge_common::DistrictType;
use cityforge_mesh::MeshTicket;
use serde::{Deserialize, Serialize};

use crate::config::ChunkConfig;
use crate::grid::ChunkCoord;

/// Detail tier of a visible chunk. Ordered from most to least detailed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lod {
    /// Full geometry.
    Full,
    /// Simplified geometry.
    Simplified,
    /// Boxes only.
    Proxy,
}

impl Lod {
    /// LOD band for a distance. Non-decreasing in `distance`.
    pub fn for_distance(distance: f64, config: &ChunkConfig) -> Self {
        if distance <= config.lod_full_distance {
            Lod::Full
        } else if distance <= config.lod_simplified_distance {
            Lod::Simplified
        } else {
            Lod::Proxy
        }
    }

    /// Numeric level: 0, 1 or 2.
    pub fn level(self) -> u8 {
        match self {
            Lod::Full => 0,
            Lod::Simplified => 1,
            Lod::Proxy => 2,
        }
    }
}

/// Where a chunk sits in the load/unload cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkPhase {
    Unloaded,
    QueuedLoad,
    /// Handed to the presentation layer by `pop_load`, not yet confirmed.
    Loading,
    Loaded,
    QueuedUnload,
}

/// Bookkeeping for one chunk coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkState {
    pub coord: ChunkCoord,
    pub district: DistrictType,
    pub lod: Lod,
    pub phase: ChunkPhase,
    pub visible: bool,
    pub priority: f64,
    /// Distance from the chunk centre to the observer at the last update.
    pub distance: f64,
    /// Update counter value when the chunk was last inside the view.
    pub last_access: u64,
    pub mesh: Option<MeshTicket>,
}

impl ChunkState {
    pub(crate) fn new(coord: ChunkCoord, district: DistrictType) -> Self {
        Self {
            coord,
            district,
            lod: Lod::Proxy,
            phase: ChunkPhase::Unloaded,
            visible: false,
            priority: 0.0,
            distance: f64::INFINITY,
            last_access: 0,
            mesh: None,
        }
    }

    /// Geometry is held by the presentation layer.
    pub fn is_loaded(&self) -> bool {
        matches!(self.phase, ChunkPhase::Loaded | ChunkPhase::QueuedUnload)
    }
}

/// A chunk the presentation layer should release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnloadRequest {
    pub coord: ChunkCoord,
    pub mesh: Option<MeshTicket>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lod_bands_follow_thresholds() {
        let config = ChunkConfig::default();
        assert_eq!(Lod::for_distance(0.0, &config), Lod::Full);
        assert_eq!(Lod::for_distance(250.0, &config), Lod::Full);
        assert_eq!(Lod::for_distance(250.1, &config), Lod::Simplified);
        assert_eq!(Lod::for_distance(750.0, &config).level(), 2);
    }

    #[test]
    fn lod_is_monotonic_in_distance() {
        let config = ChunkConfig::default();
        let mut previous = Lod::Full;
        for step in 0..=1000 {
            let lod = Lod::for_distance(step as f64, &config);
            assert!(lod >= previous);
            previous = lod;
        }
    }

    #[test]
    fn fresh_chunk_is_unloaded() {
        let state = ChunkState::new(ChunkCoord::new(1, 2), DistrictType::Suburbs);
        assert!(!state.is_loaded());
        assert!(!state.visible);
        assert!(state.mesh.is_none());
    }
}
