use std::collections::HashMap;

use cityforge_common::{IntersectionId, PlotId, Rect, RoadId};
use cityforge_layout::CityLayout;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A chunk coordinate on the ground grid (ignoring Y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing the ground point `(x, z)`.
    pub fn from_world(x: f64, z: f64, chunk_size: f64) -> Self {
        Self {
            x: (x / chunk_size).floor() as i32,
            z: (z / chunk_size).floor() as i32,
        }
    }

    /// Neighbour `(dx, dz)` away, pinned at the edge of the `i32` grid.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.z.saturating_add(dz))
    }

    /// Neighbour `(dx, dz)` away, or `None` past the edge of the `i32` grid.
    pub fn checked_offset(self, dx: i32, dz: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.z.checked_add(dz)?))
    }

    pub fn origin(self, chunk_size: f64) -> DVec2 {
        DVec2::new(self.x as f64 * chunk_size, self.z as f64 * chunk_size)
    }

    pub fn center(self, chunk_size: f64) -> DVec2 {
        self.origin(chunk_size) + DVec2::splat(chunk_size * 0.5)
    }

    pub fn bounds(self, chunk_size: f64) -> Rect {
        let origin = self.origin(chunk_size);
        Rect::new(origin, origin + DVec2::splat(chunk_size))
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Chunk-keyed index over one layout snapshot.
///
/// Plots and intersections land in the chunk holding their position. Roads
/// land in every chunk their paved bounds overlap. Ids inside a chunk keep
/// snapshot order.
#[derive(Debug, Clone, Default)]
pub struct ChunkIndex {
    chunk_size: f64,
    plots: HashMap<ChunkCoord, Vec<PlotId>>,
    roads: HashMap<ChunkCoord, Vec<RoadId>>,
    intersections: HashMap<ChunkCoord, Vec<IntersectionId>>,
}

impl ChunkIndex {
    pub fn new(chunk_size: f64) -> Self {
        Self {
            chunk_size,
            ..Self::default()
        }
    }

    pub fn chunk_size(&self) -> f64 {
        self.chunk_size
    }

    /// Rebuild the whole index from a snapshot.
    pub fn rebuild(&mut self, layout: &CityLayout) {
        self.plots.clear();
        self.roads.clear();
        self.intersections.clear();

        for plot in layout.plots() {
            let coord = ChunkCoord::from_world(plot.center.x, plot.center.y, self.chunk_size);
            self.plots.entry(coord).or_default().push(plot.id);
        }
        for node in layout.intersections() {
            let coord = ChunkCoord::from_world(node.position.x, node.position.y, self.chunk_size);
            self.intersections.entry(coord).or_default().push(node.id);
        }
        for road in layout.roads() {
            let bounds = road.bounds();
            let min = ChunkCoord::from_world(bounds.min.x, bounds.min.y, self.chunk_size);
            let max = ChunkCoord::from_world(bounds.max.x, bounds.max.y, self.chunk_size);
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    self.roads.entry(ChunkCoord::new(x, z)).or_default().push(road.id);
                }
            }
        }
        tracing::debug!(
            plot_chunks = self.plots.len(),
            road_chunks = self.roads.len(),
            "chunk index rebuilt"
        );
    }

    pub fn plots_in(&self, coord: ChunkCoord) -> &[PlotId] {
        self.plots.get(&coord).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn roads_in(&self, coord: ChunkCoord) -> &[RoadId] {
        self.roads.get(&coord).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn intersections_in(&self, coord: ChunkCoord) -> &[IntersectionId] {
        self.intersections
            .get(&coord)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn square(center: ChunkCoord, radius: i32) -> impl Iterator<Item = ChunkCoord> {
        (-radius..=radius)
            .flat_map(move |dz| (-radius..=radius).map(move |dx| (dx, dz)))
            .filter_map(move |(dx, dz)| center.checked_offset(dx, dz))
    }

    /// Plot ids within a square radius (in chunks) of `center`, sorted.
    pub fn plots_in_radius(&self, center: ChunkCoord, radius: i32) -> Vec<PlotId> {
        let mut result = Vec::new();
        for coord in Self::square(center, radius) {
            result.extend_from_slice(self.plots_in(coord));
        }
        result.sort_unstable();
        result
    }

    /// Road ids touching a square radius (in chunks) of `center`, sorted and
    /// deduplicated.
    pub fn roads_in_radius(&self, center: ChunkCoord, radius: i32) -> Vec<RoadId> {
        let mut result = Vec::new();
        for coord in Self::square(center, radius) {
            result.extend_from_slice(self.roads_in(coord));
        }
        result.sort_unstable();
        result.dedup();
        result
    }

    /// Number of chunks holding at least one plot.
    pub fn plot_chunk_count(&self) -> usize {
        self.plots.len()
    }

    /// Total road placements across all chunks.
    pub fn road_placements(&self) -> usize {
        self.roads.values().map(Vec::len).sum()
    }
}
