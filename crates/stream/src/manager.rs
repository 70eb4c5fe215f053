use std::collections::{HashSet, VecDeque};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use cityforge_common::{DistrictType, PlotId, RoadId, RoadSegment};
use cityforge_layout::{CityLayout, Plot};
use cityforge_mesh::{MeshJob, MeshQueue, MeshTicket};
use cityforge_noise::NoiseField;
use glam::{DVec2, DVec3};
use lru::LruCache;
use tracing::{debug, info_span, trace};

use crate::budget::{FrameTimer, StreamStats};
use crate::chunk::{ChunkPhase, ChunkState, Lod, UnloadRequest};
use crate::config::{ChunkConfig, StreamError};
use crate::grid::{ChunkCoord, ChunkIndex};
use crate::state::{VisibleChunk, WorldState};

/// Called once per position update with the new summary.
pub type UpdateCallback = Box<dyn FnMut(&WorldState)>;

/// Tracks which chunks around the observer are visible, at what detail, and
/// what the presentation layer should load or release next.
///
/// Chunk states live in a bounded LRU cache. Every cached chunk in view is
/// touched before new ones are inserted, and `max_chunks` holds at least one
/// full view, so evictions only ever hit chunks outside the current view.
/// Queued loads are dropped as soon as their chunk leaves the view.
pub struct ChunkManager {
    config: ChunkConfig,
    layout: Arc<CityLayout>,
    noise: NoiseField,
    index: ChunkIndex,
    chunks: LruCache<ChunkCoord, ChunkState>,
    visible: Vec<VisibleChunk>,
    load_queue: VecDeque<ChunkCoord>,
    unload_queue: VecDeque<UnloadRequest>,
    /// Releases left over from replaced snapshots, drained first.
    retired: VecDeque<UnloadRequest>,
    observer: DVec3,
    tick: u64,
    stats: StreamStats,
    timer: FrameTimer,
    callback: Option<UpdateCallback>,
}

impl ChunkManager {
    pub fn new(
        layout: Arc<CityLayout>,
        noise: NoiseField,
        config: ChunkConfig,
    ) -> Result<Self, StreamError> {
        config.validate()?;
        let capacity =
            NonZeroUsize::new(config.max_chunks).ok_or(StreamError::CapacityTooSmall {
                max_chunks: config.max_chunks,
                required: config.chunks_per_view(),
            })?;
        let mut index = ChunkIndex::new(config.chunk_size);
        index.rebuild(&layout);
        Ok(Self {
            config,
            layout,
            noise,
            index,
            chunks: LruCache::new(capacity),
            visible: Vec::new(),
            load_queue: VecDeque::new(),
            unload_queue: VecDeque::new(),
            retired: VecDeque::new(),
            observer: DVec3::ZERO,
            tick: 0,
            stats: StreamStats::default(),
            timer: FrameTimer::default(),
            callback: None,
        })
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    pub fn layout(&self) -> &Arc<CityLayout> {
        &self.layout
    }

    pub fn index(&self) -> &ChunkIndex {
        &self.index
    }

    pub fn observer(&self) -> DVec3 {
        self.observer
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    pub fn frame_timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Replace the update callback. Only one is held at a time.
    pub fn on_update(&mut self, callback: impl FnMut(&WorldState) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    /// Swap in a regenerated snapshot. Every cached chunk is dropped; chunks
    /// the presentation layer still holds are queued for unload.
    pub fn reset(&mut self, layout: Arc<CityLayout>, noise: NoiseField) {
        let held: Vec<UnloadRequest> = self
            .chunks
            .iter()
            .filter(|(_, s)| matches!(s.phase, ChunkPhase::Loaded | ChunkPhase::Loading))
            .map(|(coord, s)| UnloadRequest {
                coord: *coord,
                mesh: s.mesh,
            })
            .collect();
        debug!(released = held.len(), seed = layout.seed(), "chunk manager reset");

        // Old-snapshot geometry is kept apart so new chunks never take it back.
        self.retired.extend(self.unload_queue.drain(..));
        self.retired.extend(held);
        self.chunks.clear();
        self.load_queue.clear();
        self.visible.clear();
        self.layout = layout;
        self.noise = noise;
        self.index.rebuild(&self.layout);
    }

    /// Recompute visibility, LOD and queues for a new observer position and
    /// notify the callback.
    pub fn update_position(&mut self, x: f64, y: f64, z: f64) -> WorldState {
        let _span = info_span!("chunk_update").entered();
        let frame_start = Instant::now();

        self.tick += 1;
        self.observer = DVec3::new(x, y, z);
        let observer = DVec2::new(x, z);
        let size = self.config.chunk_size;
        let half = self.layout.world_size() * 0.5;
        let center = ChunkCoord::from_world(x, z, size);
        let rings = self.config.rings();

        let mut in_view = Vec::new();
        let mut out_of_bounds = 0;
        for dz in -rings..=rings {
            for dx in -rings..=rings {
                let Some(coord) = center.checked_offset(dx, dz) else {
                    continue;
                };
                let chunk_center = coord.center(size);
                let distance = chunk_center.distance(observer);
                if distance > self.config.view_distance {
                    continue;
                }
                if chunk_center.x.abs() > half || chunk_center.y.abs() > half {
                    out_of_bounds += 1;
                    continue;
                }
                in_view.push((coord, chunk_center, distance));
            }
        }

        // Touch every cached chunk in view before inserting new ones, so the
        // LRU tail only holds chunks outside the view.
        for (coord, _, _) in &in_view {
            self.chunks.promote(coord);
        }

        let mut visible = Vec::with_capacity(in_view.len());
        let mut visible_set = HashSet::with_capacity(in_view.len());
        let mut created = 0;
        let mut queued_for_load = 0;
        for (coord, chunk_center, distance) in in_view {
            if !self.chunks.contains(&coord) {
                let district = self.layout.district_at(chunk_center.x, chunk_center.y);
                let state = self.revive(ChunkState::new(coord, district));
                if let Some((evicted, state)) = self.chunks.push(coord, state) {
                    self.evict(evicted, state);
                }
                created += 1;
            }
            let Some(state) = self.chunks.get_mut(&coord) else {
                continue;
            };

            state.visible = true;
            state.last_access = self.tick;
            state.distance = distance;
            state.lod = Lod::for_distance(distance, &self.config);
            state.priority = if distance <= self.config.priority_distance {
                1000.0 - distance
            } else {
                500.0 - distance
            };
            match state.phase {
                ChunkPhase::Unloaded => {
                    state.phase = ChunkPhase::QueuedLoad;
                    self.load_queue.push_back(coord);
                    queued_for_load += 1;
                }
                ChunkPhase::QueuedUnload => {
                    state.phase = ChunkPhase::Loaded;
                    self.unload_queue.retain(|r| r.coord != coord);
                }
                _ => {}
            }

            visible.push(VisibleChunk {
                coord,
                distance,
                lod: state.lod,
                priority: state.priority,
                loaded: state.is_loaded(),
            });
            visible_set.insert(coord);
        }

        let mut queued_for_unload = 0;
        for (coord, state) in self.chunks.iter_mut() {
            if visible_set.contains(coord) {
                continue;
            }
            state.visible = false;
            state.distance = coord.center(size).distance(observer);
            match state.phase {
                // Out of view means out of the load queue.
                ChunkPhase::QueuedLoad => state.phase = ChunkPhase::Unloaded,
                ChunkPhase::Loading | ChunkPhase::Loaded
                    if state.distance > self.config.unload_distance =>
                {
                    state.phase = ChunkPhase::QueuedUnload;
                    self.unload_queue.push_back(UnloadRequest {
                        coord: *coord,
                        mesh: state.mesh,
                    });
                    queued_for_unload += 1;
                }
                _ => {}
            }
        }
        self.load_queue.retain(|c| visible_set.contains(c));

        let chunks = &self.chunks;
        let priority = |c: &ChunkCoord| chunks.peek(c).map_or(f64::NEG_INFINITY, |s| s.priority);
        self.load_queue
            .make_contiguous()
            .sort_by(|a, b| priority(b).total_cmp(&priority(a)).then_with(|| a.cmp(b)));
        visible.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.coord.cmp(&b.coord))
        });

        let radius = 2.0 * size;
        let state = WorldState {
            tick: self.tick,
            observer: self.observer,
            observer_chunk: center,
            district: self.layout.district_at(x, z),
            visible: visible.clone(),
            loaded_count: self.chunks.iter().filter(|(_, s)| s.is_loaded()).count(),
            load_queue_len: self.load_queue.len(),
            unload_queue_len: self.retired.len() + self.unload_queue.len(),
            nearby_plots: self.nearby_plots(center, observer, radius),
            nearby_roads: self.nearby_roads(center, observer, radius),
        };
        self.visible = visible;

        let elapsed = frame_start.elapsed();
        self.timer.record(elapsed);
        self.stats = StreamStats {
            updates: self.tick,
            visible_chunks: self.visible.len(),
            chunks_created: created,
            queued_for_load,
            queued_for_unload,
            out_of_bounds,
            cached_chunks: self.chunks.len(),
            evictions: self.stats.evictions,
            update_time: elapsed,
        };

        trace!(
            tick = self.tick,
            visible = self.stats.visible_chunks,
            created,
            queued_for_load,
            queued_for_unload,
            out_of_bounds,
            "chunk update complete"
        );

        if let Some(callback) = self.callback.as_mut() {
            callback(&state);
        }
        state
    }

    /// Plots whose centre lies within `radius` of `observer`, in id order.
    fn nearby_plots(&self, center: ChunkCoord, observer: DVec2, radius: f64) -> Vec<PlotId> {
        let reach = (radius / self.config.chunk_size).ceil() as i32;
        self.index
            .plots_in_radius(center, reach)
            .into_iter()
            .filter(|id| {
                self.layout
                    .plot(*id)
                    .is_some_and(|p| p.center.distance(observer) <= radius)
            })
            .collect()
    }

    /// Roads within `radius` of `observer`, in id order.
    fn nearby_roads(&self, center: ChunkCoord, observer: DVec2, radius: f64) -> Vec<RoadId> {
        let reach = (radius / self.config.chunk_size).ceil() as i32;
        self.index
            .roads_in_radius(center, reach)
            .into_iter()
            .filter(|id| {
                self.layout
                    .road(*id)
                    .is_some_and(|r| r.distance_to(observer) <= radius)
            })
            .collect()
    }

    /// A chunk re-entering the cache while its old geometry still waits for
    /// release takes that geometry back instead of loading again.
    fn revive(&mut self, mut state: ChunkState) -> ChunkState {
        let coord = state.coord;
        if let Some(i) = self.unload_queue.iter().position(|r| r.coord == coord) {
            if let Some(request) = self.unload_queue.remove(i) {
                state.phase = ChunkPhase::Loaded;
                state.mesh = request.mesh;
            }
        }
        state
    }

    fn evict(&mut self, coord: ChunkCoord, state: ChunkState) {
        self.stats.evictions += 1;
        self.load_queue.retain(|c| *c != coord);
        self.unload_queue.retain(|r| r.coord != coord);
        if state.is_loaded() || state.phase == ChunkPhase::Loading {
            self.unload_queue.push_back(UnloadRequest {
                coord,
                mesh: state.mesh,
            });
        }
        debug!(%coord, phase = ?state.phase, "chunk evicted");
    }

    /// Highest priority chunk waiting for geometry. The chunk moves to
    /// `Loading` until [`ChunkManager::mark_loaded`] confirms it.
    pub fn pop_load(&mut self) -> Option<ChunkCoord> {
        while let Some(coord) = self.load_queue.pop_front() {
            if let Some(state) = self.chunks.peek_mut(&coord) {
                if state.phase == ChunkPhase::QueuedLoad {
                    state.phase = ChunkPhase::Loading;
                    return Some(coord);
                }
            }
        }
        None
    }

    /// Oldest pending release.
    pub fn pop_unload(&mut self) -> Option<UnloadRequest> {
        if let Some(request) = self.retired.pop_front() {
            return Some(request);
        }
        let request = self.unload_queue.pop_front()?;
        if let Some(state) = self.chunks.peek_mut(&request.coord) {
            if state.phase == ChunkPhase::QueuedUnload {
                state.phase = ChunkPhase::Unloaded;
                state.mesh = None;
            }
        }
        Some(request)
    }

    /// Record that geometry for `coord` exists. Returns false when the chunk
    /// is no longer cached.
    pub fn mark_loaded(&mut self, coord: ChunkCoord, mesh: Option<MeshTicket>) -> bool {
        let Some(state) = self.chunks.peek_mut(&coord) else {
            return false;
        };
        if state.phase == ChunkPhase::QueuedLoad {
            self.load_queue.retain(|c| *c != coord);
        }
        if matches!(
            state.phase,
            ChunkPhase::QueuedLoad | ChunkPhase::Loading | ChunkPhase::Unloaded
        ) {
            state.phase = ChunkPhase::Loaded;
        }
        state.mesh = mesh;
        true
    }

    /// Roads and intersections of one chunk, clipped to its bounds.
    pub fn mesh_job(&self, coord: ChunkCoord) -> MeshJob {
        MeshJob {
            roads: self
                .index
                .roads_in(coord)
                .iter()
                .filter_map(|id| self.layout.road(*id).cloned())
                .collect(),
            intersections: self
                .index
                .intersections_in(coord)
                .iter()
                .filter_map(|id| self.layout.intersections().get(id.0 as usize).cloned())
                .collect(),
            clip: Some(coord.bounds(self.config.chunk_size)),
        }
    }

    /// Pull up to `budget` chunks off the load queue, submit their meshes and
    /// mark them loaded with the returned tickets.
    pub fn process_load_queue(
        &mut self,
        budget: usize,
        queue: &mut dyn MeshQueue,
    ) -> Vec<(ChunkCoord, MeshTicket)> {
        let mut submitted = Vec::new();
        while submitted.len() < budget {
            let Some(coord) = self.pop_load() else {
                break;
            };
            let ticket = queue.submit(self.mesh_job(coord));
            self.mark_loaded(coord, Some(ticket));
            debug!(%coord, ticket = ticket.0, "chunk submitted for meshing");
            submitted.push((coord, ticket));
        }
        submitted
    }

    pub fn chunk_state(&self, coord: ChunkCoord) -> Option<&ChunkState> {
        self.chunks.peek(&coord)
    }

    /// Visible chunks from the last update, nearest first.
    pub fn visible_chunks(&self) -> &[VisibleChunk] {
        &self.visible
    }

    pub fn load_queue(&self) -> impl Iterator<Item = &ChunkCoord> + '_ {
        self.load_queue.iter()
    }

    pub fn unload_queue(&self) -> impl Iterator<Item = &UnloadRequest> + '_ {
        self.retired.iter().chain(self.unload_queue.iter())
    }

    pub fn cached_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn plots_in_chunk(&self, coord: ChunkCoord) -> Vec<&Plot> {
        self.index
            .plots_in(coord)
            .iter()
            .filter_map(|id| self.layout.plot(*id))
            .collect()
    }

    pub fn roads_in_chunk(&self, coord: ChunkCoord) -> Vec<&RoadSegment> {
        self.index
            .roads_in(coord)
            .iter()
            .filter_map(|id| self.layout.road(*id))
            .collect()
    }

    /// District of a chunk's centre; cached chunks answer from their state.
    pub fn district_of_chunk(&self, coord: ChunkCoord) -> DistrictType {
        match self.chunks.peek(&coord) {
            Some(state) => state.district,
            None => {
                let c = coord.center(self.config.chunk_size);
                self.layout.district_at(c.x, c.y)
            }
        }
    }

    pub fn terrain_height_at(&self, x: f64, z: f64) -> f64 {
        self.noise.terrain_height(x, z)
    }
}
