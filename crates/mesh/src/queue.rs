use std::collections::HashMap;

use cityforge_common::{IntersectionNode, Rect, RoadSegment};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffers::RoadMeshSet;
use crate::config::{MeshConfig, MeshError};
use crate::heights::HeightSampler;
use crate::intersection::build_intersection_patch;
use crate::road::{build_road_mesh, clip_to_rect};

/// Handle returned on submit and redeemed for the finished mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshTicket(pub u64);

/// Roads and intersections to mesh together, usually one chunk's worth.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshJob {
    pub roads: Vec<RoadSegment>,
    pub intersections: Vec<IntersectionNode>,
    /// Roads are cut to this rectangle before meshing.
    pub clip: Option<Rect>,
}

impl MeshJob {
    /// Build every road and intersection patch into one merged set.
    /// Patches go into the surface buffer.
    pub fn build<H>(&self, heights: &H, config: &MeshConfig) -> RoadMeshSet
    where
        H: HeightSampler + ?Sized,
    {
        let mut set = RoadMeshSet::default();
        for road in &self.roads {
            let piece = match &self.clip {
                Some(rect) => clip_to_rect(road, rect),
                None => Some(road.clone()),
            };
            if let Some(piece) = piece {
                set.append(&build_road_mesh(&piece, heights, config));
            }
        }
        for node in &self.intersections {
            let connected = self.roads.iter().filter(|r| node.roads.contains(&r.id));
            set.surface
                .append(&build_intersection_patch(node, connected, heights, config));
        }
        set
    }
}

/// Submit/receive boundary between the chunk manager and mesh construction.
pub trait MeshQueue {
    fn submit(&mut self, job: MeshJob) -> MeshTicket;

    /// Finished mesh for `ticket`, handed out once. `None` while the job is
    /// still pending or after it was taken.
    fn take(&mut self, ticket: MeshTicket) -> Option<RoadMeshSet>;

    /// Jobs submitted but not yet built.
    fn pending(&self) -> usize;
}

/// Builds on the calling thread as soon as a job is submitted.
#[derive(Debug)]
pub struct InlineMeshQueue<H> {
    heights: H,
    config: MeshConfig,
    next: u64,
    ready: HashMap<MeshTicket, RoadMeshSet>,
}

impl<H: HeightSampler> InlineMeshQueue<H> {
    pub fn new(heights: H, config: MeshConfig) -> Result<Self, MeshError> {
        config.validate()?;
        Ok(Self {
            heights,
            config,
            next: 0,
            ready: HashMap::new(),
        })
    }

    pub fn ready(&self) -> usize {
        self.ready.len()
    }
}

impl<H: HeightSampler> MeshQueue for InlineMeshQueue<H> {
    fn submit(&mut self, job: MeshJob) -> MeshTicket {
        let ticket = MeshTicket(self.next);
        self.next += 1;
        self.ready.insert(ticket, job.build(&self.heights, &self.config));
        ticket
    }

    fn take(&mut self, ticket: MeshTicket) -> Option<RoadMeshSet> {
        self.ready.remove(&ticket)
    }

    fn pending(&self) -> usize {
        0
    }
}

/// Defers jobs until [`BatchedMeshQueue::flush`], which builds the whole
/// batch in parallel on rayon workers.
pub struct BatchedMeshQueue<H> {
    heights: H,
    config: MeshConfig,
    pool: Option<rayon::ThreadPool>,
    next: u64,
    queued: Vec<(MeshTicket, MeshJob)>,
    ready: HashMap<MeshTicket, RoadMeshSet>,
}

impl<H: HeightSampler> BatchedMeshQueue<H> {
    /// Queue that runs on rayon's global pool.
    pub fn new(heights: H, config: MeshConfig) -> Result<Self, MeshError> {
        config.validate()?;
        Ok(Self {
            heights,
            config,
            pool: None,
            next: 0,
            queued: Vec::new(),
            ready: HashMap::new(),
        })
    }

    /// Queue with its own pool of `threads` workers.
    pub fn with_threads(heights: H, config: MeshConfig, threads: usize) -> Result<Self, MeshError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("cityforge-mesh-{i}"))
            .build()
            .map_err(|e| MeshError::WorkerPool(e.to_string()))?;
        let mut queue = Self::new(heights, config)?;
        queue.pool = Some(pool);
        Ok(queue)
    }

    /// Build every queued job. Returns how many were built.
    pub fn flush(&mut self) -> usize {
        if self.queued.is_empty() {
            return 0;
        }
        let jobs = std::mem::take(&mut self.queued);
        let heights = &self.heights;
        let config = &self.config;
        let build = || -> Vec<(MeshTicket, RoadMeshSet)> {
            jobs.par_iter()
                .map(|(ticket, job)| (*ticket, job.build(heights, config)))
                .collect()
        };
        let built = match &self.pool {
            Some(pool) => pool.install(build),
            None => build(),
        };
        let count = built.len();
        debug!(count, "mesh batch built");
        self.ready.extend(built);
        count
    }

    pub fn ready(&self) -> usize {
        self.ready.len()
    }
}

impl<H: HeightSampler> MeshQueue for BatchedMeshQueue<H> {
    fn submit(&mut self, job: MeshJob) -> MeshTicket {
        let ticket = MeshTicket(self.next);
        self.next += 1;
        self.queued.push((ticket, job));
        ticket
    }

    fn take(&mut self, ticket: MeshTicket) -> Option<RoadMeshSet> {
        self.ready.remove(&ticket)
    }

    fn pending(&self) -> usize {
        self.queued.len()
    }
}
