use std::sync::Arc;

use cityforge_common::{DistrictType, WorldSeed};
use cityforge_district::ZoneConfig;
use cityforge_layout::{CityLayout, LayoutGenerator};
use cityforge_mesh::{BatchedMeshQueue, InlineMeshQueue, MeshConfig, MeshError};
use cityforge_noise::NoiseField;
use tracing::info;

use crate::config::{ConfigError, WorldConfig};
use crate::manager::ChunkManager;
use crate::state::WorldState;

/// One procedural city: noise, generator, current snapshot and the chunk
/// manager streaming it around an observer.
pub struct CityWorld {
    config: WorldConfig,
    noise: NoiseField,
    generator: LayoutGenerator,
    layout: Arc<CityLayout>,
    manager: ChunkManager,
}

impl CityWorld {
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let noise = NoiseField::new(config.seed);
        let generator = LayoutGenerator::new(config.layout.clone())?;
        let layout = Arc::new(generator.generate_with_noise(&noise));
        let manager = ChunkManager::new(layout.clone(), noise.clone(), config.chunks.clone())?;
        info!(
            seed = config.seed,
            world_size = config.layout.world_size,
            plots = layout.plots().len(),
            "city world ready"
        );
        Ok(Self {
            config,
            noise,
            generator,
            layout,
            manager,
        })
    }

    /// Regenerate the city for another seed. Loaded chunks are queued for
    /// unload on the manager; the update callback is kept.
    pub fn reseed(&mut self, seed: WorldSeed) {
        self.config.seed = seed;
        self.noise.set_seed(seed);
        self.layout = Arc::new(self.generator.generate_with_noise(&self.noise));
        self.manager.reset(self.layout.clone(), self.noise.clone());
        info!(seed, plots = self.layout.plots().len(), "city world reseeded");
    }

    pub fn update_position(&mut self, x: f64, y: f64, z: f64) -> WorldState {
        self.manager.update_position(x, y, z)
    }

    pub fn on_update(&mut self, callback: impl FnMut(&WorldState) + 'static) {
        self.manager.on_update(callback);
    }

    pub fn seed(&self) -> WorldSeed {
        self.config.seed
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn layout(&self) -> &Arc<CityLayout> {
        &self.layout
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn generator(&self) -> &LayoutGenerator {
        &self.generator
    }

    pub fn manager(&self) -> &ChunkManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut ChunkManager {
        &mut self.manager
    }

    pub fn mesh_config(&self) -> &MeshConfig {
        &self.config.mesh
    }

    pub fn district_at(&self, x: f64, z: f64) -> DistrictType {
        self.layout.district_at(x, z)
    }

    /// Zone of the district under `(x, z)`, picked by the district noise.
    pub fn zone_at(&self, x: f64, z: f64) -> Option<&ZoneConfig> {
        self.generator
            .zoning()
            .profile(self.district_at(x, z))?
            .zone_for(self.noise.district_noise(x, z))
    }

    pub fn terrain_height_at(&self, x: f64, z: f64) -> f64 {
        self.noise.terrain_height(x, z)
    }

    /// Queue that meshes on submit, draping roads over this world's terrain.
    pub fn inline_mesh_queue(&self) -> Result<InlineMeshQueue<NoiseField>, MeshError> {
        InlineMeshQueue::new(self.noise.clone(), self.config.mesh.clone())
    }

    /// Queue that meshes on `flush` across `threads` workers (0 = rayon default).
    pub fn batched_mesh_queue(
        &self,
        threads: usize,
    ) -> Result<BatchedMeshQueue<NoiseField>, MeshError> {
        if threads == 0 {
            BatchedMeshQueue::new(self.noise.clone(), self.config.mesh.clone())
        } else {
            BatchedMeshQueue::with_threads(self.noise.clone(), self.config.mesh.clone(), threads)
        }
    }
}
