use cityforge_common::WorldSeed;
use cityforge_district::{DistrictMap, ZoningTable};
use cityforge_noise::NoiseField;
use tracing::{info, info_span};

use crate::blocks::build_blocks;
use crate::config::{LayoutConfig, LayoutError};
use crate::diagnostics::Diagnostics;
use crate::landmarks::{place_landmarks, LandmarkCatalog};
use crate::plots::build_plots;
use crate::roads::{build_alleys, build_roads, find_intersections, grid_cells};
use crate::snapshot::CityLayout;

/// Runs the generation stages in order and packages the result.
///
/// District polygons, zoning and the landmark catalog are injected values;
/// the generator holds no global state and can be reused across seeds.
#[derive(Debug, Clone)]
pub struct LayoutGenerator {
    config: LayoutConfig,
    districts: DistrictMap,
    zoning: ZoningTable,
    landmarks: LandmarkCatalog,
}

impl LayoutGenerator {
    /// Generator with the standard district map, zoning and landmarks.
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutError> {
        Self::with_catalogs(
            config,
            DistrictMap::standard(),
            ZoningTable::standard(),
            LandmarkCatalog::standard(),
        )
    }

    pub fn with_catalogs(
        config: LayoutConfig,
        districts: DistrictMap,
        zoning: ZoningTable,
        landmarks: LandmarkCatalog,
    ) -> Result<Self, LayoutError> {
        config.validate()?;
        Ok(Self {
            config,
            districts,
            zoning,
            landmarks,
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn districts(&self) -> &DistrictMap {
        &self.districts
    }

    pub fn zoning(&self) -> &ZoningTable {
        &self.zoning
    }

    pub fn landmarks(&self) -> &LandmarkCatalog {
        &self.landmarks
    }

    pub fn generate(&self, seed: WorldSeed) -> CityLayout {
        self.generate_with_noise(&NoiseField::new(seed))
    }

    /// Generate against an existing noise field; the snapshot takes the
    /// field's seed.
    pub fn generate_with_noise(&self, noise: &NoiseField) -> CityLayout {
        let seed = noise.seed();
        let _span = info_span!("generate_layout", seed).entered();
        let config = &self.config;
        let mut diagnostics = Diagnostics::default();

        let districts = self.districts.boundaries(config.world_size);

        let network = build_roads(config, noise);
        diagnostics.skipped_streets = network.skipped_streets;
        let mut intersections = find_intersections(&network.roads);

        let xs = network.axis_coordinates(false);
        let zs = network.axis_coordinates(true);
        let cells = grid_cells(&xs, &zs);

        let mut roads = network.roads;
        let (alleys, alley_nodes) = build_alleys(
            config,
            &cells,
            &districts,
            roads.len() as u32,
            intersections.len() as u32,
        );
        roads.extend(alleys);
        intersections.extend(alley_nodes);

        let mut blocks = build_blocks(config, &cells, &districts, &mut diagnostics);
        let mut plots = build_plots(config, &mut blocks, &self.zoning, noise);
        let landmarks = place_landmarks(
            &self.landmarks,
            config.world_size,
            &mut blocks,
            &mut plots,
            &mut diagnostics,
        );

        info!(
            roads = roads.len(),
            intersections = intersections.len(),
            blocks = blocks.len(),
            plots = plots.len(),
            landmarks = landmarks.len(),
            %diagnostics,
            "layout generated"
        );

        CityLayout {
            seed,
            config: config.clone(),
            districts,
            roads,
            intersections,
            blocks,
            plots,
            landmarks,
            diagnostics,
        }
    }
}
