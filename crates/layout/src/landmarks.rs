use cityforge_common::{BlockId, DistrictType, PlotId};
use cityforge_district::VenueKind;
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::blocks::CityBlock;
use crate::diagnostics::Diagnostics;
use crate::plots::Plot;

/// Hand-authored landmark. `anchor` is normalized to `[-0.5, 0.5]` and
/// scaled by the world size at placement time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkDefinition {
    pub name: String,
    pub district: DistrictType,
    pub anchor: DVec2,
    /// Footprint (width, depth) in world units.
    pub footprint: (f64, f64),
    pub height: f64,
    pub venue: VenueKind,
}

impl LandmarkDefinition {
    pub fn position(&self, world_size: f64) -> DVec2 {
        self.anchor * world_size
    }
}

/// A landmark that claimed a block during generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedLandmark {
    pub definition: LandmarkDefinition,
    pub position: DVec2,
    pub block: BlockId,
    /// The footprint plot inserted for the landmark.
    pub plot: PlotId,
}

/// Ordered landmark list. Earlier entries are placed first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkCatalog {
    landmarks: Vec<LandmarkDefinition>,
}

impl LandmarkCatalog {
    pub fn new(landmarks: Vec<LandmarkDefinition>) -> Self {
        Self { landmarks }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// One signature landmark per named district. Anchors sit mid-cell on the
    /// default 100-unit grid of a 2000-unit world, clear of road jitter.
    pub fn standard() -> Self {
        let landmark = |name: &str, district, anchor: (f64, f64), footprint, height, venue| {
            LandmarkDefinition {
                name: name.to_string(),
                district,
                anchor: DVec2::new(anchor.0, anchor.1),
                footprint,
                height,
                venue,
            }
        };
        Self::new(vec![
            landmark(
                "Meridian Tower",
                DistrictType::Downtown,
                (0.025, 0.025),
                (60.0, 60.0),
                320.0,
                VenueKind::Tower,
            ),
            landmark(
                "Exchange Hall",
                DistrictType::FinancialDistrict,
                (0.275, -0.275),
                (70.0, 50.0),
                140.0,
                VenueKind::Office,
            ),
            landmark(
                "Foundry Museum",
                DistrictType::ArtsDistrict,
                (-0.275, -0.275),
                (50.0, 50.0),
                35.0,
                VenueKind::Museum,
            ),
            landmark(
                "Neon Arena",
                DistrictType::Entertainment,
                (0.275, 0.275),
                (90.0, 90.0),
                45.0,
                VenueKind::Arena,
            ),
            landmark(
                "Greenway Commons",
                DistrictType::Residential,
                (-0.275, 0.275),
                (80.0, 60.0),
                8.0,
                VenueKind::Park,
            ),
            landmark(
                "Old Mill Works",
                DistrictType::Industrial,
                (0.425, -0.225),
                (70.0, 70.0),
                30.0,
                VenueKind::Factory,
            ),
            landmark(
                "Harbor Pavilion",
                DistrictType::Waterfront,
                (-0.425, 0.025),
                (60.0, 40.0),
                20.0,
                VenueKind::Marina,
            ),
        ])
    }

    pub fn landmarks(&self) -> &[LandmarkDefinition] {
        &self.landmarks
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

impl Default for LandmarkCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Stage 5: each landmark claims the first block containing its position,
/// revokes buildability on every plot there and adds its own footprint plot.
pub(crate) fn place_landmarks(
    catalog: &LandmarkCatalog,
    world_size: f64,
    blocks: &mut [CityBlock],
    plots: &mut Vec<Plot>,
    diagnostics: &mut Diagnostics,
) -> Vec<PlacedLandmark> {
    let mut placed = Vec::new();

    for definition in catalog.landmarks() {
        let position = definition.position(world_size);
        let Some(block) = blocks.iter_mut().find(|b| b.bounds.contains(position)) else {
            tracing::debug!(name = %definition.name, ?position, "landmark matched no block");
            diagnostics.unmatched_landmarks.push(definition.name.clone());
            continue;
        };

        if block.district != definition.district {
            tracing::debug!(
                name = %definition.name,
                expected = %definition.district,
                actual = %block.district,
                "landmark placed outside its catalog district"
            );
        }

        for id in &block.plots {
            plots[id.0 as usize].revoke_buildable();
        }

        let id = PlotId(plots.len() as u32);
        let footprint = Plot::landmark_footprint(id, block, position, definition);
        plots.push(footprint);
        block.plots.push(id);
        block.landmark.get_or_insert_with(|| definition.name.clone());

        placed.push(PlacedLandmark {
            definition: definition.clone(),
            position,
            block: block.id,
            plot: id,
        });
    }
    placed
}
