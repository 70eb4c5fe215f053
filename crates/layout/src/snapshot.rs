use cityforge_common::{
    BlockId, DistrictType, IntersectionNode, PlotId, Rect, RoadKind, RoadSegment, WorldSeed,
};
use cityforge_district::{classify, DistrictBoundary};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::blocks::CityBlock;
use crate::config::LayoutConfig;
use crate::diagnostics::Diagnostics;
use crate::landmarks::PlacedLandmark;
use crate::plots::{Plot, PlotRefs};

/// Immutable result of one generation pass.
///
/// Consumers hold it behind an `Arc` and never mutate it; reseeding replaces
/// the whole snapshot. Plots live in a flat arena indexed by [`PlotId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityLayout {
    pub(crate) seed: WorldSeed,
    pub(crate) config: LayoutConfig,
    pub(crate) districts: Vec<DistrictBoundary>,
    pub(crate) roads: Vec<RoadSegment>,
    pub(crate) intersections: Vec<IntersectionNode>,
    pub(crate) blocks: Vec<CityBlock>,
    pub(crate) plots: Vec<Plot>,
    pub(crate) landmarks: Vec<PlacedLandmark>,
    pub(crate) diagnostics: Diagnostics,
}

/// Per-district totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictStats {
    pub blocks: usize,
    pub plots: usize,
    pub buildable_plots: usize,
}

impl CityLayout {
    pub fn seed(&self) -> WorldSeed {
        self.seed
    }

    pub fn world_size(&self) -> f64 {
        self.config.world_size
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// World square as a rectangle centred on the origin.
    pub fn world_bounds(&self) -> Rect {
        Rect::from_center(DVec2::ZERO, self.config.world_size, self.config.world_size)
    }

    pub fn districts(&self) -> &[DistrictBoundary] {
        &self.districts
    }

    pub fn roads(&self) -> &[RoadSegment] {
        &self.roads
    }

    pub fn intersections(&self) -> &[IntersectionNode] {
        &self.intersections
    }

    pub fn blocks(&self) -> &[CityBlock] {
        &self.blocks
    }

    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    pub fn landmarks(&self) -> &[PlacedLandmark] {
        &self.landmarks
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn road(&self, id: cityforge_common::RoadId) -> Option<&RoadSegment> {
        self.roads.get(id.0 as usize)
    }

    pub fn block(&self, id: BlockId) -> Option<&CityBlock> {
        self.blocks.get(id.0 as usize)
    }

    pub fn plot(&self, id: PlotId) -> Option<&Plot> {
        self.plots.get(id.0 as usize)
    }

    /// District at a ground position, using the snapshot's boundaries.
    pub fn district_at(&self, x: f64, z: f64) -> DistrictType {
        classify(x, z, &self.districts)
    }

    /// First block whose bounds contain the point.
    pub fn block_at(&self, x: f64, z: f64) -> Option<&CityBlock> {
        let p = DVec2::new(x, z);
        self.blocks.iter().find(|b| b.bounds.contains(p))
    }

    pub fn plots_in_block(&self, id: BlockId) -> impl Iterator<Item = &Plot> + '_ {
        self.block(id)
            .into_iter()
            .flat_map(|b| b.plots.iter())
            .filter_map(|pid| self.plot(*pid))
    }

    /// Plots whose centre lies inside `rect`.
    pub fn plots_in_rect(&self, rect: &Rect) -> Vec<&Plot> {
        self.plots.iter().filter(|p| rect.contains(p.center)).collect()
    }

    /// Plots whose centre lies within `radius` of `center`.
    pub fn plots_within(&self, center: DVec2, radius: f64) -> Vec<&Plot> {
        self.plots
            .iter()
            .filter(|p| p.center.distance(center) <= radius)
            .collect()
    }

    /// Roads whose paved area overlaps `rect`.
    pub fn roads_in_rect(&self, rect: &Rect) -> Vec<&RoadSegment> {
        self.roads
            .iter()
            .filter(|r| r.bounds().intersects(rect))
            .collect()
    }

    /// Roads whose centre line passes within `radius` of `center`.
    pub fn roads_within(&self, center: DVec2, radius: f64) -> Vec<&RoadSegment> {
        self.roads
            .iter()
            .filter(|r| r.distance_to(center) <= radius)
            .collect()
    }

    pub fn intersections_in_rect(&self, rect: &Rect) -> Vec<&IntersectionNode> {
        self.intersections
            .iter()
            .filter(|n| rect.contains(n.position))
            .collect()
    }

    pub fn landmark_plots(&self) -> impl Iterator<Item = &Plot> + '_ {
        self.plots.iter().filter(|p| p.landmark)
    }

    pub fn buildable_plots(&self) -> impl Iterator<Item = &Plot> + '_ {
        self.plots.iter().filter(|p| p.is_buildable())
    }

    pub fn road_count(&self, kind: RoadKind) -> usize {
        self.roads.iter().filter(|r| r.kind == kind).count()
    }

    /// Block and plot totals per district, in district order.
    pub fn district_stats(&self) -> BTreeMap<DistrictType, DistrictStats> {
        let mut stats: BTreeMap<DistrictType, DistrictStats> = BTreeMap::new();
        for block in &self.blocks {
            stats.entry(block.district).or_default().blocks += 1;
        }
        for plot in &self.plots {
            let entry = stats.entry(plot.district).or_default();
            entry.plots += 1;
            if plot.is_buildable() {
                entry.buildable_plots += 1;
            }
        }
        stats
    }

    /// A copy of this snapshot with new opaque references on one plot.
    /// Returns `None` when the plot does not exist.
    pub fn assign_plot_refs(&self, id: PlotId, refs: PlotRefs) -> Option<CityLayout> {
        let mut next = self.clone();
        next.plots.get_mut(id.0 as usize)?.apply_refs(refs);
        Some(next)
    }

    /// Deterministic FNV-1a hash over the snapshot's geometry and flags.
    /// Floats are hashed by bit pattern, so any drift shows up.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_f64 = |h: &mut u64, v: f64| mix(h, &v.to_bits().to_le_bytes());
        let mix_str = |h: &mut u64, s: &Option<String>| match s {
            Some(s) => {
                mix(h, &[1]);
                mix(h, s.as_bytes());
            }
            None => mix(h, &[0]),
        };

        mix(&mut h, &self.seed.to_le_bytes());
        mix_f64(&mut h, self.config.world_size);
        for road in &self.roads {
            mix(&mut h, &road.id.0.to_le_bytes());
            mix(&mut h, road.kind.name().as_bytes());
            mix_f64(&mut h, road.start.x);
            mix_f64(&mut h, road.start.y);
            mix_f64(&mut h, road.end.x);
            mix_f64(&mut h, road.end.y);
            mix_f64(&mut h, road.width);
        }
        for node in &self.intersections {
            mix_f64(&mut h, node.position.x);
            mix_f64(&mut h, node.position.y);
            for road in &node.roads {
                mix(&mut h, &road.0.to_le_bytes());
            }
        }
        for block in &self.blocks {
            mix(&mut h, block.district.name().as_bytes());
            mix_f64(&mut h, block.bounds.min.x);
            mix_f64(&mut h, block.bounds.min.y);
            mix_f64(&mut h, block.bounds.max.x);
            mix_f64(&mut h, block.bounds.max.y);
            mix(&mut h, &(block.plots.len() as u64).to_le_bytes());
        }
        for plot in &self.plots {
            mix(&mut h, &plot.block.0.to_le_bytes());
            mix_f64(&mut h, plot.center.x);
            mix_f64(&mut h, plot.center.y);
            mix_f64(&mut h, plot.width);
            mix_f64(&mut h, plot.depth);
            mix_f64(&mut h, plot.rotation);
            mix(&mut h, &[plot.is_buildable() as u8, plot.landmark as u8]);
            mix_str(&mut h, &plot.owner);
            mix_str(&mut h, &plot.token);
            mix_str(&mut h, &plot.building);
        }
        for landmark in &self.landmarks {
            mix(&mut h, landmark.definition.name.as_bytes());
            mix(&mut h, &landmark.block.0.to_le_bytes());
        }
        h
    }
}
