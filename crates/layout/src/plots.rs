use cityforge_common::{BlockId, DistrictType, PlotId, Rect};
use cityforge_district::ZoningTable;
use cityforge_noise::NoiseField;
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::blocks::CityBlock;
use crate::config::LayoutConfig;
use crate::landmarks::LandmarkDefinition;

/// Smallest ownable unit of land.
///
/// The buildable flag is private: it is decided once at generation time and
/// can only be revoked afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub id: PlotId,
    pub block: BlockId,
    pub district: DistrictType,
    pub center: DVec2,
    pub width: f64,
    pub depth: f64,
    /// Yaw in radians around the vertical axis.
    pub rotation: f64,
    buildable: bool,
    /// True for the footprint record a landmark inserts into its block.
    pub landmark: bool,
    pub owner: Option<String>,
    pub token: Option<String>,
    pub building: Option<String>,
}

impl Plot {
    pub(crate) fn new(
        id: PlotId,
        block: &CityBlock,
        cell: PlotCell,
        buildable: bool,
    ) -> Self {
        Self {
            id,
            block: block.id,
            district: block.district,
            center: cell.center,
            width: cell.width,
            depth: cell.depth,
            rotation: 0.0,
            buildable,
            landmark: false,
            owner: None,
            token: None,
            building: None,
        }
    }

    /// The oversized record a landmark inserts into the block it claims.
    /// Never buildable; the building slot carries the landmark name.
    pub(crate) fn landmark_footprint(
        id: PlotId,
        block: &CityBlock,
        center: DVec2,
        definition: &LandmarkDefinition,
    ) -> Self {
        let (width, depth) = definition.footprint;
        Self {
            id,
            block: block.id,
            district: block.district,
            center,
            width,
            depth,
            rotation: 0.0,
            buildable: false,
            landmark: true,
            owner: None,
            token: None,
            building: Some(definition.name.clone()),
        }
    }

    pub fn is_buildable(&self) -> bool {
        self.buildable
    }

    /// Permanently mark the plot as not buildable.
    pub fn revoke_buildable(&mut self) {
        self.buildable = false;
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.center, self.width, self.depth)
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_building(mut self, building: impl Into<String>) -> Self {
        self.building = Some(building.into());
        self
    }

    pub(crate) fn apply_refs(&mut self, refs: PlotRefs) {
        self.owner = refs.owner;
        self.token = refs.token;
        self.building = refs.building;
    }
}

/// Opaque references a host attaches to a plot. Stored and forwarded, never
/// interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotRefs {
    pub owner: Option<String>,
    pub token: Option<String>,
    pub building: Option<String>,
}

/// One cell of a block's plot grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotCell {
    pub center: DVec2,
    /// Footprint after the margin is taken off.
    pub width: f64,
    pub depth: f64,
    /// Pitch of the grid; `columns * pitch.x` equals the block width.
    pub pitch: DVec2,
}

/// Tile `bounds` with a grid of plots close to `plot_width` x `plot_depth`.
///
/// At least one plot fits per axis. The pitch is stretched so the grid covers
/// the block with no remainder, and each plot gives up `margin` of its pitch.
pub fn plot_grid(bounds: &Rect, plot_width: f64, plot_depth: f64, margin: f64) -> Vec<PlotCell> {
    let columns = ((bounds.width() / plot_width).floor() as usize).max(1);
    let rows = ((bounds.depth() / plot_depth).floor() as usize).max(1);
    let pitch = DVec2::new(
        bounds.width() / columns as f64,
        bounds.depth() / rows as f64,
    );
    let width = (pitch.x - margin).max(0.0);
    let depth = (pitch.y - margin).max(0.0);

    let mut cells = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for column in 0..columns {
            let center = DVec2::new(
                bounds.min.x + (column as f64 + 0.5) * pitch.x,
                bounds.min.y + (row as f64 + 0.5) * pitch.y,
            );
            cells.push(PlotCell {
                center,
                width,
                depth,
                pitch,
            });
        }
    }
    cells
}

/// Stage 4: subdivide every block using its district's target footprint.
pub(crate) fn build_plots(
    config: &LayoutConfig,
    blocks: &mut [CityBlock],
    zoning: &ZoningTable,
    noise: &NoiseField,
) -> Vec<Plot> {
    let mut plots = Vec::new();
    for block in blocks.iter_mut() {
        let (target_width, target_depth) = zoning.target_plot(block.district);
        for cell in plot_grid(&block.bounds, target_width, target_depth, config.plot_margin) {
            let id = PlotId(plots.len() as u32);
            let buildable =
                noise.building_noise(cell.center.x, cell.center.y) > config.buildable_threshold;
            plots.push(Plot::new(id, block, cell, buildable));
            block.plots.push(id);
        }
    }
    plots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(bounds: Rect) -> CityBlock {
        CityBlock {
            id: BlockId(3),
            district: DistrictType::Downtown,
            bounds,
            plots: Vec::new(),
            landmark: None,
        }
    }

    #[test]
    fn downtown_block_splits_into_eight_plots() {
        let bounds = Rect::new(DVec2::new(0.0, 0.0), DVec2::new(200.0, 100.0));
        let cells = plot_grid(&bounds, 50.0, 50.0, 1.0);
        assert_eq!(cells.len(), 8);

        let pitch = cells[0].pitch;
        assert_eq!(pitch, DVec2::new(50.0, 50.0));
        assert_eq!(pitch.x * 4.0, bounds.width());
        assert_eq!(pitch.y * 2.0, bounds.depth());
        for cell in &cells {
            assert_eq!(cell.width, 49.0);
            assert_eq!(cell.depth, 49.0);
            assert!(bounds.contains(cell.center));
        }
    }

    #[test]
    fn grid_stretches_to_cover_remainder() {
        let bounds = Rect::new(DVec2::ZERO, DVec2::new(130.0, 70.0));
        let cells = plot_grid(&bounds, 30.0, 30.0, 1.0);
        // 4 x 2 cells, each stretched to 32.5 x 35.
        assert_eq!(cells.len(), 8);
        assert_eq!(cells[0].pitch, DVec2::new(32.5, 35.0));
        let last = cells.last().unwrap();
        assert_eq!(last.center.x + last.pitch.x * 0.5, 130.0);
        assert_eq!(last.center.y + last.pitch.y * 0.5, 70.0);
    }

    #[test]
    fn small_block_still_gets_one_plot() {
        let bounds = Rect::new(DVec2::ZERO, DVec2::new(22.0, 25.0));
        let cells = plot_grid(&bounds, 60.0, 50.0, 1.0);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].center, DVec2::new(11.0, 12.5));
        assert_eq!(cells[0].width, 21.0);
    }

    #[test]
    fn plots_inherit_block_identity() {
        let config = LayoutConfig::default();
        let noise = NoiseField::new(42);
        let zoning = ZoningTable::standard();
        let mut blocks = vec![block(Rect::new(DVec2::ZERO, DVec2::new(90.0, 60.0)))];
        let plots = build_plots(&config, &mut blocks, &zoning, &noise);

        assert_eq!(plots.len(), blocks[0].plots.len());
        for plot in &plots {
            assert_eq!(plot.block, BlockId(3));
            assert_eq!(plot.district, DistrictType::Downtown);
            assert!(plot.owner.is_none() && plot.token.is_none() && plot.building.is_none());
        }
    }

    #[test]
    fn revoked_plot_stays_unbuildable() {
        let b = block(Rect::new(DVec2::ZERO, DVec2::splat(50.0)));
        let cell = plot_grid(&b.bounds, 50.0, 50.0, 1.0)[0];
        let mut plot = Plot::new(PlotId(0), &b, cell, true);
        assert!(plot.is_buildable());
        plot.revoke_buildable();
        assert!(!plot.is_buildable());
        plot.apply_refs(PlotRefs {
            owner: Some("0xabc".into()),
            ..PlotRefs::default()
        });
        assert!(!plot.is_buildable());
        assert_eq!(plot.owner.as_deref(), Some("0xabc"));
    }

    #[test]
    fn reference_builders_fill_slots() {
        let b = block(Rect::new(DVec2::ZERO, DVec2::splat(50.0)));
        let cell = plot_grid(&b.bounds, 50.0, 50.0, 1.0)[0];
        let plot = Plot::new(PlotId(0), &b, cell, true)
            .with_owner("alice")
            .with_token("token-7")
            .with_building("bakery");
        assert_eq!(plot.owner.as_deref(), Some("alice"));
        assert_eq!(plot.token.as_deref(), Some("token-7"));
        assert_eq!(plot.building.as_deref(), Some("bakery"));
    }
}
