use cityforge_common::{BlockId, DistrictType, PlotId, Rect};
use cityforge_district::{classify_detailed, DistrictBoundary};
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::diagnostics::{Diagnostics, DropReason, DroppedBlock};

/// A rectangular city block between roads. Owns its plots by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityBlock {
    pub id: BlockId,
    pub district: DistrictType,
    pub bounds: Rect,
    pub plots: Vec<PlotId>,
    /// Name of the landmark that claimed this block, if any.
    pub landmark: Option<String>,
}

impl CityBlock {
    pub fn is_landmark(&self) -> bool {
        self.landmark.is_some()
    }
}

/// Stage 3: inset every grid cell by half a boulevard width and keep the ones
/// large enough to build on.
pub(crate) fn build_blocks(
    config: &LayoutConfig,
    cells: &[Rect],
    boundaries: &[DistrictBoundary],
    diagnostics: &mut Diagnostics,
) -> Vec<CityBlock> {
    let inset = config.boulevard_width * 0.5;
    let mut blocks = Vec::with_capacity(cells.len());

    for cell in cells {
        let bounds = cell.expanded(-inset);
        let (width, depth) = (bounds.width(), bounds.depth());
        if width < config.min_block_edge || depth < config.min_block_edge {
            tracing::debug!(width, depth, min = config.min_block_edge, "dropping undersized block");
            diagnostics.dropped_blocks.push(DroppedBlock {
                bounds,
                reason: DropReason::BelowMinimumEdge {
                    width,
                    depth,
                    min_edge: config.min_block_edge,
                },
            });
            continue;
        }

        let center = bounds.center();
        let classification = classify_detailed(center.x, center.y, boundaries);
        if !classification.matched {
            diagnostics.fallback_blocks += 1;
        }
        blocks.push(CityBlock {
            id: BlockId(blocks.len() as u32),
            district: classification.district,
            bounds,
            plots: Vec::new(),
            landmark: None,
        });
    }
    blocks
}
