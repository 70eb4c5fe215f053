use cityforge_common::{
    DistrictType, IntersectionId, IntersectionNode, Rect, RoadId, RoadKind, RoadSegment,
};
use cityforge_district::{classify, DistrictBoundary};
use cityforge_noise::NoiseField;
use glam::DVec2;

use crate::config::LayoutConfig;

const COORD_EPSILON: f64 = 1e-6;

/// Districts dense enough to get service alleys.
const ALLEY_DISTRICTS: [DistrictType; 2] = [DistrictType::Downtown, DistrictType::ArtsDistrict];

/// Which axis a grid line runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    /// Runs along X at a fixed Z.
    Horizontal,
    /// Runs along Z at a fixed X.
    Vertical,
}

/// Roads produced by the first stage, before alleys.
#[derive(Debug, Default)]
pub(crate) struct RoadNetwork {
    pub roads: Vec<RoadSegment>,
    /// Street lines dropped for sitting on top of a boulevard.
    pub skipped_streets: usize,
}

impl RoadNetwork {
    fn push(&mut self, kind: RoadKind, start: DVec2, end: DVec2, width: f64) -> RoadId {
        let id = RoadId(self.roads.len() as u32);
        self.roads.push(RoadSegment {
            id,
            kind,
            start,
            end,
            width,
        });
        id
    }

    fn push_line(&mut self, axis: Axis, kind: RoadKind, offset: f64, half: f64, width: f64) {
        let (start, end) = match axis {
            Axis::Horizontal => (DVec2::new(-half, offset), DVec2::new(half, offset)),
            Axis::Vertical => (DVec2::new(offset, -half), DVec2::new(offset, half)),
        };
        self.push(kind, start, end, width);
    }

    /// Sorted, de-duplicated line offsets of every non-alley road along one
    /// axis: Z values of horizontal roads, or X values of vertical roads.
    pub fn axis_coordinates(&self, horizontal: bool) -> Vec<f64> {
        let mut coords: Vec<f64> = self
            .roads
            .iter()
            .filter(|r| r.kind != RoadKind::Alley && r.is_horizontal() == horizontal)
            .map(|r| if horizontal { r.start.y } else { r.start.x })
            .collect();
        coords.sort_by(f64::total_cmp);
        coords.dedup_by(|a, b| (*a - *b).abs() < COORD_EPSILON);
        coords
    }
}

/// Evenly spaced base offsets covering `[-half, half]`.
fn grid_offsets(half: f64, spacing: f64) -> Vec<f64> {
    let count = ((half * 2.0) / spacing + COORD_EPSILON).floor() as i64;
    (0..=count).map(|i| -half + i as f64 * spacing).collect()
}

fn jitter(noise: &NoiseField, axis: Axis, base: f64) -> f64 {
    match axis {
        Axis::Horizontal => noise.road_noise(0.0, base),
        Axis::Vertical => noise.road_noise(base, 0.0),
    }
}

/// Stage 1: boulevards every two grid cells, then streets every grid cell
/// except where they would duplicate a boulevard. Jittered lines are clamped
/// to the world edge so the outermost roads still cross every perpendicular.
pub(crate) fn build_roads(config: &LayoutConfig, noise: &NoiseField) -> RoadNetwork {
    let half = config.half_extent();
    let mut network = RoadNetwork::default();
    let mut boulevard_offsets = [Vec::new(), Vec::new()];

    for (slot, axis) in [Axis::Horizontal, Axis::Vertical].into_iter().enumerate() {
        for base in grid_offsets(half, config.boulevard_spacing()) {
            let offset =
                (base + jitter(noise, axis, base) * config.boulevard_jitter).clamp(-half, half);
            network.push_line(axis, RoadKind::Boulevard, offset, half, config.boulevard_width);
            boulevard_offsets[slot].push(offset);
        }
    }

    let skip_distance = config.street_skip_ratio * config.grid_spacing;
    for (slot, axis) in [Axis::Horizontal, Axis::Vertical].into_iter().enumerate() {
        for base in grid_offsets(half, config.grid_spacing) {
            let near_boulevard = boulevard_offsets[slot]
                .iter()
                .any(|b| (b - base).abs() < skip_distance);
            if near_boulevard {
                network.skipped_streets += 1;
                continue;
            }
            let offset =
                (base + jitter(noise, axis, base) * config.street_jitter).clamp(-half, half);
            network.push_line(axis, RoadKind::Street, offset, half, config.street_width);
        }
    }

    tracing::debug!(
        roads = network.roads.len(),
        skipped_streets = network.skipped_streets,
        "road grid laid out"
    );
    network
}

/// Stage 2a: one intersection per crossing horizontal/vertical road pair.
///
/// Quadratic in the number of lines. Fine for a one-shot generation pass;
/// not meant to run per frame.
pub(crate) fn find_intersections(roads: &[RoadSegment]) -> Vec<IntersectionNode> {
    let (horizontal, vertical): (Vec<&RoadSegment>, Vec<&RoadSegment>) =
        roads.iter().partition(|r| r.is_horizontal());

    let mut nodes = Vec::new();
    for h in &horizontal {
        let (h_min, h_max) = (h.start.x.min(h.end.x), h.start.x.max(h.end.x));
        let z = h.midpoint().y;
        for v in &vertical {
            let (v_min, v_max) = (v.start.y.min(v.end.y), v.start.y.max(v.end.y));
            let x = v.midpoint().x;
            let inside_h = x >= h_min - COORD_EPSILON && x <= h_max + COORD_EPSILON;
            let inside_v = z >= v_min - COORD_EPSILON && z <= v_max + COORD_EPSILON;
            if inside_h && inside_v {
                nodes.push(IntersectionNode {
                    id: IntersectionId(nodes.len() as u32),
                    position: DVec2::new(x, z),
                    roads: vec![h.id, v.id],
                });
            }
        }
    }
    nodes
}

/// The open rectangles between adjacent road lines, before any inset.
pub(crate) fn grid_cells(xs: &[f64], zs: &[f64]) -> Vec<Rect> {
    let mut cells = Vec::with_capacity(xs.len().saturating_sub(1) * zs.len().saturating_sub(1));
    for z in zs.windows(2) {
        for x in xs.windows(2) {
            cells.push(Rect::new(DVec2::new(x[0], z[0]), DVec2::new(x[1], z[1])));
        }
    }
    cells
}

/// Stage 2b: a cross of alleys through every large enough downtown or arts
/// district cell. Returns the alley segments and their crossing nodes.
pub(crate) fn build_alleys(
    config: &LayoutConfig,
    cells: &[Rect],
    boundaries: &[DistrictBoundary],
    first_road: u32,
    first_node: u32,
) -> (Vec<RoadSegment>, Vec<IntersectionNode>) {
    let min_edge = config.alley_min_cell_ratio * config.grid_spacing;
    let inset = config.boulevard_width * 0.5;
    let mut alleys = Vec::new();
    let mut nodes = Vec::new();

    for cell in cells {
        if cell.width() < min_edge || cell.depth() < min_edge {
            continue;
        }
        let center = cell.center();
        if !ALLEY_DISTRICTS.contains(&classify(center.x, center.y, boundaries)) {
            continue;
        }
        let interior = cell.expanded(-inset);
        let across = RoadId(first_road + alleys.len() as u32);
        alleys.push(RoadSegment {
            id: across,
            kind: RoadKind::Alley,
            start: DVec2::new(interior.min.x, center.y),
            end: DVec2::new(interior.max.x, center.y),
            width: config.alley_width,
        });
        let down = RoadId(first_road + alleys.len() as u32);
        alleys.push(RoadSegment {
            id: down,
            kind: RoadKind::Alley,
            start: DVec2::new(center.x, interior.min.y),
            end: DVec2::new(center.x, interior.max.y),
            width: config.alley_width,
        });
        nodes.push(IntersectionNode {
            id: IntersectionId(first_node + nodes.len() as u32),
            position: center,
            roads: vec![across, down],
        });
    }
    (alleys, nodes)
}
