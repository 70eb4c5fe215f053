use cityforge_common::{IntersectionNode, RoadSegment};
use glam::DVec3;

use crate::buffers::MeshBuffers;
use crate::config::MeshConfig;
use crate::heights::HeightSampler;

/// Flat square patch over an intersection, sized to the widest connected
/// road plus that road's sidewalk on both sides. Empty when nothing connects.
pub fn build_intersection_patch<'a, H, I>(
    node: &IntersectionNode,
    connected: I,
    heights: &H,
    config: &MeshConfig,
) -> MeshBuffers
where
    H: HeightSampler + ?Sized,
    I: IntoIterator<Item = &'a RoadSegment>,
{
    let mut buffers = MeshBuffers::new();
    let Some(widest) = connected
        .into_iter()
        .max_by(|a, b| a.width.total_cmp(&b.width))
    else {
        return buffers;
    };

    let half = (widest.width + 2.0 * config.sidewalk_width(widest.kind)) * 0.5;
    let p = node.position;
    let y = heights.height_at(p.x, p.y) + config.surface_offset;
    let corner = |dx: f64, dz: f64| DVec3::new(p.x + dx, y, p.y + dz);

    let a0 = buffers.push_vertex(corner(-half, -half), DVec3::Y, [0.0, 0.0]);
    let b0 = buffers.push_vertex(corner(-half, half), DVec3::Y, [1.0, 0.0]);
    let a1 = buffers.push_vertex(corner(half, -half), DVec3::Y, [0.0, 1.0]);
    let b1 = buffers.push_vertex(corner(half, half), DVec3::Y, [1.0, 1.0]);
    buffers.push_quad(a0, b0, a1, b1);
    buffers
}
