use bytemuck::{Pod, Zeroable};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Interleaved vertex layout handed to a GPU host.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct RoadVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl RoadVertex {
    /// Raw bytes of a vertex slice, ready for upload.
    pub fn slice_as_bytes(vertices: &[RoadVertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

/// Ownerless triangle list: parallel attribute arrays plus `u32` indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub(crate) fn push_vertex(&mut self, position: DVec3, normal: DVec3, uv: [f64; 2]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.as_vec3().to_array());
        self.normals.push(normal.as_vec3().to_array());
        self.uvs.push([uv[0] as f32, uv[1] as f32]);
        index
    }

    /// Two triangles over a quad given as the near pair `(a0, b0)` and the
    /// far pair `(a1, b1)`, with `b` further along the side axis than `a`.
    pub(crate) fn push_quad(&mut self, a0: u32, b0: u32, a1: u32, b1: u32) {
        self.indices.extend_from_slice(&[a0, b0, a1, b0, b1, a1]);
    }

    /// Append `other`, shifting its indices past this buffer's vertices.
    pub fn append(&mut self, other: &MeshBuffers) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    pub fn interleaved(&self) -> Vec<RoadVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((position, normal), uv)| RoadVertex {
                position: *position,
                normal: *normal,
                uv: *uv,
            })
            .collect()
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// The three buffers produced for one road or a merged batch of roads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadMeshSet {
    pub surface: MeshBuffers,
    pub sidewalks: MeshBuffers,
    pub markings: MeshBuffers,
}

impl RoadMeshSet {
    pub fn vertex_count(&self) -> usize {
        self.surface.vertex_count() + self.sidewalks.vertex_count() + self.markings.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.surface.triangle_count()
            + self.sidewalks.triangle_count()
            + self.markings.triangle_count()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    pub fn append(&mut self, other: &RoadMeshSet) {
        self.surface.append(&other.surface);
        self.sidewalks.append(&other.sidewalks);
        self.markings.append(&other.markings);
    }
}
