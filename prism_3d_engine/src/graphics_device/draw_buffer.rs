/// Draw buffer descriptor

use glam::{Vec3, Vec4};
use super::graphics_device::PrimitiveKind;

/// Descriptor for creating a draw buffer (vertex attributes + index list)
///
/// Attribute data is tightly packed little-endian f32, indices are u32.
#[derive(Debug, Clone)]
pub struct DrawBufferDesc {
    /// Debug name
    pub name: String,
    /// Primitive the indices describe
    pub kind: PrimitiveKind,
    /// Positions, 4 floats per vertex
    pub positions: Vec<u8>,
    /// Colors, 3 floats per vertex
    pub colors: Vec<u8>,
    /// Normals, 4 floats per vertex (vectors, w = 0)
    pub normals: Option<Vec<u8>>,
    /// Index list
    pub indices: Vec<u8>,
    /// Number of vertices described by the attribute arrays
    pub vertex_count: u32,
    /// Number of u32 indices
    pub index_count: u32,
}

impl DrawBufferDesc {
    /// Pack typed attribute and index slices into a descriptor
    pub fn new(
        name: impl Into<String>,
        kind: PrimitiveKind,
        positions: &[Vec4],
        colors: &[Vec3],
        normals: Option<&[Vec4]>,
        indices: &[u32],
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            positions: bytemuck::cast_slice(positions).to_vec(),
            colors: bytemuck::cast_slice(colors).to_vec(),
            normals: normals.map(|n| bytemuck::cast_slice(n).to_vec()),
            indices: bytemuck::cast_slice(indices).to_vec(),
            vertex_count: positions.len() as u32,
            index_count: indices.len() as u32,
        }
    }

    /// Number of primitives (index_count / indices per element)
    pub fn element_count(&self) -> u32 {
        self.index_count / self.kind.indices_per_element()
    }
}
