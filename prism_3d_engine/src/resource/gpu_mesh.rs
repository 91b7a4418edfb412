//! Device-side mesh: one draw buffer per primitive kind.

use crate::error::Result;
use crate::graphics_device::{DrawBufferDesc, DrawHandle, GraphicsDevice, PrimitiveKind};
use super::mesh::Mesh;

/// A device draw buffer and the number of primitives it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawBuffer {
    pub handle: DrawHandle,
    /// Points, edges or faces (not indices)
    pub count: u32,
}

/// Uploaded mesh as seen by the render system
#[derive(Debug, Clone, PartialEq)]
pub struct GpuMesh {
    name: String,
    points: Option<DrawBuffer>,
    edges: Option<DrawBuffer>,
    faces: Option<DrawBuffer>,
    has_normals: bool,
}

impl GpuMesh {
    /// Assemble from buffers created elsewhere (custom backends, tests)
    pub fn from_parts(
        name: impl Into<String>,
        points: Option<DrawBuffer>,
        edges: Option<DrawBuffer>,
        faces: Option<DrawBuffer>,
        has_normals: bool,
    ) -> Self {
        Self {
            name: name.into(),
            points,
            edges,
            faces,
            has_normals,
        }
    }

    /// Upload every non-empty index list of `mesh`.
    ///
    /// A mesh with normals only uploads its faces. On failure, buffers created
    /// so far are destroyed before the error is returned.
    pub fn upload(mesh: &Mesh, device: &mut dyn GraphicsDevice) -> Result<Self> {
        let mut gpu = Self::from_parts(mesh.name(), None, None, None, mesh.has_normals());

        if let Err(err) = gpu.upload_buffers(mesh, device) {
            gpu.release(device);
            return Err(err);
        }

        crate::engine_debug!("prism3d::GpuMesh",
            "Uploaded '{}': {} points, {} edges, {} faces, normals={}",
            gpu.name, gpu.point_count(), gpu.edge_count(), gpu.face_count(), gpu.has_normals);
        Ok(gpu)
    }

    fn upload_buffers(&mut self, mesh: &Mesh, device: &mut dyn GraphicsDevice) -> Result<()> {
        if !mesh.has_normals() {
            if mesh.point_count() > 0 {
                self.points = Some(create_buffer(mesh, device, "points", PrimitiveKind::Points, mesh.points())?);
            }
            if mesh.edge_count() > 0 {
                let indices: Vec<u32> = mesh.edges().iter().flatten().copied().collect();
                self.edges = Some(create_buffer(mesh, device, "edges", PrimitiveKind::Lines, &indices)?);
            }
        }
        if mesh.face_count() > 0 {
            let indices: Vec<u32> = mesh.faces().iter().flatten().copied().collect();
            self.faces = Some(create_buffer(mesh, device, "faces", PrimitiveKind::Triangles, &indices)?);
        }
        Ok(())
    }

    /// Destroy every draw buffer of this mesh
    pub fn release(&mut self, device: &mut dyn GraphicsDevice) {
        for buffer in [self.points.take(), self.edges.take(), self.faces.take()].into_iter().flatten() {
            device.destroy_draw_buffer(buffer.handle);
        }
    }

    /// Buffer drawn for a primitive kind
    pub fn buffer(&self, kind: PrimitiveKind) -> Option<DrawBuffer> {
        match kind {
            PrimitiveKind::Points => self.points,
            PrimitiveKind::Lines => self.edges,
            PrimitiveKind::Triangles => self.faces,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_normals(&self) -> bool {
        self.has_normals
    }

    pub fn point_count(&self) -> u32 {
        self.points.map_or(0, |b| b.count)
    }

    pub fn edge_count(&self) -> u32 {
        self.edges.map_or(0, |b| b.count)
    }

    pub fn face_count(&self) -> u32 {
        self.faces.map_or(0, |b| b.count)
    }
}

fn create_buffer(
    mesh: &Mesh,
    device: &mut dyn GraphicsDevice,
    suffix: &str,
    kind: PrimitiveKind,
    indices: &[u32],
) -> Result<DrawBuffer> {
    let desc = DrawBufferDesc::new(
        format!("{}.{}", mesh.name(), suffix),
        kind,
        mesh.positions(),
        mesh.colors(),
        mesh.normals(),
        indices,
    );
    let count = desc.element_count();
    Ok(DrawBuffer { handle: device.create_draw_buffer(&desc)?, count })
}
