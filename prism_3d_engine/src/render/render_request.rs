/// Render requests and material parameters

use glam::{Mat4, Vec3};
use crate::error::Result;
use crate::graphics_device::{DrawHandle, GraphicsDevice, PrimitiveKind, Uniform, UniformValue};
use crate::math;
use crate::resource::GpuMesh;

/// Surface parameters uploaded alongside a draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Added to the vertex color (zero = untinted)
    pub tint: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub specular_exponent: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            tint: Vec3::ZERO,
            diffuse: Vec3::ONE,
            specular: Vec3::ZERO,
            specular_exponent: 1.0,
        }
    }
}

impl Material {
    /// Material that only tints
    pub fn tinted(tint: Vec3) -> Self {
        Self { tint, ..Self::default() }
    }

    /// Upload every channel to the bound shader
    pub fn upload(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.set_uniform(Uniform::Tint, &UniformValue::Vec3(self.tint))?;
        device.set_uniform(Uniform::Diffuse, &UniformValue::Vec3(self.diffuse))?;
        device.set_uniform(Uniform::Specular, &UniformValue::Vec3(self.specular))?;
        device.set_uniform(Uniform::SpecularExponent, &UniformValue::Float(self.specular_exponent))
    }
}

/// One queued draw. Transforms are captured when the request is built.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    draw_handle: DrawHandle,
    element_count: u32,
    kind: PrimitiveKind,
    no_norm: bool,
    object_to_world: Mat4,
    normal_matrix: Mat4,
    material: Option<Material>,
}

impl RenderRequest {
    /// Build a request drawing `mesh` as `kind`.
    ///
    /// Points and lines never use normals; triangles use them when the mesh has some.
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` if the mesh has no buffer for `kind`.
    pub fn new(
        mesh: &GpuMesh,
        kind: PrimitiveKind,
        object_to_world: Mat4,
        material: Option<Material>,
    ) -> Result<Self> {
        let Some(buffer) = mesh.buffer(kind) else {
            crate::engine_bail!("prism3d::RenderSystem", InvalidArgument,
                "Mesh '{}' has no {:?} buffer", mesh.name(), kind);
        };

        let no_norm = match kind {
            PrimitiveKind::Points | PrimitiveKind::Lines => true,
            PrimitiveKind::Triangles => !mesh.has_normals(),
        };

        Ok(Self {
            draw_handle: buffer.handle,
            element_count: buffer.count,
            kind,
            no_norm,
            object_to_world,
            normal_matrix: math::normal_matrix(&object_to_world),
            material,
        })
    }

    pub fn draw_handle(&self) -> DrawHandle {
        self.draw_handle
    }

    /// Points, edges or faces to draw
    pub fn element_count(&self) -> u32 {
        self.element_count
    }

    /// Indices passed to the draw call
    pub fn index_count(&self) -> u32 {
        self.element_count * self.kind.indices_per_element()
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn no_norm(&self) -> bool {
        self.no_norm
    }

    pub fn object_to_world(&self) -> &Mat4 {
        &self.object_to_world
    }

    pub fn normal_matrix(&self) -> &Mat4 {
        &self.normal_matrix
    }

    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }
}
