//! Point lights for the lit shader.
//!
//! `LightingSystem` keeps up to [`MAX_LIGHTS`] point lights plus an ambient
//! term. It plugs into the render system as a [`LightingStage`]: when the
//! lit shader is the active one, the light uniforms and the default material
//! are uploaded once at the start of every flush.

use glam::{Vec3, Vec4};
use crate::error::Result;
use crate::graphics_device::{GraphicsDevice, PrimitiveKind, ShaderHandle, Uniform, UniformValue};
use crate::math;
use crate::render::{LightingStage, Material, RenderSystem};
use crate::resource::{MeshKey, MeshLibrary};

/// Upper bound on simultaneous lights (size of the shader's light arrays)
pub const MAX_LIGHTS: usize = 10;

/// Scale of the cube drawn at each light position
const MARKER_SCALE: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// World position (w = 1)
    pub position: Vec4,
    pub color: Vec3,
}

pub struct LightingSystem {
    lights: Vec<Light>,
    ambient: Vec3,
    lit_shader: Option<ShaderHandle>,
    material_defaults: Material,
    marker_mesh: Option<MeshKey>,
}

impl LightingSystem {
    pub fn new() -> Self {
        Self {
            lights: Vec::with_capacity(MAX_LIGHTS),
            ambient: Vec3::splat(0.25),
            lit_shader: None,
            material_defaults: Material::default(),
            marker_mesh: None,
        }
    }

    /// Add a point light
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` when [`MAX_LIGHTS`] lights already exist.
    pub fn add_light(&mut self, position: Vec4, color: Vec3) -> Result<()> {
        if self.lights.len() >= MAX_LIGHTS {
            crate::engine_bail!("prism3d::LightingSystem", InvalidArgument,
                "Cannot add light: limit of {} reached", MAX_LIGHTS);
        }
        self.lights.push(Light { position, color });
        crate::engine_debug!("prism3d::LightingSystem",
            "Light {} added at ({}, {}, {})", self.lights.len() - 1, position.x, position.y, position.z);
        Ok(())
    }

    pub fn clear_lights(&mut self) {
        self.lights.clear();
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn ambient(&self) -> Vec3 {
        self.ambient
    }

    pub fn set_ambient(&mut self, ambient: Vec3) {
        self.ambient = ambient;
    }

    /// Shader that receives the light uniforms (`None` disables lighting)
    pub fn set_lit_shader(&mut self, shader: Option<ShaderHandle>) {
        self.lit_shader = shader;
    }

    pub fn lit_shader(&self) -> Option<ShaderHandle> {
        self.lit_shader
    }

    pub fn set_material_defaults(&mut self, material: Material) {
        self.material_defaults = material;
    }

    /// Mesh drawn at each light by `queue_markers` (`None` hides markers)
    pub fn set_marker_mesh(&mut self, mesh: Option<MeshKey>) {
        self.marker_mesh = mesh;
    }

    pub fn marker_mesh(&self) -> Option<MeshKey> {
        self.marker_mesh
    }

    /// Queue a small cube at every light, tinted with the light's color.
    /// Does nothing without a marker mesh or when the key no longer resolves.
    pub fn queue_markers(&self, render: &mut RenderSystem, meshes: &MeshLibrary) -> Result<()> {
        let Some(mesh) = self.marker_mesh.and_then(|key| meshes.get(key)) else {
            return Ok(());
        };
        for light in &self.lights {
            let model = math::translate(light.position) * math::scale_uniform(MARKER_SCALE);
            render.render(mesh, PrimitiveKind::Triangles, model, Some(Material::tinted(light.color)))?;
        }
        Ok(())
    }
}

impl Default for LightingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl LightingStage for LightingSystem {
    fn is_active_for(&self, shader: ShaderHandle) -> bool {
        self.lit_shader == Some(shader)
    }

    fn upload(&self, device: &mut dyn GraphicsDevice, eye: Vec4) -> Result<()> {
        let positions: Vec<Vec4> = self.lights.iter().map(|l| l.position).collect();
        let colors: Vec<Vec3> = self.lights.iter().map(|l| l.color).collect();

        device.set_uniform(Uniform::EyePosition, &UniformValue::Vec4(eye))?;
        device.set_uniform(Uniform::AmbientColor, &UniformValue::Vec3(self.ambient))?;
        device.set_uniform(Uniform::LightCount, &UniformValue::Int(self.lights.len() as i32))?;
        device.set_uniform(Uniform::LightPositions, &UniformValue::Vec4Array(positions))?;
        device.set_uniform(Uniform::LightColors, &UniformValue::Vec3Array(colors))
    }

    fn material_defaults(&self) -> Material {
        self.material_defaults
    }
}

#[cfg(test)]
#[path = "lighting_tests.rs"]
mod tests;
