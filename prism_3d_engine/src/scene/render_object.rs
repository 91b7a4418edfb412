/// Render object - a mesh placed in the world with its own material.
///
/// The model matrix is `T * R * S` (scale first, then rotation about an
/// arbitrary axis, then translation) and is rebuilt lazily after a transform
/// setter has run.

use std::cell::Cell;
use glam::{Mat4, Vec3, Vec4};
use crate::error::Result;
use crate::graphics_device::PrimitiveKind;
use crate::math;
use crate::render::{Material, RenderSystem};
use crate::resource::{MeshKey, MeshLibrary};

#[derive(Debug, Clone)]
pub struct RenderObject {
    name: String,
    mesh: Option<MeshKey>,
    kind: PrimitiveKind,
    position: Vec4,
    scale: Vec3,
    rotation_axis: Vec4,
    rotation_degrees: f32,
    material: Material,
    model: Cell<Mat4>,
    model_dirty: Cell<bool>,
    destroyed: bool,
}

impl RenderObject {
    /// Object at the origin, unit scale, no rotation, drawn as triangles
    pub fn new(name: impl Into<String>, mesh: Option<MeshKey>) -> Self {
        Self {
            name: name.into(),
            mesh,
            kind: PrimitiveKind::Triangles,
            position: math::point(0.0, 0.0, 0.0),
            scale: Vec3::ONE,
            rotation_axis: math::vector(0.0, 1.0, 0.0),
            rotation_degrees: 0.0,
            material: Material::default(),
            model: Cell::new(Mat4::IDENTITY),
            model_dirty: Cell::new(false),
            destroyed: false,
        }
    }

    // ===== TRANSFORM =====

    pub fn set_position(&mut self, position: Vec4) {
        self.position = position;
        self.model_dirty.set(true);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.model_dirty.set(true);
    }

    /// Rotation of `degrees` about `axis` (xyz part, need not be normalized)
    pub fn set_rotation(&mut self, axis: Vec4, degrees: f32) {
        self.rotation_axis = axis;
        self.rotation_degrees = degrees;
        self.model_dirty.set(true);
    }

    /// Spin further about the current rotation axis
    pub fn rotate(&mut self, degrees: f32) {
        self.rotation_degrees = (self.rotation_degrees + degrees) % 360.0;
        self.model_dirty.set(true);
    }

    pub fn position(&self) -> Vec4 {
        self.position
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn rotation(&self) -> (Vec4, f32) {
        (self.rotation_axis, self.rotation_degrees)
    }

    /// Object-to-world matrix, rebuilt only after a transform change
    pub fn model_matrix(&self) -> Mat4 {
        if self.model_dirty.get() {
            let model = math::translate(self.position)
                * math::rotate_3d(self.rotation_axis, self.rotation_degrees)
                * math::scale(self.scale.x, self.scale.y, self.scale.z);
            self.model.set(model);
            self.model_dirty.set(false);
        }
        self.model.get()
    }

    // ===== APPEARANCE =====

    pub fn set_mesh(&mut self, mesh: Option<MeshKey>) {
        self.mesh = mesh;
    }

    pub fn mesh(&self) -> Option<MeshKey> {
        self.mesh
    }

    pub fn set_render_kind(&mut self, kind: PrimitiveKind) {
        self.kind = kind;
    }

    pub fn render_kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn set_tint(&mut self, tint: Vec3) {
        self.material.tint = tint;
    }

    pub fn set_diffuse(&mut self, diffuse: Vec3) {
        self.material.diffuse = diffuse;
    }

    pub fn set_specular(&mut self, specular: Vec3, exponent: f32) {
        self.material.specular = specular;
        self.material.specular_exponent = exponent;
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub(crate) fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }

    // ===== DRAW =====

    /// Queue this object on `render`.
    ///
    /// Objects without a mesh, or whose mesh has been unloaded, are skipped.
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` if the mesh has no buffer for the object's render kind.
    pub fn draw(&self, render: &mut RenderSystem, meshes: &MeshLibrary) -> Result<()> {
        let Some(key) = self.mesh else {
            return Ok(());
        };
        let Some(mesh) = meshes.get(key) else {
            crate::engine_warn!("prism3d::RenderObject", "Object '{}' refers to an unloaded mesh", self.name);
            return Ok(());
        };
        render.render(mesh, self.kind, self.model_matrix(), Some(self.material))
    }
}

#[cfg(test)]
#[path = "render_object_tests.rs"]
mod tests;
