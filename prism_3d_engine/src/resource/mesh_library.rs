//! Mesh and shader registries.
//!
//! The libraries own uploaded resources; everything else refers to them by
//! `MeshKey` (stale keys simply resolve to nothing) or by shader name.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use crate::error::Result;
use crate::graphics_device::{GraphicsDevice, ShaderDesc, ShaderHandle};
use super::gpu_mesh::GpuMesh;
use super::mesh::Mesh;

new_key_type! {
    /// Stable key for a mesh owned by [`MeshLibrary`]
    pub struct MeshKey;
}

// ============================================================================
// MESH LIBRARY
// ============================================================================

#[derive(Default)]
pub struct MeshLibrary {
    meshes: SlotMap<MeshKey, GpuMesh>,
    names: FxHashMap<String, MeshKey>,
}

impl MeshLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload `mesh` and register it under its name
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if the name is already taken, or any device upload error.
    pub fn load(&mut self, mesh: &Mesh, device: &mut dyn GraphicsDevice) -> Result<MeshKey> {
        self.check_free(mesh.name())?;
        let gpu = GpuMesh::upload(mesh, device)?;
        self.insert(gpu)
    }

    /// Register an already uploaded mesh
    pub fn insert(&mut self, mesh: GpuMesh) -> Result<MeshKey> {
        self.check_free(mesh.name())?;
        let name = mesh.name().to_string();
        let key = self.meshes.insert(mesh);
        self.names.insert(name, key);
        Ok(key)
    }

    fn check_free(&self, name: &str) -> Result<()> {
        if self.names.contains_key(name) {
            crate::engine_bail!("prism3d::MeshLibrary", InvalidResource,
                "Mesh '{}' already exists", name);
        }
        Ok(())
    }

    pub fn get(&self, key: MeshKey) -> Option<&GpuMesh> {
        self.meshes.get(key)
    }

    pub fn key_of(&self, name: &str) -> Option<MeshKey> {
        self.names.get(name).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&GpuMesh> {
        self.key_of(name).and_then(|key| self.meshes.get(key))
    }

    /// Unregister a mesh and destroy its draw buffers. Returns false for unknown keys.
    pub fn remove(&mut self, key: MeshKey, device: &mut dyn GraphicsDevice) -> bool {
        let Some(mut mesh) = self.meshes.remove(key) else {
            return false;
        };
        self.names.remove(mesh.name());
        mesh.release(device);
        true
    }

    /// Destroy every mesh
    pub fn clear(&mut self, device: &mut dyn GraphicsDevice) {
        for (_, mut mesh) in self.meshes.drain() {
            mesh.release(device);
        }
        self.names.clear();
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

// ============================================================================
// SHADER LIBRARY
// ============================================================================

#[derive(Default)]
pub struct ShaderLibrary {
    shaders: FxHashMap<String, ShaderHandle>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shader on the device and register it under `desc.name`
    pub fn load(&mut self, desc: &ShaderDesc, device: &mut dyn GraphicsDevice) -> Result<ShaderHandle> {
        if self.shaders.contains_key(&desc.name) {
            crate::engine_bail!("prism3d::ShaderLibrary", InvalidResource,
                "Shader '{}' already exists", desc.name);
        }
        let handle = device.create_shader(desc)?;
        self.shaders.insert(desc.name.clone(), handle);
        crate::engine_debug!("prism3d::ShaderLibrary", "Loaded shader '{}'", desc.name);
        Ok(handle)
    }

    pub fn get(&self, name: &str) -> Option<ShaderHandle> {
        self.shaders.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }
}

#[cfg(test)]
#[path = "mesh_library_tests.rs"]
mod tests;
