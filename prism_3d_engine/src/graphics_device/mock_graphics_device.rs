/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Records every call as a short command string so tests can assert on the
/// exact order of binds, uniforms, clears and draws.

use glam::Vec3;
use slotmap::SlotMap;
use crate::error::Result;
use super::{
    GraphicsDevice, DrawHandle, ShaderHandle, DrawBufferDesc, ShaderDesc,
    Uniform, UniformValue, ClearFlags, PrimitiveKind,
};

pub struct MockGraphicsDevice {
    /// Recorded commands, e.g. "set_uniform objToWorld" or "draw_elements Lines 24"
    pub commands: Vec<String>,
    /// Uploaded uniforms in call order
    pub uniforms: Vec<(Uniform, UniformValue)>,
    /// Live draw buffers
    pub draw_buffers: SlotMap<DrawHandle, DrawBufferDesc>,
    /// Created shaders
    pub shaders: SlotMap<ShaderHandle, ShaderDesc>,
    pub clear_color: Vec3,
    /// Make the next `draw_elements` calls fail
    pub fail_draws: bool,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            uniforms: Vec::new(),
            draw_buffers: SlotMap::with_key(),
            shaders: SlotMap::with_key(),
            clear_color: Vec3::ZERO,
            fail_draws: false,
        }
    }

    /// Commands starting with `prefix`
    pub fn commands_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.commands.iter().filter(|c| c.starts_with(prefix)).cloned().collect()
    }

    /// Last uploaded value of `uniform`
    pub fn last_uniform(&self, uniform: Uniform) -> Option<&UniformValue> {
        self.uniforms.iter().rev().find(|(u, _)| *u == uniform).map(|(_, v)| v)
    }

    pub fn reset_records(&mut self) {
        self.commands.clear();
        self.uniforms.clear();
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_draw_buffer(&mut self, desc: &DrawBufferDesc) -> Result<DrawHandle> {
        if desc.index_count == 0 {
            crate::engine_bail!("prism3d::MockGraphicsDevice", InvalidResource,
                "Draw buffer '{}' has no indices", desc.name);
        }
        self.commands.push(format!("create_draw_buffer {}", desc.name));
        Ok(self.draw_buffers.insert(desc.clone()))
    }

    fn destroy_draw_buffer(&mut self, handle: DrawHandle) {
        if let Some(desc) = self.draw_buffers.remove(handle) {
            self.commands.push(format!("destroy_draw_buffer {}", desc.name));
        }
    }

    fn create_shader(&mut self, desc: &ShaderDesc) -> Result<ShaderHandle> {
        self.commands.push(format!("create_shader {}", desc.name));
        Ok(self.shaders.insert(desc.clone()))
    }

    fn bind_shader(&mut self, shader: ShaderHandle) -> Result<()> {
        let Some(desc) = self.shaders.get(shader) else {
            crate::engine_bail!("prism3d::MockGraphicsDevice", InvalidResource, "Unknown shader {:?}", shader);
        };
        self.commands.push(format!("bind_shader {}", desc.name));
        Ok(())
    }

    fn set_uniform(&mut self, uniform: Uniform, value: &UniformValue) -> Result<()> {
        self.commands.push(format!("set_uniform {}", uniform.name()));
        self.uniforms.push((uniform, value.clone()));
        Ok(())
    }

    fn set_clear_color(&mut self, color: Vec3) {
        self.clear_color = color;
    }

    fn clear(&mut self, flags: ClearFlags) -> Result<()> {
        let mut targets = Vec::new();
        if flags.contains(ClearFlags::COLOR) {
            targets.push("color");
        }
        if flags.contains(ClearFlags::DEPTH) {
            targets.push("depth");
        }
        self.commands.push(format!("clear {}", targets.join("+")));
        Ok(())
    }

    fn draw_elements(&mut self, buffer: DrawHandle, kind: PrimitiveKind, index_count: u32) -> Result<()> {
        if self.fail_draws {
            crate::engine_bail!("prism3d::MockGraphicsDevice", BackendError, "draw failed");
        }
        let name = self.draw_buffers.get(buffer).map(|d| d.name.as_str()).unwrap_or("?");
        self.commands.push(format!("draw_elements {} {:?} {}", name, kind, index_count));
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
