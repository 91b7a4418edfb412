/// GraphicsDevice trait - the only boundary between the engine and a graphics API.
///
/// The engine never talks to OpenGL/Vulkan directly: draw buffers, shaders,
/// uniforms, clears and draws all go through this trait. Implementations own
/// the API objects and hand out opaque handles.

use bitflags::bitflags;
use glam::Vec3;
use slotmap::new_key_type;
use crate::error::Result;
use super::draw_buffer::DrawBufferDesc;
use super::shader::{ShaderDesc, Uniform, UniformValue};

new_key_type! {
    /// Device-side vertex array + index buffer pair
    pub struct DrawHandle;
    /// Device-side linked shader program
    pub struct ShaderHandle;
}

/// Primitive assembled from the index buffer of a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Points,
    Lines,
    Triangles,
}

impl PrimitiveKind {
    /// Indices consumed per element (1 per point, 2 per edge, 3 per face)
    pub fn indices_per_element(self) -> u32 {
        match self {
            PrimitiveKind::Points => 1,
            PrimitiveKind::Lines => 2,
            PrimitiveKind::Triangles => 3,
        }
    }
}

bitflags! {
    /// Framebuffer attachments to clear
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u8 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
    }
}

/// Graphics API abstraction used by the render system and resource libraries
pub trait GraphicsDevice: Send {
    /// Upload vertex/index data and return a handle usable by `draw_elements`
    fn create_draw_buffer(&mut self, desc: &DrawBufferDesc) -> Result<DrawHandle>;

    /// Release a draw buffer. Unknown handles are ignored.
    fn destroy_draw_buffer(&mut self, handle: DrawHandle);

    /// Compile and link a shader program
    fn create_shader(&mut self, desc: &ShaderDesc) -> Result<ShaderHandle>;

    /// Make a shader program current for subsequent uniforms and draws
    fn bind_shader(&mut self, shader: ShaderHandle) -> Result<()>;

    /// Upload a uniform to the bound shader
    fn set_uniform(&mut self, uniform: Uniform, value: &UniformValue) -> Result<()>;

    /// Color used by `clear(ClearFlags::COLOR)`
    fn set_clear_color(&mut self, color: Vec3);

    fn clear(&mut self, flags: ClearFlags) -> Result<()>;

    /// Indexed draw of `index_count` indices from `buffer`
    fn draw_elements(&mut self, buffer: DrawHandle, kind: PrimitiveKind, index_count: u32) -> Result<()>;
}
