/// Graphics device module - the trait every backend implements and its descriptors

pub mod graphics_device;
pub mod draw_buffer;
pub mod shader;

pub use graphics_device::*;
pub use draw_buffer::*;
pub use shader::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
