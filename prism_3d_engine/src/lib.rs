/*!
# Prism 3D Engine

A small real-time 3D rendering engine built around a free-look perspective
camera and a deferred render queue.

Draws are queued during the frame and flushed once per frame against the
active camera. The GPU is reached only through the `GraphicsDevice` trait, so
backends (OpenGL, software, recording devices for tests) plug in from outside
the crate.

## Architecture

- **Camera**: eye + orthonormal basis, lazily cached camera-to-world, view and
  perspective matrices with per-matrix dirty flags
- **CameraSystem**: owns cameras, exposes the active one through `CameraProvider`
- **RenderSystem**: normal and debug FIFO queues, flushed with one camera binding
- **GraphicsDevice**: backend trait (draw buffers, shaders, uniforms, clears, draws)
- **MeshLibrary / ShaderLibrary**: uploaded resources addressed by key or name
- **ObjectManager / LightingSystem**: scene objects and point lights
- **Engine**: owned context that runs the frame
*/

// Internal modules
mod error;
mod engine;
mod lighting;
mod utils;
pub mod log;
pub mod math;
pub mod camera;
pub mod graphics_device;
pub mod input;
pub mod render;
pub mod resource;
pub mod scene;

// Main prism3d namespace module
pub mod prism3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine context
    pub use crate::engine::{Engine, EngineConfig, CUBE_MESH, FLAT_CUBE_MESH, AXES_MESH};

    // Graphics device trait
    pub use crate::graphics_device::GraphicsDevice;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger, LogCrateLogger,
            set_logger, reset_logger,
        };
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Render sub-module with queueing types and the device API
    pub mod render {
        pub use crate::render::*;
        pub use crate::graphics_device::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
        pub use crate::lighting::{Light, LightingSystem, MAX_LIGHTS};
    }

    pub use crate::input::InputState;
    pub use crate::math;
}

// Re-export math library at crate root
pub use glam;
