//! Prism3D headless demo
//!
//! Two cubes spin about the (1, 1, 1) axis on either side of the origin while
//! the orientation gizmo sits in front of the camera. The device does not
//! talk to a GPU: it logs every call, which makes the frame protocol visible.
//!
//! Run with: RUST_LOG=debug cargo run -p prism3d_demo

use std::error::Error;
use std::sync::{Arc, Mutex};
use glam::Vec3;
use log::{debug, info};
use slotmap::SlotMap;
use prism_3d_engine::prism3d::{Engine, EngineConfig, GraphicsDevice, Result, CUBE_MESH};
use prism_3d_engine::prism3d::log::{self as engine_log, LogCrateLogger};
use prism_3d_engine::prism3d::math::{point, vector};
use prism_3d_engine::prism3d::render::{
    ClearFlags, DrawBufferDesc, DrawHandle, PrimitiveKind, ShaderDesc, ShaderHandle,
    Uniform, UniformValue,
};
use prism_3d_engine::prism3d::scene::RenderObject;

const FRAMES: u32 = 5;
const DT: f32 = 1.0 / 60.0;
/// Degrees per second
const SPIN_SPEED: f32 = 45.0;

const VERTEX_SHADER: &str = r#"
#version 330 core
layout(location = 0) in vec4 position;
layout(location = 1) in vec3 color;
uniform mat4 perspMat;
uniform mat4 worldToCam;
uniform mat4 objToWorld;
uniform vec3 tint;
out vec3 vColor;
void main() {
    vColor = clamp(color + tint, 0.0, 1.0);
    gl_Position = perspMat * worldToCam * objToWorld * position;
}
"#;

const FRAGMENT_SHADER: &str = r#"
#version 330 core
in vec3 vColor;
out vec4 fragColor;
void main() {
    fragColor = vec4(vColor, 1.0);
}
"#;

// ============================================================================
// TRACE DEVICE
// ============================================================================

/// Graphics device that only logs what it is asked to do
#[derive(Default)]
struct TraceDevice {
    buffers: SlotMap<DrawHandle, String>,
    shaders: SlotMap<ShaderHandle, String>,
}

impl GraphicsDevice for TraceDevice {
    fn create_draw_buffer(&mut self, desc: &DrawBufferDesc) -> Result<DrawHandle> {
        debug!(target: "prism3d_demo::device", "create_draw_buffer {} ({} vertices, {} indices)",
            desc.name, desc.vertex_count, desc.index_count);
        Ok(self.buffers.insert(desc.name.clone()))
    }

    fn destroy_draw_buffer(&mut self, handle: DrawHandle) {
        if let Some(name) = self.buffers.remove(handle) {
            debug!(target: "prism3d_demo::device", "destroy_draw_buffer {}", name);
        }
    }

    fn create_shader(&mut self, desc: &ShaderDesc) -> Result<ShaderHandle> {
        debug!(target: "prism3d_demo::device", "create_shader {}", desc.name);
        Ok(self.shaders.insert(desc.name.clone()))
    }

    fn bind_shader(&mut self, shader: ShaderHandle) -> Result<()> {
        let name = self.shaders.get(shader).map(String::as_str).unwrap_or("?");
        debug!(target: "prism3d_demo::device", "bind_shader {}", name);
        Ok(())
    }

    fn set_uniform(&mut self, uniform: Uniform, value: &UniformValue) -> Result<()> {
        log::trace!(target: "prism3d_demo::device", "set_uniform {} = {:?}", uniform.name(), value);
        Ok(())
    }

    fn set_clear_color(&mut self, color: Vec3) {
        log::trace!(target: "prism3d_demo::device", "set_clear_color {:?}", color);
    }

    fn clear(&mut self, flags: ClearFlags) -> Result<()> {
        debug!(target: "prism3d_demo::device", "clear {:?}", flags);
        Ok(())
    }

    fn draw_elements(&mut self, buffer: DrawHandle, kind: PrimitiveKind, index_count: u32) -> Result<()> {
        let name = self.buffers.get(buffer).map(String::as_str).unwrap_or("?");
        debug!(target: "prism3d_demo::device", "draw_elements {} {:?} {}", name, kind, index_count);
        Ok(())
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() -> std::result::Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    engine_log::set_logger(LogCrateLogger);

    let device = Arc::new(Mutex::new(TraceDevice::default()));
    let mut engine = Engine::new(EngineConfig::default(), Some(device));
    engine.initialize()?;

    engine.load_shader(&ShaderDesc {
        name: "Vertex Color".to_string(),
        vertex_source: VERTEX_SHADER.to_string(),
        fragment_source: FRAGMENT_SHADER.to_string(),
    })?;
    engine.set_active_shader("Vertex Color")?;

    let cube = engine.meshes().key_of(CUBE_MESH);
    for (name, x) in [("left cube", -3.0), ("right cube", 3.0)] {
        let mut object = RenderObject::new(name, cube);
        object.set_position(point(x, 0.0, 0.0));
        object.set_rotation(vector(1.0, 1.0, 1.0), 0.0);
        engine.objects_mut().add(object);
    }
    let keys: Vec<_> = engine.objects().keys().collect();

    for frame in 0..FRAMES {
        for &key in &keys {
            if let Some(object) = engine.objects_mut().get_mut(key) {
                object.rotate(SPIN_SPEED * DT);
            }
        }
        engine.update(DT)?;

        let stats = engine.render_system().last_frame_stats();
        info!("Frame {}: {} draws, {} overlay draws", frame, stats.draws, stats.debug_draws);
    }

    engine.shutdown();
    Ok(())
}
