/// Render system - deferred draw queues flushed once per frame.
///
/// Callers enqueue draws at any time during the frame with `render` (scene
/// geometry) or `render_debug` (overlays drawn after a depth clear). `update`
/// drains both queues in submission order against a single binding of the
/// active camera's matrices.
///
/// # Flush order
///
/// ```text
/// bind_shader
/// set_uniform perspMat, worldToCam          (once)
/// [lighting uniforms + default material]    (lit shader only)
/// for each normal request:
///     set_uniform objToWorld, normMat, ignoreNorm, [material]
///     draw_elements
/// [clear depth]                             (debug queue non-empty)
/// for each debug request: same as above
/// ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use glam::{Mat4, Vec4};
use crate::camera::CameraProvider;
use crate::error::Result;
use crate::graphics_device::{
    ClearFlags, GraphicsDevice, PrimitiveKind, ShaderHandle, Uniform, UniformValue,
};
use crate::resource::GpuMesh;
use crate::utils::lock;
use super::render_request::{Material, RenderRequest};

/// Per-shader lighting uniforms, uploaded once per frame before any draw
pub trait LightingStage: Send {
    /// Whether this stage feeds `shader`
    fn is_active_for(&self, shader: ShaderHandle) -> bool;

    /// Upload per-frame lighting uniforms
    fn upload(&self, device: &mut dyn GraphicsDevice, eye: Vec4) -> Result<()>;

    /// Material used by requests that carry none
    fn material_defaults(&self) -> Material;
}

/// What the last flush did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draws: u32,
    pub debug_draws: u32,
    /// Requests discarded because the frame could not be rendered
    pub dropped: u32,
}

/// Tracks which material the bound shader currently holds
struct MaterialState {
    baseline: Material,
    overridden: bool,
}

impl MaterialState {
    fn apply(&mut self, device: &mut dyn GraphicsDevice, request: &RenderRequest) -> Result<()> {
        match request.material() {
            Some(material) => {
                material.upload(device)?;
                self.overridden = true;
            }
            None if self.overridden => {
                self.baseline.upload(device)?;
                self.overridden = false;
            }
            None => {}
        }
        Ok(())
    }
}

pub struct RenderSystem {
    queue: VecDeque<RenderRequest>,
    debug_queue: VecDeque<RenderRequest>,
    cameras: Arc<Mutex<dyn CameraProvider>>,
    device: Option<Arc<Mutex<dyn GraphicsDevice>>>,
    lighting: Option<Arc<Mutex<dyn LightingStage>>>,
    active_shader: Option<ShaderHandle>,
    last_frame: FrameStats,
}

impl RenderSystem {
    /// Create a render system reading the active camera from `cameras`
    pub fn new(cameras: Arc<Mutex<dyn CameraProvider>>) -> Self {
        Self {
            queue: VecDeque::new(),
            debug_queue: VecDeque::new(),
            cameras,
            device: None,
            lighting: None,
            active_shader: None,
            last_frame: FrameStats::default(),
        }
    }

    // ===== WIRING =====

    pub fn attach_device(&mut self, device: Arc<Mutex<dyn GraphicsDevice>>) {
        self.device = Some(device);
    }

    pub fn detach_device(&mut self) -> Option<Arc<Mutex<dyn GraphicsDevice>>> {
        self.device.take()
    }

    pub fn set_lighting(&mut self, lighting: Option<Arc<Mutex<dyn LightingStage>>>) {
        self.lighting = lighting;
    }

    /// Shader bound at the start of every flush
    pub fn set_active_shader(&mut self, shader: Option<ShaderHandle>) {
        self.active_shader = shader;
    }

    pub fn active_shader(&self) -> Option<ShaderHandle> {
        self.active_shader
    }

    // ===== SUBMISSION =====

    /// Queue a scene draw
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` if `mesh` has no buffer for `kind`. Nothing is queued.
    pub fn render(
        &mut self,
        mesh: &GpuMesh,
        kind: PrimitiveKind,
        object_to_world: Mat4,
        material: Option<Material>,
    ) -> Result<()> {
        self.queue.push_back(RenderRequest::new(mesh, kind, object_to_world, material)?);
        Ok(())
    }

    /// Queue an overlay draw (drawn after the scene, over a cleared depth buffer)
    pub fn render_debug(
        &mut self,
        mesh: &GpuMesh,
        kind: PrimitiveKind,
        object_to_world: Mat4,
        material: Option<Material>,
    ) -> Result<()> {
        self.debug_queue.push_back(RenderRequest::new(mesh, kind, object_to_world, material)?);
        Ok(())
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn pending_debug_count(&self) -> usize {
        self.debug_queue.len()
    }

    pub fn last_frame_stats(&self) -> FrameStats {
        self.last_frame
    }

    // ===== FLUSH =====

    /// Drain both queues to the device.
    ///
    /// Without a device, an active camera or an active shader the frame is
    /// dropped: queues are emptied and `Ok(())` is returned. Device errors are
    /// returned after the queues have been emptied as well.
    pub fn update(&mut self, _dt: f32) -> Result<()> {
        let queue = std::mem::take(&mut self.queue);
        let debug_queue = std::mem::take(&mut self.debug_queue);
        self.last_frame = FrameStats::default();

        let Some(device) = self.device.clone() else {
            return self.drop_frame("no graphics device attached", &queue, &debug_queue);
        };
        let Some(shader) = self.active_shader else {
            return self.drop_frame("no active shader", &queue, &debug_queue);
        };

        let camera_state = {
            let cameras = lock(&self.cameras, "Camera provider")?;
            let state = cameras
                .active_camera()
                .map(|camera| (camera.persp_matrix(), camera.view_matrix(), camera.eye_point()));
            state
        };
        let Some((persp, view, eye)) = camera_state else {
            return self.drop_frame("no active camera", &queue, &debug_queue);
        };

        let mut device = lock(&device, "Graphics device")?;
        let device: &mut dyn GraphicsDevice = &mut *device;

        device.bind_shader(shader)?;
        device.set_uniform(Uniform::Perspective, &UniformValue::Mat4(persp))?;
        device.set_uniform(Uniform::View, &UniformValue::Mat4(view))?;

        let mut material = MaterialState { baseline: Material::default(), overridden: false };
        if let Some(lighting) = &self.lighting {
            let lighting = lock(lighting, "Lighting")?;
            if lighting.is_active_for(shader) {
                lighting.upload(device, eye)?;
                material.baseline = lighting.material_defaults();
                material.baseline.upload(device)?;
            }
        }

        for request in &queue {
            Self::submit(device, request, &mut material)?;
            self.last_frame.draws += 1;
        }

        if !debug_queue.is_empty() {
            device.clear(ClearFlags::DEPTH)?;
            for request in &debug_queue {
                Self::submit(device, request, &mut material)?;
                self.last_frame.debug_draws += 1;
            }
        }

        crate::engine_trace!("prism3d::RenderSystem",
            "Frame flushed: {} draws, {} debug draws", self.last_frame.draws, self.last_frame.debug_draws);
        Ok(())
    }

    fn submit(device: &mut dyn GraphicsDevice, request: &RenderRequest, material: &mut MaterialState) -> Result<()> {
        device.set_uniform(Uniform::ObjectToWorld, &UniformValue::Mat4(*request.object_to_world()))?;
        device.set_uniform(Uniform::NormalMatrix, &UniformValue::Mat4(*request.normal_matrix()))?;
        device.set_uniform(Uniform::IgnoreNormals, &UniformValue::Int(request.no_norm() as i32))?;
        material.apply(device, request)?;
        device.draw_elements(request.draw_handle(), request.kind(), request.index_count())
    }

    fn drop_frame(
        &mut self,
        reason: &str,
        queue: &VecDeque<RenderRequest>,
        debug_queue: &VecDeque<RenderRequest>,
    ) -> Result<()> {
        let dropped = (queue.len() + debug_queue.len()) as u32;
        self.last_frame.dropped = dropped;
        if dropped > 0 {
            crate::engine_debug!("prism3d::RenderSystem", "Dropping {} requests: {}", dropped, reason);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "render_system_tests.rs"]
mod tests;
