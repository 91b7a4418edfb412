/// Prism3D Engine - owned context tying the subsystems together.
///
/// There is no global engine: an application creates one `Engine`, hands it
/// an optional graphics device, and drives it with `update(dt)` once per
/// frame. Subsystems are reachable through accessors.
///
/// # Frame order
///
/// ```text
/// begin frame       set_clear_color(back_color), clear(color + depth)
/// camera controls   CameraSystem::update(&input)
/// orientation gizmo render_debug(axes) in front of the camera
/// objects           ObjectManager::update
/// light markers     LightingSystem::queue_markers
/// flush             RenderSystem::update
/// end frame         InputState::end_frame
/// ```

use std::sync::{Arc, Mutex};
use glam::{Mat4, Vec3};
use crate::camera::{CameraControls, CameraDesc, CameraProvider, CameraSystem};
use crate::error::Result;
use crate::graphics_device::{ClearFlags, GraphicsDevice, PrimitiveKind, ShaderDesc, ShaderHandle};
use crate::input::InputState;
use crate::lighting::LightingSystem;
use crate::math;
use crate::render::{Material, RenderSystem};
use crate::resource::{Mesh, MeshKey, MeshLibrary, ShaderLibrary};
use crate::scene::ObjectManager;
use crate::utils::lock;

/// Name of the built-in cube mesh (shared vertices, points/edges/faces)
pub const CUBE_MESH: &str = "cube";
/// Name of the built-in flat-shaded cube (faces only, with normals)
pub const FLAT_CUBE_MESH: &str = "cube_flat";
/// Name of the built-in orientation axes (edges only)
pub const AXES_MESH: &str = "axes";

/// Distance in front of the eye at which the orientation gizmo is drawn
const GIZMO_DISTANCE: f32 = 8.0;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Default camera created by `initialize`
    pub camera: CameraDesc,
    /// Keyboard bindings for the active camera
    pub controls: CameraControls,
    /// Color the frame is cleared to
    pub back_color: Vec3,
    /// Draw the axes gizmo as an overlay in front of the camera
    pub show_orientation_gizmo: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            camera: CameraDesc::default(),
            controls: CameraControls::default(),
            back_color: Vec3::splat(0.5),
            show_orientation_gizmo: true,
        }
    }
}

pub struct Engine {
    config: EngineConfig,
    device: Option<Arc<Mutex<dyn GraphicsDevice>>>,
    cameras: Arc<Mutex<CameraSystem>>,
    lighting: Arc<Mutex<LightingSystem>>,
    render: RenderSystem,
    meshes: MeshLibrary,
    shaders: ShaderLibrary,
    objects: ObjectManager,
    input: InputState,
    gizmo: Option<MeshKey>,
    running: bool,
}

impl Engine {
    /// Create an engine. Without a device every frame is dropped, but the
    /// camera, input and object subsystems keep working.
    pub fn new(config: EngineConfig, device: Option<Arc<Mutex<dyn GraphicsDevice>>>) -> Self {
        let cameras = Arc::new(Mutex::new(CameraSystem::with_controls(config.controls.clone())));
        let lighting = Arc::new(Mutex::new(LightingSystem::new()));

        let mut render = RenderSystem::new(cameras.clone());
        render.set_lighting(Some(lighting.clone()));
        if let Some(device) = &device {
            render.attach_device(device.clone());
        }

        Self {
            config,
            device,
            cameras,
            lighting,
            render,
            meshes: MeshLibrary::new(),
            shaders: ShaderLibrary::new(),
            objects: ObjectManager::new(),
            input: InputState::new(),
            gizmo: None,
            running: false,
        }
    }

    // ===== LIFECYCLE =====

    /// Create the default camera and, with a device, upload the built-in meshes.
    ///
    /// Calling it again keeps existing cameras and meshes.
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` if the configured camera is invalid, or any device upload error.
    pub fn initialize(&mut self) -> Result<()> {
        {
            let mut cameras = lock(&self.cameras, "Camera system")?;
            if cameras.camera_count() == 0 {
                cameras.initialize(&self.config.camera)?;
            }
        }

        if let Some(device) = self.device.clone() {
            let mut device = lock(&device, "Graphics device")?;
            let builtins = [
                Mesh::cube().with_name(CUBE_MESH),
                Mesh::cube().with_flat_normals().with_name(FLAT_CUBE_MESH),
                Mesh::orientation_axes().with_name(AXES_MESH),
            ];
            for mesh in &builtins {
                if self.meshes.key_of(mesh.name()).is_none() {
                    self.meshes.load(mesh, &mut *device)?;
                }
            }
            self.gizmo = self.meshes.key_of(AXES_MESH);
            lock(&self.lighting, "Lighting")?.set_marker_mesh(self.meshes.key_of(FLAT_CUBE_MESH));
        } else {
            crate::engine_warn!("prism3d::Engine", "No graphics device: frames will not be drawn");
        }

        self.running = true;
        crate::engine_info!("prism3d::Engine", "Engine initialized ({} meshes)", self.meshes.len());
        Ok(())
    }

    /// Run one frame. Input edge states are cleared even when the frame fails.
    pub fn update(&mut self, dt: f32) -> Result<()> {
        let result = self.run_frame(dt);
        self.input.end_frame();
        result
    }

    fn run_frame(&mut self, dt: f32) -> Result<()> {
        if let Some(device) = &self.device {
            let mut device = lock(device, "Graphics device")?;
            device.set_clear_color(self.config.back_color);
            device.clear(ClearFlags::COLOR | ClearFlags::DEPTH)?;
        }

        let mut cameras = lock(&self.cameras, "Camera system")?;
        cameras.update(&self.input);
        let gizmo_model = cameras.active_camera()
            .map(|camera| math::translate(camera.eye_point() + camera.look_at() * GIZMO_DISTANCE));
        drop(cameras);

        // Submission errors are held back until the queues are flushed
        let mut submitted = Ok(());
        if self.config.show_orientation_gizmo {
            if let (Some(model), Some(axes)) = (gizmo_model, self.gizmo.and_then(|key| self.meshes.get(key))) {
                submitted = self.render.render_debug(axes, PrimitiveKind::Lines, model, None);
            }
        }
        let objects = self.objects.update(&mut self.render, &self.meshes);
        let markers = lock(&self.lighting, "Lighting")
            .and_then(|lighting| lighting.queue_markers(&mut self.render, &self.meshes));

        let flushed = self.render.update(dt);
        submitted.and(objects).and(markers).and(flushed)
    }

    /// Release every GPU resource and stop the engine
    pub fn shutdown(&mut self) {
        self.objects.clear();
        self.gizmo = None;
        if let Ok(mut lighting) = self.lighting.lock() {
            lighting.set_marker_mesh(None);
            lighting.clear_lights();
        }
        if let Some(device) = &self.device {
            match device.lock() {
                Ok(mut device) => self.meshes.clear(&mut *device),
                Err(_) => crate::engine_error!("prism3d::Engine", "Graphics device lock poisoned during shutdown"),
            }
        }
        if let Ok(mut cameras) = self.cameras.lock() {
            cameras.clear();
        }
        self.running = false;
        crate::engine_info!("prism3d::Engine", "Engine shut down");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    // ===== DRAWING =====

    /// Queue a scene draw of a loaded mesh
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` if `mesh` is stale or has no buffer for `kind`.
    pub fn render(
        &mut self,
        mesh: MeshKey,
        kind: PrimitiveKind,
        object_to_world: Mat4,
        material: Option<Material>,
    ) -> Result<()> {
        let Some(gpu) = self.meshes.get(mesh) else {
            crate::engine_bail!("prism3d::Engine", InvalidArgument, "Render of unknown mesh {:?}", mesh);
        };
        self.render.render(gpu, kind, object_to_world, material)
    }

    /// Queue an overlay draw of a loaded mesh
    pub fn render_debug(
        &mut self,
        mesh: MeshKey,
        kind: PrimitiveKind,
        object_to_world: Mat4,
        material: Option<Material>,
    ) -> Result<()> {
        let Some(gpu) = self.meshes.get(mesh) else {
            crate::engine_bail!("prism3d::Engine", InvalidArgument, "Debug render of unknown mesh {:?}", mesh);
        };
        self.render.render_debug(gpu, kind, object_to_world, material)
    }

    // ===== RESOURCES =====

    /// Upload a mesh and register it under its name
    ///
    /// # Errors
    ///
    /// `Error::MissingDependency` without a device, `Error::InvalidResource` on a name clash.
    pub fn load_mesh(&mut self, mesh: &Mesh) -> Result<MeshKey> {
        let device = self.require_device("load mesh")?;
        let mut device = lock(&device, "Graphics device")?;
        self.meshes.load(mesh, &mut *device)
    }

    pub fn load_shader(&mut self, desc: &ShaderDesc) -> Result<ShaderHandle> {
        let device = self.require_device("load shader")?;
        let mut device = lock(&device, "Graphics device")?;
        self.shaders.load(desc, &mut *device)
    }

    /// Bind the shader named `name` for every following frame
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if no shader with that name was loaded.
    pub fn set_active_shader(&mut self, name: &str) -> Result<()> {
        let Some(shader) = self.shaders.get(name) else {
            crate::engine_bail!("prism3d::Engine", InvalidResource, "Unknown shader '{}'", name);
        };
        self.render.set_active_shader(Some(shader));
        crate::engine_debug!("prism3d::Engine", "Active shader: '{}'", name);
        Ok(())
    }

    fn require_device(&self, action: &str) -> Result<Arc<Mutex<dyn GraphicsDevice>>> {
        match &self.device {
            Some(device) => Ok(device.clone()),
            None => Err(crate::engine_err!("prism3d::Engine", MissingDependency,
                "Cannot {}: no graphics device", action)),
        }
    }

    // ===== ACCESSORS =====

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_back_color(&mut self, color: Vec3) {
        self.config.back_color = color;
    }

    pub fn show_orientation_gizmo(&mut self, show: bool) {
        self.config.show_orientation_gizmo = show;
    }

    pub fn cameras(&self) -> &Arc<Mutex<CameraSystem>> {
        &self.cameras
    }

    pub fn lighting(&self) -> &Arc<Mutex<LightingSystem>> {
        &self.lighting
    }

    pub fn objects(&self) -> &ObjectManager {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectManager {
        &mut self.objects
    }

    pub fn meshes(&self) -> &MeshLibrary {
        &self.meshes
    }

    pub fn shaders(&self) -> &ShaderLibrary {
        &self.shaders
    }

    pub fn render_system(&self) -> &RenderSystem {
        &self.render
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Window layers feed events here
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn device(&self) -> Option<&Arc<Mutex<dyn GraphicsDevice>>> {
        self.device.as_ref()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
