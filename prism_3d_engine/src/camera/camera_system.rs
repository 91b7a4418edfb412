/// Camera registry with a single active camera.
///
/// Cameras are owned by the system and addressed by `CameraKey`. The render
/// system only ever sees the active camera, through the [`CameraProvider`] trait.

use slotmap::{new_key_type, SlotMap};
use winit::keyboard::KeyCode;
use crate::error::Result;
use crate::input::InputState;
use super::camera::{Camera, CameraDesc};

new_key_type! {
    /// Stable key for a camera owned by [`CameraSystem`]
    pub struct CameraKey;
}

/// Source of the camera used to render a frame
pub trait CameraProvider: Send {
    /// Camera to render with, or `None` when no camera is active
    fn active_camera(&self) -> Option<&Camera>;
}

/// Keyboard bindings and step sizes applied to the active camera each frame
#[derive(Debug, Clone, PartialEq)]
pub struct CameraControls {
    /// World units per frame for forward/side moves
    pub move_step: f32,
    /// Degrees per frame for yaw/pitch
    pub rotate_step: f32,
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub right: KeyCode,
    pub left: KeyCode,
    pub pitch_up: KeyCode,
    pub pitch_down: KeyCode,
    pub yaw_left: KeyCode,
    pub yaw_right: KeyCode,
}

impl Default for CameraControls {
    fn default() -> Self {
        Self {
            move_step: 0.1,
            rotate_step: 1.0,
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            right: KeyCode::KeyD,
            left: KeyCode::KeyA,
            pitch_up: KeyCode::ArrowUp,
            pitch_down: KeyCode::ArrowDown,
            yaw_left: KeyCode::ArrowLeft,
            yaw_right: KeyCode::ArrowRight,
        }
    }
}

impl CameraControls {
    /// Apply held keys to `camera`. Opposite keys are exclusive, the first binding wins.
    pub fn apply(&self, camera: &mut Camera, input: &InputState) {
        if input.is_key_down(self.right) {
            camera.move_right(self.move_step);
        } else if input.is_key_down(self.left) {
            camera.move_right(-self.move_step);
        }

        if input.is_key_down(self.forward) {
            camera.move_forward(self.move_step);
        } else if input.is_key_down(self.backward) {
            camera.move_forward(-self.move_step);
        }

        if input.is_key_down(self.pitch_up) {
            camera.pitch(self.rotate_step);
        } else if input.is_key_down(self.pitch_down) {
            camera.pitch(-self.rotate_step);
        }

        if input.is_key_down(self.yaw_left) {
            camera.yaw(self.rotate_step);
        } else if input.is_key_down(self.yaw_right) {
            camera.yaw(-self.rotate_step);
        }
    }
}

/// Owns every camera and tracks which one is active
pub struct CameraSystem {
    cameras: SlotMap<CameraKey, Camera>,
    active: Option<CameraKey>,
    controls: CameraControls,
}

impl CameraSystem {
    pub fn new() -> Self {
        Self::with_controls(CameraControls::default())
    }

    pub fn with_controls(controls: CameraControls) -> Self {
        Self {
            cameras: SlotMap::with_key(),
            active: None,
            controls,
        }
    }

    /// Create the start camera from `desc` and make it active
    pub fn initialize(&mut self, desc: &CameraDesc) -> Result<CameraKey> {
        let key = self.add_camera(Camera::from_desc(desc)?);
        self.active = Some(key);
        crate::engine_debug!("prism3d::CameraSystem",
            "Start camera at {:?} looking {:?}", desc.eye.truncate(), desc.look_direction.truncate());
        Ok(key)
    }

    /// Register a camera. The first camera added becomes active.
    pub fn add_camera(&mut self, camera: Camera) -> CameraKey {
        let key = self.cameras.insert(camera);
        if self.active.is_none() {
            self.active = Some(key);
        }
        key
    }

    /// Remove a camera. Removing the active camera leaves no camera active.
    pub fn remove_camera(&mut self, key: CameraKey) -> Option<Camera> {
        let removed = self.cameras.remove(key);
        if removed.is_some() && self.active == Some(key) {
            self.active = None;
            crate::engine_warn!("prism3d::CameraSystem", "Active camera removed; frames will be skipped");
        }
        removed
    }

    pub fn set_active(&mut self, key: CameraKey) -> Result<()> {
        if !self.cameras.contains_key(key) {
            crate::engine_bail!("prism3d::CameraSystem", InvalidArgument,
                "Cannot activate unknown camera {:?}", key);
        }
        self.active = Some(key);
        Ok(())
    }

    pub fn active_key(&self) -> Option<CameraKey> {
        self.active
    }

    pub fn camera(&self, key: CameraKey) -> Option<&Camera> {
        self.cameras.get(key)
    }

    pub fn camera_mut(&mut self, key: CameraKey) -> Option<&mut Camera> {
        self.cameras.get_mut(key)
    }

    pub fn active_camera_mut(&mut self) -> Option<&mut Camera> {
        self.active.and_then(|key| self.cameras.get_mut(key))
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    pub fn controls(&self) -> &CameraControls {
        &self.controls
    }

    pub fn set_controls(&mut self, controls: CameraControls) {
        self.controls = controls;
    }

    /// Apply keyboard controls to the active camera
    pub fn update(&mut self, input: &InputState) {
        let Some(key) = self.active else {
            return;
        };
        if let Some(camera) = self.cameras.get_mut(key) {
            self.controls.apply(camera, input);
        }
    }

    /// Drop every camera
    pub fn clear(&mut self) {
        self.cameras.clear();
        self.active = None;
    }
}

impl Default for CameraSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraProvider for CameraSystem {
    fn active_camera(&self) -> Option<&Camera> {
        self.active.and_then(|key| self.cameras.get(key))
    }
}

#[cfg(test)]
#[path = "camera_system_tests.rs"]
mod tests;
