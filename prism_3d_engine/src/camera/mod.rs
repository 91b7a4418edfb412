//! Camera module - free-look perspective camera and the camera registry.
//!
//! `Camera` owns its transform pipeline (basis vectors to camera-to-world,
//! view and perspective matrices). `CameraSystem` owns the cameras and hands
//! the active one to the render system through `CameraProvider`.

mod camera;
mod camera_system;

pub use camera::{Camera, CameraDesc, DirtyFlags, MIN_FOV, MAX_FOV};
pub use camera_system::{CameraSystem, CameraKey, CameraProvider, CameraControls};
