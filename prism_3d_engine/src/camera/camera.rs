/// Camera - free-look perspective camera with lazily cached matrices.
///
/// The camera stores an eye point and an orthonormal basis (right, up, back).
/// Its three matrices (camera-to-world, view, perspective) are rebuilt only
/// when read after a mutation; every mutator marks the affected caches dirty.

use std::cell::Cell;
use bitflags::bitflags;
use glam::{Mat4, Vec4};
use crate::error::Result;
use crate::math;

/// Lower bound of the field of view reachable through [`Camera::zoom`], in degrees.
pub const MIN_FOV: f32 = 1.0;
/// Upper bound of the field of view reachable through [`Camera::zoom`], in degrees.
pub const MAX_FOV: f32 = 90.0;

const WORLD_UP: Vec4 = Vec4::new(0.0, 1.0, 0.0, 0.0);

bitflags! {
    /// Cached matrices that must be rebuilt on next read
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        const CAM_TO_WORLD = 1 << 0;
        const VIEW = 1 << 1;
        const PERSP = 1 << 2;
    }
}

/// Camera creation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraDesc {
    /// Eye position (w is forced to 1)
    pub eye: Vec4,
    /// Direction the camera looks along (w is forced to 0)
    pub look_direction: Vec4,
    /// Horizontal field of view in degrees
    pub fov_degrees: f32,
    /// Viewport width / height
    pub aspect_ratio: f32,
    /// Near plane distance (> 0)
    pub near: f32,
    /// Far plane distance (> near)
    pub far: f32,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            eye: math::point(0.0, 0.0, -10.0),
            look_direction: math::vector(0.0, 0.0, 1.0),
            fov_degrees: 90.0,
            aspect_ratio: 16.0 / 9.0,
            near: 1.0,
            far: 100.0,
        }
    }
}

/// Perspective camera with body-fixed yaw, pitch and roll.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec4,
    right: Vec4,
    up: Vec4,
    back: Vec4,

    fov: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,
    viewport_dist: f32,
    viewport_width: f32,
    viewport_height: f32,

    cam_to_world: Cell<Mat4>,
    view: Cell<Mat4>,
    persp: Cell<Mat4>,
    dirty: Cell<DirtyFlags>,
}

impl Camera {
    /// Create a camera at `eye` looking along `look_direction`.
    ///
    /// The basis is derived from world up (0, 1, 0):
    /// `back = -normalize(look)`, `right = normalize(look x up)`, `up = back x right`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the look direction is zero, not finite or
    /// parallel to world up, if the field of view is outside (0, 180), or if
    /// `aspect <= 0`, `near <= 0` or `far <= near`.
    pub fn new(
        eye: Vec4,
        look_direction: Vec4,
        fov_degrees: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Result<Self> {
        let look = look_direction.truncate().extend(0.0);
        if !eye.is_finite() || !look.is_finite() {
            crate::engine_bail!("prism3d::Camera", InvalidArgument,
                "Camera eye and look direction must be finite");
        }
        if look.length_squared() <= f32::EPSILON {
            crate::engine_bail!("prism3d::Camera", InvalidArgument,
                "Camera look direction must be non-zero");
        }
        if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
            crate::engine_bail!("prism3d::Camera", InvalidArgument,
                "Camera fov must be in (0, 180) degrees, got {}", fov_degrees);
        }
        Self::check_aspect(aspect_ratio)?;
        if !(near > 0.0) || !(far > near) || !far.is_finite() {
            crate::engine_bail!("prism3d::Camera", InvalidArgument,
                "Camera requires 0 < near < far, got near={} far={}", near, far);
        }

        let side = math::cross(look, WORLD_UP);
        if side.length_squared() <= f32::EPSILON * look.length_squared() {
            crate::engine_bail!("prism3d::Camera", InvalidArgument,
                "Camera look direction {:?} is parallel to world up", look.truncate());
        }

        let back = -look.normalize();
        let right = side.normalize();
        let up = math::cross(back, right);

        let viewport_dist = near + (far - near) / 2.0;
        let mut camera = Self {
            eye: eye.truncate().extend(1.0),
            right,
            up,
            back,
            fov: fov_degrees,
            aspect_ratio,
            near,
            far,
            viewport_dist,
            viewport_width: 0.0,
            viewport_height: 0.0,
            cam_to_world: Cell::new(Mat4::IDENTITY),
            view: Cell::new(Mat4::IDENTITY),
            persp: Cell::new(Mat4::IDENTITY),
            dirty: Cell::new(DirtyFlags::all()),
        };
        camera.update_viewport();
        Ok(camera)
    }

    /// Create a camera from a descriptor
    pub fn from_desc(desc: &CameraDesc) -> Result<Self> {
        Self::new(desc.eye, desc.look_direction, desc.fov_degrees, desc.aspect_ratio, desc.near, desc.far)
    }

    fn check_aspect(aspect_ratio: f32) -> Result<()> {
        if !(aspect_ratio > 0.0) || !aspect_ratio.is_finite() {
            crate::engine_bail!("prism3d::Camera", InvalidArgument,
                "Camera aspect ratio must be > 0, got {}", aspect_ratio);
        }
        Ok(())
    }

    fn update_viewport(&mut self) {
        self.viewport_width = 2.0 * self.viewport_dist * (self.fov.to_radians() / 2.0).tan();
        self.viewport_height = self.viewport_width / self.aspect_ratio;
    }

    fn mark_dirty(&self, flags: DirtyFlags) {
        self.dirty.set(self.dirty.get() | flags);
    }

    /// Rotate all three basis vectors, then re-orthonormalize so rounding
    /// error does not accumulate over long rotation sequences.
    fn rotate_basis(&mut self, rotation: Mat4) {
        let back = (rotation * self.back).truncate().normalize();
        let up = (rotation * self.up).truncate();
        let right = up.cross(back).normalize();
        let up = back.cross(right);

        self.right = right.extend(0.0);
        self.up = up.extend(0.0);
        self.back = back.extend(0.0);
        self.mark_dirty(DirtyFlags::all());
    }

    // ===== MUTATORS =====

    /// Move along the look direction (negative amounts move backwards)
    pub fn move_forward(&mut self, amount: f32) {
        self.eye += -amount * self.back;
        self.mark_dirty(DirtyFlags::all());
    }

    /// Move along the right vector (negative amounts move left)
    pub fn move_right(&mut self, amount: f32) {
        self.eye += amount * self.right;
        self.mark_dirty(DirtyFlags::all());
    }

    /// Rotate the basis about the current up vector
    pub fn yaw(&mut self, degrees: f32) {
        self.rotate_basis(math::rotate_3d(self.up, degrees));
    }

    /// Rotate the basis about the current right vector
    pub fn pitch(&mut self, degrees: f32) {
        self.rotate_basis(math::rotate_3d(self.right, degrees));
    }

    /// Rotate the basis about the current back vector
    pub fn roll(&mut self, degrees: f32) {
        self.rotate_basis(math::rotate_3d(self.back, degrees));
    }

    /// Narrow the field of view by `delta` degrees (negative widens), clamped to [1, 90].
    pub fn zoom(&mut self, delta: f32) {
        self.fov = (self.fov - delta).clamp(MIN_FOV, MAX_FOV);
        self.update_viewport();
        self.mark_dirty(DirtyFlags::all());
    }

    /// Change the aspect ratio (e.g. after a window resize)
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `aspect_ratio` is not a positive finite value.
    pub fn set_aspect(&mut self, aspect_ratio: f32) -> Result<()> {
        Self::check_aspect(aspect_ratio)?;
        self.aspect_ratio = aspect_ratio;
        self.update_viewport();
        self.mark_dirty(DirtyFlags::PERSP);
        Ok(())
    }

    // ===== MATRICES =====

    /// Camera-to-world transform: columns are right, up, back and eye.
    pub fn cam_to_world_matrix(&self) -> Mat4 {
        let dirty = self.dirty.get();
        if dirty.contains(DirtyFlags::CAM_TO_WORLD) {
            self.cam_to_world.set(math::affine(self.right, self.up, self.back, self.eye));
            self.dirty.set(dirty - DirtyFlags::CAM_TO_WORLD);
        }
        self.cam_to_world.get()
    }

    /// World-to-camera (view) transform, the affine inverse of [`Self::cam_to_world_matrix`].
    pub fn view_matrix(&self) -> Mat4 {
        if self.dirty.get().contains(DirtyFlags::VIEW) {
            let cam_to_world = self.cam_to_world_matrix();
            self.view.set(math::affine_inverse(&cam_to_world));
            self.dirty.set(self.dirty.get() - DirtyFlags::VIEW);
        }
        self.view.get()
    }

    /// Perspective projection derived from the viewport extents and near/far planes.
    pub fn persp_matrix(&self) -> Mat4 {
        let dirty = self.dirty.get();
        if dirty.contains(DirtyFlags::PERSP) {
            let d = self.viewport_dist;
            let (n, f) = (self.near, self.far);
            self.persp.set(Mat4::from_cols(
                Vec4::new(2.0 * d / self.viewport_width, 0.0, 0.0, 0.0),
                Vec4::new(0.0, 2.0 * d / self.viewport_height, 0.0, 0.0),
                Vec4::new(0.0, 0.0, (n + f) / (n - f), -1.0),
                Vec4::new(0.0, 0.0, 2.0 * n * f / (n - f), 0.0),
            ));
            self.dirty.set(dirty - DirtyFlags::PERSP);
        }
        self.persp.get()
    }

    /// Matrices that will be rebuilt on next read
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty.get()
    }

    // ===== GETTERS =====

    /// Look direction (`-back`)
    pub fn look_at(&self) -> Vec4 {
        -self.back
    }

    pub fn eye_point(&self) -> Vec4 {
        self.eye
    }

    pub fn right(&self) -> Vec4 {
        self.right
    }

    pub fn up(&self) -> Vec4 {
        self.up
    }

    pub fn back(&self) -> Vec4 {
        self.back
    }

    /// Field of view in degrees
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Distance from the eye to the viewport plane (halfway between near and far)
    pub fn viewport_dist(&self) -> f32 {
        self.viewport_dist
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
