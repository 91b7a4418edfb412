//! Transform helpers in homogeneous coordinates.
//!
//! Points carry `w = 1`, vectors carry `w = 0`. All matrices are column-major
//! (glam convention), so `affine(c0, c1, c2, c3)` takes columns.

use glam::{Mat3, Mat4, Vec3, Vec4};

/// Homogeneous point (w = 1)
#[inline]
pub fn point(x: f32, y: f32, z: f32) -> Vec4 {
    Vec4::new(x, y, z, 1.0)
}

/// Homogeneous vector (w = 0)
#[inline]
pub fn vector(x: f32, y: f32, z: f32) -> Vec4 {
    Vec4::new(x, y, z, 0.0)
}

/// Translation by the xyz part of `v`
pub fn translate(v: Vec4) -> Mat4 {
    Mat4::from_translation(v.truncate())
}

/// Non-uniform scale
pub fn scale(sx: f32, sy: f32, sz: f32) -> Mat4 {
    Mat4::from_diagonal(Vec4::new(sx, sy, sz, 1.0))
}

/// Uniform 3D scale
pub fn scale_uniform(s: f32) -> Mat4 {
    scale(s, s, s)
}

/// Uniform scale of x and y only
pub fn scale_2d(s: f32) -> Mat4 {
    scale(s, s, 1.0)
}

/// Rotation in the xy plane, counter-clockwise, in degrees
pub fn rotate_2d(degrees: f32) -> Mat4 {
    let (s, c) = degrees.to_radians().sin_cos();
    Mat4::from_cols(
        Vec4::new(c, s, 0.0, 0.0),
        Vec4::new(-s, c, 0.0, 0.0),
        Vec4::Z,
        Vec4::W,
    )
}

/// Right-handed rotation of `degrees` about `axis` (Rodrigues' formula).
///
/// The axis does not need to be normalized; only its xyz part is used.
/// A zero-length axis yields the identity.
pub fn rotate_3d(axis: Vec4, degrees: f32) -> Mat4 {
    let v = axis.truncate();
    let len_sq = v.length_squared();
    if len_sq <= f32::EPSILON {
        return Mat4::IDENTITY;
    }
    let len = len_sq.sqrt();
    let (s, c) = degrees.to_radians().sin_cos();

    let diagonal = Mat3::from_diagonal(Vec3::splat(c));
    let outer = Mat3::from_cols(v * v.x, v * v.y, v * v.z) * ((1.0 - c) / len_sq);
    let skew = Mat3::from_cols(
        Vec3::new(0.0, v.z, -v.y),
        Vec3::new(-v.z, 0.0, v.x),
        Vec3::new(v.y, -v.x, 0.0),
    ) * (s / len);

    Mat4::from_mat3(diagonal + outer + skew)
}

/// Matrix built from four column vectors
#[inline]
pub fn affine(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Mat4 {
    Mat4::from_cols(c0, c1, c2, c3)
}

/// Inverse of an affine matrix: `inverse(L) * translate(-t)`.
///
/// Only the 3x3 linear part is inverted, so the bottom row must be (0, 0, 0, 1).
/// For an orthonormal linear part (camera frames) this equals the transpose shortcut.
pub fn affine_inverse(m: &Mat4) -> Mat4 {
    let linear_inv = Mat4::from_mat3(Mat3::from_mat4(*m).inverse());
    let translation = m.w_axis.truncate();
    linear_inv * Mat4::from_translation(-translation)
}

/// Maps object-space normals to world space: inverse-transpose of the linear part.
pub fn normal_matrix(model: &Mat4) -> Mat4 {
    Mat4::from_mat3(Mat3::from_mat4(*model).inverse().transpose())
}

/// 3D cross product of the xyz parts; the result keeps `u.w`.
pub fn cross(u: Vec4, v: Vec4) -> Vec4 {
    u.truncate().cross(v.truncate()).extend(u.w)
}

#[cfg(test)]
#[path = "math_tests.rs"]
mod tests;
