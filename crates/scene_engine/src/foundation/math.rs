//! Math utilities and types
//!
//! View calculations are done in double precision to match the clip plane
//! ranges a scene can use.

pub use nalgebra::{Vector3, Matrix4};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f64>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f64>;

/// Build the projection matrix equivalent to `glFrustum`
pub fn frustum_matrix(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Mat4 {
    let width = right - left;
    let height = top - bottom;
    let depth = far - near;

    Mat4::new(
        2.0 * near / width, 0.0, (right + left) / width, 0.0,
        0.0, 2.0 * near / height, (top + bottom) / height, 0.0,
        0.0, 0.0, -(far + near) / depth, -2.0 * far * near / depth,
        0.0, 0.0, -1.0, 0.0,
    )
}

/// Build the projection matrix equivalent to `glOrtho`
pub fn ortho_matrix(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Mat4 {
    Mat4::new_orthographic(left, right, bottom, top, near, far)
}
