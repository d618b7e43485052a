mod angle;
mod matrix3;
mod vector3;

pub use angle::{angle_difference, wrap_angle};
pub use matrix3::Matrix3;
pub use vector3::Vector3;

/// 2D vector type used for in-plane coordinates.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 4x4 homogeneous matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Default admissibility tolerance for matrices that must be rotations.
pub const ROTATION_TOLERANCE: f64 = 1e-6;

/// Threshold below which a conversion switches to its degenerate branch:
/// gimbal lock in quaternion to Euler angles, and the undefined axis of the
/// identity in quaternion to axis-angle.
pub const DEGENERACY_TOLERANCE: f64 = 1e-12;
