pub mod error;
pub mod geometry;
pub mod math;
pub mod record;
pub mod rotation;
pub mod transform;

pub use error::{DomainError, GeomError, Result};
pub use math::{Matrix3, Vector3};
pub use rotation::{AxisAngle, Eulers, Quaternion, Rotation, RotationMatrix};
pub use transform::{AffineTransform3, EuclideanSpace};
