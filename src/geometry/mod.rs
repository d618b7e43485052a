//! Plane and line geometry expressed with the crate's vector types.

mod intersect;
mod line;
mod plane;

pub use intersect::{line_plane_intersection, planes_intersection, project_line};
pub use line::{Line2, Line3};
pub use plane::Plane;
