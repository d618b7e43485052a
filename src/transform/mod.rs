//! Rigid transforms and the coordinate frames built on them.
//!
//! Frames chain detector, sample and crystal coordinates: each
//! [`EuclideanSpace`] knows its placement in a parent frame, and the
//! transform between two sibling frames is derived from those placements.

mod affine;
mod space;

pub use affine::AffineTransform3;
pub use space::EuclideanSpace;
