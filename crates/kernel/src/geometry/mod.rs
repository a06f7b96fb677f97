pub mod point;
pub mod vector;
pub mod matrix;
pub mod linalg;
pub mod symmetry;

pub use linalg::{intersect, plane, Plane};
pub use matrix::{minor, Matrix4};
pub use point::Point4;
pub use symmetry::{reflect, unique, unique_points, Octant};
pub use vector::Vec3;

use thiserror::Error;

/// Failures of the numeric layer. Every one of them means the input geometry
/// is degenerate; nothing computed up to that point is usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Points do not span a plane (normal length {normal_length:e})")]
    DegeneratePlane { normal_length: f64 },

    #[error("Planes do not meet in a unique point (determinant {determinant:e})")]
    SingularSystem { determinant: f64 },

    #[error("Point ({x}, {y}, {z}) is not strictly inside octant {octant}")]
    NotInOctant { x: f64, y: f64, z: f64, octant: u8 },

    #[error("Octant index {0} is outside 1..=8")]
    InvalidOctant(u8),

    #[error("Matrix is {rows}x{cols}, expected a square matrix")]
    NotSquare { rows: usize, cols: usize },

    #[error("Index ({row}, {col}) out of range for a {size}x{size} matrix")]
    IndexOutOfRange { row: usize, col: usize, size: usize },
}
