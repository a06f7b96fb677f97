pub mod geometry;
pub mod topology;

// Re-export the main entry points at crate root for convenience.
pub use geometry::{GeometryError, Octant, Point4, Vec3};
pub use topology::graph::{CellId, Dimension, GraphError, IncidenceGraph};
pub use topology::sphere::{sphere_kernel, sphere_kernel_with, KernelError};

/// Global tolerance configuration for geometric comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Points (and coordinates) closer than this are considered coincident.
    /// Also the slack allowed when classifying a coordinate's sign, and the
    /// smallest sine between two edges that still spans a plane.
    pub coincidence: f64,
    /// Relative determinants below this mark a singular system.
    pub singular: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-9,
            singular: 1e-12,
        }
    }
}

/// Default tolerance used by the free helper functions.
pub fn default_tolerance() -> Tolerance {
    Tolerance::default()
}
