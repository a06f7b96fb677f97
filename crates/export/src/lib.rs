//! Turns cells of an incidence graph into flat point groups and
//! renderer-facing batch descriptions.
//!
//! Geometry shared between adjacent cells is emitted once per requesting
//! cell: two solids sharing a face both carry that face's vertices, and a
//! face requested next to its solids is drawn again on its own.

pub mod batch;
pub mod displace;
pub mod extract;

pub use batch::{batches_to_json, build_batches, Batch, BatchStyle, Color, Primitive};
pub use displace::{append_displaced, displace, vertex_coordinates};
pub use extract::{extract, Extraction};

use hcc_kernel::{CellId, GraphError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Edges of face {face:?} do not form a closed cycle")]
    OpenFacePolygon { face: CellId },

    #[error("Failed to serialize batches: {0}")]
    Serialize(#[from] serde_json::Error),
}
