//! Renderer-facing descriptions of extracted cells.
//!
//! A [`Batch`] keeps the canonical geometry of one cell and a translation
//! that moves it away from the origin when the scene is exploded. Building
//! the actual meshes and showing them is left to the renderer.

use hcc_kernel::{CellId, Dimension, IncidenceGraph, Point4, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::extract::{extract, polygon, polyhedron};
use crate::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Cyan,
    Magenta,
    White,
    Yellow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Sphere marker at a vertex.
    Marker { center: Point4, radius: f64 },
    /// Cylinder along an edge.
    Segment { start: Point4, end: Point4, radius: f64 },
    /// Filled polygon, vertices in cyclic order.
    Polygon { points: Vec<Point4> },
    /// Filled polyhedron spanned by the given points.
    Polyhedron { points: Vec<Point4> },
}

impl Primitive {
    /// Anchor used for exploding: the point, the segment midpoint, or the
    /// vertex centroid.
    pub fn center(&self) -> Vec3 {
        match self {
            Primitive::Marker { center, .. } => center.to_vec3(),
            Primitive::Segment { start, end, .. } => (start.to_vec3() + end.to_vec3()) * 0.5,
            Primitive::Polygon { points } | Primitive::Polyhedron { points } => {
                let vs: Vec<Vec3> = points.iter().map(|p| p.to_vec3()).collect();
                Vec3::centroid(&vs).unwrap_or(Vec3::ZERO)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub cell: CellId,
    pub dimension: Dimension,
    pub primitive: Primitive,
    pub color: Color,
    pub translation: Vec3,
}

/// Sizes, colours and explode factors for batch construction.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStyle {
    pub marker_radius: f64,
    pub segment_radius: f64,
    /// Per-axis scale applied to each primitive's center; `(1, 1, 1)` keeps
    /// everything in place.
    pub explode: Vec3,
    /// Colour per dimension, indexed by `Dimension::index()`.
    pub colors: [Color; 4],
}

impl Default for BatchStyle {
    fn default() -> Self {
        Self {
            marker_radius: 0.05,
            segment_radius: 0.025,
            explode: Vec3::new(1.0, 1.0, 1.0),
            colors: [Color::Cyan, Color::Magenta, Color::White, Color::Yellow],
        }
    }
}

impl BatchStyle {
    pub fn exploded(factor: f64) -> Self {
        Self {
            explode: Vec3::new(factor, factor, factor),
            ..Self::default()
        }
    }

    /// Translation moving `center` to `center * explode`.
    pub fn offset(&self, center: Vec3) -> Vec3 {
        center.scale_by(&self.explode) - center
    }
}

/// Describe the requested cells as batches: markers, then segments, then
/// polygons, then polyhedra.
#[instrument(skip(graph, ids, style), fields(requested = ids.len()))]
pub fn build_batches(
    graph: &IncidenceGraph,
    ids: &[CellId],
    style: &BatchStyle,
) -> Result<Vec<Batch>, ExportError> {
    let extraction = extract(graph, ids)?;
    let mut batches = Vec::with_capacity(ids.len());

    for dimension in Dimension::ALL {
        for &cell in extraction.cells(dimension) {
            let primitive = match dimension {
                Dimension::Vertex => Primitive::Marker {
                    center: graph.point(cell)?,
                    radius: style.marker_radius,
                },
                Dimension::Edge => {
                    let [start, end] = graph.edge_endpoints(cell)?;
                    Primitive::Segment {
                        start: graph.point(start)?,
                        end: graph.point(end)?,
                        radius: style.segment_radius,
                    }
                }
                Dimension::Face => Primitive::Polygon {
                    points: polygon(graph, cell)?,
                },
                Dimension::Solid => Primitive::Polyhedron {
                    points: polyhedron(graph, cell)?,
                },
            };
            batches.push(Batch {
                cell,
                dimension,
                translation: style.offset(primitive.center()),
                color: style.colors[dimension.index()],
                primitive,
            });
        }
    }

    info!(batches = batches.len(), "built render batches");
    Ok(batches)
}

pub fn batches_to_json(batches: &[Batch]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(batches)?)
}
