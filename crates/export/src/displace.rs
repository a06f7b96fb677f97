use hcc_kernel::{CellId, Dimension, IncidenceGraph, Point4};
use tracing::{debug, instrument};

use crate::ExportError;

/// Scale each point's x, y and z about the origin. `w` is untouched and the
/// inputs are not modified.
pub fn displace(points: &[Point4], factor: f64) -> Vec<Point4> {
    points.iter().map(|p| p.scaled(factor)).collect()
}

/// Append a displaced copy of each given vertex as a standalone vertex.
///
/// Works on a frozen graph. All coordinates are read before anything is
/// appended, so a bad id leaves the graph unchanged.
#[instrument(skip(graph, ids), fields(count = ids.len()))]
pub fn append_displaced(
    graph: &mut IncidenceGraph,
    ids: &[CellId],
    factor: f64,
) -> Result<Vec<CellId>, ExportError> {
    let sources = ids
        .iter()
        .map(|&id| graph.point(id))
        .collect::<Result<Vec<_>, _>>()?;
    let appended: Vec<CellId> = displace(&sources, factor)
        .into_iter()
        .map(|p| graph.append_point(p))
        .collect();
    debug!(appended = appended.len(), "appended displaced vertices");
    Ok(appended)
}

/// Every vertex with its coordinates, in creation order.
pub fn vertex_coordinates(graph: &IncidenceGraph) -> Result<Vec<(CellId, Point4)>, ExportError> {
    graph
        .cells_at_level(Dimension::Vertex)
        .iter()
        .map(|&id| Ok((id, graph.point(id)?)))
        .collect()
}
