use hcc_kernel::{CellId, Dimension, IncidenceGraph, Point4};
use tracing::{debug, instrument};

use crate::ExportError;

/// Requested cells partitioned by dimension, resolved to points on demand.
#[derive(Debug, Clone)]
pub struct Extraction<'g> {
    graph: &'g IncidenceGraph,
    levels: [Vec<CellId>; 4],
}

type Resolver = fn(&IncidenceGraph, CellId) -> Result<Vec<Point4>, ExportError>;

/// Partition `ids` by dimension, keeping request order within each level.
/// Unknown ids fail here; resolution failures surface from the iterators.
#[instrument(skip(graph, ids), fields(requested = ids.len()))]
pub fn extract<'g>(graph: &'g IncidenceGraph, ids: &[CellId]) -> Result<Extraction<'g>, ExportError> {
    let mut levels: [Vec<CellId>; 4] = Default::default();
    for &id in ids {
        levels[graph.dimension(id)?.index()].push(id);
    }
    debug!(
        vertices = levels[0].len(),
        edges = levels[1].len(),
        faces = levels[2].len(),
        solids = levels[3].len(),
        "partitioned cells"
    );
    Ok(Extraction { graph, levels })
}

impl<'g> Extraction<'g> {
    pub fn cells(&self, dimension: Dimension) -> &[CellId] {
        &self.levels[dimension.index()]
    }

    /// Point groups of every requested cell at `dimension`.
    pub fn groups(
        &self,
        dimension: Dimension,
    ) -> impl Iterator<Item = Result<Vec<Point4>, ExportError>> + '_ {
        let resolve: Resolver = match dimension {
            Dimension::Vertex => vertex_group,
            Dimension::Edge => segment,
            Dimension::Face => polygon,
            Dimension::Solid => polyhedron,
        };
        let graph = self.graph;
        self.cells(dimension).iter().map(move |&id| resolve(graph, id))
    }

    /// One point per vertex.
    pub fn vertices(&self) -> impl Iterator<Item = Result<Vec<Point4>, ExportError>> + '_ {
        self.groups(Dimension::Vertex)
    }

    /// Endpoint pairs, in boundary order.
    pub fn segments(&self) -> impl Iterator<Item = Result<Vec<Point4>, ExportError>> + '_ {
        self.groups(Dimension::Edge)
    }

    /// Face outlines, ordered by walking each face's edge cycle.
    pub fn polygons(&self) -> impl Iterator<Item = Result<Vec<Point4>, ExportError>> + '_ {
        self.groups(Dimension::Face)
    }

    /// Spanning vertex set of each solid.
    pub fn polyhedra(&self) -> impl Iterator<Item = Result<Vec<Point4>, ExportError>> + '_ {
        self.groups(Dimension::Solid)
    }
}

fn points(graph: &IncidenceGraph, ids: &[CellId]) -> Result<Vec<Point4>, ExportError> {
    ids.iter()
        .map(|&id| graph.point(id).map_err(ExportError::from))
        .collect()
}

fn vertex_group(graph: &IncidenceGraph, id: CellId) -> Result<Vec<Point4>, ExportError> {
    Ok(vec![graph.point(id)?])
}

fn segment(graph: &IncidenceGraph, id: CellId) -> Result<Vec<Point4>, ExportError> {
    points(graph, &graph.edge_endpoints(id)?)
}

pub(crate) fn polygon(graph: &IncidenceGraph, face: CellId) -> Result<Vec<Point4>, ExportError> {
    points(graph, &face_cycle(graph, face)?)
}

pub(crate) fn polyhedron(graph: &IncidenceGraph, id: CellId) -> Result<Vec<Point4>, ExportError> {
    points(graph, &graph.resolve_to_vertices(id)?)
}

/// Vertices of a face in cyclic order, starting at the first endpoint of its
/// first boundary edge.
pub fn face_cycle(graph: &IncidenceGraph, face: CellId) -> Result<Vec<CellId>, ExportError> {
    let pairs = graph
        .boundary_of(face)?
        .iter()
        .map(|&e| graph.edge_endpoints(e))
        .collect::<Result<Vec<_>, _>>()?;
    if pairs.len() < 3 {
        return Err(ExportError::OpenFacePolygon { face });
    }

    let [start, mut current] = pairs[0];
    let mut used = vec![false; pairs.len()];
    used[0] = true;
    let mut order = vec![start];

    for _ in 1..pairs.len() {
        order.push(current);
        let (i, next) = pairs
            .iter()
            .enumerate()
            .filter(|(i, _)| !used[*i])
            .find_map(|(i, &[a, b])| {
                if a == current {
                    Some((i, b))
                } else if b == current {
                    Some((i, a))
                } else {
                    None
                }
            })
            .ok_or(ExportError::OpenFacePolygon { face })?;
        used[i] = true;
        current = next;
    }

    if current != start {
        return Err(ExportError::OpenFacePolygon { face });
    }
    Ok(order)
}
