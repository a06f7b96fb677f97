//! Dimension-indexed incidence graph (Hasse diagram) of a cell complex.

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::geometry::point::Point4;

// ─── Keys and Dimensions ─────────────────────────────────────────────────────

new_key_type! {
    pub struct CellId;
}

/// Dimension label of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    Vertex = 0,
    Edge = 1,
    Face = 2,
    Solid = 3,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Vertex,
        Dimension::Edge,
        Dimension::Face,
        Dimension::Solid,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(k: usize) -> Option<Self> {
        Self::ALL.get(k).copied()
    }

    pub fn below(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn above(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Vertex => "vertex",
            Dimension::Edge => "edge",
            Dimension::Face => "face",
            Dimension::Solid => "solid",
        };
        write!(f, "{name}")
    }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Contract violations on graph construction or queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("Unknown cell {0:?}")]
    UnknownCell(CellId),

    #[error("Arc {lower:?} -> {upper:?} joins a {lower_dim} to a {upper_dim}")]
    DimensionMismatch {
        lower: CellId,
        upper: CellId,
        lower_dim: Dimension,
        upper_dim: Dimension,
    },

    #[error("{operation} is not defined for {cell:?}, a {actual}")]
    WrongDimension {
        cell: CellId,
        operation: &'static str,
        actual: Dimension,
    },

    #[error("Vertex {0:?} has no coordinates")]
    MissingPoint(CellId),

    #[error("Vertex {0:?} already has coordinates")]
    PointAlreadySet(CellId),

    #[error("Graph is frozen; only standalone vertices can be appended")]
    Frozen,
}

// ─── Cells ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub dimension: Dimension,
    /// Coordinates, vertices only.
    pub point: Option<Point4>,
    /// Cells one level down that bound this one.
    pub boundary: Vec<CellId>,
    /// Cells one level up that this one bounds.
    pub coboundary: Vec<CellId>,
    /// Vertices spanning a solid. Skips levels, so it is not part of the
    /// boundary relation.
    pub hull: Vec<CellId>,
}

impl Cell {
    fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            point: None,
            boundary: Vec::new(),
            coboundary: Vec::new(),
            hull: Vec::new(),
        }
    }
}

// ─── Graph ───────────────────────────────────────────────────────────────────

/// Arena of cells with level-indexed creation order.
///
/// The graph is built bottom-up and then frozen. A frozen graph only accepts
/// [`append_point`](Self::append_point).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidenceGraph {
    cells: SlotMap<CellId, Cell>,
    levels: [Vec<CellId>; 4],
    frozen: bool,
}

impl IncidenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn cell(&self, id: CellId) -> Result<&Cell, GraphError> {
        self.cells.get(id).ok_or(GraphError::UnknownCell(id))
    }

    pub fn dimension(&self, id: CellId) -> Result<Dimension, GraphError> {
        Ok(self.cell(id)?.dimension)
    }

    fn ensure_open(&self) -> Result<(), GraphError> {
        if self.frozen {
            Err(GraphError::Frozen)
        } else {
            Ok(())
        }
    }

    // ── Construction ──

    pub fn add_cell(&mut self, dimension: Dimension) -> Result<CellId, GraphError> {
        self.ensure_open()?;
        Ok(self.insert(dimension))
    }

    fn insert(&mut self, dimension: Dimension) -> CellId {
        let id = self.cells.insert(Cell::new(dimension));
        self.levels[dimension.index()].push(id);
        id
    }

    pub fn set_point(&mut self, id: CellId, point: Point4) -> Result<(), GraphError> {
        self.ensure_open()?;
        let cell = self.cells.get_mut(id).ok_or(GraphError::UnknownCell(id))?;
        if cell.dimension != Dimension::Vertex {
            return Err(GraphError::WrongDimension {
                cell: id,
                operation: "set_point",
                actual: cell.dimension,
            });
        }
        if cell.point.is_some() {
            return Err(GraphError::PointAlreadySet(id));
        }
        cell.point = Some(point);
        Ok(())
    }

    /// Add a vertex with coordinates in one step (build phase only).
    pub fn add_vertex(&mut self, point: Point4) -> Result<CellId, GraphError> {
        let id = self.add_cell(Dimension::Vertex)?;
        self.set_point(id, point)?;
        Ok(id)
    }

    /// Append a standalone vertex with no arcs. Allowed on a frozen graph.
    pub fn append_point(&mut self, point: Point4) -> CellId {
        let id = self.insert(Dimension::Vertex);
        self.cells[id].point = Some(point);
        id
    }

    /// Record that `lower` bounds `upper`. Existing arcs are not duplicated.
    pub fn add_incidence(&mut self, lower: CellId, upper: CellId) -> Result<(), GraphError> {
        self.ensure_open()?;
        let lower_dim = self.dimension(lower)?;
        let upper_dim = self.dimension(upper)?;
        if lower_dim.above() != Some(upper_dim) {
            return Err(GraphError::DimensionMismatch {
                lower,
                upper,
                lower_dim,
                upper_dim,
            });
        }
        if self.cells[upper].boundary.contains(&lower) {
            return Ok(());
        }
        self.cells[upper].boundary.push(lower);
        self.cells[lower].coboundary.push(upper);
        Ok(())
    }

    /// Record that `vertex` spans `solid`.
    pub fn add_hull_vertex(&mut self, solid: CellId, vertex: CellId) -> Result<(), GraphError> {
        self.ensure_open()?;
        let solid_dim = self.dimension(solid)?;
        let vertex_dim = self.dimension(vertex)?;
        if solid_dim != Dimension::Solid || vertex_dim != Dimension::Vertex {
            return Err(GraphError::DimensionMismatch {
                lower: vertex,
                upper: solid,
                lower_dim: vertex_dim,
                upper_dim: solid_dim,
            });
        }
        let hull = &mut self.cells[solid].hull;
        if !hull.contains(&vertex) {
            hull.push(vertex);
        }
        Ok(())
    }

    // ── Queries ──

    /// Cells at dimension `k`, in creation order.
    pub fn cells_at_level(&self, k: Dimension) -> &[CellId] {
        &self.levels[k.index()]
    }

    pub fn level_len(&self, k: Dimension) -> usize {
        self.levels[k.index()].len()
    }

    pub fn boundary_of(&self, id: CellId) -> Result<&[CellId], GraphError> {
        let cell = self.cell(id)?;
        if cell.dimension == Dimension::Vertex {
            return Err(GraphError::WrongDimension {
                cell: id,
                operation: "boundary_of",
                actual: cell.dimension,
            });
        }
        Ok(&cell.boundary)
    }

    pub fn coboundary_of(&self, id: CellId) -> Result<&[CellId], GraphError> {
        let cell = self.cell(id)?;
        if cell.dimension == Dimension::Solid {
            return Err(GraphError::WrongDimension {
                cell: id,
                operation: "coboundary_of",
                actual: cell.dimension,
            });
        }
        Ok(&cell.coboundary)
    }

    pub fn hull_of(&self, id: CellId) -> Result<&[CellId], GraphError> {
        let cell = self.cell(id)?;
        if cell.dimension != Dimension::Solid {
            return Err(GraphError::WrongDimension {
                cell: id,
                operation: "hull_of",
                actual: cell.dimension,
            });
        }
        Ok(&cell.hull)
    }

    /// Coordinates of a vertex.
    pub fn point(&self, id: CellId) -> Result<Point4, GraphError> {
        let cell = self.cell(id)?;
        if cell.dimension != Dimension::Vertex {
            return Err(GraphError::WrongDimension {
                cell: id,
                operation: "point",
                actual: cell.dimension,
            });
        }
        cell.point.ok_or(GraphError::MissingPoint(id))
    }

    /// All vertices under a cell of any dimension, deduplicated, in
    /// first-encounter order of a depth-first descent. Hull vertices come
    /// before boundary descendants.
    #[instrument(level = "trace", skip(self))]
    pub fn resolve_to_vertices(&self, id: CellId) -> Result<Vec<CellId>, GraphError> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            let cell = self.cell(current)?;
            if cell.dimension == Dimension::Vertex {
                if seen.insert(current) {
                    out.push(current);
                }
                continue;
            }
            if !seen.insert(current) {
                continue;
            }
            // Reverse so the stack pops children in stored order.
            stack.extend(cell.boundary.iter().rev().copied());
            stack.extend(cell.hull.iter().rev().copied());
        }

        debug!(?id, count = out.len(), "resolved cell to vertices");
        Ok(out)
    }

    /// Ordered vertex pair of an edge.
    pub fn edge_endpoints(&self, id: CellId) -> Result<[CellId; 2], GraphError> {
        let cell = self.cell(id)?;
        match (cell.dimension, cell.boundary.as_slice()) {
            (Dimension::Edge, &[a, b]) => Ok([a, b]),
            (Dimension::Edge, _) => Err(GraphError::WrongDimension {
                cell: id,
                operation: "edge_endpoints (edge without exactly two vertices)",
                actual: cell.dimension,
            }),
            (actual, _) => Err(GraphError::WrongDimension {
                cell: id,
                operation: "edge_endpoints",
                actual,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> (IncidenceGraph, [CellId; 3], [CellId; 3], CellId) {
        let mut g = IncidenceGraph::new();
        let v = [
            g.add_vertex(Point4::new(0.0, 0.0, 0.0)).unwrap(),
            g.add_vertex(Point4::new(1.0, 0.0, 0.0)).unwrap(),
            g.add_vertex(Point4::new(0.0, 1.0, 0.0)).unwrap(),
        ];
        let mut e = [CellId::default(); 3];
        for (n, (a, b)) in [(0, 1), (1, 2), (2, 0)].into_iter().enumerate() {
            e[n] = g.add_cell(Dimension::Edge).unwrap();
            g.add_incidence(v[a], e[n]).unwrap();
            g.add_incidence(v[b], e[n]).unwrap();
        }
        let f = g.add_cell(Dimension::Face).unwrap();
        for edge in e {
            g.add_incidence(edge, f).unwrap();
        }
        (g, v, e, f)
    }

    #[test]
    fn test_dimension_navigation() {
        assert_eq!(Dimension::Vertex.below(), None);
        assert_eq!(Dimension::Vertex.above(), Some(Dimension::Edge));
        assert_eq!(Dimension::Solid.above(), None);
        assert_eq!(Dimension::Solid.below(), Some(Dimension::Face));
    }

    #[test]
    fn test_levels_keep_creation_order() {
        let (g, v, e, f) = triangle();
        assert_eq!(g.cells_at_level(Dimension::Vertex), &v);
        assert_eq!(g.cells_at_level(Dimension::Edge), &e);
        assert_eq!(g.cells_at_level(Dimension::Face), &[f]);
        assert!(g.cells_at_level(Dimension::Solid).is_empty());
        assert_eq!(g.len(), 7);
    }

    #[test]
    fn test_boundary_and_coboundary() {
        let (g, v, e, f) = triangle();
        assert_eq!(g.boundary_of(e[0]).unwrap(), &[v[0], v[1]]);
        assert_eq!(g.coboundary_of(v[0]).unwrap(), &[e[0], e[2]]);
        assert_eq!(g.coboundary_of(e[1]).unwrap(), &[f]);
        assert_eq!(g.boundary_of(f).unwrap(), &e);
    }

    #[test]
    fn test_incidence_requires_adjacent_levels() {
        let (mut g, v, _, f) = triangle();
        let err = g.add_incidence(v[0], f).unwrap_err();
        assert!(matches!(
            err,
            GraphError::DimensionMismatch {
                lower_dim: Dimension::Vertex,
                upper_dim: Dimension::Face,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_arc_is_ignored() {
        let (mut g, v, e, _) = triangle();
        g.add_incidence(v[0], e[0]).unwrap();
        assert_eq!(g.boundary_of(e[0]).unwrap().len(), 2);
        assert_eq!(g.coboundary_of(v[0]).unwrap().len(), 2);
    }

    #[test]
    fn test_set_point_only_on_vertices() {
        let (mut g, v, e, _) = triangle();
        assert!(matches!(
            g.set_point(e[0], Point4::ORIGIN),
            Err(GraphError::WrongDimension { .. })
        ));
        assert_eq!(
            g.set_point(v[0], Point4::ORIGIN),
            Err(GraphError::PointAlreadySet(v[0]))
        );
    }

    #[test]
    fn test_malformed_queries() {
        let (mut g, v, e, f) = triangle();
        assert!(g.boundary_of(v[0]).is_err());
        assert!(g.point(e[0]).is_err());
        assert!(g.hull_of(f).is_err());
        let bare = g.add_cell(Dimension::Vertex).unwrap();
        assert_eq!(g.point(bare), Err(GraphError::MissingPoint(bare)));
        let solid = g.add_cell(Dimension::Solid).unwrap();
        assert!(g.coboundary_of(solid).is_err());
    }

    #[test]
    fn test_resolve_to_vertices() {
        let (g, v, e, f) = triangle();
        assert_eq!(g.resolve_to_vertices(f).unwrap(), vec![v[0], v[1], v[2]]);
        assert_eq!(g.resolve_to_vertices(e[1]).unwrap(), vec![v[1], v[2]]);
        assert_eq!(g.resolve_to_vertices(v[2]).unwrap(), vec![v[2]]);
    }

    #[test]
    fn test_hull_vertices_resolve_first() {
        let (mut g, v, _, f) = triangle();
        let apex = g.add_vertex(Point4::new(0.0, 0.0, 1.0)).unwrap();
        let solid = g.add_cell(Dimension::Solid).unwrap();
        g.add_incidence(f, solid).unwrap();
        g.add_hull_vertex(solid, apex).unwrap();
        g.add_hull_vertex(solid, apex).unwrap();
        assert_eq!(g.hull_of(solid).unwrap(), &[apex]);
        assert_eq!(
            g.resolve_to_vertices(solid).unwrap(),
            vec![apex, v[0], v[1], v[2]]
        );
        assert!(g.add_hull_vertex(f, apex).is_err());
    }

    #[test]
    fn test_frozen_graph_only_appends() {
        let (mut g, v, e, _) = triangle();
        g.freeze();
        assert_eq!(g.add_cell(Dimension::Edge), Err(GraphError::Frozen));
        assert_eq!(g.add_incidence(v[0], e[1]), Err(GraphError::Frozen));
        let extra = g.append_point(Point4::new(2.0, 2.0, 2.0));
        assert_eq!(g.level_len(Dimension::Vertex), 4);
        assert_eq!(g.point(extra).unwrap(), Point4::new(2.0, 2.0, 2.0));
        assert!(g.coboundary_of(extra).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_cell() {
        let (g, ..) = triangle();
        let stale = CellId::default();
        assert_eq!(g.dimension(stale), Err(GraphError::UnknownCell(stale)));
    }
}
