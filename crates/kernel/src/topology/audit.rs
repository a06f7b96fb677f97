//! Structural consistency checks over an incidence graph.

use tracing::{info, instrument, warn};

use super::graph::{CellId, Dimension, IncidenceGraph};

/// Result of a structural consistency check.
#[derive(Debug, Clone)]
pub struct GraphAudit {
    /// Number of cells per dimension, indexed by `Dimension::index()`.
    pub level_counts: [usize; 4],
    pub errors: Vec<AuditError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuditError {
    /// A cell above level 0 with nothing bounding it.
    EmptyBoundary { cell: CellId, dimension: Dimension },
    /// A boundary element that is not exactly one level down.
    LevelMismatch {
        cell: CellId,
        neighbour: CellId,
        expected: Option<Dimension>,
        actual: Dimension,
    },
    /// An arc stored on one end only.
    AsymmetricArc { lower: CellId, upper: CellId },
    /// A vertex without coordinates.
    MissingPoint { cell: CellId },
    /// A hull entry that is not a vertex.
    HullNotVertex { solid: CellId, entry: CellId },
    /// A reference to a cell that does not exist.
    DanglingReference { cell: CellId, target: CellId },
}

impl GraphAudit {
    pub fn all_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn count(&self, dimension: Dimension) -> usize {
        self.level_counts[dimension.index()]
    }
}

/// Walk every cell and check the arc invariants of a Hasse diagram.
#[instrument(skip(graph))]
pub fn audit_graph(graph: &IncidenceGraph) -> GraphAudit {
    let mut errors = Vec::new();
    let mut level_counts = [0usize; 4];

    for dimension in Dimension::ALL {
        let ids = graph.cells_at_level(dimension);
        level_counts[dimension.index()] = ids.len();

        for &id in ids {
            let Ok(cell) = graph.cell(id) else {
                errors.push(AuditError::DanglingReference { cell: id, target: id });
                continue;
            };

            if dimension == Dimension::Vertex && cell.point.is_none() {
                errors.push(AuditError::MissingPoint { cell: id });
            }
            if dimension != Dimension::Vertex && cell.boundary.is_empty() {
                errors.push(AuditError::EmptyBoundary { cell: id, dimension });
            }

            for &lower in &cell.boundary {
                match graph.cell(lower) {
                    Err(_) => errors.push(AuditError::DanglingReference { cell: id, target: lower }),
                    Ok(lower_cell) => {
                        if Some(lower_cell.dimension) != dimension.below() {
                            errors.push(AuditError::LevelMismatch {
                                cell: id,
                                neighbour: lower,
                                expected: dimension.below(),
                                actual: lower_cell.dimension,
                            });
                        }
                        if !lower_cell.coboundary.contains(&id) {
                            errors.push(AuditError::AsymmetricArc { lower, upper: id });
                        }
                    }
                }
            }

            for &upper in &cell.coboundary {
                match graph.cell(upper) {
                    Err(_) => errors.push(AuditError::DanglingReference { cell: id, target: upper }),
                    Ok(upper_cell) if !upper_cell.boundary.contains(&id) => {
                        errors.push(AuditError::AsymmetricArc { lower: id, upper });
                    }
                    Ok(_) => {}
                }
            }

            for &entry in &cell.hull {
                match graph.dimension(entry) {
                    Ok(Dimension::Vertex) => {}
                    Ok(_) => errors.push(AuditError::HullNotVertex { solid: id, entry }),
                    Err(_) => errors.push(AuditError::DanglingReference { cell: id, target: entry }),
                }
            }
        }
    }

    if errors.is_empty() {
        info!(?level_counts, "graph audit passed");
    } else {
        warn!(?level_counts, error_count = errors.len(), "graph audit found errors");
    }

    GraphAudit { level_counts, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::Point4;

    #[test]
    fn test_empty_graph_is_valid() {
        let audit = audit_graph(&IncidenceGraph::new());
        assert!(audit.all_valid());
        assert_eq!(audit.level_counts, [0, 0, 0, 0]);
    }

    #[test]
    fn test_edge_without_boundary_is_reported() {
        let mut g = IncidenceGraph::new();
        g.add_vertex(Point4::ORIGIN).unwrap();
        let e = g.add_cell(Dimension::Edge).unwrap();
        let audit = audit_graph(&g);
        assert_eq!(audit.count(Dimension::Edge), 1);
        assert_eq!(
            audit.errors,
            vec![AuditError::EmptyBoundary { cell: e, dimension: Dimension::Edge }]
        );
    }

    #[test]
    fn test_vertex_without_point_is_reported() {
        let mut g = IncidenceGraph::new();
        let v = g.add_cell(Dimension::Vertex).unwrap();
        let audit = audit_graph(&g);
        assert_eq!(audit.errors, vec![AuditError::MissingPoint { cell: v }]);
    }

    #[test]
    fn test_well_formed_segment() {
        let mut g = IncidenceGraph::new();
        let a = g.add_vertex(Point4::ORIGIN).unwrap();
        let b = g.add_vertex(Point4::new(1.0, 0.0, 0.0)).unwrap();
        let e = g.add_cell(Dimension::Edge).unwrap();
        g.add_incidence(a, e).unwrap();
        g.add_incidence(b, e).unwrap();
        assert!(audit_graph(&g).all_valid());
    }
}
