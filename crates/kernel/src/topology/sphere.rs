//! Builder for the octant-symmetric sphere kernel.
//!
//! Vertex numbering is fixed and the edge/face tables below index into it:
//!
//! | index  | vertices                                            |
//! |--------|-----------------------------------------------------|
//! | 0      | origin                                              |
//! | 1..=6  | `i, j, k, -i, -j, -k`                               |
//! | 7..=10 | ring around z (in the z = 0 plane)                  |
//! | 11..=14| ring around x (in the x = 0 plane)                  |
//! | 15..=18| ring around y (in the y = 0 plane)                  |
//! | 19..=26| octant corners, octants 1..=8                       |

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::ops::Range;

use thiserror::Error;
use tracing::{debug, info, instrument};

use super::audit::{audit_graph, AuditError};
use super::graph::{CellId, Dimension, GraphError, IncidenceGraph};
use crate::geometry::linalg::{intersect_with_tolerance, plane_with_tolerance};
use crate::geometry::matrix::Matrix4;
use crate::geometry::point::Point4;
use crate::geometry::symmetry::{reflect_with_tolerance, unique_points, Octant};
use crate::geometry::GeometryError;
use crate::Tolerance;

pub const VERTEX_COUNT: usize = 27;
pub const EDGE_COUNT: usize = 54;
pub const FACE_COUNT: usize = 12;
pub const SOLID_COUNT: usize = 8;

/// Vertices spanning each solid.
pub const HULL_SIZE: usize = 8;
/// Coordinate-plane faces bounding each solid.
pub const FACES_PER_SOLID: usize = 3;

pub const UMBRELLA_VERTICES: Range<usize> = 0..7;
pub const RING_VERTICES: Range<usize> = 7..19;
pub const OCTANT_CORNERS: Range<usize> = 19..27;

/// Vertex index pairs, in edge creation order.
#[rustfmt::skip]
const EDGES: [(usize, usize); EDGE_COUNT] = [
    // umbrella: origin to each axis point (0..6)
    (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6),
    // z ring (6..14)
    (1, 7), (2, 7), (2, 8), (4, 8), (4, 9), (5, 9), (5, 10), (1, 10),
    // x ring (14..22)
    (2, 11), (3, 11), (3, 12), (5, 12), (5, 13), (6, 13), (6, 14), (2, 14),
    // y ring (22..30)
    (3, 15), (1, 15), (1, 16), (6, 16), (6, 17), (4, 17), (4, 18), (3, 18),
    // upper cap, corners 19..=22 (30..42)
    (15, 19), (11, 19), (11, 20), (18, 20), (18, 21), (12, 21), (12, 22), (15, 22),
    (7, 19), (8, 20), (9, 21), (10, 22),
    // lower cap, corners 23..=26 (42..54)
    (16, 23), (14, 23), (14, 24), (17, 24), (17, 25), (13, 25), (13, 26), (16, 26),
    (7, 23), (8, 24), (9, 25), (10, 26),
];

/// Edge indices of each quadrilateral face, four per coordinate plane.
#[rustfmt::skip]
const FACES: [[usize; 4]; FACE_COUNT] = [
    // z = 0
    [0, 6, 7, 1], [1, 8, 9, 3], [3, 10, 11, 4], [4, 12, 13, 0],
    // x = 0
    [1, 14, 15, 2], [2, 16, 17, 4], [4, 18, 19, 5], [5, 20, 21, 1],
    // y = 0
    [0, 22, 23, 2], [0, 24, 25, 5], [5, 26, 27, 3], [3, 28, 29, 2],
];

/// Failures while building the kernel. None of them leave a usable graph.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Invariant violated: {what} (expected {expected}, found {actual})")]
    InvariantViolation {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Topology corrupted: {} audit errors", .errors.len())]
    TopologyCorrupted { errors: Vec<AuditError> },
}

fn invariant(what: &'static str, expected: usize, actual: usize) -> Result<(), KernelError> {
    if expected == actual {
        Ok(())
    } else {
        Err(KernelError::InvariantViolation { what, expected, actual })
    }
}

/// Corner of the first octant: the meeting point of the three planes that
/// pass through one axis point and the two ring points beside it.
pub fn corner_point(tol: &Tolerance) -> Result<Point4, GeometryError> {
    let (c, s) = (FRAC_PI_4.cos(), FRAC_PI_4.sin());
    let i = Point4::new(1.0, 0.0, 0.0);
    let j = Point4::new(0.0, 1.0, 0.0);
    let k = Point4::new(0.0, 0.0, 1.0);
    let ij = Point4::new(c, s, 0.0);
    let jk = Point4::new(0.0, c, s);
    let ki = Point4::new(c, 0.0, s);

    let plane_ij = plane_with_tolerance(&Matrix4::from_rows([Point4::ORIGIN, ki, i, ij]), tol)?;
    let plane_jk = plane_with_tolerance(&Matrix4::from_rows([Point4::ORIGIN, ij, j, jk]), tol)?;
    let plane_ki = plane_with_tolerance(&Matrix4::from_rows([Point4::ORIGIN, jk, k, ki]), tol)?;
    intersect_with_tolerance(&plane_ij, &plane_jk, &plane_ki, tol)
}

/// Angles `pi/4 + n*pi/2` (or descending when `step` is negative), n = 0..4.
fn ring_angles(step: f64) -> impl Iterator<Item = f64> {
    (0..4).map(move |n| FRAC_PI_4 + step * n as f64 * FRAC_PI_2)
}

/// The 27 vertex positions in kernel order.
pub fn sphere_vertices(tol: &Tolerance) -> Result<Vec<Point4>, KernelError> {
    let mut verts = vec![
        Point4::ORIGIN,
        Point4::new(1.0, 0.0, 0.0),
        Point4::new(0.0, 1.0, 0.0),
        Point4::new(0.0, 0.0, 1.0),
        Point4::new(-1.0, 0.0, 0.0),
        Point4::new(0.0, -1.0, 0.0),
        Point4::new(0.0, 0.0, -1.0),
    ];
    verts.extend(ring_angles(1.0).map(|u| Point4::new(u.cos(), u.sin(), 0.0)));
    verts.extend(ring_angles(1.0).map(|u| Point4::new(0.0, u.cos(), u.sin())));
    verts.extend(ring_angles(-1.0).map(|u| Point4::new(u.cos(), 0.0, u.sin())));

    let corner = corner_point(tol)?;
    verts.push(corner);
    verts.extend(reflect_with_tolerance(&corner, Octant::ALL[0], tol)?);

    invariant("vertex positions", VERTEX_COUNT, verts.len())?;
    invariant(
        "distinct vertex positions",
        VERTEX_COUNT,
        unique_points(&verts, tol.coincidence).len(),
    )?;
    Ok(verts)
}

/// Build the kernel with the default tolerance.
pub fn sphere_kernel() -> Result<IncidenceGraph, KernelError> {
    sphere_kernel_with(&crate::default_tolerance())
}

/// Build the sphere kernel bottom-up, verify it and return it frozen.
#[instrument(skip(tol))]
pub fn sphere_kernel_with(tol: &Tolerance) -> Result<IncidenceGraph, KernelError> {
    let mut graph = IncidenceGraph::new();

    let vertices = sphere_vertices(tol)?
        .into_iter()
        .map(|p| graph.add_vertex(p))
        .collect::<Result<Vec<CellId>, _>>()?;
    debug!(count = vertices.len(), "inserted vertices");

    let mut edges = Vec::with_capacity(EDGE_COUNT);
    for &(a, b) in &EDGES {
        let edge = graph.add_cell(Dimension::Edge)?;
        graph.add_incidence(vertices[a], edge)?;
        graph.add_incidence(vertices[b], edge)?;
        edges.push(edge);
    }
    invariant("edges", EDGE_COUNT, graph.level_len(Dimension::Edge))?;
    debug!(count = edges.len(), "connected edges");

    let mut faces = Vec::with_capacity(FACE_COUNT);
    for face_edges in &FACES {
        let face = graph.add_cell(Dimension::Face)?;
        for &e in face_edges {
            graph.add_incidence(edges[e], face)?;
        }
        faces.push(face);
    }
    debug!(count = faces.len(), "connected faces");

    for octant in Octant::ALL {
        let solid = graph.add_cell(Dimension::Solid)?;
        for &v in &vertices {
            if octant.contains(&graph.point(v)?, tol.coincidence) {
                graph.add_hull_vertex(solid, v)?;
            }
        }
        for &f in &faces {
            if lies_in_octant(&graph, f, octant, tol)? {
                graph.add_incidence(f, solid)?;
            }
        }
        debug!(%octant, hull = graph.hull_of(solid)?.len(), "assigned solid");
    }

    verify(&graph)?;
    graph.freeze();

    info!(
        vertices = graph.level_len(Dimension::Vertex),
        edges = graph.level_len(Dimension::Edge),
        faces = graph.level_len(Dimension::Face),
        solids = graph.level_len(Dimension::Solid),
        "sphere kernel built"
    );
    Ok(graph)
}

fn lies_in_octant(
    graph: &IncidenceGraph,
    cell: CellId,
    octant: Octant,
    tol: &Tolerance,
) -> Result<bool, GraphError> {
    for v in graph.resolve_to_vertices(cell)? {
        if !octant.contains(&graph.point(v)?, tol.coincidence) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Check every cardinality the kernel guarantees.
pub fn verify(graph: &IncidenceGraph) -> Result<(), KernelError> {
    let audit = audit_graph(graph);
    if !audit.all_valid() {
        return Err(KernelError::TopologyCorrupted { errors: audit.errors });
    }

    invariant("vertices", VERTEX_COUNT, audit.count(Dimension::Vertex))?;
    invariant("edges", EDGE_COUNT, audit.count(Dimension::Edge))?;
    invariant("faces", FACE_COUNT, audit.count(Dimension::Face))?;
    invariant("solids", SOLID_COUNT, audit.count(Dimension::Solid))?;

    for &e in graph.cells_at_level(Dimension::Edge) {
        invariant("edge endpoints", 2, graph.boundary_of(e)?.len())?;
    }
    for &f in graph.cells_at_level(Dimension::Face) {
        invariant("face edges", 4, graph.boundary_of(f)?.len())?;
        invariant("face vertices", 4, graph.resolve_to_vertices(f)?.len())?;
    }
    for &s in graph.cells_at_level(Dimension::Solid) {
        invariant("solid hull", HULL_SIZE, graph.hull_of(s)?.len())?;
        invariant("solid faces", FACES_PER_SOLID, graph.boundary_of(s)?.len())?;
        invariant("solid vertices", HULL_SIZE, graph.resolve_to_vertices(s)?.len())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_corner_lies_on_diagonal() {
        let p = corner_point(&Tolerance::default()).unwrap();
        let s = FRAC_PI_4.sin();
        let t = s / (2.0 - s);
        assert_abs_diff_eq!(p, Point4::new(t, t, t), epsilon = 1e-12);
    }

    #[test]
    fn test_vertex_table() {
        let verts = sphere_vertices(&Tolerance::default()).unwrap();
        assert_eq!(verts.len(), VERTEX_COUNT);
        for p in &verts[RING_VERTICES] {
            assert_abs_diff_eq!(p.to_vec3().length(), 1.0, epsilon = 1e-12);
        }
        let corners: Vec<u8> = verts[OCTANT_CORNERS]
            .iter()
            .map(|p| Octant::of_point(p, 1e-9).unwrap().index())
            .collect();
        assert_eq!(corners, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_edges_join_distinct_vertices() {
        for &(a, b) in &EDGES {
            assert_ne!(a, b);
            assert!(a < VERTEX_COUNT && b < VERTEX_COUNT);
        }
        let mut sorted: Vec<(usize, usize)> = EDGES.iter().map(|&(a, b)| (a.min(b), a.max(b))).collect();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), EDGE_COUNT);
    }

    #[test]
    fn test_face_table_forms_closed_cycles() {
        for face in &FACES {
            let mut degree = std::collections::HashMap::new();
            for &e in face {
                let (a, b) = EDGES[e];
                *degree.entry(a).or_insert(0) += 1;
                *degree.entry(b).or_insert(0) += 1;
            }
            assert_eq!(degree.len(), 4);
            assert!(degree.values().all(|&d| d == 2));
        }
    }

    #[test]
    fn test_kernel_builds_frozen() {
        let g = sphere_kernel().unwrap();
        assert!(g.is_frozen());
        verify(&g).unwrap();
    }

    #[test]
    fn test_each_face_bounds_two_solids() {
        let g = sphere_kernel().unwrap();
        for &f in g.cells_at_level(Dimension::Face) {
            assert_eq!(g.coboundary_of(f).unwrap().len(), 2);
        }
    }

    #[test]
    fn test_verify_rejects_incomplete_graph() {
        let mut g = IncidenceGraph::new();
        g.add_vertex(Point4::ORIGIN).unwrap();
        assert!(matches!(
            verify(&g),
            Err(KernelError::InvariantViolation { what: "vertices", expected: 27, actual: 1 })
        ));
    }
}
