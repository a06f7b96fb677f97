//! End-to-end checks of the built sphere kernel.

use std::collections::HashSet;

use approx::assert_abs_diff_eq;

use hcc_kernel::geometry::linalg::{intersect, Plane};
use hcc_kernel::geometry::symmetry::Octant;
use hcc_kernel::topology::sphere::{
    corner_point, EDGE_COUNT, FACE_COUNT, OCTANT_CORNERS, SOLID_COUNT, VERTEX_COUNT,
};
use hcc_kernel::{sphere_kernel, Dimension, GraphError, Point4, Tolerance};

#[test]
fn level_counts_match_kernel() {
    let g = sphere_kernel().unwrap();
    assert_eq!(g.cells_at_level(Dimension::Vertex).len(), VERTEX_COUNT);
    assert_eq!(g.cells_at_level(Dimension::Edge).len(), EDGE_COUNT);
    assert_eq!(g.cells_at_level(Dimension::Face).len(), FACE_COUNT);
    assert_eq!(g.cells_at_level(Dimension::Solid).len(), SOLID_COUNT);
    assert_eq!((VERTEX_COUNT, EDGE_COUNT, FACE_COUNT, SOLID_COUNT), (27, 54, 12, 8));
}

#[test]
fn boundaries_are_one_level_down() {
    let g = sphere_kernel().unwrap();
    for dim in [Dimension::Edge, Dimension::Face, Dimension::Solid] {
        for &id in g.cells_at_level(dim) {
            let boundary = g.boundary_of(id).unwrap();
            assert!(!boundary.is_empty(), "{dim} {id:?} has an empty boundary");
            for &lower in boundary {
                assert_eq!(Some(g.dimension(lower).unwrap()), dim.below());
            }
        }
    }
}

#[test]
fn coboundaries_are_one_level_up() {
    let g = sphere_kernel().unwrap();
    for dim in [Dimension::Vertex, Dimension::Edge, Dimension::Face] {
        for &id in g.cells_at_level(dim) {
            for &upper in g.coboundary_of(id).unwrap() {
                assert_eq!(Some(g.dimension(upper).unwrap()), dim.above());
                assert!(g.boundary_of(upper).unwrap().contains(&id));
            }
        }
    }
}

#[test]
fn every_solid_resolves_to_its_octant_vertices() {
    let g = sphere_kernel().unwrap();
    for (octant, &solid) in Octant::ALL.iter().zip(g.cells_at_level(Dimension::Solid)) {
        let verts = g.resolve_to_vertices(solid).unwrap();
        assert_eq!(verts.len(), 8);
        let distinct: HashSet<_> = verts.iter().collect();
        assert_eq!(distinct.len(), 8);
        for v in verts {
            assert!(octant.contains(&g.point(v).unwrap(), 1e-9));
        }
    }
}

#[test]
fn origin_is_shared_by_every_solid_and_umbrella_edge() {
    let g = sphere_kernel().unwrap();
    let origin = g.cells_at_level(Dimension::Vertex)[0];
    assert_eq!(g.point(origin).unwrap(), Point4::ORIGIN);
    assert_eq!(g.coboundary_of(origin).unwrap().len(), 6);
    for &solid in g.cells_at_level(Dimension::Solid) {
        assert!(g.hull_of(solid).unwrap().contains(&origin));
    }
}

#[test]
fn corners_have_three_edges() {
    let g = sphere_kernel().unwrap();
    for &corner in &g.cells_at_level(Dimension::Vertex)[OCTANT_CORNERS] {
        assert_eq!(g.coboundary_of(corner).unwrap().len(), 3);
    }
}

#[test]
fn all_vertices_are_affine() {
    let g = sphere_kernel().unwrap();
    for &v in g.cells_at_level(Dimension::Vertex) {
        assert_eq!(g.point(v).unwrap().w(), 1.0);
    }
}

#[test]
fn frozen_kernel_accepts_appended_points_only() {
    let mut g = sphere_kernel().unwrap();
    let edge = g.cells_at_level(Dimension::Edge)[0];
    let vertex = g.cells_at_level(Dimension::Vertex)[0];
    assert_eq!(g.add_incidence(vertex, edge), Err(GraphError::Frozen));
    assert_eq!(g.add_cell(Dimension::Face), Err(GraphError::Frozen));

    let extra = g.append_point(Point4::new(1.5, 0.0, 0.0));
    assert_eq!(g.level_len(Dimension::Vertex), VERTEX_COUNT + 1);
    assert!(g.coboundary_of(extra).unwrap().is_empty());
}

#[test]
fn plane_intersection_recovers_corner_vertex() {
    // Each plane passes through an axis point and its two ring neighbours;
    // all three meet at the first octant corner.
    let s = std::f64::consts::FRAC_PI_4.sin();
    let i = Point4::new(1.0, 0.0, 0.0);
    let j = Point4::new(0.0, 1.0, 0.0);
    let k = Point4::new(0.0, 0.0, 1.0);
    let ij = Point4::new(s, s, 0.0);
    let jk = Point4::new(0.0, s, s);
    let ki = Point4::new(s, 0.0, s);

    let p1 = Plane::through(ki, i, ij).unwrap();
    let p2 = Plane::through(ij, j, jk).unwrap();
    let p3 = Plane::through(jk, k, ki).unwrap();
    let corner = intersect(&p1, &p2, &p3).unwrap();

    let g = sphere_kernel().unwrap();
    let stored = g.point(g.cells_at_level(Dimension::Vertex)[OCTANT_CORNERS.start]).unwrap();
    assert_abs_diff_eq!(corner, stored, epsilon = 1e-9);
    assert_abs_diff_eq!(corner, corner_point(&Tolerance::default()).unwrap(), epsilon = 1e-12);
}

#[test]
fn kernel_serializes_with_its_levels() {
    let g = sphere_kernel().unwrap();
    let json = serde_json::to_string(&g).unwrap();
    let back: hcc_kernel::IncidenceGraph = serde_json::from_str(&json).unwrap();
    assert!(back.is_frozen());
    for dim in Dimension::ALL {
        assert_eq!(back.cells_at_level(dim), g.cells_at_level(dim));
    }
}
