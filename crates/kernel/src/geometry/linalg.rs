//! Planes from homogeneous points and three-plane intersection.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::GeometryError;
use super::matrix::Matrix4;
use super::point::Point4;
use super::vector::Vec3;
use crate::Tolerance;

/// Plane `a*x + b*y + c*z + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub d: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Plane {
    pub fn new(d: f64, a: f64, b: f64, c: f64) -> Self {
        Self { d, a, b, c }
    }

    /// Plane through three points. The origin fills the placeholder row.
    pub fn through(p: Point4, q: Point4, r: Point4) -> Result<Self, GeometryError> {
        plane(&Matrix4::from_rows([Point4::ORIGIN, p, q, r]))
    }

    /// Unnormalised normal `(a, b, c)`.
    pub fn normal(&self) -> Vec3 {
        Vec3::new(self.a, self.b, self.c)
    }

    /// Signed value of the plane equation at `p`, scaled by the normal length.
    pub fn evaluate(&self, p: &Point4) -> f64 {
        self.d * p.w() + self.a * p.x() + self.b * p.y() + self.c * p.z()
    }

    pub fn contains(&self, p: &Point4, tol: f64) -> bool {
        let len = self.normal().length();
        len > 0.0 && (self.evaluate(p) / len).abs() < tol
    }
}

/// Plane through rows 1..3 of `matrix`, using the default tolerance.
///
/// Row 0 stands for the unknown point: the coefficients are the signed
/// cofactors along that row, so `det(matrix with p in row 0) == 0` is the
/// plane equation.
pub fn plane(matrix: &Matrix4) -> Result<Plane, GeometryError> {
    plane_with_tolerance(matrix, &crate::default_tolerance())
}

/// Fails with `DegeneratePlane` when the three points are coincident or
/// collinear to within `tol.coincidence`, measured as the sine of the angle
/// they span.
pub fn plane_with_tolerance(matrix: &Matrix4, tol: &Tolerance) -> Result<Plane, GeometryError> {
    let d = matrix.minor(0, 0)?.determinant();
    let a = -matrix.minor(0, 1)?.determinant();
    let b = matrix.minor(0, 2)?.determinant();
    let c = -matrix.minor(0, 3)?.determinant();
    let result = Plane::new(d, a, b, c);

    // Sine of the angle between the two edges leaving the first point.
    let [_, p, q, r] = *matrix.rows();
    let (u, v) = (q - p, r - p);
    let spread = u.length() * v.length();
    let norm = result.normal().length();
    if spread == 0.0 || u.cross(&v).length() / spread < tol.coincidence {
        return Err(GeometryError::DegeneratePlane { normal_length: norm });
    }
    trace!(d, a, b, c, "plane from cofactors");
    Ok(result)
}

/// The unique point shared by three planes, using the default tolerance.
pub fn intersect(p1: &Plane, p2: &Plane, p3: &Plane) -> Result<Point4, GeometryError> {
    intersect_with_tolerance(p1, p2, p3, &crate::default_tolerance())
}

pub fn intersect_with_tolerance(
    p1: &Plane,
    p2: &Plane,
    p3: &Plane,
    tol: &Tolerance,
) -> Result<Point4, GeometryError> {
    let a = Matrix3::new(
        p1.a, p1.b, p1.c, //
        p2.a, p2.b, p2.c, //
        p3.a, p3.b, p3.c,
    );
    let rhs = Vector3::new(-p1.d, -p2.d, -p3.d);

    // Determinant relative to the row norms, so uniformly scaled planes
    // classify the same way.
    let scale = p1.normal().length() * p2.normal().length() * p3.normal().length();
    let det = a.determinant();
    if scale < tol.singular || (det / scale).abs() < tol.singular {
        return Err(GeometryError::SingularSystem { determinant: det });
    }

    let x = a
        .lu()
        .solve(&rhs)
        .ok_or(GeometryError::SingularSystem { determinant: det })?;
    Ok(Point4::new(x[0], x[1], x[2]))
}
