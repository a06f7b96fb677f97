//! Octant sign patterns and reflection of points across the coordinate planes.

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::GeometryError;
use super::point::Point4;
use crate::Tolerance;

/// Sign triple of each octant, indexed by `octant - 1`.
const OCTANT_SIGNS: [[f64; 3]; 8] = [
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
];

/// One of the eight sign regions of 3-space, numbered 1..=8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Octant(u8);

impl Octant {
    pub const ALL: [Octant; 8] = [
        Octant(1),
        Octant(2),
        Octant(3),
        Octant(4),
        Octant(5),
        Octant(6),
        Octant(7),
        Octant(8),
    ];

    pub fn new(index: u8) -> Result<Self, GeometryError> {
        if (1..=8).contains(&index) {
            Ok(Self(index))
        } else {
            Err(GeometryError::InvalidOctant(index))
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn signs(self) -> [f64; 3] {
        OCTANT_SIGNS[usize::from(self.0 - 1)]
    }

    /// `[1, s1*|x|, s2*|y|, s3*|z|]`.
    pub fn apply(self, point: &Point4) -> Point4 {
        let [sx, sy, sz] = self.signs();
        let m = point.abs();
        Point4::new(sx * m.x(), sy * m.y(), sz * m.z())
    }

    /// The octant whose sign pattern matches a point with no coordinate
    /// within `tol` of zero.
    pub fn of_point(point: &Point4, tol: f64) -> Option<Octant> {
        let coords = [point.x(), point.y(), point.z()];
        if coords.iter().any(|c| c.abs() <= tol) {
            return None;
        }
        Self::ALL.into_iter().find(|o| {
            o.signs()
                .iter()
                .zip(coords)
                .all(|(s, c)| s.is_sign_positive() == c.is_sign_positive())
        })
    }

    /// Closed-octant membership: points on coordinate planes belong to every
    /// octant adjacent to them.
    pub fn contains(self, point: &Point4, tol: f64) -> bool {
        self.signs()
            .iter()
            .zip([point.x(), point.y(), point.z()])
            .all(|(s, c)| s * c >= -tol)
    }
}

impl fmt::Display for Octant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = |s: f64| if s > 0.0 { '+' } else { '-' };
        let [a, b, c] = self.signs();
        write!(f, "{}({}{}{})", self.0, sign(a), sign(b), sign(c))
    }
}

/// Reflect a point lying in the closed `octant` into the seven other
/// octants, in increasing octant order.
///
/// Zero coordinates are compatible with any sign, so a point on a coordinate
/// plane is accepted and some of its copies coincide; pass the result through
/// [`unique_points`] when distinct positions are needed.
pub fn reflect(point: &Point4, octant: Octant) -> Result<Vec<Point4>, GeometryError> {
    reflect_with_tolerance(point, octant, &crate::default_tolerance())
}

pub fn reflect_with_tolerance(
    point: &Point4,
    octant: Octant,
    tol: &Tolerance,
) -> Result<Vec<Point4>, GeometryError> {
    if !octant.contains(point, tol.coincidence) {
        return Err(GeometryError::NotInOctant {
            x: point.x(),
            y: point.y(),
            z: point.z(),
            octant: octant.index(),
        });
    }
    Ok(Octant::ALL
        .into_iter()
        .filter(|&o| o != octant)
        .map(|o| o.apply(point))
        .collect())
}

/// Stable deduplication keeping the first occurrence of each element.
pub fn unique<T: PartialEq + Clone>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

/// Like [`unique`], treating points closer than `tol` per coordinate as equal.
pub fn unique_points(points: &[Point4], tol: f64) -> Vec<Point4> {
    let mut out: Vec<Point4> = Vec::with_capacity(points.len());
    for p in points {
        if !out.iter().any(|q| q.abs_diff_eq(p, tol)) {
            out.push(*p);
        }
    }
    out
}
