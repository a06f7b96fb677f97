use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};
use std::ops::Sub;

use super::vector::Vec3;

/// A homogeneous point `(w, x, y, z)`.
///
/// Affine points carry `w = 1`; the kernel never builds any other kind, but
/// the weight is kept so rows of a [`Matrix4`](super::matrix::Matrix4) read the
/// same way the points do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point4 {
    w: f64,
    x: f64,
    y: f64,
    z: f64,
}

impl Point4 {
    pub const ORIGIN: Self = Self {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Affine point with `w = 1`.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { w: 1.0, x, y, z }
    }

    pub fn homogeneous(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    pub fn from_vec3(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    pub fn w(&self) -> f64 {
        self.w
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    /// The non-homogeneous part.
    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }

    /// Scale x, y and z about the origin, leaving `w` alone.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            w: self.w,
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        (*self - *other).length()
    }

    /// Componentwise absolute value of the spatial part.
    pub fn abs(&self) -> Self {
        Self {
            w: self.w,
            x: self.x.abs(),
            y: self.y.abs(),
            z: self.z.abs(),
        }
    }
}

impl Sub for Point4 {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl AbsDiffEq for Point4 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.w.abs_diff_eq(&other.w, epsilon) && self.to_vec3().abs_diff_eq(&other.to_vec3(), epsilon)
    }
}

impl RelativeEq for Point4 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.w.relative_eq(&other.w, epsilon, max_relative)
            && self
                .to_vec3()
                .relative_eq(&other.to_vec3(), epsilon, max_relative)
    }
}
