use nalgebra::{DMatrix, Matrix3};
use serde::{Deserialize, Serialize};

use super::GeometryError;
use super::point::Point4;

/// A 4x4 matrix whose rows are homogeneous points `(w, x, y, z)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix4 {
    rows: [Point4; 4],
}

impl Matrix4 {
    pub fn from_rows(rows: [Point4; 4]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Point4; 4] {
        &self.rows
    }

    /// The 3x3 submatrix left after removing row `i` and column `j`.
    pub fn minor(&self, i: usize, j: usize) -> Result<Matrix3<f64>, GeometryError> {
        if i >= 4 || j >= 4 {
            return Err(GeometryError::IndexOutOfRange { row: i, col: j, size: 4 });
        }
        let keep = |skip: usize| -> [usize; 3] {
            let mut out = [0usize; 3];
            let mut n = 0;
            for k in (0..4).filter(|&k| k != skip) {
                out[n] = k;
                n += 1;
            }
            out
        };
        let (rows, cols) = (keep(i), keep(j));
        let data = self.rows.map(|p| p.to_array());
        Ok(Matrix3::from_fn(|r, c| data[rows[r]][cols[c]]))
    }

    pub fn determinant(&self) -> f64 {
        let data = self.rows.map(|p| p.to_array());
        nalgebra::Matrix4::from_fn(|r, c| data[r][c]).determinant()
    }
}

/// Remove row `i` and column `j` from a square matrix of any size.
pub fn minor(matrix: &DMatrix<f64>, i: usize, j: usize) -> Result<DMatrix<f64>, GeometryError> {
    let (nrows, ncols) = matrix.shape();
    if nrows != ncols {
        return Err(GeometryError::NotSquare { rows: nrows, cols: ncols });
    }
    if i >= nrows || j >= ncols {
        return Err(GeometryError::IndexOutOfRange { row: i, col: j, size: nrows });
    }
    Ok(matrix.clone().remove_row(i).remove_column(j))
}
