//! Dense row-major `f64` matrices and the helpers that evaluate them.
//!
//! Serializes as a bare nested array (`[[1.0, 0.0], [0.0, 1.0]]`).

use serde::{Deserialize, Serialize};

/// Errors that can occur while building or combining matrices.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// Matrix has no rows
    Empty,
    /// Rows of differing length
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Operation requires a square matrix
    NotSquare { rows: usize, cols: usize },
    /// Vector length does not match the matrix
    DimensionMismatch { expected: usize, found: usize },
    /// NaN or infinite entry where exact arithmetic is required
    NonFiniteEntry { row: usize, col: usize },
    /// Entry too large for exact decimal arithmetic
    OutOfRange { row: usize, col: usize },
}

impl MatrixError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            MatrixError::Empty => "MATRIX_EMPTY",
            MatrixError::Ragged { .. } => "MATRIX_RAGGED",
            MatrixError::NotSquare { .. } => "MATRIX_NOT_SQUARE",
            MatrixError::DimensionMismatch { .. } => "MATRIX_DIMENSION_MISMATCH",
            MatrixError::NonFiniteEntry { .. } => "MATRIX_NON_FINITE",
            MatrixError::OutOfRange { .. } => "MATRIX_OUT_OF_RANGE",
        }
    }
}

impl std::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixError::Empty => write!(f, "[{}] Matrix has no rows", self.code()),
            MatrixError::Ragged {
                row,
                expected,
                found,
            } => write!(
                f,
                "[{}] Row {} has {} entries, expected {}",
                self.code(),
                row,
                found,
                expected
            ),
            MatrixError::NotSquare { rows, cols } => write!(
                f,
                "[{}] Matrix must be square (got {}x{})",
                self.code(),
                rows,
                cols
            ),
            MatrixError::DimensionMismatch { expected, found } => write!(
                f,
                "[{}] Expected length {}, found {}",
                self.code(),
                expected,
                found
            ),
            MatrixError::NonFiniteEntry { row, col } => write!(
                f,
                "[{}] Entry ({}, {}) is not finite",
                self.code(),
                row,
                col
            ),
            MatrixError::OutOfRange { row, col } => write!(
                f,
                "[{}] Entry ({}, {}) exceeds the exact decimal range",
                self.code(),
                row,
                col
            ),
        }
    }
}

impl std::error::Error for MatrixError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn square(n: usize) -> Self {
        Self::zeros(n, n)
    }

    pub fn identity(n: usize) -> Self {
        let mut matrix = Self::square(n);
        for i in 0..n {
            matrix[(i, i)] = 1.0;
        }
        matrix
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(Vec::len).ok_or(MatrixError::Empty)?;
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != n_cols {
                return Err(MatrixError::Ragged {
                    row,
                    expected: n_cols,
                    found: values.len(),
                });
            }
            data.extend(values);
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn ensure_square(&self) -> Result<usize, MatrixError> {
        if self.rows == 0 {
            return Err(MatrixError::Empty);
        }
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.rows)
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out[(j, i)] = self[(i, j)];
            }
        }
        out
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|value| f(*value)).collect(),
        }
    }

    pub fn scale(&self, by: f64) -> Self {
        self.map(|value| value * by)
    }

    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |acc, value| acc.max(value.abs()))
    }

    pub fn is_upper_triangular(&self) -> bool {
        (0..self.rows).all(|i| (0..i.min(self.cols)).all(|j| self[(i, j)] == 0.0))
    }

    /// `xᵀ M x`, skipping zero entries of `x`. A 0×0 matrix gives 0.
    pub fn quadratic_form(&self, x: &[f64]) -> Result<f64, MatrixError> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let n = self.rows;
        if x.len() != n {
            return Err(MatrixError::DimensionMismatch {
                expected: n,
                found: x.len(),
            });
        }
        let mut total = 0.0;
        for (i, xi) in x.iter().enumerate() {
            if *xi == 0.0 {
                continue;
            }
            let row_dot: f64 = self.row(i).iter().zip(x).map(|(m, xj)| m * xj).sum();
            total += xi * row_dot;
        }
        Ok(total)
    }
}

impl std::ops::Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.data[i * self.cols + j]
    }
}

impl std::ops::IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        &mut self.data[i * self.cols + j]
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Matrix::from_rows(rows)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(matrix: Matrix) -> Self {
        matrix.to_rows()
    }
}

impl std::fmt::Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.rows {
            let cells: Vec<String> = self.row(i).iter().map(|v| format!("{v:>8}")).collect();
            let open = if i == 0 { "[[" } else { " [" };
            let close = if i + 1 == self.rows { "]]" } else { "]\n" };
            write!(f, "{open}{}{close}", cells.join(" "))?;
        }
        Ok(())
    }
}

/// Whether `|M - Mᵀ| < tolerance` holds elementwise.
pub fn check_symmetric(matrix: &Matrix, tolerance: f64) -> bool {
    matrix.is_square()
        && (0..matrix.rows())
            .all(|i| (0..i).all(|j| (matrix[(i, j)] - matrix[(j, i)]).abs() < tolerance))
}

/// `xᵀ Q x + offset`.
pub fn calculate_qubo_value(qubo: &Matrix, offset: f64, x: &[f64]) -> Result<f64, MatrixError> {
    Ok(qubo.quadratic_form(x)? + offset)
}

/// Ising energy `-cᵀ M c` for each spin configuration.
pub fn hamiltonian(ising: &Matrix, configs: &[Vec<f64>]) -> Result<Vec<f64>, MatrixError> {
    configs
        .iter()
        .map(|config| ising.quadratic_form(config).map(|value| -value))
        .collect()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn ring() -> Matrix {
        Matrix::from_rows(vec![
            vec![0.0, -1.0, 0.0, -1.0, -1.0],
            vec![-1.0, 0.0, 0.0, -1.0, -1.0],
            vec![0.0, 0.0, 0.0, -1.0, -1.0],
            vec![-1.0, -1.0, -1.0, 0.0, -1.0],
            vec![-1.0, -1.0, -1.0, -1.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn qubo_value_of_identity() {
        let value = calculate_qubo_value(&Matrix::identity(3), 1.8, &[0.0, 1.0, 0.0]).unwrap();
        assert_eq!(value, 2.8);
    }

    #[test]
    fn qubo_value_rejects_wrong_length() {
        let err = calculate_qubo_value(&Matrix::identity(3), 0.0, &[1.0]).unwrap_err();
        assert_eq!(
            err,
            MatrixError::DimensionMismatch {
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn symmetric_check_uses_tolerance() {
        assert!(check_symmetric(&ring(), 1e-8));
        let mut skewed = ring();
        skewed[(0, 1)] += 1e-6;
        assert!(!check_symmetric(&skewed, 1e-8));
        assert!(check_symmetric(&skewed, 1e-5));
    }

    #[test]
    fn hamiltonian_per_configuration() {
        let all_up = vec![1.0; 5];
        let mixed = vec![1.0, -1.0, 1.0, -1.0, 1.0];
        let energies = hamiltonian(&ring(), &[all_up, mixed]).unwrap();
        // all up: -(sum of entries) = 16
        assert_eq!(energies[0], 16.0);
        assert_eq!(energies[1], -4.0);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(err.code(), "MATRIX_RAGGED");
        assert_eq!(Matrix::from_rows(vec![]).unwrap_err(), MatrixError::Empty);
    }

    #[test]
    fn serde_uses_nested_arrays() {
        let matrix = Matrix::from_rows(vec![vec![1.0, 2.0], vec![0.0, 1.0]]).unwrap();
        let json = serde_json::to_string(&matrix).unwrap();
        assert_eq!(json, "[[1.0,2.0],[0.0,1.0]]");
        let back: Matrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, matrix);
        assert!(serde_json::from_str::<Matrix>("[[1.0],[2.0,3.0]]").is_err());
    }

    #[test]
    fn empty_matrix_has_zero_form() {
        assert_eq!(calculate_qubo_value(&Matrix::square(0), 3.0, &[]).unwrap(), 3.0);
    }

    #[test]
    fn upper_triangular_detection() {
        let upper = Matrix::from_rows(vec![vec![1.0, 2.0], vec![0.0, 1.0]]).unwrap();
        assert!(upper.is_upper_triangular());
        assert!(!upper.transpose().is_upper_triangular());
    }
}
