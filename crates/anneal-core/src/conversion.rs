//! Conversion between QUBO and Ising forms.
//!
//! Matrix conversions run in exact decimal arithmetic so that integer
//! matrices round-trip without drift. The spin convention throughout is
//! `s = 2x - 1`, with an auxiliary spin fixed to +1 carrying linear fields
//! in the last row and column of an Ising matrix.

use anneal_expr::Monomial;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::collections::BTreeMap;

use crate::ising::IsingModel;
use crate::matrix::{Matrix, MatrixError};
use crate::model::{AUX_SPIN, ModelError, QuboModel};

/// Square matrix of exact decimals.
struct DecimalGrid {
    n: usize,
    data: Vec<Decimal>,
}

impl DecimalGrid {
    fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![Decimal::ZERO; n * n],
        }
    }

    fn from_matrix(matrix: &Matrix) -> Result<Self, MatrixError> {
        let n = matrix.ensure_square()?;
        let mut data = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                let value = matrix[(row, col)];
                if !value.is_finite() {
                    return Err(MatrixError::NonFiniteEntry { row, col });
                }
                data.push(Decimal::from_f64(value).ok_or(MatrixError::OutOfRange { row, col })?);
            }
        }
        Ok(Self { n, data })
    }

    fn get(&self, row: usize, col: usize) -> Decimal {
        self.data[row * self.n + col]
    }

    fn set(&mut self, row: usize, col: usize, value: Decimal) {
        self.data[row * self.n + col] = value;
    }

    /// `(M + Mᵀ) · factor`.
    fn symmetrized(&self, factor: Decimal) -> Result<Self, MatrixError> {
        let mut out = Self::zeros(self.n);
        for row in 0..self.n {
            for col in 0..self.n {
                let sum = checked(self.get(row, col).checked_add(self.get(col, row)), row, col)?;
                out.set(row, col, checked(sum.checked_mul(factor), row, col)?);
            }
        }
        Ok(out)
    }

    /// Leading `size × size` block.
    fn leading(&self, size: usize) -> Self {
        let mut out = Self::zeros(size);
        for row in 0..size {
            for col in 0..size {
                out.set(row, col, self.get(row, col));
            }
        }
        out
    }

    fn column_sums(&self) -> Result<Vec<Decimal>, MatrixError> {
        (0..self.n)
            .map(|col| {
                (0..self.n).try_fold(Decimal::ZERO, |acc, row| {
                    checked(acc.checked_add(self.get(row, col)), row, col)
                })
            })
            .collect()
    }

    fn total(&self) -> Result<Decimal, MatrixError> {
        let mut total = Decimal::ZERO;
        for row in 0..self.n {
            for col in 0..self.n {
                total = checked(total.checked_add(self.get(row, col)), row, col)?;
            }
        }
        Ok(total)
    }

    fn into_matrix(self, negate: bool) -> Result<Matrix, MatrixError> {
        let mut out = Matrix::square(self.n);
        for row in 0..self.n {
            for col in 0..self.n {
                let value = self.get(row, col);
                let value = if negate { -value } else { value };
                out[(row, col)] = to_f64(value, row, col)?;
            }
        }
        Ok(out)
    }
}

fn checked(value: Option<Decimal>, row: usize, col: usize) -> Result<Decimal, MatrixError> {
    value.ok_or(MatrixError::OutOfRange { row, col })
}

fn to_f64(value: Decimal, row: usize, col: usize) -> Result<f64, MatrixError> {
    value.to_f64().ok_or(MatrixError::OutOfRange { row, col })
}

fn sum(values: &[Decimal]) -> Result<Decimal, MatrixError> {
    values.iter().enumerate().try_fold(Decimal::ZERO, |acc, (idx, value)| {
        checked(acc.checked_add(*value), idx, idx)
    })
}

/// Convert an Ising matrix to an upper-triangular QUBO matrix and offset.
///
/// With `remove_linear_bit`, the last row and column are read as linear
/// fields against an auxiliary spin fixed to +1 and folded into the QUBO
/// diagonal, so the result has one variable fewer. The result satisfies
/// `xᵀ Q x + offset = -sᵀ J s` for `s = 2x - 1` (auxiliary spin +1).
pub fn ising_matrix_to_qubo_matrix(
    ising: &Matrix,
    remove_linear_bit: bool,
) -> Result<(Matrix, f64), MatrixError> {
    let grid = DecimalGrid::from_matrix(ising)?;
    let two = Decimal::TWO;
    let four = Decimal::from(4);
    let symmetric = grid.symmetrized(Decimal::new(5, 1))?;

    let (symmetric, linear) = if remove_linear_bit {
        let last = symmetric.n - 1;
        let linear = (0..last)
            .map(|col| checked(symmetric.get(last, col).checked_mul(two), last, col))
            .collect::<Result<Vec<_>, _>>()?;
        (symmetric.leading(last), linear)
    } else {
        (symmetric, Vec::new())
    };

    let n = symmetric.n;
    let mut diagonal = symmetric
        .column_sums()?
        .into_iter()
        .enumerate()
        .map(|(col, total)| checked(total.checked_mul(-four), col, col))
        .collect::<Result<Vec<_>, _>>()?;
    let mut bias = symmetric.total()?;
    if remove_linear_bit {
        bias = checked(bias.checked_sub(sum(&linear)?), n, n)?;
        for (col, field) in linear.iter().enumerate() {
            let doubled = checked(field.checked_mul(two), col, col)?;
            diagonal[col] = checked(diagonal[col].checked_add(doubled), col, col)?;
        }
    }

    let eight = Decimal::from(8);
    let mut qubo = DecimalGrid::zeros(n);
    for row in 0..n {
        qubo.set(row, row, diagonal[row]);
        for col in row + 1..n {
            let coupling = checked(symmetric.get(row, col).checked_mul(eight), row, col)?;
            qubo.set(row, col, coupling);
        }
    }
    let offset = to_f64(-bias, n, n)?;

    tracing::debug!(
        component = "conversion",
        operation = "ising_to_qubo",
        status = "success",
        size = ising.rows(),
        remove_linear_bit,
        offset,
        "Converted Ising matrix to QUBO matrix"
    );
    Ok((qubo.into_matrix(true)?, offset))
}

/// Convert a QUBO matrix to an Ising matrix with one extra row and column
/// for the auxiliary spin, and the offset that makes
/// `-sᵀ J s + offset = xᵀ Q x` for `s = 2x - 1`.
pub fn qubo_matrix_to_ising_matrix(qubo: &Matrix) -> Result<(Matrix, f64), MatrixError> {
    let grid = DecimalGrid::from_matrix(qubo)?;
    let n = grid.n;
    let mut symmetric = grid.symmetrized(Decimal::new(125, 3))?;
    let diagonal: Vec<Decimal> = (0..n).map(|idx| symmetric.get(idx, idx)).collect();
    for idx in 0..n {
        symmetric.set(idx, idx, Decimal::ZERO);
    }

    let mut ising = DecimalGrid::zeros(n + 1);
    for row in 0..n {
        for col in 0..n {
            ising.set(row, col, symmetric.get(row, col));
        }
    }
    for (col, total) in symmetric.column_sums()?.into_iter().enumerate() {
        let field = checked(total.checked_add(diagonal[col]), col, n)?;
        ising.set(n, col, field);
        ising.set(col, n, field);
    }

    let diagonal_twice = checked(sum(&diagonal)?.checked_mul(Decimal::TWO), n, n)?;
    let bias = checked(symmetric.total()?.checked_add(diagonal_twice), n, n)?;
    let offset = to_f64(bias, n, n)?;

    tracing::debug!(
        component = "conversion",
        operation = "qubo_to_ising",
        status = "success",
        size = n,
        offset,
        "Converted QUBO matrix to Ising matrix"
    );
    Ok((ising.into_matrix(true)?, offset))
}

/// Build the Ising form of a QUBO model.
///
/// Variables keep the sorted order of the QUBO matrix and the auxiliary
/// spin is appended last.
pub fn qubo_model_to_ising_model(qubo: &mut QuboModel) -> Result<IsingModel, ModelError> {
    let index = qubo.get_variable_index()?.clone();
    let expr = qubo.make()?;
    let terms = expr.numeric_terms()?;
    let offset = expr.constant_offset()?;

    let aux = index.len();
    let size = aux + 1;
    let mut couplings = Matrix::square(size);
    let mut bias = 0.0;
    for (monomial, coeff) in terms {
        match &monomial {
            Monomial::Quadratic(a, b) => {
                let quarter = coeff / 4.0;
                let (i, j) = (index[a], index[b]);
                couplings[(i, j)] += quarter;
                couplings[(i, aux)] += quarter;
                couplings[(j, aux)] += quarter;
                bias += quarter;
            }
            Monomial::Linear(a) => {
                let half = coeff / 2.0;
                couplings[(index[a], aux)] += half;
                bias += half;
            }
        }
    }
    bias += offset;

    let mut matrix = Matrix::square(size);
    for row in 0..size {
        for col in 0..size {
            matrix[(row, col)] = -0.5 * (couplings[(row, col)] + couplings[(col, row)]);
        }
    }

    let mut variables: BTreeMap<String, usize> = index
        .iter()
        .map(|(var, idx)| (var.name().to_string(), *idx))
        .collect();
    variables.insert(AUX_SPIN.to_string(), aux);

    tracing::debug!(
        component = "conversion",
        operation = "model_to_ising",
        status = "success",
        variables = size,
        bias,
        "Converted QUBO model to Ising model"
    );
    Ok(IsingModel::new(variables, matrix, bias))
}
