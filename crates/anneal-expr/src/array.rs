//! Row-major N-dimensional container of expressions.
//!
//! Reductions go through [`quicksum`] so large sums stay single-pass.

use crate::expr::{ConstraintDefinition, ExprError, Expression, Relation, quicksum};

#[derive(Debug, Clone, PartialEq)]
pub struct ExprArray {
    shape: Vec<usize>,
    data: Vec<Expression>,
}

fn validate_shape(shape: &[usize]) -> Result<usize, ExprError> {
    if shape.is_empty() {
        return Err(ExprError::InvalidShape {
            reason: "shape must have at least one axis".to_string(),
        });
    }
    if shape.contains(&0) {
        return Err(ExprError::InvalidShape {
            reason: "shape cannot contain 0".to_string(),
        });
    }
    Ok(shape.iter().product())
}

fn unravel(mut flat: usize, shape: &[usize]) -> Vec<usize> {
    let mut index = vec![0; shape.len()];
    for (axis, extent) in shape.iter().enumerate().rev() {
        index[axis] = flat % extent;
        flat /= extent;
    }
    index
}

fn inner_product<'a>(
    left: impl Iterator<Item = &'a Expression>,
    right: impl Iterator<Item = &'a Expression>,
) -> Result<Expression, ExprError> {
    let products = left
        .zip(right)
        .map(|(l, r)| l.mul(r))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(quicksum(&products))
}

impl ExprArray {
    pub fn from_vec(shape: Vec<usize>, data: Vec<Expression>) -> Result<Self, ExprError> {
        let len = validate_shape(&shape)?;
        if len != data.len() {
            return Err(ExprError::ShapeMismatch {
                left: shape,
                right: vec![data.len()],
            });
        }
        Ok(Self { shape, data })
    }

    /// Build every element from its multi-index.
    pub fn from_fn<F>(shape: &[usize], mut build: F) -> Result<Self, ExprError>
    where
        F: FnMut(&[usize]) -> Result<Expression, ExprError>,
    {
        let len = validate_shape(shape)?;
        let data = (0..len)
            .map(|flat| build(&unravel(flat, shape)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            shape: shape.to_vec(),
            data,
        })
    }

    /// One fresh variable per cell, named `name[i][j]…` with each index
    /// zero-padded to the width of that axis's largest index.
    pub fn variables<F>(shape: &[usize], name: &str, ctor: F) -> Result<Self, ExprError>
    where
        F: Fn(String) -> Expression,
    {
        Self::try_variables(shape, name, |cell| Ok(ctor(cell)))
    }

    /// Like [`ExprArray::variables`] for fallible constructors such as `integer`.
    pub fn try_variables<F>(shape: &[usize], name: &str, ctor: F) -> Result<Self, ExprError>
    where
        F: Fn(String) -> Result<Expression, ExprError>,
    {
        let widths: Vec<usize> = shape
            .iter()
            .map(|extent| extent.saturating_sub(1).to_string().len())
            .collect();
        Self::from_fn(shape, |index| {
            let mut cell = name.to_string();
            for (position, width) in index.iter().zip(&widths) {
                cell.push_str(&format!("[{position:0width$}]"));
            }
            ctor(cell)
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: &[usize]) -> Option<&Expression> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0;
        for (position, extent) in index.iter().zip(&self.shape) {
            if position >= extent {
                return None;
            }
            flat = flat * extent + position;
        }
        self.data.get(flat)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expression> {
        self.data.iter()
    }

    pub fn into_vec(self) -> Vec<Expression> {
        self.data
    }

    pub fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(&Expression) -> Expression,
    {
        Self {
            shape: self.shape.clone(),
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Sum of every element.
    pub fn sum(&self) -> Expression {
        quicksum(&self.data)
    }

    /// Sum along one axis, dropping it from the shape.
    pub fn sum_axis(&self, axis: usize) -> Result<Self, ExprError> {
        if axis >= self.ndim() {
            return Err(ExprError::InvalidShape {
                reason: format!("axis {axis} out of range for {} dimensions", self.ndim()),
            });
        }
        if self.ndim() == 1 {
            return Err(ExprError::InvalidShape {
                reason: "summing the only axis leaves no array; use sum()".to_string(),
            });
        }
        let mut reduced = self.shape.clone();
        let extent = reduced.remove(axis);
        Self::from_fn(&reduced, |index| {
            let mut full = index.to_vec();
            full.insert(axis, 0);
            let mut slice = Vec::with_capacity(extent);
            for position in 0..extent {
                full[axis] = position;
                if let Some(expr) = self.get(&full) {
                    slice.push(expr);
                }
            }
            Ok(quicksum(slice))
        })
    }

    /// Inner product of two one-dimensional arrays.
    pub fn inner(&self, other: &ExprArray) -> Result<Expression, ExprError> {
        if self.ndim() != 1 || other.shape != self.shape {
            return Err(ExprError::ShapeMismatch {
                left: self.shape.clone(),
                right: other.shape.clone(),
            });
        }
        inner_product(self.data.iter(), other.data.iter())
    }

    /// Weighted sum of a one-dimensional array.
    pub fn weighted_sum(&self, weights: &[f64]) -> Result<Expression, ExprError> {
        if self.ndim() != 1 || weights.len() != self.len() {
            return Err(ExprError::ShapeMismatch {
                left: self.shape.clone(),
                right: vec![weights.len()],
            });
        }
        let scaled: Vec<Expression> = self
            .data
            .iter()
            .zip(weights)
            .map(|(expr, weight)| expr.scale(*weight))
            .collect();
        Ok(quicksum(&scaled))
    }

    /// Matrix product for 2-D × 2-D, 2-D × 1-D and 1-D × 2-D operands.
    pub fn dot(&self, other: &ExprArray) -> Result<Self, ExprError> {
        let mismatch = || ExprError::ShapeMismatch {
            left: self.shape.clone(),
            right: other.shape.clone(),
        };
        match (self.shape.as_slice(), other.shape.as_slice()) {
            (&[rows, k], &[k2, cols]) if k == k2 => Self::from_fn(&[rows, cols], |index| {
                let (i, j) = (index[0], index[1]);
                let row = (0..k).filter_map(|t| self.get(&[i, t]));
                let col = (0..k).filter_map(|t| other.get(&[t, j]));
                inner_product(row, col)
            }),
            (&[rows, k], &[k2]) if k == k2 => Self::from_fn(&[rows], |index| {
                let row = (0..k).filter_map(|t| self.get(&[index[0], t]));
                inner_product(row, other.data.iter())
            }),
            (&[k], &[k2, cols]) if k == k2 => Self::from_fn(&[cols], |index| {
                let col = (0..k).filter_map(|t| other.get(&[t, index[0]]));
                inner_product(self.data.iter(), col)
            }),
            _ => Err(mismatch()),
        }
    }

    /// Main diagonal of a square 2-D array.
    pub fn diagonal(&self) -> Result<Self, ExprError> {
        match self.shape.as_slice() {
            &[n, m] if n == m => Self::from_fn(&[n], |index| {
                self.get(&[index[0], index[0]])
                    .cloned()
                    .ok_or_else(|| ExprError::InvalidShape {
                        reason: "diagonal index out of range".to_string(),
                    })
            }),
            _ => Err(ExprError::InvalidShape {
                reason: format!("diagonal needs a square 2-D array, got {:?}", self.shape),
            }),
        }
    }

    /// Elementwise `element <relation> value` constraints in row-major order.
    pub fn compare_scalar(&self, relation: Relation, value: f64) -> Vec<ConstraintDefinition> {
        self.data
            .iter()
            .map(|expr| expr.compare_scalar(relation, value))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ExprArray {
    type Item = &'a Expression;
    type IntoIter = std::slice::Iter<'a, Expression>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
