//! Evaluating expressions under a variable assignment.
//!
//! Solutions map untagged variable names to their underlying {0, 1} value.
//! Spin variables are stored as `2x - 1`, so a spin assignment of `-1` maps to
//! `0` here and `+1` maps to `1`. Variables missing from the solution count as
//! zero.

use crate::array::ExprArray;
use crate::expr::{ExprError, Expression, VarKind, VarName};
use std::collections::BTreeMap;

/// `Σ coeff · Π solution[var] + offset`.
pub fn get_val(expr: &Expression, solution: &BTreeMap<String, f64>) -> Result<f64, ExprError> {
    let mut lookup = |var: &VarName| match var.kind() {
        VarKind::Placeholder => Err(ExprError::UnresolvedPlaceholder {
            names: vec![var.name().to_string()],
        }),
        VarKind::Binary | VarKind::Spin => Ok(solution.get(var.name()).copied().unwrap_or(0.0)),
    };
    expr.evaluate_with(&mut lookup)
}

/// Row-major values of every element of an array.
pub fn get_array_val(
    array: &ExprArray,
    solution: &BTreeMap<String, f64>,
) -> Result<Vec<f64>, ExprError> {
    array.iter().map(|expr| get_val(expr, solution)).collect()
}
