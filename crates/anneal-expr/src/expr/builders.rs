//! Builder functions for decision variables and sums.

use crate::expr::coefficient::Coefficient;
use crate::expr::core::Expression;
use crate::expr::error::ExprError;
use crate::expr::var::{Monomial, VarName};

/// Binary decision variable: `x ∈ {0, 1}`.
pub fn binary(name: impl Into<String>) -> Expression {
    Expression::var(VarName::binary(name))
}

/// Spin decision variable `s ∈ {-1, 1}`, stored as `2x - 1` over a
/// binary-like variable with the spin tag.
pub fn spin(name: impl Into<String>) -> Expression {
    Expression::term(Monomial::Linear(VarName::spin(name)), 2.0).add_scalar(-1.0)
}

/// Constant placeholder whose value is supplied later through `feed`.
pub fn placeholder(name: impl Into<String>) -> Expression {
    let inner = Expression::var(VarName::placeholder(name));
    Expression::from_offset(Coefficient::symbolic(inner))
}

/// Integer variable on `[min, max]` as a weighted sum of binary bits.
///
/// With `k = floor(log2(max - min))`, bits `name[0..k]` carry weights `2^j`
/// and the top bit `name[k]` carries `max - min - 2^k + 1`, so every value in
/// the range is reachable and none outside it.
pub fn integer(name: &str, min: i64, max: i64) -> Result<Expression, ExprError> {
    if max <= min {
        return Err(ExprError::InvalidIntegerRange { min, max });
    }
    let span = max.abs_diff(min);
    let top = span.ilog2();

    let mut terms = Vec::with_capacity(top as usize + 1);
    for bit in 0..top {
        terms.push((
            Monomial::Linear(VarName::binary(format!("{name}[{bit}]"))),
            (1u64 << bit) as f64,
        ));
    }
    let top_weight = span - (1u64 << top) + 1;
    terms.push((
        Monomial::Linear(VarName::binary(format!("{name}[{top}]"))),
        top_weight as f64,
    ));

    tracing::debug!(
        component = "expr",
        operation = "integer",
        status = "success",
        variable = name,
        min,
        max,
        bits = terms.len(),
        "Decomposed integer variable"
    );

    Ok(Expression::from_terms(terms, min as f64))
}

/// Single-pass sum of many expressions.
pub fn quicksum<'a>(exprs: impl IntoIterator<Item = &'a Expression>) -> Expression {
    let mut total = Expression::new_empty();
    for expr in exprs {
        total.add_assign_ref(expr);
    }
    total
}
