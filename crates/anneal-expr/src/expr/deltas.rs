//! Per-variable bounds on how much an expression can move.

use crate::expr::core::Expression;
use crate::expr::error::ExprError;
use crate::expr::var::{Monomial, VarName};
use std::collections::BTreeMap;

/// Largest possible decrease (`negative`) and increase (`positive`) of an
/// expression when a single variable flips.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaxDeltas {
    pub negative: BTreeMap<VarName, f64>,
    pub positive: BTreeMap<VarName, f64>,
}

impl MaxDeltas {
    pub fn is_empty(&self) -> bool {
        self.negative.is_empty() && self.positive.is_empty()
    }
}

impl Expression {
    /// Quadratic coefficients contribute `max(c, 0)` to the positive and
    /// `max(-c, 0)` to the negative side of both variables. Linear
    /// coefficients contribute `c` and `-c` unclamped, so a side may end up
    /// negative.
    pub fn get_max_deltas(&self) -> Result<MaxDeltas, ExprError> {
        let mut deltas = MaxDeltas::default();
        for (monomial, coeff) in self.numeric_terms()? {
            match monomial {
                Monomial::Quadratic(a, b) => {
                    for var in [a, b] {
                        *deltas.positive.entry(var.clone()).or_insert(0.0) += coeff.max(0.0);
                        *deltas.negative.entry(var).or_insert(0.0) += (-coeff).max(0.0);
                    }
                }
                Monomial::Linear(var) => {
                    *deltas.positive.entry(var.clone()).or_insert(0.0) += coeff;
                    *deltas.negative.entry(var).or_insert(0.0) -= coeff;
                }
            }
        }
        Ok(deltas)
    }

    /// Mean absolute coefficient over all terms; 0 for a constant.
    pub fn average_coefficient(&self) -> Result<f64, ExprError> {
        let terms = self.numeric_terms()?;
        if terms.is_empty() {
            return Ok(0.0);
        }
        let total: f64 = terms.iter().map(|(_, coeff)| coeff.abs()).sum();
        Ok(total / terms.len() as f64)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::expr::{VarName, binary, placeholder};

    #[test]
    fn max_deltas_split_by_sign() {
        let (x, y) = (binary("x"), binary("y"));
        let e = x.clone() * 2.0 - y.clone() * 3.0 + x.mul(&y).unwrap() * 4.0;
        let deltas = e.get_max_deltas().unwrap();

        let bx = VarName::binary("x");
        let by = VarName::binary("y");
        assert_eq!(deltas.positive[&bx], 6.0);
        assert_eq!(deltas.negative[&bx], -2.0);
        assert_eq!(deltas.positive[&by], 1.0);
        assert_eq!(deltas.negative[&by], 3.0);
    }

    #[test]
    fn negative_quadratic_goes_to_negative_side() {
        let e = binary("x").mul(&binary("y")).unwrap() * -5.0;
        let deltas = e.get_max_deltas().unwrap();
        assert_eq!(deltas.positive[&VarName::binary("x")], 0.0);
        assert_eq!(deltas.negative[&VarName::binary("y")], 5.0);
    }

    #[test]
    fn constant_has_no_deltas() {
        let e = binary("x") * 0.0 + 4.0;
        assert!(e.get_max_deltas().unwrap().is_empty());
        assert_eq!(e.average_coefficient().unwrap(), 0.0);
    }

    #[test]
    fn average_uses_absolute_values() {
        let e = binary("x") * 2.0 - binary("y") * 4.0 + 100.0;
        assert_eq!(e.average_coefficient().unwrap(), 3.0);
    }

    #[test]
    fn deltas_require_numeric_coefficients() {
        let e = binary("x").mul(&placeholder("p")).unwrap();
        assert!(e.get_max_deltas().is_err());
    }
}
