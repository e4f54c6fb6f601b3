//! Term coefficients: either a number or an expression over placeholders.

use crate::expr::core::Expression;
use crate::expr::error::ExprError;
use crate::expr::var::VarName;

#[derive(Debug, Clone, PartialEq)]
pub enum Coefficient {
    Constant(f64),
    /// Sub-expression whose monomials range over placeholder variables.
    Symbolic(Box<Expression>),
}

impl Default for Coefficient {
    fn default() -> Self {
        Coefficient::Constant(0.0)
    }
}

impl From<f64> for Coefficient {
    fn from(value: f64) -> Self {
        Coefficient::Constant(value)
    }
}

impl Coefficient {
    /// Wrap an expression, collapsing it to its offset when it has no terms.
    pub fn symbolic(expr: Expression) -> Self {
        if expr.terms().is_empty() {
            expr.offset().clone()
        } else {
            Coefficient::Symbolic(Box::new(expr))
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Coefficient::Constant(value) => *value == 0.0,
            Coefficient::Symbolic(expr) => expr.is_zero(),
        }
    }

    pub fn as_constant(&self) -> Option<f64> {
        match self {
            Coefficient::Constant(value) => Some(*value),
            Coefficient::Symbolic(_) => None,
        }
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, Coefficient::Symbolic(_))
    }

    pub fn add(&self, other: &Coefficient) -> Coefficient {
        match (self, other) {
            (Coefficient::Constant(a), Coefficient::Constant(b)) => Coefficient::Constant(a + b),
            (Coefficient::Constant(c), Coefficient::Symbolic(e))
            | (Coefficient::Symbolic(e), Coefficient::Constant(c)) => {
                Coefficient::symbolic(e.add_scalar(*c))
            }
            (Coefficient::Symbolic(a), Coefficient::Symbolic(b)) => Coefficient::symbolic(a.add(b)),
        }
    }

    pub fn scale(&self, by: f64) -> Coefficient {
        match self {
            Coefficient::Constant(value) => Coefficient::Constant(value * by),
            Coefficient::Symbolic(expr) => Coefficient::symbolic(expr.scale(by)),
        }
    }

    pub fn neg(&self) -> Coefficient {
        self.scale(-1.0)
    }

    pub fn mul(&self, other: &Coefficient) -> Result<Coefficient, ExprError> {
        match (self, other) {
            (Coefficient::Constant(a), Coefficient::Constant(b)) => {
                Ok(Coefficient::Constant(a * b))
            }
            (Coefficient::Constant(c), Coefficient::Symbolic(e))
            | (Coefficient::Symbolic(e), Coefficient::Constant(c)) => {
                Ok(Coefficient::symbolic(e.scale(*c)))
            }
            (Coefficient::Symbolic(a), Coefficient::Symbolic(b)) => {
                Ok(Coefficient::symbolic(a.mul(b)?))
            }
        }
    }

    /// Numeric value, or an error naming the unresolved placeholders.
    pub fn constant_value(&self) -> Result<f64, ExprError> {
        match self {
            Coefficient::Constant(value) => Ok(*value),
            Coefficient::Symbolic(expr) => Err(ExprError::UnresolvedPlaceholder {
                names: expr
                    .variables()
                    .into_iter()
                    .map(|name| name.to_string())
                    .collect(),
            }),
        }
    }

    pub(crate) fn evaluate_with<F>(&self, lookup: &mut F) -> Result<f64, ExprError>
    where
        F: FnMut(&VarName) -> Result<f64, ExprError>,
    {
        match self {
            Coefficient::Constant(value) => Ok(*value),
            Coefficient::Symbolic(expr) => expr.evaluate_with(lookup),
        }
    }
}

impl std::fmt::Display for Coefficient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Coefficient::Constant(value) => write!(f, "{value}"),
            Coefficient::Symbolic(expr) => write!(f, "{expr}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::expr::builders::placeholder;

    #[test]
    fn constant_arithmetic() {
        let a = Coefficient::Constant(2.0);
        let b = Coefficient::Constant(3.0);
        assert_eq!(a.add(&b), Coefficient::Constant(5.0));
        assert_eq!(a.mul(&b).unwrap(), Coefficient::Constant(6.0));
        assert_eq!(a.neg(), Coefficient::Constant(-2.0));
    }

    #[test]
    fn symbolic_collapses_to_constant_when_terms_cancel() {
        let p = placeholder("p");
        let coeff = p.offset().clone();
        let cancelled = coeff.add(&coeff.neg());
        assert_eq!(cancelled, Coefficient::Constant(0.0));
        assert!(cancelled.is_zero());
    }

    #[test]
    fn symbolic_constant_value_reports_placeholders() {
        let coeff = placeholder("p").offset().clone();
        let err = coeff.constant_value().unwrap_err();
        assert_eq!(
            err,
            ExprError::UnresolvedPlaceholder {
                names: vec!["p".to_string()]
            }
        );
    }
}
