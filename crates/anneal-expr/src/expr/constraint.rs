//! Constraint definitions: expression, relation and expected value.

use crate::eval::get_val;
use crate::expr::core::Expression;
use crate::expr::error::ExprError;
use std::collections::BTreeMap;

/// Absolute tolerance used when testing equality of a constraint.
pub const EQ_TOLERANCE: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Relation {
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Eq => "==",
            Relation::Ne => "!=",
            Relation::Gt => ">",
            Relation::Ge => ">=",
            Relation::Lt => "<",
            Relation::Le => "<=",
        }
    }

    /// Strict relations need the slack variable to start at one.
    pub fn is_strict(self) -> bool {
        matches!(self, Relation::Gt | Relation::Lt)
    }

    pub fn holds(self, left: f64, right: f64) -> bool {
        match self {
            Relation::Eq => (left - right).abs() < EQ_TOLERANCE,
            Relation::Ne => (left - right).abs() >= EQ_TOLERANCE,
            Relation::Gt => left > right,
            Relation::Ge => left >= right,
            Relation::Lt => left < right,
            Relation::Le => left <= right,
        }
    }
}

impl std::str::FromStr for Relation {
    type Err = ExprError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "==" => Ok(Relation::Eq),
            "!=" => Ok(Relation::Ne),
            ">" => Ok(Relation::Gt),
            ">=" => Ok(Relation::Ge),
            "<" => Ok(Relation::Lt),
            "<=" => Ok(Relation::Le),
            other => Err(ExprError::UnknownRelation {
                relation: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintDefinition {
    left: Expression,
    relation: Relation,
    expected: f64,
    default_penalty: Option<f64>,
}

impl ConstraintDefinition {
    pub fn new(left: Expression, relation: Relation, expected: f64) -> Self {
        Self {
            left,
            relation,
            expected,
            default_penalty: None,
        }
    }

    pub fn with_default_penalty(mut self, penalty: f64) -> Self {
        self.default_penalty = Some(penalty);
        self
    }

    pub fn left(&self) -> &Expression {
        &self.left
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn expected(&self) -> f64 {
        self.expected
    }

    pub fn default_penalty(&self) -> Option<f64> {
        self.default_penalty
    }

    pub fn into_parts(self) -> (Expression, Relation, f64) {
        (self.left, self.relation, self.expected)
    }

    /// Value of the left-hand side under a solution.
    pub fn left_value(&self, solution: &BTreeMap<String, f64>) -> Result<f64, ExprError> {
        get_val(&self.left, solution)
    }

    pub fn is_satisfied(&self, solution: &BTreeMap<String, f64>) -> Result<bool, ExprError> {
        Ok(self
            .relation
            .holds(self.left_value(solution)?, self.expected))
    }
}

impl std::fmt::Display for ConstraintDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.left, self.relation, self.expected)
    }
}

/// Explicit constraint construction: `expr <relation> value`.
pub fn make_constraint(expr: &Expression, relation: Relation, value: f64) -> ConstraintDefinition {
    expr.compare_scalar(relation, value)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::expr::binary;

    fn solution(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn relation_round_trips_through_strings() {
        for relation in [
            Relation::Eq,
            Relation::Ne,
            Relation::Gt,
            Relation::Ge,
            Relation::Lt,
            Relation::Le,
        ] {
            assert_eq!(relation.as_str().parse::<Relation>().unwrap(), relation);
        }
        assert_eq!(
            "=<".parse::<Relation>().unwrap_err().code(),
            "CONSTRAINT_UNKNOWN_RELATION"
        );
    }

    #[test]
    fn equality_uses_tolerance() {
        assert!(Relation::Eq.holds(1.0 + 1e-6, 1.0));
        assert!(!Relation::Eq.holds(1.0 + 1e-4, 1.0));
        assert!(Relation::Ne.holds(1.0 + 1e-4, 1.0));
    }

    #[test]
    fn make_constraint_keeps_expected_value() {
        let expr = binary("x") + binary("y");
        let c = make_constraint(&expr, Relation::Le, 1.0).with_default_penalty(4.0);
        assert_eq!(c.expected(), 1.0);
        assert_eq!(c.default_penalty(), Some(4.0));

        assert!(c.is_satisfied(&solution(&[("x", 1.0)])).unwrap());
        assert!(!c.is_satisfied(&solution(&[("x", 1.0), ("y", 1.0)])).unwrap());
        assert_eq!(
            c.left_value(&solution(&[("x", 1.0), ("y", 1.0)])).unwrap(),
            2.0
        );
    }

    #[test]
    fn display_renders_relation() {
        let c = make_constraint(&binary("x"), Relation::Ge, 1.0);
        assert_eq!(c.to_string(), "x >= 1");
    }
}
