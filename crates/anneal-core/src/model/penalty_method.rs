//! Penalty-method compilation of constraint definitions.
//!
//! An equality `left == expected` becomes `(left - expected)²`. An inequality
//! is first normalized to `residual <= 0`, then an integer slack variable
//! absorbs the permitted range so the same squared form applies.

use crate::model::error::ModelError;
use crate::penalty::min_coefficient_gap;
use anneal_expr::{ConstraintDefinition, EQ_TOLERANCE, Expression, Relation, get_val, integer};
use std::collections::BTreeMap;

/// A constraint compiled into an expression that vanishes exactly on
/// feasible assignments, weighted by a mutable penalty.
#[derive(Debug, Clone, PartialEq)]
pub struct PenaltyMethodConstraint {
    name: String,
    expr: Expression,
    penalty: f64,
    previous_penalty: f64,
}

impl PenaltyMethodConstraint {
    /// Compile a definition. The definition's default penalty, if any,
    /// becomes the initial penalty; otherwise it starts at 1.
    pub fn from_definition(
        name: &str,
        definition: &ConstraintDefinition,
    ) -> Result<Self, ModelError> {
        if definition.left().is_constant() {
            return Err(ModelError::EmptyConstraint {
                name: name.to_string(),
            });
        }
        let relation = definition.relation();
        let shifted = definition.left().add_scalar(-definition.expected());
        let expr = match relation {
            Relation::Eq => shifted.pow(2)?,
            Relation::Ne => {
                return Err(ModelError::UnsupportedRelation {
                    name: name.to_string(),
                    relation: relation.as_str().to_string(),
                });
            }
            Relation::Lt | Relation::Le | Relation::Gt | Relation::Ge => {
                let residual = match relation {
                    Relation::Gt | Relation::Ge => shifted.neg(),
                    _ => shifted,
                };
                let slack = slack_variable(name, &residual, relation)?;
                residual.add(&slack).pow(2)?
            }
        };
        let penalty = definition.default_penalty().unwrap_or(1.0);
        validate_penalty(penalty)?;
        tracing::debug!(
            component = "constraint",
            operation = "compile",
            status = "success",
            constraint = name,
            relation = relation.as_str(),
            terms = expr.terms().len(),
            "Compiled constraint with penalty method"
        );
        Ok(Self {
            name: name.to_string(),
            expr,
            penalty,
            previous_penalty: 1.0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unweighted compiled expression.
    pub fn expr(&self) -> &Expression {
        &self.expr
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    pub fn previous_penalty(&self) -> f64 {
        self.previous_penalty
    }

    /// `penalty · expr`.
    pub fn weighted_expr(&self) -> Expression {
        self.expr.scale(self.penalty)
    }

    pub fn set_penalty(&mut self, penalty: f64) -> Result<(), ModelError> {
        validate_penalty(penalty)?;
        self.previous_penalty = self.penalty;
        self.penalty = penalty;
        tracing::debug!(
            component = "constraint",
            operation = "set_penalty",
            status = "success",
            constraint = self.name.as_str(),
            penalty,
            previous_penalty = self.previous_penalty,
            "Updated constraint penalty"
        );
        Ok(())
    }

    /// Double the penalty.
    pub fn penalize_more(&mut self) -> Result<(), ModelError> {
        self.set_penalty(self.penalty * 2.0)
    }

    /// Move the penalty halfway back towards the previous one.
    pub fn penalize_less(&mut self) -> Result<(), ModelError> {
        self.set_penalty((self.previous_penalty + self.penalty) / 2.0)
    }

    /// Value of the unweighted compiled expression.
    pub fn evaluate(&self, solution: &BTreeMap<String, f64>) -> Result<f64, ModelError> {
        Ok(get_val(&self.expr, solution)?)
    }

    pub fn is_satisfied(&self, solution: &BTreeMap<String, f64>) -> Result<bool, ModelError> {
        Ok(self.evaluate(solution)?.abs() < EQ_TOLERANCE)
    }
}

impl std::fmt::Display for PenaltyMethodConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "penalty={}, constraint_expr={}", self.penalty, self.expr)
    }
}

fn validate_penalty(penalty: f64) -> Result<(), ModelError> {
    if penalty.is_finite() && penalty >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidPenalty { penalty })
    }
}

/// Integer slack `s` with `residual + s == 0` reachable for every feasible
/// residual. Strict relations start the slack at 1.
fn slack_variable(
    name: &str,
    residual: &Expression,
    relation: Relation,
) -> Result<Expression, ModelError> {
    let slack_min: i64 = if relation.is_strict() { 1 } else { 0 };
    let negative_sum: f64 = residual
        .numeric_terms()?
        .iter()
        .filter(|(_, coeff)| *coeff < 0.0)
        .map(|(_, coeff)| -coeff)
        .sum();
    let slack_range = (negative_sum - residual.constant_offset()?).max(0.0);
    if slack_range == 0.0 {
        return Err(ModelError::ZeroSlackRange {
            name: name.to_string(),
        });
    }
    let step = min_coefficient_gap(residual)?;
    let steps = (slack_range / step).round_ties_even() as i64;
    if steps == 0 {
        return Err(ModelError::ZeroSlackRange {
            name: name.to_string(),
        });
    }
    let slack = integer(&format!("_slack_{name}"), slack_min, steps + slack_min)?;
    Ok(slack.scale(slack_range / steps as f64))
}
