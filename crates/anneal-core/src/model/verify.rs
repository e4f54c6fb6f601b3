//! Evaluating solutions against the objective and constraints.

use anneal_expr::get_val;
use std::collections::BTreeMap;

use crate::model::error::ModelError;
use crate::model::{BinaryModel, ConstraintKind};

impl BinaryModel {
    /// Objective value under `solution`; 0 without an objective.
    pub fn get_value(&self, solution: &BTreeMap<String, f64>) -> Result<f64, ModelError> {
        match &self.objective {
            Some(objective) => Ok(get_val(objective, solution)?),
            None => Ok(0.0),
        }
    }

    /// Count the constraints of `kind` that `solution` violates and report
    /// the left-hand value of each.
    pub fn verify_constraint(
        &self,
        solution: &BTreeMap<String, f64>,
        kind: ConstraintKind,
    ) -> Result<(usize, BTreeMap<String, f64>), ModelError> {
        let mut unsatisfied = 0usize;
        let mut values = BTreeMap::new();
        for (name, definition) in self.constraints(kind) {
            if !definition.is_satisfied(solution)? {
                unsatisfied += 1;
            }
            values.insert(name.clone(), definition.left_value(solution)?);
        }
        tracing::debug!(
            component = "model",
            operation = "verify_constraint",
            status = "success",
            kind = kind.as_str(),
            unsatisfied,
            objective = self.get_value(solution)?,
            "Verified constraints"
        );
        Ok((unsatisfied, values))
    }
}
