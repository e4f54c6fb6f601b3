//! Constraint compilation and penalty tuning.

use anneal_expr::{Expression, MaintainedKey, MaxDeltas};

use crate::model::error::ModelError;
use crate::model::{BinaryModel, ConstraintKind, PenaltyMethodConstraint};
use crate::penalty::{get_min_penalty_from_min_diff, get_soft_penalty};

impl BinaryModel {
    /// Compile every constraint that has no compiled form yet. Already
    /// compiled constraints keep their penalties.
    pub fn compile_constraints(&mut self) -> Result<(), ModelError> {
        if self.is_compiled() {
            return Ok(());
        }
        let handler = self.handler.ok_or(ModelError::ConstraintHandlerUnset)?;
        let mut compiled = 0usize;
        for (name, definition) in &self.hard_constraints {
            if !self.hard_compiled.contains_key(name) {
                let made = handler.compile(name, definition)?;
                self.hard_compiled.insert(name.clone(), made);
                compiled += 1;
            }
        }
        for (name, definition) in &self.soft_constraints {
            if !self.soft_compiled.contains_key(name) {
                let made = handler.compile(name, definition)?;
                self.soft_compiled.insert(name.clone(), made);
                compiled += 1;
            }
        }
        tracing::debug!(
            component = "model",
            operation = "compile_constraints",
            status = "success",
            compiled,
            hard = self.hard_compiled.len(),
            soft = self.soft_compiled.len(),
            "Compiled constraints"
        );
        self.touch();
        Ok(())
    }

    /// Derive every penalty automatically: hard constraints get the min-diff
    /// bound from the objective's flip deltas, soft constraints the ratio of
    /// average coefficients.
    pub fn initialize_penalties(&mut self) -> Result<(), ModelError> {
        self.compile_constraints()?;
        let objective = self.objective.clone().unwrap_or_default();
        let deltas = if self.objective.is_some() {
            objective.get_max_deltas()?
        } else {
            MaxDeltas::default()
        };
        for constraint in self.hard_compiled.values_mut() {
            let penalty = get_min_penalty_from_min_diff(constraint.expr(), &deltas)?;
            constraint.set_penalty(penalty)?;
        }
        for constraint in self.soft_compiled.values_mut() {
            let penalty = get_soft_penalty(&objective, constraint.expr())?;
            constraint.set_penalty(penalty)?;
        }
        tracing::debug!(
            component = "model",
            operation = "initialize_penalties",
            status = "success",
            hard = self.hard_compiled.len(),
            soft = self.soft_compiled.len(),
            "Initialized penalties"
        );
        self.touch();
        Ok(())
    }

    fn compiled_mut(&mut self, name: &str) -> Result<&mut PenaltyMethodConstraint, ModelError> {
        self.compile_constraints()?;
        if let Some(constraint) = self.hard_compiled.get_mut(name) {
            return Ok(constraint);
        }
        self.soft_compiled
            .get_mut(name)
            .ok_or_else(|| ModelError::ConstraintNotFound {
                name: name.to_string(),
            })
    }

    pub fn set_penalty(&mut self, name: &str, penalty: f64) -> Result<(), ModelError> {
        self.compiled_mut(name)?.set_penalty(penalty)?;
        self.touch();
        Ok(())
    }

    pub fn penalize_more(&mut self, name: &str) -> Result<(), ModelError> {
        self.compiled_mut(name)?.penalize_more()?;
        self.touch();
        Ok(())
    }

    pub fn penalize_less(&mut self, name: &str) -> Result<(), ModelError> {
        self.compiled_mut(name)?.penalize_less()?;
        self.touch();
        Ok(())
    }

    /// Current penalty of a constraint, falling back to its default before
    /// compilation.
    pub fn penalty(&self, name: &str) -> Result<f64, ModelError> {
        if let Some(constraint) = self
            .hard_compiled
            .get(name)
            .or_else(|| self.soft_compiled.get(name))
        {
            return Ok(constraint.penalty());
        }
        self.constraint(name)
            .map(|(_, definition)| definition.default_penalty().unwrap_or(1.0))
            .ok_or_else(|| ModelError::ConstraintNotFound {
                name: name.to_string(),
            })
    }

    /// Every compiled constraint scaled by its penalty, hard ones first.
    /// Each expression is annotated under its constraint kind with the
    /// constraint's name, relation and penalty.
    pub fn constraints_expr_list(&mut self) -> Result<Vec<Expression>, ModelError> {
        self.compile_constraints()?;
        let hard = self
            .hard_compiled
            .iter()
            .map(|(name, made)| (ConstraintKind::Hard, name, made));
        let soft = self
            .soft_compiled
            .iter()
            .map(|(name, made)| (ConstraintKind::Soft, name, made));
        let mut exprs = Vec::with_capacity(self.num_constraints());
        for (kind, name, made) in hard.chain(soft) {
            let (key, relation) = match kind {
                ConstraintKind::Hard => (
                    MaintainedKey::HardConstraint,
                    self.hard_constraints.get(name).map(|d| d.relation()),
                ),
                ConstraintKind::Soft => (
                    MaintainedKey::SoftConstraint,
                    self.soft_constraints.get(name).map(|d| d.relation()),
                ),
            };
            let info = serde_json::json!({
                "relation": relation.map(|r| r.as_str()),
                "penalty": made.penalty(),
            });
            exprs.push(made.weighted_expr().with_annotation(key, name, info));
        }
        Ok(exprs)
    }
}
