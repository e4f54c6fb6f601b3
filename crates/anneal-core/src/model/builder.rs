//! Model builder methods for setting the objective and adding constraints.

use anneal_expr::{ConstraintDefinition, Expression};

use crate::model::error::ModelError;
use crate::model::{BinaryModel, ConstraintHandler, ConstraintKind};

impl BinaryModel {
    /// Set the objective. A model has at most one objective; build a new
    /// model to replace it.
    pub fn set_objective(&mut self, objective: Expression) -> Result<(), ModelError> {
        if self.objective.is_some() {
            return Err(ModelError::ObjectiveAlreadySet);
        }
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            terms = objective.terms().len(),
            "Set objective function"
        );
        self.objective = Some(objective);
        self.touch();
        Ok(())
    }

    /// Add one constraint and return its name.
    ///
    /// Unnamed constraints are called `constraint<N>` with `N` the current
    /// constraint count. Reusing a name replaces the earlier constraint of
    /// either kind. `penalty`, when given, overrides the definition's default
    /// penalty.
    pub fn add_constraint(
        &mut self,
        definition: ConstraintDefinition,
        name: Option<&str>,
        kind: ConstraintKind,
        penalty: Option<f64>,
    ) -> Result<String, ModelError> {
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("constraint{}", self.num_constraints()),
        };
        if self.constraint(&name).is_some() {
            tracing::warn!(
                component = "model",
                operation = "add_constraint",
                status = "replaced",
                constraint = name.as_str(),
                "Constraint is already added. The original one will be replaced."
            );
            self.hard_constraints.remove(&name);
            self.soft_constraints.remove(&name);
            self.hard_compiled.remove(&name);
            self.soft_compiled.remove(&name);
        }
        let definition = match penalty {
            Some(penalty) => definition.with_default_penalty(penalty),
            None => definition,
        };
        tracing::debug!(
            component = "model",
            operation = "add_constraint",
            status = "success",
            constraint = name.as_str(),
            kind = kind.as_str(),
            relation = definition.relation().as_str(),
            "Added constraint"
        );
        match kind {
            ConstraintKind::Hard => self.hard_constraints.insert(name.clone(), definition),
            ConstraintKind::Soft => self.soft_constraints.insert(name.clone(), definition),
        };
        self.touch();
        Ok(name)
    }

    /// Add several constraints of the same kind. When `names` is given it
    /// must name every constraint.
    pub fn add_constraints(
        &mut self,
        definitions: impl IntoIterator<Item = ConstraintDefinition>,
        names: Option<&[&str]>,
        kind: ConstraintKind,
        penalty: Option<f64>,
    ) -> Result<Vec<String>, ModelError> {
        let definitions: Vec<ConstraintDefinition> = definitions.into_iter().collect();
        let expected = names.map_or(definitions.len(), <[&str]>::len);
        if expected != definitions.len() {
            return Err(ModelError::NameCountMismatch {
                names: expected,
                constraints: definitions.len(),
            });
        }
        definitions
            .into_iter()
            .enumerate()
            .map(|(idx, definition)| {
                let name = names.map(|names| names[idx]);
                self.add_constraint(definition, name, kind, penalty)
            })
            .collect()
    }

    pub fn set_constraint_handler(&mut self, handler: ConstraintHandler) {
        self.handler = Some(handler);
        self.hard_compiled.clear();
        self.soft_compiled.clear();
        self.touch();
    }

    /// Remove the handler; compiling afterwards fails until one is set.
    pub fn clear_constraint_handler(&mut self) {
        self.handler = None;
        self.touch();
    }

    pub fn constraint_handler(&self) -> Option<ConstraintHandler> {
        self.handler
    }
}
