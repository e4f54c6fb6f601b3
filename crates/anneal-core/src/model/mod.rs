//! Model module for building binary optimization models.
//!
//! This module provides [`BinaryModel`], which collects an objective and named
//! constraints, and [`QuboModel`], which folds them into a single QUBO
//! expression and its upper-triangular matrix.
//!
//! # Module Organization
//!
//! - [`error`]: Model error types
//! - [`builder`]: Methods for setting the objective and adding constraints
//! - [`penalty_method`]: Penalty-method compilation of constraints
//! - [`compile`]: Constraint compilation and penalty tuning
//! - [`verify`]: Evaluating solutions against the objective and constraints
//! - [`qubo`]: QUBO assembly and matrix extraction
//! - [`inspect`]: Human-readable model details

mod builder;
mod compile;
mod error;
mod inspect;
mod penalty_method;
mod qubo;
mod verify;

use anneal_expr::{ConstraintDefinition, Expression};
use std::collections::BTreeMap;

pub use error::ModelError;
pub use inspect::{ConstraintView, QuboDetails};
pub use penalty_method::PenaltyMethodConstraint;
pub use qubo::{AUX_SPIN, QuboModel, qubo_matrix_to_qubo_model};

/// Whether a constraint must hold or is only preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ConstraintKind {
    #[default]
    Hard,
    Soft,
}

impl ConstraintKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintKind::Hard => "hard",
            ConstraintKind::Soft => "soft",
        }
    }
}

impl std::str::FromStr for ConstraintKind {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "hard" => Ok(ConstraintKind::Hard),
            "soft" => Ok(ConstraintKind::Soft),
            other => Err(ModelError::UnknownConstraintKind {
                kind: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How constraints are turned into unconstrained expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstraintHandler {
    #[default]
    PenaltyMethod,
}

impl ConstraintHandler {
    pub(crate) fn compile(
        self,
        name: &str,
        definition: &ConstraintDefinition,
    ) -> Result<PenaltyMethodConstraint, ModelError> {
        match self {
            ConstraintHandler::PenaltyMethod => {
                PenaltyMethodConstraint::from_definition(name, definition)
            }
        }
    }
}

/// An objective plus named hard and soft constraints over binary variables.
///
/// Definitions are compiled lazily; every structural change bumps
/// [`revision`](BinaryModel::revision) so derived forms can tell when they are
/// stale.
#[derive(Debug, Clone)]
pub struct BinaryModel {
    pub(crate) objective: Option<Expression>,
    pub(crate) hard_constraints: BTreeMap<String, ConstraintDefinition>,
    pub(crate) soft_constraints: BTreeMap<String, ConstraintDefinition>,
    pub(crate) hard_compiled: BTreeMap<String, PenaltyMethodConstraint>,
    pub(crate) soft_compiled: BTreeMap<String, PenaltyMethodConstraint>,
    pub(crate) handler: Option<ConstraintHandler>,
    revision: u64,
}

impl BinaryModel {
    /// Create a new empty model using the penalty method.
    pub fn new() -> Self {
        Self {
            objective: None,
            hard_constraints: BTreeMap::new(),
            soft_constraints: BTreeMap::new(),
            hard_compiled: BTreeMap::new(),
            soft_compiled: BTreeMap::new(),
            handler: Some(ConstraintHandler::PenaltyMethod),
            revision: 0,
        }
    }

    /// Create a model around an objective.
    pub fn with_objective(objective: Expression) -> Self {
        Self {
            objective: Some(objective),
            ..Self::new()
        }
    }

    pub fn objective(&self) -> Option<&Expression> {
        self.objective.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn num_constraints(&self) -> usize {
        self.hard_constraints.len() + self.soft_constraints.len()
    }

    pub fn constraint(&self, name: &str) -> Option<(ConstraintKind, &ConstraintDefinition)> {
        self.hard_constraints
            .get(name)
            .map(|def| (ConstraintKind::Hard, def))
            .or_else(|| {
                self.soft_constraints
                    .get(name)
                    .map(|def| (ConstraintKind::Soft, def))
            })
    }

    pub fn constraints(&self, kind: ConstraintKind) -> &BTreeMap<String, ConstraintDefinition> {
        match kind {
            ConstraintKind::Hard => &self.hard_constraints,
            ConstraintKind::Soft => &self.soft_constraints,
        }
    }

    /// Compiled constraints of one kind. Empty until
    /// [`compile_constraints`](BinaryModel::compile_constraints) runs.
    pub fn compiled_constraints(
        &self,
        kind: ConstraintKind,
    ) -> &BTreeMap<String, PenaltyMethodConstraint> {
        match kind {
            ConstraintKind::Hard => &self.hard_compiled,
            ConstraintKind::Soft => &self.soft_compiled,
        }
    }

    pub fn is_compiled(&self) -> bool {
        self.hard_compiled.len() == self.hard_constraints.len()
            && self.soft_compiled.len() == self.soft_constraints.len()
    }

    pub(crate) fn touch(&mut self) {
        self.revision += 1;
    }
}

impl Default for BinaryModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use anneal_expr::{Relation, binary, make_constraint};

    mod penalties;
    mod qubo_make;
    mod support;

    #[test]
    fn test_new_model_is_empty() {
        let model = BinaryModel::new();
        assert!(model.objective().is_none());
        assert_eq!(model.num_constraints(), 0);
        assert_eq!(model.revision(), 0);
        assert!(model.is_compiled());
    }

    #[test]
    fn test_objective_is_set_once() {
        let mut model = BinaryModel::new();
        model.set_objective(binary("x")).unwrap();
        let err = model.set_objective(binary("y")).unwrap_err();
        assert_eq!(err, ModelError::ObjectiveAlreadySet);
        assert_eq!(model.objective().unwrap(), &binary("x"));
    }

    #[test]
    fn test_constraints_are_auto_named() {
        let mut model = BinaryModel::new();
        let cons = make_constraint(&binary("x"), Relation::Eq, 1.0);
        let first = model
            .add_constraint(cons.clone(), None, ConstraintKind::Hard, None)
            .unwrap();
        let second = model
            .add_constraint(cons, None, ConstraintKind::Soft, None)
            .unwrap();
        assert_eq!(first, "constraint0");
        assert_eq!(second, "constraint1");
        assert_eq!(model.constraint("constraint1").unwrap().0, ConstraintKind::Soft);
    }

    #[test]
    fn test_replacing_constraint_moves_kind() {
        let mut model = BinaryModel::new();
        let cons = make_constraint(&binary("x"), Relation::Eq, 1.0);
        model
            .add_constraint(cons.clone(), Some("c"), ConstraintKind::Hard, None)
            .unwrap();
        model
            .add_constraint(cons, Some("c"), ConstraintKind::Soft, Some(2.0))
            .unwrap();
        assert_eq!(model.num_constraints(), 1);
        let (kind, def) = model.constraint("c").unwrap();
        assert_eq!(kind, ConstraintKind::Soft);
        assert_eq!(def.default_penalty(), Some(2.0));
    }

    #[test]
    fn test_add_constraints_with_names() {
        let mut model = BinaryModel::new();
        let defs = vec![
            make_constraint(&binary("x"), Relation::Eq, 1.0),
            make_constraint(&binary("y"), Relation::Eq, 0.0),
        ];
        let names = model
            .add_constraints(defs.clone(), Some(&["a", "b"]), ConstraintKind::Hard, None)
            .unwrap();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);

        let err = model
            .add_constraints(defs.clone(), Some(&["only"]), ConstraintKind::Hard, None)
            .unwrap_err();
        assert_eq!(err.code(), "CONSTRAINT_NAME_MISMATCH");

        let generated = model
            .add_constraints(defs, None, ConstraintKind::Soft, None)
            .unwrap();
        assert_eq!(
            generated,
            vec!["constraint2".to_string(), "constraint3".to_string()]
        );
    }

    #[test]
    fn test_mutations_bump_revision() {
        let mut model = BinaryModel::with_objective(binary("x"));
        let start = model.revision();
        model
            .add_constraint(
                make_constraint(&binary("x"), Relation::Eq, 1.0),
                Some("c"),
                ConstraintKind::Hard,
                None,
            )
            .unwrap();
        assert!(model.revision() > start);
        let after_add = model.revision();
        model.set_penalty("c", 5.0).unwrap();
        assert!(model.revision() > after_add);
    }

    #[test]
    fn test_constraint_kind_parsing() {
        assert_eq!("hard".parse::<ConstraintKind>().unwrap(), ConstraintKind::Hard);
        assert_eq!("soft".parse::<ConstraintKind>().unwrap(), ConstraintKind::Soft);
        let err = "medium".parse::<ConstraintKind>().unwrap_err();
        assert_eq!(err.code(), "CONSTRAINT_UNKNOWN_KIND");
    }
}
