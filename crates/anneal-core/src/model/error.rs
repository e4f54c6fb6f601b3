//! Model error types.

use crate::matrix::MatrixError;
use anneal_expr::ExprError;

/// Errors that can occur during model operations
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Objective already set
    ObjectiveAlreadySet,
    /// Combined expression mixes binary and spin variables
    TypeConflict,
    /// Constraint kind is neither "hard" nor "soft"
    UnknownConstraintKind { kind: String },
    /// No constraint handler configured
    ConstraintHandlerUnset,
    /// No constraint with this name
    ConstraintNotFound { name: String },
    /// Relation the penalty method cannot express
    UnsupportedRelation { name: String, relation: String },
    /// Inequality whose slack range is zero
    ZeroSlackRange { name: String },
    /// Constraint without any variable terms
    EmptyConstraint { name: String },
    /// Unknown min-delta strategy
    UnknownMinDeltaMethod { method: String },
    /// More names than constraints, or fewer
    NameCountMismatch { names: usize, constraints: usize },
    /// Invalid penalty coefficient
    InvalidPenalty { penalty: f64 },
    /// Expression algebra failure
    Expr(ExprError),
    /// Matrix construction failure
    Matrix(MatrixError),
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::ObjectiveAlreadySet => "OBJECTIVE_ALREADY_SET",
            ModelError::TypeConflict => "QUBO_TYPE_CONFLICT",
            ModelError::UnknownConstraintKind { .. } => "CONSTRAINT_UNKNOWN_KIND",
            ModelError::ConstraintHandlerUnset => "CONSTRAINT_HANDLER_UNSET",
            ModelError::ConstraintNotFound { .. } => "CONSTRAINT_NOT_FOUND",
            ModelError::UnsupportedRelation { .. } => "CONSTRAINT_UNSUPPORTED_RELATION",
            ModelError::ZeroSlackRange { .. } => "SLACK_ZERO_RANGE",
            ModelError::EmptyConstraint { .. } => "CONSTRAINT_EMPTY",
            ModelError::UnknownMinDeltaMethod { .. } => "PENALTY_UNKNOWN_METHOD",
            ModelError::NameCountMismatch { .. } => "CONSTRAINT_NAME_MISMATCH",
            ModelError::InvalidPenalty { .. } => "PENALTY_INVALID",
            ModelError::Expr(inner) => inner.code(),
            ModelError::Matrix(inner) => inner.code(),
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::ObjectiveAlreadySet => write!(
                f,
                "[{}] Objective already exists; create a new model to replace it",
                self.code()
            ),
            ModelError::TypeConflict => write!(
                f,
                "[{}] Conflicting variable types, the QUBO expression contains both binary and spin",
                self.code()
            ),
            ModelError::UnknownConstraintKind { kind } => {
                write!(f, "[{}] No such constraint type {}", self.code(), kind)
            }
            ModelError::ConstraintHandlerUnset => {
                write!(f, "[{}] Set a constraint handler first", self.code())
            }
            ModelError::ConstraintNotFound { name } => {
                write!(f, "[{}] Constraint {} does not exist", self.code(), name)
            }
            ModelError::UnsupportedRelation { name, relation } => write!(
                f,
                "[{}] Constraint {} uses '{}', which the penalty method cannot express",
                self.code(),
                name,
                relation
            ),
            ModelError::ZeroSlackRange { name } => write!(
                f,
                "[{}] Slack range of non-equality constraint {} is zero",
                self.code(),
                name
            ),
            ModelError::EmptyConstraint { name } => write!(
                f,
                "[{}] Constraint {} has no variable terms",
                self.code(),
                name
            ),
            ModelError::UnknownMinDeltaMethod { method } => write!(
                f,
                "[{}] No such method for getting min delta: {} (expected diff or exhaust)",
                self.code(),
                method
            ),
            ModelError::NameCountMismatch { names, constraints } => write!(
                f,
                "[{}] Got {} names for {} constraints",
                self.code(),
                names,
                constraints
            ),
            ModelError::InvalidPenalty { penalty } => write!(
                f,
                "[{}] Penalty must be finite and non-negative (got {})",
                self.code(),
                penalty
            ),
            ModelError::Expr(inner) => write!(f, "{inner}"),
            ModelError::Matrix(inner) => write!(f, "{inner}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Expr(inner) => Some(inner),
            ModelError::Matrix(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<ExprError> for ModelError {
    fn from(err: ExprError) -> Self {
        ModelError::Expr(err)
    }
}

impl From<MatrixError> for ModelError {
    fn from(err: MatrixError) -> Self {
        ModelError::Matrix(err)
    }
}
