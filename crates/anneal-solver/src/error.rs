//! Solver error types.

use anneal_core::{MatrixError, ModelError};

/// Error type for optimizer and solver operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Ising matrix has no rows.
    EmptyMatrix,
    /// Matrix is larger than the optimizer accepts.
    TooManyVariables { variables: usize, limit: usize },
    /// Malformed Ising matrix.
    Matrix(MatrixError),
    /// QUBO model could not be made or converted.
    Model(ModelError),
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::EmptyMatrix => "SOLVER_EMPTY_MATRIX",
            SolverError::TooManyVariables { .. } => "SOLVER_TOO_MANY_VARIABLES",
            SolverError::Matrix(err) => err.code(),
            SolverError::Model(err) => err.code(),
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::EmptyMatrix => write!(f, "[{}] Ising matrix has no rows", self.code()),
            SolverError::TooManyVariables { variables, limit } => write!(
                f,
                "[{}] {} variables exceed the limit of {}",
                self.code(),
                variables,
                limit
            ),
            SolverError::Matrix(err) => write!(f, "{err}"),
            SolverError::Model(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverError::Matrix(err) => Some(err),
            SolverError::Model(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MatrixError> for SolverError {
    fn from(err: MatrixError) -> Self {
        SolverError::Matrix(err)
    }
}

impl From<ModelError> for SolverError {
    fn from(err: ModelError) -> Self {
        SolverError::Model(err)
    }
}
