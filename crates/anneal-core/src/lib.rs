//! QUBO and Ising models built from symbolic expressions.

pub mod conversion;
pub mod ising;
pub mod logging;
pub mod matrix;
pub mod model;
pub mod penalty;
pub mod precision;
pub mod solution;

pub use conversion::{
    ising_matrix_to_qubo_matrix, qubo_matrix_to_ising_matrix, qubo_model_to_ising_model,
};
pub use ising::IsingModel;
pub use logging::{LoggingError, enable_logging};
pub use matrix::{Matrix, MatrixError, calculate_qubo_value, check_symmetric, hamiltonian};
pub use model::{
    AUX_SPIN, BinaryModel, ConstraintHandler, ConstraintKind, ConstraintView, ModelError,
    PenaltyMethodConstraint, QuboDetails, QuboModel, qubo_matrix_to_qubo_model,
};
pub use penalty::{
    MinDeltaMethod, get_min_penalty, get_min_penalty_for_equal_constraint,
    get_min_penalty_from_deltas, get_min_penalty_from_min_diff, get_soft_penalty,
};
pub use precision::{
    BitWidthReport, DEFAULT_BIT_WIDTH, PrecisionConfig, PrecisionError,
    adjust_ising_matrix_precision, adjust_qubo_matrix_precision, calculate_ising_matrix_bit_width,
    check_qubo_matrix_bit_width,
};
pub use solution::get_sol_dict;
