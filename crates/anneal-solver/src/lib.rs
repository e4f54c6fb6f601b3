//! Optimizers for Ising matrices and solvers for QUBO models.
//!
//! # Overview
//!
//! - [`OptimizerConfig`]: Configuration options for optimizers
//! - [`SolverError`]: Error types for optimizer and solver operations
//! - [`Optimizer`]: Trait for Ising matrix optimizers
//! - [`QuboSolver`]: Trait for solving a QUBO model end to end
//! - [`BruteForceOptimizer`]: Exhaustive search over every spin vector
//! - [`SimpleSolver`]: Converts a QUBO model, optimizes it and reads back
//!   the best solution

mod brute_force;
mod config;
mod error;
mod simple;
mod traits;

pub use brute_force::BruteForceOptimizer;
pub use config::{DEFAULT_MAX_VARIABLES, OptimizerConfig};
pub use error::SolverError;
pub use simple::{SimpleSolver, SolveResult};
pub use traits::{Optimizer, QuboSolver};
