//! Traits for abstraction over optimizers and solvers.

use anneal_core::{Matrix, QuboModel};

use crate::{SolveResult, SolverError};

/// Trait for Ising matrix optimizers.
///
/// An optimizer minimizes `-sᵀ J s` over spin vectors `s ∈ {-1, 1}ⁿ`.
pub trait Optimizer {
    /// Return the best spin vectors found, each as long as the matrix.
    ///
    /// An empty result means nothing was found; it is not an error.
    ///
    /// # Errors
    ///
    /// Returns a `SolverError` if the matrix is empty, not square, or
    /// outside what the optimizer accepts.
    fn solve(&mut self, ising: &Matrix) -> Result<Vec<Vec<i8>>, SolverError>;
}

/// Trait for solvers that take a QUBO model to a named assignment.
pub trait QuboSolver {
    /// Solve the model. `Ok(None)` means the optimizer found nothing.
    fn solve_qubo(&mut self, qubo: &mut QuboModel) -> Result<Option<SolveResult>, SolverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<Vec<i8>>);

    impl Optimizer for Fixed {
        fn solve(&mut self, _ising: &Matrix) -> Result<Vec<Vec<i8>>, SolverError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_optimizer_is_object_safe() {
        let mut boxed: Box<dyn Optimizer> = Box::new(Fixed(vec![vec![1, -1]]));
        let found = boxed.solve(&Matrix::square(2)).unwrap();
        assert_eq!(found, vec![vec![1, -1]]);
    }
}
