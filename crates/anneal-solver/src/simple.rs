//! QUBO solving through an Ising optimizer.

use anneal_core::{QuboModel, get_sol_dict, hamiltonian, qubo_model_to_ising_model};
use std::collections::BTreeMap;

use crate::{Optimizer, QuboSolver, SolverError};

/// Best assignment found for a QUBO model.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    /// Variable name to binary value.
    pub solution: BTreeMap<String, f64>,
    /// QUBO value of `solution`, constraint penalties included.
    pub qubo_value: f64,
    /// Number of equally good spin vectors the optimizer returned.
    pub candidates: usize,
}

/// Runs an [`Optimizer`] on the Ising form of a QUBO model and reads back
/// its first solution.
#[derive(Debug, Clone)]
pub struct SimpleSolver<O> {
    optimizer: O,
}

impl<O: Optimizer> SimpleSolver<O> {
    pub fn new(optimizer: O) -> Self {
        Self { optimizer }
    }

    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    pub fn into_optimizer(self) -> O {
        self.optimizer
    }
}

impl<O: Optimizer> QuboSolver for SimpleSolver<O> {
    fn solve_qubo(&mut self, qubo: &mut QuboModel) -> Result<Option<SolveResult>, SolverError> {
        let ising = qubo_model_to_ising_model(qubo)?;
        let solutions = self.optimizer.solve(ising.get_matrix())?;
        let Some(first) = solutions.first() else {
            tracing::warn!(
                component = "solver",
                operation = "solve_qubo",
                status = "no_solution",
                variables = ising.get_variables().len(),
                "No solution found!"
            );
            return Ok(None);
        };

        // Flip so the auxiliary spin reads +1 before mapping back to bits.
        let spins: Vec<f64> = first.iter().map(|spin| f64::from(*spin)).collect();
        let aux = spins.last().copied().unwrap_or(1.0);
        let aligned: Vec<f64> = spins.iter().map(|spin| spin * aux).collect();
        let model_spins = &aligned[..aligned.len().saturating_sub(1)];
        let solution = get_sol_dict(model_spins, ising.get_variables())?;
        let energy = hamiltonian(ising.get_matrix(), std::slice::from_ref(&aligned))?;
        let qubo_value = energy.first().copied().unwrap_or(0.0) + ising.get_bias();

        tracing::debug!(
            component = "solver",
            operation = "solve_qubo",
            status = "success",
            variables = solution.len(),
            candidates = solutions.len(),
            qubo_value,
            "Solved QUBO model"
        );
        Ok(Some(SolveResult {
            solution,
            qubo_value,
            candidates: solutions.len(),
        }))
    }
}
