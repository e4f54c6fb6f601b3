//! Exhaustive Ising optimizer.

use anneal_core::{Matrix, MatrixError};

use crate::{Optimizer, OptimizerConfig, SolverError};

const ENERGY_TOLERANCE: f64 = 1e-9;
const MAX_ENUMERABLE: usize = 63;

/// Enumerates every spin vector and keeps all of lowest energy. Exact but
/// exponential, so the matrix size is capped by
/// [`OptimizerConfig::max_variables`].
#[derive(Debug, Clone, Default)]
pub struct BruteForceOptimizer {
    config: OptimizerConfig,
}

impl BruteForceOptimizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }
}

fn spins_of(mask: u64, size: usize) -> Vec<i8> {
    (0..size)
        .map(|bit| if (mask >> bit) & 1 == 1 { 1 } else { -1 })
        .collect()
}

fn energy(ising: &Matrix, spins: &[i8]) -> f64 {
    let mut total = 0.0;
    for (i, si) in spins.iter().enumerate() {
        let row_dot: f64 = ising
            .row(i)
            .iter()
            .zip(spins)
            .map(|(value, sj)| value * f64::from(*sj))
            .sum();
        total += f64::from(*si) * row_dot;
    }
    -total
}

impl Optimizer for BruteForceOptimizer {
    fn solve(&mut self, ising: &Matrix) -> Result<Vec<Vec<i8>>, SolverError> {
        let size = match ising.ensure_square() {
            Ok(size) => size,
            Err(MatrixError::Empty) => return Err(SolverError::EmptyMatrix),
            Err(err) => return Err(err.into()),
        };
        let limit = self.config.max_variables_or_default().min(MAX_ENUMERABLE);
        if size > limit {
            return Err(SolverError::TooManyVariables {
                variables: size,
                limit,
            });
        }

        // Energy is invariant under a global flip, so with normalization on
        // only vectors whose last spin is +1 are visited.
        let normalize = self.config.normalize_sign_or_default();
        let (count, fixed_last) = if normalize {
            (1u64 << (size - 1), 1u64 << (size - 1))
        } else {
            (1u64 << size, 0)
        };

        let mut best = f64::INFINITY;
        let mut solutions: Vec<Vec<i8>> = Vec::new();
        for mask in 0..count {
            let spins = spins_of(mask | fixed_last, size);
            let value = energy(ising, &spins);
            let tolerance = ENERGY_TOLERANCE * best.abs().max(1.0);
            if solutions.is_empty() || value < best - tolerance {
                best = value;
                solutions.clear();
                solutions.push(spins);
            } else if (value - best).abs() <= tolerance {
                solutions.push(spins);
            }
        }

        tracing::debug!(
            component = "optimizer",
            operation = "brute_force",
            status = "success",
            variables = size,
            visited = count,
            solutions = solutions.len(),
            energy = best,
            "Enumerated spin vectors"
        );
        Ok(solutions)
    }
}
