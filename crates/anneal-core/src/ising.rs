//! Immutable Ising snapshot produced from a QUBO model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::matrix::Matrix;
use crate::model::AUX_SPIN;

/// Symmetric Ising matrix over the model variables plus the auxiliary spin.
///
/// For spins `s` (with the auxiliary spin fixed to +1),
/// `-sᵀ J s + bias` equals the QUBO value of the binary assignment
/// `x = (s + 1) / 2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsingModel {
    variables: BTreeMap<String, usize>,
    matrix: Matrix,
    bias: f64,
}

impl IsingModel {
    pub(crate) fn new(variables: BTreeMap<String, usize>, matrix: Matrix, bias: f64) -> Self {
        Self {
            variables,
            matrix,
            bias,
        }
    }

    /// Untagged variable name to matrix index, the auxiliary spin included.
    pub fn get_variables(&self) -> &BTreeMap<String, usize> {
        &self.variables
    }

    pub fn get_matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn get_bias(&self) -> f64 {
        self.bias
    }

    /// Variable names in matrix order.
    pub fn ordered_variables(&self) -> Vec<&str> {
        let mut ordered: Vec<(usize, &str)> = self
            .variables
            .iter()
            .map(|(name, idx)| (*idx, name.as_str()))
            .collect();
        ordered.sort_unstable();
        ordered.into_iter().map(|(_, name)| name).collect()
    }

    /// Index of the auxiliary spin, always the last one.
    pub fn aux_index(&self) -> Option<usize> {
        self.variables.get(AUX_SPIN).copied()
    }
}

impl std::fmt::Display for IsingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "CIM Ising Details:")?;
        writeln!(f, "  CIM Ising Matrix:")?;
        for line in self.matrix.to_string().lines() {
            writeln!(f, "    {line}")?;
        }
        writeln!(f, "  CIM Ising Bias: {}", self.bias)?;
        writeln!(
            f,
            "  CIM Ising Variables: {}",
            self.ordered_variables().join(", ")
        )
    }
}
