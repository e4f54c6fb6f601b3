//! QUBO assembly: objective plus weighted constraints, and its matrix form.

use anneal_expr::{
    ExprArray, ExprError, Expression, Monomial, VarKind, VarName, binary, quicksum,
};
use std::collections::BTreeMap;

use crate::matrix::{Matrix, MatrixError};
use crate::model::error::ModelError;
use crate::model::inspect::QuboDetails;
use crate::model::{BinaryModel, ConstraintKind};

/// Name of the auxiliary spin that carries linear fields in Ising form.
pub const AUX_SPIN: &str = "__spin__";

#[derive(Debug, Clone)]
struct MadeQubo {
    revision: u64,
    expr: Expression,
    matrix: Matrix,
    index: BTreeMap<VarName, usize>,
    variables: BTreeMap<String, usize>,
}

/// A [`BinaryModel`] with a cached QUBO form.
///
/// The cache is stamped with the model revision it was built from and is
/// rebuilt on the next access after any change to the model.
#[derive(Debug, Clone, Default)]
pub struct QuboModel {
    model: BinaryModel,
    made: Option<MadeQubo>,
}

impl QuboModel {
    pub fn new(objective: Expression) -> Self {
        Self::from(BinaryModel::with_objective(objective))
    }

    pub fn model(&self) -> &BinaryModel {
        &self.model
    }

    /// Mutable access to the underlying model. Changes made here bump its
    /// revision, which invalidates the cached QUBO form.
    pub fn model_mut(&mut self) -> &mut BinaryModel {
        &mut self.model
    }

    pub fn into_model(self) -> BinaryModel {
        self.model
    }

    /// Whether the cached form matches the current model.
    pub fn is_made(&self) -> bool {
        self.made
            .as_ref()
            .is_some_and(|made| made.revision == self.model.revision())
    }

    fn made(&mut self) -> Result<&MadeQubo, ModelError> {
        self.model.compile_constraints()?;
        let revision = self.model.revision();
        let made = match self.made.take() {
            Some(made) if made.revision == revision => made,
            _ => build(&mut self.model)?,
        };
        Ok(&*self.made.insert(made))
    }

    /// The combined QUBO expression: objective plus every weighted
    /// constraint.
    pub fn make(&mut self) -> Result<&Expression, ModelError> {
        Ok(&self.made()?.expr)
    }

    /// Upper-triangular QUBO matrix over the sorted variables.
    pub fn get_matrix(&mut self) -> Result<&Matrix, ModelError> {
        Ok(&self.made()?.matrix)
    }

    /// Untagged variable name to matrix index.
    pub fn get_variables(&mut self) -> Result<&BTreeMap<String, usize>, ModelError> {
        Ok(&self.made()?.variables)
    }

    /// Matrix index of each tagged variable.
    pub fn get_variable_index(&mut self) -> Result<&BTreeMap<VarName, usize>, ModelError> {
        Ok(&self.made()?.index)
    }

    /// Constant term of the combined expression, so that
    /// `xᵀ Q x + offset` equals the expression value.
    pub fn get_offset(&mut self) -> Result<f64, ModelError> {
        Ok(self.made()?.expr.constant_offset()?)
    }

    /// Map a solution vector (indexed like the matrix) to variable values,
    /// reading positive entries as 1 and the rest as 0.
    pub fn get_sol_dict(&mut self, solution: &[f64]) -> Result<BTreeMap<String, f64>, ModelError> {
        let made = self.made()?;
        if solution.len() < made.variables.len() {
            return Err(MatrixError::DimensionMismatch {
                expected: made.variables.len(),
                found: solution.len(),
            }
            .into());
        }
        Ok(made
            .variables
            .iter()
            .filter(|(name, _)| name.as_str() != AUX_SPIN)
            .map(|(name, idx)| {
                let value = if solution[*idx] > 0.0 { 1.0 } else { 0.0 };
                (name.clone(), value)
            })
            .collect())
    }

    /// Details of the combined expression, including the constraints folded
    /// into it.
    pub fn details(&mut self) -> Result<QuboDetails, ModelError> {
        Ok(QuboDetails::from_expression(&self.made()?.expr))
    }
}

impl From<BinaryModel> for QuboModel {
    fn from(model: BinaryModel) -> Self {
        Self { model, made: None }
    }
}

impl std::fmt::Display for QuboModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let objective = self.model.objective().cloned().unwrap_or_default();
        write!(f, "{}", QuboDetails::from_expression(&objective))
    }
}

fn build(model: &mut BinaryModel) -> Result<MadeQubo, ModelError> {
    let constraints = model.constraints_expr_list()?;
    let revision = model.revision();
    let objective = model.objective().cloned().unwrap_or_default();
    let expr = objective.add(&quicksum(&constraints));

    let placeholders = expr.placeholders();
    if !placeholders.is_empty() {
        return Err(ExprError::UnresolvedPlaceholder {
            names: placeholders.iter().map(|p| p.name().to_string()).collect(),
        }
        .into());
    }
    let sorted = expr.variables();
    let kinds: Vec<VarKind> = sorted.iter().map(VarName::kind).collect();
    if kinds.windows(2).any(|pair| pair[0] != pair[1]) {
        return Err(ModelError::TypeConflict);
    }
    if sorted.is_empty() {
        tracing::warn!(
            component = "qubo",
            operation = "make",
            status = "empty",
            "Empty QUBO, the objective function is constant 0 (QUBO = 0)."
        );
    }

    let index: BTreeMap<VarName, usize> = sorted
        .iter()
        .enumerate()
        .map(|(idx, var)| (var.clone(), idx))
        .collect();
    let mut matrix = Matrix::square(sorted.len());
    for (monomial, coeff) in expr.numeric_terms()? {
        let (i, j) = match &monomial {
            Monomial::Linear(a) => (index[a], index[a]),
            Monomial::Quadratic(a, b) => (index[a], index[b]),
        };
        matrix[(i, j)] = coeff;
    }
    let variables = index
        .iter()
        .map(|(var, idx)| (var.name().to_string(), *idx))
        .collect();

    tracing::debug!(
        component = "qubo",
        operation = "make",
        status = "success",
        variables = sorted.len(),
        terms = expr.terms().len(),
        hard = model.compiled_constraints(ConstraintKind::Hard).len(),
        soft = model.compiled_constraints(ConstraintKind::Soft).len(),
        revision,
        "Made QUBO model"
    );
    Ok(MadeQubo {
        revision,
        expr,
        matrix,
        index,
        variables,
    })
}

/// Build a model whose objective is `bᵀ Q b` over fresh binaries `b[i]`.
/// Both triangles of `Q` contribute, so `Q[i][j]` and `Q[j][i]` add up.
pub fn qubo_matrix_to_qubo_model(qubo: &Matrix) -> Result<QuboModel, ModelError> {
    let n = qubo.ensure_square()?;
    let bits = ExprArray::variables(&[n], "b", binary)?;
    let weights = ExprArray::from_fn(&[n, n], |index| {
        Ok(Expression::from_constant(qubo[(index[0], index[1])]))
    })?;
    let objective = bits.dot(&weights)?.inner(&bits)?;
    tracing::debug!(
        component = "qubo",
        operation = "matrix_to_model",
        status = "success",
        variables = n,
        terms = objective.terms().len(),
        "Built QUBO model from matrix"
    );
    Ok(QuboModel::new(objective))
}
