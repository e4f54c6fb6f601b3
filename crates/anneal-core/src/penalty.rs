//! Penalty coefficient estimation for the penalty method.
//!
//! Each estimator returns a lower bound that keeps feasible solutions locally
//! optimal (under single-bit flips) once the constraint is added to the
//! objective. They are heuristics, not exact minima.

use crate::model::ModelError;
use anneal_expr::{Expression, MaxDeltas, Monomial, VarName};
use std::collections::BTreeMap;

/// Strategy used to estimate the smallest nonzero change a constraint
/// undergoes when one of its variables flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinDeltaMethod {
    /// Look at combinations of at most two quadratic partners.
    #[default]
    Diff,
    /// Enumerate every subset sum of quadratic partners.
    Exhaust,
}

impl MinDeltaMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            MinDeltaMethod::Diff => "diff",
            MinDeltaMethod::Exhaust => "exhaust",
        }
    }
}

impl std::str::FromStr for MinDeltaMethod {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "diff" => Ok(MinDeltaMethod::Diff),
            "exhaust" => Ok(MinDeltaMethod::Exhaust),
            other => Err(ModelError::UnknownMinDeltaMethod {
                method: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for MinDeltaMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Smallest strictly positive gap among the constraint coefficients, their
/// negations and zero. Infinite when every coefficient is zero.
pub(crate) fn min_coefficient_gap(cons: &Expression) -> Result<f64, ModelError> {
    let mut values: Vec<f64> = Vec::new();
    for (_, coeff) in cons.numeric_terms()? {
        values.push(coeff);
        values.push(-coeff);
    }
    values.push(0.0);
    values.sort_by(f64::total_cmp);
    Ok(values
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|gap| *gap > 0.0)
        .fold(f64::INFINITY, f64::min))
}

/// Bound from the objective's largest flip deltas divided by the smallest
/// coefficient gap of the constraint. Returns 1 when the objective has no
/// deltas on either side.
pub fn get_min_penalty_from_min_diff(
    cons: &Expression,
    deltas: &MaxDeltas,
) -> Result<f64, ModelError> {
    if deltas.negative.is_empty() || deltas.positive.is_empty() {
        return Ok(1.0);
    }
    let min_diff = min_coefficient_gap(cons)?;
    let penalty = deltas
        .negative
        .values()
        .chain(deltas.positive.values())
        .fold(0.0_f64, |acc, delta| acc.max(delta / min_diff));
    Ok(penalty)
}

fn min_deltas_diff(
    quadratic: &BTreeMap<VarName, Vec<f64>>,
    linear: &BTreeMap<VarName, f64>,
) -> BTreeMap<VarName, f64> {
    let mut min_deltas = BTreeMap::new();
    for (var, partners) in quadratic {
        let mut sorted = partners.clone();
        sorted.sort_by(f64::total_cmp);
        let (base, mut min_delta) = match linear.get(var) {
            Some(value) => (*value, value.abs()),
            None => (0.0, sorted.last().copied().unwrap_or(0.0).abs()),
        };
        for value in &sorted {
            let delta = base + value;
            if delta != 0.0 {
                min_delta = min_delta.min(delta.abs());
            }
        }
        if !sorted.is_empty() {
            let (mut i, mut j) = (0, sorted.len() - 1);
            while i < j {
                let delta = sorted[i] + sorted[j] + base;
                if delta != 0.0 {
                    min_delta = min_delta.min(delta.abs());
                }
                if -sorted[i] > sorted[j] {
                    i += 1;
                } else {
                    j -= 1;
                }
            }
        }
        min_deltas.insert(var.clone(), min_delta);
    }
    for (var, value) in linear {
        min_deltas.entry(var.clone()).or_insert(value.abs());
    }
    min_deltas
}

fn min_deltas_exhaust(
    quadratic: &BTreeMap<VarName, Vec<f64>>,
    linear: &BTreeMap<VarName, f64>,
) -> BTreeMap<VarName, f64> {
    let mut min_deltas = BTreeMap::new();
    for (var, partners) in quadratic {
        let (mut sums, mut min_delta) = match linear.get(var) {
            Some(value) => (vec![*value], value.abs()),
            None => (vec![0.0], f64::INFINITY),
        };
        for coeff in partners {
            let extended: Vec<f64> = sums.iter().map(|sum| sum + coeff).collect();
            for sum in extended {
                if sum != 0.0 && sum.abs() < min_delta {
                    min_delta = sum.abs();
                }
                if !sums.contains(&sum) {
                    sums.push(sum);
                }
            }
        }
        min_deltas.insert(var.clone(), min_delta);
    }
    for (var, value) in linear {
        min_deltas.entry(var.clone()).or_insert(value.abs());
    }
    min_deltas
}

/// Bound from the per-variable minimal change of the constraint, restricted
/// to variables that also appear in the objective.
pub fn get_min_penalty_from_deltas(
    cons: &Expression,
    deltas: &MaxDeltas,
    obj_vars: &[VarName],
    method: MinDeltaMethod,
) -> Result<f64, ModelError> {
    let mut quadratic: BTreeMap<VarName, Vec<f64>> = BTreeMap::new();
    let mut linear: BTreeMap<VarName, f64> = BTreeMap::new();
    for (monomial, coeff) in cons.numeric_terms()? {
        match monomial {
            Monomial::Quadratic(a, b) => {
                for var in [a, b] {
                    if obj_vars.contains(&var) {
                        quadratic.entry(var).or_default().push(coeff);
                    }
                }
            }
            Monomial::Linear(var) => {
                if obj_vars.contains(&var) {
                    linear.insert(var, coeff);
                }
            }
        }
    }

    let min_deltas = match method {
        MinDeltaMethod::Diff => min_deltas_diff(&quadratic, &linear),
        MinDeltaMethod::Exhaust => min_deltas_exhaust(&quadratic, &linear),
    };

    let mut penalty = 0.0_f64;
    for (var, min_delta) in &min_deltas {
        let Some(positive) = deltas.positive.get(var) else {
            continue;
        };
        if *min_delta == 0.0 {
            continue;
        }
        let negative = deltas.negative.get(var).copied().unwrap_or(0.0);
        penalty = penalty.max(positive / min_delta).max(negative / min_delta);
    }
    tracing::debug!(
        component = "penalty",
        operation = "min_penalty_from_deltas",
        status = "success",
        method = method.as_str(),
        penalty,
        "Estimated penalty from constraint deltas"
    );
    Ok(penalty)
}

/// Closed-form bound for a linear equality constraint `cons == 0`: the worst
/// objective gain from flipping one bit of a feasible solution, over the
/// squared constraint coefficient of that bit.
pub fn get_min_penalty_for_equal_constraint(
    obj: &Expression,
    cons: &Expression,
) -> Result<f64, ModelError> {
    let deltas = obj.get_max_deltas()?;
    let mut penalty = 0.0_f64;
    for (monomial, coeff) in cons.numeric_terms()? {
        let Monomial::Linear(var) = monomial else {
            continue;
        };
        let (Some(negative), Some(positive)) = (deltas.negative.get(&var), deltas.positive.get(&var))
        else {
            continue;
        };
        let squared = coeff * coeff;
        penalty = penalty.max(positive / squared).max(negative / squared);
    }
    Ok(penalty)
}

/// Min-diff bound fed with the objective's own deltas.
pub fn get_min_penalty(obj: &Expression, cons: &Expression) -> Result<f64, ModelError> {
    let deltas = obj.get_max_deltas()?;
    get_min_penalty_from_min_diff(cons, &deltas)
}

/// Scale that makes the constraint's mean absolute coefficient match the
/// objective's.
pub fn get_soft_penalty(obj: &Expression, cons: &Expression) -> Result<f64, ModelError> {
    let obj_average = obj.average_coefficient()?;
    let cons_average = cons.average_coefficient()?;
    if cons_average == 0.0 {
        return Err(ModelError::EmptyConstraint {
            name: cons.to_string(),
        });
    }
    if obj_average == 0.0 {
        return Ok(1.0);
    }
    Ok(obj_average / cons_average)
}
