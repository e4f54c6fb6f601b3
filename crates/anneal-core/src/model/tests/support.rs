use anneal_expr::{ConstraintDefinition, Expression, Relation, binary, make_constraint, quicksum};
use std::collections::BTreeMap;

pub(super) fn bits(n: usize) -> Vec<Expression> {
    (0..n).map(|i| binary(format!("b{i}"))).collect()
}

pub(super) fn one_hot(vars: &[Expression]) -> ConstraintDefinition {
    make_constraint(&quicksum(vars), Relation::Eq, 1.0)
}

pub(super) fn assignment(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

/// Every {0, 1} assignment of `names`, in binary counting order.
pub(super) fn all_assignments(names: &[&str]) -> Vec<BTreeMap<String, f64>> {
    (0..1usize << names.len())
        .map(|mask| {
            names
                .iter()
                .enumerate()
                .map(|(bit, name)| (name.to_string(), ((mask >> bit) & 1) as f64))
                .collect()
        })
        .collect()
}
