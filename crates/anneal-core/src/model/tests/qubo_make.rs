use super::support::{all_assignments, assignment, bits, one_hot};
use super::*;
use crate::matrix::{Matrix, calculate_qubo_value};
use anneal_expr::{get_val, placeholder, spin};

fn rows(matrix: &Matrix) -> Vec<Vec<f64>> {
    matrix.to_rows()
}

#[test]
fn test_matrix_is_upper_triangular() {
    let (b1, b2) = (binary("b1"), binary("b2"));
    let mut qubo = QuboModel::new(b1.clone() + b2.clone() + b1.mul(&b2).unwrap().scale(2.0));
    assert_eq!(
        rows(qubo.get_matrix().unwrap()),
        vec![vec![1.0, 2.0], vec![0.0, 1.0]]
    );
    let variables = qubo.get_variables().unwrap();
    assert_eq!(variables["b1"], 0);
    assert_eq!(variables["b2"], 1);
    assert_eq!(qubo.get_offset().unwrap(), 0.0);
}

#[test]
fn test_matrix_value_matches_expression() {
    let x = bits(3);
    let objective = x[0].scale(3.0) - x[1].mul(&x[2]).unwrap() + 0.5;
    let mut model = BinaryModel::with_objective(objective);
    model
        .add_constraint(one_hot(&x), Some("pick"), ConstraintKind::Hard, Some(2.0))
        .unwrap();
    let mut qubo = QuboModel::from(model);

    let made = qubo.make().unwrap().clone();
    let matrix = qubo.get_matrix().unwrap().clone();
    let offset = qubo.get_offset().unwrap();
    assert!(matrix.is_upper_triangular());

    let order: Vec<String> = {
        let variables = qubo.get_variables().unwrap();
        let mut names: Vec<(usize, String)> =
            variables.iter().map(|(k, v)| (*v, k.clone())).collect();
        names.sort();
        names.into_iter().map(|(_, name)| name).collect()
    };
    assert_eq!(order, vec!["b0", "b1", "b2"]);

    for solution in all_assignments(&["b0", "b1", "b2"]) {
        let vector: Vec<f64> = order.iter().map(|name| solution[name]).collect();
        let from_matrix = calculate_qubo_value(&matrix, offset, &vector).unwrap();
        let from_expr = get_val(&made, &solution).unwrap();
        assert!((from_matrix - from_expr).abs() < 1e-9);
    }
}

#[test]
fn test_cache_follows_model_revision() {
    let x = bits(2);
    let mut model = BinaryModel::with_objective(x[0].add(&x[1]));
    model
        .add_constraint(one_hot(&x), Some("one"), ConstraintKind::Hard, None)
        .unwrap();
    let mut qubo = QuboModel::from(model);

    // b0 + b1 + (b0 + b1 - 1)²: the linear terms cancel
    assert_eq!(
        rows(qubo.get_matrix().unwrap()),
        vec![vec![0.0, 2.0], vec![0.0, 0.0]]
    );
    assert!(qubo.is_made());

    qubo.model_mut().set_penalty("one", 3.0).unwrap();
    assert!(!qubo.is_made());
    assert_eq!(
        rows(qubo.get_matrix().unwrap()),
        vec![vec![-2.0, 6.0], vec![0.0, -2.0]]
    );
    assert_eq!(qubo.get_offset().unwrap(), 3.0);
}

#[test]
fn test_mixed_variable_kinds_conflict() {
    let mut qubo = QuboModel::new(binary("x") + spin("s"));
    let err = qubo.make().unwrap_err();
    assert_eq!(err, ModelError::TypeConflict);
    assert_eq!(err.code(), "QUBO_TYPE_CONFLICT");
}

#[test]
fn test_spin_objective_is_accepted() {
    let (s1, s2) = (spin("s1"), spin("s2"));
    let mut qubo = QuboModel::new(s1.mul(&s2).unwrap());
    // (2a - 1)(2b - 1) = 4ab - 2a - 2b + 1
    assert_eq!(
        rows(qubo.get_matrix().unwrap()),
        vec![vec![-2.0, 4.0], vec![0.0, -2.0]]
    );
    assert_eq!(qubo.details().unwrap().kind, Some(anneal_expr::VarKind::Spin));
}

#[test]
fn test_placeholders_must_be_fed() {
    let objective = binary("x").mul(&placeholder("w")).unwrap();
    let mut qubo = QuboModel::new(objective.clone());
    assert_eq!(qubo.make().unwrap_err().code(), "PLACEHOLDER_UNRESOLVED");

    let fed = objective.feed(&assignment(&[("w", 5.0)])).unwrap();
    let mut qubo = QuboModel::new(fed);
    assert_eq!(rows(qubo.get_matrix().unwrap()), vec![vec![5.0]]);
}

#[test]
fn test_constant_objective_makes_empty_matrix() {
    let mut qubo = QuboModel::new(anneal_expr::Expression::from_constant(3.0));
    assert_eq!(qubo.get_matrix().unwrap().rows(), 0);
    assert!(qubo.get_variables().unwrap().is_empty());
    assert_eq!(qubo.get_offset().unwrap(), 3.0);
}

#[test]
fn test_solution_vector_to_dict() {
    let x = bits(2);
    let mut qubo = QuboModel::new(x[0].add(&x[1]));
    let solution = qubo.get_sol_dict(&[1.0, -1.0]).unwrap();
    assert_eq!(solution, assignment(&[("b0", 1.0), ("b1", 0.0)]));
    assert!(qubo.get_sol_dict(&[1.0]).is_err());
}

#[test]
fn test_matrix_to_model_combines_triangles() {
    let matrix = Matrix::from_rows(vec![vec![0.0, -8.0], vec![0.0, 0.0]]).unwrap();
    let qubo = qubo_matrix_to_qubo_model(&matrix).unwrap();
    assert_eq!(qubo.model().objective().unwrap().to_string(), "-8*b[0]*b[1]");

    let symmetric = Matrix::from_rows(vec![vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();
    let mut qubo = qubo_matrix_to_qubo_model(&symmetric).unwrap();
    assert_eq!(
        rows(qubo.get_matrix().unwrap()),
        vec![vec![1.0, 2.0], vec![0.0, 1.0]]
    );
}

#[test]
fn test_details_list_folded_constraints() {
    let x = bits(2);
    let mut model = BinaryModel::with_objective(x[0].clone());
    model
        .add_constraint(one_hot(&x), Some("one"), ConstraintKind::Soft, Some(2.0))
        .unwrap();
    let mut qubo = QuboModel::from(model);
    let details = qubo.details().unwrap();
    assert_eq!(details.constraints.len(), 1);
    assert_eq!(details.constraints[0].kind, ConstraintKind::Soft);
    assert_eq!(details.constraints[0].penalty, Some(2.0));

    let shown = qubo.to_string();
    assert!(shown.starts_with("QUBO Details:\n  Variables(Binary):b0\n"));
}
