use super::support::{assignment, bits, one_hot};
use super::*;
use anneal_expr::MaintainedKey;

fn one_hot_model(kind: ConstraintKind) -> BinaryModel {
    let x = bits(3);
    let mut model = BinaryModel::with_objective(x[1].clone() + x[2].scale(2.0));
    model
        .add_constraint(one_hot(&x), Some("pick"), kind, None)
        .unwrap();
    model
}

#[test]
fn test_compile_is_lazy_and_incremental() {
    let mut model = one_hot_model(ConstraintKind::Hard);
    assert!(!model.is_compiled());
    assert!(model.compiled_constraints(ConstraintKind::Hard).is_empty());

    model.compile_constraints().unwrap();
    assert!(model.is_compiled());
    model.set_penalty("pick", 4.0).unwrap();

    let x = bits(2);
    model
        .add_constraint(one_hot(&x), Some("pair"), ConstraintKind::Hard, None)
        .unwrap();
    model.compile_constraints().unwrap();
    assert_eq!(model.penalty("pick").unwrap(), 4.0);
    assert_eq!(model.penalty("pair").unwrap(), 1.0);
}

#[test]
fn test_initialize_hard_penalty_uses_objective_deltas() {
    let mut model = one_hot_model(ConstraintKind::Hard);
    model.initialize_penalties().unwrap();
    assert_eq!(model.penalty("pick").unwrap(), 2.0);
}

#[test]
fn test_initialize_soft_penalty_matches_averages() {
    let mut model = one_hot_model(ConstraintKind::Soft);
    model.initialize_penalties().unwrap();
    // objective average 1.5, compiled (b0 + b1 + b2 - 1)² average 1.5
    assert_eq!(model.penalty("pick").unwrap(), 1.0);
}

#[test]
fn test_initialize_without_objective() {
    let x = bits(2);
    let mut model = BinaryModel::new();
    model
        .add_constraint(one_hot(&x), Some("hard"), ConstraintKind::Hard, None)
        .unwrap();
    model
        .add_constraint(one_hot(&x), Some("soft"), ConstraintKind::Soft, None)
        .unwrap();
    model.initialize_penalties().unwrap();
    assert_eq!(model.penalty("hard").unwrap(), 1.0);
    assert_eq!(model.penalty("soft").unwrap(), 1.0);
}

#[test]
fn test_penalty_tuning_by_name() {
    let mut model = one_hot_model(ConstraintKind::Hard);
    model.set_penalty("pick", 2.0).unwrap();
    model.penalize_more("pick").unwrap();
    assert_eq!(model.penalty("pick").unwrap(), 4.0);
    model.penalize_less("pick").unwrap();
    assert_eq!(model.penalty("pick").unwrap(), 3.0);

    let err = model.set_penalty("missing", 1.0).unwrap_err();
    assert_eq!(
        err,
        ModelError::ConstraintNotFound {
            name: "missing".into()
        }
    );
    assert!(model.penalty("missing").is_err());
}

#[test]
fn test_penalty_before_compile_uses_default() {
    let x = bits(2);
    let mut model = BinaryModel::new();
    model
        .add_constraint(one_hot(&x), Some("c"), ConstraintKind::Hard, Some(7.0))
        .unwrap();
    assert_eq!(model.penalty("c").unwrap(), 7.0);
    model.compile_constraints().unwrap();
    assert_eq!(model.penalty("c").unwrap(), 7.0);
}

#[test]
fn test_cleared_handler_blocks_compilation() {
    let mut model = one_hot_model(ConstraintKind::Hard);
    model.clear_constraint_handler();
    let err = model.compile_constraints().unwrap_err();
    assert_eq!(err, ModelError::ConstraintHandlerUnset);

    model.set_constraint_handler(ConstraintHandler::PenaltyMethod);
    model.compile_constraints().unwrap();
    assert_eq!(model.compiled_constraints(ConstraintKind::Hard).len(), 1);
}

#[test]
fn test_constraint_expressions_are_weighted_and_annotated() {
    let mut model = one_hot_model(ConstraintKind::Hard);
    model.set_penalty("pick", 3.0).unwrap();
    let exprs = model.constraints_expr_list().unwrap();
    assert_eq!(exprs.len(), 1);

    let compiled = &model.compiled_constraints(ConstraintKind::Hard)["pick"];
    assert_eq!(exprs[0].terms(), compiled.expr().scale(3.0).terms());

    let info = &exprs[0].annotation(MaintainedKey::HardConstraint).unwrap()["pick"];
    assert_eq!(info["relation"], "==");
    assert_eq!(info["penalty"], 3.0);
}

#[test]
fn test_verify_constraint_counts_violations() {
    let model = one_hot_model(ConstraintKind::Hard);

    let feasible = assignment(&[("b0", 1.0)]);
    let (unsatisfied, values) = model
        .verify_constraint(&feasible, ConstraintKind::Hard)
        .unwrap();
    assert_eq!(unsatisfied, 0);
    assert_eq!(values["pick"], 1.0);

    let infeasible = assignment(&[("b1", 1.0), ("b2", 1.0)]);
    let (unsatisfied, values) = model
        .verify_constraint(&infeasible, ConstraintKind::Hard)
        .unwrap();
    assert_eq!(unsatisfied, 1);
    assert_eq!(values["pick"], 2.0);
    assert_eq!(model.get_value(&infeasible).unwrap(), 3.0);

    let (soft_unsatisfied, soft_values) = model
        .verify_constraint(&infeasible, ConstraintKind::Soft)
        .unwrap();
    assert_eq!(soft_unsatisfied, 0);
    assert!(soft_values.is_empty());
}

#[test]
fn test_compile_error_names_constraint() {
    let x = bits(2);
    let mut model = BinaryModel::new();
    model
        .add_constraint(
            x[0].compare_scalar(Relation::Ne, 1.0),
            Some("ne"),
            ConstraintKind::Hard,
            None,
        )
        .unwrap();
    let err = model.compile_constraints().unwrap_err();
    assert_eq!(
        err,
        ModelError::UnsupportedRelation {
            name: "ne".into(),
            relation: "!=".into()
        }
    );
}
