//! Symbolic binary/spin expressions of degree at most two.

pub mod array;
pub mod eval;
pub mod expr;

pub use array::ExprArray;
pub use eval::{get_array_val, get_val};
pub use expr::{
    Annotations, Coefficient, ConstraintDefinition, EQ_TOLERANCE, ExprError, Expression,
    MaintainedKey, MaxDeltas, Monomial, Relation, VarKind, VarName, binary, integer,
    make_constraint, placeholder, quicksum, spin,
};
