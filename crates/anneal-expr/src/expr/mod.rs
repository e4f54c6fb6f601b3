//! Expression types for QUBO and Ising modeling.
//!
//! - `var`         - VarKind, VarName, Monomial
//! - `coefficient` - Coefficient: numeric or placeholder expression
//! - `core`        - Expression: sparse degree-2 polynomial + offset
//! - `annotation`  - side-channel data merged through the algebra
//! - `constraint`  - Relation and ConstraintDefinition
//! - `builders`    - binary, spin, integer, placeholder, quicksum
//! - `deltas`      - max flip deltas and coefficient statistics
//! - `error`       - Expression construction errors

pub mod annotation;
pub mod builders;
pub mod coefficient;
pub mod constraint;
pub mod core;
pub mod deltas;
mod display;
pub mod error;
pub mod var;

pub use annotation::{Annotations, MaintainedKey};
pub use builders::{binary, integer, placeholder, quicksum, spin};
pub use coefficient::Coefficient;
pub use constraint::{ConstraintDefinition, EQ_TOLERANCE, Relation, make_constraint};
pub use self::core::Expression;
pub use deltas::MaxDeltas;
pub use error::ExprError;
pub use var::{Monomial, VarKind, VarName};
