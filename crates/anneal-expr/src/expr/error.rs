//! Expression construction and evaluation errors.

#[derive(Debug, Clone, PartialEq)]
pub enum ExprError {
    /// A product would contain a monomial over more than two variables.
    DegreeTooHigh { variables: Vec<String> },
    /// Exponent other than 1 or 2 on a base that is not a unit binary monomial.
    UnsupportedExponent { exponent: u32 },
    /// `feed` was called without a value for this placeholder.
    MissingPlaceholder { name: String },
    /// A numeric-only operation met placeholder coefficients.
    UnresolvedPlaceholder { names: Vec<String> },
    /// Integer variable range is empty.
    InvalidIntegerRange { min: i64, max: i64 },
    /// Array shape is empty or has a zero-length axis.
    InvalidShape { reason: String },
    /// Array operands do not line up.
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },
    /// Division by a zero scalar.
    ZeroDivision,
    /// Relation string is not one of `==, !=, >, >=, <, <=`.
    UnknownRelation { relation: String },
}

impl ExprError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ExprError::DegreeTooHigh { .. } => "EXPR_DEGREE_TOO_HIGH",
            ExprError::UnsupportedExponent { .. } => "EXPR_UNSUPPORTED_EXPONENT",
            ExprError::MissingPlaceholder { .. } => "PLACEHOLDER_MISSING_VALUE",
            ExprError::UnresolvedPlaceholder { .. } => "PLACEHOLDER_UNRESOLVED",
            ExprError::InvalidIntegerRange { .. } => "INTEGER_INVALID_RANGE",
            ExprError::InvalidShape { .. } => "ARRAY_INVALID_SHAPE",
            ExprError::ShapeMismatch { .. } => "ARRAY_SHAPE_MISMATCH",
            ExprError::ZeroDivision => "EXPR_ZERO_DIVISION",
            ExprError::UnknownRelation { .. } => "CONSTRAINT_UNKNOWN_RELATION",
        }
    }
}

impl std::fmt::Display for ExprError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprError::DegreeTooHigh { variables } => write!(
                f,
                "[{}] Items higher than quadratic: {}",
                self.code(),
                variables.join("*")
            ),
            ExprError::UnsupportedExponent { exponent } => write!(
                f,
                "[{}] Exponent {} is only allowed on a single unit binary monomial",
                self.code(),
                exponent
            ),
            ExprError::MissingPlaceholder { name } => {
                write!(f, "[{}] No value fed for placeholder {}", self.code(), name)
            }
            ExprError::UnresolvedPlaceholder { names } => write!(
                f,
                "[{}] Expression still depends on placeholders: {}",
                self.code(),
                names.join(", ")
            ),
            ExprError::InvalidIntegerRange { min, max } => write!(
                f,
                "[{}] Integer range invalid: max ({}) must exceed min ({})",
                self.code(),
                max,
                min
            ),
            ExprError::InvalidShape { reason } => {
                write!(f, "[{}] Invalid array shape: {}", self.code(), reason)
            }
            ExprError::ShapeMismatch { left, right } => write!(
                f,
                "[{}] Shapes {:?} and {:?} are not aligned",
                self.code(),
                left,
                right
            ),
            ExprError::ZeroDivision => write!(f, "[{}] Division by zero", self.code()),
            ExprError::UnknownRelation { relation } => write!(
                f,
                "[{}] Unknown relation '{}' (expected ==, !=, >, >=, <, <=)",
                self.code(),
                relation
            ),
        }
    }
}

impl std::error::Error for ExprError {}
