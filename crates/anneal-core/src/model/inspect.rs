//! Human-readable QUBO details.

use anneal_expr::{Coefficient, Expression, MaintainedKey, VarKind, VarName};

use crate::model::ConstraintKind;

/// A constraint folded into a QUBO expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintView {
    pub name: String,
    pub kind: ConstraintKind,
    pub relation: Option<String>,
    pub penalty: Option<f64>,
}

/// Summary of a QUBO expression.
#[derive(Debug, Clone, PartialEq)]
pub struct QuboDetails {
    /// Kind shared by every variable; `None` for a constant expression.
    pub kind: Option<VarKind>,
    pub variables: Vec<String>,
    pub placeholders: Vec<String>,
    pub offset: String,
    /// Rendered monomial (`a, b`) and coefficient.
    pub coefficients: Vec<(String, String)>,
    pub constraints: Vec<ConstraintView>,
}

impl QuboDetails {
    pub fn from_expression(expr: &Expression) -> Self {
        let variables = expr.variables();
        let coefficients = expr
            .terms()
            .iter()
            .map(|(monomial, coeff)| {
                let names: Vec<&str> = monomial.variables().into_iter().map(VarName::name).collect();
                let value = match coeff {
                    Coefficient::Constant(value) => value.to_string(),
                    Coefficient::Symbolic(inner) => inner.to_string(),
                };
                (names.join(", "), value)
            })
            .collect();

        let mut constraints = Vec::new();
        for (key, kind) in [
            (MaintainedKey::HardConstraint, ConstraintKind::Hard),
            (MaintainedKey::SoftConstraint, ConstraintKind::Soft),
        ] {
            for (name, info) in expr.annotation(key).into_iter().flatten() {
                constraints.push(ConstraintView {
                    name: name.clone(),
                    kind,
                    relation: info
                        .get("relation")
                        .and_then(|value| value.as_str())
                        .map(str::to_string),
                    penalty: info.get("penalty").and_then(|value| value.as_f64()),
                });
            }
        }

        Self {
            kind: variables.first().map(|var| var.kind()),
            variables: variables.iter().map(|var| var.name().to_string()).collect(),
            placeholders: expr
                .placeholders()
                .iter()
                .map(|var| var.name().to_string())
                .collect(),
            offset: expr.offset().to_string(),
            coefficients,
            constraints,
        }
    }
}

impl std::fmt::Display for QuboDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            Some(VarKind::Spin) => "Spin):  ",
            _ => "Binary):",
        };
        writeln!(f, "QUBO Details:")?;
        writeln!(f, "  Variables({kind}{}", self.variables.join(", "))?;
        if !self.placeholders.is_empty() {
            writeln!(f, "  Placeholders:     {}", self.placeholders.join(", "))?;
        }
        writeln!(f, "  QUBO offset:      {}", self.offset)?;
        writeln!(f, "  QUBO coefficients:")?;
        let width = self
            .coefficients
            .iter()
            .map(|(key, _)| key.len())
            .max()
            .unwrap_or(0)
            + 1;
        for (key, value) in &self.coefficients {
            writeln!(f, "    {key:<width$}: {value}")?;
        }
        if !self.constraints.is_empty() {
            writeln!(f, "  Constraints:")?;
            for view in &self.constraints {
                write!(f, "    {} ({}", view.name, view.kind)?;
                if let Some(relation) = &view.relation {
                    write!(f, ", {relation}")?;
                }
                write!(f, ")")?;
                if let Some(penalty) = view.penalty {
                    write!(f, " penalty={penalty}")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anneal_expr::{binary, placeholder};

    #[test]
    fn renders_binary_details() {
        let (a, b) = (binary("a"), binary("b"));
        let expr = a.mul(&b).unwrap() * 3.0 + a * 4.0 + 2.0;
        let rendered = QuboDetails::from_expression(&expr).to_string();
        assert_eq!(
            rendered,
            "QUBO Details:\n  Variables(Binary):a, b\n  QUBO offset:      2\n  QUBO coefficients:\n    a    : 4\n    a, b : 3\n"
        );
    }

    #[test]
    fn lists_placeholders_and_constraints() {
        let expr = binary("x")
            .mul(&placeholder("w"))
            .unwrap()
            .with_annotation(
                MaintainedKey::HardConstraint,
                "cap",
                serde_json::json!({"relation": "<=", "penalty": 2.0}),
            );
        let details = QuboDetails::from_expression(&expr);
        assert_eq!(details.placeholders, vec!["w".to_string()]);
        assert_eq!(
            details.constraints,
            vec![ConstraintView {
                name: "cap".into(),
                kind: ConstraintKind::Hard,
                relation: Some("<=".into()),
                penalty: Some(2.0),
            }]
        );
        let rendered = details.to_string();
        assert!(rendered.contains("  Placeholders:     w\n"));
        assert!(rendered.contains("    cap (hard, <=) penalty=2\n"));
    }
}
