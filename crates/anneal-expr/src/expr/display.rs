//! Human-readable rendering, e.g. `2*a*c+4*a+b*c+2`.

use crate::expr::coefficient::Coefficient;
use crate::expr::core::Expression;

fn strip_unit(rendered: String) -> String {
    if rendered.len() > 2 {
        if let Some(rest) = rendered.strip_prefix("1*") {
            return rest.to_string();
        }
        if let Some(rest) = rendered.strip_prefix("-1*") {
            return format!("-{rest}");
        }
    }
    rendered
}

fn push_signed(out: &mut String, piece: &str) {
    if out.is_empty() || piece.starts_with('-') {
        out.push_str(piece);
    } else {
        out.push('+');
        out.push_str(piece);
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        for (monomial, coeff) in self.terms() {
            let coeff_str = match coeff {
                Coefficient::Symbolic(inner) => format!("({inner})"),
                Coefficient::Constant(value) => value.to_string(),
            };
            let mut piece = coeff_str;
            for var in monomial.variables() {
                piece.push('*');
                piece.push_str(var.name());
            }
            push_signed(&mut out, &strip_unit(piece));
        }
        if !(self.offset().is_zero() && !out.is_empty()) {
            push_signed(&mut out, &self.offset().to_string());
        }
        f.write_str(&strip_unit(out))
    }
}

#[cfg(test)]
mod tests {
    use crate::expr::{Expression, binary, placeholder, spin};

    #[test]
    fn renders_terms_in_order_with_offset() {
        let (a, b, c) = (binary("a"), binary("b"), binary("c"));
        let e = a.mul(&c).unwrap() * 2.0
            + a.clone() * 4.0
            + b.mul(&c).unwrap()
            + a.mul(&b).unwrap() * 3.0
            + 2.0;
        assert_eq!(e.to_string(), "4*a+3*a*b+2*a*c+b*c+2");
    }

    #[test]
    fn renders_negative_terms_without_plus() {
        let e = binary("x") * -1.0 - binary("y") * 2.5 - 1.0;
        assert_eq!(e.to_string(), "-x-2.5*y-1");
    }

    #[test]
    fn renders_zero() {
        assert_eq!(Expression::new_empty().to_string(), "0");
    }

    #[test]
    fn renders_spin_and_placeholders() {
        assert_eq!(spin("s").to_string(), "2*s-1");
        let e = binary("x").mul(&(placeholder("p") * 2.0)).unwrap();
        assert_eq!(e.to_string(), "(2*p)*x");
    }
}
