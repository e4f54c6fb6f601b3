//! Variable names and monomials.
//!
//! Every name carries a kind tag. Ordering compares the tag first and the
//! user-visible name second, which is the same as ordering the tagged strings
//! (`b…` < `p…` < `s…`).

use crate::expr::error::ExprError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VarKind {
    Binary,
    Placeholder,
    Spin,
}

impl VarKind {
    pub fn prefix(self) -> char {
        match self {
            VarKind::Binary => 'b',
            VarKind::Placeholder => 'p',
            VarKind::Spin => 's',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Binary => "binary",
            VarKind::Placeholder => "placeholder",
            VarKind::Spin => "spin",
        }
    }

    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'b' => Some(VarKind::Binary),
            'p' => Some(VarKind::Placeholder),
            's' => Some(VarKind::Spin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarName {
    kind: VarKind,
    name: String,
}

impl VarName {
    pub fn new(kind: VarKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self::new(VarKind::Binary, name)
    }

    pub fn spin(name: impl Into<String>) -> Self {
        Self::new(VarKind::Spin, name)
    }

    pub fn placeholder(name: impl Into<String>) -> Self {
        Self::new(VarKind::Placeholder, name)
    }

    /// Parse a tagged name such as `bx[0]`.
    pub fn from_tagged(tagged: &str) -> Option<Self> {
        let mut chars = tagged.chars();
        let kind = VarKind::from_prefix(chars.next()?)?;
        Some(Self::new(kind, chars.as_str()))
    }

    pub fn kind(&self) -> VarKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tagged(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.name)
    }
}

impl std::fmt::Display for VarName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Product of one or two distinct variables. Constants live in the
/// expression offset, so there is no degree-0 monomial.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Monomial {
    Linear(VarName),
    /// Invariant: first < second.
    Quadratic(VarName, VarName),
}

impl Monomial {
    pub fn linear(var: VarName) -> Self {
        Monomial::Linear(var)
    }

    /// Product of two variables. A repeated variable collapses to the linear
    /// monomial (`x * x = x` on {0, 1}).
    pub fn pair(a: VarName, b: VarName) -> Self {
        match a.cmp(&b) {
            std::cmp::Ordering::Equal => Monomial::Linear(a),
            std::cmp::Ordering::Less => Monomial::Quadratic(a, b),
            std::cmp::Ordering::Greater => Monomial::Quadratic(b, a),
        }
    }

    pub fn degree(&self) -> usize {
        match self {
            Monomial::Linear(_) => 1,
            Monomial::Quadratic(_, _) => 2,
        }
    }

    pub fn variables(&self) -> Vec<&VarName> {
        match self {
            Monomial::Linear(a) => vec![a],
            Monomial::Quadratic(a, b) => vec![a, b],
        }
    }

    pub fn contains(&self, var: &VarName) -> bool {
        match self {
            Monomial::Linear(a) => a == var,
            Monomial::Quadratic(a, b) => a == var || b == var,
        }
    }

    /// The variable paired with `var` in a quadratic monomial.
    pub fn partner(&self, var: &VarName) -> Option<&VarName> {
        match self {
            Monomial::Quadratic(a, b) if a == var => Some(b),
            Monomial::Quadratic(a, b) if b == var => Some(a),
            _ => None,
        }
    }

    /// Product of two monomials: union of their variable sets.
    pub fn product(&self, other: &Monomial) -> Result<Monomial, ExprError> {
        let mut names: Vec<&VarName> = self.variables();
        names.extend(other.variables());
        names.sort();
        names.dedup();
        match names.as_slice() {
            [a] => Ok(Monomial::Linear((*a).clone())),
            [a, b] => Ok(Monomial::Quadratic((*a).clone(), (*b).clone())),
            _ => Err(ExprError::DegreeTooHigh {
                variables: names.iter().map(|name| name.to_string()).collect(),
            }),
        }
    }
}

impl std::fmt::Display for Monomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Monomial::Linear(a) => write!(f, "{a}"),
            Monomial::Quadratic(a, b) => write!(f, "{a}*{b}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_tagged_strings() {
        let mut names = vec![
            VarName::spin("a"),
            VarName::placeholder("z"),
            VarName::binary("y"),
            VarName::binary("x"),
        ];
        names.sort();
        let tagged: Vec<String> = names.iter().map(VarName::tagged).collect();
        assert_eq!(tagged, vec!["bx", "by", "pz", "sa"]);
    }

    #[test]
    fn tagged_round_trip() {
        let name = VarName::from_tagged("bx[0]").expect("valid tag");
        assert_eq!(name.kind(), VarKind::Binary);
        assert_eq!(name.name(), "x[0]");
        assert!(VarName::from_tagged("qx").is_none());
        assert!(VarName::from_tagged("").is_none());
    }

    #[test]
    fn pair_collapses_repeated_variable() {
        let x = VarName::binary("x");
        assert_eq!(Monomial::pair(x.clone(), x.clone()), Monomial::Linear(x));
    }

    #[test]
    fn pair_sorts_variables() {
        let m = Monomial::pair(VarName::binary("y"), VarName::binary("x"));
        assert_eq!(
            m,
            Monomial::Quadratic(VarName::binary("x"), VarName::binary("y"))
        );
        assert_eq!(m.partner(&VarName::binary("x")), Some(&VarName::binary("y")));
    }

    #[test]
    fn product_rejects_three_variables() {
        let xy = Monomial::pair(VarName::binary("x"), VarName::binary("y"));
        let z = Monomial::linear(VarName::binary("z"));
        let err = xy.product(&z).unwrap_err();
        assert_eq!(err.code(), "EXPR_DEGREE_TOO_HIGH");
    }

    #[test]
    fn product_is_idempotent_on_shared_variables() {
        let xy = Monomial::pair(VarName::binary("x"), VarName::binary("y"));
        let x = Monomial::linear(VarName::binary("x"));
        assert_eq!(xy.product(&x).unwrap(), xy);
        assert_eq!(xy.product(&xy).unwrap(), xy);
    }
}
