//! Core expression type: sparse polynomial of degree at most two.
//!
//! Terms are keyed by [`Monomial`] in a `BTreeMap`, so iteration order is the
//! sorted order of tagged variable names. Coefficients may be symbolic
//! (placeholder expressions) until [`Expression::feed`] resolves them.
//!
//! Invariant: no stored coefficient is zero.

use crate::expr::annotation::{self, Annotations, MaintainedKey};
use crate::expr::coefficient::Coefficient;
use crate::expr::constraint::{ConstraintDefinition, Relation};
use crate::expr::error::ExprError;
use crate::expr::var::{Monomial, VarKind, VarName};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    terms: BTreeMap<Monomial, Coefficient>,
    offset: Coefficient,
    // Lazy-allocated side channel, merged through every combination
    annotations: Option<Annotations>,
}

pub(crate) fn accumulate(
    terms: &mut BTreeMap<Monomial, Coefficient>,
    monomial: Monomial,
    coeff: Coefficient,
) {
    if coeff.is_zero() {
        return;
    }
    match terms.entry(monomial) {
        Entry::Vacant(slot) => {
            slot.insert(coeff);
        }
        Entry::Occupied(mut slot) => {
            let sum = slot.get().add(&coeff);
            if sum.is_zero() {
                slot.remove();
            } else {
                *slot.get_mut() = sum;
            }
        }
    }
}

impl Expression {
    // ── Constructors ────────────────────────────────────────

    /// Empty expression (constant zero).
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Just a constant, no variable terms.
    pub fn from_constant(constant: f64) -> Self {
        Self {
            offset: Coefficient::Constant(constant),
            ..Default::default()
        }
    }

    /// Single term: coeff * monomial.
    pub fn term(monomial: Monomial, coeff: impl Into<Coefficient>) -> Self {
        let mut terms = BTreeMap::new();
        accumulate(&mut terms, monomial, coeff.into());
        Self {
            terms,
            ..Default::default()
        }
    }

    /// Single variable with coefficient 1.0.
    pub fn var(var: VarName) -> Self {
        Self::term(Monomial::Linear(var), 1.0)
    }

    /// Numeric terms plus offset. Duplicate monomials are merged.
    pub fn from_terms(terms: impl IntoIterator<Item = (Monomial, f64)>, offset: f64) -> Self {
        let mut merged = BTreeMap::new();
        for (monomial, coeff) in terms {
            accumulate(&mut merged, monomial, Coefficient::Constant(coeff));
        }
        Self {
            terms: merged,
            offset: Coefficient::Constant(offset),
            annotations: None,
        }
    }

    /// Symbolic constant: no variable terms, placeholder-valued offset.
    pub(crate) fn from_offset(offset: Coefficient) -> Self {
        Self {
            offset,
            ..Default::default()
        }
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn terms(&self) -> &BTreeMap<Monomial, Coefficient> {
        &self.terms
    }

    pub fn offset(&self) -> &Coefficient {
        &self.offset
    }

    pub fn coefficient(&self, monomial: &Monomial) -> Option<&Coefficient> {
        self.terms.get(monomial)
    }

    /// Numeric offset. Errors while the offset still holds placeholders.
    pub fn constant_offset(&self) -> Result<f64, ExprError> {
        self.offset.constant_value()
    }

    pub fn annotations(&self) -> Option<&Annotations> {
        self.annotations.as_ref()
    }

    pub fn annotation(&self, key: MaintainedKey) -> Option<&BTreeMap<String, serde_json::Value>> {
        self.annotations.as_ref().and_then(|all| all.get(&key))
    }

    /// Attach a named annotation entry under `key`.
    pub fn with_annotation(
        mut self,
        key: MaintainedKey,
        name: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        self.annotations
            .get_or_insert_with(Annotations::new)
            .entry(key)
            .or_default()
            .insert(name.into(), value);
        self
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty() && self.offset.is_zero()
    }

    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Max degree of any term (0 = constant only).
    pub fn degree(&self) -> usize {
        self.terms.keys().map(Monomial::degree).max().unwrap_or(0)
    }

    /// Sorted decision variables appearing in any term.
    pub fn variables(&self) -> Vec<VarName> {
        let names: BTreeSet<&VarName> = self.terms.keys().flat_map(Monomial::variables).collect();
        names.into_iter().cloned().collect()
    }

    /// Sorted placeholders appearing in any coefficient or the offset.
    pub fn placeholders(&self) -> Vec<VarName> {
        let mut names = BTreeSet::new();
        for coeff in self.terms.values().chain(std::iter::once(&self.offset)) {
            if let Coefficient::Symbolic(inner) = coeff {
                names.extend(inner.variables());
                names.extend(inner.placeholders());
            }
        }
        names.into_iter().collect()
    }

    /// Terms with numeric coefficients. Errors if any coefficient is symbolic.
    pub fn numeric_terms(&self) -> Result<Vec<(Monomial, f64)>, ExprError> {
        let placeholders = self.placeholders();
        if !placeholders.is_empty() {
            return Err(ExprError::UnresolvedPlaceholder {
                names: placeholders.iter().map(ToString::to_string).collect(),
            });
        }
        self.terms
            .iter()
            .map(|(monomial, coeff)| {
                coeff
                    .constant_value()
                    .map(|value| (monomial.clone(), value))
            })
            .collect()
    }

    // ── Operations ──────────────────────────────────────────

    /// Add another expression. Terms that cancel to zero are dropped.
    pub fn add(&self, other: &Expression) -> Self {
        let mut terms = self.terms.clone();
        for (monomial, coeff) in &other.terms {
            accumulate(&mut terms, monomial.clone(), coeff.clone());
        }
        Self {
            terms,
            offset: self.offset.add(&other.offset),
            annotations: annotation::merge(&self.annotations, &other.annotations),
        }
    }

    /// In-place accumulation used by single-pass summation.
    pub(crate) fn add_assign_ref(&mut self, other: &Expression) {
        for (monomial, coeff) in &other.terms {
            accumulate(&mut self.terms, monomial.clone(), coeff.clone());
        }
        self.offset = self.offset.add(&other.offset);
        if other.annotations.is_some() {
            self.annotations = annotation::merge(&self.annotations, &other.annotations);
        }
    }

    /// Add a constant offset.
    pub fn add_scalar(&self, value: f64) -> Self {
        Self {
            terms: self.terms.clone(),
            offset: self.offset.add(&Coefficient::Constant(value)),
            annotations: self.annotations.clone(),
        }
    }

    pub fn sub(&self, other: &Expression) -> Self {
        self.add(&other.neg())
    }

    pub fn neg(&self) -> Self {
        self.scale(-1.0)
    }

    /// Scale all terms and the offset by a factor.
    pub fn scale(&self, by: f64) -> Self {
        let mut terms = BTreeMap::new();
        for (monomial, coeff) in &self.terms {
            accumulate(&mut terms, monomial.clone(), coeff.scale(by));
        }
        Self {
            terms,
            offset: self.offset.scale(by),
            annotations: self.annotations.clone(),
        }
    }

    pub fn div(&self, by: f64) -> Result<Self, ExprError> {
        if by == 0.0 {
            return Err(ExprError::ZeroDivision);
        }
        Ok(self.scale(1.0 / by))
    }

    /// Polynomial product with binary reduction (`x * x = x`).
    ///
    /// Fails when any pair of monomials spans more than two distinct variables,
    /// even if the resulting coefficient would later cancel.
    pub fn mul(&self, other: &Expression) -> Result<Self, ExprError> {
        let mut terms = BTreeMap::new();
        for (left, left_coeff) in &self.terms {
            for (right, right_coeff) in &other.terms {
                accumulate(
                    &mut terms,
                    left.product(right)?,
                    left_coeff.mul(right_coeff)?,
                );
            }
        }
        if !other.offset.is_zero() {
            for (left, left_coeff) in &self.terms {
                accumulate(&mut terms, left.clone(), left_coeff.mul(&other.offset)?);
            }
        }
        if !self.offset.is_zero() {
            for (right, right_coeff) in &other.terms {
                accumulate(&mut terms, right.clone(), self.offset.mul(right_coeff)?);
            }
        }
        Ok(Self {
            terms,
            offset: self.offset.mul(&other.offset)?,
            annotations: annotation::merge(&self.annotations, &other.annotations),
        })
    }

    /// Integer power. Exponent 1 is the identity and 2 is self-multiplication.
    /// Other exponents are accepted only for a single unit binary monomial,
    /// for which every power equals the base.
    pub fn pow(&self, exponent: u32) -> Result<Self, ExprError> {
        match exponent {
            1 => Ok(self.clone()),
            2 => self.mul(self),
            _ if self.is_unit_binary_monomial() => Ok(self.clone()),
            _ => Err(ExprError::UnsupportedExponent { exponent }),
        }
    }

    fn is_unit_binary_monomial(&self) -> bool {
        if !self.offset.is_zero() || self.terms.len() != 1 {
            return false;
        }
        self.terms.iter().all(|(monomial, coeff)| {
            coeff.as_constant() == Some(1.0)
                && monomial
                    .variables()
                    .iter()
                    .all(|var| var.kind() == VarKind::Binary)
        })
    }

    /// Resolve every placeholder coefficient with the given values.
    pub fn feed(&self, values: &BTreeMap<String, f64>) -> Result<Self, ExprError> {
        let mut lookup = |var: &VarName| -> Result<f64, ExprError> {
            values
                .get(var.name())
                .copied()
                .ok_or_else(|| ExprError::MissingPlaceholder {
                    name: var.name().to_string(),
                })
        };

        let mut terms = BTreeMap::new();
        for (monomial, coeff) in &self.terms {
            let value = coeff.evaluate_with(&mut lookup)?;
            accumulate(&mut terms, monomial.clone(), Coefficient::Constant(value));
        }
        let offset = Coefficient::Constant(self.offset.evaluate_with(&mut lookup)?);

        tracing::debug!(
            component = "expr",
            operation = "feed",
            status = "success",
            placeholders = values.len(),
            terms_in = self.terms.len(),
            terms_out = terms.len(),
            "Resolved placeholder coefficients"
        );

        Ok(Self {
            terms,
            offset,
            annotations: self.annotations.clone(),
        })
    }

    /// `Σ coeff · Π lookup(var) + offset`.
    pub(crate) fn evaluate_with<F>(&self, lookup: &mut F) -> Result<f64, ExprError>
    where
        F: FnMut(&VarName) -> Result<f64, ExprError>,
    {
        let mut total = 0.0;
        for (monomial, coeff) in &self.terms {
            let mut product = coeff.evaluate_with(lookup)?;
            for var in monomial.variables() {
                product *= lookup(var)?;
            }
            total += product;
        }
        Ok(total + self.offset.evaluate_with(lookup)?)
    }

    // ── Comparison methods (produce ConstraintDefinition) ───

    pub fn compare_scalar(&self, relation: Relation, rhs: f64) -> ConstraintDefinition {
        ConstraintDefinition::new(self.clone(), relation, rhs)
    }

    /// Folds the right operand into the left: `self - rhs <relation> 0`.
    pub fn compare_expr(&self, relation: Relation, rhs: &Expression) -> ConstraintDefinition {
        ConstraintDefinition::new(self.sub(rhs), relation, 0.0)
    }

    pub fn eq_scalar(&self, rhs: f64) -> ConstraintDefinition {
        self.compare_scalar(Relation::Eq, rhs)
    }

    pub fn ne_scalar(&self, rhs: f64) -> ConstraintDefinition {
        self.compare_scalar(Relation::Ne, rhs)
    }

    pub fn le_scalar(&self, rhs: f64) -> ConstraintDefinition {
        self.compare_scalar(Relation::Le, rhs)
    }

    pub fn lt_scalar(&self, rhs: f64) -> ConstraintDefinition {
        self.compare_scalar(Relation::Lt, rhs)
    }

    pub fn ge_scalar(&self, rhs: f64) -> ConstraintDefinition {
        self.compare_scalar(Relation::Ge, rhs)
    }

    pub fn gt_scalar(&self, rhs: f64) -> ConstraintDefinition {
        self.compare_scalar(Relation::Gt, rhs)
    }

    pub fn eq_expr(&self, rhs: &Expression) -> ConstraintDefinition {
        self.compare_expr(Relation::Eq, rhs)
    }

    pub fn le_expr(&self, rhs: &Expression) -> ConstraintDefinition {
        self.compare_expr(Relation::Le, rhs)
    }

    pub fn ge_expr(&self, rhs: &Expression) -> ConstraintDefinition {
        self.compare_expr(Relation::Ge, rhs)
    }
}

// ── Operator overloads ──────────────────────────────────────

impl std::ops::Add for Expression {
    type Output = Expression;

    fn add(self, rhs: Expression) -> Self::Output {
        Expression::add(&self, &rhs)
    }
}

impl std::ops::Add<f64> for Expression {
    type Output = Expression;

    fn add(self, rhs: f64) -> Self::Output {
        self.add_scalar(rhs)
    }
}

impl std::ops::Sub for Expression {
    type Output = Expression;

    fn sub(self, rhs: Expression) -> Self::Output {
        Expression::sub(&self, &rhs)
    }
}

impl std::ops::Sub<f64> for Expression {
    type Output = Expression;

    fn sub(self, rhs: f64) -> Self::Output {
        self.add_scalar(-rhs)
    }
}

impl std::ops::Mul<f64> for Expression {
    type Output = Expression;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Self::Output {
        self.scale(-1.0)
    }
}
