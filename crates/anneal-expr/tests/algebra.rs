use anneal_expr::{Expression, binary, get_val, integer, quicksum};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

const NAMES: [&str; 3] = ["a", "b", "c"];

fn linear(coeffs: &[i32], offset: i32) -> Expression {
    let terms: Vec<Expression> = NAMES
        .iter()
        .zip(coeffs)
        .map(|(name, coeff)| binary(*name).scale(f64::from(*coeff)))
        .collect();
    quicksum(&terms).add_scalar(f64::from(offset))
}

fn assignment(mask: u8) -> BTreeMap<String, f64> {
    NAMES
        .iter()
        .enumerate()
        .map(|(bit, name)| (name.to_string(), f64::from((mask >> bit) & 1)))
        .collect()
}

#[test]
fn test_binary_square_is_idempotent() {
    let x = binary("x");
    assert_eq!(x.pow(2).unwrap(), x);
    assert_eq!(x.mul(&x).unwrap(), x);
}

#[test]
fn test_degree_three_products_are_rejected() {
    let ab = binary("a").mul(&binary("b")).unwrap();
    let err = ab.mul(&binary("c")).unwrap_err();
    assert_eq!(err.code(), "EXPR_DEGREE_TOO_HIGH");
}

// Property: the value of a sum is the sum of the values
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]
    #[test]
    fn test_sum_value_is_sum_of_values(
        left in prop::collection::vec(-5i32..=5, 3),
        right in prop::collection::vec(-5i32..=5, 3),
        offsets in (-5i32..=5, -5i32..=5)
    ) {
        let (l, r) = (linear(&left, offsets.0), linear(&right, offsets.1));
        let total = l.add(&r);
        for mask in 0..8u8 {
            let solution = assignment(mask);
            let expected = get_val(&l, &solution).unwrap() + get_val(&r, &solution).unwrap();
            prop_assert_eq!(get_val(&total, &solution).unwrap(), expected,
                "Failed for mask {:#05b}", mask);
        }
    }
}

// Property: the value of a product is the product of the values
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]
    #[test]
    fn test_product_value_is_product_of_values(
        left in prop::collection::vec(-4i32..=4, 3),
        right in prop::collection::vec(-4i32..=4, 3),
        offsets in (-3i32..=3, -3i32..=3)
    ) {
        let (l, r) = (linear(&left, offsets.0), linear(&right, offsets.1));
        let product = l.mul(&r).unwrap();
        prop_assert!(product.degree() <= 2);
        for mask in 0..8u8 {
            let solution = assignment(mask);
            let expected = get_val(&l, &solution).unwrap() * get_val(&r, &solution).unwrap();
            prop_assert_eq!(get_val(&product, &solution).unwrap(), expected,
                "Failed for mask {:#05b}", mask);
        }
    }
}

// Property: an integer variable reaches every value in its range and nothing else
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]
    #[test]
    fn test_integer_covers_exactly_its_range(
        min in -6i64..6,
        span in 1i64..20
    ) {
        let max = min + span;
        let expr = integer("n", min, max).unwrap();
        let bits: Vec<String> = expr.variables().iter().map(|var| var.name().to_string()).collect();
        let mut reached = BTreeSet::new();
        for mask in 0..(1u32 << bits.len()) {
            let solution: BTreeMap<String, f64> = bits
                .iter()
                .enumerate()
                .map(|(bit, name)| (name.clone(), f64::from((mask >> bit) & 1)))
                .collect();
            reached.insert(get_val(&expr, &solution).unwrap() as i64);
        }
        let expected: BTreeSet<i64> = (min..=max).collect();
        prop_assert_eq!(reached, expected, "Failed for range {}..={}", min, max);
    }
}
