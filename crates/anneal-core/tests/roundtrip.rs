use anneal_core::{
    Matrix, QuboModel, calculate_qubo_value, hamiltonian, ising_matrix_to_qubo_matrix,
    qubo_matrix_to_ising_matrix, qubo_matrix_to_qubo_model,
};
use proptest::prelude::*;

fn square_matrix() -> impl Strategy<Value = Matrix> {
    (1usize..=4).prop_flat_map(|n| {
        prop::collection::vec(-20i32..=20, n * n).prop_map(move |entries| {
            let rows = entries
                .chunks(n)
                .map(|row| row.iter().map(|value| f64::from(*value) / 2.0).collect())
                .collect();
            Matrix::from_rows(rows).expect("square rows")
        })
    })
}

fn bit_vectors(n: usize) -> Vec<Vec<f64>> {
    (0..1usize << n)
        .map(|mask| (0..n).map(|bit| ((mask >> bit) & 1) as f64).collect())
        .collect()
}

fn with_aux(bits: &[f64]) -> Vec<f64> {
    let mut spins: Vec<f64> = bits.iter().map(|x| 2.0 * x - 1.0).collect();
    spins.push(1.0);
    spins
}

// Property: Ising energy plus the conversion offset equals the QUBO value
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]
    #[test]
    fn test_ising_energy_plus_offset_is_qubo_value(qubo in square_matrix()) {
        let (ising, offset) = qubo_matrix_to_ising_matrix(&qubo).unwrap();
        for bits in bit_vectors(qubo.rows()) {
            let value = calculate_qubo_value(&qubo, 0.0, &bits).unwrap();
            let energy = hamiltonian(&ising, &[with_aux(&bits)]).unwrap()[0];
            prop_assert!(
                (energy + offset - value).abs() < 1e-9,
                "Energy {} + offset {} differs from value {}", energy, offset, value
            );
        }
    }
}

// Property: QUBO to Ising and back keeps every assignment's value
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]
    #[test]
    fn test_qubo_ising_qubo_preserves_values(qubo in square_matrix()) {
        let (ising, ising_offset) = qubo_matrix_to_ising_matrix(&qubo).unwrap();
        let (back, qubo_offset) = ising_matrix_to_qubo_matrix(&ising, true).unwrap();
        prop_assert!(back.is_upper_triangular());
        for bits in bit_vectors(qubo.rows()) {
            let original = calculate_qubo_value(&qubo, 0.0, &bits).unwrap();
            let restored = calculate_qubo_value(&back, qubo_offset + ising_offset, &bits).unwrap();
            prop_assert!(
                (original - restored).abs() < 1e-9,
                "Failed for bits {:?}", bits
            );
        }
    }
}

// Property: matrix to model to matrix keeps every assignment's value
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]
    #[test]
    fn test_matrix_model_matrix_preserves_values(qubo in square_matrix()) {
        let mut model: QuboModel = qubo_matrix_to_qubo_model(&qubo).unwrap();
        let n = qubo.rows();
        let made = model.get_matrix().unwrap().clone();
        let offset = model.get_offset().unwrap();
        let order: Vec<usize> = {
            let variables = model.get_variables().unwrap();
            (0..n)
                .map(|i| variables.get(&format!("b[{i}]")).copied().unwrap_or(usize::MAX))
                .collect()
        };
        prop_assert!(made.is_upper_triangular());
        for bits in bit_vectors(n) {
            let original = calculate_qubo_value(&qubo, 0.0, &bits).unwrap();
            let mut permuted = vec![0.0; made.rows()];
            for (i, bit) in bits.iter().enumerate() {
                if order[i] != usize::MAX {
                    permuted[order[i]] = *bit;
                }
            }
            let restored = calculate_qubo_value(&made, offset, &permuted).unwrap();
            prop_assert!(
                (original - restored).abs() < 1e-9,
                "Failed for bits {:?}", bits
            );
        }
    }
}
