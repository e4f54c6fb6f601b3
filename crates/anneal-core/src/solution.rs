//! Mapping spin vectors back to named binary assignments.

use std::collections::BTreeMap;

use crate::matrix::MatrixError;
use crate::model::AUX_SPIN;

/// Read a spin vector through a variable index, mapping each spin `s` to
/// the binary value `(s + 1) / 2`. The auxiliary spin is skipped, so the
/// vector may omit it.
pub fn get_sol_dict(
    spins: &[f64],
    variables: &BTreeMap<String, usize>,
) -> Result<BTreeMap<String, f64>, MatrixError> {
    let mut solution = BTreeMap::new();
    for (name, idx) in variables {
        if name == AUX_SPIN {
            continue;
        }
        let spin = spins.get(*idx).ok_or(MatrixError::DimensionMismatch {
            expected: idx + 1,
            found: spins.len(),
        })?;
        solution.insert(name.clone(), (spin + 1.0) / 2.0);
    }
    Ok(solution)
}
