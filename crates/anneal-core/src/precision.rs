//! Bit-width checks and lossy precision adjustment for hardware that
//! accepts only small signed integer matrices.

use crate::conversion::{ising_matrix_to_qubo_matrix, qubo_matrix_to_ising_matrix};
use crate::matrix::{Matrix, MatrixError};

/// Signed width used when none is configured, one bit of which is the sign.
pub const DEFAULT_BIT_WIDTH: u32 = 8;

const ZERO_THRESHOLD: f64 = 1e-10;
const INTEGER_DECIMALS: i32 = 8;

/// Errors raised by precision checks.
#[derive(Debug, Clone, PartialEq)]
pub enum PrecisionError {
    /// No integer scaling fits the matrix into the bit width
    BitWidthExceeded { bit_width: u32 },
    /// A width without room for a sign bit and one magnitude bit
    InvalidBitWidth { bit_width: u32 },
    /// Conversion to or from Ising form failed
    Matrix(MatrixError),
}

impl PrecisionError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            PrecisionError::BitWidthExceeded { .. } => "PRECISION_BIT_WIDTH_EXCEEDED",
            PrecisionError::InvalidBitWidth { .. } => "PRECISION_INVALID_BIT_WIDTH",
            PrecisionError::Matrix(err) => err.code(),
        }
    }
}

impl std::fmt::Display for PrecisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrecisionError::BitWidthExceeded { bit_width } => write!(
                f,
                "[{}] Matrix needs more than a signed {}-bit number",
                self.code(),
                bit_width
            ),
            PrecisionError::InvalidBitWidth { bit_width } => write!(
                f,
                "[{}] Bit width must be at least 2, got {}",
                self.code(),
                bit_width
            ),
            PrecisionError::Matrix(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for PrecisionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PrecisionError::Matrix(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MatrixError> for PrecisionError {
    fn from(err: MatrixError) -> Self {
        PrecisionError::Matrix(err)
    }
}

/// Configuration for precision checks.
#[derive(Debug, Clone, Default)]
pub struct PrecisionConfig {
    /// Signed bit width including the sign bit. `None` uses 8.
    pub bit_width: Option<u32>,
}

impl PrecisionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the signed bit width.
    pub fn with_bit_width(mut self, bit_width: u32) -> Self {
        self.bit_width = Some(bit_width);
        self
    }

    /// Configured width, or [`DEFAULT_BIT_WIDTH`].
    pub fn bit_width(&self) -> u32 {
        self.bit_width.unwrap_or(DEFAULT_BIT_WIDTH)
    }
}

/// Smallest signed width an integer rescaling of a matrix needs, with the
/// factor that produces it. Both are infinite when no rescaling fits.
/// Matrices without entries above the zero threshold need only the
/// minimum width at a unit factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitWidthReport {
    pub precision: f64,
    pub multiplier: f64,
}

impl BitWidthReport {
    const TRIVIAL: Self = Self {
        precision: 2.0,
        multiplier: 1.0,
    };

    const EXHAUSTED: Self = Self {
        precision: f64::INFINITY,
        multiplier: f64::INFINITY,
    };

    /// Whether the matrix fits a signed `bit_width`-bit number.
    pub fn fits(&self, bit_width: u32) -> bool {
        self.precision <= f64::from(bit_width)
    }
}

fn magnitude_bits(bit_width: u32) -> Result<u32, PrecisionError> {
    if bit_width < 2 {
        return Err(PrecisionError::InvalidBitWidth { bit_width });
    }
    Ok(bit_width - 1)
}

/// Exclusive upper limit on integer multiples that keep `normalized_max`
/// within `bound`.
fn scaling_limit(bound: f64, normalized_max: f64) -> u64 {
    ((bound / normalized_max).floor() as u64).saturating_add(1)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Find the smallest integer multiple of `1 / min|m|` that turns every entry
/// into an integer, and the signed width the scaled matrix then needs.
pub fn calculate_ising_matrix_bit_width(
    ising: &Matrix,
    bit_width: u32,
) -> Result<BitWidthReport, PrecisionError> {
    let bits = magnitude_bits(bit_width)?;
    let entries = ising.as_slice();
    let Some(normalization) = entries
        .iter()
        .map(|value| value.abs())
        .filter(|value| *value > ZERO_THRESHOLD)
        .min_by(f64::total_cmp)
    else {
        tracing::debug!(
            component = "precision",
            operation = "calculate_bit_width",
            status = "trivial",
            "Matrix has no entries above the zero threshold"
        );
        return Ok(BitWidthReport::TRIVIAL);
    };
    let normalized_max = ising.max_abs() / normalization;
    let upper = scaling_limit(2f64.powi(bits as i32), normalized_max);

    for multiple in 1..upper {
        let scaled: Vec<f64> = entries
            .iter()
            .map(|value| value * multiple as f64 / normalization)
            .collect();
        let integral = scaled
            .iter()
            .all(|value| value.round_ties_even() == round_to(*value, INTEGER_DECIMALS));
        if !integral {
            continue;
        }
        let scaled_max = scaled
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
            .round_ties_even();
        for width in 1..=bits {
            let bound = 2f64.powi(width as i32);
            if scaled_max == bound {
                continue;
            }
            if multiple < scaling_limit(bound, normalized_max) {
                let report = BitWidthReport {
                    precision: f64::from(width + 1),
                    multiplier: multiple as f64 / normalization,
                };
                tracing::debug!(
                    component = "precision",
                    operation = "calculate_bit_width",
                    status = "success",
                    precision = report.precision,
                    multiplier = report.multiplier,
                    "Found integer scaling"
                );
                return Ok(report);
            }
        }
    }
    tracing::debug!(
        component = "precision",
        operation = "calculate_bit_width",
        status = "exhausted",
        bit_width,
        "No integer scaling fits the bit width"
    );
    Ok(BitWidthReport::EXHAUSTED)
}

/// Rescale an Ising matrix into a signed `bit_width`-bit range.
///
/// Matrices that already fit are returned unchanged. Otherwise entries are
/// scaled so the largest magnitude becomes `2^(bit_width - 1) - 1` and
/// rounded half to even, which can lose most of the information in
/// matrices with one dominant entry.
pub fn adjust_ising_matrix_precision(
    ising: &Matrix,
    bit_width: u32,
) -> Result<Matrix, PrecisionError> {
    let report = calculate_ising_matrix_bit_width(ising, bit_width)?;
    if report.fits(bit_width) {
        return Ok(ising.clone());
    }
    let bits = magnitude_bits(bit_width)?;
    let max_abs = ising.max_abs();
    if max_abs <= ZERO_THRESHOLD {
        return Ok(ising.clone());
    }
    let factor = (2f64.powi(bits as i32) - 1.0) / max_abs;
    tracing::warn!(
        component = "precision",
        operation = "adjust_ising",
        status = "lossy",
        bit_width,
        factor,
        "Rescaling Ising matrix; precision may be lost"
    );
    Ok(ising.map(|value| (factor * value).round_ties_even()))
}

/// Check a QUBO matrix through its Ising form.
pub fn check_qubo_matrix_bit_width(qubo: &Matrix, bit_width: u32) -> Result<(), PrecisionError> {
    let (ising, _) = qubo_matrix_to_ising_matrix(qubo)?;
    let report = calculate_ising_matrix_bit_width(&ising, bit_width)?;
    if !report.fits(bit_width) {
        return Err(PrecisionError::BitWidthExceeded { bit_width });
    }
    Ok(())
}

/// Rescale a QUBO matrix through its Ising form. Matrices that already fit
/// are returned unchanged.
pub fn adjust_qubo_matrix_precision(qubo: &Matrix, bit_width: u32) -> Result<Matrix, PrecisionError> {
    let (ising, _) = qubo_matrix_to_ising_matrix(qubo)?;
    let report = calculate_ising_matrix_bit_width(&ising, bit_width)?;
    if report.fits(bit_width) {
        return Ok(qubo.clone());
    }
    let adjusted = adjust_ising_matrix_precision(&ising, bit_width)?;
    let (adjusted_qubo, _) = ising_matrix_to_qubo_matrix(&adjusted, true)?;
    Ok(adjusted_qubo)
}
