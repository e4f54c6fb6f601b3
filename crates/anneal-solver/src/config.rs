//! Optimizer configuration types.

/// Largest matrix the brute-force optimizer enumerates when no limit is set.
pub const DEFAULT_MAX_VARIABLES: usize = 24;

/// Configuration options for optimizer behavior.
#[derive(Debug, Clone, Default)]
pub struct OptimizerConfig {
    /// Largest Ising matrix dimension accepted. `None` uses
    /// [`DEFAULT_MAX_VARIABLES`].
    pub max_variables: Option<usize>,
    /// Flip every solution so its last spin is +1. `None` means enabled.
    pub normalize_sign: Option<bool>,
}

impl OptimizerConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the largest accepted matrix dimension.
    pub fn with_max_variables(mut self, limit: usize) -> Self {
        self.max_variables = Some(limit);
        self
    }

    /// Enable or disable sign normalization.
    pub fn with_normalize_sign(mut self, enabled: bool) -> Self {
        self.normalize_sign = Some(enabled);
        self
    }

    pub fn max_variables_or_default(&self) -> usize {
        self.max_variables.unwrap_or(DEFAULT_MAX_VARIABLES)
    }

    pub fn normalize_sign_or_default(&self) -> bool {
        self.normalize_sign.unwrap_or(true)
    }

    /// Check if this configuration is completely empty (all defaults).
    pub fn is_empty(&self) -> bool {
        self.max_variables.is_none() && self.normalize_sign.is_none()
    }
}
