// ─────────────────────────────────────────────────────────────────────
// Universe U3 — Density Kernel Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all density-kernel failures.
///
/// Pointwise singularities (NaN/Inf from poles or non-positive bases) are
/// not errors: they are substituted inside the normalizer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum U3Error {
    /// Grid specification rejected at construction (bad radius, zero count).
    #[error("invalid grid spec: {0}")]
    InvalidGridSpec(String),

    /// Field parameter outside its domain (t <= 0, zero wavelength, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Field has no strictly positive value after clipping.
    #[error("degenerate field: {0}")]
    DegenerateField(String),

    /// Raw values do not match the declared field shape.
    #[error("shape mismatch: expected {expected} values, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}

pub type U3Result<T> = Result<T, U3Error>;
