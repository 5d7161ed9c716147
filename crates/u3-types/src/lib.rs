// ─────────────────────────────────────────────────────────────────────
// Universe U3 — Density Kernel Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the U3
//! density-field kernel.

pub mod config;
pub mod error;
pub mod field;

pub use config::{
    AngularAxis, DimensionFormula, FieldParameters, GridSpec, Phase, PipelineConfig, RadialAxis,
    RadialSampling, TemporalScaling, ZetaParameters,
};
pub use error::{U3Error, U3Result};
pub use field::{
    sanitize_value, CartesianPoints, FieldShape, FieldStats, NormalizedField, ScalarField,
};
