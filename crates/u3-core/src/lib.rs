// ─────────────────────────────────────────────────────────────────────
// Universe U3 — Field Pipeline Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Field pipeline and phase-series orchestration for the U3 density
//! kernel.
//!
//! # Invariants
//!
//! 1. **Validation happens before evaluation**: invalid grids fail in
//!    `FieldPipeline::new`, invalid parameters fail when the evaluator is
//!    built. No partially evaluated field is ever returned.
//!
//! 2. **Singular points never abort**: NaN and ±Inf densities are
//!    substituted with 0.0 inside the normalizer, before the percentile is
//!    taken, and counted in `NormalizedField::substituted`.
//!
//! 3. **One normalization scope per field**: the normalizer is stateless.
//!    Phases in a `PhaseSeries` cannot influence each other's scaling,
//!    whether they run sequentially or on the rayon pool.
//!
//! 4. **Index correspondence**: field values, mesh coordinates and render
//!    geometry share the r-major mesh order for every grid dimensionality.

pub mod phase;
pub mod pipeline;

pub use phase::{PhaseOutcome, PhaseResult, PhaseSeries};
pub use pipeline::{FieldPipeline, FrameGeometry, RadialProfile, RenderFrame};
