// ─────────────────────────────────────────────────────────────────────
// Universe U3 — Density Field Physics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Density-field physics for the U3 toy cosmology: coordinate grids,
//! angle-dependent fractal dimension laws, density evaluation,
//! percentile normalization, and spherical → Cartesian transforms.
//!
//! Data flow:
//!   CoordinateGrid → DensityEvaluator (+ DimensionSource)
//!     → FieldNormalizer → transform::to_cartesian → renderer

pub mod density;
pub mod dimension;
pub mod grid;
pub mod normalize;
pub mod params;
pub mod transform;

pub use density::{fractal_density, zeta_density, DensityEvaluator, DensityLaw};
pub use dimension::{evaluate_dimensions, DimensionSource, ExternalDimension};
pub use grid::{linspace, logspace, CoordinateGrid, Mesh};
pub use normalize::{percentile, FieldNormalizer, DEFAULT_CLIP_PERCENTILE};
pub use params::{zeta_phases, CONTOUR_LEVELS, ZETA_VALUES};
pub use transform::{polar_coordinates, spherical_to_cartesian, to_cartesian};
