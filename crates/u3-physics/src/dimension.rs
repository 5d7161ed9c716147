// ─────────────────────────────────────────────────────────────────────
// Universe U3 — Fractal Dimension Functions
// ─────────────────────────────────────────────────────────────────────
//! Angle-dependent fractal dimension D(θ).
//!
//! The density law scales as r^(D(θ) - 3). The closed set of built-in
//! laws is `DimensionFormula`; any other law can be plugged in through
//! `ExternalDimension`. The tangent variants are not guarded at their
//! poles: non-finite output is left for the normalizer to substitute.

use u3_types::DimensionFormula;

/// Trait for D(θ) sources. Pure function of the polar angle.
pub trait DimensionSource: Send + Sync {
    fn dimension(&self, theta: f64) -> f64;

    /// Label for titles and logs.
    fn label(&self) -> String {
        "D(θ) (custom)".to_string()
    }
}

impl DimensionSource for DimensionFormula {
    #[inline]
    fn dimension(&self, theta: f64) -> f64 {
        let (s, c) = theta.sin_cos();
        match self {
            DimensionFormula::Sine => 2.5 + 0.5 * s,
            DimensionFormula::SineCosineSum => 4.5 + 0.7 * s + 2.5 + 0.5 * c,
            DimensionFormula::TangentProduct => {
                7.5 + 0.9 * s * c * theta.tan() + 4.5 + 0.7 * c + s
            }
            DimensionFormula::TangentCosineSquared => {
                (7.5 + 0.9 * s * c * theta.tan()) + (4.5 + 0.7 * c * c) + s
            }
        }
    }

    fn label(&self) -> String {
        DimensionFormula::label(self).to_string()
    }
}

type DimensionFn = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// D(θ) supplied by an arbitrary closure.
///
/// Used by the PyO3 layer to let Python define the dimension law while
/// grid evaluation and normalization stay in Rust.
pub struct ExternalDimension {
    dimension_fn: DimensionFn,
    label: String,
}

impl ExternalDimension {
    pub fn new(
        label: impl Into<String>,
        dimension_fn: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            dimension_fn: Box::new(dimension_fn),
            label: label.into(),
        }
    }
}

impl DimensionSource for ExternalDimension {
    fn dimension(&self, theta: f64) -> f64 {
        (self.dimension_fn)(theta)
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

/// Evaluate `source` elementwise over an angular sequence.
pub fn evaluate_dimensions(source: &dyn DimensionSource, thetas: &[f64]) -> Vec<f64> {
    thetas.iter().map(|&theta| source.dimension(theta)).collect()
}
