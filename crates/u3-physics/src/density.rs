// ─────────────────────────────────────────────────────────────────────
// Universe U3 — Density Evaluator
// ─────────────────────────────────────────────────────────────────────
//! Raw density laws evaluated over a coordinate grid.
//!
//!   fractal: ρ(r, θ, t) = t^(-α) · r^(D(θ) - 3)
//!   zeta:    ρ(r)       = max(0, ρ₀ · (1 + ζ · sin(2πr / λ)))
//!
//! Parameters are validated once at construction. Evaluation never
//! aborts on a single point: a singular point yields a non-finite entry.

use std::sync::Arc;

use rayon::prelude::*;

use u3_types::{
    FieldParameters, ScalarField, TemporalScaling, U3Result, ZetaParameters,
};

use crate::dimension::DimensionSource;
use crate::grid::CoordinateGrid;

/// t^(-α) · r^(D - 3).
#[inline]
pub fn fractal_density(r: f64, dimension: f64, temporal_factor: f64) -> f64 {
    temporal_factor * r.powf(dimension - 3.0)
}

/// max(0, ρ₀ · (1 + ζ · sin(2πr / λ))). The floor is part of the law.
#[inline]
pub fn zeta_density(r: f64, params: &ZetaParameters) -> f64 {
    let phase = std::f64::consts::TAU * r / params.wavelength;
    let rho = params.rho_0 * (1.0 + params.zeta * phase.sin());
    if rho > 0.0 {
        rho
    } else {
        0.0
    }
}

/// The active density law.
#[derive(Clone)]
pub enum DensityLaw {
    Fractal {
        source: Arc<dyn DimensionSource>,
        /// Precomputed t^(-α); 1.0 when no temporal scaling applies.
        temporal_factor: f64,
    },
    Zeta(ZetaParameters),
}

impl std::fmt::Debug for DensityLaw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DensityLaw::Fractal {
                source,
                temporal_factor,
            } => f
                .debug_struct("Fractal")
                .field("source", &source.label())
                .field("temporal_factor", temporal_factor)
                .finish(),
            DensityLaw::Zeta(z) => f.debug_tuple("Zeta").field(z).finish(),
        }
    }
}

/// Combines a grid with a density law into a `ScalarField`.
#[derive(Debug, Clone)]
pub struct DensityEvaluator {
    law: DensityLaw,
    parallel: bool,
}

impl DensityEvaluator {
    /// Fractal-dimension mode. Fails on t <= 0 or non-finite α.
    pub fn fractal(
        source: Arc<dyn DimensionSource>,
        temporal: Option<TemporalScaling>,
    ) -> U3Result<Self> {
        let temporal_factor = match temporal {
            Some(ts) => {
                ts.validate()?;
                ts.factor()
            }
            None => 1.0,
        };
        Ok(Self {
            law: DensityLaw::Fractal {
                source,
                temporal_factor,
            },
            parallel: false,
        })
    }

    /// Zeta-oscillation mode. Fails on zero/non-finite wavelength.
    pub fn zeta(params: ZetaParameters) -> U3Result<Self> {
        params.validate()?;
        Ok(Self {
            law: DensityLaw::Zeta(params),
            parallel: false,
        })
    }

    pub fn from_parameters(params: &FieldParameters) -> U3Result<Self> {
        match params {
            FieldParameters::Fractal { formula, temporal } => {
                Self::fractal(Arc::new(*formula), *temporal)
            }
            FieldParameters::Zeta(z) => Self::zeta(*z),
        }
    }

    /// Evaluate on the rayon pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn law(&self) -> &DensityLaw {
        &self.law
    }

    /// Density at a single (r, θ) point.
    #[inline]
    pub fn density_at(&self, r: f64, theta: f64) -> f64 {
        match &self.law {
            DensityLaw::Fractal {
                source,
                temporal_factor,
            } => fractal_density(r, source.dimension(theta), *temporal_factor),
            DensityLaw::Zeta(z) => zeta_density(r, z),
        }
    }

    /// Evaluate every mesh point of `grid`, preserving mesh order.
    pub fn evaluate(&self, grid: &CoordinateGrid) -> U3Result<ScalarField> {
        let mesh = grid.mesh();
        let shape = mesh.shape;
        let values = match &self.law {
            DensityLaw::Fractal {
                source,
                temporal_factor,
            } => {
                // D depends on θ only: evaluate it once per polar sample.
                let dims: Vec<f64> = grid
                    .mesh_thetas()
                    .iter()
                    .map(|&theta| source.dimension(theta))
                    .collect();
                let point = |i: usize| {
                    let i_theta = (i / shape.n_phi) % shape.n_theta;
                    fractal_density(mesh.r[i], dims[i_theta], *temporal_factor)
                };
                self.map_indices(mesh.len(), point)
            }
            DensityLaw::Zeta(z) => self.map_indices(mesh.len(), |i| zeta_density(mesh.r[i], z)),
        };
        ScalarField::new(shape, values)
    }

    /// Evaluate along a bare radial sequence at a fixed polar angle.
    pub fn evaluate_radii(&self, radii: &[f64], theta: f64) -> Vec<f64> {
        self.map_indices(radii.len(), |i| self.density_at(radii[i], theta))
    }

    fn map_indices<F>(&self, n: usize, f: F) -> Vec<f64>
    where
        F: Fn(usize) -> f64 + Sync + Send,
    {
        if self.parallel {
            (0..n).into_par_iter().map(f).collect()
        } else {
            (0..n).map(f).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::ExternalDimension;
    use u3_types::{AngularAxis, DimensionFormula, GridSpec, RadialAxis, U3Error};

    #[test]
    fn test_zeta_quarter_wavelength_peak() {
        let z = ZetaParameters::new(314.0);
        assert!((zeta_density(0.25, &z) - 315.0).abs() < 1e-9);
    }

    #[test]
    fn test_zeta_three_quarter_wavelength_floor() {
        let z = ZetaParameters::new(314.0);
        assert_eq!(zeta_density(0.75, &z), 0.0);
    }

    #[test]
    fn test_zeta_never_negative() {
        let z = ZetaParameters::new(188.0);
        for i in 0..1000 {
            let r = 0.01 + i as f64 * 0.015;
            assert!(zeta_density(r, &z) >= 0.0);
        }
    }

    #[test]
    fn test_zeta_floor_applies_to_scaled_product() {
        // Negative baseline flips the sign of the whole product.
        let z = ZetaParameters {
            zeta: 0.0,
            rho_0: -2.0,
            wavelength: 1.0,
        };
        assert_eq!(zeta_density(0.3, &z), 0.0);
    }

    #[test]
    fn test_fractal_density_unit_time() {
        // D = 2.5 → r^-0.5
        let rho = fractal_density(4.0, 2.5, 1.0);
        assert!((rho - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_temporal_factor_applied() {
        let eval = DensityEvaluator::fractal(
            Arc::new(DimensionFormula::Sine),
            Some(TemporalScaling::new(1.2, 2.0)),
        )
        .unwrap();
        let expected = 2.0f64.powf(-1.2) * 4.0f64.powf(-0.5);
        assert!((eval.density_at(4.0, 0.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_time_rejected() {
        for t in [0.0, -1.0] {
            let err = DensityEvaluator::fractal(
                Arc::new(DimensionFormula::Sine),
                Some(TemporalScaling::new(1.2, t)),
            )
            .unwrap_err();
            assert!(matches!(err, U3Error::InvalidParameter(_)));
        }
    }

    #[test]
    fn test_from_parameters_validates_zeta() {
        let params = FieldParameters::Zeta(ZetaParameters {
            zeta: 1.0,
            rho_0: 1.0,
            wavelength: 0.0,
        });
        assert!(DensityEvaluator::from_parameters(&params).is_err());
    }

    #[test]
    fn test_evaluate_matches_pointwise() {
        let grid = CoordinateGrid::new(GridSpec::spherical(
            RadialAxis::logarithmic(0.01, 15.0, 4),
            AngularAxis::half_turn(5),
            AngularAxis::full_turn(3),
        ))
        .unwrap();
        let eval = DensityEvaluator::from_parameters(&FieldParameters::fractal(
            DimensionFormula::SineCosineSum,
            1.2,
            0.5,
        ))
        .unwrap();
        let field = eval.evaluate(&grid).unwrap();
        assert_eq!(field.len(), grid.len());
        assert_eq!(field.shape(), grid.shape());
        let mesh = grid.mesh();
        for i in 0..grid.len() {
            let expected = eval.density_at(mesh.r[i], mesh.theta[i]);
            assert!((field.values()[i] - expected).abs() <= 1e-12 * expected.abs().max(1.0));
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let grid = CoordinateGrid::new(GridSpec::polar(
            RadialAxis::linear(0.1, 10.0, 50),
            AngularAxis::full_turn(72),
        ))
        .unwrap();
        let params = FieldParameters::fractal(DimensionFormula::TangentProduct, 1.2, 1.0);
        let seq = DensityEvaluator::from_parameters(&params).unwrap();
        let par = DensityEvaluator::from_parameters(&params)
            .unwrap()
            .with_parallel(true);
        let a = seq.evaluate(&grid).unwrap();
        let b = par.evaluate(&grid).unwrap();
        for (x, y) in a.values().iter().zip(b.values()) {
            assert!(x == y || (x.is_nan() && y.is_nan()));
        }
    }

    #[test]
    fn test_singular_point_does_not_abort() {
        let source = ExternalDimension::new("pole", |theta| {
            if theta == 0.0 {
                f64::INFINITY
            } else {
                2.5
            }
        });
        let grid = CoordinateGrid::new(GridSpec::polar(
            RadialAxis::linear(2.0, 4.0, 3),
            AngularAxis::half_turn(3),
        ))
        .unwrap();
        let eval = DensityEvaluator::fractal(Arc::new(source), None).unwrap();
        let field = eval.evaluate(&grid).unwrap();
        assert_eq!(field.len(), 9);
        // r > 1 raised to +Inf diverges; remaining points stay finite.
        assert_eq!(field.non_finite_count(), 3);
    }

    #[test]
    fn test_zeta_ignores_angle() {
        let eval = DensityEvaluator::zeta(ZetaParameters::new(278.0)).unwrap();
        assert_eq!(eval.density_at(0.4, 0.0), eval.density_at(0.4, 2.0));
    }

    #[test]
    fn test_evaluate_radii() {
        let eval = DensityEvaluator::zeta(ZetaParameters::new(314.0)).unwrap();
        let rho = eval.evaluate_radii(&[0.25, 0.75], 0.0);
        assert!((rho[0] - 315.0).abs() < 1e-9);
        assert_eq!(rho[1], 0.0);
    }
}
