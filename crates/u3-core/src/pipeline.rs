// ─────────────────────────────────────────────────────────────────────
// Universe U3 — Field Pipeline
// ─────────────────────────────────────────────────────────────────────
//! Grid → density → normalization → render geometry, for one parameter
//! set at a time.
//!
//! The pipeline owns its grids and normalizer, both read-only after
//! construction, so a single instance can serve many phases concurrently.

use std::sync::Arc;

use serde::Serialize;

use u3_physics::{
    polar_coordinates, to_cartesian, CoordinateGrid, DensityEvaluator, DimensionSource,
    FieldNormalizer,
};
use u3_types::{
    CartesianPoints, FieldParameters, NormalizedField, PipelineConfig, ScalarField,
    TemporalScaling, U3Result,
};

/// Coordinates co-indexed with a normalized field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameGeometry {
    Radial { r: Vec<f64> },
    Polar { theta: Vec<f64>, r: Vec<f64> },
    Cartesian(CartesianPoints),
}

impl FrameGeometry {
    pub fn len(&self) -> usize {
        match self {
            FrameGeometry::Radial { r } | FrameGeometry::Polar { r, .. } => r.len(),
            FrameGeometry::Cartesian(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a renderer needs for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub field: NormalizedField,
    pub geometry: FrameGeometry,
}

/// Unnormalized density along the profile axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadialProfile {
    pub r: Vec<f64>,
    pub density: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct FieldPipeline {
    config: PipelineConfig,
    grid: CoordinateGrid,
    profile_grid: Option<CoordinateGrid>,
    normalizer: FieldNormalizer,
}

impl FieldPipeline {
    /// Validate `config` and build the grids. Grid errors surface here,
    /// before any field is evaluated.
    pub fn new(config: PipelineConfig) -> U3Result<Self> {
        config.validate()?;
        let grid = CoordinateGrid::new(config.grid)?;
        let profile_grid = config.profile.map(CoordinateGrid::radial).transpose()?;
        let normalizer = FieldNormalizer::new(config.clip_percentile)?;
        log::info!(
            "pipeline ready: {}D grid, {} points, profile={}, p{}",
            grid.dimensionality(),
            grid.len(),
            profile_grid.as_ref().map_or(0, CoordinateGrid::len),
            config.clip_percentile
        );
        Ok(Self {
            config,
            grid,
            profile_grid,
            normalizer,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn grid(&self) -> &CoordinateGrid {
        &self.grid
    }

    pub fn profile_grid(&self) -> Option<&CoordinateGrid> {
        self.profile_grid.as_ref()
    }

    pub fn normalizer(&self) -> &FieldNormalizer {
        &self.normalizer
    }

    fn evaluator(&self, params: &FieldParameters) -> U3Result<DensityEvaluator> {
        Ok(DensityEvaluator::from_parameters(params)?.with_parallel(self.config.parallel))
    }

    /// Raw density over the main grid.
    pub fn evaluate(&self, params: &FieldParameters) -> U3Result<ScalarField> {
        self.evaluator(params)?.evaluate(&self.grid)
    }

    pub fn render(&self, params: &FieldParameters) -> U3Result<RenderFrame> {
        let evaluator = self.evaluator(params)?;
        self.render_with(&evaluator)
    }

    /// Render with a caller-supplied D(θ).
    pub fn render_with_source(
        &self,
        source: Arc<dyn DimensionSource>,
        temporal: Option<TemporalScaling>,
    ) -> U3Result<RenderFrame> {
        let evaluator =
            DensityEvaluator::fractal(source, temporal)?.with_parallel(self.config.parallel);
        self.render_with(&evaluator)
    }

    pub fn render_with(&self, evaluator: &DensityEvaluator) -> U3Result<RenderFrame> {
        let raw = evaluator.evaluate(&self.grid)?;
        let field = self.normalizer.normalize(&raw);
        Ok(RenderFrame {
            field,
            geometry: self.geometry(),
        })
    }

    /// Raw profile for `params`; `None` when no profile axis is configured.
    pub fn radial_profile(&self, params: &FieldParameters) -> U3Result<Option<RadialProfile>> {
        let evaluator = self.evaluator(params)?;
        self.profile_with(&evaluator)
    }

    pub fn profile_with(&self, evaluator: &DensityEvaluator) -> U3Result<Option<RadialProfile>> {
        let Some(grid) = &self.profile_grid else {
            return Ok(None);
        };
        let density = evaluator.evaluate(grid)?.into_values();
        Ok(Some(RadialProfile {
            r: grid.radii().to_vec(),
            density,
        }))
    }

    fn geometry(&self) -> FrameGeometry {
        let mesh = self.grid.mesh();
        match self.grid.dimensionality() {
            1 => FrameGeometry::Radial { r: mesh.r.clone() },
            2 => {
                let (theta, r) = polar_coordinates(mesh);
                FrameGeometry::Polar { theta, r }
            }
            _ => FrameGeometry::Cartesian(to_cartesian(mesh)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use u3_physics::ExternalDimension;
    use u3_types::{AngularAxis, DimensionFormula, GridSpec, RadialAxis, U3Error};

    fn scenario_config() -> PipelineConfig {
        PipelineConfig {
            grid: GridSpec::spherical(
                RadialAxis::logarithmic(0.01, 15.0, 3),
                AngularAxis::half_turn(2),
                AngularAxis::full_turn(2),
            ),
            profile: None,
            clip_percentile: 95.0,
            parallel: false,
        }
    }

    #[test]
    fn test_small_spherical_scenario() {
        let pipeline = FieldPipeline::new(scenario_config()).unwrap();
        let params = FieldParameters::fractal(DimensionFormula::Sine, 1.2, 1.0);

        let raw = pipeline.evaluate(&params).unwrap();
        assert_eq!(raw.len(), 12);
        assert_eq!(raw.non_finite_count(), 0);
        // r_min = 0.01, D ≈ 2.5 → 0.01^-0.5 = 10
        assert!((raw.values()[0] - 10.0).abs() < 1e-9);

        let frame = pipeline.render(&params).unwrap();
        assert_eq!(frame.field.len(), 12);
        assert!(frame.field.values.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!((frame.field.max() - 1.0).abs() < 1e-12);
        assert!(!frame.field.degenerate);
    }

    #[test]
    fn test_geometry_matches_field_length() {
        let pipeline = FieldPipeline::new(scenario_config()).unwrap();
        let frame = pipeline
            .render(&FieldParameters::static_fractal(DimensionFormula::SineCosineSum))
            .unwrap();
        assert_eq!(frame.geometry.len(), frame.field.len());
        assert!(matches!(frame.geometry, FrameGeometry::Cartesian(_)));
    }

    #[test]
    fn test_polar_frame() {
        let config = PipelineConfig {
            grid: GridSpec::polar(RadialAxis::linear(0.1, 10.0, 20), AngularAxis::full_turn(36)),
            ..scenario_config()
        };
        let pipeline = FieldPipeline::new(config).unwrap();
        let frame = pipeline
            .render(&FieldParameters::fractal(DimensionFormula::TangentProduct, 1.2, 1.0))
            .unwrap();
        assert_eq!(frame.field.len(), 720);
        assert!(frame.field.values.iter().all(|v| (0.0..=1.0).contains(v)));
        match &frame.geometry {
            FrameGeometry::Polar { theta, r } => {
                assert_eq!(theta.len(), 720);
                assert_eq!(r.len(), 720);
            }
            other => panic!("expected polar geometry, got {other:?}"),
        }
    }

    #[test]
    fn test_radial_frame() {
        let config = PipelineConfig {
            grid: GridSpec::radial(RadialAxis::linear(0.01, 15.0, 50)),
            ..scenario_config()
        };
        let pipeline = FieldPipeline::new(config).unwrap();
        let frame = pipeline.render(&FieldParameters::zeta(188.0)).unwrap();
        assert!(matches!(frame.geometry, FrameGeometry::Radial { ref r } if r.len() == 50));
    }

    #[test]
    fn test_invalid_grid_fails_at_construction() {
        let config = PipelineConfig {
            grid: GridSpec::radial(RadialAxis::logarithmic(0.0, 15.0, 10)),
            ..scenario_config()
        };
        let err = FieldPipeline::new(config).unwrap_err();
        assert!(matches!(err, U3Error::InvalidGridSpec(_)));
    }

    #[test]
    fn test_invalid_time_fails_before_evaluation() {
        let pipeline = FieldPipeline::new(scenario_config()).unwrap();
        let err = pipeline
            .render(&FieldParameters::fractal(DimensionFormula::Sine, 1.2, 0.0))
            .unwrap_err();
        assert!(matches!(err, U3Error::InvalidParameter(_)));
    }

    #[test]
    fn test_degenerate_zeta_field() {
        // ρ₀ < 0 with ζ = 0 floors every point to 0.
        let pipeline = FieldPipeline::new(scenario_config()).unwrap();
        let params = FieldParameters::Zeta(u3_types::ZetaParameters {
            zeta: 0.0,
            rho_0: -1.0,
            wavelength: 1.0,
        });
        let frame = pipeline.render(&params).unwrap();
        assert!(frame.field.degenerate);
        assert!(frame.field.values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_custom_source_with_singularities() {
        let pipeline = FieldPipeline::new(scenario_config()).unwrap();
        let source = ExternalDimension::new("nan at pole", |theta| {
            if theta == 0.0 {
                f64::NAN
            } else {
                2.5
            }
        });
        let frame = pipeline.render_with_source(Arc::new(source), None).unwrap();
        assert_eq!(frame.field.substituted, 6);
        assert!(frame.field.values.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_radial_profile_is_raw() {
        let config = PipelineConfig {
            profile: Some(RadialAxis::linear(0.25, 0.75, 3)),
            ..scenario_config()
        };
        let pipeline = FieldPipeline::new(config).unwrap();
        let profile = pipeline
            .radial_profile(&FieldParameters::zeta(314.0))
            .unwrap()
            .unwrap();
        assert_eq!(profile.r, vec![0.25, 0.5, 0.75]);
        assert!((profile.density[0] - 315.0).abs() < 1e-9);
        assert_eq!(profile.density[2], 0.0);
    }

    #[test]
    fn test_radial_profile_absent() {
        let pipeline = FieldPipeline::new(scenario_config()).unwrap();
        assert!(pipeline
            .radial_profile(&FieldParameters::zeta(314.0))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_frame_serializes_for_renderer() {
        let config = PipelineConfig {
            grid: GridSpec::polar(RadialAxis::linear(0.1, 10.0, 3), AngularAxis::full_turn(2)),
            ..scenario_config()
        };
        let pipeline = FieldPipeline::new(config).unwrap();
        let frame = pipeline.render(&FieldParameters::zeta(314.0)).unwrap();
        let json: serde_json::Value = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["geometry"]["kind"], "polar");
        assert_eq!(json["geometry"]["r"].as_array().unwrap().len(), 6);
        assert_eq!(json["field"]["values"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_parallel_render_matches_sequential() {
        let seq = FieldPipeline::new(scenario_config()).unwrap();
        let par = FieldPipeline::new(PipelineConfig {
            parallel: true,
            ..scenario_config()
        })
        .unwrap();
        let params = FieldParameters::zeta(278.0);
        assert_eq!(seq.render(&params).unwrap(), par.render(&params).unwrap());
    }
}
