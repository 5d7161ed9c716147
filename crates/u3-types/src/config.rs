// ─────────────────────────────────────────────────────────────────────
// Universe U3 — Density Kernel Configuration
// ─────────────────────────────────────────────────────────────────────
//! Grid specifications, field parameters and pipeline configuration.
//!
//! Every value here is plain data: construction is cheap and validation
//! is explicit via `validate()`, which must pass before any evaluation.

use serde::{Deserialize, Serialize};

use crate::error::{U3Error, U3Result};

/// Radial sampling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadialSampling {
    /// Evenly spaced between `r_min` and `r_max`.
    Linear,
    /// Geometrically spaced (evenly spaced in log-space).
    Logarithmic,
}

/// Radial axis of a grid. Both endpoints are always included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialAxis {
    pub sampling: RadialSampling,
    /// Strictly positive: the density law is singular at r = 0.
    pub r_min: f64,
    pub r_max: f64,
    pub count: usize,
}

impl RadialAxis {
    pub fn linear(r_min: f64, r_max: f64, count: usize) -> Self {
        Self {
            sampling: RadialSampling::Linear,
            r_min,
            r_max,
            count,
        }
    }

    pub fn logarithmic(r_min: f64, r_max: f64, count: usize) -> Self {
        Self {
            sampling: RadialSampling::Logarithmic,
            r_min,
            r_max,
            count,
        }
    }

    pub fn validate(&self) -> U3Result<()> {
        if self.count < 1 {
            return Err(U3Error::InvalidGridSpec(
                "radial count must be >= 1".to_string(),
            ));
        }
        if !self.r_min.is_finite() || !self.r_max.is_finite() {
            return Err(U3Error::InvalidGridSpec(format!(
                "radial bounds must be finite, got [{}, {}]",
                self.r_min, self.r_max
            )));
        }
        if self.r_min <= 0.0 {
            let mode = match self.sampling {
                RadialSampling::Linear => "linear",
                RadialSampling::Logarithmic => "logarithmic",
            };
            return Err(U3Error::InvalidGridSpec(format!(
                "r_min must be > 0 for {mode} sampling, got {}",
                self.r_min
            )));
        }
        if self.r_max < self.r_min {
            return Err(U3Error::InvalidGridSpec(format!(
                "r_max must be >= r_min, got r_min={} r_max={}",
                self.r_min, self.r_max
            )));
        }
        Ok(())
    }
}

/// Angular axis (polar θ or azimuthal φ), evenly spaced from `start`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularAxis {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    /// Include `end` as the last sample. When false the last sample stops
    /// one step short of `end`.
    #[serde(default = "default_endpoint")]
    pub endpoint: bool,
}

fn default_endpoint() -> bool {
    true
}

impl AngularAxis {
    pub fn new(start: f64, end: f64, count: usize) -> Self {
        Self {
            start,
            end,
            count,
            endpoint: true,
        }
    }

    /// θ ∈ [0, π].
    pub fn half_turn(count: usize) -> Self {
        Self::new(0.0, std::f64::consts::PI, count)
    }

    /// θ or φ ∈ [0, 2π].
    pub fn full_turn(count: usize) -> Self {
        Self::new(0.0, std::f64::consts::TAU, count)
    }

    pub fn without_endpoint(mut self) -> Self {
        self.endpoint = false;
        self
    }

    pub fn validate(&self, axis: &str) -> U3Result<()> {
        if self.count < 1 {
            return Err(U3Error::InvalidGridSpec(format!(
                "{axis} count must be >= 1"
            )));
        }
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(U3Error::InvalidGridSpec(format!(
                "{axis} range must be finite, got [{}, {}]",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

/// Full grid specification: radius, optional polar angle, optional azimuth.
///
/// - radius only → 1D radial profile
/// - radius × θ → 2D polar grid
/// - radius × θ × φ → 3D spherical grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub radial: RadialAxis,
    #[serde(default)]
    pub polar: Option<AngularAxis>,
    #[serde(default)]
    pub azimuth: Option<AngularAxis>,
}

impl GridSpec {
    pub fn radial(radial: RadialAxis) -> Self {
        Self {
            radial,
            polar: None,
            azimuth: None,
        }
    }

    pub fn polar(radial: RadialAxis, polar: AngularAxis) -> Self {
        Self {
            radial,
            polar: Some(polar),
            azimuth: None,
        }
    }

    pub fn spherical(radial: RadialAxis, polar: AngularAxis, azimuth: AngularAxis) -> Self {
        Self {
            radial,
            polar: Some(polar),
            azimuth: Some(azimuth),
        }
    }

    /// Number of materialized axes (1, 2 or 3).
    pub fn dimensionality(&self) -> usize {
        1 + usize::from(self.polar.is_some()) + usize::from(self.azimuth.is_some())
    }

    /// Total number of mesh points.
    pub fn point_count(&self) -> usize {
        self.radial.count
            * self.polar.map_or(1, |a| a.count)
            * self.azimuth.map_or(1, |a| a.count)
    }

    pub fn validate(&self) -> U3Result<()> {
        self.radial.validate()?;
        if let Some(polar) = &self.polar {
            polar.validate("polar")?;
        }
        if let Some(azimuth) = &self.azimuth {
            if self.polar.is_none() {
                return Err(U3Error::InvalidGridSpec(
                    "azimuthal axis requires a polar axis".to_string(),
                ));
            }
            azimuth.validate("azimuth")?;
        }
        Ok(())
    }
}

/// Closed set of angle → fractal-dimension laws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionFormula {
    /// D(θ) = 2.5 + 0.5·sinθ, bounded in [2, 3].
    Sine,
    /// D(θ) = 4.5 + 0.7·sinθ + 2.5 + 0.5·cosθ.
    SineCosineSum,
    /// D(θ) = 7.5 + 0.9·sinθ·cosθ·tanθ + 4.5 + 0.7·cosθ + sinθ.
    /// Diverges at θ = π/2 and 3π/2.
    TangentProduct,
    /// D(θ) = (7.5 + 0.9·sinθ·cosθ·tanθ) + (4.5 + 0.7·cos²θ) + sinθ.
    TangentCosineSquared,
}

impl DimensionFormula {
    pub const ALL: [DimensionFormula; 4] = [
        DimensionFormula::Sine,
        DimensionFormula::SineCosineSum,
        DimensionFormula::TangentProduct,
        DimensionFormula::TangentCosineSquared,
    ];

    /// Closed form as a human-readable label (for plot titles).
    pub fn label(&self) -> &'static str {
        match self {
            DimensionFormula::Sine => "D(θ) = 2.5 + 0.5·sinθ",
            DimensionFormula::SineCosineSum => "D(θ) = 4.5 + 0.7·sinθ + 2.5 + 0.5·cosθ",
            DimensionFormula::TangentProduct => {
                "D(θ) = 7.5 + 0.9·sinθ·cosθ·tanθ + 4.5 + 0.7·cosθ + sinθ"
            }
            DimensionFormula::TangentCosineSquared => {
                "D(θ) = (7.5 + 0.9·sinθ·cosθ·tanθ) + (4.5 + 0.7·cos²θ) + sinθ"
            }
        }
    }

    /// Parse the snake_case tag used in JSON configs.
    pub fn from_name(name: &str) -> U3Result<Self> {
        match name {
            "sine" => Ok(DimensionFormula::Sine),
            "sine_cosine_sum" => Ok(DimensionFormula::SineCosineSum),
            "tangent_product" => Ok(DimensionFormula::TangentProduct),
            "tangent_cosine_squared" => Ok(DimensionFormula::TangentCosineSquared),
            other => Err(U3Error::InvalidParameter(format!(
                "unknown dimension formula '{other}'"
            ))),
        }
    }

    /// Inverse of `from_name`.
    pub fn name(&self) -> &'static str {
        match self {
            DimensionFormula::Sine => "sine",
            DimensionFormula::SineCosineSum => "sine_cosine_sum",
            DimensionFormula::TangentProduct => "tangent_product",
            DimensionFormula::TangentCosineSquared => "tangent_cosine_squared",
        }
    }

    /// Whether the formula has poles inside [0, 2π].
    pub fn is_singular(&self) -> bool {
        matches!(
            self,
            DimensionFormula::TangentProduct | DimensionFormula::TangentCosineSquared
        )
    }
}

/// Temporal factor t^(-α).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemporalScaling {
    /// Fractional temporal order α.
    pub alpha: f64,
    /// Cosmic time snapshot, strictly positive.
    pub t: f64,
}

impl TemporalScaling {
    pub fn new(alpha: f64, t: f64) -> Self {
        Self { alpha, t }
    }

    pub fn validate(&self) -> U3Result<()> {
        if !self.alpha.is_finite() {
            return Err(U3Error::InvalidParameter(format!(
                "alpha must be finite, got {}",
                self.alpha
            )));
        }
        if !self.t.is_finite() || self.t <= 0.0 {
            return Err(U3Error::InvalidParameter(format!(
                "t must be finite and > 0, got {}",
                self.t
            )));
        }
        Ok(())
    }

    /// t^(-α).
    pub fn factor(&self) -> f64 {
        self.t.powf(-self.alpha)
    }
}

/// Zeta-mode oscillation: ρ = max(0, ρ₀·(1 + ζ·sin(2πr/λ))).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZetaParameters {
    pub zeta: f64,
    /// Baseline density ρ₀. Default: 1.0.
    #[serde(default = "default_unit")]
    pub rho_0: f64,
    /// Wavelength λ. Default: 1.0.
    #[serde(default = "default_unit")]
    pub wavelength: f64,
}

fn default_unit() -> f64 {
    1.0
}

impl ZetaParameters {
    pub fn new(zeta: f64) -> Self {
        Self {
            zeta,
            rho_0: 1.0,
            wavelength: 1.0,
        }
    }

    pub fn validate(&self) -> U3Result<()> {
        if !self.zeta.is_finite() || !self.rho_0.is_finite() {
            return Err(U3Error::InvalidParameter(format!(
                "zeta and rho_0 must be finite, got zeta={} rho_0={}",
                self.zeta, self.rho_0
            )));
        }
        if !self.wavelength.is_finite() || self.wavelength == 0.0 {
            return Err(U3Error::InvalidParameter(format!(
                "wavelength must be finite and non-zero, got {}",
                self.wavelength
            )));
        }
        Ok(())
    }
}

/// Field evaluation mode. Exactly one law is active per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FieldParameters {
    /// ρ(r, θ, t) = t^(-α) · r^(D(θ) - 3); the temporal factor is omitted when `None`.
    Fractal {
        formula: DimensionFormula,
        #[serde(default)]
        temporal: Option<TemporalScaling>,
    },
    /// ρ(r) = max(0, ρ₀·(1 + ζ·sin(2πr/λ))).
    Zeta(ZetaParameters),
}

impl FieldParameters {
    pub fn fractal(formula: DimensionFormula, alpha: f64, t: f64) -> Self {
        FieldParameters::Fractal {
            formula,
            temporal: Some(TemporalScaling::new(alpha, t)),
        }
    }

    pub fn static_fractal(formula: DimensionFormula) -> Self {
        FieldParameters::Fractal {
            formula,
            temporal: None,
        }
    }

    pub fn zeta(zeta: f64) -> Self {
        FieldParameters::Zeta(ZetaParameters::new(zeta))
    }

    pub fn validate(&self) -> U3Result<()> {
        match self {
            FieldParameters::Fractal { temporal, .. } => match temporal {
                Some(ts) => ts.validate(),
                None => Ok(()),
            },
            FieldParameters::Zeta(z) => z.validate(),
        }
    }

    /// Short description for logs and titles.
    pub fn describe(&self) -> String {
        match self {
            FieldParameters::Fractal {
                formula,
                temporal: Some(ts),
            } => format!("{}, α={}, t={}", formula.label(), ts.alpha, ts.t),
            FieldParameters::Fractal {
                formula,
                temporal: None,
            } => formula.label().to_string(),
            FieldParameters::Zeta(z) => {
                format!("zeta={}, ρ₀={}, λ={}", z.zeta, z.rho_0, z.wavelength)
            }
        }
    }
}

/// One independent unit of a phase series: its own field, its own
/// normalization scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub params: FieldParameters,
}

impl Phase {
    pub fn new(name: impl Into<String>, params: FieldParameters) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// Runtime configuration for the field pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Grid the rendered field is sampled on.
    /// Default: 3D log grid, r ∈ [0.01, 15] ×30, θ ∈ [0, π] ×30, φ ∈ [0, 2π] ×60.
    pub grid: GridSpec,

    /// Finer 1D radial axis for the raw per-phase profile.
    /// Default: linear, r ∈ [0.01, 15] ×200.
    /// An explicit `null` disables the profile.
    #[serde(default = "default_profile")]
    pub profile: Option<RadialAxis>,

    /// Percentile used as the upper clip bound. Default: 95.
    #[serde(default = "default_clip_percentile")]
    pub clip_percentile: f64,

    /// Evaluate grids and phases on the rayon pool. Default: true.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_profile() -> Option<RadialAxis> {
    Some(RadialAxis::linear(0.01, 15.0, 200))
}

fn default_clip_percentile() -> f64 {
    95.0
}

fn default_parallel() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            grid: GridSpec::spherical(
                RadialAxis::logarithmic(0.01, 15.0, 30),
                AngularAxis::half_turn(30),
                AngularAxis::full_turn(60),
            ),
            profile: default_profile(),
            clip_percentile: default_clip_percentile(),
            parallel: default_parallel(),
        }
    }
}

impl PipelineConfig {
    pub fn with_grid(grid: GridSpec) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> U3Result<()> {
        self.grid.validate()?;
        if let Some(profile) = &self.profile {
            profile.validate()?;
        }
        if !(self.clip_percentile > 0.0 && self.clip_percentile <= 100.0) {
            return Err(U3Error::Config(format!(
                "clip_percentile must be in (0, 100], got {}",
                self.clip_percentile
            )));
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> U3Result<Self> {
        serde_json::from_str(json).map_err(|e| U3Error::Config(format!("JSON parse error: {e}")))
    }
}
