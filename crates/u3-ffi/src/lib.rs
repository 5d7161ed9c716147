// ─────────────────────────────────────────────────────────────────────
// Universe U3 — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied — PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the U3 density kernel.
//!
//! The Python side keeps plotting: it receives normalized fields and
//! their coordinates as plain lists and dicts.
//!
//! # FFI Safety
//!
//! - Field evaluation runs inside `py.allow_threads`; custom D(θ)
//!   callbacks re-acquire the GIL via `Python::with_gil`.
//! - A callback that raises or returns a non-float is logged with
//!   `log::warn!` and yields NaN, which the normalizer substitutes like any
//!   other singular point.
//! - All configs are validated before a pipeline is stored.
//!
//! Install: `pip install -e crates/u3-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from u3_kernel import FieldPipeline, run_zeta_phases
//!
//! frame = FieldPipeline().render_fractal("sine", alpha=1.2, t=1.0)
//! xs, ys, zs, c = frame["x"], frame["y"], frame["z"], frame["values"]
//! ```

use std::sync::Arc;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use u3_core::{FieldPipeline, FrameGeometry, PhaseSeries, RadialProfile, RenderFrame};
use u3_physics::params::{self, ALPHA, T_SNAPSHOT};
use u3_physics::{evaluate_dimensions, ExternalDimension, FieldNormalizer};
use u3_types::{
    DimensionFormula, FieldParameters, NormalizedField, Phase, PipelineConfig, TemporalScaling,
    U3Error, ZetaParameters,
};

fn value_error(e: U3Error) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn field_into_dict(dict: &Bound<'_, PyDict>, field: &NormalizedField) -> PyResult<()> {
    dict.set_item("values", field.values.clone())?;
    dict.set_item(
        "shape",
        (field.shape.n_r, field.shape.n_theta, field.shape.n_phi),
    )?;
    dict.set_item("clip_bound", field.clip_bound)?;
    dict.set_item("scale", field.scale)?;
    dict.set_item("substituted", field.substituted)?;
    dict.set_item("degenerate", field.degenerate)?;
    Ok(())
}

fn frame_to_dict<'py>(py: Python<'py>, frame: &RenderFrame) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    field_into_dict(&dict, &frame.field)?;
    match &frame.geometry {
        FrameGeometry::Radial { r } => {
            dict.set_item("kind", "radial")?;
            dict.set_item("r", r.clone())?;
        }
        FrameGeometry::Polar { theta, r } => {
            dict.set_item("kind", "polar")?;
            dict.set_item("theta", theta.clone())?;
            dict.set_item("r", r.clone())?;
        }
        FrameGeometry::Cartesian(points) => {
            dict.set_item("kind", "cartesian")?;
            dict.set_item("x", points.x.clone())?;
            dict.set_item("y", points.y.clone())?;
            dict.set_item("z", points.z.clone())?;
        }
    }
    Ok(dict)
}

fn profile_to_dict<'py>(py: Python<'py>, profile: &RadialProfile) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("r", profile.r.clone())?;
    dict.set_item("density", profile.density.clone())?;
    Ok(dict)
}

/// Fractal or zeta parameters from keyword arguments; exactly one of
/// `formula` and `zeta` must be given.
fn parameters_from(
    formula: Option<&str>,
    zeta: Option<f64>,
    alpha: f64,
    t: f64,
) -> PyResult<FieldParameters> {
    match (formula, zeta) {
        (Some(name), None) => {
            let formula = DimensionFormula::from_name(name).map_err(value_error)?;
            Ok(FieldParameters::fractal(formula, alpha, t))
        }
        (None, Some(z)) => Ok(params::zeta_parameters(z)),
        _ => Err(PyValueError::new_err(
            "exactly one of `formula` or `zeta` must be given",
        )),
    }
}

fn config_from(config_json: Option<&str>) -> PyResult<PipelineConfig> {
    let config = match config_json {
        Some(json) => PipelineConfig::from_json(json).map_err(value_error)?,
        None => PipelineConfig::default(),
    };
    config.validate().map_err(value_error)?;
    Ok(config)
}

// ─── PyFieldPipeline ────────────────────────────────────────────────

/// Grid + evaluator + normalizer, built once and reused per render.
#[pyclass(name = "FieldPipeline")]
struct PyFieldPipeline {
    inner: FieldPipeline,
}

#[pymethods]
impl PyFieldPipeline {
    /// Args:
    ///     config_json: Optional JSON-encoded PipelineConfig. Defaults to the
    ///                  log-spaced spherical grid with a 200-point profile.
    #[new]
    #[pyo3(signature = (config_json = None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = config_from(config_json)?;
        Ok(Self {
            inner: FieldPipeline::new(config).map_err(value_error)?,
        })
    }

    /// Construct from JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        Self::new(Some(json))
    }

    #[getter]
    fn point_count(&self) -> usize {
        self.inner.grid().len()
    }

    #[getter]
    fn dimensionality(&self) -> usize {
        self.inner.grid().dimensionality()
    }

    /// Normalized fractal-dimension field for a named formula
    /// ("sine", "sine_cosine_sum", "tangent_product", "tangent_cosine_squared").
    #[pyo3(signature = (formula, alpha = ALPHA, t = T_SNAPSHOT))]
    fn render_fractal(
        &self,
        py: Python<'_>,
        formula: &str,
        alpha: f64,
        t: f64,
    ) -> PyResult<PyObject> {
        let params = parameters_from(Some(formula), None, alpha, t)?;
        let frame = py
            .allow_threads(|| self.inner.render(&params))
            .map_err(value_error)?;
        Ok(frame_to_dict(py, &frame)?.into())
    }

    /// Normalized zeta-oscillation field.
    #[pyo3(signature = (zeta, rho_0 = params::ZETA_RHO_0, wavelength = params::ZETA_WAVELENGTH))]
    fn render_zeta(
        &self,
        py: Python<'_>,
        zeta: f64,
        rho_0: f64,
        wavelength: f64,
    ) -> PyResult<PyObject> {
        let params = FieldParameters::Zeta(ZetaParameters {
            zeta,
            rho_0,
            wavelength,
        });
        let frame = py
            .allow_threads(|| self.inner.render(&params))
            .map_err(value_error)?;
        Ok(frame_to_dict(py, &frame)?.into())
    }

    /// Normalized field for a Python D(θ).
    ///
    /// Args:
    ///     dimension_callback: Callable[[float], float].
    ///     alpha, t: Optional temporal scaling; both or neither.
    #[pyo3(signature = (dimension_callback, label = "custom", alpha = None, t = None))]
    fn render_custom(
        &self,
        py: Python<'_>,
        dimension_callback: PyObject,
        label: &str,
        alpha: Option<f64>,
        t: Option<f64>,
    ) -> PyResult<PyObject> {
        let temporal = match (alpha, t) {
            (Some(alpha), Some(t)) => Some(TemporalScaling::new(alpha, t)),
            (None, None) => None,
            _ => {
                return Err(PyValueError::new_err(
                    "`alpha` and `t` must be given together",
                ))
            }
        };
        let source = ExternalDimension::new(label, move |theta: f64| {
            Python::with_gil(|py| match dimension_callback.call1(py, (theta,)) {
                Ok(result) => result.extract::<f64>(py).unwrap_or_else(|_| {
                    log::warn!("D(θ) callback returned a non-float at θ={theta}, using NaN");
                    f64::NAN
                }),
                Err(e) => {
                    log::warn!("D(θ) callback raised at θ={theta}: {e}, using NaN");
                    f64::NAN
                }
            })
        });
        let frame = py
            .allow_threads(|| self.inner.render_with_source(Arc::new(source), temporal))
            .map_err(value_error)?;
        Ok(frame_to_dict(py, &frame)?.into())
    }

    /// Raw (unnormalized) density on the profile axis, or None when the
    /// config has no profile axis.
    #[pyo3(signature = (formula = None, zeta = None, alpha = ALPHA, t = T_SNAPSHOT))]
    fn radial_profile(
        &self,
        py: Python<'_>,
        formula: Option<&str>,
        zeta: Option<f64>,
        alpha: f64,
        t: f64,
    ) -> PyResult<Option<PyObject>> {
        let params = parameters_from(formula, zeta, alpha, t)?;
        let profile = py
            .allow_threads(|| self.inner.radial_profile(&params))
            .map_err(value_error)?;
        match profile {
            Some(p) => Ok(Some(profile_to_dict(py, &p)?.into())),
            None => Ok(None),
        }
    }

    fn __repr__(&self) -> String {
        let config = self.inner.config();
        format!(
            "FieldPipeline(dim={}, points={}, clip_percentile={}, parallel={})",
            self.inner.grid().dimensionality(),
            self.inner.grid().len(),
            config.clip_percentile,
            config.parallel
        )
    }
}

// ─── Module functions ───────────────────────────────────────────────

/// Run one zeta phase per value (defaults to the four canonical phases).
///
/// Returns a list of dicts in phase order. Failed phases carry an
/// "error" string instead of field data.
#[pyfunction]
#[pyo3(signature = (zetas = None, config_json = None))]
fn run_zeta_phases(
    py: Python<'_>,
    zetas: Option<Vec<f64>>,
    config_json: Option<&str>,
) -> PyResult<Vec<PyObject>> {
    let config = match config_json {
        Some(_) => config_from(config_json)?,
        None => PipelineConfig {
            grid: params::zeta_spherical_grid(),
            profile: Some(params::zeta_profile_axis()),
            ..PipelineConfig::default()
        },
    };
    let phases = match zetas {
        Some(values) => values
            .into_iter()
            .map(|z| Phase::new(format!("zeta={z}"), params::zeta_parameters(z)))
            .collect(),
        None => params::zeta_phases(),
    };
    let pipeline = FieldPipeline::new(config).map_err(value_error)?;
    let series = PhaseSeries::new(pipeline, phases);
    let outcomes = py.allow_threads(|| series.run());

    outcomes
        .iter()
        .map(|outcome| -> PyResult<PyObject> {
            let dict = match &outcome.result {
                Ok(res) => {
                    let dict = frame_to_dict(py, &res.frame)?;
                    if let Some(profile) = &res.profile {
                        dict.set_item("profile", profile_to_dict(py, profile)?)?;
                    }
                    dict
                }
                Err(e) => {
                    let dict = PyDict::new(py);
                    dict.set_item("error", e.to_string())?;
                    dict
                }
            };
            dict.set_item("index", outcome.index)?;
            dict.set_item("name", outcome.name.clone())?;
            dict.set_item("ok", outcome.result.is_ok())?;
            Ok(dict.into())
        })
        .collect()
}

/// Sanitize, percentile-clip and rescale a flat list of values.
#[pyfunction]
#[pyo3(signature = (values, clip_percentile = 95.0))]
fn normalize_field(py: Python<'_>, values: Vec<f64>, clip_percentile: f64) -> PyResult<PyObject> {
    let normalizer = FieldNormalizer::new(clip_percentile).map_err(value_error)?;
    let field = normalizer.normalize_values(&values);
    let dict = PyDict::new(py);
    field_into_dict(&dict, &field)?;
    Ok(dict.into())
}

/// Evaluate a named D(θ) formula over a list of angles.
#[pyfunction]
fn dimension(formula: &str, angles: Vec<f64>) -> PyResult<Vec<f64>> {
    let formula = DimensionFormula::from_name(formula).map_err(value_error)?;
    Ok(evaluate_dimensions(&formula, &angles))
}

/// Canonical model constants.
#[pyfunction]
fn constants(py: Python<'_>) -> PyResult<PyObject> {
    let dict = PyDict::new(py);
    dict.set_item("alpha", ALPHA)?;
    dict.set_item("t_snapshot", T_SNAPSHOT)?;
    dict.set_item("time_snapshots", params::TIME_SNAPSHOTS.to_vec())?;
    dict.set_item("zeta_values", params::ZETA_VALUES.to_vec())?;
    dict.set_item("zeta_phase_names", params::ZETA_PHASE_NAMES.to_vec())?;
    dict.set_item("zeta_rho_0", params::ZETA_RHO_0)?;
    dict.set_item("zeta_wavelength", params::ZETA_WAVELENGTH)?;
    dict.set_item("contour_levels", params::CONTOUR_LEVELS.to_vec())?;
    let formulas: Vec<(&str, &str)> = DimensionFormula::ALL
        .iter()
        .map(|f| (f.name(), f.label()))
        .collect();
    dict.set_item("formulas", formulas)?;
    Ok(dict.into())
}

#[pymodule]
fn u3_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyFieldPipeline>()?;
    m.add_function(wrap_pyfunction!(run_zeta_phases, m)?)?;
    m.add_function(wrap_pyfunction!(normalize_field, m)?)?;
    m.add_function(wrap_pyfunction!(dimension, m)?)?;
    m.add_function(wrap_pyfunction!(constants, m)?)?;
    Ok(())
}
