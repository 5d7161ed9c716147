// ─────────────────────────────────────────────────────────────────────
// Universe U3 — Field Containers
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{U3Error, U3Result};

/// Replace NaN, +Inf and -Inf with `fallback`; finite values pass through.
#[inline]
pub fn sanitize_value(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Axis lengths of a field, r-major: index = (i_r·n_theta + i_theta)·n_phi + i_phi.
///
/// Absent angular axes have length 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldShape {
    pub n_r: usize,
    pub n_theta: usize,
    pub n_phi: usize,
}

impl FieldShape {
    pub fn new(n_r: usize, n_theta: usize, n_phi: usize) -> Self {
        Self {
            n_r,
            n_theta,
            n_phi,
        }
    }

    pub fn flat(len: usize) -> Self {
        Self::new(len, 1, 1)
    }

    pub fn len(&self) -> usize {
        self.n_r * self.n_theta * self.n_phi
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn index(&self, i_r: usize, i_theta: usize, i_phi: usize) -> usize {
        (i_r * self.n_theta + i_theta) * self.n_phi + i_phi
    }
}

/// Summary of the finite entries of a field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub finite_count: usize,
    pub non_finite_count: usize,
}

/// Raw density values co-indexed with a grid mesh. May contain NaN/Inf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalarField {
    shape: FieldShape,
    values: Vec<f64>,
}

impl ScalarField {
    pub fn new(shape: FieldShape, values: Vec<f64>) -> U3Result<Self> {
        if shape.len() != values.len() {
            return Err(U3Error::ShapeMismatch {
                expected: shape.len(),
                got: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    /// A 1D field with no grid shape attached.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            shape: FieldShape::flat(values.len()),
            values,
        }
    }

    pub fn shape(&self) -> FieldShape {
        self.shape
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, i_r: usize, i_theta: usize, i_phi: usize) -> Option<f64> {
        if i_r >= self.shape.n_r || i_theta >= self.shape.n_theta || i_phi >= self.shape.n_phi {
            return None;
        }
        self.values.get(self.shape.index(i_r, i_theta, i_phi)).copied()
    }

    pub fn non_finite_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_finite()).count()
    }

    pub fn stats(&self) -> FieldStats {
        let mut stats = FieldStats {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            ..FieldStats::default()
        };
        let mut sum = 0.0;
        for &v in &self.values {
            if v.is_finite() {
                stats.min = stats.min.min(v);
                stats.max = stats.max.max(v);
                sum += v;
                stats.finite_count += 1;
            } else {
                stats.non_finite_count += 1;
            }
        }
        if stats.finite_count == 0 {
            stats.min = 0.0;
            stats.max = 0.0;
        } else {
            stats.mean = sum / stats.finite_count as f64;
        }
        stats
    }
}

/// A sanitized, clipped and rescaled field: every value lies in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedField {
    pub shape: FieldShape,
    pub values: Vec<f64>,
    /// Upper clip bound (percentile of the sanitized field).
    pub clip_bound: f64,
    /// Divisor applied after clipping (largest positive clipped value);
    /// 0.0 when the field is degenerate.
    pub scale: f64,
    /// Number of NaN/±Inf entries replaced with 0.0.
    pub substituted: usize,
    /// No strictly positive value survived clipping; `values` are all zero.
    pub degenerate: bool,
}

impl NormalizedField {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Turn the degenerate (all-zero) result into an explicit error.
    pub fn require_signal(&self) -> U3Result<&Self> {
        if self.degenerate {
            return Err(U3Error::DegenerateField(format!(
                "no strictly positive value among {} entries after clipping at {}",
                self.values.len(),
                self.clip_bound
            )));
        }
        Ok(self)
    }
}

/// Cartesian coordinates in the same index order as the source mesh.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CartesianPoints {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl CartesianPoints {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            z: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, x: f64, y: f64, z: f64) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
