// ─────────────────────────────────────────────────────────────────────
// Universe U3 — Field Normalizer
// ─────────────────────────────────────────────────────────────────────
//! Converts a raw `ScalarField` into a visualizable [0, 1] field.
//!
//! Steps, in order:
//!   1. Replace NaN, +Inf and -Inf with 0.0.
//!   2. Percentile (default 95th) of the sanitized array, injected zeros
//!      included.
//!   3. Clip every value to [0, percentile].
//!   4. Divide by the largest strictly positive clipped value.
//!   5. If no value is strictly positive, the result is all zeros and
//!      flagged `degenerate` (no division is attempted).
//!
//! The normalizer holds no state between calls: every field gets its own
//! normalization scope.

use u3_types::{sanitize_value, NormalizedField, ScalarField, U3Error, U3Result};

pub const DEFAULT_CLIP_PERCENTILE: f64 = 95.0;

/// q-th percentile (0..=100) of the finite entries, linearly interpolated
/// between the two nearest order statistics. Returns 0.0 when there are no
/// finite entries.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_unstable_by(f64::total_cmp);

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Stateless sanitize → clip → rescale transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldNormalizer {
    clip_percentile: f64,
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self {
            clip_percentile: DEFAULT_CLIP_PERCENTILE,
        }
    }
}

impl FieldNormalizer {
    pub fn new(clip_percentile: f64) -> U3Result<Self> {
        if !(clip_percentile > 0.0 && clip_percentile <= 100.0) {
            return Err(U3Error::Config(format!(
                "clip_percentile must be in (0, 100], got {clip_percentile}"
            )));
        }
        Ok(Self { clip_percentile })
    }

    pub fn clip_percentile(&self) -> f64 {
        self.clip_percentile
    }

    pub fn normalize(&self, raw: &ScalarField) -> NormalizedField {
        let shape = raw.shape();

        // 1. Sanitize
        let mut substituted = 0usize;
        let mut values: Vec<f64> = raw
            .values()
            .iter()
            .map(|&v| {
                if !v.is_finite() {
                    substituted += 1;
                }
                sanitize_value(v, 0.0)
            })
            .collect();
        if substituted > 0 {
            log::warn!(
                "normalize: {substituted} of {} values non-finite, replaced with 0.0",
                values.len()
            );
        }

        // 2. Percentile over the sanitized array
        let bound = percentile(&values, self.clip_percentile);
        // A negative bound would invert the clip interval; everything floors to 0.
        let upper = bound.max(0.0);

        // 3. Clip
        for v in values.iter_mut() {
            *v = v.clamp(0.0, upper);
        }

        // 4. Rescale by the largest strictly positive entry
        let scale = values
            .iter()
            .copied()
            .filter(|&v| v > 0.0)
            .fold(0.0f64, f64::max);

        // 5. Degenerate field
        let degenerate = scale <= 0.0;
        if degenerate {
            log::warn!(
                "normalize: no strictly positive value among {} entries, returning zero field",
                values.len()
            );
            values.iter_mut().for_each(|v| *v = 0.0);
        } else {
            for v in values.iter_mut() {
                *v /= scale;
            }
        }

        log::debug!(
            "normalize: n={} p{}={bound:.6e} scale={scale:.6e} substituted={substituted}",
            values.len(),
            self.clip_percentile
        );

        NormalizedField {
            shape,
            values,
            clip_bound: bound,
            scale,
            substituted,
            degenerate,
        }
    }

    /// Normalize a bare value slice (1D shape).
    pub fn normalize_values(&self, values: &[f64]) -> NormalizedField {
        self.normalize(&ScalarField::from_values(values.to_vec()))
    }
}
