// ─────────────────────────────────────────────────────────────────────
// Universe U3 — Canonical Parameters
// ─────────────────────────────────────────────────────────────────────
//! Canonical constants, grids and phase lists of the U3 toy models.
//!
//! Radii are in arbitrary units read as Mpc by the renderer
//! (r = 10 ↔ 10 Mpc).

use u3_types::{
    AngularAxis, DimensionFormula, FieldParameters, GridSpec, Phase, RadialAxis,
    ZetaParameters,
};

/// Fractional temporal order α.
pub const ALPHA: f64 = 1.2;

/// Default cosmic time snapshot; t^(-α) = 1.
pub const T_SNAPSHOT: f64 = 1.0;

/// Snapshots swept by time-evolution series.
pub const TIME_SNAPSHOTS: [f64; 5] = [0.1, 0.5, 1.0, 2.0, 5.0];

/// Spherical (3D) grid extent.
pub const SPHERICAL_R_MIN: f64 = 0.01;
pub const SPHERICAL_R_MAX: f64 = 15.0;

/// Polar (2D) grid extent.
pub const POLAR_R_MIN: f64 = 0.1;
pub const POLAR_R_MAX: f64 = 10.0;

/// Zeta baseline density ρ₀ and wavelength λ.
pub const ZETA_RHO_0: f64 = 1.0;
pub const ZETA_WAVELENGTH: f64 = 1.0;

pub const N_ZETA_PHASES: usize = 4;

/// ζ per phase, in evolution order.
pub const ZETA_VALUES: [f64; N_ZETA_PHASES] = [314.0, 188.0, 188.0, 278.0];

pub const ZETA_PHASE_NAMES: [&str; N_ZETA_PHASES] = [
    "Initial Phase",
    "First Phase",
    "Second Phase",
    "Third Phase",
];

/// Contour levels drawn over normalized polar fields.
pub const CONTOUR_LEVELS: [f64; 3] = [0.2, 0.5, 0.8];

/// Log-spaced 3D grid: r ∈ [0.01, 15] ×30, θ ∈ [0, π] ×30, φ ∈ [0, 2π] ×60.
pub fn spherical_log_grid() -> GridSpec {
    GridSpec::spherical(
        RadialAxis::logarithmic(SPHERICAL_R_MIN, SPHERICAL_R_MAX, 30),
        AngularAxis::half_turn(30),
        AngularAxis::full_turn(60),
    )
}

/// Linear 2D polar grid: r ∈ [0.1, 10] ×200, θ ∈ [0, 2π] ×720.
pub fn polar_linear_grid() -> GridSpec {
    GridSpec::polar(
        RadialAxis::linear(POLAR_R_MIN, POLAR_R_MAX, 200),
        AngularAxis::full_turn(720),
    )
}

/// Linear 3D grid for zeta phases: r ∈ [0.01, 15] ×100, θ ×50, φ ×100.
pub fn zeta_spherical_grid() -> GridSpec {
    GridSpec::spherical(
        RadialAxis::linear(SPHERICAL_R_MIN, SPHERICAL_R_MAX, 100),
        AngularAxis::half_turn(50),
        AngularAxis::full_turn(100),
    )
}

/// Fine radial axis for raw zeta profiles: r ∈ [0.01, 15] ×200.
pub fn zeta_profile_axis() -> RadialAxis {
    RadialAxis::linear(SPHERICAL_R_MIN, SPHERICAL_R_MAX, 200)
}

pub fn zeta_parameters(zeta: f64) -> FieldParameters {
    FieldParameters::Zeta(ZetaParameters {
        zeta,
        rho_0: ZETA_RHO_0,
        wavelength: ZETA_WAVELENGTH,
    })
}

/// The four canonical zeta phases, labelled "<name> (zeta=<ζ>)".
pub fn zeta_phases() -> Vec<Phase> {
    ZETA_PHASE_NAMES
        .iter()
        .zip(ZETA_VALUES)
        .map(|(name, zeta)| Phase::new(format!("{name} (zeta={zeta})"), zeta_parameters(zeta)))
        .collect()
}

/// One phase per cosmic-time snapshot for `formula`, all at α = 1.2.
pub fn time_snapshot_phases(formula: DimensionFormula) -> Vec<Phase> {
    TIME_SNAPSHOTS
        .iter()
        .map(|&t| {
            Phase::new(
                format!("t={t}"),
                FieldParameters::fractal(formula, ALPHA, t),
            )
        })
        .collect()
}

/// Fractal parameters at the default snapshot.
pub fn fractal_snapshot(formula: DimensionFormula) -> FieldParameters {
    FieldParameters::fractal(formula, ALPHA, T_SNAPSHOT)
}
