// ─────────────────────────────────────────────────────────────────────
// Universe U3 — Coordinate Transformer
// ─────────────────────────────────────────────────────────────────────
//! Spherical → Cartesian mapping for 3D rendering. Output index order
//! always equals mesh index order; no point is dropped or reordered.

use u3_types::CartesianPoints;

use crate::grid::Mesh;

/// x = r·sinθ·cosφ, y = r·sinθ·sinφ, z = r·cosθ.
#[inline]
pub fn spherical_to_cartesian(r: f64, theta: f64, phi: f64) -> (f64, f64, f64) {
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();
    (r * sin_t * cos_p, r * sin_t * sin_p, r * cos_t)
}

/// Cartesian coordinates of every mesh point.
pub fn to_cartesian(mesh: &Mesh) -> CartesianPoints {
    let mut points = CartesianPoints::with_capacity(mesh.len());
    for ((&r, &theta), &phi) in mesh.r.iter().zip(&mesh.theta).zip(&mesh.phi) {
        let (x, y, z) = spherical_to_cartesian(r, theta, phi);
        points.push(x, y, z);
    }
    points
}

/// Native (θ, r) rendering coordinates of a polar mesh.
pub fn polar_coordinates(mesh: &Mesh) -> (Vec<f64>, Vec<f64>) {
    (mesh.theta.clone(), mesh.r.clone())
}
