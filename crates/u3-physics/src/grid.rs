// ─────────────────────────────────────────────────────────────────────
// Universe U3 — Coordinate Grid
// ─────────────────────────────────────────────────────────────────────
//! Radial and angular sample sets and their full outer-product mesh.
//!
//! Mesh ordering is r-major, then θ, then φ, for 1D, 2D and 3D grids
//! alike. Every downstream array (raw field, normalized field, Cartesian
//! points) shares this index order.

use serde::Serialize;

use u3_types::{
    AngularAxis, FieldShape, GridSpec, RadialAxis, RadialSampling, U3Result,
};

/// `count` evenly spaced samples starting at `start`.
///
/// With `endpoint` the last sample is exactly `end`; otherwise the range is
/// divided into `count` steps and `end` itself is excluded. A single sample
/// is always `start`.
pub fn linspace(start: f64, end: f64, count: usize, endpoint: bool) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let divisions = (if endpoint { count - 1 } else { count }) as f64;
            let step = (end - start) / divisions;
            let mut out: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            if endpoint {
                out[count - 1] = end;
            }
            out
        }
    }
}

/// `count` geometrically spaced samples from `start` to `end` inclusive.
///
/// Both bounds must be strictly positive.
pub fn logspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    let mut out: Vec<f64> = linspace(start.ln(), end.ln(), count, true)
        .into_iter()
        .map(f64::exp)
        .collect();
    if let Some(first) = out.first_mut() {
        *first = start;
    }
    if count > 1 {
        out[count - 1] = end;
    }
    out
}

/// Radial samples for a validated axis.
pub fn radial_samples(axis: &RadialAxis) -> Vec<f64> {
    match axis.sampling {
        RadialSampling::Linear => linspace(axis.r_min, axis.r_max, axis.count, true),
        RadialSampling::Logarithmic => logspace(axis.r_min, axis.r_max, axis.count),
    }
}

/// Angular samples for a validated axis.
pub fn angular_samples(axis: &AngularAxis) -> Vec<f64> {
    linspace(axis.start, axis.end, axis.count, axis.endpoint)
}

/// Materialized (r, θ, φ) triples, struct-of-arrays.
///
/// Absent angular axes are filled with 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mesh {
    pub shape: FieldShape,
    pub r: Vec<f64>,
    pub theta: Vec<f64>,
    pub phi: Vec<f64>,
}

impl Mesh {
    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }
}

/// Sample sets of a validated `GridSpec` plus their outer-product mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateGrid {
    spec: GridSpec,
    radii: Vec<f64>,
    thetas: Vec<f64>,
    phis: Vec<f64>,
    mesh: Mesh,
}

impl CoordinateGrid {
    /// Validate `spec` and materialize the mesh.
    pub fn new(spec: GridSpec) -> U3Result<Self> {
        spec.validate()?;

        let radii = radial_samples(&spec.radial);
        let thetas = spec.polar.as_ref().map_or_else(|| vec![0.0], angular_samples);
        let phis = spec.azimuth.as_ref().map_or_else(|| vec![0.0], angular_samples);

        let shape = FieldShape::new(radii.len(), thetas.len(), phis.len());
        let n = shape.len();
        let mut mesh = Mesh {
            shape,
            r: Vec::with_capacity(n),
            theta: Vec::with_capacity(n),
            phi: Vec::with_capacity(n),
        };
        for &r in &radii {
            for &theta in &thetas {
                for &phi in &phis {
                    mesh.r.push(r);
                    mesh.theta.push(theta);
                    mesh.phi.push(phi);
                }
            }
        }

        log::debug!(
            "grid built: {}D, {} × {} × {} = {} points",
            spec.dimensionality(),
            shape.n_r,
            shape.n_theta,
            shape.n_phi,
            n
        );

        Ok(Self {
            spec,
            radii,
            thetas,
            phis,
            mesh,
        })
    }

    /// 1D grid over a single radial axis.
    pub fn radial(axis: RadialAxis) -> U3Result<Self> {
        Self::new(GridSpec::radial(axis))
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn shape(&self) -> FieldShape {
        self.mesh.shape
    }

    pub fn dimensionality(&self) -> usize {
        self.spec.dimensionality()
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// Polar samples, `None` for a radial-only grid.
    pub fn thetas(&self) -> Option<&[f64]> {
        self.spec.polar.map(|_| self.thetas.as_slice())
    }

    /// Azimuthal samples, `None` unless the grid is spherical.
    pub fn phis(&self) -> Option<&[f64]> {
        self.spec.azimuth.map(|_| self.phis.as_slice())
    }

    /// θ samples used by the mesh (a single 0.0 when the axis is absent).
    pub(crate) fn mesh_thetas(&self) -> &[f64] {
        &self.thetas
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn len(&self) -> usize {
        self.mesh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};
    use u3_types::U3Error;

    #[test]
    fn test_linspace_inclusive() {
        let xs = linspace(0.0, 1.0, 5, true);
        assert_eq!(xs, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_linspace_exclusive() {
        let xs = linspace(0.0, 1.0, 4, false);
        assert_eq!(xs, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_linspace_single_sample() {
        assert_eq!(linspace(2.0, 9.0, 1, true), vec![2.0]);
        assert!(linspace(2.0, 9.0, 0, true).is_empty());
    }

    #[test]
    fn test_logspace_geometric() {
        let rs = logspace(0.01, 100.0, 5);
        let expected = [0.01, 0.1, 1.0, 10.0, 100.0];
        for (r, e) in rs.iter().zip(expected) {
            assert!((r / e - 1.0).abs() < 1e-12, "{r} vs {e}");
        }
        // Constant ratio between neighbours
        let ratio = rs[1] / rs[0];
        for w in rs.windows(2) {
            assert!((w[1] / w[0] - ratio).abs() < 1e-9);
        }
    }

    #[test]
    fn test_logspace_exact_endpoints() {
        let rs = logspace(0.01, 15.0, 30);
        assert_eq!(rs[0], 0.01);
        assert_eq!(rs[29], 15.0);
    }

    #[test]
    fn test_mesh_length_3d() {
        let spec = GridSpec::spherical(
            RadialAxis::logarithmic(0.01, 15.0, 3),
            AngularAxis::half_turn(2),
            AngularAxis::full_turn(2),
        );
        let grid = CoordinateGrid::new(spec).unwrap();
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.dimensionality(), 3);
        assert_eq!(grid.shape(), FieldShape::new(3, 2, 2));
    }

    #[test]
    fn test_mesh_length_2d_and_1d() {
        let polar = CoordinateGrid::new(GridSpec::polar(
            RadialAxis::linear(0.1, 10.0, 7),
            AngularAxis::full_turn(5),
        ))
        .unwrap();
        assert_eq!(polar.len(), 35);
        assert!(polar.phis().is_none());

        let radial = CoordinateGrid::radial(RadialAxis::linear(0.01, 15.0, 200)).unwrap();
        assert_eq!(radial.len(), 200);
        assert!(radial.thetas().is_none());
        assert!(radial.mesh().theta.iter().all(|&t| t == 0.0));
    }

    #[test]
    fn test_mesh_ordering_r_major() {
        let spec = GridSpec::spherical(
            RadialAxis::linear(1.0, 2.0, 2),
            AngularAxis::half_turn(3),
            AngularAxis::full_turn(4),
        );
        let grid = CoordinateGrid::new(spec).unwrap();
        let mesh = grid.mesh();
        let shape = grid.shape();
        for (i_r, &r) in grid.radii().iter().enumerate() {
            for (i_t, &t) in grid.thetas().unwrap().iter().enumerate() {
                for (i_p, &p) in grid.phis().unwrap().iter().enumerate() {
                    let idx = shape.index(i_r, i_t, i_p);
                    assert_eq!(mesh.r[idx], r);
                    assert_eq!(mesh.theta[idx], t);
                    assert_eq!(mesh.phi[idx], p);
                }
            }
        }
    }

    #[test]
    fn test_angular_ranges() {
        let grid = CoordinateGrid::new(GridSpec::spherical(
            RadialAxis::linear(1.0, 2.0, 1),
            AngularAxis::half_turn(30),
            AngularAxis::full_turn(60),
        ))
        .unwrap();
        let thetas = grid.thetas().unwrap();
        assert_eq!(thetas[0], 0.0);
        assert_eq!(thetas[29], PI);
        let phis = grid.phis().unwrap();
        assert_eq!(phis[59], TAU);
    }

    #[test]
    fn test_log_grid_rejects_zero_r_min() {
        let err = CoordinateGrid::radial(RadialAxis::logarithmic(0.0, 15.0, 10)).unwrap_err();
        assert!(matches!(err, U3Error::InvalidGridSpec(_)));
    }

    #[test]
    fn test_zero_count_rejected() {
        let err = CoordinateGrid::new(GridSpec::spherical(
            RadialAxis::linear(0.1, 1.0, 4),
            AngularAxis::half_turn(4),
            AngularAxis::full_turn(0),
        ))
        .unwrap_err();
        assert!(matches!(err, U3Error::InvalidGridSpec(_)));
    }
}
