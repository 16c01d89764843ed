// Angular binning axes for the 2D event histogram

use anyhow::{bail, Result};
use std::f64::consts::PI;

/// One binning axis: `bins` uniform cells delimited by `bins + 1` edges.
#[derive(Debug, Clone)]
pub struct Axis {
    edges: Vec<f64>,
}

impl Axis {
    /// Build uniform edges from `lo` to `hi` (inclusive).
    pub fn linspace(lo: f64, hi: f64, bins: usize) -> Result<Self> {
        if bins == 0 {
            bail!("Axis must have at least one bin");
        }
        if !lo.is_finite() || !hi.is_finite() {
            bail!("Axis bounds must be finite (got {} .. {})", lo, hi);
        }
        if lo >= hi {
            bail!("Axis range is empty: {} .. {}", lo, hi);
        }

        let step = (hi - lo) / bins as f64;
        let mut edges = Vec::with_capacity(bins + 1);
        for k in 0..bins {
            edges.push(lo + k as f64 * step);
        }
        // Exact upper bound, immune to step rounding
        edges.push(hi);

        Ok(Axis { edges })
    }

    pub fn bins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn lo(&self) -> f64 {
        self.edges[0]
    }

    pub fn hi(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Lower and upper edge of one bin.
    pub fn bounds(&self, bin: usize) -> (f64, f64) {
        (self.edges[bin], self.edges[bin + 1])
    }

    /// Bin lookup with 2D-histogram conventions: interior bins are half-open
    /// `[lo, hi)`, the last bin also owns its upper edge. Out-of-range and
    /// non-finite values have no bin.
    pub fn bin_index(&self, v: f64) -> Option<usize> {
        if !v.is_finite() || v < self.lo() || v > self.hi() {
            return None;
        }
        if v >= self.hi() {
            return Some(self.bins() - 1);
        }
        Some(self.edges.partition_point(|&e| e <= v) - 1)
    }
}

/// The theta x phi grid events are binned on. Bin (i, j) covers theta cell i
/// and phi cell j; flat indexing is theta-major.
#[derive(Debug, Clone)]
pub struct AngularGrid {
    pub theta: Axis,
    pub phi: Axis,
}

impl AngularGrid {
    /// Grid over `0 .. theta_max` (radians) and the full azimuth `0 .. 2*pi`.
    pub fn new(theta_max: f64, theta_bins: usize, phi_bins: usize) -> Result<Self> {
        Ok(AngularGrid {
            theta: Axis::linspace(0.0, theta_max, theta_bins)?,
            phi: Axis::linspace(0.0, 2.0 * PI, phi_bins)?,
        })
    }

    pub fn bin_count(&self) -> usize {
        self.theta.bins() * self.phi.bins()
    }

    pub fn flat_index(&self, theta_bin: usize, phi_bin: usize) -> usize {
        theta_bin * self.phi.bins() + phi_bin
    }

    /// Locate the bin of one event, or None when either coordinate falls
    /// outside the grid.
    pub fn locate(&self, theta: f64, phi: f64) -> Option<(usize, usize)> {
        Some((self.theta.bin_index(theta)?, self.phi.bin_index(phi)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_linspace_edges() {
        let axis = Axis::linspace(0.0, 1.0, 4).unwrap();
        assert_eq!(axis.bins(), 4);
        assert_eq!(axis.edges().len(), 5);
        assert_eq!(axis.lo(), 0.0);
        assert_eq!(axis.hi(), 1.0);
        assert!((axis.edges()[1] - 0.25).abs() < 1e-12);
        assert!((axis.edges()[3] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_linspace_exact_upper_edge() {
        // The last edge must be hi itself, not lo + bins * step
        let axis = Axis::linspace(0.0, FRAC_PI_2, 9).unwrap();
        assert_eq!(axis.hi(), FRAC_PI_2);
    }

    #[test]
    fn test_linspace_rejects_bad_input() {
        assert!(Axis::linspace(0.0, 1.0, 0).is_err());
        assert!(Axis::linspace(1.0, 1.0, 3).is_err());
        assert!(Axis::linspace(2.0, 1.0, 3).is_err());
        assert!(Axis::linspace(0.0, f64::NAN, 3).is_err());
        assert!(Axis::linspace(f64::NEG_INFINITY, 1.0, 3).is_err());
    }

    #[test]
    fn test_bin_index_interior_half_open() {
        let axis = Axis::linspace(0.0, 1.0, 4).unwrap();
        assert_eq!(axis.bin_index(0.0), Some(0));
        assert_eq!(axis.bin_index(0.2499), Some(0));
        // A value sitting on an interior edge belongs to the upper bin
        assert_eq!(axis.bin_index(0.25), Some(1));
        assert_eq!(axis.bin_index(0.5), Some(2));
    }

    #[test]
    fn test_bin_index_top_edge_closed() {
        let axis = Axis::linspace(0.0, 1.0, 4).unwrap();
        assert_eq!(axis.bin_index(0.999), Some(3));
        assert_eq!(axis.bin_index(1.0), Some(3));
    }

    #[test]
    fn test_bin_index_out_of_range() {
        let axis = Axis::linspace(0.0, 1.0, 4).unwrap();
        assert_eq!(axis.bin_index(-0.001), None);
        assert_eq!(axis.bin_index(1.001), None);
        assert_eq!(axis.bin_index(f64::NAN), None);
        assert_eq!(axis.bin_index(f64::INFINITY), None);
    }

    #[test]
    fn test_grid_flat_index_theta_major() {
        let grid = AngularGrid::new(FRAC_PI_2, 3, 5).unwrap();
        assert_eq!(grid.bin_count(), 15);
        assert_eq!(grid.flat_index(0, 0), 0);
        assert_eq!(grid.flat_index(0, 4), 4);
        assert_eq!(grid.flat_index(1, 0), 5);
        assert_eq!(grid.flat_index(2, 4), 14);
    }

    #[test]
    fn test_grid_locate() {
        let grid = AngularGrid::new(FRAC_PI_2, 9, 19).unwrap();
        assert_eq!(grid.locate(0.0, 0.0), Some((0, 0)));
        // Top edges land in the last bins
        assert_eq!(grid.locate(FRAC_PI_2, 2.0 * PI), Some((8, 18)));
        // One out-of-range coordinate drops the event
        assert_eq!(grid.locate(2.0, 0.1), None);
        assert_eq!(grid.locate(0.1, -0.1), None);
        assert_eq!(grid.locate(f64::NAN, 0.1), None);
    }
}
