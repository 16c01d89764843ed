// CSV export of the binned distribution

use anyhow::{Context, Result};
use std::io::Write;

use crate::grid::AngularGrid;
use crate::histogram::BinnedDistribution;

/// Write one row per grid cell with bin edges, count, probability and mean
/// energy, theta-major. Empty bins leave the mean column blank.
pub fn write_bins_csv<W: Write>(
    writer: W,
    grid: &AngularGrid,
    dist: &BinnedDistribution,
) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "theta_lo",
        "theta_hi",
        "phi_lo",
        "phi_hi",
        "count",
        "probability",
        "mean_energy",
    ])
    .context("Failed to write bin export header")?;

    for ti in 0..grid.theta.bins() {
        let (theta_lo, theta_hi) = grid.theta.bounds(ti);
        for pj in 0..grid.phi.bins() {
            let (phi_lo, phi_hi) = grid.phi.bounds(pj);
            let k = grid.flat_index(ti, pj);
            let mean = match dist.mean_energy[k] {
                Some(m) => m.to_string(),
                None => String::new(),
            };
            out.write_record([
                theta_lo.to_string(),
                theta_hi.to_string(),
                phi_lo.to_string(),
                phi_hi.to_string(),
                dist.counts[k].to_string(),
                dist.probability[k].to_string(),
                mean,
            ])
            .context("Failed to write bin export record")?;
        }
    }

    out.flush().context("Failed to flush bin export")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventTable;
    use crate::histogram::bin_events;
    use std::f64::consts::FRAC_PI_2;

    fn export_lines() -> (AngularGrid, BinnedDistribution, Vec<String>) {
        let grid = AngularGrid::new(FRAC_PI_2, 2, 4).unwrap();
        let table = EventTable {
            theta: vec![0.1, 0.2],
            phi: vec![0.1, 0.2],
            energy: vec![2.0, 4.0],
        };
        let dist = bin_events(&grid, &table).unwrap();

        let mut buf = Vec::new();
        write_bins_csv(&mut buf, &grid, &dist).unwrap();
        let lines = String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect();
        (grid, dist, lines)
    }

    #[test]
    fn test_header_and_row_count() {
        let (grid, _, lines) = export_lines();
        assert_eq!(
            lines[0],
            "theta_lo,theta_hi,phi_lo,phi_hi,count,probability,mean_energy"
        );
        assert_eq!(lines.len(), 1 + grid.bin_count());
    }

    #[test]
    fn test_occupied_bin_row() {
        let (_, _, lines) = export_lines();
        // Bin (0, 0) is the first data row
        let fields: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(fields[0], "0");
        assert_eq!(fields[4], "2");
        assert_eq!(fields[5], "1");
        assert_eq!(fields[6], "3");
    }

    #[test]
    fn test_empty_bin_has_blank_mean() {
        let (_, _, lines) = export_lines();
        let fields: Vec<&str> = lines[2].split(',').collect();
        assert_eq!(fields[4], "0");
        assert_eq!(fields[5], "0");
        assert_eq!(fields[6], "");
    }

    #[test]
    fn test_rows_are_theta_major() {
        let (grid, _, lines) = export_lines();
        // First phi.bins() rows share the first theta interval
        let (theta_lo, theta_hi) = grid.theta.bounds(0);
        for line in &lines[1..1 + grid.phi.bins()] {
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields[0], theta_lo.to_string());
            assert_eq!(fields[1], theta_hi.to_string());
        }
    }
}
