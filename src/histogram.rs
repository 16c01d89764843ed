// 2D angular histogram with per-bin probability and mean energy

use anyhow::{anyhow, Result};

use crate::events::EventTable;
use crate::grid::AngularGrid;

/// Binned distribution over an angular grid, theta-major flat layout.
///
/// `probability` is normalized over in-range events only, so it sums to 1.
/// Empty bins carry `None` mean energy rather than a poisoned NaN.
#[derive(Debug, Clone)]
pub struct BinnedDistribution {
    pub counts: Vec<u64>,
    pub probability: Vec<f64>,
    pub mean_energy: Vec<Option<f64>>,
    pub in_range: u64,
    pub dropped: u64,
}

impl BinnedDistribution {
    pub fn max_probability(&self) -> f64 {
        self.probability.iter().cloned().fold(0.0, f64::max)
    }
}

/// Assign every event to a grid cell in a single pass. Events with
/// out-of-range or non-finite coordinates, or non-finite energy, are
/// dropped and counted.
pub fn bin_events(grid: &AngularGrid, events: &EventTable) -> Result<BinnedDistribution> {
    let bins = grid.bin_count();
    let mut counts = vec![0u64; bins];
    let mut energy_sum = vec![0.0f64; bins];
    let mut dropped = 0u64;

    for i in 0..events.len() {
        let energy = events.energy[i];
        if !energy.is_finite() {
            dropped += 1;
            continue;
        }
        match grid.locate(events.theta[i], events.phi[i]) {
            Some((ti, pj)) => {
                let k = grid.flat_index(ti, pj);
                counts[k] += 1;
                energy_sum[k] += energy;
            }
            None => dropped += 1,
        }
    }

    let in_range: u64 = counts.iter().sum();
    if in_range == 0 {
        return Err(anyhow!(
            "No events fall inside the angular grid ({} dropped)",
            dropped
        ));
    }

    let total = in_range as f64;
    let probability = counts.iter().map(|&c| c as f64 / total).collect();
    let mean_energy = counts
        .iter()
        .zip(&energy_sum)
        .map(|(&c, &sum)| if c > 0 { Some(sum / c as f64) } else { None })
        .collect();

    Ok(BinnedDistribution {
        counts,
        probability,
        mean_energy,
        in_range,
        dropped,
    })
}
