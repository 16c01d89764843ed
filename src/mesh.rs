// Polar bar geometry for the 3D distribution surface

use crate::grid::AngularGrid;
use crate::histogram::BinnedDistribution;

/// One quadrilateral face of a polar bar, in data space. `x` and `y` are
/// the projected angular plane, `z` is probability height. Faces of an
/// empty bin carry `None` energy and zero height.
#[derive(Debug, Clone)]
pub struct BarFace {
    pub corners: [(f64, f64, f64); 4],
    pub energy: Option<f64>,
}

impl BarFace {
    /// Mean corner position, used for depth ordering at draw time.
    pub fn centroid(&self) -> (f64, f64, f64) {
        let mut cx = 0.0;
        let mut cy = 0.0;
        let mut cz = 0.0;
        for &(x, y, z) in &self.corners {
            cx += x;
            cy += y;
            cz += z;
        }
        (cx / 4.0, cy / 4.0, cz / 4.0)
    }
}

fn polar_point(theta: f64, phi: f64) -> (f64, f64) {
    (theta * phi.cos(), theta * phi.sin())
}

/// Build one closed box per grid cell: bottom at z = 0, top at the cell's
/// probability, and four sides joining them. The angular footprint maps
/// through x = theta cos(phi), y = theta sin(phi), so bars fan out from
/// the origin.
pub fn build_bar_mesh(grid: &AngularGrid, dist: &BinnedDistribution) -> Vec<BarFace> {
    let mut faces = Vec::with_capacity(6 * grid.bin_count());

    for ti in 0..grid.theta.bins() {
        let (theta_lo, theta_hi) = grid.theta.bounds(ti);
        for pj in 0..grid.phi.bins() {
            let (phi_lo, phi_hi) = grid.phi.bounds(pj);
            let k = grid.flat_index(ti, pj);
            let height = dist.probability[k];
            let energy = dist.mean_energy[k];

            // Footprint corners, counterclockwise in the angular plane
            let ring = [
                polar_point(theta_lo, phi_lo),
                polar_point(theta_hi, phi_lo),
                polar_point(theta_hi, phi_hi),
                polar_point(theta_lo, phi_hi),
            ];

            let at = |(x, y): (f64, f64), z: f64| (x, y, z);

            faces.push(BarFace {
                corners: [
                    at(ring[0], 0.0),
                    at(ring[1], 0.0),
                    at(ring[2], 0.0),
                    at(ring[3], 0.0),
                ],
                energy,
            });
            faces.push(BarFace {
                corners: [
                    at(ring[0], height),
                    at(ring[1], height),
                    at(ring[2], height),
                    at(ring[3], height),
                ],
                energy,
            });
            for c in 0..4 {
                let next = (c + 1) % 4;
                faces.push(BarFace {
                    corners: [
                        at(ring[c], 0.0),
                        at(ring[next], 0.0),
                        at(ring[next], height),
                        at(ring[c], height),
                    ],
                    energy,
                });
            }
        }
    }

    faces
}
