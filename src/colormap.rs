// Energy colorscale and the scale mapping bin means onto it

use plotters::style::RGBColor;

const ENERGY_STOPS: [(f64, RGBColor); 8] = [
    (0.0, RGBColor(0, 0, 0)),
    (0.14, RGBColor(0, 0, 255)),
    (0.28, RGBColor(173, 216, 230)),
    (0.42, RGBColor(144, 238, 144)),
    (0.57, RGBColor(255, 255, 0)),
    (0.71, RGBColor(255, 165, 0)),
    (0.85, RGBColor(255, 0, 0)),
    (1.0, RGBColor(165, 42, 42)),
];

/// Piecewise-linear colorscale over positions in [0, 1].
pub struct ColorMap {
    stops: Vec<(f64, RGBColor)>,
}

impl ColorMap {
    /// Black through blue, green, yellow and red up to brown, the ramp
    /// used for mean kinetic energy.
    pub fn energy_spectrum() -> Self {
        ColorMap {
            stops: ENERGY_STOPS.to_vec(),
        }
    }

    /// Color at position `t`, clamped to the scale's ends.
    pub fn sample(&self, t: f64) -> RGBColor {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };

        let mut lo = self.stops[0];
        for &hi in &self.stops[1..] {
            if t <= hi.0 {
                let span = hi.0 - lo.0;
                let s = if span > 0.0 { (t - lo.0) / span } else { 0.0 };
                return lerp(lo.1, hi.1, s);
            }
            lo = hi;
        }
        self.stops[self.stops.len() - 1].1
    }
}

fn lerp(a: RGBColor, b: RGBColor, s: f64) -> RGBColor {
    let channel = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * s).round() as u8;
    RGBColor(channel(a.0, b.0), channel(a.1, b.1), channel(a.2, b.2))
}

/// Linear mapping from an energy range onto colorscale positions.
#[derive(Debug, Clone, Copy)]
pub struct EnergyScale {
    min: f64,
    max: f64,
}

impl EnergyScale {
    /// Capture the range of the given finite values. A degenerate range is
    /// widened by one unit each way so every value normalizes mid-scale.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if min > max {
            return EnergyScale { min: 0.0, max: 1.0 };
        }
        if min == max {
            return EnergyScale {
                min: min - 1.0,
                max: max + 1.0,
            };
        }
        EnergyScale { min, max }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Position of `v` in [0, 1], clamped.
    pub fn normalize(&self, v: f64) -> f64 {
        ((v - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(c: RGBColor) -> (u8, u8, u8) {
        (c.0, c.1, c.2)
    }

    #[test]
    fn test_sample_at_stops() {
        let map = ColorMap::energy_spectrum();
        assert_eq!(rgb(map.sample(0.0)), (0, 0, 0));
        assert_eq!(rgb(map.sample(0.57)), (255, 255, 0));
        assert_eq!(rgb(map.sample(1.0)), (165, 42, 42));
    }

    #[test]
    fn test_sample_interpolates() {
        let map = ColorMap::energy_spectrum();
        // Halfway between black and blue
        assert_eq!(rgb(map.sample(0.07)), (0, 0, 128));
    }

    #[test]
    fn test_sample_clamps() {
        let map = ColorMap::energy_spectrum();
        assert_eq!(rgb(map.sample(-3.0)), (0, 0, 0));
        assert_eq!(rgb(map.sample(7.0)), (165, 42, 42));
        assert_eq!(rgb(map.sample(f64::NAN)), (0, 0, 0));
    }

    #[test]
    fn test_scale_from_values() {
        let scale = EnergyScale::from_values(vec![3.0, 9.0, 5.0]);
        assert_eq!(scale.min(), 3.0);
        assert_eq!(scale.max(), 9.0);
        assert_eq!(scale.normalize(3.0), 0.0);
        assert_eq!(scale.normalize(9.0), 1.0);
        assert!((scale.normalize(6.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_scale_uniform_values_widened() {
        let scale = EnergyScale::from_values(vec![4.0, 4.0]);
        assert_eq!(scale.min(), 3.0);
        assert_eq!(scale.max(), 5.0);
        assert_eq!(scale.normalize(4.0), 0.5);
    }

    #[test]
    fn test_scale_ignores_non_finite() {
        let scale = EnergyScale::from_values(vec![f64::NAN, 2.0, 8.0, f64::INFINITY]);
        assert_eq!(scale.min(), 2.0);
        assert_eq!(scale.max(), 8.0);
    }

    #[test]
    fn test_scale_empty_falls_back() {
        let scale = EnergyScale::from_values(std::iter::empty());
        assert_eq!((scale.min(), scale.max()), (0.0, 1.0));
    }

    #[test]
    fn test_normalize_clamps() {
        let scale = EnergyScale::from_values(vec![0.0, 10.0]);
        assert_eq!(scale.normalize(-5.0), 0.0);
        assert_eq!(scale.normalize(15.0), 1.0);
    }
}
