use crate::dynamics::state::SAIL_LIMIT;

/// Maximum sail opening for target heading `target` with the wind blowing
/// towards `wind_dir`: near 0 close-hauled, `SAIL_LIMIT` dead downwind.
pub fn max_sail_angle(wind_dir: f64, target: f64) -> f64 {
    SAIL_LIMIT * ((wind_dir - target).cos() + 1.0) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn running_opens_fully() {
        assert!((max_sail_angle(0.7, 0.7) - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn head_to_wind_closes() {
        assert!(max_sail_angle(0.0, PI).abs() < 1e-12);
    }

    #[test]
    fn beam_reach_is_half_open() {
        assert!((max_sail_angle(0.0, FRAC_PI_2) - FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn always_within_limits() {
        for i in 0..=360 {
            let psi = i as f64 * (2.0 * PI / 360.0);
            let s = max_sail_angle(psi, 0.4);
            assert!((0.0..=SAIL_LIMIT).contains(&s));
        }
    }
}
