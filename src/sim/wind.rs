use crate::dynamics::state::Wind;

// ---------------------------------------------------------------------------
// Scripted wind sources for closed-loop runs
// ---------------------------------------------------------------------------

/// Source of the wind observation for a given simulation step.
pub trait WindProvider {
    fn wind_at(&mut self, step: usize, time: f64) -> Wind;
}

/// Same wind on every step.
#[derive(Debug, Clone, Copy)]
pub struct ConstantWind(pub Wind);

impl WindProvider for ConstantWind {
    fn wind_at(&mut self, _step: usize, _time: f64) -> Wind {
        self.0
    }
}

/// Piecewise-constant wind: `initial`, then each change from its step onward.
#[derive(Debug, Clone)]
pub struct SteppedWind {
    initial: Wind,
    changes: Vec<(usize, Wind)>,
}

impl SteppedWind {
    pub fn new(initial: Wind) -> Self {
        Self { initial, changes: vec![] }
    }

    /// Add a change taking effect at `from_step`. Changes are kept sorted.
    pub fn change_at(mut self, from_step: usize, wind: Wind) -> Self {
        let idx = self.changes.partition_point(|(s, _)| *s <= from_step);
        self.changes.insert(idx, (from_step, wind));
        self
    }

    pub fn changes(&self) -> &[(usize, Wind)] {
        &self.changes
    }
}

impl WindProvider for SteppedWind {
    fn wind_at(&mut self, step: usize, _time: f64) -> Wind {
        self.changes
            .iter()
            .take_while(|(s, _)| *s <= step)
            .last()
            .map_or(self.initial, |(_, w)| *w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepped_wind_switches_at_steps() {
        let mut w = SteppedWind::new(Wind::new(0.0, 10.0))
            .change_at(20, Wind::new(2.0, 12.0))
            .change_at(10, Wind::new(1.0, 11.0));
        assert_eq!(w.wind_at(0, 0.0).direction, 0.0);
        assert_eq!(w.wind_at(9, 9.0).direction, 0.0);
        assert_eq!(w.wind_at(10, 10.0).direction, 1.0);
        assert_eq!(w.wind_at(19, 19.0).direction, 1.0);
        assert_eq!(w.wind_at(500, 500.0).speed, 12.0);
    }

    #[test]
    fn constant_wind_never_changes() {
        let mut w = ConstantWind(Wind::new(0.5, 3.0));
        assert_eq!(w.wind_at(0, 0.0), w.wind_at(1000, 1000.0));
    }
}
