use serde::Serialize;

use crate::analyzers::types::{TransportAvailability, TransportMode};

/// Minimum availability shown on the filtered chart, as a fraction in
/// `[0, 1]`. Built from a whole-number percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Threshold {
    percent: u8,
}

impl Threshold {
    pub const DEFAULT_PERCENT: u8 = 30;

    /// Percentages above 100 are clamped to 100.
    pub fn from_percent(percent: u8) -> Self {
        Self {
            percent: percent.min(100),
        }
    }

    pub fn percent(self) -> u8 {
        self.percent
    }

    pub fn fraction(self) -> f64 {
        f64::from(self.percent) / 100.0
    }

    /// Zeroes every defined cell strictly below the threshold. Cells at or
    /// above it, and undefined cells, pass through unchanged.
    pub fn apply(self, table: &TransportAvailability) -> TransportAvailability {
        let cutoff = self.fraction();
        let mut filtered = table.clone();

        for row in &mut filtered.rows {
            for mode in TransportMode::ALL {
                let cell = row.value_mut(mode);
                if let Some(v) = *cell {
                    if v < cutoff {
                        *cell = Some(0.0);
                    }
                }
            }
        }

        filtered
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::from_percent(Self::DEFAULT_PERCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::{BucketAvailability, RoadCondition};

    fn table() -> TransportAvailability {
        TransportAvailability {
            rows: vec![
                BucketAvailability {
                    condition: RoadCondition::Bad,
                    towns: 10,
                    bus_stops: Some(0.1),
                    vans: Some(0.60),
                    taxis: Some(0.25),
                    buses: Some(0.40),
                },
                BucketAvailability {
                    condition: RoadCondition::Acceptable,
                    towns: 0,
                    bus_stops: None,
                    vans: None,
                    taxis: None,
                    buses: None,
                },
                BucketAvailability {
                    condition: RoadCondition::Good,
                    towns: 4,
                    bus_stops: Some(0.3),
                    vans: Some(0.05),
                    taxis: Some(0.75),
                    buses: Some(0.299),
                },
            ],
        }
    }

    #[test]
    fn test_bad_bucket_at_thirty_percent() {
        let filtered = Threshold::from_percent(30).apply(&table());

        assert_eq!(filtered.get(RoadCondition::Bad, TransportMode::Buses), Some(0.40));
        assert_eq!(filtered.get(RoadCondition::Bad, TransportMode::Vans), Some(0.60));
        assert_eq!(filtered.get(RoadCondition::Bad, TransportMode::Taxis), Some(0.0));
    }

    #[test]
    fn test_cell_equal_to_threshold_kept() {
        let filtered = Threshold::from_percent(30).apply(&table());
        assert_eq!(filtered.get(RoadCondition::Good, TransportMode::BusStops), Some(0.3));
        assert_eq!(filtered.get(RoadCondition::Good, TransportMode::Buses), Some(0.0));
    }

    #[test]
    fn test_undefined_stays_undefined() {
        let filtered = Threshold::from_percent(100).apply(&table());
        for mode in TransportMode::ALL {
            assert_eq!(filtered.get(RoadCondition::Acceptable, mode), None);
        }
    }

    #[test]
    fn test_zero_threshold_is_identity() {
        let original = table();
        assert_eq!(Threshold::from_percent(0).apply(&original), original);
    }

    #[test]
    fn test_idempotent() {
        for pct in [0, 5, 30, 41, 75, 100] {
            let t = Threshold::from_percent(pct);
            let once = t.apply(&table());
            let twice = t.apply(&once);
            assert_eq!(once, twice, "threshold {pct}%");
        }
    }

    #[test]
    fn test_monotonic() {
        let original = table();
        for low in 0..=100u8 {
            let at_low = Threshold::from_percent(low).apply(&original);
            for high in (low + 1..=100u8).step_by(7) {
                let at_high = Threshold::from_percent(high).apply(&original);
                for condition in RoadCondition::ALL {
                    for mode in TransportMode::ALL {
                        let hi = at_high.get(condition, mode);
                        let lo = at_low.get(condition, mode);
                        assert!(hi == lo || hi == Some(0.0), "{low}% -> {high}%: {lo:?} vs {hi:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_percent_clamped() {
        assert_eq!(Threshold::from_percent(250).percent(), 100);
        assert_eq!(Threshold::from_percent(250).fraction(), 1.0);
        assert_eq!(Threshold::default().fraction(), 0.3);
    }
}
