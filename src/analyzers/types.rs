//! Data types produced by the aggregation pipeline.

use serde::Serialize;
use std::fmt;

use crate::dataset::RawRecord;

/// Road condition bucket a town is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RoadCondition {
    Bad,
    Acceptable,
    Good,
}

impl RoadCondition {
    /// Display and table order.
    pub const ALL: [RoadCondition; 3] = [
        RoadCondition::Bad,
        RoadCondition::Acceptable,
        RoadCondition::Good,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RoadCondition::Bad => "Bad",
            RoadCondition::Acceptable => "Acceptable",
            RoadCondition::Good => "Good",
        }
    }

    /// The record's road-quality indicator for this condition.
    pub fn indicator(self, record: &RawRecord) -> Option<f64> {
        match self {
            RoadCondition::Bad => record.road_bad,
            RoadCondition::Acceptable => record.road_acceptable,
            RoadCondition::Good => record.road_good,
        }
    }
}

impl fmt::Display for RoadCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a record's three road-quality indicators sort it into buckets.
///
/// The source encodes the condition as three 0/1 columns. Exactly one equal to
/// 1 is the normal case; rows where several or none equal 1 are kept distinct
/// so they are visible rather than silently dropped or double counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionClass {
    Classified(RoadCondition),
    /// More than one indicator equals 1. The record counts in every matched
    /// bucket.
    Overlapping(Vec<RoadCondition>),
    Unclassified,
}

impl ConditionClass {
    pub fn of(record: &RawRecord) -> Self {
        let matched: Vec<RoadCondition> = RoadCondition::ALL
            .into_iter()
            .filter(|c| c.indicator(record) == Some(1.0))
            .collect();

        match matched.as_slice() {
            [] => ConditionClass::Unclassified,
            [only] => ConditionClass::Classified(*only),
            _ => ConditionClass::Overlapping(matched),
        }
    }

    /// Whether a record with this class belongs to `condition`'s bucket.
    pub fn is_in(&self, condition: RoadCondition) -> bool {
        match self {
            ConditionClass::Classified(c) => *c == condition,
            ConditionClass::Overlapping(cs) => cs.contains(&condition),
            ConditionClass::Unclassified => false,
        }
    }
}

/// Public transport indicators carried per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    BusStops,
    Vans,
    Taxis,
    Buses,
}

impl TransportMode {
    pub const ALL: [TransportMode; 4] = [
        TransportMode::BusStops,
        TransportMode::Vans,
        TransportMode::Taxis,
        TransportMode::Buses,
    ];

    /// Modes drawn on the availability charts, in series order.
    pub const CHARTED: [TransportMode; 3] = [
        TransportMode::Buses,
        TransportMode::Vans,
        TransportMode::Taxis,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TransportMode::BusStops => "Bus stops",
            TransportMode::Vans => "Vans",
            TransportMode::Taxis => "Taxis",
            TransportMode::Buses => "Buses",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            TransportMode::BusStops => "#1F77B4",
            TransportMode::Vans => "#808080",
            TransportMode::Taxis => "#FF0000",
            TransportMode::Buses => "#FFFF00",
        }
    }

    pub fn value(self, record: &RawRecord) -> Option<f64> {
        match self {
            TransportMode::BusStops => record.bus_stops,
            TransportMode::Vans => record.vans,
            TransportMode::Taxis => record.taxis,
            TransportMode::Buses => record.buses,
        }
    }
}

/// Mean road-quality proportions for one governorate. `None` means the group
/// had no numeric values for that column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GovernorateAggregate {
    pub area_label: String,
    pub towns: usize,
    pub good: Option<f64>,
    pub acceptable: Option<f64>,
    pub bad: Option<f64>,
}

impl GovernorateAggregate {
    pub fn value(&self, condition: RoadCondition) -> Option<f64> {
        match condition {
            RoadCondition::Bad => self.bad,
            RoadCondition::Acceptable => self.acceptable,
            RoadCondition::Good => self.good,
        }
    }
}

/// Mean availability of each transport mode within one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketAvailability {
    pub condition: RoadCondition,
    pub towns: usize,
    pub bus_stops: Option<f64>,
    pub vans: Option<f64>,
    pub taxis: Option<f64>,
    pub buses: Option<f64>,
}

impl BucketAvailability {
    pub fn value(&self, mode: TransportMode) -> Option<f64> {
        match mode {
            TransportMode::BusStops => self.bus_stops,
            TransportMode::Vans => self.vans,
            TransportMode::Taxis => self.taxis,
            TransportMode::Buses => self.buses,
        }
    }

    pub(crate) fn value_mut(&mut self, mode: TransportMode) -> &mut Option<f64> {
        match mode {
            TransportMode::BusStops => &mut self.bus_stops,
            TransportMode::Vans => &mut self.vans,
            TransportMode::Taxis => &mut self.taxis,
            TransportMode::Buses => &mut self.buses,
        }
    }
}

/// Bucket × transport mode table, one row per [`RoadCondition`] in
/// [`RoadCondition::ALL`] order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportAvailability {
    pub rows: Vec<BucketAvailability>,
}

impl TransportAvailability {
    pub fn row(&self, condition: RoadCondition) -> Option<&BucketAvailability> {
        self.rows.iter().find(|r| r.condition == condition)
    }

    pub fn get(&self, condition: RoadCondition, mode: TransportMode) -> Option<f64> {
        self.row(condition).and_then(|r| r.value(mode))
    }
}

/// Counts of how records fell into buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationSummary {
    pub bad: usize,
    pub acceptable: usize,
    pub good: usize,
    pub overlapping: usize,
    pub unclassified: usize,
}

impl ClassificationSummary {
    pub fn total(&self) -> usize {
        self.bad + self.acceptable + self.good + self.overlapping + self.unclassified
    }
}
