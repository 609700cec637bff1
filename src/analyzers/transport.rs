use crate::analyzers::types::{
    BucketAvailability, ClassificationSummary, ConditionClass, RoadCondition, TransportAvailability,
    TransportMode,
};
use crate::analyzers::utility::mean_present;
use crate::dataset::RawRecord;

/// Records that belong to `condition`'s bucket.
pub fn bucket_records(records: &[RawRecord], condition: RoadCondition) -> Vec<&RawRecord> {
    records
        .iter()
        .filter(|r| ConditionClass::of(r).is_in(condition))
        .collect()
}

/// Averages each transport indicator within each road condition bucket.
///
/// A bucket with no records, or with no numeric values for a mode, yields
/// `None` for that cell.
pub fn transport_availability(records: &[RawRecord]) -> TransportAvailability {
    let rows = RoadCondition::ALL
        .into_iter()
        .map(|condition| {
            let bucket = bucket_records(records, condition);
            let mut row = BucketAvailability {
                condition,
                towns: bucket.len(),
                bus_stops: None,
                vans: None,
                taxis: None,
                buses: None,
            };
            for mode in TransportMode::ALL {
                *row.value_mut(mode) = mean_present(bucket.iter().map(|r| mode.value(r)));
            }
            row
        })
        .collect();

    TransportAvailability { rows }
}

/// Tallies how records were classified.
pub fn classification_summary(records: &[RawRecord]) -> ClassificationSummary {
    let mut summary = ClassificationSummary::default();

    for record in records {
        match ConditionClass::of(record) {
            ConditionClass::Classified(RoadCondition::Bad) => summary.bad += 1,
            ConditionClass::Classified(RoadCondition::Acceptable) => summary.acceptable += 1,
            ConditionClass::Classified(RoadCondition::Good) => summary.good += 1,
            ConditionClass::Overlapping(_) => summary.overlapping += 1,
            ConditionClass::Unclassified => summary.unclassified += 1,
        }
    }

    summary
}
