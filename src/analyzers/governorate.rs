use std::collections::BTreeMap;

use crate::analyzers::types::GovernorateAggregate;
use crate::analyzers::utility::mean_present;
use crate::dataset::RawRecord;

/// Groups governorate-level records by Area Label and averages the three
/// road-quality proportions.
///
/// Records whose label does not contain "Governorate" are skipped. Missing
/// values are left out of the mean; a column with no numeric values in a
/// group stays `None`. Rows come back ordered by label.
pub fn aggregate_governorates(records: &[RawRecord]) -> Vec<GovernorateAggregate> {
    let mut groups: BTreeMap<String, Vec<&RawRecord>> = BTreeMap::new();

    for record in records {
        if let Some(label) = record.governorate_label() {
            groups.entry(label).or_default().push(record);
        }
    }

    groups
        .into_iter()
        .map(|(area_label, rows)| GovernorateAggregate {
            towns: rows.len(),
            good: mean_present(rows.iter().map(|r| r.road_good)),
            acceptable: mean_present(rows.iter().map(|r| r.road_acceptable)),
            bad: mean_present(rows.iter().map(|r| r.road_bad)),
            area_label,
        })
        .collect()
}
