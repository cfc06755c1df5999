use std::collections::BTreeMap;

use super::day_order::leading_weekday;
use crate::models::{Block, ConsolidatedRecord, GroupedTimetable, YearLevel};

/// Label under which a record is displayed, e.g. `"1st Year A"`.
pub fn group_label(year_level: YearLevel, block: Block) -> String {
    format!("{} {}", year_level, block)
}

/// Groups records by year level and block, groups in year-then-block order.
///
/// Inside a group records run by their first meeting day, then by start time.
pub fn group_and_sort(records: Vec<ConsolidatedRecord>) -> GroupedTimetable {
    let mut groups: BTreeMap<(YearLevel, Block), Vec<ConsolidatedRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.year_level, record.block))
            .or_default()
            .push(record);
    }

    groups
        .into_iter()
        .map(|((year_level, block), mut records)| {
            records.sort_by(|a, b| {
                leading_weekday(&a.days)
                    .cmp(&leading_weekday(&b.days))
                    .then_with(|| a.start_time.cmp(&b.start_time))
                    .then_with(|| a.subject_code.cmp(&b.subject_code))
            });
            (group_label(year_level, block), records)
        })
        .collect()
}
