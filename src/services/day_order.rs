use std::collections::BTreeSet;

use crate::models::Weekday;

/// Returns the distinct days in weekly order, Monday first.
pub fn sort_days_in_weekly_order<I>(days: I) -> Vec<Weekday>
where
    I: IntoIterator<Item = Weekday>,
{
    days.into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Concatenates day tokens without a separator: `[Mon, Wed]` becomes `"MonWed"`.
pub fn combine_days(days: &[Weekday]) -> String {
    days.iter().map(|day| day.as_str()).collect()
}

/// Finds the earliest-positioned weekday token in a combined label.
///
/// Labels that carry no recognizable token sort as Monday.
pub fn leading_weekday(label: &str) -> Weekday {
    Weekday::ALL
        .into_iter()
        .filter_map(|day| label.find(day.as_str()).map(|pos| (pos, day)))
        .min()
        .map(|(_, day)| day)
        .unwrap_or(Weekday::Mon)
}
