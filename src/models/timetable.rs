use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::ScheduleGroup;
use super::calendar::{Block, YearLevel};

/// Display-ready line merging every meeting of one subject/year/block.
///
/// Field names are the contract with export and presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedRecord {
    pub subject_code: String,
    pub subject_description: String,
    pub instructor_name: String,
    pub year_level: YearLevel,
    pub block: Block,
    pub days: String,
    /// Earliest start across the partition, `HH:MM:SS`.
    pub start_time: String,
    /// Latest end across the partition, `HH:MM:SS`.
    pub end_time: String,
    pub time_range: String,
    pub room_name: String,
    pub is_lab: bool,
    pub units: i32,
    pub department: String,
}

/// Group label ("1st Year A") to records, in display order.
pub type GroupedTimetable = IndexMap<String, Vec<ConsolidatedRecord>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableResponse {
    pub group: ScheduleGroup,
    pub timetable: GroupedTimetable,
}
