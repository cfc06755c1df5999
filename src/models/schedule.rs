use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::calendar::{Block, Weekday, YearLevel};
use super::{Instructor, Room};

/// One school term for a department and year level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ScheduleGroup {
    pub id: String,
    pub school_year: String,
    pub semester: String,
    pub department: String,
    pub education_level: String,
    #[sqlx(try_from = "String")]
    pub year_level: YearLevel,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScheduleGroupRequest {
    pub school_year: String,
    pub semester: String,
    pub department: String,
    pub education_level: String,
    pub year_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ScheduleEntry {
    pub id: String,
    pub group_id: String,
    pub subject_code: String,
    pub subject_description: String,
    #[sqlx(try_from = "String")]
    pub year_level: YearLevel,
    #[sqlx(try_from = "String")]
    pub block: Block,
    pub units: i32,
    pub department: String,
    pub section_id: Option<String>,
    pub subject_id: Option<String>,
    /// Deprecated entry-level instructor. Meeting instructors take precedence.
    pub instructor_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ScheduleMeeting {
    pub id: String,
    pub entry_id: String,
    #[sqlx(try_from = "String")]
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub room_id: Option<String>,
    pub instructor_id: Option<String>,
}

/// A meeting with its room and instructor resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingDetail {
    #[serde(flatten)]
    pub meeting: ScheduleMeeting,
    pub room: Option<Room>,
    pub instructor: Option<Instructor>,
}

/// An entry together with everything consolidation needs to read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDetail {
    #[serde(flatten)]
    pub entry: ScheduleEntry,
    pub legacy_instructor: Option<Instructor>,
    pub meetings: Vec<MeetingDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScheduleEntryRequest {
    pub subject_code: String,
    pub subject_description: String,
    pub year_level: String,
    pub block: Option<String>,
    pub units: i32,
    pub department: String,
    pub section_id: Option<String>,
    pub subject_id: Option<String>,
    pub instructor_id: Option<String>,
    pub meetings: Vec<NewMeetingRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMeetingRequest {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub room_id: Option<String>,
    pub instructor_id: Option<String>,
}

/// A meeting's occupancy of a room, as read by the availability checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RoomBooking {
    pub room_id: String,
    #[sqlx(try_from = "String")]
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
}
