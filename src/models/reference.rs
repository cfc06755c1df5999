use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::calendar::YearLevel;

/// Template term used for comparison. Independent of drafts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ReferenceGroup {
    pub id: String,
    pub school_year: String,
    pub education_level: String,
    #[sqlx(try_from = "String")]
    pub year_level: YearLevel,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReferenceGroupRequest {
    pub school_year: String,
    pub education_level: String,
    pub year_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ReferenceSchedule {
    pub id: String,
    pub reference_group_id: String,
    pub subject_code: String,
    pub subject_description: String,
    pub units: i32,
    pub prerequisite: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReferenceScheduleRequest {
    pub subject_code: String,
    pub subject_description: String,
    pub units: i32,
    pub prerequisite: Option<String>,
}
