#![allow(dead_code)]

use sqlx::SqlitePool;
use timetable::db;
use timetable::models::{
    Instructor, NewInstructorRequest, NewMeetingRequest, NewRoomRequest, NewScheduleEntryRequest,
    NewScheduleGroupRequest, Room, ScheduleGroup,
};
use timetable::services::ScheduleService;

pub async fn setup_test_db() -> SqlitePool {
    db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create test db")
}

pub async fn create_room(service: &ScheduleService, name: &str, is_lab: bool) -> Room {
    service
        .create_room(NewRoomRequest {
            room_name: name.to_string(),
            capacity: 40,
            is_lab,
            building: "Main".to_string(),
            floor: 1,
        })
        .await
        .expect("Failed to create room")
}

pub async fn create_instructor(service: &ScheduleService, name: &str) -> Instructor {
    service
        .create_instructor(NewInstructorRequest {
            name: name.to_string(),
            department: Some("CS".to_string()),
        })
        .await
        .expect("Failed to create instructor")
}

pub async fn create_group(service: &ScheduleService) -> ScheduleGroup {
    service
        .create_group(NewScheduleGroupRequest {
            school_year: "2026-2027".to_string(),
            semester: "1st Semester".to_string(),
            department: "CS".to_string(),
            education_level: "College".to_string(),
            year_level: "1st Year".to_string(),
        })
        .await
        .expect("Failed to create group")
}

pub fn meeting(day: &str, start: &str, end: &str, room: Option<&Room>) -> NewMeetingRequest {
    NewMeetingRequest {
        day: day.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        room_id: room.map(|r| r.id.clone()),
        instructor_id: None,
    }
}

pub fn entry(
    subject: &str,
    block: &str,
    meetings: Vec<NewMeetingRequest>,
) -> NewScheduleEntryRequest {
    NewScheduleEntryRequest {
        subject_code: subject.to_string(),
        subject_description: format!("{} lecture", subject),
        year_level: "1st Year".to_string(),
        block: Some(block.to_string()),
        units: 3,
        department: "CS".to_string(),
        section_id: None,
        subject_id: None,
        instructor_id: None,
        meetings,
    }
}
