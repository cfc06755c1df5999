use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::db::repository::{self, EntryFields, GroupFields, MeetingFields};
use crate::error::AppError;
use crate::models::calendar::normalize_interval;
use crate::models::{
    AvailabilityQuery, Block, EntryDetail, Instructor, MeetingDetail, NewInstructorRequest,
    NewReferenceGroupRequest, NewReferenceScheduleRequest, NewRoomRequest,
    NewScheduleEntryRequest, NewScheduleGroupRequest, ReferenceGroup, ReferenceSchedule, Room,
    ScheduleGroup, TimetableResponse, Weekday, YearLevel,
};
use crate::services::availability::{TimeSlot, available_rooms};
use crate::services::consolidator::consolidate;
use crate::services::export::render_timetable;
use crate::services::grouper::group_and_sort;

pub struct ScheduleService {
    db: SqlitePool,
}

async fn find_group(
    conn: &mut SqliteConnection,
    group_id: &str,
) -> Result<ScheduleGroup, AppError> {
    repository::find_schedule_group(conn, group_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("schedule group {}", group_id)))
}

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    Ok(value.to_string())
}

impl ScheduleService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create_room(&self, mut req: NewRoomRequest) -> Result<Room, AppError> {
        req.room_name = required("room_name", &req.room_name)?;
        if req.capacity < 0 {
            return Err(AppError::Validation("capacity must not be negative".to_string()));
        }

        let room_name = req.room_name.clone();
        let room = repository::insert_room(&self.db, req)
            .await
            .map_err(|e| {
                AppError::conflict_on_unique(e, format!("room {} already exists", room_name))
            })?;
        info!("Created room {} ({})", room.id, room.room_name);
        Ok(room)
    }

    pub async fn create_instructor(
        &self,
        mut req: NewInstructorRequest,
    ) -> Result<Instructor, AppError> {
        req.name = required("name", &req.name)?;
        Ok(repository::insert_instructor(&self.db, req).await?)
    }

    pub async fn create_group(
        &self,
        req: NewScheduleGroupRequest,
    ) -> Result<ScheduleGroup, AppError> {
        let fields = GroupFields {
            school_year: required("school_year", &req.school_year)?,
            semester: required("semester", &req.semester)?,
            department: required("department", &req.department)?,
            education_level: required("education_level", &req.education_level)?,
            year_level: req.year_level.parse::<YearLevel>()?,
        };
        let group = repository::insert_schedule_group(&self.db, fields).await?;
        info!("Created schedule group {}", group.id);
        Ok(group)
    }

    async fn group(&self, group_id: &str) -> Result<ScheduleGroup, AppError> {
        let mut conn = self.db.acquire().await?;
        find_group(&mut conn, group_id).await
    }

    async fn room(&self, room_id: &str) -> Result<Room, AppError> {
        repository::find_room_by_id(&self.db, room_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("room {}", room_id)))
    }

    async fn instructor(&self, instructor_id: &str) -> Result<Instructor, AppError> {
        repository::find_instructor_by_id(&self.db, instructor_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("instructor {}", instructor_id)))
    }

    /// Creates an entry and its meetings in one transaction.
    ///
    /// Each room booking is re-checked against the stored meetings inside the
    /// transaction, so a room listed as free a moment ago is not double booked.
    pub async fn create_entry(
        &self,
        group_id: &str,
        req: NewScheduleEntryRequest,
    ) -> Result<EntryDetail, AppError> {
        self.group(group_id).await?;

        if req.meetings.is_empty() {
            return Err(AppError::Validation(
                "a schedule entry needs at least one meeting".to_string(),
            ));
        }

        let fields = EntryFields {
            group_id: group_id.to_string(),
            subject_code: required("subject_code", &req.subject_code)?,
            subject_description: req.subject_description.trim().to_string(),
            year_level: req.year_level.parse::<YearLevel>()?,
            block: Block::parse_or_default(req.block.as_deref())?,
            units: req.units,
            department: required("department", &req.department)?,
            section_id: req.section_id,
            subject_id: req.subject_id,
            instructor_id: req.instructor_id,
        };
        let legacy_instructor = match &fields.instructor_id {
            Some(id) => Some(self.instructor(id).await?),
            None => None,
        };

        // Validate every meeting and resolve references before touching storage.
        let mut planned = Vec::with_capacity(req.meetings.len());
        for meeting in req.meetings {
            let day = meeting.day.parse::<Weekday>()?;
            let (start_time, end_time) =
                normalize_interval(&meeting.start_time, &meeting.end_time)?;
            let room = match &meeting.room_id {
                Some(id) => Some(self.room(id).await?),
                None => None,
            };
            let instructor = match &meeting.instructor_id {
                Some(id) => Some(self.instructor(id).await?),
                None => None,
            };
            planned.push((
                MeetingFields {
                    day,
                    start_time,
                    end_time,
                    room_id: meeting.room_id,
                    instructor_id: meeting.instructor_id,
                },
                room,
                instructor,
            ));
        }

        let mut tx = self.db.begin().await?;
        let entry = repository::insert_schedule_entry(&mut tx, fields).await?;

        let mut meetings = Vec::with_capacity(planned.len());
        for (fields, room, instructor) in planned {
            if let Some(room) = &room {
                let slot = TimeSlot {
                    day: fields.day,
                    start_time: fields.start_time.clone(),
                    end_time: fields.end_time.clone(),
                };
                let bookings = repository::fetch_bookings_on_day(&mut tx, fields.day).await?;
                if bookings
                    .iter()
                    .any(|b| b.room_id == room.id && slot.conflicts_with(b))
                {
                    return Err(AppError::Conflict(format!(
                        "room {} is already booked on {} between {} and {}",
                        room.room_name, slot.day, slot.start_time, slot.end_time
                    )));
                }
            }

            let meeting = repository::insert_schedule_meeting(&mut tx, &entry.id, fields).await?;
            meetings.push(MeetingDetail {
                meeting,
                room,
                instructor,
            });
        }

        tx.commit().await?;

        info!(
            "Created entry {} ({}) with {} meetings in group {}",
            entry.id,
            entry.subject_code,
            meetings.len(),
            group_id
        );
        Ok(EntryDetail {
            entry,
            legacy_instructor,
            meetings,
        })
    }

    /// Consolidated, grouped and ordered timetable of one schedule group.
    ///
    /// The group and its rows are read in one transaction, so a concurrent
    /// reject or entry insert is seen either entirely or not at all.
    pub async fn timetable(&self, group_id: &str) -> Result<TimetableResponse, AppError> {
        let mut tx = self.db.begin().await?;
        let group = find_group(&mut tx, group_id).await?;
        let entries = repository::fetch_group_entries(&mut tx, group_id).await?;
        tx.commit().await?;

        let records = consolidate(&entries);
        debug!(
            "Consolidated {} entries into {} records for group {}",
            entries.len(),
            records.len(),
            group_id
        );

        Ok(TimetableResponse {
            group,
            timetable: group_and_sort(records),
        })
    }

    pub async fn export(&self, group_id: &str) -> Result<String, AppError> {
        let response = self.timetable(group_id).await?;
        Ok(render_timetable(&response.group, &response.timetable))
    }

    /// Rooms with no meeting overlapping the requested day and window.
    pub async fn available_rooms(&self, query: &AvailabilityQuery) -> Result<Vec<Room>, AppError> {
        let slot = TimeSlot::try_from(query)?;

        let mut tx = self.db.begin().await?;
        let rooms = repository::fetch_rooms(&mut tx).await?;
        let bookings = repository::fetch_bookings_on_day(&mut tx, slot.day).await?;
        tx.commit().await?;

        Ok(available_rooms(rooms, &bookings, &slot))
    }

    pub async fn create_reference_group(
        &self,
        req: NewReferenceGroupRequest,
    ) -> Result<ReferenceGroup, AppError> {
        let school_year = required("school_year", &req.school_year)?;
        let education_level = required("education_level", &req.education_level)?;
        let year_level = req.year_level.parse::<YearLevel>()?;

        Ok(repository::insert_reference_group(&self.db, school_year, education_level, year_level)
            .await?)
    }

    pub async fn reference_schedules(
        &self,
        reference_group_id: &str,
    ) -> Result<Vec<ReferenceSchedule>, AppError> {
        self.reference_group(reference_group_id).await?;
        Ok(repository::fetch_reference_schedules(&self.db, reference_group_id).await?)
    }

    pub async fn add_reference_schedule(
        &self,
        reference_group_id: &str,
        req: NewReferenceScheduleRequest,
    ) -> Result<ReferenceSchedule, AppError> {
        self.reference_group(reference_group_id).await?;
        required("subject_code", &req.subject_code)?;
        Ok(repository::insert_reference_schedule(&self.db, reference_group_id, req).await?)
    }

    async fn reference_group(&self, id: &str) -> Result<ReferenceGroup, AppError> {
        repository::find_reference_group(&self.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("reference group {}", id)))
    }
}
