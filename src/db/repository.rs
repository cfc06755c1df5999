use std::collections::HashMap;

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::models::{
    Block, Draft, DraftWithGroup, EntryDetail, Instructor, MeetingDetail, NewInstructorRequest,
    NewReferenceScheduleRequest, NewRoomRequest, ReferenceGroup, ReferenceSchedule, Room,
    RoomBooking, ScheduleEntry, ScheduleGroup, ScheduleMeeting, Weekday, YearLevel,
};

pub async fn fetch_rooms(conn: &mut SqliteConnection) -> Result<Vec<Room>, sqlx::Error> {
    sqlx::query_as::<_, Room>(
        "SELECT id, room_name, capacity, is_lab, building, floor FROM rooms ORDER BY room_name"
    )
    .fetch_all(&mut *conn)
    .await
}

pub async fn find_room_by_id(db: &SqlitePool, id: &str) -> Result<Option<Room>, sqlx::Error> {
    sqlx::query_as::<_, Room>(
        "SELECT id, room_name, capacity, is_lab, building, floor FROM rooms WHERE id = ?"
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_room(db: &SqlitePool, req: NewRoomRequest) -> Result<Room, sqlx::Error> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO rooms (id, room_name, capacity, is_lab, building, floor)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&id)
    .bind(&req.room_name)
    .bind(req.capacity)
    .bind(req.is_lab)
    .bind(&req.building)
    .bind(req.floor)
    .execute(db)
    .await?;

    Ok(Room {
        id,
        room_name: req.room_name,
        capacity: req.capacity,
        is_lab: req.is_lab,
        building: req.building,
        floor: req.floor,
    })
}

pub async fn fetch_instructors(
    conn: &mut SqliteConnection,
) -> Result<Vec<Instructor>, sqlx::Error> {
    sqlx::query_as::<_, Instructor>("SELECT id, name, department FROM instructors ORDER BY name")
        .fetch_all(&mut *conn)
        .await
}

pub async fn find_instructor_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<Instructor>, sqlx::Error> {
    sqlx::query_as::<_, Instructor>("SELECT id, name, department FROM instructors WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_instructor(
    db: &SqlitePool,
    req: NewInstructorRequest,
) -> Result<Instructor, sqlx::Error> {
    let id = Uuid::new_v4().to_string();

    sqlx::query("INSERT INTO instructors (id, name, department) VALUES (?1, ?2, ?3)")
        .bind(&id)
        .bind(&req.name)
        .bind(&req.department)
        .execute(db)
        .await?;

    Ok(Instructor {
        id,
        name: req.name,
        department: req.department,
    })
}

const GROUP_COLUMNS: &str =
    "id, school_year, semester, department, education_level, year_level, created_at";

pub async fn fetch_schedule_groups(db: &SqlitePool) -> Result<Vec<ScheduleGroup>, sqlx::Error> {
    sqlx::query_as::<_, ScheduleGroup>(&format!(
        "SELECT {} FROM schedule_groups ORDER BY school_year DESC, semester, department",
        GROUP_COLUMNS
    ))
    .fetch_all(db)
    .await
}

pub async fn find_schedule_group(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<ScheduleGroup>, sqlx::Error> {
    sqlx::query_as::<_, ScheduleGroup>(&format!(
        "SELECT {} FROM schedule_groups WHERE id = ?",
        GROUP_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
}

/// Fields of a schedule group that have already been validated.
pub struct GroupFields {
    pub school_year: String,
    pub semester: String,
    pub department: String,
    pub education_level: String,
    pub year_level: YearLevel,
}

pub async fn insert_schedule_group(
    db: &SqlitePool,
    fields: GroupFields,
) -> Result<ScheduleGroup, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO schedule_groups
            (id, school_year, semester, department, education_level, year_level, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&id)
    .bind(&fields.school_year)
    .bind(&fields.semester)
    .bind(&fields.department)
    .bind(&fields.education_level)
    .bind(fields.year_level.as_str())
    .bind(&now)
    .execute(db)
    .await?;

    Ok(ScheduleGroup {
        id,
        school_year: fields.school_year,
        semester: fields.semester,
        department: fields.department,
        education_level: fields.education_level,
        year_level: fields.year_level,
        created_at: now,
    })
}

/// Entry fields after validation; meetings are inserted separately.
pub struct EntryFields {
    pub group_id: String,
    pub subject_code: String,
    pub subject_description: String,
    pub year_level: YearLevel,
    pub block: Block,
    pub units: i32,
    pub department: String,
    pub section_id: Option<String>,
    pub subject_id: Option<String>,
    pub instructor_id: Option<String>,
}

pub struct MeetingFields {
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub room_id: Option<String>,
    pub instructor_id: Option<String>,
}

pub async fn insert_schedule_entry(
    conn: &mut SqliteConnection,
    fields: EntryFields,
) -> Result<ScheduleEntry, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO schedule_entries
            (id, group_id, subject_code, subject_description, year_level, block, units,
            department, section_id, subject_id, instructor_id, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
    )
    .bind(&id)
    .bind(&fields.group_id)
    .bind(&fields.subject_code)
    .bind(&fields.subject_description)
    .bind(fields.year_level.as_str())
    .bind(fields.block.to_string())
    .bind(fields.units)
    .bind(&fields.department)
    .bind(&fields.section_id)
    .bind(&fields.subject_id)
    .bind(&fields.instructor_id)
    .bind(&now)
    .execute(&mut *conn)
    .await?;

    Ok(ScheduleEntry {
        id,
        group_id: fields.group_id,
        subject_code: fields.subject_code,
        subject_description: fields.subject_description,
        year_level: fields.year_level,
        block: fields.block,
        units: fields.units,
        department: fields.department,
        section_id: fields.section_id,
        subject_id: fields.subject_id,
        instructor_id: fields.instructor_id,
        created_at: now,
    })
}

pub async fn insert_schedule_meeting(
    conn: &mut SqliteConnection,
    entry_id: &str,
    fields: MeetingFields,
) -> Result<ScheduleMeeting, sqlx::Error> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO schedule_meetings
            (id, entry_id, day, start_time, end_time, room_id, instructor_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&id)
    .bind(entry_id)
    .bind(fields.day.as_str())
    .bind(&fields.start_time)
    .bind(&fields.end_time)
    .bind(&fields.room_id)
    .bind(&fields.instructor_id)
    .execute(&mut *conn)
    .await?;

    Ok(ScheduleMeeting {
        id,
        entry_id: entry_id.to_string(),
        day: fields.day,
        start_time: fields.start_time,
        end_time: fields.end_time,
        room_id: fields.room_id,
        instructor_id: fields.instructor_id,
    })
}

/// All room bookings on `day`. Meetings without a room are skipped.
pub async fn fetch_bookings_on_day(
    conn: &mut SqliteConnection,
    day: Weekday,
) -> Result<Vec<RoomBooking>, sqlx::Error> {
    sqlx::query_as::<_, RoomBooking>(
        r#"
        SELECT room_id, day, start_time, end_time
        FROM schedule_meetings
        WHERE day = ?1 AND room_id IS NOT NULL
        "#,
    )
    .bind(day.as_str())
    .fetch_all(&mut *conn)
    .await
}

/// Loads a group's entries with meetings, rooms and instructors resolved.
///
/// Callers run it inside a transaction so the four reads share one snapshot.
pub async fn fetch_group_entries(
    conn: &mut SqliteConnection,
    group_id: &str,
) -> Result<Vec<EntryDetail>, sqlx::Error> {
    let entries = sqlx::query_as::<_, ScheduleEntry>(
        r#"
        SELECT id, group_id, subject_code, subject_description, year_level, block, units,
            department, section_id, subject_id, instructor_id, created_at
        FROM schedule_entries
        WHERE group_id = ?1
        ORDER BY id
        "#,
    )
    .bind(group_id)
    .fetch_all(&mut *conn)
    .await?;

    let meetings = sqlx::query_as::<_, ScheduleMeeting>(
        r#"
        SELECT m.id, m.entry_id, m.day, m.start_time, m.end_time, m.room_id, m.instructor_id
        FROM schedule_meetings m
        JOIN schedule_entries e ON e.id = m.entry_id
        WHERE e.group_id = ?1
        ORDER BY m.id
        "#,
    )
    .bind(group_id)
    .fetch_all(&mut *conn)
    .await?;

    let rooms: HashMap<String, Room> = fetch_rooms(&mut *conn)
        .await?
        .into_iter()
        .map(|r| (r.id.clone(), r))
        .collect();
    let instructors: HashMap<String, Instructor> = fetch_instructors(&mut *conn)
        .await?
        .into_iter()
        .map(|i| (i.id.clone(), i))
        .collect();

    let mut by_entry: HashMap<String, Vec<MeetingDetail>> = HashMap::new();
    for meeting in meetings {
        let room = meeting.room_id.as_ref().and_then(|id| rooms.get(id)).cloned();
        let instructor = meeting
            .instructor_id
            .as_ref()
            .and_then(|id| instructors.get(id))
            .cloned();
        by_entry
            .entry(meeting.entry_id.clone())
            .or_default()
            .push(MeetingDetail {
                meeting,
                room,
                instructor,
            });
    }

    Ok(entries
        .into_iter()
        .map(|entry| EntryDetail {
            legacy_instructor: entry
                .instructor_id
                .as_ref()
                .and_then(|id| instructors.get(id))
                .cloned(),
            meetings: by_entry.remove(&entry.id).unwrap_or_default(),
            entry,
        })
        .collect())
}

const DRAFT_COLUMNS: &str = "id, group_id, draft_name, created_at";

pub async fn find_draft_by_id(db: &SqlitePool, id: &str) -> Result<Option<Draft>, sqlx::Error> {
    sqlx::query_as::<_, Draft>(&format!("SELECT {} FROM drafts WHERE id = ?", DRAFT_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_draft_by_group(
    db: &SqlitePool,
    group_id: &str,
) -> Result<Option<Draft>, sqlx::Error> {
    sqlx::query_as::<_, Draft>(&format!(
        "SELECT {} FROM drafts WHERE group_id = ?",
        DRAFT_COLUMNS
    ))
    .bind(group_id)
    .fetch_optional(db)
    .await
}

pub async fn fetch_drafts(db: &SqlitePool) -> Result<Vec<DraftWithGroup>, sqlx::Error> {
    let drafts = sqlx::query_as::<_, Draft>(&format!(
        "SELECT {} FROM drafts ORDER BY created_at DESC",
        DRAFT_COLUMNS
    ))
    .fetch_all(db)
    .await?;

    let mut conn = db.acquire().await?;
    let mut out = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let group = find_schedule_group(&mut conn, &draft.group_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        out.push(DraftWithGroup { draft, group });
    }
    Ok(out)
}

/// Inserts a draft. Relies on `UNIQUE(group_id)` to reject a second draft.
pub async fn insert_draft(
    db: &SqlitePool,
    group_id: &str,
    draft_name: &str,
) -> Result<Draft, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO drafts (id, group_id, draft_name, created_at) VALUES (?1, ?2, ?3, ?4)"
    )
    .bind(&id)
    .bind(group_id)
    .bind(draft_name)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Draft {
        id,
        group_id: group_id.to_string(),
        draft_name: draft_name.to_string(),
        created_at: now,
    })
}

pub async fn delete_draft(conn: &mut SqliteConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM drafts WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Resolves the group a draft guards. `None` in the inner option means the
/// draft exists but its group does not.
pub async fn resolve_draft_group(
    conn: &mut SqliteConnection,
    draft_id: &str,
) -> Result<Option<(String, Option<String>)>, sqlx::Error> {
    sqlx::query_as::<_, (String, Option<String>)>(
        r#"
        SELECT d.group_id, g.id
        FROM drafts d
        LEFT JOIN schedule_groups g ON g.id = d.group_id
        WHERE d.id = ?1
        "#,
    )
    .bind(draft_id)
    .fetch_optional(&mut *conn)
    .await
}

/// Row counts removed by [`delete_group_schedule`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CascadeCounts {
    pub meetings: u64,
    pub entries: u64,
    pub groups: u64,
}

/// Deletes a group's meetings, then its entries, then the group itself.
/// Callers run this inside a transaction.
pub async fn delete_group_schedule(
    conn: &mut SqliteConnection,
    group_id: &str,
) -> Result<CascadeCounts, sqlx::Error> {
    let meetings = sqlx::query(
        r#"
        DELETE FROM schedule_meetings
        WHERE entry_id IN (SELECT id FROM schedule_entries WHERE group_id = ?1)
        "#,
    )
    .bind(group_id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    let entries = sqlx::query("DELETE FROM schedule_entries WHERE group_id = ?1")
        .bind(group_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    let groups = sqlx::query("DELETE FROM schedule_groups WHERE id = ?1")
        .bind(group_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    Ok(CascadeCounts {
        meetings,
        entries,
        groups,
    })
}

const REFERENCE_GROUP_COLUMNS: &str = "id, school_year, education_level, year_level, created_at";

pub async fn fetch_reference_groups(db: &SqlitePool) -> Result<Vec<ReferenceGroup>, sqlx::Error> {
    sqlx::query_as::<_, ReferenceGroup>(&format!(
        "SELECT {} FROM reference_groups ORDER BY school_year DESC, education_level, year_level",
        REFERENCE_GROUP_COLUMNS
    ))
    .fetch_all(db)
    .await
}

pub async fn find_reference_group(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<ReferenceGroup>, sqlx::Error> {
    sqlx::query_as::<_, ReferenceGroup>(&format!(
        "SELECT {} FROM reference_groups WHERE id = ?",
        REFERENCE_GROUP_COLUMNS
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_reference_group(
    db: &SqlitePool,
    school_year: String,
    education_level: String,
    year_level: YearLevel,
) -> Result<ReferenceGroup, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO reference_groups (id, school_year, education_level, year_level, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&id)
    .bind(&school_year)
    .bind(&education_level)
    .bind(year_level.as_str())
    .bind(&now)
    .execute(db)
    .await?;

    Ok(ReferenceGroup {
        id,
        school_year,
        education_level,
        year_level,
        created_at: now,
    })
}

pub async fn fetch_reference_schedules(
    db: &SqlitePool,
    reference_group_id: &str,
) -> Result<Vec<ReferenceSchedule>, sqlx::Error> {
    sqlx::query_as::<_, ReferenceSchedule>(
        r#"
        SELECT id, reference_group_id, subject_code, subject_description, units, prerequisite
        FROM reference_schedules
        WHERE reference_group_id = ?1
        ORDER BY subject_code, id
        "#,
    )
    .bind(reference_group_id)
    .fetch_all(db)
    .await
}

pub async fn insert_reference_schedule(
    db: &SqlitePool,
    reference_group_id: &str,
    req: NewReferenceScheduleRequest,
) -> Result<ReferenceSchedule, sqlx::Error> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO reference_schedules
            (id, reference_group_id, subject_code, subject_description, units, prerequisite)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&id)
    .bind(reference_group_id)
    .bind(&req.subject_code)
    .bind(&req.subject_description)
    .bind(req.units)
    .bind(&req.prerequisite)
    .execute(db)
    .await?;

    Ok(ReferenceSchedule {
        id,
        reference_group_id: reference_group_id.to_string(),
        subject_code: req.subject_code,
        subject_description: req.subject_description,
        units: req.units,
        prerequisite: req.prerequisite,
    })
}
