use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::trace::TraceLayer;

use crate::db::repository;
use crate::error::AppError;
use crate::models::*;
use crate::services::{DraftService, ScheduleService};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/available", get(available_rooms))
        .route("/instructors", get(list_instructors).post(create_instructor))
        .route("/schedule-groups", get(list_groups).post(create_group))
        .route("/schedule-groups/{id}/entries", post(create_entry))
        .route("/schedule-groups/{id}/timetable", get(timetable))
        .route("/schedule-groups/{id}/timetable/export", get(export_timetable))
        .route("/schedule-groups/{id}/draft", post(save_draft))
        .route("/drafts", get(list_drafts))
        .route("/drafts/{id}/approve", post(approve_draft))
        .route("/drafts/{id}/reject", post(reject_draft))
        .route("/reference-groups", get(list_reference_groups).post(create_reference_group))
        .route(
            "/reference-groups/{id}/schedules",
            get(list_reference_schedules).post(create_reference_schedule),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<Room>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let rooms = repository::fetch_rooms(&mut conn).await?;
    Ok(Json(rooms))
}

async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<NewRoomRequest>
) -> Result<(StatusCode, Json<Room>), AppError> {
    let room = ScheduleService::new(state.db.clone()).create_room(req).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

async fn available_rooms(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>
) -> Result<Json<Vec<Room>>, AppError> {
    let rooms = ScheduleService::new(state.db.clone()).available_rooms(&query).await?;
    Ok(Json(rooms))
}

async fn list_instructors(
    State(state): State<AppState>,
) -> Result<Json<Vec<Instructor>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let instructors = repository::fetch_instructors(&mut conn).await?;
    Ok(Json(instructors))
}

async fn create_instructor(
    State(state): State<AppState>,
    Json(req): Json<NewInstructorRequest>
) -> Result<(StatusCode, Json<Instructor>), AppError> {
    let instructor = ScheduleService::new(state.db.clone()).create_instructor(req).await?;
    Ok((StatusCode::CREATED, Json(instructor)))
}

async fn list_groups(State(state): State<AppState>) -> Result<Json<Vec<ScheduleGroup>>, AppError> {
    let groups = repository::fetch_schedule_groups(&state.db).await?;
    Ok(Json(groups))
}

async fn create_group(
    State(state): State<AppState>,
    Json(req): Json<NewScheduleGroupRequest>
) -> Result<(StatusCode, Json<ScheduleGroup>), AppError> {
    let group = ScheduleService::new(state.db.clone()).create_group(req).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

async fn create_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NewScheduleEntryRequest>
) -> Result<(StatusCode, Json<EntryDetail>), AppError> {
    let entry = ScheduleService::new(state.db.clone()).create_entry(&id, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn timetable(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<TimetableResponse>, AppError> {
    let timetable = ScheduleService::new(state.db.clone()).timetable(&id).await?;
    Ok(Json(timetable))
}

async fn export_timetable(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<String, AppError> {
    ScheduleService::new(state.db.clone()).export(&id).await
}

async fn save_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SaveDraftRequest>
) -> Result<(StatusCode, Json<Draft>), AppError> {
    let draft = DraftService::new(state.db.clone()).save(&id, req).await?;
    Ok((StatusCode::CREATED, Json(draft)))
}

async fn list_drafts(State(state): State<AppState>) -> Result<Json<Vec<DraftWithGroup>>, AppError> {
    let drafts = DraftService::new(state.db.clone()).list().await?;
    Ok(Json(drafts))
}

async fn approve_draft(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<DraftTransition>, AppError> {
    let transition = DraftService::new(state.db.clone()).approve(&id).await?;
    Ok(Json(transition))
}

async fn reject_draft(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<DraftTransition>, AppError> {
    let transition = DraftService::new(state.db.clone()).reject(&id).await?;
    Ok(Json(transition))
}

async fn list_reference_groups(
    State(state): State<AppState>
) -> Result<Json<Vec<ReferenceGroup>>, AppError> {
    let groups = repository::fetch_reference_groups(&state.db).await?;
    Ok(Json(groups))
}

async fn create_reference_group(
    State(state): State<AppState>,
    Json(req): Json<NewReferenceGroupRequest>
) -> Result<(StatusCode, Json<ReferenceGroup>), AppError> {
    let group = ScheduleService::new(state.db.clone()).create_reference_group(req).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

async fn list_reference_schedules(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<Vec<ReferenceSchedule>>, AppError> {
    let schedules = ScheduleService::new(state.db.clone()).reference_schedules(&id).await?;
    Ok(Json(schedules))
}

async fn create_reference_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NewReferenceScheduleRequest>
) -> Result<(StatusCode, Json<ReferenceSchedule>), AppError> {
    let schedule = ScheduleService::new(state.db.clone())
        .add_reference_schedule(&id, req)
        .await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}
