use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: String,
    pub room_name: String,
    pub capacity: i32,
    pub is_lab: bool,
    pub building: String,
    pub floor: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoomRequest {
    pub room_name: String,
    pub capacity: i32,
    #[serde(default)]
    pub is_lab: bool,
    pub building: String,
    pub floor: i32,
}

/// Query string for `GET /rooms/available`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}
