use std::collections::HashSet;

use crate::error::AppError;
use crate::models::calendar::normalize_interval;
use crate::models::{AvailabilityQuery, Room, RoomBooking, Weekday};

/// A validated availability request: a day and a half-open time window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
}

impl TimeSlot {
    pub fn new(day: &str, start_time: &str, end_time: &str) -> Result<Self, AppError> {
        let day = day.parse::<Weekday>()?;
        let (start_time, end_time) = normalize_interval(start_time, end_time)?;
        Ok(Self {
            day,
            start_time,
            end_time,
        })
    }

    /// Half-open overlap. Touching boundaries do not overlap.
    pub fn overlaps(&self, start_time: &str, end_time: &str) -> bool {
        start_time < self.end_time.as_str() && end_time > self.start_time.as_str()
    }

    pub fn conflicts_with(&self, booking: &RoomBooking) -> bool {
        booking.day == self.day && self.overlaps(&booking.start_time, &booking.end_time)
    }
}

impl TryFrom<&AvailabilityQuery> for TimeSlot {
    type Error = AppError;

    fn try_from(query: &AvailabilityQuery) -> Result<Self, Self::Error> {
        TimeSlot::new(&query.day, &query.start_time, &query.end_time)
    }
}

/// Rooms with no booking overlapping `slot`, in the order they were given.
pub fn available_rooms(rooms: Vec<Room>, bookings: &[RoomBooking], slot: &TimeSlot) -> Vec<Room> {
    let occupied: HashSet<&str> = bookings
        .iter()
        .filter(|booking| slot.conflicts_with(booking))
        .map(|booking| booking.room_id.as_str())
        .collect();

    rooms
        .into_iter()
        .filter(|room| !occupied.contains(room.id.as_str()))
        .collect()
}
