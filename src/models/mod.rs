pub mod calendar;
pub mod draft;
pub mod instructor;
pub mod reference;
pub mod room;
pub mod schedule;
pub mod timetable;

pub use calendar::{Block, Weekday, YearLevel};
pub use draft::{Draft, DraftAction, DraftState, DraftTransition, DraftWithGroup, SaveDraftRequest};
pub use instructor::{Instructor, NewInstructorRequest};
pub use reference::{
    NewReferenceGroupRequest, NewReferenceScheduleRequest, ReferenceGroup, ReferenceSchedule,
};
pub use room::{AvailabilityQuery, NewRoomRequest, Room};
pub use schedule::{
    EntryDetail, MeetingDetail, NewMeetingRequest, NewScheduleEntryRequest,
    NewScheduleGroupRequest, RoomBooking, ScheduleEntry, ScheduleGroup, ScheduleMeeting,
};
pub use timetable::{ConsolidatedRecord, GroupedTimetable, TimetableResponse};
