pub mod availability;
pub mod consolidator;
pub mod day_order;
pub mod drafts;
pub mod export;
pub mod grouper;
pub mod schedule_service;

pub use drafts::DraftService;
pub use schedule_service::ScheduleService;
