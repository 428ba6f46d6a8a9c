pub mod conflict;
pub mod engine;
pub mod error;
pub mod slot;

pub use engine::Scheduler;
pub use error::ScheduleError;
pub use slot::Slot;
