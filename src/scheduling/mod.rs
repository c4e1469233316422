mod fire_handler;
mod scheduler;

pub use fire_handler::{DEFAULT_BODY, DEFAULT_TITLE, FireHandler, FireOutcome, RearmOutcome, StepOutcome};
pub use scheduler::{ExactAlarmScheduler, next_occurrence};
