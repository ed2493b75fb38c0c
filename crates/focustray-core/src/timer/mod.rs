mod engine;
mod prompt;

pub use engine::{Mode, Snapshot, TimerEngine};
pub use prompt::{PromptFire, PromptScheduler, PromptWindow};
