//! # Focustray Core Library
//!
//! Core logic for Focustray, a focus timer that alternates timed work and
//! break periods, prompts randomized micro-breaks during work, and tracks
//! completed sessions per day. The library owns no UI and no OS timers: a
//! frontend drives [`TimerEngine::heartbeat`] once per second and subscribes
//! to the engine's event bus to render state, play sounds, and post
//! notifications.
//!
//! ## Key components
//!
//! - [`TimerEngine`]: countdown state machine (work/break modes, prompt cycle,
//!   settings setters)
//! - [`SessionLog`]: completed-session log with 05:00-anchored day accounting
//! - [`TimerSettings`]: persisted user preferences
//! - [`Event`]: typed events adapters subscribe to

pub mod error;
pub mod events;
pub mod session;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, StorageError};
pub use events::{Event, EventBus, SoundCue};
pub use session::SessionLog;
pub use storage::{
    JsonFileStore, ListStore, MemoryListStore, MemorySettingsStore, SettingsStore, TimerSettings,
    TomlSettingsStore,
};
pub use timer::{Mode, PromptScheduler, PromptWindow, Snapshot, TimerEngine};
