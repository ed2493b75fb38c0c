//! Timer state machine.
//!
//! The engine alternates timed work and break periods. It owns no OS timers
//! and spawns nothing for timekeeping - the frontend calls
//! [`TimerEngine::heartbeat`] once per second, and the engine multiplexes the
//! countdown, the prompt cycle, and the break auto-start delay over that
//! heartbeat. All state changes surface as [`Event`]s on the engine's bus.
//!
//! ## State transitions
//!
//! ```text
//! Idle-Work -> Running-Work -> Idle-Break -> Running-Break (auto, 1s)
//!      ^                                          |
//!      `------------- countdown hits zero --------'
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::warn;

use super::prompt::{PromptFire, PromptScheduler};
use crate::error::ConfigError;
use crate::events::{Event, EventBus, SoundCue};
use crate::session::SessionLog;
use crate::storage::{SettingsStore, TimerSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Work,
    Break,
}

/// Serializable summary of the engine state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: Mode,
    pub minutes: u32,
    pub seconds: u32,
    pub running: bool,
    pub completed_today: usize,
    pub at: DateTime<Utc>,
}

/// Heartbeats between a work period completing and the break auto-starting.
const BREAK_AUTOSTART_DELAY_SECS: u32 = 1;

/// Countdown state machine for alternating work and break periods.
///
/// Constructed once by the composition root and driven from a single task;
/// there is no global instance and no internal locking.
pub struct TimerEngine {
    settings: TimerSettings,
    settings_store: Box<dyn SettingsStore>,
    session_log: SessionLog,
    prompt: PromptScheduler,
    bus: EventBus,
    mode: Mode,
    minutes: u32,
    seconds: u32,
    running: bool,
    /// Pending auto-start of the break period, in heartbeats.
    break_autostart_in: Option<u32>,
}

impl TimerEngine {
    pub fn new(
        settings: TimerSettings,
        settings_store: Box<dyn SettingsStore>,
        session_log: SessionLog,
    ) -> Self {
        let minutes = settings.work_minutes;
        Self {
            settings,
            settings_store,
            session_log,
            prompt: PromptScheduler::new(),
            bus: EventBus::new(),
            mode: Mode::Work,
            minutes,
            seconds: 0,
            running: false,
            break_autostart_in: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn remaining(&self) -> (u32, u32) {
        (self.minutes, self.seconds)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn session_log(&self) -> &SessionLog {
        &self.session_log
    }

    /// Work periods completed in the current local session day.
    pub fn completed_today(&self) -> usize {
        self.session_log.count_for_today()
    }

    /// "MM:SS" countdown text.
    pub fn time_string(&self) -> String {
        format!("{:02}:{:02}", self.minutes, self.seconds)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            minutes: self.minutes,
            seconds: self.seconds,
            running: self.running,
            completed_today: self.completed_today(),
            at: Utc::now(),
        }
    }

    /// Subscribe to the engine's event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin (or resume) the countdown. No-op while already running.
    pub fn start(&mut self) {
        self.start_inner(false);
    }

    fn start_inner(&mut self, suppress_start_sound: bool) {
        if self.running {
            return;
        }
        // Starting consumes any pending break auto-start; a stale slot must
        // never fire after a later Break -> Work transition.
        self.break_autostart_in = None;
        self.running = true;
        if self.settings.prompt_sound_enabled && !suppress_start_sound {
            self.emit_sound(SoundCue::Start);
        }
        if self.mode == Mode::Work && self.settings.prompt_sound_enabled {
            self.prompt.start_cycle(self.settings.prompt_window());
        }
        self.emit_state_changed();
    }

    /// Halt the countdown without touching mode or remaining time.
    /// No-op (and no events) while already stopped. Never plays a sound.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.prompt.stop_cycle();
        self.emit_state_changed();
    }

    /// Stop and restore a fresh work period, from any state.
    pub fn reset(&mut self) {
        self.stop();
        self.break_autostart_in = None;
        let mode_changed = self.mode != Mode::Work;
        self.mode = Mode::Work;
        self.minutes = self.settings.work_minutes;
        self.seconds = 0;
        self.emit_tick_updated();
        if mode_changed {
            self.emit_mode_changed();
        }
        self.emit_state_changed();
    }

    /// Advance the countdown one second, lowest unit first. A decrement that
    /// lands on 00:00 rolls straight into the mode transition, so the zero
    /// state is never observable between heartbeats.
    pub fn tick(&mut self) {
        if self.seconds > 0 {
            self.seconds -= 1;
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
        } else {
            // Started at 00:00; the presentation layer normally guards this.
            self.switch_mode();
            self.emit_tick_updated();
            return;
        }
        if self.minutes == 0 && self.seconds == 0 {
            self.switch_mode();
        }
        self.emit_tick_updated();
    }

    /// The 1 Hz driver entry point: ticks the countdown while running, the
    /// prompt cycle while running in work mode, and the pending break
    /// auto-start while stopped.
    pub fn heartbeat(&mut self) {
        if self.running {
            self.tick();
            if self.running && self.mode == Mode::Work {
                self.tick_prompt();
            }
        } else if let Some(remaining) = self.break_autostart_in {
            if remaining <= 1 {
                self.break_autostart_in = None;
                self.start_inner(true);
            } else {
                self.break_autostart_in = Some(remaining - 1);
            }
        }
    }

    fn tick_prompt(&mut self) {
        let Some(fire) = self.prompt.tick() else {
            return;
        };
        match fire {
            PromptFire::MicroBreakStarted => {
                self.emit_sound(SoundCue::Prompt);
                self.emit_notify("Micro-break started", "Rest your eyes and body for a moment.");
            }
            PromptFire::MicroBreakEnded => {
                self.emit_sound(SoundCue::Prompt);
                self.emit_notify("Micro-break over", "Back to focus.");
                if self.settings.prompt_sound_enabled {
                    self.prompt.start_cycle(self.settings.prompt_window());
                }
            }
        }
    }

    /// The countdown reached zero: swap periods and stop ticking. A finished
    /// work period is logged and its break auto-starts silently one heartbeat
    /// later; a finished break waits for the user to start the next work
    /// period.
    fn switch_mode(&mut self) {
        self.running = false;
        match self.mode {
            Mode::Work => {
                if self.settings.prompt_sound_enabled {
                    self.emit_sound(SoundCue::End);
                }
                self.emit_notify("Focus period ended", "You finished a focus session. Take a break!");
                self.session_log.record_completion(Utc::now());
                self.prompt.stop_cycle();
                self.mode = Mode::Break;
                self.minutes = self.settings.break_minutes;
                self.seconds = 0;
                self.break_autostart_in = Some(BREAK_AUTOSTART_DELAY_SECS);
            }
            Mode::Break => {
                if self.settings.prompt_sound_enabled {
                    self.emit_sound(SoundCue::Start);
                }
                self.emit_notify("Break period ended", "Time for a new focus session.");
                self.mode = Mode::Work;
                self.minutes = self.settings.work_minutes;
                self.seconds = 0;
            }
        }
        self.emit_mode_changed();
        self.emit_tick_updated();
        self.emit_state_changed();
    }

    // ── Settings ─────────────────────────────────────────────────────
    //
    // Each setter validates, mutates, persists through the settings store
    // (failures logged, never surfaced), and emits where adapters care.

    pub fn set_work_minutes(&mut self, minutes: u32) -> Result<(), ConfigError> {
        let mut updated = self.settings.clone();
        updated.work_minutes = minutes;
        self.apply_settings(updated)
    }

    pub fn set_break_minutes(&mut self, minutes: u32) -> Result<(), ConfigError> {
        let mut updated = self.settings.clone();
        updated.break_minutes = minutes;
        self.apply_settings(updated)
    }

    pub fn set_prompt_interval(
        &mut self,
        min_minutes: u32,
        max_minutes: u32,
    ) -> Result<(), ConfigError> {
        let mut updated = self.settings.clone();
        updated.prompt_min_minutes = min_minutes;
        updated.prompt_max_minutes = max_minutes;
        self.apply_settings(updated)
    }

    pub fn set_micro_break_seconds(&mut self, seconds: u32) -> Result<(), ConfigError> {
        let mut updated = self.settings.clone();
        updated.micro_break_seconds = seconds;
        self.apply_settings(updated)
    }

    pub fn set_prompt_sound_enabled(&mut self, enabled: bool) {
        let mut updated = self.settings.clone();
        updated.prompt_sound_enabled = enabled;
        // A bool flip cannot fail validation.
        let _ = self.apply_settings(updated);
    }

    pub fn set_show_status_bar_icon(&mut self, visible: bool) {
        let mut updated = self.settings.clone();
        updated.show_status_bar_icon = visible;
        let _ = self.apply_settings(updated);
        self.bus.emit(Event::IconVisibilityChanged {
            visible,
            at: Utc::now(),
        });
    }

    fn apply_settings(&mut self, updated: TimerSettings) -> Result<(), ConfigError> {
        updated.validate()?;
        self.settings = updated;
        if let Err(e) = self.settings_store.save(&self.settings) {
            warn!(error = %e, "failed to persist settings");
        }
        Ok(())
    }

    // ── Events ───────────────────────────────────────────────────────

    fn emit_tick_updated(&self) {
        self.bus.emit(Event::TickUpdated {
            mode: self.mode,
            minutes: self.minutes,
            seconds: self.seconds,
            running: self.running,
            at: Utc::now(),
        });
    }

    fn emit_state_changed(&self) {
        self.bus.emit(Event::StateChanged {
            running: self.running,
            at: Utc::now(),
        });
    }

    fn emit_mode_changed(&self) {
        self.bus.emit(Event::ModeChanged {
            mode: self.mode,
            at: Utc::now(),
        });
    }

    fn emit_sound(&self, cue: SoundCue) {
        self.bus.emit(Event::PlaySound {
            cue,
            at: Utc::now(),
        });
    }

    fn emit_notify(&self, title: &str, body: &str) {
        self.bus.emit(Event::NotifyUser {
            title: title.to_string(),
            body: body.to_string(),
            at: Utc::now(),
        });
    }
}
