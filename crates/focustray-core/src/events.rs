use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::timer::Mode;

/// Sound cues the presentation layer knows how to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Start,
    End,
    Prompt,
}

/// Every observable state change in the engine produces an Event.
/// Presentation and OS adapters subscribe via [`EventBus::subscribe`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The countdown advanced (or was rewritten by a reset/transition).
    TickUpdated {
        mode: Mode,
        minutes: u32,
        seconds: u32,
        running: bool,
        at: DateTime<Utc>,
    },
    /// The running flag flipped.
    StateChanged {
        running: bool,
        at: DateTime<Utc>,
    },
    /// Work/break mode switched.
    ModeChanged {
        mode: Mode,
        at: DateTime<Utc>,
    },
    /// The sound player should play a cue.
    PlaySound {
        cue: SoundCue,
        at: DateTime<Utc>,
    },
    /// The OS notifier should display an alert.
    NotifyUser {
        title: String,
        body: String,
        at: DateTime<Utc>,
    },
    /// The status-bar icon toggle changed.
    IconVisibilityChanged {
        visible: bool,
        at: DateTime<Utc>,
    },
}

const CHANNEL_CAPACITY: usize = 256;

/// Broadcast bus scoped to a single engine instance.
///
/// Emission never blocks; an event published with no live subscribers is
/// dropped, and a subscriber that falls behind loses the oldest events.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
