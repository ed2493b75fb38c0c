//! Desktop notification adapter.

use std::sync::atomic::{AtomicBool, Ordering};

use notify_rust::Notification;
use tracing::warn;

/// Sends user-facing alerts. The first delivery failure is logged and mutes
/// the sender for the rest of the process; every later send is a no-op.
pub struct Notifier {
    muted: AtomicBool,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            muted: AtomicBool::new(false),
        }
    }

    pub fn send(&self, title: &str, body: &str) {
        if self.muted.load(Ordering::Relaxed) {
            return;
        }
        if let Err(e) = Notification::new().summary(title).body(body).show() {
            warn!(error = %e, "notification delivery failed, muting further alerts");
            self.muted.store(true, Ordering::Relaxed);
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
