//! Randomized micro-break prompt cycle.
//!
//! During focused work the scheduler delivers two signals per cycle: a
//! primary prompt after a randomly drawn interval, then a secondary prompt
//! `micro_break_secs` later that ends the micro-break. It owns no OS timers;
//! the engine decrements it once per second and re-arms the next cycle after
//! the secondary fire.

use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;

/// Interval bounds for one prompt cycle, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptWindow {
    pub min_secs: u32,
    pub max_secs: u32,
    pub micro_break_secs: u32,
}

/// A prompt countdown reaching zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptFire {
    MicroBreakStarted,
    MicroBreakEnded,
}

/// Countdown-slot scheduler for the prompt cycle.
///
/// Arming a cycle overwrites both slots, so a stale countdown can never
/// double-fire. Holds nothing across stop/start beyond the slots themselves.
pub struct PromptScheduler {
    rng: Mcg128Xsl64,
    window: Option<PromptWindow>,
    primary_in: Option<u32>,
    secondary_in: Option<u32>,
}

impl PromptScheduler {
    pub fn new() -> Self {
        Self::with_seed(rand::thread_rng().gen())
    }

    /// Deterministic scheduler for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mcg128Xsl64::seed_from_u64(seed),
            window: None,
            primary_in: None,
            secondary_in: None,
        }
    }

    /// Arm a fresh cycle: cancel anything pending, then draw the next
    /// interval uniformly from `[min_secs, max_secs]` inclusive.
    pub fn start_cycle(&mut self, window: PromptWindow) {
        self.stop_cycle();
        let lo = window.min_secs;
        let hi = window.max_secs.max(lo);
        self.primary_in = Some(self.rng.gen_range(lo..=hi));
        self.window = Some(window);
    }

    /// Cancel both pending countdowns. Idempotent.
    pub fn stop_cycle(&mut self) {
        self.primary_in = None;
        self.secondary_in = None;
        self.window = None;
    }

    /// Advance one second. At most one fire per call, since the secondary is
    /// armed only when the primary fires.
    pub fn tick(&mut self) -> Option<PromptFire> {
        if let Some(remaining) = self.primary_in {
            if remaining <= 1 {
                self.primary_in = None;
                self.secondary_in = self.window.map(|w| w.micro_break_secs);
                return Some(PromptFire::MicroBreakStarted);
            }
            self.primary_in = Some(remaining - 1);
            return None;
        }
        if let Some(remaining) = self.secondary_in {
            if remaining <= 1 {
                self.secondary_in = None;
                return Some(PromptFire::MicroBreakEnded);
            }
            self.secondary_in = Some(remaining - 1);
        }
        None
    }

    /// Seconds until the next pending fire, if any.
    pub fn next_fire_in(&self) -> Option<u32> {
        self.primary_in.or(self.secondary_in)
    }

    pub fn is_armed(&self) -> bool {
        self.primary_in.is_some() || self.secondary_in.is_some()
    }
}

impl Default for PromptScheduler {
    fn default() -> Self {
        Self::new()
    }
}
