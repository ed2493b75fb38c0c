//! Sound playback adapter.
//!
//! Maps engine sound cues to named system sounds and falls back through a
//! fixed candidate list when the preferred one is missing. Playback shells
//! out to the platform's audio player; failures are logged, never surfaced.

use std::path::Path;
use std::process::{Command, Stdio};

use focustray_core::SoundCue;
use tracing::{debug, warn};

const START_SOUND: &str = "Glass";
const END_SOUND: &str = "Funk";
const PROMPT_SOUND: &str = "Blow";

const FALLBACK_SOUNDS: [&str; 9] = [
    "Ping", "Tink", "Bottle", "Glass", "Hero", "Pop", "Blow", "Submarine", "Funk",
];

pub struct SoundPlayer;

impl SoundPlayer {
    pub fn new() -> Self {
        Self
    }

    fn cue_sound(cue: SoundCue) -> &'static str {
        match cue {
            SoundCue::Start => START_SOUND,
            SoundCue::End => END_SOUND,
            SoundCue::Prompt => PROMPT_SOUND,
        }
    }

    pub fn play(&self, cue: SoundCue) {
        let preferred = Self::cue_sound(cue);
        if try_named(preferred) {
            return;
        }
        for name in FALLBACK_SOUNDS {
            if name != preferred && try_named(name) {
                return;
            }
        }
        if try_freedesktop() {
            return;
        }
        warn!(?cue, "no playable sound found");
    }
}

impl Default for SoundPlayer {
    fn default() -> Self {
        Self::new()
    }
}

/// macOS named system sound.
fn try_named(name: &str) -> bool {
    let path = format!("/System/Library/Sounds/{name}.aiff");
    Path::new(&path).exists() && spawn_player("afplay", &path)
}

/// Generic desktop fallbacks.
fn try_freedesktop() -> bool {
    let candidates = [
        ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
        ("aplay", "/usr/share/sounds/alsa/Front_Center.wav"),
    ];
    candidates
        .iter()
        .any(|(player, path)| Path::new(path).exists() && spawn_player(player, path))
}

fn spawn_player(player: &str, path: &str) -> bool {
    match Command::new(player)
        .arg(path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(_) => true,
        Err(e) => {
            debug!(player, path, error = %e, "sound player unavailable");
            false
        }
    }
}
