//! The interactive timer.
//!
//! Drives the engine with a 1-second interval, reads single-letter commands
//! from stdin, and relays engine events to the notifier and sound player.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use focustray_core::{
    Event, JsonFileStore, ListStore, Mode, SessionLog, TimerEngine, TomlSettingsStore,
};
use tokio::io::AsyncBufReadExt;
use tracing::warn;

use crate::notify::Notifier;
use crate::sound::SoundPlayer;

#[derive(Args)]
pub struct RunArgs {
    /// Do not start the work period immediately
    #[arg(long)]
    pub paused: bool,
    /// Override the work period length in minutes for this run
    #[arg(long, value_name = "MINUTES")]
    pub work: Option<u32>,
    /// Override the break period length in minutes for this run
    #[arg(long = "break", value_name = "MINUTES")]
    pub break_minutes: Option<u32>,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_loop(args))
}

async fn run_loop(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings_store = TomlSettingsStore::open_default()?;
    let mut settings = settings_store.load_or_default();
    if let Some(minutes) = args.work {
        settings.work_minutes = minutes;
    }
    if let Some(minutes) = args.break_minutes {
        settings.break_minutes = minutes;
    }
    settings.validate()?;

    let list_store: Arc<dyn ListStore> = Arc::new(JsonFileStore::open_default()?);
    let session_log = SessionLog::load(list_store);

    let mut engine = TimerEngine::new(settings, Box::new(settings_store), session_log);
    let mut events = engine.subscribe();
    let notifier = Notifier::new();
    let player = SoundPlayer::new();

    if !args.paused {
        engine.start();
    }

    println!("commands: [s]tart/stop  [r]eset  [q]uit");
    render(&engine);

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first interval tick completes immediately; consume it so the
    // countdown starts a full second after launch.
    ticker.tick().await;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                engine.heartbeat();
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "s" | "start" | "stop" => toggle(&mut engine),
                    "r" | "reset" => engine.reset(),
                    "q" | "quit" => break,
                    "" => {}
                    other => println!("\nunknown command: {other}"),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }

        while let Ok(event) = events.try_recv() {
            handle_event(&event, &notifier, &player);
        }
        render(&engine);
    }

    if let Err(e) = engine.session_log().flush() {
        warn!(error = %e, "failed to flush session log");
    }
    println!();
    Ok(())
}

fn toggle(engine: &mut TimerEngine) {
    if engine.is_running() {
        engine.stop();
    } else if engine.mode() == Mode::Work && engine.remaining() == (0, 0) {
        // The start-at-00:00 guard lives here, not in the engine.
        println!("\ncountdown finished; reset first");
    } else {
        engine.start();
    }
}

fn handle_event(event: &Event, notifier: &Notifier, player: &SoundPlayer) {
    match event {
        Event::PlaySound { cue, .. } => player.play(*cue),
        Event::NotifyUser { title, body, .. } => notifier.send(title, body),
        _ => {}
    }
}

fn render(engine: &TimerEngine) {
    let snap = engine.snapshot();
    let mode = match snap.mode {
        Mode::Work => "focus",
        Mode::Break => "break",
    };
    let state = if snap.running { "       " } else { " paused" };
    print!(
        "\r{mode} {}{state}  today: {}  ",
        engine.time_string(),
        snap.completed_today
    );
    let _ = std::io::stdout().flush();
}
