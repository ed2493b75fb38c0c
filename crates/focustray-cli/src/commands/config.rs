use clap::Subcommand;
use focustray_core::{SettingsStore, TimerSettings, TomlSettingsStore};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a settings value
    Get {
        /// Settings key (e.g. "work_minutes", "prompt_sound_enabled")
        key: String,
    },
    /// Set a settings value
    Set {
        /// Settings key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = TomlSettingsStore::open_default()?;
    match action {
        ConfigAction::Get { key } => {
            let settings = store.load_or_default();
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = store.load_or_default();
            settings.set(&key, &value)?;
            store.save(&settings)?;
            println!("ok");
        }
        ConfigAction::List => {
            let settings = store.load_or_default();
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Reset => {
            let settings = TimerSettings::default();
            store.save(&settings)?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
