use std::path::PathBuf;

use anyhow::{Result, ensure};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::DEFAULT_STEP_COUNT;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub step_count: usize,
    /// Fixed RNG seed; `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    pub frame_rate: u16,
    /// Show the active combination in the status bar.
    #[serde(default)]
    pub reveal_combination: bool,
    /// Drop clicks while a handle or door animation is still running.
    #[serde(default)]
    pub lock_input_during_animation: bool,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    pub key_bindings: KeyBindings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    pub clockwise: String,
    pub counter_clockwise: String,
    pub restart: String,
    pub quit: String,
    #[serde(default = "default_reveal")]
    pub reveal: String,
}

fn default_reveal() -> String { "c".into() }

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            step_count: DEFAULT_STEP_COUNT,
            seed: None,
            frame_rate: 30,
            reveal_combination: false,
            lock_input_during_animation: false,
            log_file: None,
            key_bindings: KeyBindings {
                clockwise: "Right".into(),
                counter_clockwise: "Left".into(),
                restart: "r".into(),
                quit: "q".into(),
                reveal: default_reveal(),
            },
        }
    }
}

impl GameConfig {
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(json) => match serde_json::from_str::<GameConfig>(&json) {
                Ok(config) => match config.validate() {
                    Ok(()) => config,
                    Err(e) => {
                        warn!(path = %config_path.display(), "invalid game config ({e}), using defaults");
                        Self::default()
                    }
                },
                Err(e) => {
                    warn!(path = %config_path.display(), "unparseable game config ({e}), using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.step_count > 0, "step_count must be at least 1");
        ensure!(self.frame_rate > 0, "frame_rate must be at least 1");
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("vault-door");
        path.push("config.json");
        path
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Alt-") {
        if !event.modifiers.contains(KeyModifiers::ALT) {
            return false;
        }
        return matches_key(rest, event.code);
    }

    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        if !event.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        return matches_key(rest, event.code);
    }

    // Plain bindings must not fire while Ctrl or Alt is held.
    if event.modifiers.contains(KeyModifiers::CONTROL)
        || event.modifiers.contains(KeyModifiers::ALT)
    {
        return false;
    }

    matches_key(binding, event.code)
}

fn matches_key(name: &str, code: KeyCode) -> bool {
    match name {
        "Right" => code == KeyCode::Right,
        "Left" => code == KeyCode::Left,
        "Up" => code == KeyCode::Up,
        "Down" => code == KeyCode::Down,
        "Enter" => code == KeyCode::Enter,
        "Esc" => code == KeyCode::Esc,
        "Space" => code == KeyCode::Char(' '),
        "Tab" => code == KeyCode::Tab,
        "Backspace" => code == KeyCode::Backspace,
        "Home" => code == KeyCode::Home,
        "End" => code == KeyCode::End,
        s => {
            if let Some(rest) = s.strip_prefix('F') {
                if let Ok(n) = rest.parse::<u8>() {
                    return code == KeyCode::F(n);
                }
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => code == KeyCode::Char(c),
                _ => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_steps_fails_validation() {
        let config = GameConfig {
            step_count: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let json = r#"{
            "step_count": 4,
            "frame_rate": 20,
            "key_bindings": {
                "clockwise": "d",
                "counter_clockwise": "a",
                "restart": "r",
                "quit": "Esc"
            }
        }"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.step_count, 4);
        assert_eq!(config.seed, None);
        assert!(!config.lock_input_during_animation);
        assert_eq!(config.key_bindings.reveal, "c");
    }

    #[test]
    fn named_and_char_bindings_match() {
        assert!(matches_binding("Right", &key(KeyCode::Right, KeyModifiers::NONE)));
        assert!(matches_binding("q", &key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(matches_binding("F11", &key(KeyCode::F(11), KeyModifiers::NONE)));
        assert!(!matches_binding("Left", &key(KeyCode::Right, KeyModifiers::NONE)));
    }

    #[test]
    fn plain_binding_ignores_modified_keys() {
        assert!(!matches_binding("r", &key(KeyCode::Char('r'), KeyModifiers::CONTROL)));
        assert!(matches_binding("Ctrl-r", &key(KeyCode::Char('r'), KeyModifiers::CONTROL)));
        assert!(matches_binding("Alt-Enter", &key(KeyCode::Enter, KeyModifiers::ALT)));
    }
}
