use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use serde::Deserialize;

use crate::ui::gauge::GaugeGlyphs;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gauge: GaugeConfig,
    pub keybinds: KeybindsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    pub fill: String,
    pub empty: String,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        GaugeConfig {
            fill: "#".to_string(),
            empty: ".".to_string(),
        }
    }
}

impl GaugeConfig {
    /// First character of each setting; an empty string keeps the default.
    pub fn glyphs(&self) -> GaugeGlyphs {
        let defaults = GaugeGlyphs::default();
        GaugeGlyphs {
            fill: self.fill.chars().next().unwrap_or(defaults.fill),
            empty: self.empty.chars().next().unwrap_or(defaults.empty),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            enabled: true,
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Parses a key name from the config file: a single character, or one of
/// `Enter`, `Esc`/`Escape`, `Tab`, `Space`, `Backspace`.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    match s.to_lowercase().as_str() {
        "enter" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "space" => Some(KeyCode::Char(' ')),
        "backspace" => Some(KeyCode::Backspace),
        _ => None,
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("parasys").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}
