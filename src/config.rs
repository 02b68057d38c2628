use std::{fmt::Display, fs, io::ErrorKind, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const SETTINGS_FILE: &str = "settings.json";

/// Attribute segments are labelled by.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupingMode {
    #[default]
    Individual,
    #[value(name = "ticket")]
    ByTicket,
    #[value(name = "client")]
    ByClient,
    #[value(name = "type")]
    ByType,
    #[value(name = "group")]
    ByGroup,
}

impl Display for GroupingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupingMode::Individual => write!(f, "individual"),
            GroupingMode::ByTicket => write!(f, "ticket"),
            GroupingMode::ByClient => write!(f, "client"),
            GroupingMode::ByType => write!(f, "type"),
            GroupingMode::ByGroup => write!(f, "group"),
        }
    }
}

/// Everything a chart computation reads besides the records themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    pub mode: GroupingMode,
    /// When disabled overlapping segments are drawn flat even if they overlap.
    pub show_overlaps: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            mode: GroupingMode::Individual,
            show_overlaps: true,
        }
    }
}

impl ChartConfig {
    pub fn with_mode(self, mode: GroupingMode) -> Self {
        Self { mode, ..self }
    }

    pub fn with_show_overlaps(self, show_overlaps: bool) -> Self {
        Self {
            show_overlaps,
            ..self
        }
    }
}

/// Loads defaults from `settings.json` in the application directory. A missing file means
/// defaults, an unreadable one is an error.
pub fn load_settings(app_dir: &Path) -> Result<ChartConfig> {
    let path = app_dir.join(SETTINGS_FILE);
    match fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings from {}", path.display())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No settings at {path:?}, using defaults");
            Ok(ChartConfig::default())
        }
        Err(e) => {
            Err(e).with_context(|| format!("Failed to read settings from {}", path.display()))
        }
    }
}
