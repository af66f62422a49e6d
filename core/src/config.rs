//! Tracker configuration, persisted as TOML through confy.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How list placeholders render their entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListFormat {
    #[default]
    Plain,
    Json,
}

/// How room names are displayed in rendered output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomNameFormat {
    #[default]
    AbbreviationAndNumber,
    NameAndNumber,
    RoomName,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Root directory for all tracker files.
    pub data_directory: String,
    /// Attempt window for live stats output.
    pub attempt_window: usize,
    /// Attempt window for the written summary report.
    pub summary_attempt_window: usize,
    pub list_format: ListFormat,
    pub room_name_format: RoomNameFormat,
    /// Suspend attempt counting without closing the chapter.
    pub pause_death_tracking: bool,
    /// Record a path while playing instead of loading one from disk.
    pub record_path: bool,
    /// Only count attempts made while holding the golden berry.
    pub only_track_with_golden: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            attempt_window: 20,
            summary_attempt_window: 20,
            list_format: ListFormat::default(),
            room_name_format: RoomNameFormat::default(),
            pause_death_tracking: false,
            record_path: false,
            only_track_with_golden: false,
        }
    }
}

fn default_data_directory() -> String {
    dirs::data_dir()
        .map(|p| p.join("splittrack"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "splittrack-data".to_string())
}

/// Extension trait for TrackerConfig persistence
pub trait TrackerConfigExt {
    fn load() -> Self;
    fn save(self);
}

impl TrackerConfigExt for TrackerConfig {
    fn load() -> Self {
        confy::load("splittrack", "config").unwrap_or_default()
    }

    fn save(self) {
        if let Err(err) = confy::store("splittrack", "config", self) {
            tracing::warn!("failed to save configuration: {err}");
        }
    }
}

impl TrackerConfig {
    pub fn data_root(&self) -> PathBuf {
        PathBuf::from(&self.data_directory)
    }
}
