//! Run settings and the level catalog
//!
//! Stored as JSON next to the game. Anything missing falls back to the stock
//! three-level catalog.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::sim::chart::{Chart, load_chart};
use crate::sim::level::Level;

/// One selectable level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelEntry {
    pub name: String,
    /// Level data records
    pub chart: PathBuf,
    /// Backing track, handed to the audio collaborator untouched
    pub track: PathBuf,
    /// Score needed for a clear
    pub clear_score: i32,
    /// Enemies, guardian and projectiles are enabled
    #[serde(default)]
    pub combat: bool,
}

impl LevelEntry {
    fn stock(number: u32, clear_score: i32, combat: bool) -> Self {
        Self {
            name: format!("Level {number}"),
            chart: PathBuf::from(format!("res/level{number}.csv")),
            track: PathBuf::from(format!("res/track{number}.wav")),
            clear_score,
            combat,
        }
    }
}

/// Run settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed; a time-derived one is used when absent
    pub seed: Option<u64>,
    /// Let the simulation play itself
    pub autoplay: bool,
    /// Level select order
    pub levels: Vec<LevelEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            autoplay: false,
            levels: vec![
                LevelEntry::stock(1, 150, false),
                LevelEntry::stock(2, 400, false),
                LevelEntry::stock(3, 350, true),
            ],
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load_or_default(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No settings at {} ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings in {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Configured seed, or one derived from the clock
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        })
    }
}

/// A catalog entry with its level data loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDef {
    pub entry: LevelEntry,
    pub chart: Chart,
}

impl LevelDef {
    /// Fresh level, ready to play from frame zero
    pub fn build(&self) -> Level {
        Level::from_chart(
            self.entry.name.clone(),
            self.entry.clear_score,
            &self.chart,
            self.entry.combat,
        )
    }
}

/// Load the level data for every catalog entry
///
/// Fails on the first unreadable or malformed file; no partial catalog is
/// returned.
pub fn load_catalog(settings: &Settings) -> Result<Vec<LevelDef>, LoadError> {
    if settings.levels.is_empty() {
        return Err(LoadError::Config("no levels configured".to_string()));
    }

    settings
        .levels
        .iter()
        .map(|entry| {
            let chart = load_chart(&entry.chart)?;
            if chart.lanes.is_empty() {
                return Err(LoadError::Config(format!(
                    "level '{}' declares no lanes",
                    entry.name
                )));
            }
            Ok(LevelDef {
                entry: entry.clone(),
                chart,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("shadow-dance-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn test_default_catalog() {
        let settings = Settings::default();
        let scores: Vec<i32> = settings.levels.iter().map(|l| l.clear_score).collect();
        assert_eq!(scores, vec![150, 400, 350]);
        assert!(settings.levels[2].combat);
        assert!(!settings.levels[0].combat);
        assert_eq!(settings.levels[1].chart, PathBuf::from("res/level2.csv"));
        assert_eq!(settings.levels[1].track, PathBuf::from("res/track2.wav"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7 }"#).expect("valid json");
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.resolve_seed(), 7);
        assert!(!settings.autoplay);
        assert_eq!(settings.levels.len(), 3);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            seed: Some(99),
            autoplay: true,
            levels: vec![LevelEntry::stock(4, 10, true)],
        };
        let json = settings.to_json().expect("serialize");
        assert_eq!(Settings::from_json(&json).expect("deserialize"), settings);
    }

    #[test]
    fn test_load_or_default_fallbacks() {
        let missing = Settings::load_or_default(Path::new("does/not/exist.json"));
        assert_eq!(missing, Settings::default());

        let dir = scratch_dir("bad-settings");
        let path = dir.join("settings.json");
        std::fs::write(&path, "{ not json").expect("write");
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }

    #[test]
    fn test_load_catalog() {
        let dir = scratch_dir("catalog");
        let chart = dir.join("level.csv");
        std::fs::write(&chart, "Lane,Left,192\nLeft,Normal,30\n").expect("write");

        let settings = Settings {
            levels: vec![LevelEntry {
                name: "Custom".to_string(),
                chart,
                track: dir.join("track.wav"),
                clear_score: 5,
                combat: false,
            }],
            ..Default::default()
        };
        let catalog = load_catalog(&settings).expect("catalog loads");
        assert_eq!(catalog.len(), 1);

        let level = catalog[0].build();
        assert_eq!(level.name(), "Custom");
        assert_eq!(level.clear_score(), 5);
        assert_eq!(level.lanes().len(), 1);
        assert_eq!(level.lanes()[0].notes().len(), 1);
        assert!(level.combat().is_none());
    }

    #[test]
    fn test_load_catalog_errors() {
        let empty = Settings {
            levels: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(load_catalog(&empty), Err(LoadError::Config(_))));

        let missing = Settings {
            levels: vec![LevelEntry::stock(9, 0, false)],
            ..Default::default()
        };
        assert!(matches!(load_catalog(&missing), Err(LoadError::Io { .. })));

        let dir = scratch_dir("no-lanes");
        let chart = dir.join("level.csv");
        std::fs::write(&chart, "Left,Normal,30\n").expect("write");
        let no_lanes = Settings {
            levels: vec![LevelEntry {
                chart,
                ..LevelEntry::stock(1, 0, false)
            }],
            ..Default::default()
        };
        assert!(matches!(load_catalog(&no_lanes), Err(LoadError::Config(_))));
    }
}
