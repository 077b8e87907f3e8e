//! Game configuration
//!
//! Read once at startup from a RON file. Every field has a default, so a
//! partial file only overrides what it names:
//!
//! ```ron
//! (
//!     move_duration: 0.15,
//!     show_minimap: false,
//! )
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV: &str = "DUNGEON_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG: &str = "dungeon.ron";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Parse(e)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window_width: i32,
    pub window_height: i32,
    /// Seconds the camera takes to slide one cell
    pub move_duration: f32,
    /// Horizontal field of view in degrees
    pub fov_degrees: f32,
    /// Where editor saves and loads levels
    pub levels_dir: PathBuf,
    /// File name inside `levels_dir` used by F5/F9
    pub quicksave_file: String,
    /// Level loaded at startup instead of the built-in dungeon
    pub start_level: Option<PathBuf>,
    pub show_minimap: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 1024,
            window_height: 640,
            move_duration: 0.2,
            fov_degrees: 66.0,
            levels_dir: PathBuf::from("levels"),
            quicksave_file: "quicksave.json".to_string(),
            start_level: None,
            show_minimap: true,
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(s)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Path of the quicksave slot.
    pub fn quicksave_path(&self) -> PathBuf {
        self.levels_dir.join(&self.quicksave_file)
    }

    /// Field of view in radians, kept inside a sane range.
    pub fn fov(&self) -> f32 {
        self.fov_degrees.clamp(30.0, 120.0).to_radians()
    }

    /// Load from the first config file that exists; defaults otherwise.
    ///
    /// A file that exists but fails to parse is reported and ignored.
    pub fn load() -> Self {
        for path in candidate_paths() {
            if !path.is_file() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => {
                    log::info!("[Config] Loaded {}", path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!("[Config] Ignoring {}: {}", path.display(), e);
                    return Self::default();
                }
            }
        }
        log::debug!("[Config] No config file found, using defaults");
        Self::default()
    }
}

/// Config locations in lookup order.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        paths.push(PathBuf::from(path));
    }
    paths.push(PathBuf::from(LOCAL_CONFIG));
    paths.extend(user_config_path());
    paths
}

#[cfg(not(target_arch = "wasm32"))]
fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dungeon-crawl").join("config.ron"))
}

#[cfg(target_arch = "wasm32")]
fn user_config_path() -> Option<PathBuf> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = GameConfig::from_ron_str("(move_duration: 0.5, show_minimap: false)").unwrap();
        assert_eq!(config.move_duration, 0.5);
        assert!(!config.show_minimap);
        assert_eq!(config.window_width, GameConfig::default().window_width);
        assert_eq!(config.levels_dir, PathBuf::from("levels"));
    }

    #[test]
    fn test_start_level_option() {
        let config = GameConfig::from_ron_str(r#"(start_level: Some("levels/crypt.json"))"#).unwrap();
        assert_eq!(config.start_level, Some(PathBuf::from("levels/crypt.json")));
    }

    #[test]
    fn test_parse_error() {
        let result = GameConfig::from_ron_str("(move_duration: \"fast\")");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(fov_degrees: 90.0, quicksave_file: \"slot1.json\")").unwrap();
        let config = GameConfig::from_file(file.path()).unwrap();
        assert_eq!(config.fov_degrees, 90.0);
        assert_eq!(config.quicksave_path(), PathBuf::from("levels").join("slot1.json"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = GameConfig::from_file(dir.path().join("nope.ron"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_fov_is_clamped() {
        let mut config = GameConfig::default();
        config.fov_degrees = 500.0;
        assert!((config.fov() - 120f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_local_config_in_lookup() {
        let paths = candidate_paths();
        assert!(paths.contains(&PathBuf::from(LOCAL_CONFIG)));
    }
}
