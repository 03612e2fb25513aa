//! Settings file persistence
//!
//! Settings live in a JSON file inside the platform config directory. Loading
//! never fails from the caller's point of view: a missing, empty or corrupt
//! file yields defaults. Saving writes a sibling temp file and renames it
//! over the original.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Directory name under the platform config directory
const APP_DIR_NAME: &str = "markitdown";

/// Settings file name
const CONFIG_FILE_NAME: &str = "settings.json";

/// Temp file used during atomic writes
const CONFIG_BACKUP_NAME: &str = "settings.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// - **Windows**: `%APPDATA%\markitdown\`
/// - **macOS**: `~/Library/Application Support/markitdown/`
/// - **Linux**: `~/.config/markitdown/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the platform has no config directory.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_DIR_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Full path to the settings file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        debug!("Creating config directory: {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| Error::ConfigSave {
            path: dir.to_path_buf(),
            source: Box::new(e),
        })?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from the default location, falling back to defaults.
pub fn load_config() -> Settings {
    get_config_file_path()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_warn_default(Settings::default(), "Failed to load settings")
}

/// Load settings from an explicit file.
///
/// A missing or empty file is not an error and yields defaults.
pub fn load_config_from(config_path: &Path) -> Result<Settings> {
    if !config_path.exists() {
        debug!(
            "Settings file not found at {}, using defaults",
            config_path.display()
        );
        return Ok(Settings::default());
    }

    let contents = fs::read_to_string(config_path).map_err(|e| Error::ConfigLoad {
        path: config_path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Settings file is empty, using defaults");
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "Settings file at {} contains invalid JSON: {}",
            config_path.display(),
            e
        );
        Error::ConfigParse {
            message: format!("Failed to parse settings file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!("Settings loaded from {}", config_path.display());
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save settings into `config_dir`, creating it if needed.
///
/// Writes to a temp file first and renames it over the settings file.
pub fn save_config_to(config_dir: &Path, settings: &Settings) -> Result<()> {
    ensure_dir(config_dir)?;
    let config_path = config_dir.join(CONFIG_FILE_NAME);
    let backup_path = config_dir.join(CONFIG_BACKUP_NAME);

    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    fs::write(&backup_path, &json).map_err(|e| Error::ConfigSave {
        path: backup_path.clone(),
        source: Box::new(e),
    })?;

    fs::rename(&backup_path, &config_path).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    debug!("Settings saved to {}", config_path.display());
    Ok(())
}

/// Save settings, logging instead of returning errors.
///
/// Returns `true` if the save succeeded.
pub fn save_config_silent(config_dir: &Path, settings: &Settings) -> bool {
    match save_config_to(config_dir, settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save settings: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccentColor, FontFamily, Theme};
    use tempfile::TempDir;

    /// Temp directory standing in for the platform config directory.
    struct TestEnv {
        _temp_dir: TempDir,
        config_dir: PathBuf,
    }

    impl TestEnv {
        fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let config_dir = temp_dir.path().join(APP_DIR_NAME);
            Self {
                _temp_dir: temp_dir,
                config_dir,
            }
        }

        fn config_file(&self) -> PathBuf {
            self.config_dir.join(CONFIG_FILE_NAME)
        }

        fn write_config(&self, content: &str) {
            fs::create_dir_all(&self.config_dir).expect("Failed to create config dir");
            fs::write(self.config_file(), content).expect("Failed to write config");
        }
    }

    #[test]
    fn test_get_config_file_path_names() {
        if let Ok(path) = get_config_file_path() {
            let text = path.to_string_lossy();
            assert!(text.contains(APP_DIR_NAME));
            assert!(text.ends_with(CONFIG_FILE_NAME));
        }
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let env = TestEnv::new();
        let settings = load_config_from(&env.config_file()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let env = TestEnv::new();
        env.write_config("   \n");
        let settings = load_config_from(&env.config_file()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let env = TestEnv::new();
        env.write_config("{ not json");
        let result = load_config_from(&env.config_file());
        assert!(matches!(result, Err(Error::ConfigParse { .. })));

        let fallback = result.unwrap_or_warn_default(Settings::default(), "test");
        assert_eq!(fallback, Settings::default());
    }

    #[test]
    fn test_load_sanitizes_values() {
        let env = TestEnv::new();
        env.write_config(r#"{"fontSize": 2.0}"#);
        let settings = load_config_from(&env.config_file()).unwrap();
        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);
    }

    #[test]
    fn test_save_creates_dir_and_roundtrips() {
        let env = TestEnv::new();
        let original = Settings {
            theme: Theme::Dark,
            accent_color: AccentColor::Green,
            font_size: 20.0,
            font_family: FontFamily::Serif,
            show_stats: true,
            ..Settings::default()
        };

        save_config_to(&env.config_dir, &original).unwrap();
        assert!(env.config_file().exists());
        assert!(!env.config_dir.join(CONFIG_BACKUP_NAME).exists());

        let loaded = load_config_from(&env.config_file()).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_save_overwrites_previous() {
        let env = TestEnv::new();
        env.write_config(r#"{"theme": "dark"}"#);

        save_config_to(&env.config_dir, &Settings::default()).unwrap();
        let loaded = load_config_from(&env.config_file()).unwrap();
        assert_eq!(loaded.theme, Theme::Light);
    }
}
