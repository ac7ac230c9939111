/*
 * Manages application settings: the debounce delay for recounts, which file
 * extensions count as documents, and the log level. Settings are persisted as
 * `settings.json` in the per-user local configuration directory resolved by
 * `path_utils`.
 *
 * It uses a trait-based approach (`ConfigManagerOperations`) so the host can
 * be handed a mock in tests. The concrete implementation (`CoreConfigManager`)
 * handles file system interactions and can be pointed at an explicit directory.
 */
use crate::core::path_utils;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SETTINGS_FILENAME: &str = "settings.json";

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub debounce_ms: u64,
    pub document_extensions: Vec<String>,
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            document_extensions: vec!["md".to_string()],
            log_level: "info".to_string(),
        }
    }
}

impl AppSettings {
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /*
     * Parses `log_level` case-insensitively. Unknown names fall back to
     * `Info` with a warning.
     */
    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.log_level.parse::<log::LevelFilter>() {
            Ok(level) => level,
            Err(_) => {
                log::warn!(
                    "AppSettings: Unknown log level '{}', using 'info'.",
                    self.log_level
                );
                log::LevelFilter::Info
            }
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoProjectDirectory,
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::Serde(e) => write!(f, "Configuration format error: {e}"),
            ConfigError::NoProjectDirectory => {
                write!(f, "Could not determine project directory for configuration")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub trait ConfigManagerOperations: Send + Sync {
    fn load_settings(&self, app_name: &str) -> Result<AppSettings>;
    // Not called by the headless binary, which only reads settings.
    #[allow(dead_code)]
    fn save_settings(&self, app_name: &str, settings: &AppSettings) -> Result<()>;
}

pub struct CoreConfigManager {
    config_dir_override: Option<PathBuf>,
}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {
            config_dir_override: None,
        }
    }

    /*
     * Creates a manager that reads and writes in `config_dir` instead of the
     * per-user directory. The directory must already exist.
     */
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        CoreConfigManager {
            config_dir_override: Some(config_dir.into()),
        }
    }

    fn settings_path(&self, app_name: &str) -> Result<PathBuf> {
        let config_dir = match &self.config_dir_override {
            Some(dir) => dir.clone(),
            None => path_utils::get_base_app_config_local_dir(app_name)
                .ok_or(ConfigError::NoProjectDirectory)?,
        };
        Ok(config_dir.join(SETTINGS_FILENAME))
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn read_settings_file(file_path: &Path) -> Result<AppSettings> {
    let contents = fs::read_to_string(file_path)?;
    if contents.trim().is_empty() {
        log::debug!("CoreConfigManager: Settings file {file_path:?} is empty, using defaults.");
        return Ok(AppSettings::default());
    }
    Ok(serde_json::from_str(&contents)?)
}

impl ConfigManagerOperations for CoreConfigManager {
    /*
     * Loads the settings for `app_name`. A missing or empty settings file
     * yields the defaults; fields absent from the file take their default
     * values. A malformed file is reported as `ConfigError::Serde`.
     */
    fn load_settings(&self, app_name: &str) -> Result<AppSettings> {
        log::trace!("CoreConfigManager: Loading settings for app '{app_name}'");
        let file_path = self.settings_path(app_name)?;

        if !file_path.exists() {
            log::debug!("CoreConfigManager: Settings file {file_path:?} does not exist.");
            return Ok(AppSettings::default());
        }

        let settings = read_settings_file(&file_path)?;
        log::debug!("CoreConfigManager: Loaded settings {settings:?} from {file_path:?}.");
        Ok(settings)
    }

    fn save_settings(&self, app_name: &str, settings: &AppSettings) -> Result<()> {
        log::trace!("CoreConfigManager: Saving settings for app '{app_name}'");
        let file_path = self.settings_path(app_name)?;
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&file_path, json)?;
        log::debug!("CoreConfigManager: Saved settings to {file_path:?}.");
        Ok(())
    }
}
