use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::LauncherError;

const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024; // 64 KiB

/// Environment variable naming the TOML config file.
pub const CONFIG_ENV_VAR: &str = "APP_LAUNCHER_CONFIG";

pub const DEFAULT_APPLICATIONS_DIR: &str = "/Applications";
pub const DEFAULT_BUNDLE_SUFFIX: &str = ".app";
pub const DEFAULT_OPEN_PROGRAM: &str = "open";

// --- TOML deserialization structs (private, map 1:1 to TOML schema) ---

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    launcher: LauncherSection,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct LauncherSection {
    applications_dir: Option<PathBuf>,
    bundle_suffix: Option<String>,
    open_program: Option<String>,
    listing_failure: Option<ListingFailure>,
}

/// What `list_applications` reports when the applications directory
/// cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingFailure {
    /// Empty listing, error only logged.
    #[default]
    Empty,
    /// Failure result carrying the directory error.
    Report,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub applications_dir: PathBuf,
    pub bundle_suffix: String,
    pub open_program: String,
    pub listing_failure: ListingFailure,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            applications_dir: PathBuf::from(DEFAULT_APPLICATIONS_DIR),
            bundle_suffix: DEFAULT_BUNDLE_SUFFIX.to_owned(),
            open_program: DEFAULT_OPEN_PROGRAM.to_owned(),
            listing_failure: ListingFailure::default(),
        }
    }
}

impl FromStr for Config {
    type Err = LauncherError;

    /// Parse and validate a config from a TOML string. Absent keys keep their defaults.
    fn from_str(content: &str) -> Result<Self, LauncherError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| LauncherError::ConfigLoad(e.to_string()))?;

        let defaults = Config::default();
        let section = file.launcher;
        let config = Config {
            applications_dir: section
                .applications_dir
                .unwrap_or(defaults.applications_dir),
            bundle_suffix: section.bundle_suffix.unwrap_or(defaults.bundle_suffix),
            open_program: section.open_program.unwrap_or(defaults.open_program),
            listing_failure: section.listing_failure.unwrap_or(defaults.listing_failure),
        };

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Load a config from a TOML file. Checks file size before reading.
    pub fn load(path: &Path) -> Result<Self, LauncherError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            LauncherError::ConfigLoad(format!("cannot read {}: {e}", path.display()))
        })?;

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(LauncherError::ConfigLoad(format!(
                "config file exceeds {MAX_CONFIG_FILE_SIZE} byte limit"
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            LauncherError::ConfigLoad(format!("cannot read {}: {e}", path.display()))
        })?;

        content.parse()
    }

    /// Resolve the config from `APP_LAUNCHER_CONFIG`, falling back to defaults
    /// when the variable is unset.
    pub fn from_env() -> Result<Self, LauncherError> {
        Self::from_path_var(std::env::var_os(CONFIG_ENV_VAR).as_deref())
    }

    fn from_path_var(path: Option<&OsStr>) -> Result<Self, LauncherError> {
        match path {
            Some(path) => Self::load(Path::new(path)),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), LauncherError> {
        if !self.applications_dir.is_absolute() {
            return Err(LauncherError::ConfigValidation(format!(
                "applications_dir must be absolute, got '{}'",
                self.applications_dir.display()
            )));
        }
        if self.bundle_suffix.is_empty() {
            return Err(LauncherError::ConfigValidation(
                "bundle_suffix must not be empty".to_owned(),
            ));
        }
        if self.open_program.trim().is_empty() {
            return Err(LauncherError::ConfigValidation(
                "open_program must not be empty".to_owned(),
            ));
        }
        Ok(())
    }
}
