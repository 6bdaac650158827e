use crate::domain::Profile;
use crate::error::{BrewkeeperError, Result};
use crate::utils::PathValidator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub const PROFILES_FILE: &str = "profiles.json";
const APP_DIR: &str = "brewkeeper";
const FALLBACK_DIR: &str = ".brewkeeper";

/// The persisted profile document: every profile plus the active one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSettings {
    pub active_profile_id: String,
    pub profiles: Vec<Profile>,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            active_profile_id: "work".to_string(),
            profiles: vec![
                Profile::new("work", "Work machine", true),
                Profile::new("hobby", "Hobby machine", false),
            ],
        }
    }
}

impl ProfileSettings {
    pub fn get(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|profile| profile.id == id)
    }

    pub fn active_profile(&self) -> Option<&Profile> {
        self.get(&self.active_profile_id)
    }

    /// Make `id` the active profile.
    pub fn select(&mut self, id: &str) -> Result<&Profile> {
        let index = self
            .profiles
            .iter()
            .position(|profile| profile.id == id)
            .ok_or_else(|| BrewkeeperError::ProfileNotFound(id.to_string()))?;
        self.active_profile_id = id.to_string();
        Ok(&self.profiles[index])
    }

    /// Toggle the safe-mode default of the active profile.
    pub fn set_safe_mode(&mut self, enabled: bool) -> Result<&Profile> {
        let active = self.active_profile_id.clone();
        let profile = self
            .profiles
            .iter_mut()
            .find(|profile| profile.id == active)
            .ok_or(BrewkeeperError::ProfileNotFound(active))?;
        profile.safe_mode_only = enabled;
        Ok(profile)
    }

    /// Lenient decode of a stored document: malformed profile entries are
    /// dropped, an unknown active id falls back to the first profile, and a
    /// document without any usable profile yields the defaults.
    fn from_document(document: &Value) -> Self {
        let profiles: Vec<Profile> = document
            .get("profiles")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| match Profile::deserialize(entry) {
                        Ok(profile) => Some(profile),
                        Err(e) => {
                            log::debug!("Dropping malformed profile entry: {e}");
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let Some(first) = profiles.first() else {
            return Self::default();
        };

        let active_profile_id = document
            .get("activeProfileId")
            .and_then(Value::as_str)
            .filter(|id| profiles.iter().any(|profile| profile.id == *id))
            .unwrap_or(&first.id)
            .to_string();

        Self {
            active_profile_id,
            profiles,
        }
    }
}

/// Reads and writes `profiles.json`, trying each candidate directory in turn.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dirs: Vec<PathBuf>,
}

impl ProfileStore {
    /// An explicit directory is used exclusively; otherwise the XDG location
    /// is tried first and `./.brewkeeper` second.
    pub fn new(config_dir: Option<PathBuf>) -> Self {
        let dirs = match config_dir {
            Some(dir) => vec![dir],
            None => Self::default_dirs(),
        };
        Self { dirs }
    }

    pub fn default_dirs() -> Vec<PathBuf> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        vec![
            preferred_dir(
                std::env::var_os("XDG_CONFIG_HOME"),
                std::env::var_os("HOME"),
                &cwd,
            ),
            cwd.join(FALLBACK_DIR),
        ]
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Never fails; anything unreadable degrades to the default profiles.
    pub fn load(&self) -> ProfileSettings {
        for dir in &self.dirs {
            let path = dir.join(PROFILES_FILE);
            let raw = match fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(e) => {
                    log::debug!("No profile store at {}: {e}", path.display());
                    continue;
                }
            };

            match serde_json::from_str::<Value>(&raw) {
                Ok(document) => {
                    log::debug!("Loaded profiles from {}", path.display());
                    return ProfileSettings::from_document(&document);
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable profile store {}: {e}", path.display());
                }
            }
        }

        ProfileSettings::default()
    }

    /// Write the settings into the first usable directory and return the file path.
    pub fn save(&self, settings: &ProfileSettings) -> Result<PathBuf> {
        let dir = self.ensure_dir()?;
        let path = dir.join(PROFILES_FILE);
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&path, json).map_err(|e| {
            BrewkeeperError::ProfileStore(format!("Failed to write {}: {e}", path.display()))
        })?;
        Ok(path)
    }

    fn ensure_dir(&self) -> Result<PathBuf> {
        for dir in &self.dirs {
            if let Err(e) = fs::create_dir_all(dir) {
                log::debug!("Cannot create {}: {e}", dir.display());
                continue;
            }
            match PathValidator::validate_config_dir(dir) {
                Ok(canonical) => return Ok(canonical),
                Err(e) => log::warn!("Skipping config directory: {e}"),
            }
        }

        Err(BrewkeeperError::ProfileStore(
            "Unable to initialize brewkeeper config directory".to_string(),
        ))
    }
}

fn preferred_dir(xdg_config_home: Option<OsString>, home: Option<OsString>, cwd: &Path) -> PathBuf {
    match xdg_config_home.filter(|value| !value.is_empty()) {
        Some(xdg) => PathBuf::from(xdg).join(APP_DIR),
        None => home
            .map(PathBuf::from)
            .unwrap_or_else(|| cwd.to_path_buf())
            .join(".config")
            .join(APP_DIR),
    }
}
