// SplitScreen Settings Engine
// Persists app flags (onboarding, review prompt, split hint, page-load counter).
// Flags are stored as a JSON file at the platform-specific config path.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::AppFlags;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<AppFlags, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &AppFlags;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists flags as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: AppFlags,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses the platform-specific config directory with `settings.json`.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => platform::get_config_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string(),
        };

        Self {
            config_path,
            settings: AppFlags::default(),
        }
    }

    /// Records that the split-screen drag hint was dismissed.
    pub fn mark_split_hint_seen(&mut self) -> Result<(), SettingsError> {
        self.update(|flags| flags.has_seen_split_hint = true)
    }

    pub fn mark_review_shown(&mut self) -> Result<(), SettingsError> {
        self.update(|flags| flags.was_review_shown = true)
    }

    pub fn mark_onboarding_done(&mut self) -> Result<(), SettingsError> {
        self.update(|flags| flags.needs_skip_onboarding = true)
    }

    /// Counts one finished page load and returns the new total.
    pub fn bump_page_loads(&mut self) -> Result<u32, SettingsError> {
        self.update(|flags| flags.page_load_count = flags.page_load_count.saturating_add(1))?;
        Ok(self.settings.page_load_count)
    }

    fn update(&mut self, f: impl FnOnce(&mut AppFlags)) -> Result<(), SettingsError> {
        let before = self.settings.clone();
        f(&mut self.settings);
        if self.settings == before {
            return Ok(());
        }
        self.save()
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads flags from the JSON config file.
    ///
    /// If the file does not exist, returns defaults.
    /// If the file exists but is malformed, returns a serialization error.
    fn load(&mut self) -> Result<AppFlags, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = AppFlags::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: AppFlags = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Saves the current flags to the JSON config file.
    ///
    /// Creates parent directories if they don't exist.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        debug!(path = %self.config_path, "settings saved");
        Ok(())
    }

    fn get_settings(&self) -> &AppFlags {
        &self.settings
    }

    /// Updates a single top-level flag by key.
    ///
    /// The new value is validated by deserializing the whole document back
    /// into `AppFlags`. Saves to disk after a successful update.
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;
        let map = json_value.as_object_mut().ok_or_else(|| {
            SettingsError::SerializationError("Settings did not serialize to an object".to_string())
        })?;

        match map.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                return Err(SettingsError::InvalidKey(format!(
                    "Key '{}' not found in settings",
                    key
                )));
            }
        }

        let new_settings: AppFlags = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.settings = new_settings;
        self.save()?;

        Ok(())
    }

    /// Resets all flags to defaults and saves to disk.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = AppFlags::default();
        self.save()?;
        Ok(())
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
