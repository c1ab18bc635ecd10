// KeyCommands Settings Module
// User-configurable overrides for the key command service

use std::path::{Path, PathBuf};

use crate::ReplacePolicy;

/// Settings for the key command service
///
/// These settings are loaded from a TOML file
/// (default: ~/.config/keycommands/settings.toml):
///
/// ```toml
/// [keyboard]
/// enabled = true
///
/// [registry]
/// replace_policy = "move_to_end"
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Forces keyboard support on or off instead of asking the host
    keyboard_override: Option<bool>,

    /// Where a re-registered shortcut ends up in the reported order
    replace_policy: ReplacePolicy,

    /// Path to the settings file (for reload)
    source_path: Option<PathBuf>,
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),
}

/// TOML representation for deserializing settings
#[cfg(feature = "settings")]
#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SettingsToml {
    #[serde(default)]
    keyboard: Option<KeyboardSettings>,

    #[serde(default)]
    registry: Option<RegistrySettings>,
}

#[cfg(feature = "settings")]
#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct KeyboardSettings {
    #[serde(default)]
    enabled: Option<bool>,
}

#[cfg(feature = "settings")]
#[derive(Debug, Clone, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RegistrySettings {
    #[serde(default)]
    replace_policy: Option<ReplacePolicy>,
}

impl Settings {
    /// Create settings with every value at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Get keyboard support override
    pub fn keyboard_override(&self) -> Option<bool> {
        self.keyboard_override
    }

    /// Force keyboard support on or off
    pub fn set_keyboard_override(&mut self, enabled: Option<bool>) {
        self.keyboard_override = enabled;
    }

    pub fn replace_policy(&self) -> ReplacePolicy {
        self.replace_policy
    }

    pub fn set_replace_policy(&mut self, policy: ReplacePolicy) {
        self.replace_policy = policy;
    }

    /// Path the settings were loaded from, if any
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}

#[cfg(feature = "settings")]
impl Settings {
    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Load settings from TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let toml_settings: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::new();

        if let Some(keyboard) = toml_settings.keyboard {
            settings.keyboard_override = keyboard.enabled;
        }

        if let Some(policy) = toml_settings.registry.and_then(|r| r.replace_policy) {
            settings.replace_policy = policy;
        }

        Ok(settings)
    }

    /// Get the default settings path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("keycommands").join("settings.toml"))
    }

    /// Load from default location (~/.config/keycommands/settings.toml)
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        // Return default settings if file doesn't exist
        Ok(Self::new())
    }

    /// Reload settings from the original file
    pub fn reload(&mut self) -> Result<(), SettingsError> {
        match self.source_path.clone() {
            Some(path) => {
                *self = Self::from_file(path)?;
                Ok(())
            }
            None => Err(SettingsError::InvalidValue("No source path set".to_string())),
        }
    }
}

#[cfg(all(test, feature = "settings"))]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::new());
        assert_eq!(settings.keyboard_override(), None);
        assert_eq!(settings.replace_policy(), ReplacePolicy::MoveToEnd);
    }

    #[test]
    fn test_parse_full_settings() {
        let toml = r#"
[keyboard]
enabled = false

[registry]
replace_policy = "in_place"
"#;
        let settings = Settings::from_toml(toml).unwrap();
        assert_eq!(settings.keyboard_override(), Some(false));
        assert_eq!(settings.replace_policy(), ReplacePolicy::InPlace);
    }

    #[test]
    fn test_unknown_policy_is_error() {
        let toml = r#"
[registry]
replace_policy = "sideways"
"#;
        assert!(matches!(
            Settings::from_toml(toml),
            Err(SettingsError::TomlParse(_))
        ));
    }

    #[test]
    fn test_misspelled_registry_key_is_error() {
        let toml = r#"
[registry]
replace_polcy = "in_place"
"#;
        assert!(matches!(
            Settings::from_toml(toml),
            Err(SettingsError::TomlParse(_))
        ));
    }

    #[test]
    fn test_misspelled_keyboard_key_is_error() {
        let toml = r#"
[keyboard]
enable = false
"#;
        assert!(matches!(
            Settings::from_toml(toml),
            Err(SettingsError::TomlParse(_))
        ));
    }

    #[test]
    fn test_misspelled_table_is_error() {
        assert!(Settings::from_toml("[keybaord]\nenabled = false\n").is_err());
    }

    #[test]
    fn test_reload_without_source_path() {
        let mut settings = Settings::new();
        assert!(matches!(
            settings.reload(),
            Err(SettingsError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_from_file_and_reload() {
        let path = std::env::temp_dir().join(format!(
            "keycommands-settings-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[keyboard]\nenabled = true\n").unwrap();

        let mut settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.keyboard_override(), Some(true));
        assert_eq!(settings.source_path(), Some(path.as_path()));

        std::fs::write(&path, "[keyboard]\nenabled = false\n").unwrap();
        settings.reload().unwrap();
        assert_eq!(settings.keyboard_override(), Some(false));

        std::fs::remove_file(&path).unwrap();
    }
}
