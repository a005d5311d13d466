//! Settings management

use canopy_asset::{DefDatabase, ThingClass};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Label of the settings category when there is anything to configure.
pub const SETTINGS_CATEGORY: &str = "Transparent Things";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persisted user toggles. Every field defaults to `true` when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransparencySettings {
    pub enable_tree_transparency: bool,
    pub enable_roof_transparency: bool,
    pub make_roofs_selectable: bool,
}

impl Default for TransparencySettings {
    fn default() -> Self {
        Self {
            enable_tree_transparency: true,
            enable_roof_transparency: true,
            make_roofs_selectable: true,
        }
    }
}

/// A toggle shown in the settings window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingOption {
    EnableTreeTransparency,
    EnableRoofTransparency,
    MakeRoofsSelectable,
}

impl SettingOption {
    pub fn label(self) -> &'static str {
        match self {
            SettingOption::EnableTreeTransparency => "Enable tree transparency",
            SettingOption::EnableRoofTransparency => "Enable roof transparency",
            SettingOption::MakeRoofsSelectable => "Make roofs selectable",
        }
    }
}

impl TransparencySettings {
    /// Load settings, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, text).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Whether objects of `class` may become transparent under these settings.
    pub fn allows(&self, class: ThingClass) -> bool {
        match class {
            ThingClass::Plant => self.enable_tree_transparency,
            ThingClass::RoofSetter => self.enable_roof_transparency,
            ThingClass::Pawn | ThingClass::Other => false,
        }
    }

    /// Toggles the settings window shows for the loaded definitions.
    pub fn visible_options(defs: &DefDatabase) -> Vec<SettingOption> {
        let mut options = Vec::new();
        if defs.has_transparent_trees() {
            options.push(SettingOption::EnableTreeTransparency);
        }
        if defs.has_transparent_roofs() {
            options.push(SettingOption::EnableRoofTransparency);
            options.push(SettingOption::MakeRoofsSelectable);
        }
        options
    }

    pub fn get(&self, option: SettingOption) -> bool {
        match option {
            SettingOption::EnableTreeTransparency => self.enable_tree_transparency,
            SettingOption::EnableRoofTransparency => self.enable_roof_transparency,
            SettingOption::MakeRoofsSelectable => self.make_roofs_selectable,
        }
    }

    pub fn set(&mut self, option: SettingOption, value: bool) {
        match option {
            SettingOption::EnableTreeTransparency => self.enable_tree_transparency = value,
            SettingOption::EnableRoofTransparency => self.enable_roof_transparency = value,
            SettingOption::MakeRoofsSelectable => self.make_roofs_selectable = value,
        }
    }
}

/// Settings category label; empty when no definition can become transparent.
pub fn settings_category_label(defs: &DefDatabase) -> &'static str {
    if defs.has_transparent_trees() || defs.has_transparent_roofs() {
        SETTINGS_CATEGORY
    } else {
        ""
    }
}
