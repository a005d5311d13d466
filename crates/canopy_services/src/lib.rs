//! Canopy Services Layer
//!
//! User-facing persisted settings and the settings-window model.

pub mod settings;

pub use settings::{settings_category_label, SettingOption, SettingsError, TransparencySettings};
