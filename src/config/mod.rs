//! Configuration module for indico-store
//!
//! Handles loading and managing application settings from TOML files.

mod settings;

pub use settings::{GeneralSettings, MaintenanceSettings, Settings, StorageSettings};
