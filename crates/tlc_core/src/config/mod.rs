//! Configuration management for the track language corrector.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Validation on load with automatic defaults
//!
//! # Example
//!
//! ```no_run
//! use tlc_core::config::ConfigManager;
//!
//! // Create manager and load (or create default) config
//! let mut config = ConfigManager::new("settings.toml");
//! config.load_or_create().unwrap();
//!
//! // Override a setting for this run only
//! config.settings_mut().detection.required_match_pct = 80;
//! config.settings().validate().unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, DetectionSettings, LanguageSettings, LoggingSettings, NotifySettings,
    PathSettings, ScanSettings, Settings,
};
