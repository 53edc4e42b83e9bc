//! Configuration file handling.
//!
//! Settings live in an INI file under the platform config directory
//! (`~/.config/wayfinder/config.ini` on Linux). [`ConfigFile`] holds the
//! typed sections, [`ConfigKey`] enumerates every `section.key` pair for
//! the `config get`/`set`/`list` commands, and [`config_file_path`]
//! resolves the on-disk location.
//!
//! Missing files and missing keys fall back to defaults; frontends load
//! with `ConfigFile::load().unwrap_or_default()`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::acquisition::{
    AcquisitionConfig, DEFAULT_GRACE_PERIOD_MS, PLACEHOLDER_LATITUDE, PLACEHOLDER_LONGITUDE,
};
use crate::capability::WatchOptions;
use crate::location::Coordinate;
use crate::maplink::{validate_base_url, MapLinkBuilder, DEFAULT_MAP_BASE_URL};

/// Name of the application subdirectory under the config directory.
const CONFIG_DIR_NAME: &str = "wayfinder";

/// Name of the configuration file.
const CONFIG_FILE_NAME: &str = "config.ini";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or parsed.
    #[error("failed to read config file: {0}")]
    Load(#[from] ini::Error),

    /// The file could not be written.
    #[error("failed to write config file: {0}")]
    Io(#[from] std::io::Error),

    /// A key holds a value that does not parse as its expected type.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// A `section.key` name that no known key matches.
    #[error("unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Path to the configuration file.
///
/// Falls back to the current directory when no platform config directory
/// is available.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

// =============================================================================
// Sections
// =============================================================================

/// `[acquisition]` section.
#[derive(Clone, Debug, PartialEq)]
pub struct AcquisitionSection {
    /// Milliseconds to wait for a first heading before falling back to
    /// the simulated pointer source.
    pub grace_period_ms: u64,
}

impl Default for AcquisitionSection {
    fn default() -> Self {
        Self {
            grace_period_ms: DEFAULT_GRACE_PERIOD_MS,
        }
    }
}

/// `[location]` section.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationSection {
    /// Request the most accurate position the platform offers.
    pub high_accuracy: bool,

    /// Per-reading timeout in milliseconds.
    pub timeout_ms: u64,

    /// Oldest acceptable cached reading in milliseconds.
    pub maximum_age_ms: u64,

    /// Latitude seeded when no real fix is available in simulated mode.
    pub placeholder_latitude: f64,

    /// Longitude seeded when no real fix is available in simulated mode.
    pub placeholder_longitude: f64,
}

impl Default for LocationSection {
    fn default() -> Self {
        let options = WatchOptions::default();
        Self {
            high_accuracy: options.high_accuracy,
            timeout_ms: options.timeout.as_millis() as u64,
            maximum_age_ms: options.maximum_age.as_millis() as u64,
            placeholder_latitude: PLACEHOLDER_LATITUDE,
            placeholder_longitude: PLACEHOLDER_LONGITUDE,
        }
    }
}

/// `[map]` section.
#[derive(Clone, Debug, PartialEq)]
pub struct MapSection {
    /// Base URL for map links.
    pub base_url: String,
}

impl Default for MapSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MAP_BASE_URL.to_string(),
        }
    }
}

// =============================================================================
// ConfigFile
// =============================================================================

/// The parsed configuration file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigFile {
    /// Acquisition settings.
    pub acquisition: AcquisitionSection,

    /// Location watch settings.
    pub location: LocationSection,

    /// Map link settings.
    pub map: MapSection,
}

impl ConfigFile {
    /// Load from the default path.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing, unreadable, or holds a value that
    /// does not parse. Callers that want defaults in those cases use
    /// `ConfigFile::load().unwrap_or_default()`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path)?;
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("acquisition")) {
            if let Some(value) = section.get("grace_period_ms") {
                config.acquisition.grace_period_ms =
                    parse_value(ConfigKey::GracePeriodMs, value)?;
            }
        }

        if let Some(section) = ini.section(Some("location")) {
            if let Some(value) = section.get("high_accuracy") {
                config.location.high_accuracy = parse_value(ConfigKey::HighAccuracy, value)?;
            }
            if let Some(value) = section.get("timeout_ms") {
                config.location.timeout_ms = parse_value(ConfigKey::TimeoutMs, value)?;
            }
            if let Some(value) = section.get("maximum_age_ms") {
                config.location.maximum_age_ms = parse_value(ConfigKey::MaximumAgeMs, value)?;
            }
            if let Some(value) = section.get("placeholder_latitude") {
                config.location.placeholder_latitude =
                    parse_value(ConfigKey::PlaceholderLatitude, value)?;
            }
            if let Some(value) = section.get("placeholder_longitude") {
                config.location.placeholder_longitude =
                    parse_value(ConfigKey::PlaceholderLongitude, value)?;
            }
        }

        if let Some(section) = ini.section(Some("map")) {
            if let Some(value) = section.get("base_url") {
                config.map.base_url = value.to_string();
            }
        }

        Ok(config)
    }

    /// Save to the default path, creating parent directories as needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some("acquisition"))
            .set("grace_period_ms", self.acquisition.grace_period_ms.to_string());
        ini.with_section(Some("location"))
            .set("high_accuracy", self.location.high_accuracy.to_string())
            .set("timeout_ms", self.location.timeout_ms.to_string())
            .set("maximum_age_ms", self.location.maximum_age_ms.to_string())
            .set(
                "placeholder_latitude",
                self.location.placeholder_latitude.to_string(),
            )
            .set(
                "placeholder_longitude",
                self.location.placeholder_longitude.to_string(),
            );
        ini.with_section(Some("map"))
            .set("base_url", self.map.base_url.clone());

        ini.write_to_file(path)?;
        Ok(())
    }

    /// Build an [`AcquisitionConfig`] from these settings.
    pub fn acquisition_config(&self) -> AcquisitionConfig {
        AcquisitionConfig::default()
            .with_grace_period(Duration::from_millis(self.acquisition.grace_period_ms))
            .with_watch_options(WatchOptions {
                high_accuracy: self.location.high_accuracy,
                timeout: Duration::from_millis(self.location.timeout_ms),
                maximum_age: Duration::from_millis(self.location.maximum_age_ms),
            })
            .with_placeholder_fix(Coordinate::new(
                self.location.placeholder_latitude,
                self.location.placeholder_longitude,
            ))
    }

    /// Build a [`MapLinkBuilder`] from the configured base URL.
    ///
    /// # Errors
    ///
    /// Fails when the configured base URL is not usable.
    pub fn map_link_builder(&self) -> Result<MapLinkBuilder, ConfigError> {
        validate_base_url(&self.map.base_url).map_err(|e| ConfigError::InvalidValue {
            key: ConfigKey::MapBaseUrl.name().to_string(),
            value: self.map.base_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(MapLinkBuilder::with_base_url(&self.map.base_url))
    }
}

fn parse_value<T: FromStr>(key: ConfigKey, value: &str) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.name().to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

// =============================================================================
// ConfigKey
// =============================================================================

/// Every settable configuration key, as `section.key` pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigKey {
    /// `acquisition.grace_period_ms`
    GracePeriodMs,
    /// `location.high_accuracy`
    HighAccuracy,
    /// `location.timeout_ms`
    TimeoutMs,
    /// `location.maximum_age_ms`
    MaximumAgeMs,
    /// `location.placeholder_latitude`
    PlaceholderLatitude,
    /// `location.placeholder_longitude`
    PlaceholderLongitude,
    /// `map.base_url`
    MapBaseUrl,
}

impl ConfigKey {
    /// All keys, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::GracePeriodMs,
            ConfigKey::HighAccuracy,
            ConfigKey::TimeoutMs,
            ConfigKey::MaximumAgeMs,
            ConfigKey::PlaceholderLatitude,
            ConfigKey::PlaceholderLongitude,
            ConfigKey::MapBaseUrl,
        ]
    }

    /// The INI section this key lives in.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::GracePeriodMs => "acquisition",
            ConfigKey::HighAccuracy
            | ConfigKey::TimeoutMs
            | ConfigKey::MaximumAgeMs
            | ConfigKey::PlaceholderLatitude
            | ConfigKey::PlaceholderLongitude => "location",
            ConfigKey::MapBaseUrl => "map",
        }
    }

    /// The key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::GracePeriodMs => "grace_period_ms",
            ConfigKey::HighAccuracy => "high_accuracy",
            ConfigKey::TimeoutMs => "timeout_ms",
            ConfigKey::MaximumAgeMs => "maximum_age_ms",
            ConfigKey::PlaceholderLatitude => "placeholder_latitude",
            ConfigKey::PlaceholderLongitude => "placeholder_longitude",
            ConfigKey::MapBaseUrl => "base_url",
        }
    }

    /// The full `section.key` name.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::GracePeriodMs => "acquisition.grace_period_ms",
            ConfigKey::HighAccuracy => "location.high_accuracy",
            ConfigKey::TimeoutMs => "location.timeout_ms",
            ConfigKey::MaximumAgeMs => "location.maximum_age_ms",
            ConfigKey::PlaceholderLatitude => "location.placeholder_latitude",
            ConfigKey::PlaceholderLongitude => "location.placeholder_longitude",
            ConfigKey::MapBaseUrl => "map.base_url",
        }
    }

    /// Read this key's current value as a display string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::GracePeriodMs => config.acquisition.grace_period_ms.to_string(),
            ConfigKey::HighAccuracy => config.location.high_accuracy.to_string(),
            ConfigKey::TimeoutMs => config.location.timeout_ms.to_string(),
            ConfigKey::MaximumAgeMs => config.location.maximum_age_ms.to_string(),
            ConfigKey::PlaceholderLatitude => config.location.placeholder_latitude.to_string(),
            ConfigKey::PlaceholderLongitude => config.location.placeholder_longitude.to_string(),
            ConfigKey::MapBaseUrl => config.map.base_url.clone(),
        }
    }

    /// Parse and store a new value for this key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the value does not parse
    /// as the key's type, or fails URL validation for `map.base_url`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        match self {
            ConfigKey::GracePeriodMs => {
                config.acquisition.grace_period_ms = parse_value(*self, value)?;
            }
            ConfigKey::HighAccuracy => {
                config.location.high_accuracy = parse_value(*self, value)?;
            }
            ConfigKey::TimeoutMs => {
                config.location.timeout_ms = parse_value(*self, value)?;
            }
            ConfigKey::MaximumAgeMs => {
                config.location.maximum_age_ms = parse_value(*self, value)?;
            }
            ConfigKey::PlaceholderLatitude => {
                config.location.placeholder_latitude = parse_value(*self, value)?;
            }
            ConfigKey::PlaceholderLongitude => {
                config.location.placeholder_longitude = parse_value(*self, value)?;
            }
            ConfigKey::MapBaseUrl => {
                validate_base_url(value).map_err(|e| ConfigError::InvalidValue {
                    key: self.name().to_string(),
                    value: value.to_string(),
                    reason: e.to_string(),
                })?;
                config.map.base_url = value.to_string();
            }
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .find(|key| key.name() == s)
            .copied()
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
