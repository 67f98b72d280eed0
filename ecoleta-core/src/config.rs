//! Runtime configuration: defaults, TOML file, environment overrides.

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::{Deserialize, Serialize};

use crate::map::MAX_ZOOM;
use crate::model::Coordinate;

/// Environment variable overriding [`EcoletaConfig::backend_url`].
pub const ENV_BACKEND_URL: &str = "ECOLETA_BACKEND_URL";
/// Environment variable overriding [`EcoletaConfig::geography_url`].
pub const ENV_GEOGRAPHY_URL: &str = "ECOLETA_GEOGRAPHY_URL";
/// Environment variable overriding [`EcoletaConfig::log_level`].
pub const ENV_LOG_LEVEL: &str = "ECOLETA_LOG_LEVEL";

#[derive(thiserror::Error, Debug)]
/// Errors raised while loading configuration.
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Cannot read {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The configuration file is not valid TOML for this schema.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
/// Where the operator's current position comes from.
pub enum LocationConfig {
    /// Look the position up from the public IP address.
    Ip {
        /// Geolocation endpoint.
        url: String,
    },
    /// Always use the same coordinate.
    Fixed {
        /// Latitude in decimal degrees.
        latitude: f64,
        /// Longitude in decimal degrees.
        longitude: f64,
    },
}

impl Default for LocationConfig {
    fn default() -> Self {
        LocationConfig::Ip {
            url: "http://ip-api.com/json/".to_owned(),
        }
    }
}

impl LocationConfig {
    /// Coordinate of a fixed source.
    #[must_use]
    pub fn fixed_position(&self) -> Option<Coordinate> {
        match self {
            LocationConfig::Ip { .. } => None,
            LocationConfig::Fixed {
                latitude,
                longitude,
            } => Some(Coordinate::new(*latitude, *longitude)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Settings of the Ecoleta client.
pub struct EcoletaConfig {
    /// Base URL of the collection point backend.
    pub backend_url: String,
    /// Base URL of the IBGE `localidades` API.
    pub geography_url: String,
    /// Zoom level of the map.
    pub map_zoom: u8,
    /// Per-request timeout.
    pub request_timeout_secs: u64,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,
    /// File receiving log output.
    pub log_file: PathBuf,
    /// Source of the initial map center.
    pub location: LocationConfig,
}

impl Default for EcoletaConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:3333".to_owned(),
            geography_url: "https://servicodados.ibge.gov.br/api/v1/localidades".to_owned(),
            map_zoom: 15,
            request_timeout_secs: 15,
            user_agent: "ecoleta/0.1".to_owned(),
            log_level: "info".to_owned(),
            log_file: PathBuf::from("ecoleta.log"),
            location: LocationConfig::default(),
        }
    }
}

impl EcoletaConfig {
    /// Resolve configuration from defaults, an optional TOML file, and the environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file cannot be read or parsed, or a
    /// resolved value is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Overwrite values from `ECOLETA_*` environment variables that are set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var(ENV_BACKEND_URL) {
            self.backend_url = url;
        }
        if let Ok(url) = env::var(ENV_GEOGRAPHY_URL) {
            self.geography_url = url;
        }
        if let Ok(level) = env::var(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("backend_url", &self.backend_url)?;
        check_url("geography_url", &self.geography_url)?;
        if let LocationConfig::Ip { url } = &self.location {
            check_url("location.url", url)?;
        }
        if self.map_zoom > MAX_ZOOM {
            return Err(ConfigError::Invalid(format!(
                "map_zoom must be at most {MAX_ZOOM}, got {}",
                self.map_zoom
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }
}

fn check_url(name: &str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must be an http(s) URL, got {url:?}"
        )))
    }
}
