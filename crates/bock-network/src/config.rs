//! Controller configuration.
//!
//! Driver options can be supplied in a TOML file, one table per network type:
//!
//! ```toml
//! [drivers.bridge]
//! mtu = 1500
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bock_common::{BockError, BockResult, Options};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Default location of the controller configuration file.
pub static BOCK_NETWORK_CONFIG: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("BOCK_NETWORK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/etc/bock/network.toml"))
});

/// Configuration applied when a controller is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    /// Options passed to each driver's `config`, keyed by network type.
    #[serde(default)]
    pub drivers: BTreeMap<String, Options>,
}

impl ControllerConfig {
    /// Parse a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`BockError::Config`] if the TOML is malformed or contains
    /// unknown keys.
    pub fn from_toml_str(s: &str) -> BockResult<Self> {
        toml::from_str(s).map_err(|e| BockError::Config {
            message: format!("invalid network config: {e}"),
        })
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`BockError::Io`] if the file cannot be read, or
    /// [`BockError::Config`] naming the file if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> BockResult<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading network config");
        let content = std::fs::read_to_string(path)?;
        Self::parse_file(path, &content)
    }

    /// Load the file named by `BOCK_NETWORK_CONFIG`, or the default config
    /// if that file does not exist.
    ///
    /// # Errors
    ///
    /// Same as [`ControllerConfig::load`], except that a missing file is not
    /// an error.
    pub fn load_default() -> BockResult<Self> {
        Self::load_or_default(BOCK_NETWORK_CONFIG.as_path())
    }

    fn load_or_default(path: &Path) -> BockResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "Loading network config");
                Self::parse_file(path, &content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No network config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn parse_file(path: &Path, content: &str) -> BockResult<Self> {
        Self::from_toml_str(content).map_err(|e| match e {
            BockError::Config { message } => BockError::Config {
                message: format!("{}: {message}", path.display()),
            },
            other => other,
        })
    }

    /// Set the options for one driver.
    #[must_use]
    pub fn with_driver_options(mut self, network_type: impl Into<String>, options: Options) -> Self {
        self.drivers.insert(network_type.into(), options);
        self
    }
}
