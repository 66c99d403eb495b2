//! Common error types for the Bock network control plane.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using [`BockError`].
pub type BockResult<T> = Result<T, BockError>;

/// Errors reported by the network registry and its drivers.
#[derive(Error, Diagnostic, Debug)]
pub enum BockError {
    /// No driver is registered for the network type being configured.
    #[error("Unknown driver: {network_type}")]
    #[diagnostic(
        code(bock::network::unknown_driver),
        help("Register a driver for this network type before configuring it")
    )]
    NetworkType {
        /// The requested network type.
        network_type: String,
    },

    /// No driver is registered for the network type being created.
    #[error("Invalid driver bound to network: {network_type}")]
    #[diagnostic(
        code(bock::network::invalid_driver),
        help("Check the network type against the registered drivers")
    )]
    InvalidNetworkDriver {
        /// The requested network type.
        network_type: String,
    },

    /// A network with the same name already exists.
    #[error("Network with name {name} already exists")]
    #[diagnostic(code(bock::network::duplicate_name))]
    NetworkName {
        /// The conflicting name.
        name: String,
    },

    /// The network is no longer registered with the controller.
    #[error("Unknown network {name} id {id}")]
    #[diagnostic(code(bock::network::unknown))]
    UnknownNetwork {
        /// Network name.
        name: String,
        /// Network ID.
        id: String,
    },

    /// The endpoint is no longer registered with its network.
    #[error("Unknown endpoint {name} id {id}")]
    #[diagnostic(code(bock::endpoint::unknown))]
    UnknownEndpoint {
        /// Endpoint name.
        name: String,
        /// Endpoint ID.
        id: String,
    },

    /// The network still has endpoints attached.
    #[error("Network {name} has active endpoints (id {id})")]
    #[diagnostic(
        code(bock::network::active_endpoints),
        help("Delete every endpoint of the network before deleting the network")
    )]
    ActiveEndpoints {
        /// Network name.
        name: String,
        /// Network ID.
        id: String,
    },

    /// A driver failed to carry out a backend operation.
    #[error("Driver {driver} failed: {message}")]
    #[diagnostic(code(bock::driver))]
    Driver {
        /// Type name of the failing driver.
        driver: String,
        /// The error message.
        message: String,
    },

    /// Invalid identifier format.
    #[error("Invalid ID: {id}")]
    #[diagnostic(
        code(bock::invalid_id),
        help("IDs must be alphanumeric with hyphens and underscores, 1-64 characters")
    )]
    InvalidId {
        /// The invalid ID.
        id: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    #[diagnostic(code(bock::io))]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    #[diagnostic(code(bock::serialization))]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(bock::config))]
    Config {
        /// The error message.
        message: String,
    },
}

impl BockError {
    /// Build a [`BockError::Driver`] for the given driver type.
    pub fn driver(driver: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Driver {
            driver: driver.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for BockError {
    fn from(err: serde_json::Error) -> Self {
        BockError::Serialization(err.to_string())
    }
}
