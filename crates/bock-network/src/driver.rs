//! Network driver contract.
//!
//! A driver does the actual plumbing for one network type (bridge, overlay,
//! host, ...). The registry only calls through this trait and never looks at
//! the errors a driver returns beyond handing them back to the caller.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bock_common::{BockResult, EndpointId, NetworkId, Options};

use crate::sandbox::SandboxInfo;

/// Backend implementing network and endpoint provisioning for one network type.
///
/// One instance is shared by every network of its type, so implementations
/// must be safe to call concurrently. The registry never holds one of its own
/// locks while calling a driver.
pub trait Driver: Send + Sync + fmt::Debug {
    /// Apply backend-wide configuration.
    ///
    /// Usually called once before the first network of this type is created.
    /// Whether repeated calls are allowed is up to the driver.
    fn config(&self, options: &Options) -> BockResult<()>;

    /// Network type handled by this driver; also its registration key.
    fn network_type(&self) -> &str;

    /// Provision backend state for a new network.
    ///
    /// The registry does not retry on failure and does not register the
    /// network.
    fn create_network(&self, network_id: &NetworkId, options: &Options) -> BockResult<()>;

    /// Release the backend state of a network.
    ///
    /// On failure the registry registers the network again so the caller can
    /// retry.
    fn delete_network(&self, network_id: &NetworkId) -> BockResult<()>;

    /// Attach the sandbox identified by `sandbox_key` to a network.
    ///
    /// Returns the connectivity details installed in the sandbox, if any.
    fn create_endpoint(
        &self,
        network_id: &NetworkId,
        endpoint_id: &EndpointId,
        sandbox_key: &str,
        options: &Options,
    ) -> BockResult<Option<SandboxInfo>>;

    /// Detach an endpoint.
    ///
    /// On failure the registry registers the endpoint again.
    fn delete_endpoint(&self, network_id: &NetworkId, endpoint_id: &EndpointId) -> BockResult<()>;
}

/// Drivers available to a controller, keyed by network type.
#[derive(Clone, Default)]
pub struct DriverTable {
    drivers: HashMap<String, Arc<dyn Driver>>,
}

impl DriverTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a driver under its own network type.
    ///
    /// A driver registered for a type that already has one replaces it.
    pub fn register(&mut self, driver: Arc<dyn Driver>) {
        let network_type = driver.network_type().to_string();
        if self.drivers.insert(network_type.clone(), driver).is_some() {
            tracing::warn!(network_type = %network_type, "Replacing registered network driver");
        } else {
            tracing::debug!(network_type = %network_type, "Network driver registered");
        }
    }

    /// Look up the driver for a network type.
    #[must_use]
    pub fn get(&self, network_type: &str) -> Option<&Arc<dyn Driver>> {
        self.drivers.get(network_type)
    }

    /// Registered network types, sorted.
    #[must_use]
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.drivers.keys().cloned().collect();
        types.sort();
        types
    }

    /// Number of registered drivers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    /// Whether no driver is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

impl FromIterator<Arc<dyn Driver>> for DriverTable {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Driver>>>(iter: I) -> Self {
        let mut table = Self::new();
        for driver in iter {
            table.register(driver);
        }
        table
    }
}

impl fmt::Debug for DriverTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.types()).finish()
    }
}
