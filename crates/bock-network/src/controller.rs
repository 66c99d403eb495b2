//! Network controller.
//!
//! The controller is the process-wide registry of networks. It resolves
//! drivers by network type, enforces unique network names, and hands out
//! [`Network`] handles.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use bock_common::{BockError, BockResult, IdGenerator, NetworkId, Options, RandomIdGenerator};
use parking_lot::Mutex;

use crate::config::ControllerConfig;
use crate::driver::{Driver, DriverTable};
use crate::network::Network;

/// Registered networks plus the names currently held by a create or delete
/// that is waiting on its driver.
#[derive(Default)]
pub(crate) struct NetworkTable {
    networks: HashMap<NetworkId, Network>,
    reserved: HashSet<String>,
}

impl NetworkTable {
    /// Claim `name` for a network about to be created.
    fn reserve(&mut self, name: &str) -> BockResult<()> {
        if self.reserved.contains(name) || self.networks.values().any(|n| n.name() == name) {
            return Err(BockError::NetworkName {
                name: name.to_string(),
            });
        }
        self.reserved.insert(name.to_string());
        Ok(())
    }

    pub(crate) fn release(&mut self, name: &str) {
        self.reserved.remove(name);
    }

    pub(crate) fn contains(&self, id: &NetworkId) -> bool {
        self.networks.contains_key(id)
    }

    pub(crate) fn insert(&mut self, network: Network) {
        self.networks.insert(network.network_id().clone(), network);
    }

    /// Unregister a network while keeping its name reserved until the driver
    /// has confirmed the deletion.
    pub(crate) fn remove_pending(&mut self, network: &Network) {
        self.networks.remove(network.network_id());
        self.reserved.insert(network.name().to_string());
    }
}

pub(crate) struct ControllerInner {
    pub(crate) networks: Mutex<NetworkTable>,
    drivers: DriverTable,
    id_generator: Arc<dyn IdGenerator>,
}

/// Handle to the network registry.
///
/// Cloning is cheap and every clone refers to the same registry.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

/// Releases a name reservation unless the network was registered.
struct NameReservation<'a> {
    inner: &'a ControllerInner,
    name: &'a str,
    committed: bool,
}

impl<'a> NameReservation<'a> {
    fn acquire(inner: &'a ControllerInner, name: &'a str) -> BockResult<Self> {
        inner.networks.lock().reserve(name)?;
        Ok(Self {
            inner,
            name,
            committed: false,
        })
    }

    fn commit(mut self, network: Network) {
        let mut table = self.inner.networks.lock();
        table.release(self.name);
        table.insert(network);
        self.committed = true;
    }
}

impl Drop for NameReservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.inner.networks.lock().release(self.name);
        }
    }
}

impl Controller {
    /// Create a controller managing the given drivers.
    pub fn new(drivers: impl IntoIterator<Item = Arc<dyn Driver>>) -> Self {
        Self::from_parts(drivers.into_iter().collect(), Arc::new(RandomIdGenerator))
    }

    /// Start building a controller.
    #[must_use]
    pub fn builder() -> ControllerBuilder {
        ControllerBuilder::default()
    }

    fn from_parts(drivers: DriverTable, id_generator: Arc<dyn IdGenerator>) -> Self {
        tracing::debug!(drivers = ?drivers, "Creating network controller");
        Self {
            inner: Arc::new(ControllerInner {
                networks: Mutex::new(NetworkTable::default()),
                drivers,
                id_generator,
            }),
        }
    }

    /// Network types this controller has drivers for, sorted.
    #[must_use]
    pub fn drivers(&self) -> Vec<String> {
        self.inner.drivers.types()
    }

    /// Apply options to the driver for `network_type`.
    ///
    /// # Errors
    ///
    /// Returns [`BockError::NetworkType`] if no driver handles the type, or
    /// whatever the driver reports.
    pub fn configure_network_driver(&self, network_type: &str, options: &Options) -> BockResult<()> {
        let driver = self
            .inner
            .drivers
            .get(network_type)
            .ok_or_else(|| BockError::NetworkType {
                network_type: network_type.to_string(),
            })?;

        tracing::debug!(network_type, options = options.len(), "Configuring network driver");
        driver.config(options)
    }

    /// Create a network of type `network_type` named `name`.
    ///
    /// The name stays reserved while the driver provisions the network, so
    /// two concurrent calls with the same name cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`BockError::InvalidNetworkDriver`] for an unknown type,
    /// [`BockError::NetworkName`] if the name is taken, or the driver's error.
    /// Nothing is registered on failure.
    pub fn new_network(
        &self,
        network_type: &str,
        name: &str,
        options: &Options,
    ) -> BockResult<Network> {
        let driver = self.inner.drivers.get(network_type).ok_or_else(|| {
            BockError::InvalidNetworkDriver {
                network_type: network_type.to_string(),
            }
        })?;

        let reservation = NameReservation::acquire(&self.inner, name)?;

        let id = NetworkId::generate(self.inner.id_generator.as_ref())?;
        let network = Network::new(
            Arc::downgrade(&self.inner),
            name,
            id,
            Arc::clone(driver),
            Arc::clone(&self.inner.id_generator),
        );

        tracing::debug!(network = %network.network_id(), name, network_type, "Creating network");
        driver.create_network(network.network_id(), options)?;

        reservation.commit(network.clone());
        tracing::info!(network = %network.network_id(), name, network_type, "Network created");
        Ok(network)
    }

    /// Snapshot of all registered networks, in no particular order.
    #[must_use]
    pub fn networks(&self) -> Vec<Network> {
        self.inner.networks.lock().networks.values().cloned().collect()
    }

    /// Call `walker` on each network of a snapshot until it returns `true`.
    ///
    /// Returns `true` if the walk was stopped by the walker.
    pub fn walk_networks(&self, mut walker: impl FnMut(&Network) -> bool) -> bool {
        self.networks().iter().any(|network| walker(network))
    }

    /// Find a network by name.
    #[must_use]
    pub fn network_by_name(&self, name: &str) -> Option<Network> {
        if name.is_empty() {
            return None;
        }

        let mut found = None;
        self.walk_networks(|current| {
            if current.name() == name {
                found = Some(current.clone());
                true
            } else {
                false
            }
        });
        found
    }

    /// Find a network by ID.
    #[must_use]
    pub fn network_by_id(&self, id: &str) -> Option<Network> {
        self.inner.networks.lock().networks.get(id).cloned()
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.inner.networks.lock();
        f.debug_struct("Controller")
            .field("drivers", &self.inner.drivers)
            .field("networks", &table.networks.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Controller`].
#[derive(Default)]
pub struct ControllerBuilder {
    drivers: DriverTable,
    id_generator: Option<Arc<dyn IdGenerator>>,
    config: ControllerConfig,
}

impl ControllerBuilder {
    /// Register a driver.
    #[must_use]
    pub fn driver(mut self, driver: Arc<dyn Driver>) -> Self {
        self.drivers.register(driver);
        self
    }

    /// Use a custom ID generator instead of [`RandomIdGenerator`].
    #[must_use]
    pub fn id_generator(mut self, generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = Some(generator);
        self
    }

    /// Driver options to apply when the controller is built.
    #[must_use]
    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the controller and configure its drivers.
    ///
    /// # Errors
    ///
    /// Returns [`BockError::NetworkType`] if the config names a driver that
    /// was not registered, or the error of a driver rejecting its options.
    pub fn build(self) -> BockResult<Controller> {
        let id_generator = self
            .id_generator
            .unwrap_or_else(|| Arc::new(RandomIdGenerator));
        let controller = Controller::from_parts(self.drivers, id_generator);

        for (network_type, options) in &self.config.drivers {
            controller.configure_network_driver(network_type, options)?;
        }

        Ok(controller)
    }
}
