//! Networks and their endpoint tables.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use bock_common::{BockError, BockResult, EndpointId, IdGenerator, NetworkId, Options};
use parking_lot::Mutex;

use crate::controller::ControllerInner;
use crate::driver::Driver;
use crate::endpoint::Endpoint;

pub(crate) struct NetworkInner {
    controller: Weak<ControllerInner>,
    name: String,
    pub(crate) id: NetworkId,
    pub(crate) driver: Arc<dyn Driver>,
    id_generator: Arc<dyn IdGenerator>,
    pub(crate) endpoints: Mutex<HashMap<EndpointId, Endpoint>>,
}

/// A logical connectivity zone managed by one driver.
///
/// Handles are cheap to clone. Two handles are equal when they refer to the
/// same network ID.
#[derive(Clone)]
pub struct Network {
    inner: Arc<NetworkInner>,
}

impl Network {
    pub(crate) fn new(
        controller: Weak<ControllerInner>,
        name: &str,
        id: NetworkId,
        driver: Arc<dyn Driver>,
        id_generator: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            inner: Arc::new(NetworkInner {
                controller,
                name: name.to_string(),
                id,
                driver,
                id_generator,
                endpoints: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Network name, chosen by the client.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Network ID, generated at creation.
    #[must_use]
    pub fn id(&self) -> &str {
        self.inner.id.as_str()
    }

    /// Typed network ID.
    #[must_use]
    pub fn network_id(&self) -> &NetworkId {
        &self.inner.id
    }

    /// Type of the network, as reported by its driver.
    #[must_use]
    pub fn network_type(&self) -> &str {
        self.inner.driver.network_type()
    }

    fn unknown(&self) -> BockError {
        BockError::UnknownNetwork {
            name: self.inner.name.clone(),
            id: self.inner.id.to_string(),
        }
    }

    /// Create an endpoint attaching the sandbox `sandbox_key` to this network.
    ///
    /// # Errors
    ///
    /// Returns the driver's error, in which case no endpoint is registered.
    pub fn create_endpoint(
        &self,
        name: &str,
        sandbox_key: &str,
        options: &Options,
    ) -> BockResult<Endpoint> {
        let id = EndpointId::generate(self.inner.id_generator.as_ref())?;

        tracing::debug!(
            network = %self.inner.id,
            endpoint = %id,
            name,
            sandbox_key,
            "Creating endpoint"
        );
        let sandbox_info =
            self.inner
                .driver
                .create_endpoint(&self.inner.id, &id, sandbox_key, options)?;

        let endpoint = Endpoint::new(
            Arc::downgrade(&self.inner),
            name,
            id,
            &self.inner.name,
            sandbox_key,
            sandbox_info,
        );
        self.inner
            .endpoints
            .lock()
            .insert(endpoint.endpoint_id().clone(), endpoint.clone());

        tracing::info!(network = %self.inner.id, endpoint = %endpoint.endpoint_id(), name, "Endpoint created");
        Ok(endpoint)
    }

    /// Delete the network.
    ///
    /// The network is unregistered before its driver is asked to delete it.
    /// If the driver fails, the network is registered again and the driver's
    /// error returned, so the caller can retry.
    ///
    /// Until the driver answers, the network is absent from lookups but its
    /// name stays reserved: creating another network with the same name fails
    /// with [`BockError::NetworkName`].
    ///
    /// # Errors
    ///
    /// Returns [`BockError::UnknownNetwork`] if the network is no longer
    /// registered, [`BockError::ActiveEndpoints`] if it still has endpoints,
    /// or the driver's error.
    pub fn delete(&self) -> BockResult<()> {
        let controller = self.inner.controller.upgrade().ok_or_else(|| self.unknown())?;

        {
            let mut table = controller.networks.lock();
            if !table.contains(&self.inner.id) {
                return Err(self.unknown());
            }

            // Lock order is always controller, then network.
            if !self.inner.endpoints.lock().is_empty() {
                return Err(BockError::ActiveEndpoints {
                    name: self.inner.name.clone(),
                    id: self.inner.id.to_string(),
                });
            }

            table.remove_pending(self);
        }

        tracing::debug!(network = %self.inner.id, name = %self.inner.name, "Deleting network");
        let result = self.inner.driver.delete_network(&self.inner.id);

        let mut table = controller.networks.lock();
        table.release(&self.inner.name);
        match result {
            Ok(()) => {
                tracing::info!(network = %self.inner.id, name = %self.inner.name, "Network deleted");
                Ok(())
            }
            Err(err) => {
                table.insert(self.clone());
                tracing::warn!(
                    network = %self.inner.id,
                    name = %self.inner.name,
                    error = %err,
                    "Driver failed to delete network, restored registration"
                );
                Err(err)
            }
        }
    }

    /// Snapshot of the endpoints of this network, in no particular order.
    #[must_use]
    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.inner.endpoints.lock().values().cloned().collect()
    }

    /// Call `walker` on each endpoint of a snapshot until it returns `true`.
    ///
    /// Returns `true` if the walk was stopped by the walker.
    pub fn walk_endpoints(&self, mut walker: impl FnMut(&Endpoint) -> bool) -> bool {
        self.endpoints().iter().any(|endpoint| walker(endpoint))
    }

    /// Find an endpoint by name.
    #[must_use]
    pub fn endpoint_by_name(&self, name: &str) -> Option<Endpoint> {
        if name.is_empty() {
            return None;
        }

        let mut found = None;
        self.walk_endpoints(|current| {
            if current.name() == name {
                found = Some(current.clone());
                true
            } else {
                false
            }
        });
        found
    }

    /// Find an endpoint by ID.
    #[must_use]
    pub fn endpoint_by_id(&self, id: &str) -> Option<Endpoint> {
        self.inner.endpoints.lock().get(id).cloned()
    }
}

impl PartialEq for Network {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Network {}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("id", &self.inner.id.short())
            .field("name", &self.inner.name)
            .field("type", &self.network_type())
            .finish_non_exhaustive()
    }
}
