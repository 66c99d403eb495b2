//! Endpoints attach a sandbox to a network.

use std::fmt;
use std::sync::{Arc, Weak};

use bock_common::{BockError, BockResult, EndpointId};

use crate::network::NetworkInner;
use crate::sandbox::SandboxInfo;

struct EndpointInner {
    name: String,
    id: EndpointId,
    network: Weak<NetworkInner>,
    network_name: String,
    sandbox_key: String,
    sandbox_info: Option<SandboxInfo>,
}

/// The attachment of one sandbox to one network.
#[derive(Clone)]
pub struct Endpoint {
    inner: Arc<EndpointInner>,
}

impl Endpoint {
    pub(crate) fn new(
        network: Weak<NetworkInner>,
        name: &str,
        id: EndpointId,
        network_name: &str,
        sandbox_key: &str,
        sandbox_info: Option<SandboxInfo>,
    ) -> Self {
        Self {
            inner: Arc::new(EndpointInner {
                name: name.to_string(),
                id,
                network,
                network_name: network_name.to_string(),
                sandbox_key: sandbox_key.to_string(),
                sandbox_info,
            }),
        }
    }

    /// Endpoint ID, generated at creation.
    #[must_use]
    pub fn id(&self) -> &str {
        self.inner.id.as_str()
    }

    /// Typed endpoint ID.
    #[must_use]
    pub fn endpoint_id(&self) -> &EndpointId {
        &self.inner.id
    }

    /// Endpoint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Name of the network this endpoint belongs to.
    #[must_use]
    pub fn network(&self) -> &str {
        &self.inner.network_name
    }

    /// Key of the sandbox this endpoint was attached to.
    #[must_use]
    pub fn sandbox_key(&self) -> &str {
        &self.inner.sandbox_key
    }

    /// Copy of the connectivity snapshot installed by the driver.
    #[must_use]
    pub fn sandbox_info(&self) -> Option<SandboxInfo> {
        self.inner.sandbox_info.clone()
    }

    fn unknown(&self) -> BockError {
        BockError::UnknownEndpoint {
            name: self.inner.name.clone(),
            id: self.inner.id.to_string(),
        }
    }

    /// Delete the endpoint and detach it from its network.
    ///
    /// The endpoint is unregistered before the driver is called. If the
    /// driver fails, it is registered again and the driver's error returned.
    ///
    /// # Errors
    ///
    /// Returns [`BockError::UnknownEndpoint`] if the endpoint is no longer
    /// registered, or the driver's error.
    pub fn delete(&self) -> BockResult<()> {
        let network = self.inner.network.upgrade().ok_or_else(|| self.unknown())?;

        if network.endpoints.lock().remove(&self.inner.id).is_none() {
            return Err(self.unknown());
        }

        tracing::debug!(network = %network.id, endpoint = %self.inner.id, "Deleting endpoint");
        if let Err(err) = network.driver.delete_endpoint(&network.id, &self.inner.id) {
            network
                .endpoints
                .lock()
                .insert(self.inner.id.clone(), self.clone());
            tracing::warn!(
                network = %network.id,
                endpoint = %self.inner.id,
                error = %err,
                "Driver failed to delete endpoint, restored registration"
            );
            return Err(err);
        }

        tracing::info!(network = %network.id, endpoint = %self.inner.id, "Endpoint deleted");
        Ok(())
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Endpoint {}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("id", &self.inner.id.short())
            .field("name", &self.inner.name)
            .field("network", &self.inner.network_name)
            .finish_non_exhaustive()
    }
}
