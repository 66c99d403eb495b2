//! Recording driver used by the unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use bock_common::{BockError, BockResult, EndpointId, IdGenerator, NetworkId, Options};
use parking_lot::Mutex;

use crate::driver::Driver;
use crate::sandbox::SandboxInfo;

#[derive(Debug, Default)]
pub(crate) struct TestDriver {
    network_type: String,
    fail_create_network: AtomicBool,
    fail_delete_network: AtomicBool,
    fail_create_endpoint: AtomicBool,
    fail_delete_endpoint: AtomicBool,
    configured: Mutex<Vec<Options>>,
    sandbox_info: Mutex<Option<SandboxInfo>>,
    networks: Mutex<HashSet<String>>,
    endpoints: Mutex<HashSet<(String, String)>>,
}

impl TestDriver {
    pub(crate) fn new(network_type: &str) -> Self {
        Self {
            network_type: network_type.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn fail_create_network(&self, fail: bool) {
        self.fail_create_network.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_delete_network(&self, fail: bool) {
        self.fail_delete_network.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_create_endpoint(&self, fail: bool) {
        self.fail_create_endpoint.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_delete_endpoint(&self, fail: bool) {
        self.fail_delete_endpoint.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_sandbox_info(&self, info: Option<SandboxInfo>) {
        *self.sandbox_info.lock() = info;
    }

    pub(crate) fn configured(&self) -> Vec<Options> {
        self.configured.lock().clone()
    }

    pub(crate) fn has_network(&self, id: &str) -> bool {
        self.networks.lock().contains(id)
    }

    pub(crate) fn has_endpoint(&self, network_id: &str, endpoint_id: &str) -> bool {
        self.endpoints
            .lock()
            .contains(&(network_id.to_string(), endpoint_id.to_string()))
    }

    fn check(&self, flag: &AtomicBool, op: &str) -> BockResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(BockError::driver(&self.network_type, format!("{op} failed")))
        } else {
            Ok(())
        }
    }
}

impl Driver for TestDriver {
    fn config(&self, options: &Options) -> BockResult<()> {
        self.configured.lock().push(options.clone());
        Ok(())
    }

    fn network_type(&self) -> &str {
        &self.network_type
    }

    fn create_network(&self, network_id: &NetworkId, _options: &Options) -> BockResult<()> {
        self.check(&self.fail_create_network, "create network")?;
        self.networks.lock().insert(network_id.to_string());
        Ok(())
    }

    fn delete_network(&self, network_id: &NetworkId) -> BockResult<()> {
        self.check(&self.fail_delete_network, "delete network")?;
        self.networks.lock().remove(network_id.as_str());
        Ok(())
    }

    fn create_endpoint(
        &self,
        network_id: &NetworkId,
        endpoint_id: &EndpointId,
        _sandbox_key: &str,
        _options: &Options,
    ) -> BockResult<Option<SandboxInfo>> {
        self.check(&self.fail_create_endpoint, "create endpoint")?;
        self.endpoints
            .lock()
            .insert((network_id.to_string(), endpoint_id.to_string()));
        Ok(self.sandbox_info.lock().clone())
    }

    fn delete_endpoint(&self, network_id: &NetworkId, endpoint_id: &EndpointId) -> BockResult<()> {
        self.check(&self.fail_delete_endpoint, "delete endpoint")?;
        self.endpoints
            .lock()
            .remove(&(network_id.to_string(), endpoint_id.to_string()));
        Ok(())
    }
}

/// Deterministic IDs: `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug)]
pub(crate) struct SequentialIds {
    prefix: String,
    next: AtomicUsize,
}

impl SequentialIds {
    pub(crate) fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: AtomicUsize::new(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::with_prefix("id")
    }
}

impl IdGenerator for SequentialIds {
    fn generate(&self) -> String {
        format!("{}-{}", self.prefix, self.next.fetch_add(1, Ordering::SeqCst))
    }
}
