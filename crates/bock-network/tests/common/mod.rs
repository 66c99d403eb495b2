//! Shared helpers for bock-network integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::{Arc, Barrier};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use bock_common::{BockError, BockResult, EndpointId, NetworkId, Options};
use bock_network::{Controller, Driver, Interface, SandboxInfo};
use parking_lot::Mutex;

/// In-memory driver that tracks backend state and can be told to fail.
#[derive(Debug, Default)]
pub struct MockDriver {
    network_type: String,
    pub fail_delete_network: AtomicBool,
    pub fail_delete_endpoint: AtomicBool,
    /// Delay inside `create_network`, to widen race windows.
    pub create_delay: Mutex<Option<Duration>>,
    /// One-shot hold inside `delete_network`: waits on the first barrier once
    /// entered, then on the second before finishing.
    pub delete_hold: Mutex<Option<(Arc<Barrier>, Arc<Barrier>)>>,
    pub networks: Mutex<HashSet<String>>,
    pub endpoints: Mutex<HashSet<String>>,
    pub create_network_calls: AtomicUsize,
}

impl MockDriver {
    pub fn new(network_type: &str) -> Arc<Self> {
        Arc::new(Self {
            network_type: network_type.to_string(),
            ..Self::default()
        })
    }
}

impl Driver for MockDriver {
    fn config(&self, _options: &Options) -> BockResult<()> {
        Ok(())
    }

    fn network_type(&self) -> &str {
        &self.network_type
    }

    fn create_network(&self, network_id: &NetworkId, _options: &Options) -> BockResult<()> {
        self.create_network_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = *self.create_delay.lock() {
            std::thread::sleep(delay);
        }
        self.networks.lock().insert(network_id.to_string());
        Ok(())
    }

    fn delete_network(&self, network_id: &NetworkId) -> BockResult<()> {
        let hold = self.delete_hold.lock().take();
        if let Some((entered, release)) = hold {
            entered.wait();
            release.wait();
        }
        if self.fail_delete_network.load(Ordering::SeqCst) {
            return Err(BockError::driver(&self.network_type, "bridge is busy"));
        }
        self.networks.lock().remove(network_id.as_str());
        Ok(())
    }

    fn create_endpoint(
        &self,
        _network_id: &NetworkId,
        endpoint_id: &EndpointId,
        _sandbox_key: &str,
        _options: &Options,
    ) -> BockResult<Option<SandboxInfo>> {
        self.endpoints.lock().insert(endpoint_id.to_string());
        Ok(Some(
            SandboxInfo::new()
                .with_interface(
                    Interface::new(format!("veth{}", endpoint_id.short()), "eth0")
                        .with_address("172.17.0.2/16"),
                )
                .with_gateway(Ipv4Addr::new(172, 17, 0, 1)),
        ))
    }

    fn delete_endpoint(&self, _network_id: &NetworkId, endpoint_id: &EndpointId) -> BockResult<()> {
        if self.fail_delete_endpoint.load(Ordering::SeqCst) {
            return Err(BockError::driver(&self.network_type, "veth is busy"));
        }
        self.endpoints.lock().remove(endpoint_id.as_str());
        Ok(())
    }
}

/// Controller with a single "bridge" mock driver.
pub fn bridge_controller() -> (Arc<MockDriver>, Controller) {
    let driver = MockDriver::new("bridge");
    let controller = Controller::new([driver.clone() as Arc<dyn Driver>]);
    (driver, controller)
}
