//! # bock-network
//!
//! Network control plane for Bock containers.
//!
//! A [`Controller`] keeps the registry of [`Network`]s, each network keeps
//! its [`Endpoint`]s, and all backend work is delegated to pluggable
//! [`Driver`]s selected by network type.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use bock_common::{BockResult, Options};
//! # use bock_network::{Controller, Driver};
//! # fn run(bridge: Arc<dyn Driver>) -> BockResult<()> {
//! let controller = Controller::new([bridge]);
//! controller.configure_network_driver("bridge", &Options::new())?;
//!
//! let network = controller.new_network("bridge", "network1", &Options::new())?;
//! let endpoint = network.create_endpoint("endpoint1", "/var/run/netns/4d23e", &Options::new())?;
//!
//! endpoint.delete()?;
//! network.delete()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod controller;
pub mod driver;
pub mod endpoint;
pub mod network;
pub mod sandbox;

#[cfg(test)]
mod test_driver;

pub use config::ControllerConfig;
pub use controller::{Controller, ControllerBuilder};
pub use driver::{Driver, DriverTable};
pub use endpoint::Endpoint;
pub use network::Network;
pub use sandbox::{Interface, SandboxInfo};
