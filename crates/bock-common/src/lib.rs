//! # bock-common
//!
//! Shared types for the Bock network control plane.
//!
//! This crate provides functionality used across the Bock network crates:
//! - Network and endpoint ID generation
//! - Generic driver options
//! - Common error types

#![warn(missing_docs)]

pub mod error;
pub mod id;
pub mod options;

pub use error::{BockError, BockResult};
pub use id::{EndpointId, IdGenerator, NetworkId, RandomIdGenerator};
pub use options::Options;
