//! Network and endpoint ID generation and validation.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BockError, BockResult};

/// Maximum length of a generated or parsed ID.
pub const MAX_ID_LENGTH: usize = 64;

/// Length of the short display form of an ID.
pub const SHORT_ID_LENGTH: usize = 12;

/// Validate an ID string.
///
/// IDs must:
/// - Be 1-64 characters long
/// - Contain only alphanumeric characters, hyphens, and underscores
/// - Start with an alphanumeric character
fn validate(id: &str) -> BockResult<()> {
    if id.is_empty() || id.len() > MAX_ID_LENGTH {
        return Err(BockError::InvalidId { id: id.to_string() });
    }

    if !id.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err(BockError::InvalidId { id: id.to_string() });
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(BockError::InvalidId { id: id.to_string() });
    }

    Ok(())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID, validating the format.
            ///
            /// # Errors
            ///
            /// Returns [`BockError::InvalidId`] if the format is invalid.
            pub fn new(id: impl Into<String>) -> BockResult<Self> {
                let id = id.into();
                validate(&id)?;
                Ok(Self(id))
            }

            /// Generate a fresh ID from the given generator.
            ///
            /// # Errors
            ///
            /// Returns [`BockError::InvalidId`] if the generator produced an
            /// unusable string.
            pub fn generate(generator: &dyn IdGenerator) -> BockResult<Self> {
                Self::new(generator.generate())
            }

            /// Get the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns a short version of the ID (first 12 characters).
            #[must_use]
            pub fn short(&self) -> &str {
                if self.0.len() <= SHORT_ID_LENGTH {
                    &self.0
                } else {
                    &self.0[..SHORT_ID_LENGTH]
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = BockError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a network, unique within the process.
    NetworkId
);

string_id!(
    /// Identifier of an endpoint, unique within the process.
    EndpointId
);

/// Source of unique identifiers.
///
/// Implementations must not hand out the same string twice for the lifetime
/// of the registry that uses them.
pub trait IdGenerator: Send + Sync {
    /// Produce a new identifier.
    fn generate(&self) -> String;
}

/// Default generator: 64 hex characters from 32 random bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(uuid::Uuid::new_v4().as_bytes());
        bytes[16..].copy_from_slice(uuid::Uuid::new_v4().as_bytes());
        hex::encode(bytes)
    }
}
