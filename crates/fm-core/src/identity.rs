//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers throughout the coordination
//! engine. Each identifier is a distinct type — you cannot pass a
//! [`ShipmentId`] where a [`DisruptionId`] is expected.
//!
//! ## Validation
//!
//! The string-based [`PartyRef`] validates its contents at construction
//! time. UUID-based identifiers ([`ShipmentId`], [`DisruptionId`],
//! [`RouteCandidateId`], [`CarrierRequestId`], [`NotificationId`]) are
//! always valid by construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Helper macro to implement `Deserialize` for string newtypes that must
/// validate their contents. Deserializes as a plain `String`, then routes
/// through the type's `new()` constructor so that invalid values are
/// rejected at deserialization time — not silently accepted.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Helper macro for UUID-based identifier newtypes. Generates the
/// constructor set, `Default`, `Display` with a stable prefix, and
/// `FromStr` accepting the bare UUID.
macro_rules! uuid_id {
    ($(#[$doc:meta])* $ty:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $ty(Uuid);

        impl $ty {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $ty {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::from_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// A unique identifier for a tracked shipment.
    ShipmentId,
    "shipment"
);

uuid_id!(
    /// A unique identifier for a disruption alert.
    DisruptionId,
    "disruption"
);

uuid_id!(
    /// A unique identifier for a route candidate, scoped to a single
    /// reroute request.
    RouteCandidateId,
    "route"
);

uuid_id!(
    /// A unique identifier for a pending carrier request.
    CarrierRequestId,
    "request"
);

uuid_id!(
    /// A unique identifier for an emitted notification.
    NotificationId,
    "notification"
);

// ---------------------------------------------------------------------------
// PartyRef — validated account reference
// ---------------------------------------------------------------------------

/// A reference to a participating party's account: a customer, a supplier,
/// or a transporter.
///
/// Party accounts are owned by the (out-of-scope) directory service; the
/// engine treats them as opaque references but rejects values that could
/// not possibly be account ids: empty strings, values over 64 characters,
/// and values containing control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PartyRef(String);

impl PartyRef {
    /// Maximum accepted length for a party reference.
    pub const MAX_LEN: usize = 64;

    /// Create a party reference, validating the raw value.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::new("party", "must not be empty"));
        }
        if raw.len() > Self::MAX_LEN {
            return Err(ValidationError::new(
                "party",
                format!("must be at most {} characters", Self::MAX_LEN),
            ));
        }
        if raw.chars().any(|c| c.is_control()) {
            return Err(ValidationError::new(
                "party",
                "must not contain control characters",
            ));
        }
        Ok(Self(raw))
    }

    /// The raw reference string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_validating_deserialize!(PartyRef);

impl std::fmt::Display for PartyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PartyRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
