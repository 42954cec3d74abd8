//! Defines the packet forward middleware error type
use displaydoc::Display;
use ibc_core::channel::types::acknowledgement::StatusValue;
use ibc_core::host::types::error::IdentifierError;
use ibc_core::primitives::prelude::*;
use ibc_middleware_primitives::{DecError, DurationError};
use ibc_middleware_store::StoreError;

use crate::InFlightPacketKey;

#[derive(Display, Debug)]
pub enum PacketForwardError {
    /// invalid forward metadata: `{reason}`
    InvalidForwardMetadata { reason: String },
    /// invalid forward timeout: `{0}`
    InvalidForwardTimeout(DurationError),
    /// invalid params: `{reason}`
    InvalidParams { reason: String },
    /// invalid in-flight packet: `{reason}`
    InvalidInFlightPacket { reason: String },
    /// invalid in-flight packet key `{key}`
    InvalidInFlightPacketKey { key: String },
    /// invalid identifier: `{0}`
    InvalidIdentifier(IdentifierError),
    /// invalid amount: `{reason}`
    InvalidAmount { reason: String },
    /// in-flight packet `{0}` not found
    InFlightPacketNotFound(InFlightPacketKey),
    /// fee computation error: `{0}`
    Fee(DecError),
    /// failed to deserialize packet data
    PacketDataDeserialization,
    /// failed to serialize packet data
    PacketDataSerialization,
    /// failed to deserialize acknowledgement
    AckDeserialization,
    /// store error: `{0}`
    Store(StoreError),
    /// host error: `{description}`
    Host { description: String },
}

impl PacketForwardError {
    pub fn host(description: impl Into<String>) -> Self {
        Self::Host {
            description: description.into(),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PacketForwardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::InvalidForwardTimeout(e) => Some(e),
            Self::InvalidIdentifier(e) => Some(e),
            Self::Fee(e) => Some(e),
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IdentifierError> for PacketForwardError {
    fn from(err: IdentifierError) -> Self {
        Self::InvalidIdentifier(err)
    }
}

impl From<StoreError> for PacketForwardError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<DurationError> for PacketForwardError {
    fn from(err: DurationError) -> Self {
        Self::InvalidForwardTimeout(err)
    }
}

impl From<DecError> for PacketForwardError {
    fn from(err: DecError) -> Self {
        Self::Fee(err)
    }
}

impl From<PacketForwardError> for StatusValue {
    fn from(err: PacketForwardError) -> Self {
        StatusValue::new(err.to_string()).expect("error message must not be empty")
    }
}
