//! Defines the rate limit middleware error type
use displaydoc::Display;
use ibc_app_transfer_types::Amount;
use ibc_core::channel::types::acknowledgement::StatusValue;
use ibc_core::host::types::error::IdentifierError;
use ibc_core::host::types::identifiers::ChannelId;
use ibc_core::primitives::prelude::*;
use ibc_middleware_primitives::DecError;
use ibc_middleware_store::StoreError;

use crate::PacketDirection;

#[derive(Display, Debug)]
pub enum RateLimitError {
    /// denom `{denom}` is blacklisted
    DenomIsBlacklisted { denom: String },
    /// {direction} of `{amount}{denom}` on channel `{channel_id}` exceeds the quota of `{threshold}`
    QuotaExceeded {
        denom: String,
        channel_id: ChannelId,
        direction: PacketDirection,
        amount: Amount,
        threshold: Amount,
    },
    /// invalid quota: `{reason}`
    InvalidQuota { reason: String },
    /// invalid packet direction `{0}`
    InvalidDirection(i32),
    /// no rate limit for denom `{denom}` on channel `{channel_id}`
    RateLimitNotFound { denom: String, channel_id: ChannelId },
    /// undoing `{amount}` underflows outflow `{outflow}`
    UnderflowOnUndo { amount: Amount, outflow: Amount },
    /// adding `{amount}` overflows the flow
    FlowOverflow { amount: Amount },
    /// invalid rate limit: `{reason}`
    InvalidRateLimit { reason: String },
    /// invalid store key `{key}`: `{reason}`
    InvalidKey { key: String, reason: String },
    /// invalid identifier: `{0}`
    InvalidIdentifier(IdentifierError),
    /// invalid amount `{0}`
    InvalidAmount(String),
    /// decimal error: `{0}`
    Decimal(DecError),
    /// invalid packet data
    InvalidPacketData,
    /// failed to deserialize acknowledgement
    AckDeserialization,
    /// store error: `{0}`
    Store(StoreError),
    /// host error: `{description}`
    Host { description: String },
}

impl RateLimitError {
    pub fn host(description: impl Into<String>) -> Self {
        Self::Host {
            description: description.into(),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RateLimitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::InvalidIdentifier(e) => Some(e),
            Self::Decimal(e) => Some(e),
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IdentifierError> for RateLimitError {
    fn from(err: IdentifierError) -> Self {
        Self::InvalidIdentifier(err)
    }
}

impl From<StoreError> for RateLimitError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<DecError> for RateLimitError {
    fn from(err: DecError) -> Self {
        Self::Decimal(err)
    }
}

impl From<RateLimitError> for StatusValue {
    fn from(err: RateLimitError) -> Self {
        StatusValue::new(err.to_string()).expect("error message must not be empty")
    }
}
