//! Defines the events emitted by the rate limit middleware
use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_app_transfer_types::Amount;
use ibc_core::host::types::identifiers::ChannelId;
use ibc_core::primitives::prelude::*;
use ibc_core::router::types::event::ModuleEvent;

use crate::{PacketDirection, MODULE_ID_STR};

const EVENT_TYPE_TRANSFER_DENIED: &str = "transfer_denied";

/// Why a transfer was denied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenialReason {
    BlacklistedDenom,
    RateLimitExceeded,
}

impl Display for DenialReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let reason = match self {
            Self::BlacklistedDenom => "blacklisted_denom",
            Self::RateLimitExceeded => "rate_limit_exceeded",
        };
        write!(f, "{reason}")
    }
}

/// Emitted when a transfer is denied, either because its denom is
/// blacklisted or because it would exceed a quota.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferDeniedEvent {
    pub reason: DenialReason,
    pub denom: String,
    pub channel_id: ChannelId,
    pub direction: PacketDirection,
    pub amount: Amount,
    /// Message of the error the transfer was denied with.
    pub error: String,
}

impl TransferDeniedEvent {
    pub fn blacklisted_denom(
        denom: String,
        channel_id: ChannelId,
        direction: PacketDirection,
        amount: Amount,
        error: String,
    ) -> Self {
        Self {
            reason: DenialReason::BlacklistedDenom,
            denom,
            channel_id,
            direction,
            amount,
            error,
        }
    }

    pub fn rate_limit_exceeded(
        denom: String,
        channel_id: ChannelId,
        direction: PacketDirection,
        amount: Amount,
        error: String,
    ) -> Self {
        Self {
            reason: DenialReason::RateLimitExceeded,
            denom,
            channel_id,
            direction,
            amount,
            error,
        }
    }
}

impl From<TransferDeniedEvent> for ModuleEvent {
    fn from(ev: TransferDeniedEvent) -> Self {
        let TransferDeniedEvent {
            reason,
            denom,
            channel_id,
            direction,
            amount,
            error,
        } = ev;
        Self {
            kind: EVENT_TYPE_TRANSFER_DENIED.to_string(),
            attributes: vec![
                ("module", MODULE_ID_STR).into(),
                ("reason", reason).into(),
                ("action", direction.as_str().to_lowercase()).into(),
                ("denom", denom).into(),
                ("channel", channel_id).into(),
                ("amount", amount).into(),
                ("error", error).into(),
            ],
        }
    }
}
