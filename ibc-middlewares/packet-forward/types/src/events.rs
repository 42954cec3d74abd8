//! Defines the events emitted by the packet forward middleware
use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_core::host::types::identifiers::{ChannelId, Sequence};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_core::router::types::event::ModuleEvent;

use crate::{InFlightPacketKey, MODULE_ID_STR};

const EVENT_TYPE_PACKET_FORWARD: &str = "packet_forward";

/// Step of the forwarding lifecycle an event reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForwardAction {
    /// The received transfer was forwarded to the next hop.
    Forward,
    /// A failed forward was sent again.
    Retry,
    /// The forwarded transfer failed for good and was refunded.
    Refund,
    /// The forwarded transfer failed for good and is not refundable.
    WriteOff,
    /// The next hop acknowledged the forwarded transfer.
    Success,
}

impl Display for ForwardAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let action = match self {
            Self::Forward => "forward",
            Self::Retry => "retry",
            Self::Refund => "refund",
            Self::WriteOff => "write_off",
            Self::Success => "success",
        };
        write!(f, "{action}")
    }
}

/// Event emitted on every transition of a forwarded packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketForwardEvent {
    pub action: ForwardAction,
    /// Coordinates of the forwarded packet.
    pub forward_key: InFlightPacketKey,
    pub original_sender: Signer,
    pub refund_channel_id: ChannelId,
    pub refund_sequence: Sequence,
    pub retries_remaining: u8,
    /// Failure reported by the next hop, if any.
    pub error: Option<String>,
}

impl From<PacketForwardEvent> for ModuleEvent {
    fn from(ev: PacketForwardEvent) -> Self {
        let PacketForwardEvent {
            action,
            forward_key,
            original_sender,
            refund_channel_id,
            refund_sequence,
            retries_remaining,
            error,
        } = ev;
        let mut attributes = vec![
            ("module", MODULE_ID_STR).into(),
            ("action", action).into(),
            ("forward_channel", forward_key.channel_id).into(),
            ("forward_port", forward_key.port_id).into(),
            ("forward_sequence", forward_key.sequence.value()).into(),
            ("original_sender", original_sender).into(),
            ("refund_channel", refund_channel_id).into(),
            ("refund_sequence", refund_sequence.value()).into(),
            ("retries_remaining", retries_remaining).into(),
        ];
        if let Some(error) = error {
            attributes.push(("error", error).into());
        }
        Self {
            kind: EVENT_TYPE_PACKET_FORWARD.to_string(),
            attributes,
        }
    }
}
