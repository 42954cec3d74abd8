//! Contains the record kept for every packet forwarded through this chain
//! until the next hop resolves it.
use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use ibc_core::host::types::identifiers::{ChannelId, PortId, Sequence};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_proto::Protobuf;

use crate::error::PacketForwardError;
use crate::proto::InFlightPacket as RawInFlightPacket;

/// Identifies a forwarded packet by the coordinates its acknowledgement or
/// timeout arrives under: the channel and port it was sent from on this
/// chain and its sequence.
///
/// Renders as `{channel}/{port}/{sequence}`, which is also its genesis key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InFlightPacketKey {
    pub channel_id: ChannelId,
    pub port_id: PortId,
    pub sequence: Sequence,
}

impl InFlightPacketKey {
    pub fn new(channel_id: ChannelId, port_id: PortId, sequence: Sequence) -> Self {
        Self {
            channel_id,
            port_id,
            sequence,
        }
    }
}

impl Display for InFlightPacketKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "{}/{}/{}",
            self.channel_id,
            self.port_id,
            self.sequence.value()
        )
    }
}

impl FromStr for InFlightPacketKey {
    type Err = PacketForwardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PacketForwardError::InvalidInFlightPacketKey { key: s.to_string() };

        let mut parts = s.split('/');
        let (Some(channel), Some(port), Some(sequence), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        Ok(Self {
            channel_id: ChannelId::from_str(channel)?,
            port_id: PortId::from_str(port)?,
            sequence: sequence.parse::<u64>().map_err(|_| invalid())?.into(),
        })
    }
}

/// The timeout height of a packet as `{revision_number}-{revision_height}`.
/// `0-0` means no timeout height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PacketTimeoutHeight {
    pub revision_number: u64,
    pub revision_height: u64,
}

impl PacketTimeoutHeight {
    pub fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revision_number,
            revision_height,
        }
    }
}

impl Display for PacketTimeoutHeight {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}

impl FromStr for PacketTimeoutHeight {
    type Err = PacketForwardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PacketForwardError::InvalidInFlightPacket {
            reason: format!("invalid timeout height `{s}`"),
        };
        let (number, height) = s.split_once('-').ok_or_else(invalid)?;
        Ok(Self {
            revision_number: number.parse().map_err(|_| invalid())?,
            revision_height: height.parse().map_err(|_| invalid())?,
        })
    }
}

/// A packet forwarded through this chain, awaiting resolution by the next
/// hop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InFlightPacket {
    /// Sender of the packet received by this chain.
    pub original_sender_address: Signer,
    /// Channel on this chain the original packet arrived on.
    pub refund_channel_id: ChannelId,
    /// Port on this chain the original packet arrived on.
    pub refund_port_id: PortId,
    /// Source channel of the original packet on the previous chain.
    pub packet_src_channel_id: ChannelId,
    /// Source port of the original packet on the previous chain.
    pub packet_src_port_id: PortId,
    /// Timeout timestamp, in nanoseconds, of the original packet.
    pub packet_timeout_timestamp: u64,
    /// Timeout height of the original packet.
    pub packet_timeout_height: PacketTimeoutHeight,
    /// ICS-20 packet data of the original packet.
    pub packet_data: Vec<u8>,
    /// Sequence of the original packet.
    pub refund_sequence: Sequence,
    pub retries_remaining: u8,
    /// Relative timeout, in nanoseconds, of every (re)send to the next hop.
    pub timeout: u64,
    /// When set, an exhausted packet is dropped without refunding the
    /// original sender.
    pub nonrefundable: bool,
}

impl InFlightPacket {
    /// The key of the original packet received by this chain.
    pub fn refund_key(&self) -> InFlightPacketKey {
        InFlightPacketKey::new(
            self.refund_channel_id.clone(),
            self.refund_port_id.clone(),
            self.refund_sequence,
        )
    }
}

impl Protobuf<RawInFlightPacket> for InFlightPacket {}

impl TryFrom<RawInFlightPacket> for InFlightPacket {
    type Error = PacketForwardError;

    fn try_from(raw: RawInFlightPacket) -> Result<Self, Self::Error> {
        if raw.original_sender_address.is_empty() {
            return Err(PacketForwardError::InvalidInFlightPacket {
                reason: "empty original sender address".to_string(),
            });
        }
        let retries_remaining = u8::try_from(raw.retries_remaining).map_err(|_| {
            PacketForwardError::InvalidInFlightPacket {
                reason: format!("retries remaining out of range: {}", raw.retries_remaining),
            }
        })?;

        Ok(Self {
            original_sender_address: raw.original_sender_address.into(),
            refund_channel_id: raw.refund_channel_id.parse()?,
            refund_port_id: raw.refund_port_id.parse()?,
            packet_src_channel_id: raw.packet_src_channel_id.parse()?,
            packet_src_port_id: raw.packet_src_port_id.parse()?,
            packet_timeout_timestamp: raw.packet_timeout_timestamp,
            packet_timeout_height: raw.packet_timeout_height.parse()?,
            packet_data: raw.packet_data,
            refund_sequence: raw.refund_sequence.into(),
            retries_remaining,
            timeout: raw.timeout,
            nonrefundable: raw.nonrefundable,
        })
    }
}

impl From<InFlightPacket> for RawInFlightPacket {
    fn from(packet: InFlightPacket) -> Self {
        Self {
            original_sender_address: packet.original_sender_address.to_string(),
            refund_channel_id: packet.refund_channel_id.to_string(),
            refund_port_id: packet.refund_port_id.to_string(),
            packet_src_channel_id: packet.packet_src_channel_id.to_string(),
            packet_src_port_id: packet.packet_src_port_id.to_string(),
            packet_timeout_timestamp: packet.packet_timeout_timestamp,
            packet_timeout_height: packet.packet_timeout_height.to_string(),
            packet_data: packet.packet_data,
            refund_sequence: packet.refund_sequence.value(),
            retries_remaining: i32::from(packet.retries_remaining),
            timeout: packet.timeout,
            nonrefundable: packet.nonrefundable,
        }
    }
}
