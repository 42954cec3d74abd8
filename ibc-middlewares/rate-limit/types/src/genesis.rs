use alloc::collections::BTreeSet;

use ibc_core::host::types::identifiers::{ChannelId, Sequence};
use ibc_core::primitives::prelude::*;
use ibc_proto::Protobuf;

use crate::error::RateLimitError;
use crate::proto::{
    GenesisState as RawGenesisState, PendingSendPacket as RawPendingSendPacket,
};
use crate::{PendingSendPacketKey, RateLimit, WhitelistedAddressPair};

/// A send counted against the window that started at `window_start`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingSendPacket {
    pub channel_id: ChannelId,
    pub sequence: Sequence,
    pub window_start: u64,
}

impl PendingSendPacket {
    pub fn key(&self) -> PendingSendPacketKey {
        PendingSendPacketKey::new(self.channel_id.clone(), self.sequence)
    }
}

impl Protobuf<RawPendingSendPacket> for PendingSendPacket {}

impl TryFrom<RawPendingSendPacket> for PendingSendPacket {
    type Error = RateLimitError;

    fn try_from(raw: RawPendingSendPacket) -> Result<Self, Self::Error> {
        Ok(Self {
            channel_id: raw.channel_id.parse()?,
            sequence: raw.sequence.into(),
            window_start: raw.window_start,
        })
    }
}

impl From<PendingSendPacket> for RawPendingSendPacket {
    fn from(packet: PendingSendPacket) -> Self {
        Self {
            channel_id: packet.channel_id.to_string(),
            sequence: packet.sequence.value(),
            window_start: packet.window_start,
        }
    }
}

/// Full state of the rate limit middleware, each list in store key order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenesisState {
    pub rate_limits: Vec<RateLimit>,
    pub whitelisted_address_pairs: Vec<WhitelistedAddressPair>,
    pub blacklisted_denoms: Vec<String>,
    pub pending_send_packets: Vec<PendingSendPacket>,
}

impl GenesisState {
    pub fn validate(&self) -> Result<(), RateLimitError> {
        let mut paths = BTreeSet::new();
        for rate_limit in &self.rate_limits {
            rate_limit.quota.validate()?;
            if !paths.insert(&rate_limit.path) {
                return Err(RateLimitError::InvalidRateLimit {
                    reason: format!(
                        "duplicate rate limit for denom `{}` on channel `{}`",
                        rate_limit.path.denom, rate_limit.path.channel_id
                    ),
                });
            }
        }
        if self.blacklisted_denoms.iter().any(String::is_empty) {
            return Err(RateLimitError::InvalidRateLimit {
                reason: "empty blacklisted denom".to_string(),
            });
        }
        Ok(())
    }
}

impl Protobuf<RawGenesisState> for GenesisState {}

impl TryFrom<RawGenesisState> for GenesisState {
    type Error = RateLimitError;

    fn try_from(raw: RawGenesisState) -> Result<Self, Self::Error> {
        let state = Self {
            rate_limits: raw
                .rate_limits
                .into_iter()
                .map(RateLimit::try_from)
                .collect::<Result<_, _>>()?,
            whitelisted_address_pairs: raw
                .whitelisted_address_pairs
                .into_iter()
                .map(WhitelistedAddressPair::try_from)
                .collect::<Result<_, _>>()?,
            blacklisted_denoms: raw.blacklisted_denoms,
            pending_send_packets: raw
                .pending_send_packets
                .into_iter()
                .map(PendingSendPacket::try_from)
                .collect::<Result<_, _>>()?,
        };
        state.validate()?;
        Ok(state)
    }
}

impl From<GenesisState> for RawGenesisState {
    fn from(state: GenesisState) -> Self {
        Self {
            rate_limits: state.rate_limits.into_iter().map(Into::into).collect(),
            whitelisted_address_pairs: state
                .whitelisted_address_pairs
                .into_iter()
                .map(Into::into)
                .collect(),
            blacklisted_denoms: state.blacklisted_denoms,
            pending_send_packets: state
                .pending_send_packets
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}
