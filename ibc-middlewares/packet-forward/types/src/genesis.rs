use alloc::collections::BTreeMap;

use ibc_core::primitives::prelude::*;
use ibc_proto::Protobuf;

use crate::error::PacketForwardError;
use crate::proto::{GenesisState as RawGenesisState, InFlightPacketEntry};
use crate::{InFlightPacket, InFlightPacketKey, Params};

/// Full state of the packet forward middleware.
///
/// In-flight packets are keyed by the string form of their
/// [`InFlightPacketKey`] and enumerated in lexicographic key order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenesisState {
    pub params: Params,
    pub in_flight_packets: BTreeMap<String, InFlightPacket>,
}

impl GenesisState {
    pub fn validate(&self) -> Result<(), PacketForwardError> {
        self.params.validate()?;
        for key in self.in_flight_packets.keys() {
            // keys must be in their canonical form to be found again
            if key.parse::<InFlightPacketKey>()?.to_string() != *key {
                return Err(PacketForwardError::InvalidInFlightPacketKey { key: key.clone() });
            }
        }
        Ok(())
    }
}

impl Protobuf<RawGenesisState> for GenesisState {}

impl TryFrom<RawGenesisState> for GenesisState {
    type Error = PacketForwardError;

    fn try_from(raw: RawGenesisState) -> Result<Self, Self::Error> {
        let params = raw.params.map(Params::try_from).transpose()?.unwrap_or_default();

        let mut in_flight_packets = BTreeMap::new();
        for entry in raw.in_flight_packets {
            let value = entry
                .value
                .ok_or_else(|| PacketForwardError::InvalidInFlightPacket {
                    reason: format!("missing value for key `{}`", entry.key),
                })?;
            // later entries overwrite earlier ones, as with a decoded map
            in_flight_packets.insert(entry.key, InFlightPacket::try_from(value)?);
        }

        let state = Self {
            params,
            in_flight_packets,
        };
        state.validate()?;
        Ok(state)
    }
}

impl From<GenesisState> for RawGenesisState {
    fn from(state: GenesisState) -> Self {
        Self {
            params: Some(state.params.into()),
            in_flight_packets: state
                .in_flight_packets
                .into_iter()
                .map(|(key, packet)| InFlightPacketEntry {
                    key,
                    value: Some(packet.into()),
                })
                .collect(),
        }
    }
}
