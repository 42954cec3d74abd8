//! Import and export of the packet forward middleware state.
use ibc_core::primitives::prelude::*;
use ibc_middleware_packet_forward_types::error::PacketForwardError;
use ibc_middleware_packet_forward_types::{GenesisState, InFlightPacketKey};
use ibc_middleware_store::Store;
use tracing::debug;

use crate::registry::InFlightPacketRegistry;

/// Writes `genesis` into `store`, after validating it.
pub fn init_genesis<S: Store>(
    store: &mut S,
    genesis: &GenesisState,
) -> Result<(), PacketForwardError> {
    genesis.validate()?;

    InFlightPacketRegistry::set_params(store, &genesis.params)?;
    for (key, packet) in &genesis.in_flight_packets {
        let key = key.parse::<InFlightPacketKey>()?;
        InFlightPacketRegistry::put(store, key, packet)?;
    }
    debug!(
        in_flight_packets = genesis.in_flight_packets.len(),
        "initialized packet forward state"
    );
    Ok(())
}

/// Reads the full state out of `store`.
pub fn export_genesis<S: Store>(store: &S) -> Result<GenesisState, PacketForwardError> {
    Ok(GenesisState {
        params: InFlightPacketRegistry::params(store)?,
        in_flight_packets: InFlightPacketRegistry::iterate_all(store)?
            .into_iter()
            .map(|(key, packet)| (key.to_string(), packet))
            .collect(),
    })
}
