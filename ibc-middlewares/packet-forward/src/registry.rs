//! Persistence of the packet forward middleware state: the in-flight packets
//! and the params.
use core::str::FromStr;

use ibc_core::primitives::prelude::*;
use ibc_middleware_packet_forward_types::error::PacketForwardError;
use ibc_middleware_packet_forward_types::proto::{
    InFlightPacket as RawInFlightPacket, Params as RawParams,
};
use ibc_middleware_packet_forward_types::{InFlightPacket, InFlightPacketKey, Params};
use ibc_middleware_store::{Path, ProtobufStore, Store, StoreError};
use tracing::debug;

const IN_FLIGHT_PACKET_PREFIX: &[u8] = b"inFlightPacket/";
const PARAMS_PATH: &[u8] = b"params";

/// Store path of the in-flight packet with the given key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InFlightPacketPath(pub InFlightPacketKey);

impl From<InFlightPacketPath> for Path {
    fn from(path: InFlightPacketPath) -> Self {
        Path::prefixed(IN_FLIGHT_PACKET_PREFIX, path.0.to_string().as_bytes())
    }
}

impl TryFrom<Path> for InFlightPacketPath {
    type Error = StoreError;

    fn try_from(path: Path) -> Result<Self, Self::Error> {
        let decoding_error = |description: String| StoreError::Decoding {
            path: path.to_string(),
            description,
        };
        let key = path
            .strip_prefix(IN_FLIGHT_PACKET_PREFIX)
            .and_then(|key| core::str::from_utf8(key).ok())
            .ok_or_else(|| decoding_error("not an in-flight packet path".to_string()))?;
        InFlightPacketKey::from_str(key)
            .map(Self)
            .map_err(|e| decoding_error(e.to_string()))
    }
}

/// Store path of the middleware params.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamsPath;

impl From<ParamsPath> for Path {
    fn from(_: ParamsPath) -> Self {
        Path::new(PARAMS_PATH)
    }
}

type InFlightPackets = ProtobufStore<InFlightPacketPath, InFlightPacket, RawInFlightPacket>;
type ParamsStore = ProtobufStore<ParamsPath, Params, RawParams>;

/// Keyed access to the in-flight packets and the params.
pub struct InFlightPacketRegistry;

impl InFlightPacketRegistry {
    /// Records `packet` as forwarded under `key`, replacing any previous
    /// record.
    pub fn put<S: Store>(
        store: &mut S,
        key: InFlightPacketKey,
        packet: &InFlightPacket,
    ) -> Result<(), PacketForwardError> {
        debug!(%key, "recording in-flight packet");
        InFlightPackets::set(store, InFlightPacketPath(key), packet)?;
        Ok(())
    }

    pub fn get<S: Store>(
        store: &S,
        key: &InFlightPacketKey,
    ) -> Result<Option<InFlightPacket>, PacketForwardError> {
        Ok(InFlightPackets::get(store, InFlightPacketPath(key.clone()))?)
    }

    /// Removes the record under `key`. Returns whether one was present.
    pub fn delete<S: Store>(
        store: &mut S,
        key: &InFlightPacketKey,
    ) -> Result<bool, PacketForwardError> {
        debug!(%key, "removing in-flight packet");
        Ok(InFlightPackets::delete(store, InFlightPacketPath(key.clone()))?)
    }

    /// Every in-flight packet, in ascending store path order.
    pub fn iterate_all<S: Store>(
        store: &S,
    ) -> Result<Vec<(InFlightPacketKey, InFlightPacket)>, PacketForwardError> {
        Ok(InFlightPackets::get_all(store, &Path::new(IN_FLIGHT_PACKET_PREFIX))?
            .into_iter()
            .map(|(path, packet)| (path.0, packet))
            .collect())
    }

    /// The current params, defaulting to a zero fee when never set.
    pub fn params<S: Store>(store: &S) -> Result<Params, PacketForwardError> {
        Ok(ParamsStore::get(store, ParamsPath)?.unwrap_or_default())
    }

    pub fn set_params<S: Store>(store: &mut S, params: &Params) -> Result<(), PacketForwardError> {
        params.validate()?;
        debug!(fee_percentage = %params.fee_percentage, "updating params");
        ParamsStore::set(store, ParamsPath, params)?;
        Ok(())
    }
}
