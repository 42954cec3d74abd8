//! Store accessors of the rate limit state.
use derive_more::From;
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_middleware_rate_limit_types::error::RateLimitError;
use ibc_middleware_rate_limit_types::proto::RateLimit as RawRateLimit;
use ibc_middleware_rate_limit_types::{
    address_pair_from_bytes, address_pair_to_bytes, Flow, PendingSendPacket,
    PendingSendPacketKey, RateLimit, RateLimitKey, WhitelistedAddressPair,
};
use ibc_core::host::types::identifiers::ChannelId;
use ibc_middleware_store::{
    Path, ProtobufStore, Store, StoreError, TypedSet, TypedStore, U64Codec,
};
use tracing::debug;

const RATE_LIMIT_PREFIX: &[u8] = b"rateLimit/";
const DENOM_BLACKLIST_PREFIX: &[u8] = b"denomBlacklist/";
const ADDRESS_WHITELIST_PREFIX: &[u8] = b"addressWhitelist/";
const PENDING_SEND_PACKET_PREFIX: &[u8] = b"pendingSendPacket/";

fn strip<'a>(path: &'a Path, prefix: &[u8]) -> Result<&'a [u8], StoreError> {
    path.strip_prefix(prefix).ok_or_else(|| StoreError::Decoding {
        path: path.to_string(),
        description: "unexpected path prefix".to_string(),
    })
}

fn decoding_error(path: &Path, err: RateLimitError) -> StoreError {
    StoreError::Decoding {
        path: path.to_string(),
        description: err.to_string(),
    }
}

#[derive(Clone, Debug, From)]
pub struct RateLimitPath(pub RateLimitKey);

impl From<RateLimitPath> for Path {
    fn from(path: RateLimitPath) -> Self {
        Path::prefixed(RATE_LIMIT_PREFIX, &path.0.to_bytes())
    }
}

impl TryFrom<Path> for RateLimitPath {
    type Error = StoreError;

    fn try_from(path: Path) -> Result<Self, Self::Error> {
        RateLimitKey::from_bytes(strip(&path, RATE_LIMIT_PREFIX)?)
            .map(Self)
            .map_err(|e| decoding_error(&path, e))
    }
}

#[derive(Clone, Debug, From)]
pub struct BlacklistedDenomPath(pub String);

impl From<BlacklistedDenomPath> for Path {
    fn from(path: BlacklistedDenomPath) -> Self {
        Path::prefixed(DENOM_BLACKLIST_PREFIX, path.0.as_bytes())
    }
}

impl TryFrom<Path> for BlacklistedDenomPath {
    type Error = StoreError;

    fn try_from(path: Path) -> Result<Self, Self::Error> {
        let denom = strip(&path, DENOM_BLACKLIST_PREFIX)?;
        core::str::from_utf8(denom)
            .map(|denom| Self(denom.to_string()))
            .map_err(|e| StoreError::Decoding {
                path: path.to_string(),
                description: e.to_string(),
            })
    }
}

#[derive(Clone, Debug, From)]
pub struct WhitelistedAddressPairPath(pub WhitelistedAddressPair);

impl From<WhitelistedAddressPairPath> for Path {
    fn from(path: WhitelistedAddressPairPath) -> Self {
        let pair = path.0;
        Path::prefixed(
            ADDRESS_WHITELIST_PREFIX,
            &address_pair_to_bytes(&pair.sender, &pair.receiver),
        )
    }
}

impl TryFrom<Path> for WhitelistedAddressPairPath {
    type Error = StoreError;

    fn try_from(path: Path) -> Result<Self, Self::Error> {
        address_pair_from_bytes(strip(&path, ADDRESS_WHITELIST_PREFIX)?)
            .map(|(sender, receiver)| Self(WhitelistedAddressPair::new(sender, receiver)))
            .map_err(|e| decoding_error(&path, e))
    }
}

#[derive(Clone, Debug, From)]
pub struct PendingSendPacketPath(pub PendingSendPacketKey);

impl From<PendingSendPacketPath> for Path {
    fn from(path: PendingSendPacketPath) -> Self {
        Path::prefixed(PENDING_SEND_PACKET_PREFIX, &path.0.to_bytes())
    }
}

impl TryFrom<Path> for PendingSendPacketPath {
    type Error = StoreError;

    fn try_from(path: Path) -> Result<Self, Self::Error> {
        PendingSendPacketKey::from_bytes(strip(&path, PENDING_SEND_PACKET_PREFIX)?)
            .map(Self)
            .map_err(|e| decoding_error(&path, e))
    }
}

type RateLimits = ProtobufStore<RateLimitPath, RateLimit, RawRateLimit>;
type DenomBlacklist = TypedSet<BlacklistedDenomPath>;
type AddressWhitelist = TypedSet<WhitelistedAddressPairPath>;
/// Pending send markers, valued with the start of the window they were
/// counted in.
type PendingSendPackets = TypedStore<PendingSendPacketPath, U64Codec>;

/// Keyed access to the rate limit state.
pub struct RateLimitKeeper;

impl RateLimitKeeper {
    /// Stores `rate_limit`, replacing any rate limit of the same denom and
    /// channel.
    pub fn set_rate_limit<S: Store>(
        store: &mut S,
        rate_limit: &RateLimit,
    ) -> Result<(), RateLimitError> {
        rate_limit.quota.validate()?;
        RateLimits::set(store, rate_limit.path.clone().into(), rate_limit)?;
        Ok(())
    }

    pub fn get_rate_limit<S: Store>(
        store: &S,
        key: &RateLimitKey,
    ) -> Result<Option<RateLimit>, RateLimitError> {
        Ok(RateLimits::get(store, key.clone().into())?)
    }

    /// Removes a rate limit along with the pending send markers of its
    /// channel.
    pub fn remove_rate_limit<S: Store>(
        store: &mut S,
        key: &RateLimitKey,
    ) -> Result<bool, RateLimitError> {
        debug!(denom = %key.denom, channel = %key.channel_id, "removing rate limit");
        Self::remove_all_channel_pending_send_packets(store, &key.channel_id)?;
        Ok(RateLimits::delete(store, key.clone().into())?)
    }

    /// Zeroes the flow of a rate limit and closes its window.
    ///
    /// The pending send markers of the channel are dropped, so sends counted
    /// before the reset are never taken out of a later window.
    pub fn reset_rate_limit<S: Store>(
        store: &mut S,
        key: &RateLimitKey,
    ) -> Result<(), RateLimitError> {
        let mut rate_limit =
            Self::get_rate_limit(store, key)?.ok_or_else(|| RateLimitError::RateLimitNotFound {
                denom: key.denom.clone(),
                channel_id: key.channel_id.clone(),
            })?;
        rate_limit.flow = Flow::default();
        debug!(denom = %key.denom, channel = %key.channel_id, "resetting rate limit");
        Self::remove_all_channel_pending_send_packets(store, &key.channel_id)?;
        Self::set_rate_limit(store, &rate_limit)
    }

    /// Every rate limit, in store key order.
    pub fn get_all_rate_limits<S: Store>(store: &S) -> Result<Vec<RateLimit>, RateLimitError> {
        Ok(RateLimits::get_all(store, &Path::new(RATE_LIMIT_PREFIX))?
            .into_iter()
            .map(|(_, rate_limit)| rate_limit)
            .collect())
    }

    pub fn add_denom_to_blacklist<S: Store>(
        store: &mut S,
        denom: &str,
    ) -> Result<(), RateLimitError> {
        debug!(%denom, "blacklisting denom");
        DenomBlacklist::set_path(store, denom.to_string().into())?;
        Ok(())
    }

    pub fn remove_denom_from_blacklist<S: Store>(
        store: &mut S,
        denom: &str,
    ) -> Result<bool, RateLimitError> {
        debug!(%denom, "removing denom from blacklist");
        Ok(DenomBlacklist::delete(store, denom.to_string().into())?)
    }

    pub fn is_denom_blacklisted<S: Store>(
        store: &S,
        denom: &str,
    ) -> Result<bool, RateLimitError> {
        Ok(DenomBlacklist::is_path_set(store, denom.to_string().into())?)
    }

    pub fn get_all_blacklisted_denoms<S: Store>(
        store: &S,
    ) -> Result<Vec<String>, RateLimitError> {
        Ok(DenomBlacklist::get_all_keys(store, &Path::new(DENOM_BLACKLIST_PREFIX))?
            .into_iter()
            .map(|path| path.0)
            .collect())
    }

    pub fn set_whitelisted_address_pair<S: Store>(
        store: &mut S,
        pair: &WhitelistedAddressPair,
    ) -> Result<(), RateLimitError> {
        debug!(sender = %pair.sender, receiver = %pair.receiver, "whitelisting address pair");
        AddressWhitelist::set_path(store, pair.clone().into())?;
        Ok(())
    }

    pub fn remove_whitelisted_address_pair<S: Store>(
        store: &mut S,
        pair: &WhitelistedAddressPair,
    ) -> Result<bool, RateLimitError> {
        Ok(AddressWhitelist::delete(store, pair.clone().into())?)
    }

    pub fn is_address_pair_whitelisted<S: Store>(
        store: &S,
        sender: &Signer,
        receiver: &Signer,
    ) -> Result<bool, RateLimitError> {
        let pair = WhitelistedAddressPair::new(sender.clone(), receiver.clone());
        Ok(AddressWhitelist::is_path_set(store, pair.into())?)
    }

    pub fn get_all_whitelisted_address_pairs<S: Store>(
        store: &S,
    ) -> Result<Vec<WhitelistedAddressPair>, RateLimitError> {
        Ok(AddressWhitelist::get_all_keys(store, &Path::new(ADDRESS_WHITELIST_PREFIX))?
            .into_iter()
            .map(|path| path.0)
            .collect())
    }

    /// Marks the send under `key` as counted in the window that started at
    /// `window_start`.
    pub fn set_pending_send_packet<S: Store>(
        store: &mut S,
        key: &PendingSendPacketKey,
        window_start: u64,
    ) -> Result<(), RateLimitError> {
        PendingSendPackets::set(store, key.clone().into(), &window_start)?;
        Ok(())
    }

    /// Start of the window the send under `key` was counted in, if pending.
    pub fn get_pending_send_packet<S: Store>(
        store: &S,
        key: &PendingSendPacketKey,
    ) -> Result<Option<u64>, RateLimitError> {
        Ok(PendingSendPackets::get(store, key.clone().into())?)
    }

    pub fn remove_pending_send_packet<S: Store>(
        store: &mut S,
        key: &PendingSendPacketKey,
    ) -> Result<bool, RateLimitError> {
        Ok(PendingSendPackets::delete(store, key.clone().into())?)
    }

    /// Removes the pending send markers of every send on `channel_id`.
    pub fn remove_all_channel_pending_send_packets<S: Store>(
        store: &mut S,
        channel_id: &ChannelId,
    ) -> Result<(), RateLimitError> {
        let pending = PendingSendPackets::get_all(store, &Path::new(PENDING_SEND_PACKET_PREFIX))?;
        let keys: Vec<_> = pending
            .into_iter()
            .map(|(path, _)| path.0)
            .filter(|key| &key.channel_id == channel_id)
            .collect();
        if !keys.is_empty() {
            debug!(channel = %channel_id, count = keys.len(), "clearing pending sends");
        }
        for key in keys {
            PendingSendPackets::delete(store, key.into())?;
        }
        Ok(())
    }

    pub fn get_all_pending_send_packets<S: Store>(
        store: &S,
    ) -> Result<Vec<PendingSendPacket>, RateLimitError> {
        Ok(PendingSendPackets::get_all(store, &Path::new(PENDING_SEND_PACKET_PREFIX))?
            .into_iter()
            .map(|(path, window_start)| PendingSendPacket {
                channel_id: path.0.channel_id,
                sequence: path.0.sequence,
                window_start,
            })
            .collect())
    }
}
