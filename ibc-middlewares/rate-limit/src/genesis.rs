//! Import and export of the rate limit middleware state.
use ibc_middleware_rate_limit_types::error::RateLimitError;
use ibc_middleware_rate_limit_types::GenesisState;
use ibc_middleware_store::Store;
use tracing::debug;

use crate::keeper::RateLimitKeeper;

pub fn init_genesis<S: Store>(store: &mut S, genesis: &GenesisState) -> Result<(), RateLimitError> {
    genesis.validate()?;

    for rate_limit in &genesis.rate_limits {
        RateLimitKeeper::set_rate_limit(store, rate_limit)?;
    }
    for denom in &genesis.blacklisted_denoms {
        RateLimitKeeper::add_denom_to_blacklist(store, denom)?;
    }
    for pair in &genesis.whitelisted_address_pairs {
        RateLimitKeeper::set_whitelisted_address_pair(store, pair)?;
    }
    for pending in &genesis.pending_send_packets {
        RateLimitKeeper::set_pending_send_packet(store, &pending.key(), pending.window_start)?;
    }
    debug!(
        rate_limits = genesis.rate_limits.len(),
        blacklisted_denoms = genesis.blacklisted_denoms.len(),
        whitelisted_address_pairs = genesis.whitelisted_address_pairs.len(),
        pending_send_packets = genesis.pending_send_packets.len(),
        "initialized rate limit state"
    );
    Ok(())
}

/// Reads the full state out of `store`, every list in store key order.
pub fn export_genesis<S: Store>(store: &S) -> Result<GenesisState, RateLimitError> {
    Ok(GenesisState {
        rate_limits: RateLimitKeeper::get_all_rate_limits(store)?,
        whitelisted_address_pairs: RateLimitKeeper::get_all_whitelisted_address_pairs(store)?,
        blacklisted_denoms: RateLimitKeeper::get_all_blacklisted_denoms(store)?,
        pending_send_packets: RateLimitKeeper::get_all_pending_send_packets(store)?,
    })
}

#[cfg(test)]
mod tests {
    use ibc_core::host::types::identifiers::ChannelId;
    use ibc_core::primitives::prelude::*;
    use ibc_middleware_rate_limit_types::{
        Flow, PendingSendPacket, Quota, RateLimit, RateLimitKey, WhitelistedAddressPair,
    };
    use ibc_middleware_store::InMemoryStore;

    use super::*;

    fn rate_limit(denom: &str, channel: u64, outflow: u64) -> RateLimit {
        RateLimit {
            path: RateLimitKey::new(denom, ChannelId::new(channel)),
            quota: Quota::new(
                "5".parse().expect("valid decimal"),
                "2.5".parse().expect("valid decimal"),
                12,
            )
            .expect("valid quota"),
            flow: Flow {
                inflow: 0u64.into(),
                outflow: outflow.into(),
                window_start: 100,
                window_end: 200,
            },
        }
    }

    #[test_log::test]
    fn init_then_export() {
        let genesis = GenesisState {
            rate_limits: vec![rate_limit("uosmo", 0, 7), rate_limit("uatom", 2, 3)],
            whitelisted_address_pairs: vec![WhitelistedAddressPair::new(
                "alice".to_string().into(),
                "bob".to_string().into(),
            )],
            blacklisted_denoms: vec!["ujuno".to_string(), "uakt".to_string()],
            pending_send_packets: vec![
                PendingSendPacket {
                    channel_id: ChannelId::new(2),
                    sequence: 9.into(),
                    window_start: 100,
                },
                PendingSendPacket {
                    channel_id: ChannelId::new(0),
                    sequence: 10.into(),
                    window_start: 100,
                },
            ],
        };

        let mut store = InMemoryStore::default();
        init_genesis(&mut store, &genesis).expect("valid genesis");
        let exported = export_genesis(&store).expect("no error");

        let denoms: Vec<_> = exported
            .rate_limits
            .iter()
            .map(|limit| limit.path.denom.as_str())
            .collect();
        assert_eq!(denoms, vec!["uatom", "uosmo"]);
        assert_eq!(exported.rate_limits[0], genesis.rate_limits[1]);
        assert_eq!(exported.blacklisted_denoms, vec!["uakt", "ujuno"]);
        assert_eq!(
            exported.whitelisted_address_pairs,
            genesis.whitelisted_address_pairs
        );
        let channels: Vec<_> = exported
            .pending_send_packets
            .iter()
            .map(|pending| pending.channel_id.clone())
            .collect();
        assert_eq!(channels, vec![ChannelId::new(0), ChannelId::new(2)]);

        let mut reimported = InMemoryStore::default();
        init_genesis(&mut reimported, &exported).expect("valid genesis");
        assert_eq!(export_genesis(&reimported).expect("no error"), exported);
    }

    #[test]
    fn rejects_duplicate_rate_limits() {
        let genesis = GenesisState {
            rate_limits: vec![rate_limit("uatom", 0, 1), rate_limit("uatom", 0, 2)],
            ..Default::default()
        };
        let mut store = InMemoryStore::default();
        assert!(matches!(
            init_genesis(&mut store, &genesis),
            Err(RateLimitError::InvalidRateLimit { .. })
        ));
        assert!(store.is_empty());
    }
}
