use ibc_app_transfer_types::Amount;
use ibc_core::host::types::identifiers::{ChannelId, Sequence};
use ibc_middleware_rate_limit::genesis::{export_genesis, init_genesis};
use ibc_middleware_rate_limit::keeper::RateLimitKeeper;
use ibc_middleware_rate_limit::module::{on_send_packet_execute, on_timeout_packet_execute};
use ibc_middleware_rate_limit::types::proto::GenesisState as RawGenesisState;
use ibc_middleware_rate_limit::types::{GenesisState, RateLimitKey};
use ibc_middleware_testkit::context::MockContextConfig;
use ibc_middleware_testkit::fixtures::{RateLimitConfig, TransferPacketConfig};
use ibc_proto::Protobuf;

#[test_log::test]
fn pending_sends_survive_export_and_import() {
    let channel_values = [("uatom".to_string(), Amount::from(1_000u64))];
    let genesis = GenesisState {
        rate_limits: vec![RateLimitConfig::builder().build()],
        blacklisted_denoms: vec!["ujuno".to_string()],
        ..Default::default()
    };

    let mut ctx = MockContextConfig::builder()
        .channel_values(channel_values.clone().into())
        .build();
    init_genesis(&mut ctx.store, &genesis).expect("valid genesis");

    let packet = TransferPacketConfig::builder()
        .seq_on_a(Sequence::from(4))
        .amount(80u64)
        .build();
    on_send_packet_execute(&mut ctx, &packet).expect("within quota");

    let exported = export_genesis(&ctx.store).expect("no error");
    assert_eq!(exported.pending_send_packets.len(), 1);
    assert_eq!(exported.blacklisted_denoms, genesis.blacklisted_denoms);

    let bytes = Protobuf::<RawGenesisState>::encode_vec(exported.clone());
    let decoded =
        <GenesisState as Protobuf<RawGenesisState>>::decode_vec(&bytes).expect("valid encoding");
    assert_eq!(decoded, exported);

    let mut restored = MockContextConfig::builder()
        .host_timestamp(ctx.host_timestamp)
        .channel_values(channel_values.into())
        .build();
    init_genesis(&mut restored.store, &decoded).expect("valid genesis");

    on_timeout_packet_execute(&mut restored, &packet).expect("no error");
    let flow = RateLimitKeeper::get_rate_limit(
        &restored.store,
        &RateLimitKey::new("uatom", ChannelId::new(0)),
    )
    .expect("no error")
    .expect("rate limit exists")
    .flow;
    assert_eq!(flow.outflow, Amount::from(0u64));
    assert!(export_genesis(&restored.store)
        .expect("no error")
        .pending_send_packets
        .is_empty());
}
