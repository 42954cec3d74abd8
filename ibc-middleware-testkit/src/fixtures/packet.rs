use ibc_app_transfer_types::packet::PacketData;
use ibc_app_transfer_types::{Amount, PrefixedCoin};
use ibc_core::channel::types::packet::Packet;
use ibc_core::host::types::identifiers::{ChannelId, PortId, Sequence};
use ibc_proto::ibc::core::channel::v1::Packet as RawPacket;
use ibc_proto::ibc::core::client::v1::Height as RawHeight;
use serde_json::{json, Map, Value};
use typed_builder::TypedBuilder;

use crate::context::DEFAULT_HOST_TIMESTAMP;

/// Timeout of the received packets, one hour past the default host time.
pub const DEFAULT_PACKET_TIMEOUT: u64 = DEFAULT_HOST_TIMESTAMP + 3_600_000_000_000;

/// Configuration of an ICS-20 packet received by the mock host on
/// `chan_id_on_b`.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = Packet))]
pub struct TransferPacketConfig {
    #[builder(default = Sequence::from(1))]
    pub seq_on_a: Sequence,
    #[builder(default = PortId::transfer())]
    pub port_id_on_a: PortId,
    #[builder(default = ChannelId::new(0))]
    pub chan_id_on_a: ChannelId,
    #[builder(default = PortId::transfer())]
    pub port_id_on_b: PortId,
    #[builder(default = ChannelId::new(1))]
    pub chan_id_on_b: ChannelId,
    #[builder(default = "uatom".to_string(), setter(into))]
    pub denom: String,
    #[builder(default = 100u64.into(), setter(into))]
    pub amount: Amount,
    #[builder(default = "cosmos1sender".to_string(), setter(into))]
    pub sender: String,
    #[builder(default = "cosmos1receiver".to_string(), setter(into))]
    pub receiver: String,
    #[builder(default, setter(into))]
    pub memo: String,
    #[builder(default = Some((1, 1_000)))]
    pub timeout_height: Option<(u64, u64)>,
    #[builder(default = DEFAULT_PACKET_TIMEOUT)]
    pub timeout_timestamp: u64,
}

impl TransferPacketConfig {
    pub fn packet_data(&self) -> PacketData {
        PacketData {
            token: PrefixedCoin {
                denom: self.denom.parse().expect("valid denom"),
                amount: self.amount,
            },
            sender: self.sender.clone().into(),
            receiver: self.receiver.clone().into(),
            memo: self.memo.clone().into(),
        }
    }
}

impl From<TransferPacketConfig> for Packet {
    fn from(config: TransferPacketConfig) -> Self {
        let data = serde_json::to_vec(&config.packet_data()).expect("infallible serialization");
        Packet::try_from(RawPacket {
            sequence: config.seq_on_a.value(),
            source_port: config.port_id_on_a.to_string(),
            source_channel: config.chan_id_on_a.to_string(),
            destination_port: config.port_id_on_b.to_string(),
            destination_channel: config.chan_id_on_b.to_string(),
            data,
            timeout_height: config
                .timeout_height
                .map(|(revision_number, revision_height)| RawHeight {
                    revision_number,
                    revision_height,
                }),
            timeout_timestamp: config.timeout_timestamp,
        })
        .expect("valid packet")
    }
}

/// Configuration of the forward instructions of an ICS-20 memo.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = String))]
pub struct ForwardMemoConfig {
    #[builder(default = "cosmos1final".to_string(), setter(into))]
    pub receiver: String,
    #[builder(default = PortId::transfer())]
    pub port: PortId,
    #[builder(default = ChannelId::new(2))]
    pub channel: ChannelId,
    /// Either nanoseconds or a duration string.
    #[builder(default, setter(strip_option))]
    pub timeout: Option<Value>,
    #[builder(default, setter(strip_option))]
    pub retries: Option<u8>,
    #[builder(default, setter(strip_option))]
    pub next: Option<Value>,
}

impl From<ForwardMemoConfig> for String {
    fn from(config: ForwardMemoConfig) -> Self {
        let mut forward = Map::new();
        forward.insert("receiver".to_string(), json!(config.receiver));
        forward.insert("port".to_string(), json!(config.port.as_str()));
        forward.insert("channel".to_string(), json!(config.channel.as_str()));
        if let Some(timeout) = config.timeout {
            forward.insert("timeout".to_string(), timeout);
        }
        if let Some(retries) = config.retries {
            forward.insert("retries".to_string(), json!(retries));
        }
        if let Some(next) = config.next {
            forward.insert("next".to_string(), next);
        }
        json!({ "forward": forward }).to_string()
    }
}

#[cfg(test)]
mod tests {
    use ibc_middleware_packet_forward::types::ForwardMetadata;

    use super::*;

    #[test]
    fn memo_carries_forward_metadata() {
        let memo: String = ForwardMemoConfig::builder()
            .retries(2)
            .timeout(json!("10m"))
            .next(json!({"forward": {"receiver": "cosmos1last", "port": "transfer", "channel": "channel-7"}}))
            .build();
        let metadata = ForwardMetadata::from_memo(&memo)
            .expect("valid metadata")
            .expect("forward memo");
        assert_eq!(metadata.channel, ChannelId::new(2));
        assert_eq!(metadata.retries, Some(2));
        assert_eq!(metadata.timeout, Some(600_000_000_000));
        assert!(metadata.next.is_some());
    }

    #[test]
    fn packet_from_config() {
        let packet: Packet = TransferPacketConfig::builder()
            .seq_on_a(Sequence::from(4))
            .amount(250u64)
            .build();
        assert_eq!(packet.seq_on_a, Sequence::from(4));
        let data: PacketData = serde_json::from_slice(&packet.data).expect("ICS-20 data");
        assert_eq!(data.token.amount, Amount::from(250u64));
        assert_eq!(data.sender.as_ref(), "cosmos1sender");
    }
}
