use std::collections::BTreeMap;

use ibc_app_transfer_types::packet::PacketData;
use ibc_app_transfer_types::{Amount, PrefixedCoin};
use ibc_core::channel::types::acknowledgement::{Acknowledgement, AcknowledgementStatus};
use ibc_core::channel::types::packet::Packet;
use ibc_core::host::types::identifiers::{ChannelId, PortId, Sequence};
use ibc_core::primitives::Signer;
use ibc_core::router::types::event::ModuleEvent;
use ibc_core::router::types::module::ModuleExtras;
use ibc_middleware_packet_forward::context::{
    ForwardTransfer, PacketForwardExecutionContext, PacketForwardValidationContext,
};
use ibc_middleware_packet_forward::types::error::PacketForwardError;
use ibc_middleware_packet_forward::types::InFlightPacket;
use ibc_middleware_rate_limit::context::{RateLimitExecutionContext, RateLimitValidationContext};
use ibc_middleware_rate_limit::types::error::RateLimitError;
use ibc_middleware_store::{InMemoryStore, MainStore, Store};
use ibc_proto::ibc::core::channel::v1::Packet as RawPacket;
use tracing::debug;
use typed_builder::TypedBuilder;

use crate::fixtures::{error_ack, success_ack};

/// Host time the mock chain starts at: 2024-01-01T00:00:00Z.
pub const DEFAULT_HOST_TIMESTAMP: u64 = 1_704_067_200_000_000_000;

/// Channel of the next hop that receives the packets sent by the mock host.
pub const COUNTERPARTY_CHANNEL: u64 = 99;

pub type MockStore = MainStore<InMemoryStore>;

/// How the application wrapped by the middlewares answers received packets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NextAppAck {
    #[default]
    Success,
    Error(String),
    /// The application acknowledges asynchronously.
    Async,
}

/// Configuration of the [`MockContext`].
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = MockContext))]
pub struct MockContextConfig {
    #[builder(default = DEFAULT_HOST_TIMESTAMP)]
    pub host_timestamp: u64,
    /// Sequence of the first packet sent by the host.
    #[builder(default = 1)]
    pub next_sequence: u64,
    #[builder(default)]
    pub next_app_ack: NextAppAck,
    #[builder(default)]
    pub nonrefundable: bool,
    /// Value of each denom the rate limits are computed against. Missing
    /// denoms have no value.
    #[builder(default)]
    pub channel_values: BTreeMap<String, Amount>,
}

impl From<MockContextConfig> for MockContext {
    fn from(config: MockContextConfig) -> Self {
        Self {
            store: MockStore::default(),
            host_timestamp: config.host_timestamp,
            next_sequence: config.next_sequence,
            next_app_ack: config.next_app_ack,
            nonrefundable: config.nonrefundable,
            channel_values: config.channel_values,
            fail_send_transfer: false,
            fail_refund: false,
            received_packets: Vec::new(),
            acknowledged_packets: Vec::new(),
            timed_out_packets: Vec::new(),
            sent_transfers: Vec::new(),
            returned_refunds: Vec::new(),
            refunds: Vec::new(),
            fees: Vec::new(),
            written_acks: Vec::new(),
            events: Vec::new(),
        }
    }
}

/// A host chain running the middlewares over an in-memory store.
///
/// Host effects are recorded instead of moving funds, so that tests can
/// assert on exactly which effects an operation had.
#[derive(Debug)]
pub struct MockContext {
    pub store: MockStore,
    pub host_timestamp: u64,
    pub next_sequence: u64,
    pub next_app_ack: NextAppAck,
    pub nonrefundable: bool,
    pub channel_values: BTreeMap<String, Amount>,
    /// Makes every transfer sent by the host fail.
    pub fail_send_transfer: bool,
    /// Makes every refund settled by the host fail.
    pub fail_refund: bool,

    /// Packets handed to the wrapped application on receive.
    pub received_packets: Vec<Packet>,
    pub acknowledged_packets: Vec<Packet>,
    pub timed_out_packets: Vec<Packet>,
    pub sent_transfers: Vec<(Sequence, ForwardTransfer)>,
    /// Failed forwarded packets whose tokens went back to the intermediate
    /// account.
    pub returned_refunds: Vec<Packet>,
    pub refunds: Vec<InFlightPacket>,
    pub fees: Vec<(Signer, PrefixedCoin)>,
    pub written_acks: Vec<(Packet, Acknowledgement)>,
    pub events: Vec<ModuleEvent>,
}

impl Default for MockContext {
    fn default() -> Self {
        MockContextConfig::builder().build()
    }
}

impl MockContext {
    pub fn advance_time(&mut self, nanos: u64) {
        self.host_timestamp += nanos;
    }

    /// Makes the writes of the last operation permanent.
    pub fn commit(&mut self) {
        self.store.apply().expect("no error");
    }

    /// Discards the writes since the last commit.
    pub fn revert(&mut self) {
        self.store.reset().expect("no error");
    }

    /// The packet sent for the transfer with `sequence`, as the next hop
    /// receives it.
    pub fn sent_packet(&self, sequence: Sequence) -> Packet {
        let (_, transfer) = self
            .sent_transfers
            .iter()
            .find(|(sent, _)| *sent == sequence)
            .expect("transfer was sent");
        let data = PacketData {
            token: transfer.token.clone(),
            sender: transfer.sender.clone(),
            receiver: transfer.receiver.clone(),
            memo: transfer.memo.clone(),
        };
        Packet::try_from(RawPacket {
            sequence: sequence.value(),
            source_port: transfer.port_id_on_a.to_string(),
            source_channel: transfer.chan_id_on_a.to_string(),
            destination_port: PortId::transfer().to_string(),
            destination_channel: ChannelId::new(COUNTERPARTY_CHANNEL).to_string(),
            data: serde_json::to_vec(&data).expect("infallible serialization"),
            timeout_height: None,
            timeout_timestamp: transfer.timeout_timestamp_on_b,
        })
        .expect("valid packet")
    }

    /// The last packet sent by the host.
    pub fn last_sent_packet(&self) -> Packet {
        let (sequence, _) = self.sent_transfers.last().expect("a transfer was sent");
        self.sent_packet(*sequence)
    }
}

/// Intermediate account receiving the funds forwarded from `channel` on
/// behalf of `original_sender`.
pub fn intermediate_account(channel: &ChannelId, original_sender: &Signer) -> Signer {
    format!("pfm/{channel}/{original_sender}").into()
}

impl PacketForwardValidationContext for MockContext {
    type Store = MockStore;

    fn store(&self) -> &Self::Store {
        &self.store
    }

    fn host_timestamp(&self) -> Result<u64, PacketForwardError> {
        Ok(self.host_timestamp)
    }

    fn override_receiver(
        &self,
        channel: &ChannelId,
        original_sender: &Signer,
    ) -> Result<Signer, PacketForwardError> {
        Ok(intermediate_account(channel, original_sender))
    }

    fn is_nonrefundable(&self, _packet: &Packet, _data: &PacketData) -> bool {
        self.nonrefundable
    }
}

impl PacketForwardExecutionContext for MockContext {
    fn store_mut(&mut self) -> &mut Self::Store {
        &mut self.store
    }

    fn next_on_recv_packet_execute(
        &mut self,
        packet: &Packet,
        _relayer: &Signer,
    ) -> (ModuleExtras, Option<Acknowledgement>) {
        self.received_packets.push(packet.clone());
        let ack = match &self.next_app_ack {
            NextAppAck::Success => Some(success_ack()),
            NextAppAck::Error(reason) => Some(error_ack(reason)),
            NextAppAck::Async => None,
        };
        (ModuleExtras::empty(), ack)
    }

    fn next_on_acknowledgement_packet_execute(
        &mut self,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        _relayer: &Signer,
    ) -> (ModuleExtras, Result<(), PacketForwardError>) {
        let decoded = serde_json::from_slice::<AcknowledgementStatus>(acknowledgement.as_ref())
            .map(|_| ())
            .map_err(|_| PacketForwardError::AckDeserialization);
        self.acknowledged_packets.push(packet.clone());
        (ModuleExtras::empty(), decoded)
    }

    fn next_on_timeout_packet_execute(
        &mut self,
        packet: &Packet,
        _relayer: &Signer,
    ) -> (ModuleExtras, Result<(), PacketForwardError>) {
        self.timed_out_packets.push(packet.clone());
        (ModuleExtras::empty(), Ok(()))
    }

    fn send_transfer_execute(
        &mut self,
        transfer: ForwardTransfer,
    ) -> Result<Sequence, PacketForwardError> {
        if self.fail_send_transfer {
            return Err(PacketForwardError::host("transfer failed"));
        }
        let sequence = Sequence::from(self.next_sequence);
        self.next_sequence += 1;
        debug!(%sequence, channel = %transfer.chan_id_on_a, "sending transfer");
        self.sent_transfers.push((sequence, transfer));
        Ok(sequence)
    }

    fn receive_refund_execute(
        &mut self,
        packet: &Packet,
        _data: &PacketData,
    ) -> Result<(), PacketForwardError> {
        self.returned_refunds.push(packet.clone());
        Ok(())
    }

    fn send_refund_execute(&mut self, packet: &InFlightPacket) -> Result<(), PacketForwardError> {
        if self.fail_refund {
            return Err(PacketForwardError::host("refund failed"));
        }
        self.refunds.push(packet.clone());
        Ok(())
    }

    fn send_fee_execute(
        &mut self,
        payer: &Signer,
        fee: &PrefixedCoin,
    ) -> Result<(), PacketForwardError> {
        self.fees.push((payer.clone(), fee.clone()));
        Ok(())
    }

    fn write_ack_and_events(
        &mut self,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
    ) -> Result<(), PacketForwardError> {
        self.written_acks
            .push((packet.clone(), acknowledgement.clone()));
        Ok(())
    }
}

impl RateLimitValidationContext for MockContext {
    type Store = MockStore;

    fn store(&self) -> &Self::Store {
        &self.store
    }

    fn host_timestamp(&self) -> Result<u64, RateLimitError> {
        Ok(self.host_timestamp)
    }

    fn channel_value(&self, denom: &str) -> Result<Amount, RateLimitError> {
        Ok(self
            .channel_values
            .get(denom)
            .copied()
            .unwrap_or_else(|| Amount::from(0u64)))
    }
}

impl RateLimitExecutionContext for MockContext {
    fn store_mut(&mut self) -> &mut Self::Store {
        &mut self.store
    }

    fn emit_event(&mut self, event: ModuleEvent) -> Result<(), RateLimitError> {
        self.events.push(event);
        Ok(())
    }
}
