//! Defines the context traits the host implements to run the packet forward
//! middleware
use ibc_app_transfer_types::packet::PacketData;
use ibc_app_transfer_types::{Memo, PrefixedCoin};
use ibc_core::channel::types::acknowledgement::Acknowledgement;
use ibc_core::channel::types::packet::Packet;
use ibc_core::host::types::identifiers::{ChannelId, PortId, Sequence};
use ibc_core::primitives::Signer;
use ibc_core::router::types::module::ModuleExtras;
use ibc_middleware_packet_forward_types::error::PacketForwardError;
use ibc_middleware_packet_forward_types::{
    InFlightPacket, DEFAULT_FORWARD_RETRIES, DEFAULT_FORWARD_TIMEOUT,
};
use ibc_middleware_store::Store;

/// An ICS-20 transfer the middleware asks the host to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForwardTransfer {
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub token: PrefixedCoin,
    pub sender: Signer,
    pub receiver: Signer,
    pub memo: Memo,
    /// Absolute timeout timestamp, in nanoseconds, on the receiving chain.
    pub timeout_timestamp_on_b: u64,
}

/// Methods required by the packet forward middleware to validate packets,
/// to be implemented by the host
pub trait PacketForwardValidationContext {
    type Store: Store;

    /// Store holding the in-flight packets and the middleware params.
    fn store(&self) -> &Self::Store;

    /// Current host time in nanoseconds since the Unix epoch.
    fn host_timestamp(&self) -> Result<u64, PacketForwardError>;

    /// Returns the intermediate account that receives the funds of a
    /// transfer forwarded on `channel` before they are sent to the next hop.
    fn override_receiver(
        &self,
        channel: &ChannelId,
        original_sender: &Signer,
    ) -> Result<Signer, PacketForwardError>;

    /// Whether the forward of `packet` must not be refunded once its retries
    /// are exhausted.
    fn is_nonrefundable(&self, _packet: &Packet, _data: &PacketData) -> bool {
        false
    }

    /// Retries applied when the forward memo does not specify any.
    fn default_forward_retries(&self) -> u8 {
        DEFAULT_FORWARD_RETRIES
    }

    /// Relative timeout, in nanoseconds, applied when the forward memo does
    /// not specify one.
    fn default_forward_timeout(&self) -> u64 {
        DEFAULT_FORWARD_TIMEOUT
    }
}

/// Methods required by the packet forward middleware to execute packet
/// callbacks, to be implemented by the host
pub trait PacketForwardExecutionContext: PacketForwardValidationContext {
    fn store_mut(&mut self) -> &mut Self::Store;

    /// Runs the receive callback of the wrapped application.
    fn next_on_recv_packet_execute(
        &mut self,
        packet: &Packet,
        relayer: &Signer,
    ) -> (ModuleExtras, Option<Acknowledgement>);

    /// Runs the acknowledgement callback of the wrapped application.
    fn next_on_acknowledgement_packet_execute(
        &mut self,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        relayer: &Signer,
    ) -> (ModuleExtras, Result<(), PacketForwardError>);

    /// Runs the timeout callback of the wrapped application.
    fn next_on_timeout_packet_execute(
        &mut self,
        packet: &Packet,
        relayer: &Signer,
    ) -> (ModuleExtras, Result<(), PacketForwardError>);

    /// Sends an ICS-20 transfer, returning the sequence of the sent packet.
    fn send_transfer_execute(
        &mut self,
        transfer: ForwardTransfer,
    ) -> Result<Sequence, PacketForwardError>;

    /// Gives the tokens of a failed forwarded `packet` back to its sender,
    /// the intermediate account.
    fn receive_refund_execute(
        &mut self,
        packet: &Packet,
        data: &PacketData,
    ) -> Result<(), PacketForwardError>;

    /// Settles the funds held by the intermediate account so that the
    /// previous hop can refund the original sender of `packet`: escrowed
    /// back on the refund channel if this chain is the token's source,
    /// burned otherwise.
    fn send_refund_execute(&mut self, packet: &InFlightPacket) -> Result<(), PacketForwardError>;

    /// Moves the forwarding fee out of the intermediate account `payer`.
    fn send_fee_execute(
        &mut self,
        payer: &Signer,
        fee: &PrefixedCoin,
    ) -> Result<(), PacketForwardError>;

    /// Commits the acknowledgement of a packet received by this chain and
    /// emits the matching events.
    fn write_ack_and_events(
        &mut self,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
    ) -> Result<(), PacketForwardError>;
}
