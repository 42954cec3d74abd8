//! Raw protobuf messages of the `packetforward.v1` genesis.
//!
//! Map fields are modeled as repeated entry messages, and the fields that are
//! always emitted on the wire are either messages or never hold a default
//! value.

/// Genesis state of the packet forward middleware.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GenesisState {
    #[prost(message, optional, tag = "1")]
    pub params: ::core::option::Option<Params>,
    #[prost(message, repeated, tag = "2")]
    pub in_flight_packets: ::prost::alloc::vec::Vec<InFlightPacketEntry>,
}

/// An entry of the `in_flight_packets` map.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InFlightPacketEntry {
    #[prost(string, tag = "1")]
    pub key: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub value: ::core::option::Option<InFlightPacket>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Params {
    /// `LegacyDec` encoded as its scaled integer.
    #[prost(string, tag = "1")]
    pub fee_percentage: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InFlightPacket {
    #[prost(string, tag = "1")]
    pub original_sender_address: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub refund_channel_id: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub refund_port_id: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub packet_src_channel_id: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub packet_src_port_id: ::prost::alloc::string::String,
    #[prost(uint64, tag = "6")]
    pub packet_timeout_timestamp: u64,
    #[prost(string, tag = "7")]
    pub packet_timeout_height: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "8")]
    pub packet_data: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint64, tag = "9")]
    pub refund_sequence: u64,
    #[prost(int32, tag = "10")]
    pub retries_remaining: i32,
    #[prost(uint64, tag = "11")]
    pub timeout: u64,
    #[prost(bool, tag = "12")]
    pub nonrefundable: bool,
}
