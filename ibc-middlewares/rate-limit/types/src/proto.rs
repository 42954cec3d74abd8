//! Raw protobuf messages of the `ratelimit.v1` state.
//!
//! Amounts and percentages travel as base ten strings.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Path {
    #[prost(string, tag = "1")]
    pub denom: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub channel_id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Quota {
    #[prost(string, tag = "1")]
    pub max_percent_send: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub max_percent_recv: ::prost::alloc::string::String,
    #[prost(uint64, tag = "3")]
    pub duration_hours: u64,
}

/// Tag 3 held the channel value, which is now read from the host on every
/// check.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Flow {
    #[prost(string, tag = "1")]
    pub inflow: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub outflow: ::prost::alloc::string::String,
    #[prost(uint64, tag = "4")]
    pub window_start: u64,
    #[prost(uint64, tag = "5")]
    pub window_end: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RateLimit {
    #[prost(message, optional, tag = "1")]
    pub path: ::core::option::Option<Path>,
    #[prost(message, optional, tag = "2")]
    pub quota: ::core::option::Option<Quota>,
    #[prost(message, optional, tag = "3")]
    pub flow: ::core::option::Option<Flow>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WhitelistedAddressPair {
    #[prost(string, tag = "1")]
    pub sender: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub receiver: ::prost::alloc::string::String,
}

/// Marker of a send counted in the window starting at `window_start`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PendingSendPacket {
    #[prost(string, tag = "1")]
    pub channel_id: ::prost::alloc::string::String,
    #[prost(uint64, tag = "2")]
    pub sequence: u64,
    #[prost(uint64, tag = "3")]
    pub window_start: u64,
}

/// Tag 1 is reserved for the (empty) module params.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GenesisState {
    #[prost(message, repeated, tag = "2")]
    pub rate_limits: ::prost::alloc::vec::Vec<RateLimit>,
    #[prost(message, repeated, tag = "3")]
    pub whitelisted_address_pairs: ::prost::alloc::vec::Vec<WhitelistedAddressPair>,
    #[prost(string, repeated, tag = "4")]
    pub blacklisted_denoms: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(message, repeated, tag = "5")]
    pub pending_send_packets: ::prost::alloc::vec::Vec<PendingSendPacket>,
}
