use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_proto::Protobuf;

use crate::error::RateLimitError;
use crate::proto::WhitelistedAddressPair as RawWhitelistedAddressPair;

/// A sender and receiver pair whose transfers bypass the rate limits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WhitelistedAddressPair {
    pub sender: Signer,
    pub receiver: Signer,
}

impl WhitelistedAddressPair {
    pub fn new(sender: Signer, receiver: Signer) -> Self {
        Self { sender, receiver }
    }
}

impl Protobuf<RawWhitelistedAddressPair> for WhitelistedAddressPair {}

impl TryFrom<RawWhitelistedAddressPair> for WhitelistedAddressPair {
    type Error = RateLimitError;

    fn try_from(raw: RawWhitelistedAddressPair) -> Result<Self, Self::Error> {
        if raw.sender.is_empty() || raw.receiver.is_empty() {
            return Err(RateLimitError::InvalidRateLimit {
                reason: "whitelisted address pair with an empty address".to_string(),
            });
        }
        Ok(Self::new(raw.sender.into(), raw.receiver.into()))
    }
}

impl From<WhitelistedAddressPair> for RawWhitelistedAddressPair {
    fn from(pair: WhitelistedAddressPair) -> Self {
        Self {
            sender: pair.sender.to_string(),
            receiver: pair.receiver.to_string(),
        }
    }
}
