//! Byte encodings of the composite keys of the rate limit state.
//!
//! Every variable length part is prefixed with its length as a big-endian
//! `u32`, so distinct keys never share an encoding; sequences are appended
//! as big-endian `u64` so they sort numerically.
use core::str::FromStr;

use ibc_core::host::types::identifiers::{ChannelId, Sequence};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;

use crate::error::RateLimitError;

const LENGTH_PREFIX_SIZE: usize = 4;
const SEQUENCE_SIZE: usize = 8;

fn push_part(buf: &mut Vec<u8>, part: &[u8]) {
    // identifiers and denoms are far below 4 GiB
    let len = u32::try_from(part.len()).unwrap_or(u32::MAX);
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(part);
}

/// Reads back the parts written by [`push_part`].
struct KeyReader<'a> {
    key: &'a [u8],
    rest: &'a [u8],
}

impl<'a> KeyReader<'a> {
    fn new(key: &'a [u8]) -> Self {
        Self { key, rest: key }
    }

    fn error(&self, reason: &str) -> RateLimitError {
        RateLimitError::InvalidKey {
            key: String::from_utf8_lossy(self.key).into_owned(),
            reason: reason.to_string(),
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], RateLimitError> {
        if self.rest.len() < len {
            return Err(self.error("unexpected end of data"));
        }
        let (taken, rest) = self.rest.split_at(len);
        self.rest = rest;
        Ok(taken)
    }

    fn part(&mut self) -> Result<&'a [u8], RateLimitError> {
        let mut len = [0; LENGTH_PREFIX_SIZE];
        len.copy_from_slice(self.take(LENGTH_PREFIX_SIZE)?);
        let len = usize::try_from(u32::from_be_bytes(len))
            .map_err(|_| self.error("length overflow"))?;
        if len > self.rest.len() {
            return Err(self.error("length overflow"));
        }
        self.take(len)
    }

    fn str_part(&mut self) -> Result<&'a str, RateLimitError> {
        let part = self.part()?;
        core::str::from_utf8(part).map_err(|_| self.error("part is not valid UTF-8"))
    }

    fn u64(&mut self) -> Result<u64, RateLimitError> {
        let mut bytes = [0; SEQUENCE_SIZE];
        bytes.copy_from_slice(self.take(SEQUENCE_SIZE)?);
        Ok(u64::from_be_bytes(bytes))
    }

    fn finish(self) -> Result<(), RateLimitError> {
        if self.rest.is_empty() {
            Ok(())
        } else {
            Err(self.error("trailing bytes"))
        }
    }
}

/// Identifies the rate limit of a denom on a channel.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RateLimitKey {
    pub denom: String,
    pub channel_id: ChannelId,
}

impl RateLimitKey {
    pub fn new(denom: impl Into<String>, channel_id: ChannelId) -> Self {
        Self {
            denom: denom.into(),
            channel_id,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        push_part(&mut buf, self.denom.as_bytes());
        push_part(&mut buf, self.channel_id.as_str().as_bytes());
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RateLimitError> {
        let mut reader = KeyReader::new(bytes);
        let denom = reader.str_part()?.to_string();
        let channel_id = ChannelId::from_str(reader.str_part()?)?;
        reader.finish()?;
        Ok(Self { denom, channel_id })
    }
}

/// Identifies a send counted against a quota window.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PendingSendPacketKey {
    pub channel_id: ChannelId,
    pub sequence: Sequence,
}

impl PendingSendPacketKey {
    pub fn new(channel_id: ChannelId, sequence: Sequence) -> Self {
        Self {
            channel_id,
            sequence,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        push_part(&mut buf, self.channel_id.as_str().as_bytes());
        buf.extend_from_slice(&self.sequence.value().to_be_bytes());
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RateLimitError> {
        let mut reader = KeyReader::new(bytes);
        let channel_id = ChannelId::from_str(reader.str_part()?)?;
        let sequence = Sequence::from(reader.u64()?);
        reader.finish()?;
        Ok(Self {
            channel_id,
            sequence,
        })
    }
}

/// Encodes a sender and receiver pair.
pub fn address_pair_to_bytes(sender: &Signer, receiver: &Signer) -> Vec<u8> {
    let mut buf = Vec::new();
    push_part(&mut buf, sender.as_ref().as_bytes());
    push_part(&mut buf, receiver.as_ref().as_bytes());
    buf
}

/// Decodes the output of [`address_pair_to_bytes`].
pub fn address_pair_from_bytes(bytes: &[u8]) -> Result<(Signer, Signer), RateLimitError> {
    let mut reader = KeyReader::new(bytes);
    let sender = reader.str_part()?.to_string();
    let receiver = reader.str_part()?.to_string();
    reader.finish()?;
    Ok((sender.into(), receiver.into()))
}
