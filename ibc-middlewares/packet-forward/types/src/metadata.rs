//! Parsing of the forward instructions carried in the memo of an ICS-20
//! transfer:
//!
//! ```json
//! {"forward":{"receiver":"addr","port":"transfer","channel":"channel-1","timeout":"10m","retries":2,"next":{...}}}
//! ```
use ibc_core::host::types::identifiers::{ChannelId, PortId};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_middleware_primitives::parse_duration;
use serde::Deserialize;
use serde_json::Value;

use crate::error::PacketForwardError;
use crate::FORWARD_MEMO_KEY;

/// Instructions on where to forward a received transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForwardMetadata {
    /// Receiver on the next chain.
    pub receiver: Signer,
    /// Port on this chain to forward on.
    pub port: PortId,
    /// Channel on this chain to forward on.
    pub channel: ChannelId,
    /// Relative timeout in nanoseconds.
    pub timeout: Option<u64>,
    pub retries: Option<u8>,
    /// Memo of the forwarded transfer, as compact JSON.
    pub next: Option<String>,
}

#[derive(Deserialize)]
struct RawForwardMetadata {
    #[serde(default)]
    receiver: String,
    #[serde(default)]
    port: String,
    #[serde(default)]
    channel: String,
    #[serde(default)]
    timeout: Value,
    #[serde(default)]
    retries: Option<u8>,
    #[serde(default)]
    next: Value,
}

fn invalid(reason: impl Into<String>) -> PacketForwardError {
    PacketForwardError::InvalidForwardMetadata {
        reason: reason.into(),
    }
}

impl ForwardMetadata {
    /// Extracts the forward metadata of an ICS-20 memo.
    ///
    /// Returns `Ok(None)` if the memo is not a JSON object with a `forward`
    /// entry, in which case the transfer is not meant to be forwarded.
    pub fn from_memo(memo: &str) -> Result<Option<Self>, PacketForwardError> {
        let Ok(Value::Object(mut memo)) = serde_json::from_str::<Value>(memo) else {
            return Ok(None);
        };
        let Some(forward) = memo.remove(FORWARD_MEMO_KEY) else {
            return Ok(None);
        };

        let raw: RawForwardMetadata =
            serde_json::from_value(forward).map_err(|e| invalid(e.to_string()))?;
        Self::try_from(raw).map(Some)
    }
}

impl TryFrom<RawForwardMetadata> for ForwardMetadata {
    type Error = PacketForwardError;

    fn try_from(raw: RawForwardMetadata) -> Result<Self, Self::Error> {
        if raw.receiver.is_empty() {
            return Err(invalid("receiver cannot be empty"));
        }

        let timeout = match raw.timeout {
            Value::Null => None,
            Value::Number(nanos) => Some(
                nanos
                    .as_u64()
                    .ok_or_else(|| invalid(format!("invalid timeout `{nanos}`")))?,
            ),
            Value::String(duration) => Some(parse_duration(&duration)?),
            other => return Err(invalid(format!("invalid timeout `{other}`"))),
        };

        let next = match raw.next {
            Value::Null => None,
            next @ Value::Object(_) => Some(next.to_string()),
            // a string must itself hold a JSON object
            Value::String(next) => match serde_json::from_str::<Value>(&next) {
                Ok(next @ Value::Object(_)) => Some(next.to_string()),
                _ => return Err(invalid(format!("invalid next memo `{next}`"))),
            },
            other => return Err(invalid(format!("invalid next memo `{other}`"))),
        };

        Ok(Self {
            receiver: raw.receiver.into(),
            port: raw.port.parse()?,
            channel: raw.channel.parse()?,
            timeout,
            retries: raw.retries,
            next,
        })
    }
}
