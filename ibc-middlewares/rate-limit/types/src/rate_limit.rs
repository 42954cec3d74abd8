use ibc_core::primitives::prelude::*;
use ibc_proto::Protobuf;

use crate::error::RateLimitError;
use crate::proto::{Path as RawPath, RateLimit as RawRateLimit};
use crate::{Flow, Quota, RateLimitKey};

/// The quota of a denom on a channel together with its current flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimit {
    pub path: RateLimitKey,
    pub quota: Quota,
    pub flow: Flow,
}

impl RateLimit {
    /// A rate limit whose first window opens with its first transfer.
    pub fn new(path: RateLimitKey, quota: Quota) -> Self {
        Self {
            path,
            quota,
            flow: Flow::default(),
        }
    }
}

impl TryFrom<RawPath> for RateLimitKey {
    type Error = RateLimitError;

    fn try_from(raw: RawPath) -> Result<Self, Self::Error> {
        if raw.denom.is_empty() {
            return Err(RateLimitError::InvalidRateLimit {
                reason: "empty denom".to_string(),
            });
        }
        Ok(Self::new(raw.denom, raw.channel_id.parse()?))
    }
}

impl From<RateLimitKey> for RawPath {
    fn from(key: RateLimitKey) -> Self {
        Self {
            denom: key.denom,
            channel_id: key.channel_id.to_string(),
        }
    }
}

impl Protobuf<RawRateLimit> for RateLimit {}

impl TryFrom<RawRateLimit> for RateLimit {
    type Error = RateLimitError;

    fn try_from(raw: RawRateLimit) -> Result<Self, Self::Error> {
        let missing = |field: &str| RateLimitError::InvalidRateLimit {
            reason: format!("missing {field}"),
        };
        Ok(Self {
            path: raw.path.ok_or_else(|| missing("path"))?.try_into()?,
            quota: raw.quota.ok_or_else(|| missing("quota"))?.try_into()?,
            flow: raw.flow.map(Flow::try_from).transpose()?.unwrap_or_default(),
        })
    }
}

impl From<RateLimit> for RawRateLimit {
    fn from(rate_limit: RateLimit) -> Self {
        Self {
            path: Some(rate_limit.path.into()),
            quota: Some(rate_limit.quota.into()),
            flow: Some(rate_limit.flow.into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use ibc_core::host::types::identifiers::ChannelId;

    use super::*;
    use crate::proto::Quota as RawQuota;

    pub(crate) fn dummy_rate_limit(denom: &str, channel: u64) -> RateLimit {
        RateLimit {
            path: RateLimitKey::new(denom, ChannelId::new(channel)),
            quota: Quota {
                max_percent_send: "10".parse().expect("valid decimal"),
                max_percent_recv: "5".parse().expect("valid decimal"),
                duration_hours: 24,
            },
            flow: Flow {
                inflow: 7u64.into(),
                outflow: 3u64.into(),
                window_start: 1_000,
                window_end: 2_000,
            },
        }
    }

    #[test]
    fn protobuf_roundtrip() {
        let rate_limit = dummy_rate_limit("uatom", 4);
        let bytes = Protobuf::<RawRateLimit>::encode_vec(rate_limit.clone());
        let decoded =
            <RateLimit as Protobuf<RawRateLimit>>::decode_vec(&bytes).expect("valid encoding");
        assert_eq!(decoded, rate_limit);
    }

    #[test]
    fn missing_flow_is_an_unopened_window() {
        let raw = RawRateLimit {
            path: Some(RawPath {
                denom: "uatom".to_string(),
                channel_id: "channel-0".to_string(),
            }),
            quota: Some(RawQuota {
                max_percent_send: "10".to_string(),
                max_percent_recv: "0".to_string(),
                duration_hours: 1,
            }),
            flow: None,
        };
        let rate_limit = RateLimit::try_from(raw).expect("valid rate limit");
        assert_eq!(rate_limit.flow, Flow::default());
    }

    #[test]
    fn rejects_incomplete_records() {
        let mut raw = RawRateLimit::from(dummy_rate_limit("uatom", 0));
        raw.quota = None;
        assert!(matches!(
            RateLimit::try_from(raw),
            Err(RateLimitError::InvalidRateLimit { .. })
        ));

        let mut raw = RawRateLimit::from(dummy_rate_limit("uatom", 0));
        if let Some(path) = raw.path.as_mut() {
            path.channel_id = "not a channel".to_string();
        }
        assert!(matches!(
            RateLimit::try_from(raw),
            Err(RateLimitError::InvalidIdentifier(_))
        ));
    }
}
