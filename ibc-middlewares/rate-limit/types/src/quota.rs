use ibc_app_transfer_types::Amount;
use ibc_core::primitives::prelude::*;
use ibc_middleware_primitives::{Dec, NANOS_PER_SECOND, U256};
use ibc_proto::Protobuf;

use crate::error::RateLimitError;
use crate::proto::Quota as RawQuota;
use crate::PacketDirection;

const NANOS_PER_HOUR: u64 = 60 * 60 * NANOS_PER_SECOND;

/// Share of the channel value that may flow in each direction within a
/// window of `duration_hours`.
///
/// Percentages are expressed in percent units: `10` allows 10% of the
/// channel value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quota {
    pub max_percent_send: Dec,
    pub max_percent_recv: Dec,
    pub duration_hours: u64,
}

impl Quota {
    pub fn new(
        max_percent_send: Dec,
        max_percent_recv: Dec,
        duration_hours: u64,
    ) -> Result<Self, RateLimitError> {
        let quota = Self {
            max_percent_send,
            max_percent_recv,
            duration_hours,
        };
        quota.validate()?;
        Ok(quota)
    }

    pub fn validate(&self) -> Result<(), RateLimitError> {
        let hundred = Dec::from_integer(100);
        if self.max_percent_send > hundred || self.max_percent_recv > hundred {
            return Err(RateLimitError::InvalidQuota {
                reason: "percentages must be between 0 and 100".to_string(),
            });
        }
        if self.max_percent_send.is_zero() && self.max_percent_recv.is_zero() {
            return Err(RateLimitError::InvalidQuota {
                reason: "at least one of the send or receive percentages must be non-zero"
                    .to_string(),
            });
        }
        if self.duration_hours == 0 {
            return Err(RateLimitError::InvalidQuota {
                reason: "duration must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn max_percent(&self, direction: PacketDirection) -> Dec {
        match direction {
            PacketDirection::Send => self.max_percent_send,
            PacketDirection::Recv => self.max_percent_recv,
        }
    }

    /// `floor(channel_value × percent / 100)` for the given direction.
    pub fn threshold(
        &self,
        direction: PacketDirection,
        channel_value: Amount,
    ) -> Result<Amount, RateLimitError> {
        let scaled = self
            .max_percent(direction)
            .mul_truncate(*channel_value.as_ref())?;
        Ok(Amount::from(scaled / U256::from(100u64)))
    }

    /// Window length in nanoseconds, saturating for absurd durations.
    pub fn duration_nanos(&self) -> u64 {
        self.duration_hours.saturating_mul(NANOS_PER_HOUR)
    }
}

impl Protobuf<RawQuota> for Quota {}

impl TryFrom<RawQuota> for Quota {
    type Error = RateLimitError;

    fn try_from(raw: RawQuota) -> Result<Self, Self::Error> {
        let parse = |percent: &str| {
            percent.parse::<Dec>().map_err(|e| RateLimitError::InvalidQuota {
                reason: e.to_string(),
            })
        };
        Self::new(
            parse(&raw.max_percent_send)?,
            parse(&raw.max_percent_recv)?,
            raw.duration_hours,
        )
    }
}

impl From<Quota> for RawQuota {
    fn from(quota: Quota) -> Self {
        Self {
            max_percent_send: quota.max_percent_send.to_trimmed_string(),
            max_percent_recv: quota.max_percent_recv.to_trimmed_string(),
            duration_hours: quota.duration_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn quota(send: &str, recv: &str, hours: u64) -> Quota {
        Quota {
            max_percent_send: send.parse().expect("valid decimal"),
            max_percent_recv: recv.parse().expect("valid decimal"),
            duration_hours: hours,
        }
    }

    #[rstest]
    #[case("10", 1000, 100)]
    #[case("10", 999, 99)]
    #[case("0.5", 1000, 5)]
    #[case("33.333", 10, 3)]
    #[case("100", 7, 7)]
    #[case("0", 1000, 0)]
    fn truncating_threshold(#[case] percent: &str, #[case] value: u64, #[case] expected: u64) {
        let quota = quota(percent, "1", 24);
        assert_eq!(
            quota
                .threshold(PacketDirection::Send, value.into())
                .expect("no overflow"),
            Amount::from(expected)
        );
    }

    #[test]
    fn threshold_per_direction() {
        let quota = quota("10", "20", 24);
        assert_eq!(
            quota
                .threshold(PacketDirection::Recv, 1000u64.into())
                .expect("no overflow"),
            Amount::from(200u64)
        );
        assert_eq!(quota.duration_nanos(), 24 * NANOS_PER_HOUR);
    }

    #[rstest]
    #[case("101", "0", 1)]
    #[case("0", "100.5", 1)]
    #[case("0", "0", 1)]
    #[case("10", "10", 0)]
    fn rejects_invalid(#[case] send: &str, #[case] recv: &str, #[case] hours: u64) {
        assert!(matches!(
            quota(send, recv, hours).validate(),
            Err(RateLimitError::InvalidQuota { .. })
        ));
    }

    #[test]
    fn wire_form_keeps_integral_percentages() {
        let raw = RawQuota::from(quota("10", "2.5", 24));
        assert_eq!(raw.max_percent_send, "10");
        assert_eq!(raw.max_percent_recv, "2.5");
        assert_eq!(Quota::try_from(raw).expect("valid quota"), quota("10", "2.5", 24));
    }
}
