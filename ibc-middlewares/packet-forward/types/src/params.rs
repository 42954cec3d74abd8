use ibc_core::primitives::prelude::*;
use ibc_middleware_primitives::Dec;
use ibc_proto::Protobuf;

use crate::error::PacketForwardError;
use crate::proto::Params as RawParams;

/// On-chain parameters of the packet forward middleware.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    /// Share of every forwarded amount taken as a fee, in `[0, 1)`.
    pub fee_percentage: Dec,
}

impl Params {
    pub fn new(fee_percentage: Dec) -> Result<Self, PacketForwardError> {
        let params = Self { fee_percentage };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), PacketForwardError> {
        if self.fee_percentage >= Dec::one() {
            return Err(PacketForwardError::InvalidParams {
                reason: format!(
                    "fee percentage must be lower than 1, got {}",
                    self.fee_percentage
                ),
            });
        }
        Ok(())
    }
}

impl Protobuf<RawParams> for Params {}

impl TryFrom<RawParams> for Params {
    type Error = PacketForwardError;

    fn try_from(raw: RawParams) -> Result<Self, Self::Error> {
        let fee_percentage = Dec::from_scaled_str(&raw.fee_percentage).map_err(|e| {
            PacketForwardError::InvalidParams {
                reason: e.to_string(),
            }
        })?;
        Self::new(fee_percentage)
    }
}

impl From<Params> for RawParams {
    fn from(params: Params) -> Self {
        Self {
            fee_percentage: params.fee_percentage.to_scaled_string(),
        }
    }
}
