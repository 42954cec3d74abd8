mod packet;
mod rate_limit;

pub use packet::*;
pub use rate_limit::*;

use ibc_core::channel::types::acknowledgement::{
    Acknowledgement, AcknowledgementStatus, StatusValue,
};
use ibc_core::primitives::Signer;

/// The ICS-20 success acknowledgement, `{"result":"AQ=="}`.
pub fn success_ack() -> Acknowledgement {
    AcknowledgementStatus::success(ibc_app_transfer_types::ack_success_b64()).into()
}

pub fn error_ack(reason: &str) -> Acknowledgement {
    AcknowledgementStatus::error(StatusValue::new(reason).expect("non-empty reason")).into()
}

pub fn relayer() -> Signer {
    "cosmos1relayer".to_string().into()
}
