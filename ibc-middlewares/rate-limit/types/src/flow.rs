use ibc_app_transfer_types::Amount;
use ibc_core::primitives::prelude::*;
use ibc_proto::Protobuf;

use crate::error::RateLimitError;
use crate::proto::Flow as RawFlow;

/// Amounts that flowed through a channel within the window
/// `[window_start, window_end)`, in nanoseconds.
///
/// A zero `window_end` denotes a flow whose first window is yet to open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flow {
    pub inflow: Amount,
    pub outflow: Amount,
    pub window_start: u64,
    pub window_end: u64,
}

impl Default for Flow {
    fn default() -> Self {
        Self {
            inflow: Amount::from(0u64),
            outflow: Amount::from(0u64),
            window_start: 0,
            window_end: 0,
        }
    }
}

impl Flow {
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.window_end
    }

    /// Zeroes the flow and opens the window `[now, now + duration)`.
    pub fn roll_over(&mut self, now: u64, duration: u64) {
        self.inflow = Amount::from(0u64);
        self.outflow = Amount::from(0u64);
        self.window_start = now;
        self.window_end = now.saturating_add(duration);
    }

    /// Adds `amount` to the outflow if the result stays within `threshold`.
    /// On error the flow is left unchanged.
    pub fn add_outflow(&mut self, amount: Amount, threshold: Amount) -> Result<(), Amount> {
        self.outflow = checked_increase(self.outflow, amount, threshold)?;
        Ok(())
    }

    /// Adds `amount` to the inflow if the result stays within `threshold`.
    /// On error the flow is left unchanged.
    pub fn add_inflow(&mut self, amount: Amount, threshold: Amount) -> Result<(), Amount> {
        self.inflow = checked_increase(self.inflow, amount, threshold)?;
        Ok(())
    }

    /// Takes back `amount` of a send counted in this window.
    pub fn remove_outflow(&mut self, amount: Amount) -> Result<(), RateLimitError> {
        self.outflow = self
            .outflow
            .checked_sub(amount)
            .ok_or(RateLimitError::UnderflowOnUndo {
                amount,
                outflow: self.outflow,
            })?;
        Ok(())
    }
}

/// `current + amount`, or the exceeded `threshold` as the error.
fn checked_increase(current: Amount, amount: Amount, threshold: Amount) -> Result<Amount, Amount> {
    match current.checked_add(amount) {
        Some(total) if total <= threshold => Ok(total),
        _ => Err(threshold),
    }
}

fn parse_amount(amount: &str) -> Result<Amount, RateLimitError> {
    if amount.is_empty() {
        return Ok(Amount::from(0u64));
    }
    amount
        .parse()
        .map_err(|_| RateLimitError::InvalidAmount(amount.to_string()))
}

impl Protobuf<RawFlow> for Flow {}

impl TryFrom<RawFlow> for Flow {
    type Error = RateLimitError;

    fn try_from(raw: RawFlow) -> Result<Self, Self::Error> {
        Ok(Self {
            inflow: parse_amount(&raw.inflow)?,
            outflow: parse_amount(&raw.outflow)?,
            window_start: raw.window_start,
            window_end: raw.window_end,
        })
    }
}

impl From<Flow> for RawFlow {
    fn from(flow: Flow) -> Self {
        Self {
            inflow: flow.inflow.to_string(),
            outflow: flow.outflow.to_string(),
            window_start: flow.window_start,
            window_end: flow.window_end,
        }
    }
}
