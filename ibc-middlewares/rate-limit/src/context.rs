//! Defines the context traits the host implements to run the rate limit
//! middleware
use ibc_app_transfer_types::Amount;
use ibc_core::router::types::event::ModuleEvent;
use ibc_middleware_rate_limit_types::error::RateLimitError;
use ibc_middleware_store::Store;

pub trait RateLimitValidationContext {
    type Store: Store;

    /// Store holding the rate limits, the blacklist, the whitelist and the
    /// pending send markers.
    fn store(&self) -> &Self::Store;

    /// Current host time in nanoseconds since the Unix epoch.
    fn host_timestamp(&self) -> Result<u64, RateLimitError>;

    /// Total supply of `denom` on this chain, the base of the quota
    /// percentages.
    fn channel_value(&self, denom: &str) -> Result<Amount, RateLimitError>;
}

pub trait RateLimitExecutionContext: RateLimitValidationContext {
    fn store_mut(&mut self) -> &mut Self::Store;

    fn emit_event(&mut self, event: ModuleEvent) -> Result<(), RateLimitError>;
}
