use ibc_core::host::types::identifiers::ChannelId;
use ibc_middleware_primitives::Dec;
use ibc_middleware_rate_limit::types::{Quota, RateLimit, RateLimitKey};
use typed_builder::TypedBuilder;

/// Configuration of a rate limit with an unopened window.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = RateLimit))]
pub struct RateLimitConfig {
    #[builder(default = "uatom".to_string(), setter(into))]
    pub denom: String,
    #[builder(default = ChannelId::new(0))]
    pub channel_id: ChannelId,
    #[builder(default = Dec::from_integer(10))]
    pub max_percent_send: Dec,
    #[builder(default = Dec::from_integer(10))]
    pub max_percent_recv: Dec,
    #[builder(default = 24)]
    pub duration_hours: u64,
}

impl From<RateLimitConfig> for RateLimit {
    fn from(config: RateLimitConfig) -> Self {
        RateLimit::new(
            RateLimitKey::new(config.denom, config.channel_id),
            Quota::new(
                config.max_percent_send,
                config.max_percent_recv,
                config.duration_hours,
            )
            .expect("valid quota"),
        )
    }
}
