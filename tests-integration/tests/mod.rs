pub mod packet_forward;
pub mod rate_limit;
