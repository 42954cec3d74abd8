pub mod forward;
pub mod genesis;
pub mod resolution;
