pub mod callbacks;
pub mod genesis;
