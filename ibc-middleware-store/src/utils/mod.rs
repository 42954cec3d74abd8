pub mod codec;
#[cfg(feature = "std")]
pub(crate) mod sync;

pub use codec::Codec;
#[cfg(feature = "std")]
pub use sync::{SharedRw, SharedRwExt};
