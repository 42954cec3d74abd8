pub mod path;
pub mod store;

pub use path::Path;
#[cfg(feature = "std")]
pub use store::MainStore;
pub use store::{ProtobufStore, TypedSet, TypedStore};
