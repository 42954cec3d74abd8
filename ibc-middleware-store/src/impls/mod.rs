pub(crate) mod in_memory;
pub(crate) mod revertible;
#[cfg(feature = "std")]
pub(crate) mod shared;

pub use in_memory::InMemoryStore;
pub use revertible::RevertibleStore;
#[cfg(feature = "std")]
pub use shared::SharedStore;
