// Confession storage: the repository seam and its in-memory backend.
//
// Nothing is persisted: every confession lives for the process lifetime
// or until an admin delete or a retention sweep removes it.

pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::{ConfessionStore, Predicate, UpdateFn};
