//! Item persistence behind the [`ItemRepository`] seam.

pub mod memory;
pub mod mongo;
pub mod repository;

pub use memory::MemoryItemRepository;
pub use mongo::MongoItemRepository;
pub use repository::{update_existing, ItemRepository};
