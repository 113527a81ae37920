//! State Store Implementations

mod fs_store;
mod lock;
mod memory;

pub use fs_store::FsStateStore;
pub use lock::StateDirLock;
pub use memory::MemoryStateStore;
