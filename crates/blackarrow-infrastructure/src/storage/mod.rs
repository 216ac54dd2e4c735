//! Key-value store implementations.

mod atomic_toml;
mod file_store;
mod memory_store;

pub use atomic_toml::AtomicTomlFile;
pub use file_store::FileStore;
pub use memory_store::MemoryStore;
