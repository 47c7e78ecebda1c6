pub mod memory;
pub mod noop;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryStorage;
pub use noop::NoopStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;
