use std::sync::Arc;

use np_core::{AppConfig, ContentStore, Result, SnapshotStore, StoreKind};

pub mod backends;
pub mod pending;
pub mod snapshots;
pub mod tiered;

pub use backends::*;
pub use pending::PendingWrites;
pub use snapshots::{FileSnapshots, MemorySnapshots};
pub use tiered::{AudioContentCache, PersistentTier, TextContentCache, TieredCache};

/// Builds the persistent store named by `kind`. `StoreKind::None` yields a
/// [`NoopStore`], so callers never branch on whether a store exists.
pub async fn create_storage(kind: StoreKind, database_url: Option<&str>) -> Result<Arc<dyn ContentStore>> {
    match kind {
        StoreKind::None => Ok(Arc::new(NoopStore)),
        StoreKind::Memory => Ok(Arc::new(MemoryStorage::new())),
        #[cfg(feature = "sqlite")]
        StoreKind::Sqlite => {
            let url = database_url.unwrap_or("news_pulse.db");
            Ok(Arc::new(SqliteStorage::connect(url).await?))
        }
        #[cfg(not(feature = "sqlite"))]
        StoreKind::Sqlite => {
            let _ = database_url;
            Err(np_core::Error::Config(
                "sqlite store requested but np_storage was built without the `sqlite` feature".to_string(),
            ))
        }
    }
}

/// Local snapshot tier: a directory when one is configured, memory otherwise.
pub fn create_snapshot_store(config: &AppConfig) -> Arc<dyn SnapshotStore> {
    match &config.snapshot_dir {
        Some(dir) => Arc::new(FileSnapshots::new(dir.clone())),
        None => Arc::new(MemorySnapshots::new()),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, AudioContentCache, PendingWrites, TextContentCache};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_storage_kinds() {
        assert_eq!(create_storage(StoreKind::None, None).await.unwrap().name(), "none");
        assert_eq!(create_storage(StoreKind::Memory, None).await.unwrap().name(), "memory");
    }
}
