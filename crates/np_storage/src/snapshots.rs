use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use np_core::{Category, FeedSnapshot, Result, SnapshotStore};
use tokio::sync::RwLock;

/// Session-local snapshots kept for the life of the process.
#[derive(Default)]
pub struct MemorySnapshots {
    snapshots: RwLock<HashMap<Category, FeedSnapshot>>,
}

impl MemorySnapshots {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshots {
    async fn load(&self, category: Category) -> Result<Option<FeedSnapshot>> {
        Ok(self.snapshots.read().await.get(&category).cloned())
    }

    async fn save(&self, snapshot: &FeedSnapshot) -> Result<()> {
        self.snapshots
            .write()
            .await
            .insert(snapshot.category, snapshot.clone());
        Ok(())
    }
}

/// One JSON document per category under a directory, so snapshots outlive a
/// restart on the same machine.
pub struct FileSnapshots {
    dir: PathBuf,
}

impl FileSnapshots {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, category: Category) -> PathBuf {
        self.dir.join(format!("news_pulse_cache_{}.json", category.slug()))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshots {
    async fn load(&self, category: Category) -> Result<Option<FeedSnapshot>> {
        match tokio::fs::read(self.path_for(category)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, snapshot: &FeedSnapshot) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(snapshot.category);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec(snapshot)?).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
