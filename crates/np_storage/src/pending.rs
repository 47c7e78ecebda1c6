use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

/// Tracks detached best-effort writes. Callers never wait on them; tests and
/// shutdown paths can `flush` to observe their effects.
#[derive(Clone, Default)]
pub struct PendingWrites {
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl PendingWrites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<F>(&self, write: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(write);
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        tasks.retain(|t| !t.is_finished());
        tasks.push(handle);
    }

    /// Number of writes that have not finished yet.
    pub fn in_flight(&self) -> usize {
        let tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        tasks.iter().filter(|t| !t.is_finished()).count()
    }

    /// Waits for every write spawned so far.
    pub async fn flush(&self) {
        loop {
            let batch: Vec<JoinHandle<()>> = {
                let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
                std::mem::take(&mut *tasks)
            };
            if batch.is_empty() {
                return;
            }
            for handle in batch {
                if let Err(e) = handle.await {
                    tracing::warn!("Detached cache write panicked or was cancelled: {}", e);
                }
            }
        }
    }
}
