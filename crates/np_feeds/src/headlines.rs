use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use np_core::Category;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Categories whose top stories feed the breaking-news ticker, in display order.
pub const HEADLINE_CATEGORIES: [Category; 6] = [
    Category::Hyderabad,
    Category::Telangana,
    Category::India,
    Category::International,
    Category::Sports,
    Category::Studio,
];

#[async_trait]
pub trait HeadlineSource: Send + Sync {
    async fn headlines(&self, categories: &[Category], per_category: usize) -> Vec<String>;
}

/// Recomputes the breaking headlines on a fixed interval in the background.
/// A run that yields nothing keeps the previous list.
pub struct HeadlineTicker {
    latest: Arc<RwLock<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl HeadlineTicker {
    pub fn spawn(source: Arc<dyn HeadlineSource>, interval: Duration, per_category: usize) -> Self {
        let latest = Arc::new(RwLock::new(Vec::new()));
        let board = latest.clone();

        let handle = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(interval);
            ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                let headlines = source.headlines(&HEADLINE_CATEGORIES, per_category).await;
                if headlines.is_empty() {
                    tracing::debug!("Headline refresh came back empty, keeping previous list");
                    continue;
                }
                tracing::debug!("Headline refresh: {} headlines", headlines.len());
                *board.write().await = headlines;
            }
        });

        Self { latest, handle }
    }

    pub async fn current(&self) -> Vec<String> {
        self.latest.read().await.clone()
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for HeadlineTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Hands out one scripted result per run, then empty lists.
    struct ScriptedSource {
        runs: Mutex<Vec<Vec<String>>>,
        calls: Mutex<Vec<(Vec<Category>, usize)>>,
    }

    impl ScriptedSource {
        fn new(runs: Vec<Vec<&str>>) -> Arc<Self> {
            let runs = runs
                .into_iter()
                .rev()
                .map(|run| run.into_iter().map(str::to_string).collect())
                .collect();
            Arc::new(Self {
                runs: Mutex::new(runs),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HeadlineSource for ScriptedSource {
        async fn headlines(&self, categories: &[Category], per_category: usize) -> Vec<String> {
            self.calls.lock().unwrap().push((categories.to_vec(), per_category));
            self.runs.lock().unwrap().pop().unwrap_or_default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_refreshes_and_keeps_previous_on_empty() {
        let source = ScriptedSource::new(vec![vec!["First"], vec![], vec!["Second", "Third"]]);
        let ticker = HeadlineTicker::spawn(source.clone(), Duration::from_secs(60), 3);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(ticker.current().await, ["First"]);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(source.call_count(), 2);
        assert_eq!(ticker.current().await, ["First"]);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(ticker.current().await, ["Second", "Third"]);

        let calls = source.calls.lock().unwrap().clone();
        assert_eq!(calls[0].0, HEADLINE_CATEGORIES.to_vec());
        assert_eq!(calls[0].1, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_refreshes() {
        let source = ScriptedSource::new(vec![vec!["Only"]]);
        let ticker = HeadlineTicker::spawn(source.clone(), Duration::from_secs(60), 3);

        tokio::time::sleep(Duration::from_secs(1)).await;
        ticker.stop();
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(source.call_count(), 1);
        assert_eq!(ticker.current().await, ["Only"]);
    }
}
