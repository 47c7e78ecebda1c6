pub mod config;
pub mod error;
pub mod feeds;
pub mod ids;
pub mod models;
pub mod storage;
pub mod types;

pub use config::{AppConfig, ProviderKeys, StoreKind};
pub use error::{Error, Result};
pub use feeds::{FeedParser, FeedTransport, RawFeedItem};
pub use models::{EnhancementProvider, SpeechProvider};
pub use storage::{ContentStore, SnapshotStore};
pub use types::*;
