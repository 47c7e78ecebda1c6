pub mod catalog;
pub mod headlines;
pub mod logging;
pub mod normalize;
pub mod orchestrator;
pub mod parser;
pub mod placeholder;
pub mod retrieval;
pub mod transports;

pub use catalog::FeedCatalog;
pub use headlines::{HeadlineSource, HeadlineTicker, HEADLINE_CATEGORIES};
pub use logging::{init_logging, Logger};
pub use orchestrator::FeedOrchestrator;
pub use parser::RssParser;
pub use placeholder::placeholder_articles;
pub use retrieval::RetrievalOrchestrator;
pub use transports::{default_transports, http_client, DirectTransport, Envelope, ProxyTransport};

pub mod prelude {
    pub use super::{FeedCatalog, FeedOrchestrator, HeadlineTicker, RetrievalOrchestrator};
    pub use np_core::{Category, Error, NormalizedArticle, Result};
}
