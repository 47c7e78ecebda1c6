use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use np_core::ids::article_id_for_link;
use np_core::{AppConfig, Category, Language, NewGalleryPost, StoreKind};
use np_feeds::{init_logging, placeholder_articles, HeadlineTicker, RetrievalOrchestrator, HEADLINE_CATEGORIES};
use np_web::AppState;
use tracing::info;

#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    /// Accepts `90`, `90s`, `2m`, `1h30m`. A bare number is seconds.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let overflow = || format!("Duration is too large: {}", s);
        let mut total: u64 = 0;
        let mut digits = String::new();
        let mut seen_any = false;

        let mut add = |digits: &mut String, unit_secs: u64| -> std::result::Result<(), String> {
            let value: u64 = digits.parse().map_err(|_| overflow())?;
            total = value
                .checked_mul(unit_secs)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(overflow)?;
            digits.clear();
            Ok(())
        };

        for c in s.chars().filter(|c| !c.is_whitespace()) {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            let unit_secs = match c {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            if digits.is_empty() {
                return Err(format!("Duration unit {} has no number", c));
            }
            add(&mut digits, unit_secs)?;
            seen_any = true;
        }
        if !digits.is_empty() {
            add(&mut digits, 1)?;
            seen_any = true;
        }

        if !seen_any || total == 0 {
            return Err("Duration must be a positive number of seconds, minutes or hours".to_string());
        }
        Ok(HumanDuration(Duration::from_secs(total)))
    }
}

fn parse_store(s: &str) -> std::result::Result<StoreKind, String> {
    s.parse().map_err(|e: np_core::Error| e.to_string())
}

fn parse_category(s: &str) -> std::result::Result<Category, String> {
    s.parse().map_err(|e: np_core::Error| e.to_string())
}

/// Flags override the environment and `.env`.
#[derive(Parser, Debug)]
#[command(name = "np", author, version, about = "News Pulse: resilient news retrieval with AI enhancement", long_about = None)]
pub struct Cli {
    /// Persistent store: none, memory or sqlite
    #[arg(long, env = "NP_STORE", value_parser = parse_store)]
    store: Option<StoreKind>,
    #[arg(long, env = "NP_DATABASE_URL")]
    database_url: Option<String>,
    /// Directory for local feed snapshots (in memory when unset)
    #[arg(long, env = "NP_SNAPSHOT_DIR")]
    snapshot_dir: Option<PathBuf>,
    /// Per-transport timeout, e.g. 8s
    #[arg(long)]
    feed_timeout: Option<HumanDuration>,
    /// Per-attempt timeout for enhancement and speech providers, e.g. 30s
    #[arg(long)]
    provider_timeout: Option<HumanDuration>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the articles of a category
    Feed {
        #[arg(value_parser = parse_category)]
        category: Category,
        /// Fall back to the static placeholder set when nothing is available
        #[arg(long)]
        placeholders: bool,
        #[arg(long)]
        json: bool,
    },
    /// Expand, summarize and translate an article
    Enhance {
        title: String,
        text: String,
        /// Article id; derived from the title when omitted
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Synthesize speech and write it as a WAV file
    Speak {
        text: String,
        #[arg(long, short, default_value = "speech.wav")]
        out: PathBuf,
    },
    /// Print the breaking headlines across categories
    Headlines {
        #[arg(long)]
        per_category: Option<usize>,
    },
    /// Submit a gallery post
    Post {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        media_url: String,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
        /// How often the breaking headlines are recomputed, e.g. 60s
        #[arg(long)]
        headline_interval: Option<HumanDuration>,
    },
}

fn apply_overrides(mut config: AppConfig, cli: &Cli) -> AppConfig {
    if let Some(store) = cli.store {
        config.store = store;
    }
    if let Some(url) = &cli.database_url {
        config.database_url = Some(url.clone());
    }
    if let Some(dir) = &cli.snapshot_dir {
        config.snapshot_dir = Some(dir.clone());
    }
    if let Some(timeout) = &cli.feed_timeout {
        config.feed_timeout = timeout.0;
    }
    if let Some(timeout) = &cli.provider_timeout {
        config.provider_timeout = timeout.0;
    }
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging("info");
    let cli = Cli::parse();

    let config = apply_overrides(AppConfig::from_env()?, &cli);
    info!("⚙️ Store: {:?}, providers: {:?}", config.store, config.providers);

    let retrieval = Arc::new(
        RetrievalOrchestrator::from_config(&config)
            .await
            .context("failed to set up retrieval")?,
    );

    match cli.command {
        Commands::Feed {
            category,
            placeholders,
            json,
        } => {
            let mut articles = retrieval.get_feed(category).await;
            if articles.is_empty() && placeholders {
                info!("Nothing available for {}, using placeholders", category);
                articles = placeholder_articles(category);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&articles)?);
            } else {
                for article in &articles {
                    println!("[{}] {}\n    {}\n    {}", article.source, article.title, article.description, article.url);
                }
                info!("📰 {} articles in {}", articles.len(), category);
            }
        }
        Commands::Enhance { title, text, id, json } => {
            let id = id.unwrap_or_else(|| article_id_for_link(&title));
            let enhancement = retrieval.get_enhancement(&id, &title, &text).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&enhancement)?);
            } else {
                println!("{}\n\n{}\n", title, enhancement.full_article);
                println!("Summary: {}", enhancement.summary_short);
                for lang in Language::ALL {
                    println!("{:?}: {}", lang, enhancement.summary(lang));
                }
            }
        }
        Commands::Speak { text, out } => {
            let clip = retrieval.get_audio(&text).await?;
            tokio::fs::write(&out, clip.to_wav())
                .await
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!("🔊 Wrote {} ({} bytes of audio)", out.display(), clip.pcm.len());
        }
        Commands::Headlines { per_category } => {
            let per_category = per_category.unwrap_or(config.headlines_per_category);
            for headline in retrieval.breaking_headlines(&HEADLINE_CATEGORIES, per_category).await {
                println!("• {}", headline);
            }
        }
        Commands::Post {
            title,
            description,
            media_url,
        } => {
            let post = NewGalleryPost {
                title,
                description,
                media_url,
            };
            match retrieval.create_gallery_post(&post).await? {
                Some(created) => info!("🖼️ Created gallery post gal_{}", created.id),
                None => anyhow::bail!("no persistent store configured; set NP_STORE to keep gallery posts"),
            }
        }
        Commands::Serve {
            addr,
            headline_interval,
        } => {
            let interval = headline_interval.map(|d| d.0).unwrap_or(config.headline_interval);
            let ticker = HeadlineTicker::spawn(retrieval.clone(), interval, config.headlines_per_category);
            let state = AppState::new(retrieval.clone())
                .with_ticker(Arc::new(ticker))
                .with_headlines_per_category(config.headlines_per_category);
            np_web::serve(state, &addr).await?;
        }
    }

    retrieval.pending().flush().await;
    Ok(())
}
