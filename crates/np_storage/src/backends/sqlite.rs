use async_trait::async_trait;
use chrono::{DateTime, Utc};
use np_core::{
    ArticleEnhancement, AudioClip, Category, ContentStore, Error, FeedSnapshot, GalleryPost,
    NewGalleryPost, Result, StudioPost,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS ai_article_cache (
        article_id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ai_audio_cache (
        text_hash TEXT PRIMARY KEY,
        audio_data BLOB NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS rss_feed_cache (
        category TEXT PRIMARY KEY,
        articles TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS studio_posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        message TEXT NOT NULL,
        media_url TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS gallery_posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT,
        description TEXT,
        media_url TEXT,
        created_at TEXT NOT NULL
    )
    "#,
];

fn storage_err(context: &str) -> impl FnOnce(sqlx::Error) -> Error + '_ {
    move |e| Error::Storage(format!("{}: {}", context, e))
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Storage(format!("Failed to parse date {}: {}", raw, e)))
}

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    /// Accepts a bare path or a `sqlite:` url.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let path = database_url
            .strip_prefix("sqlite://")
            .or_else(|| database_url.strip_prefix("sqlite:"))
            .unwrap_or(database_url);
        Self::new_with_path(Path::new(path)).await
    }

    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))
            .map_err(storage_err("Invalid database path"))?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(storage_err("Failed to connect to database"))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Publishes an editorial post.
    pub async fn add_studio_post(&self, message: &str, media_url: Option<&str>) -> Result<StudioPost> {
        let created_at = Utc::now();
        let result = sqlx::query("INSERT INTO studio_posts (message, media_url, created_at) VALUES (?, ?, ?)")
            .bind(message)
            .bind(media_url)
            .bind(created_at.to_rfc3339())
            .execute(&*self.pool)
            .await
            .map_err(storage_err("Failed to store studio post"))?;

        Ok(StudioPost {
            id: result.last_insert_rowid(),
            message: message.to_string(),
            media_url: media_url.map(str::to_string),
            created_at,
        })
    }

    fn gallery_post_from_row(row: &SqliteRow) -> Result<GalleryPost> {
        Ok(GalleryPost {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            media_url: row.get("media_url"),
            created_at: parse_time(&row.get::<String, _>("created_at"))?,
        })
    }
}

#[async_trait]
impl ContentStore for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn get_enhancement(&self, article_id: &str) -> Result<Option<ArticleEnhancement>> {
        let row = sqlx::query("SELECT data FROM ai_article_cache WHERE article_id = ?")
            .bind(article_id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(storage_err("Failed to read enhancement"))?;

        match row {
            Some(row) => Ok(Some(serde_json::from_str(&row.get::<String, _>("data"))?)),
            None => Ok(None),
        }
    }

    async fn put_enhancement(&self, article_id: &str, enhancement: &ArticleEnhancement) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO ai_article_cache (article_id, data, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(article_id)
        .bind(serde_json::to_string(enhancement)?)
        .bind(Utc::now().to_rfc3339())
        .execute(&*self.pool)
        .await
        .map_err(storage_err("Failed to store enhancement"))?;
        Ok(())
    }

    async fn get_audio(&self, key: &str) -> Result<Option<AudioClip>> {
        let row = sqlx::query("SELECT audio_data FROM ai_audio_cache WHERE text_hash = ?")
            .bind(key)
            .fetch_optional(&*self.pool)
            .await
            .map_err(storage_err("Failed to read audio"))?;

        Ok(row.map(|row| AudioClip::new(key, row.get::<Vec<u8>, _>("audio_data"))))
    }

    async fn put_audio(&self, clip: &AudioClip) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO ai_audio_cache (text_hash, audio_data, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&clip.key)
        .bind(&clip.pcm)
        .bind(Utc::now().to_rfc3339())
        .execute(&*self.pool)
        .await
        .map_err(storage_err("Failed to store audio"))?;
        Ok(())
    }

    async fn get_feed(&self, category: Category) -> Result<Option<FeedSnapshot>> {
        let row = sqlx::query("SELECT articles, updated_at FROM rss_feed_cache WHERE category = ?")
            .bind(category.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(storage_err("Failed to read feed snapshot"))?;

        match row {
            Some(row) => Ok(Some(FeedSnapshot {
                category,
                articles: serde_json::from_str(&row.get::<String, _>("articles"))?,
                updated_at: parse_time(&row.get::<String, _>("updated_at"))?,
            })),
            None => Ok(None),
        }
    }

    async fn put_feed(&self, snapshot: &FeedSnapshot) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO rss_feed_cache (category, articles, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(category) DO UPDATE SET
                articles = excluded.articles,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(snapshot.category.as_str())
        .bind(serde_json::to_string(&snapshot.articles)?)
        .bind(snapshot.updated_at.to_rfc3339())
        .execute(&*self.pool)
        .await
        .map_err(storage_err("Failed to store feed snapshot"))?;
        Ok(())
    }

    async fn recent_studio_posts(&self, limit: usize) -> Result<Vec<StudioPost>> {
        let rows = sqlx::query(
            r#"
            SELECT id, message, media_url, created_at FROM studio_posts
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(storage_err("Failed to read studio posts"))?;

        rows.iter()
            .map(|row| {
                Ok(StudioPost {
                    id: row.get("id"),
                    message: row.get("message"),
                    media_url: row.get("media_url"),
                    created_at: parse_time(&row.get::<String, _>("created_at"))?,
                })
            })
            .collect()
    }

    async fn recent_gallery_posts(&self) -> Result<Vec<GalleryPost>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, media_url, created_at FROM gallery_posts
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(storage_err("Failed to read gallery posts"))?;

        rows.iter().map(Self::gallery_post_from_row).collect()
    }

    async fn create_gallery_post(&self, post: &NewGalleryPost) -> Result<Option<GalleryPost>> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO gallery_posts (title, description, media_url, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.media_url)
        .bind(created_at.to_rfc3339())
        .execute(&*self.pool)
        .await
        .map_err(storage_err("Failed to store gallery post"))?;

        Ok(Some(GalleryPost {
            id: result.last_insert_rowid(),
            title: Some(post.title.clone()),
            description: Some(post.description.clone()),
            media_url: Some(post.media_url.clone()),
            created_at,
        }))
    }
}
