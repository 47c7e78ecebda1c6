use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use np_core::{ArticleEnhancement, Category, NewGalleryPost, NormalizedArticle};
use np_feeds::{placeholder_articles, HEADLINE_CATEGORIES};
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct FeedQuery {
    /// Substitute the static placeholder set when nothing is available.
    #[serde(default)]
    pub placeholders: bool,
}

pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<NormalizedArticle>>, ApiError> {
    let category: Category = category.parse()?;
    let articles = state.retrieval.get_feed(category).await;
    if articles.is_empty() && query.placeholders {
        return Ok(Json(placeholder_articles(category)));
    }
    Ok(Json(articles))
}

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub text: String,
}

pub async fn enhance(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EnhanceRequest>,
) -> Json<ArticleEnhancement> {
    Json(
        state
            .retrieval
            .get_enhancement(&request.id, &request.title, &request.text)
            .await,
    )
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Wav,
    Pcm,
}

#[derive(Debug, Deserialize)]
pub struct AudioRequest {
    pub text: String,
    #[serde(default)]
    pub format: AudioFormat,
}

pub async fn audio(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AudioRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let clip = state.retrieval.get_audio(&request.text).await?;
    let (content_type, body) = match request.format {
        AudioFormat::Wav => ("audio/wav", clip.to_wav()),
        AudioFormat::Pcm => ("audio/L16;rate=24000;channels=1", clip.pcm),
    };
    Ok(([(header::CONTENT_TYPE, content_type)], body))
}

pub async fn headlines(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    if let Some(ticker) = &state.ticker {
        let current = ticker.current().await;
        if !current.is_empty() {
            return Json(current);
        }
    }
    Json(
        state
            .retrieval
            .breaking_headlines(&HEADLINE_CATEGORIES, state.headlines_per_category)
            .await,
    )
}

pub async fn create_gallery_post(
    State(state): State<Arc<AppState>>,
    Json(post): Json<NewGalleryPost>,
) -> Result<impl IntoResponse, ApiError> {
    match state.retrieval.create_gallery_post(&post).await? {
        Some(created) => Ok((StatusCode::CREATED, Json(created))),
        None => Err(ApiError::NoStore),
    }
}
