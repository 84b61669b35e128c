use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::Html,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::catalog::{track_id, SpotifyClient, TrackMetadata};
use crate::config::ApiConfig;
use crate::delegate::{DelegateClient, DownloadDescriptor};
use crate::errors::{ApiError, Result};

pub use crate::errors::{API_OWNER, API_UPDATES};

const LANDING_HTML: &str = include_str!("../static/index.html");

/// Shared request state: read-only config plus one HTTP client for
/// connection reuse. No per-request state survives a request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }

    fn spotify(&self) -> SpotifyClient {
        SpotifyClient::new(self.http.clone(), Arc::clone(&self.config))
    }

    fn delegate(&self) -> DelegateClient {
        DelegateClient::new(self.http.clone(), Arc::clone(&self.config))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/sp/dl", get(download_get).post(download_post))
        .route("/sp/search", get(search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub status: &'static str,
    pub track: TrackMetadata,
    pub download: DownloadDescriptor,
    #[serde(rename = "API_OWNER")]
    pub api_owner: &'static str,
    #[serde(rename = "API_UPDATES")]
    pub api_updates: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub status: &'static str,
    pub results: Vec<crate::catalog::SearchResultItem>,
    #[serde(rename = "API_OWNER")]
    pub api_owner: &'static str,
    #[serde(rename = "API_UPDATES")]
    pub api_updates: &'static str,
}

/// GET / - documentation page
async fn landing() -> Html<&'static str> {
    Html(LANDING_HTML)
}

/// GET /sp/dl?url=<spotify track URL>
async fn download_get(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Result<Json<DownloadResponse>> {
    let url = params.url.ok_or(ApiError::InvalidUrl)?;
    process_download(&state, &url).await.map(Json)
}

/// POST /sp/dl with JSON body {"url": "..."}
///
/// The body is taken as a `Result` so a malformed payload still gets the
/// error envelope rather than the extractor's plain-text rejection.
async fn download_post(
    State(state): State<AppState>,
    request: std::result::Result<Json<UrlRequest>, JsonRejection>,
) -> Result<Json<DownloadResponse>> {
    let Json(request) = request.map_err(|_| ApiError::InvalidUrl)?;
    let url = request.url.ok_or(ApiError::InvalidUrl)?;
    process_download(&state, &url).await.map(Json)
}

/// GET /sp/search?q=<text>
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    let query = params.q.unwrap_or_default();
    let results = state.spotify().search(&query).await?;
    tracing::info!("Found {} tracks for query: {}", results.len(), query);

    Ok(Json(SearchResponse {
        status: "success",
        results,
        api_owner: API_OWNER,
        api_updates: API_UPDATES,
    }))
}

/// The download pipeline: validate, resolve the ID, fetch metadata, then ask
/// the delegate for the file. Fully sequential; the first failure wins.
async fn process_download(state: &AppState, url: &str) -> Result<DownloadResponse> {
    let validated_url = track_id::validate_track_url(url)?;
    let id = track_id::extract_track_id(validated_url)?;
    tracing::info!("Processing track ID: {}", id);

    let track = state.spotify().track(&id).await?;
    tracing::info!("Retrieved metadata for track: {}", track.title);

    let download = state.delegate().resolve(validated_url).await?;

    Ok(DownloadResponse {
        status: "success",
        track,
        download,
        api_owner: API_OWNER,
        api_updates: API_UPDATES,
    })
}
