use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{format_duration, AlbumInfo, SearchResultItem, TrackArtist, TrackMetadata};
use crate::config::ApiConfig;
use crate::errors::{ApiError, Result};

const SPOTIFY_TIMEOUT: Duration = Duration::from_secs(20);
const SEARCH_LIMIT: u32 = 5;

/// Spotify Web API client.
///
/// Holds no token state: every operation performs a fresh client-credentials
/// exchange, keeping requests independent of each other.
pub struct SpotifyClient {
    client: Client,
    config: Arc<ApiConfig>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    id: String,
    name: String,
    artists: Vec<RawArtist>,
    album: RawAlbum,
    duration_ms: u64,
    #[serde(default)]
    external_urls: HashMap<String, String>,
    #[serde(default)]
    external_ids: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawArtist {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawAlbum {
    id: String,
    name: String,
    release_date: String,
    #[serde(default)]
    images: Vec<RawImage>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: SearchTracks,
}

#[derive(Debug, Deserialize)]
struct SearchTracks {
    items: Vec<RawTrack>,
}

impl SpotifyClient {
    pub fn new(client: Client, config: Arc<ApiConfig>) -> Self {
        Self { client, config }
    }

    /// Obtain a bearer token via the client-credentials grant
    pub async fn access_token(&self) -> Result<String> {
        let credentials = format!(
            "{}:{}",
            self.config.spotify_client_id, self.config.spotify_client_secret
        );
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);

        let response = self
            .client
            .post(&self.config.auth_url)
            .header("Authorization", format!("Basic {}", encoded))
            .form(&[("grant_type", "client_credentials")])
            .timeout(SPOTIFY_TIMEOUT)
            .send()
            .await
            .map_err(|e| ApiError::AuthFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Failed to get Spotify token: {} - {}", status, error_text);
            return Err(ApiError::AuthFailure(status.to_string()));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::AuthFailure(e.to_string()))?;
        Ok(token.access_token)
    }

    /// Fetch and normalize metadata for a single track
    pub async fn track(&self, track_id: &str) -> Result<TrackMetadata> {
        let token = self.access_token().await?;

        let response = self
            .client
            .get(format!("{}/tracks/{}", self.config.api_base, track_id))
            .header("Authorization", format!("Bearer {}", token))
            .timeout(SPOTIFY_TIMEOUT)
            .send()
            .await
            .map_err(|e| ApiError::MetadataUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Failed to fetch track metadata: {} - {}", status, error_text);
            return Err(ApiError::MetadataUnavailable(status.to_string()));
        }

        let raw: RawTrack = response
            .json()
            .await
            .map_err(|e| ApiError::MetadataUnavailable(e.to_string()))?;
        Ok(map_track(raw))
    }

    /// Text search, normalized with the same shaping rules as `track`
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>> {
        if query.is_empty() {
            tracing::error!("Search query missing");
            return Err(ApiError::EmptyQuery);
        }

        let token = self.access_token().await?;
        let limit = SEARCH_LIMIT.to_string();

        let response = self
            .client
            .get(format!("{}/search", self.config.api_base))
            .header("Authorization", format!("Bearer {}", token))
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
            .timeout(SPOTIFY_TIMEOUT)
            .send()
            .await
            .map_err(|e| ApiError::SearchUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Search request failed: {} - {}", status, error_text);
            return Err(ApiError::SearchUnavailable(status.to_string()));
        }

        let raw: SearchResponse = response
            .json()
            .await
            .map_err(|e| ApiError::SearchUnavailable(e.to_string()))?;

        if raw.tracks.items.is_empty() {
            tracing::info!("No tracks found for query: {}", query);
        }
        map_search_results(raw.tracks.items)
    }
}

/// Zero provider matches is a NoResults failure, never an empty success list
fn map_search_results(items: Vec<RawTrack>) -> Result<Vec<SearchResultItem>> {
    if items.is_empty() {
        return Err(ApiError::NoResults);
    }
    Ok(items.into_iter().map(map_search_item).collect())
}

fn canonical_url(raw: &RawTrack) -> String {
    raw.external_urls
        .get("spotify")
        .cloned()
        .unwrap_or_else(|| format!("https://open.spotify.com/track/{}", raw.id))
}

fn map_track(raw: RawTrack) -> TrackMetadata {
    let url = canonical_url(&raw);
    let isrc = raw
        .external_ids
        .get("isrc")
        .cloned()
        .unwrap_or_else(|| "N/A".to_string());

    TrackMetadata {
        duration: format_duration(raw.duration_ms),
        cover: raw.album.images.first().map(|img| img.url.clone()),
        url,
        isrc,
        artists: raw
            .artists
            .into_iter()
            .map(|a| TrackArtist {
                name: a.name,
                id: a.id,
            })
            .collect(),
        album: AlbumInfo {
            name: raw.album.name,
            id: raw.album.id,
            release_date: raw.album.release_date,
        },
        id: raw.id,
        title: raw.name,
    }
}

fn map_search_item(raw: RawTrack) -> SearchResultItem {
    let url = canonical_url(&raw);

    SearchResultItem {
        artist: raw
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<&str>>()
            .join(", "),
        duration: format_duration(raw.duration_ms),
        cover: raw.album.images.first().map(|img| img.url.clone()),
        url,
        album: raw.album.name,
        release_date: raw.album.release_date,
        id: raw.id,
        title: raw.name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_track_json() -> &'static str {
        r#"{
            "id": "4cOdK2wGLETKimww4urIKV",
            "name": "Never Gonna Give You Up",
            "artists": [
                {"id": "0gxyHStUsqpMadRV0Di1Qt", "name": "Rick Astley"},
                {"id": "1dfeR4HaWDbWqFHLkxsg1d", "name": "Queen"}
            ],
            "album": {
                "id": "6eUW0wxWtzkFdaEFsTJto6",
                "name": "Whenever You Need Somebody",
                "release_date": "1987-11-12",
                "images": [
                    {"url": "https://i.scdn.co/image/large", "width": 640, "height": 640},
                    {"url": "https://i.scdn.co/image/small", "width": 64, "height": 64}
                ]
            },
            "duration_ms": 245000,
            "external_urls": {"spotify": "https://open.spotify.com/track/4cOdK2wGLETKimww4urIKV"},
            "external_ids": {"isrc": "GBARL9300135"}
        }"#
    }

    #[test]
    fn track_mapping_shapes_all_fields() {
        let raw: RawTrack = serde_json::from_str(sample_track_json()).unwrap();
        let track = map_track(raw);

        assert_eq!(track.id, "4cOdK2wGLETKimww4urIKV");
        assert_eq!(track.title, "Never Gonna Give You Up");
        assert_eq!(track.artists.len(), 2);
        assert_eq!(track.artists[0].name, "Rick Astley");
        assert_eq!(track.artists[1].id, "1dfeR4HaWDbWqFHLkxsg1d");
        assert_eq!(track.album.name, "Whenever You Need Somebody");
        assert_eq!(track.album.release_date, "1987-11-12");
        assert_eq!(track.duration, "4:05");
        assert_eq!(track.cover.as_deref(), Some("https://i.scdn.co/image/large"));
        assert_eq!(
            track.url,
            "https://open.spotify.com/track/4cOdK2wGLETKimww4urIKV"
        );
        assert_eq!(track.isrc, "GBARL9300135");
    }

    #[test]
    fn missing_isrc_and_cover_get_defaults() {
        let raw: RawTrack = serde_json::from_str(
            r#"{
                "id": "4cOdK2wGLETKimww4urIKV",
                "name": "Obscure B-Side",
                "artists": [{"id": "a1", "name": "Someone"}],
                "album": {"id": "b1", "name": "Demos", "release_date": "2001", "images": []},
                "duration_ms": 61000
            }"#,
        )
        .unwrap();
        let track = map_track(raw);

        assert_eq!(track.isrc, "N/A");
        assert!(track.cover.is_none());
        assert_eq!(track.duration, "1:01");
        // No external_urls: the canonical URL is synthesized from the ID.
        assert_eq!(
            track.url,
            "https://open.spotify.com/track/4cOdK2wGLETKimww4urIKV"
        );
    }

    #[test]
    fn search_item_joins_artists_with_comma() {
        let raw: RawTrack = serde_json::from_str(sample_track_json()).unwrap();
        let item = map_search_item(raw);

        assert_eq!(item.artist, "Rick Astley, Queen");
        assert_eq!(item.album, "Whenever You Need Somebody");
        assert_eq!(item.duration, "4:05");
        assert_eq!(item.cover.as_deref(), Some("https://i.scdn.co/image/large"));
    }

    #[test]
    fn search_response_deserializes() {
        let json = format!(r#"{{"tracks": {{"items": [{}]}}}}"#, sample_track_json());
        let response: SearchResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(response.tracks.items.len(), 1);
    }

    #[test]
    fn zero_search_items_is_no_results_not_empty_success() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"tracks": {"items": []}}"#).unwrap();
        assert!(matches!(
            map_search_results(response.tracks.items),
            Err(ApiError::NoResults)
        ));
    }

    #[test]
    fn search_results_map_every_item() {
        let raw: RawTrack = serde_json::from_str(sample_track_json()).unwrap();
        let results = map_search_results(vec![raw]).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Never Gonna Give You Up");
    }

    #[tokio::test]
    async fn empty_query_fails_before_any_network_call() {
        // The config points at an unroutable host; reaching the network would
        // surface as SearchUnavailable, not EmptyQuery.
        let config = Arc::new(ApiConfig {
            spotify_client_id: "id".to_string(),
            spotify_client_secret: "secret".to_string(),
            auth_url: "http://127.0.0.1:1/token".to_string(),
            api_base: "http://127.0.0.1:1/v1".to_string(),
            ..ApiConfig::default()
        });
        let client = SpotifyClient::new(Client::new(), config);

        assert!(matches!(client.search("").await, Err(ApiError::EmptyQuery)));
    }
}
