pub mod spotify;
pub mod track_id;

pub use spotify::SpotifyClient;

use serde::{Deserialize, Serialize};

/// Track metadata as returned by the download endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub id: String,
    pub title: String,
    pub artists: Vec<TrackArtist>,
    pub album: AlbumInfo,
    /// "M:SS" with zero-padded seconds
    pub duration: String,
    pub cover: Option<String>,
    pub url: String,
    pub isrc: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumInfo {
    pub name: String,
    pub id: String,
    pub release_date: String,
}

/// One row of the search endpoint's result list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub title: String,
    pub artist: String,
    pub id: String,
    pub url: String,
    pub album: String,
    pub release_date: String,
    pub duration: String,
    pub cover: Option<String>,
}

/// Format a millisecond duration as "M:SS"
pub fn format_duration(duration_ms: u64) -> String {
    format!("{}:{:02}", duration_ms / 60_000, (duration_ms % 60_000) / 1000)
}
