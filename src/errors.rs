use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Attribution fields carried by every response envelope, success or error
pub const API_OWNER: &str = "Stellar";
pub const API_UPDATES: &str = "@ApexServers";

/// Main error type for the download proxy
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Valid Spotify track URL required")]
    InvalidUrl,

    #[error("Invalid Spotify track ID or URL")]
    InvalidIdentifier,

    #[error("Unable to authenticate with Spotify: {0}")]
    AuthFailure(String),

    #[error("Unable to retrieve track data: {0}")]
    MetadataUnavailable(String),

    #[error("Download service unavailable: {0}")]
    DelegateUnavailable(String),

    #[error("Query required")]
    EmptyQuery,

    #[error("No tracks found")]
    NoResults,

    #[error("Search failed: {0}")]
    SearchUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidUrl | ApiError::InvalidIdentifier | ApiError::EmptyQuery => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NoResults => StatusCode::NOT_FOUND,
            ApiError::AuthFailure(_)
            | ApiError::MetadataUnavailable(_)
            | ApiError::DelegateUnavailable(_)
            | ApiError::SearchUnavailable(_)
            | ApiError::Config(_)
            | ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
        }

        let mut body = json!({
            "status": "error",
            "message": self.to_string(),
            "API_OWNER": API_OWNER,
            "API_UPDATES": API_UPDATES,
        });
        if matches!(self, ApiError::EmptyQuery) {
            body["example"] = json!("/sp/search?q=Song+Name");
        }

        (status, Json(body)).into_response()
    }
}
