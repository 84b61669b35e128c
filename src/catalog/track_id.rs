use regex::Regex;

use crate::errors::{ApiError, Result};

/// Pre-check applied to the download flow: the input must be a full
/// `open.spotify.com` track URL, not a bare ID.
pub fn validate_track_url(url: &str) -> Result<&str> {
    if let Ok(regex) = Regex::new(r"^https://open\.spotify\.com/track/[a-zA-Z0-9]+") {
        if regex.is_match(url) {
            return Ok(url);
        }
    }
    tracing::error!("Invalid Spotify track URL");
    Err(ApiError::InvalidUrl)
}

/// Resolve a raw 22-character track ID or a track URL to the canonical ID.
pub fn extract_track_id(input: &str) -> Result<String> {
    if let Ok(regex) = Regex::new(r"^[a-zA-Z0-9]{22}$") {
        if regex.is_match(input) {
            return Ok(input.to_string());
        }
    }

    if let Ok(regex) = Regex::new(r"spotify\.com/track/([a-zA-Z0-9]{22})") {
        if let Some(captures) = regex.captures(input) {
            return Ok(captures[1].to_string());
        }
    }

    tracing::error!("Failed to extract track ID");
    Err(ApiError::InvalidIdentifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_track_url_passes_through() {
        let url = "https://open.spotify.com/track/4cOdK2wGLETKimww4urIKV";
        assert_eq!(validate_track_url(url).unwrap(), url);
    }

    #[test]
    fn url_with_query_string_is_valid() {
        let url = "https://open.spotify.com/track/4cOdK2wGLETKimww4urIKV?si=abc123";
        assert_eq!(validate_track_url(url).unwrap(), url);
    }

    #[test]
    fn non_track_urls_are_rejected() {
        for url in [
            "",
            "https://open.spotify.com/album/4cOdK2wGLETKimww4urIKV",
            "http://open.spotify.com/track/4cOdK2wGLETKimww4urIKV",
            "https://open.spotify.com/track/",
            "4cOdK2wGLETKimww4urIKV",
            "not-a-url",
        ] {
            assert!(matches!(validate_track_url(url), Err(ApiError::InvalidUrl)));
        }
    }

    #[test]
    fn bare_id_is_idempotent() {
        let id = "4cOdK2wGLETKimww4urIKV";
        assert_eq!(extract_track_id(id).unwrap(), id);
    }

    #[test]
    fn id_is_extracted_from_url() {
        assert_eq!(
            extract_track_id("https://open.spotify.com/track/4cOdK2wGLETKimww4urIKV").unwrap(),
            "4cOdK2wGLETKimww4urIKV"
        );
        assert_eq!(
            extract_track_id("https://open.spotify.com/track/4cOdK2wGLETKimww4urIKV?si=xyz")
                .unwrap(),
            "4cOdK2wGLETKimww4urIKV"
        );
    }

    #[test]
    fn garbage_input_fails() {
        assert!(matches!(
            extract_track_id("not-a-url"),
            Err(ApiError::InvalidIdentifier)
        ));
        // 21 characters, one short of a valid ID
        assert!(matches!(
            extract_track_id("4cOdK2wGLETKimww4urIK"),
            Err(ApiError::InvalidIdentifier)
        ));
    }
}
