//! Resolves a configured URL to a direct media stream URL.
//!
//! Station settings may point at an M3U playlist instead of the stream
//! itself. Resolution happens once, before the attempt loop; a failure here
//! is fatal to the session and no retry is made at this layer.

use reqwest::Client;
use tracing::{debug, info};

use crate::error::RecordError;

/// True when the configured URL points at an M3U playlist reference rather
/// than a direct media stream. Query strings and fragments are ignored for
/// the suffix check.
fn is_playlist_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.to_ascii_lowercase().ends_with(".m3u")
}

/// First non-empty, non-comment line of an M3U playlist body.
fn first_playlist_entry(body: &str) -> Option<&str> {
    body.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Resolve `configured_url` to a direct stream URL.
///
/// Non-playlist URLs pass through unchanged without any network I/O. `.m3u`
/// URLs are fetched and the first playable entry is returned; a playlist
/// with no playable entry is an error, never a silent fallthrough.
pub async fn resolve(client: &Client, configured_url: &str) -> Result<String, RecordError> {
    if !is_playlist_url(configured_url) {
        return Ok(configured_url.to_owned());
    }

    debug!(url = %configured_url, "fetching playlist");
    let response = client
        .get(configured_url)
        .send()
        .await
        .map_err(|e| RecordError::resolution(configured_url, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(RecordError::HttpStatus {
            status,
            url: configured_url.to_owned(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| RecordError::resolution(configured_url, e.to_string()))?;

    match first_playlist_entry(&body) {
        Some(entry) => {
            info!(playlist = %configured_url, stream = %entry, "resolved playlist entry");
            Ok(entry.to_owned())
        }
        None => Err(RecordError::NoPlayableEntry {
            url: configured_url.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_stream_urls_are_not_playlists() {
        assert!(!is_playlist_url("http://example.com/stream"));
        assert!(!is_playlist_url("http://example.com/stream.mp3"));
        // .m3u8 is a different format and out of scope
        assert!(!is_playlist_url("http://example.com/master.m3u8"));
    }

    #[test]
    fn m3u_suffix_is_a_playlist() {
        assert!(is_playlist_url("http://example.com/live.m3u"));
        assert!(is_playlist_url("http://example.com/live.M3U"));
        assert!(is_playlist_url("http://example.com/live.m3u?session=1"));
        assert!(is_playlist_url("http://example.com/live.m3u#now"));
    }

    #[test]
    fn first_entry_skips_comments_and_blank_lines() {
        let body = "#comment\n\nhttp://example.com/stream\n";
        assert_eq!(first_playlist_entry(body), Some("http://example.com/stream"));
    }

    #[test]
    fn first_entry_trims_whitespace() {
        let body = "  \n  http://example.com/a  \nhttp://example.com/b\n";
        assert_eq!(first_playlist_entry(body), Some("http://example.com/a"));
    }

    #[test]
    fn playlist_without_entries_has_no_first_entry() {
        assert_eq!(first_playlist_entry("#EXTM3U\n# nothing here\n\n"), None);
        assert_eq!(first_playlist_entry(""), None);
    }
}
