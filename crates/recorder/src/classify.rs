//! Maps a stream's `Content-Type` header to a file-extension policy.

/// Media type of a stream, as declared by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Mp3,
    Ogg,
    Aac,
    /// An M3U playlist served where a media stream was expected. Not
    /// recordable; the session must abort instead of writing playlist text
    /// as audio.
    PlaylistUrl,
}

impl MediaKind {
    /// File extension for recordable kinds; `None` for [`MediaKind::PlaylistUrl`].
    pub fn extension(self) -> Option<&'static str> {
        match self {
            MediaKind::Mp3 => Some("mp3"),
            MediaKind::Ogg => Some("ogg"),
            MediaKind::Aac => Some("aac"),
            MediaKind::PlaylistUrl => None,
        }
    }
}

/// Result of classifying a `Content-Type` header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified {
    pub kind: MediaKind,
    /// False when the header was missing or unrecognized and the mp3
    /// fallback was applied. Some servers omit or mis-set the header while
    /// still serving valid mp3, so this is a warning, not an error.
    pub recognized: bool,
}

/// Classify a `Content-Type` header value.
///
/// Matching ignores ASCII case and `;`-separated parameters
/// (`audio/mpeg; charset=utf-8` classifies as mp3).
pub fn classify(content_type: Option<&str>) -> Classified {
    let essence = content_type
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default();

    let kind = match essence.as_str() {
        "audio/mpeg" => Some(MediaKind::Mp3),
        "application/ogg" | "audio/ogg" => Some(MediaKind::Ogg),
        "application/aacp" | "audio/aacp" => Some(MediaKind::Aac),
        "audio/x-mpegurl" => Some(MediaKind::PlaylistUrl),
        _ => None,
    };

    match kind {
        Some(kind) => Classified {
            kind,
            recognized: true,
        },
        None => Classified {
            kind: MediaKind::Mp3,
            recognized: false,
        },
    }
}
