use reqwest::StatusCode;

/// Errors that abort a recording session.
///
/// Transient conditions inside an attempt (connection drops, non-ok
/// statuses, read errors) never surface here; they are reported as an
/// [`AttemptOutcome`](crate::AttemptOutcome) and handled by the session
/// controller's reconnect loop.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    #[error("failed to resolve stream URL `{url}`: {reason}")]
    Resolution { url: String, reason: String },

    #[error("no playable entry found in playlist `{url}`")]
    NoPlayableEntry { url: String },

    #[error("`{url}` served a playlist ({content_type}) where a media stream was expected")]
    UnsupportedStream { content_type: String, url: String },

    #[error("HTTP request failed: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    #[error("request failed with HTTP {status} for {url}")]
    HttpStatus { status: StatusCode, url: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("internal error: {reason}")]
    Internal { reason: String },
}

impl RecordError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub fn resolution(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }
}
