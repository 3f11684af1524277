use std::time::Duration;

use reqwest::redirect::Policy;

use crate::error::RecordError;
use crate::session::ReconnectPolicy;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36";

/// Configurable options for a recording session.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Connection timeout (time to establish the initial connection).
    pub connect_timeout: Duration,

    /// Read timeout (maximum time between receiving data chunks).
    ///
    /// This bounds how long a stalled server can hold an attempt past the
    /// session deadline; cancellation is otherwise only observed at chunk
    /// boundaries.
    pub read_timeout: Duration,

    /// Whether to follow redirects.
    pub follow_redirects: bool,

    /// User agent string sent with every request.
    pub user_agent: String,

    /// Pause policy applied between reconnect attempts.
    pub reconnect: ReconnectPolicy,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(30),
            follow_redirects: true,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

/// Build the HTTP client shared by the resolver and all attempts of a
/// session.
pub(crate) fn build_client(config: &RecorderConfig) -> Result<reqwest::Client, RecordError> {
    let redirect = if config.follow_redirects {
        Policy::limited(10)
    } else {
        Policy::none()
    };

    let client = reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .read_timeout(config.read_timeout)
        .user_agent(config.user_agent.clone())
        .redirect(redirect)
        .build()?;

    Ok(client)
}
