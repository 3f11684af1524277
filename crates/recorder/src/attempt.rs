//! The attempt worker: one HTTP connection copied byte-exact to one output
//! file, until the stop signal is observed or the connection ends.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Local;
use futures::StreamExt;
use reqwest::{Client, StatusCode, header};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::classify;
use crate::error::RecordError;
use crate::filename;
use crate::session::RecordingRequest;

/// How one attempt's copy loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptEnd {
    /// The controller signalled the deadline while the attempt was running.
    DeadlineSignal,
    /// The server closed the connection or the stream was exhausted.
    StreamClosed,
    /// The server answered with a non-success status; no file was created.
    HttpStatus(StatusCode),
    /// A transport error interrupted the connection or the copy loop.
    Transport(String),
}

/// Result of a single attempt, consumed by the session controller to decide
/// whether to reconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptOutcome {
    pub bytes_written: u64,
    pub ended: AttemptEnd,
    /// Path of the file written by this attempt, if one was created.
    pub file: Option<PathBuf>,
}

impl AttemptOutcome {
    fn empty(ended: AttemptEnd) -> Self {
        Self {
            bytes_written: 0,
            ended,
            file: None,
        }
    }
}

/// Run one recording attempt against the resolved stream URL.
///
/// Transient failures (connect errors, non-ok statuses, mid-stream drops)
/// are reported through the returned [`AttemptOutcome`]; an `Err` here is
/// session-fatal (unsupported playlist stream, unusable output file).
pub(crate) async fn run_attempt(
    client: &Client,
    stop: &CancellationToken,
    request: &RecordingRequest,
    attempt_no: u32,
) -> Result<AttemptOutcome, RecordError> {
    let url = &request.stream_url;
    debug!(attempt = attempt_no, url = %url, "connecting");

    let response = tokio::select! {
        _ = stop.cancelled() => {
            return Ok(AttemptOutcome::empty(AttemptEnd::DeadlineSignal));
        }
        response = client.get(url).send() => match response {
            Ok(response) => response,
            Err(e) => return Ok(AttemptOutcome::empty(AttemptEnd::Transport(e.to_string()))),
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!(attempt = attempt_no, %status, "server refused the stream");
        return Ok(AttemptOutcome::empty(AttemptEnd::HttpStatus(status)));
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let classified = classify::classify(content_type);
    let Some(extension) = classified.kind.extension() else {
        return Err(RecordError::UnsupportedStream {
            content_type: content_type.unwrap_or_default().to_owned(),
            url: url.clone(),
        });
    };
    if !classified.recognized {
        warn!(
            attempt = attempt_no,
            content_type = content_type.unwrap_or("<missing>"),
            "unrecognized content type, assuming mp3"
        );
    }

    let (mut file, path) = create_output_file(request, extension).await?;
    if request.public_file {
        set_public_permissions(&path).await?;
    }
    info!(attempt = attempt_no, path = %path.display(), "recording");

    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    // Byte-exact copy; cancellation is observed at chunk boundaries only.
    let ended = loop {
        tokio::select! {
            _ = stop.cancelled() => break AttemptEnd::DeadlineSignal,
            chunk = stream.next() => match chunk {
                Some(Ok(chunk)) => {
                    file.write_all(&chunk).await?;
                    bytes_written += chunk.len() as u64;
                }
                Some(Err(e)) => break AttemptEnd::Transport(e.to_string()),
                None => break AttemptEnd::StreamClosed,
            },
        }
    };

    file.flush().await?;
    drop(file);

    debug!(
        attempt = attempt_no,
        bytes = bytes_written,
        ended = ?ended,
        "attempt finished"
    );
    Ok(AttemptOutcome {
        bytes_written,
        ended,
        file: Some(path),
    })
}

/// Open the attempt's output file for exclusive writing. Reconnect attempts
/// within the same second collide on the timestamped name; those get a
/// numeric suffix instead of truncating the earlier file.
async fn create_output_file(
    request: &RecordingRequest,
    extension: &str,
) -> Result<(File, PathBuf), RecordError> {
    let base = filename::output_path(
        &request.target_dir,
        Local::now(),
        &request.station,
        request.name.as_deref(),
        extension,
    );

    let mut path = base.clone();
    let mut n: u32 = 2;
    loop {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                path = filename::numbered(&base, n);
                n += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(unix)]
async fn set_public_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o666)).await
}

#[cfg(not(unix))]
async fn set_public_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
