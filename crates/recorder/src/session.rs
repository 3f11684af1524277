//! The session controller: owns the deadline and drives sequential attempt
//! workers until the requested wall-clock duration elapses.

use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::attempt::{self, AttemptEnd, AttemptOutcome};
use crate::config::{self, RecorderConfig};
use crate::error::RecordError;
use crate::resolve;

/// Immutable description of one recording session.
#[derive(Debug, Clone)]
pub struct RecordingRequest {
    /// Station label, used only for output naming and logging.
    pub station: String,
    /// Stream URL as configured; may be an M3U playlist reference.
    pub stream_url: String,
    /// Directory the output files are written into.
    pub target_dir: PathBuf,
    /// Optional recording name appended to the filename.
    pub name: Option<String>,
    /// Total wall-clock duration to record for. Must be positive.
    pub duration: Duration,
    /// Relax the output files to world-readable/writable.
    pub public_file: bool,
}

/// Monotonic start timestamp and the fixed absolute deadline derived from
/// it. The deadline is computed once and never recalculated.
#[derive(Debug, Clone, Copy)]
struct SessionClock {
    started_at: Instant,
    deadline: Instant,
}

impl SessionClock {
    fn start(duration: Duration) -> Self {
        let started_at = Instant::now();
        Self {
            started_at,
            deadline: started_at + duration,
        }
    }

    /// Remaining budget, clamped to zero once the deadline has passed.
    fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Pause applied before starting the next attempt after one that ended
/// prematurely, so a failing server is not hammered in a tight loop.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    /// Base pause. The pause grows as `base * 2^n` with `n` counting
    /// consecutive attempts that recorded nothing.
    pub base_delay: Duration,
    /// Hard cap on the computed pause.
    pub max_delay: Duration,
    /// When true, adds random jitter of `[0, base_delay/2)` to the pause.
    pub jitter: bool,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

impl ReconnectPolicy {
    /// Compute the pause after `empty_attempts` consecutive attempts that
    /// wrote zero bytes.
    fn delay_for(&self, empty_attempts: u32) -> Duration {
        let multiplier = 1u32.checked_shl(empty_attempts).unwrap_or(u32::MAX);
        let exp_delay = self
            .base_delay
            .checked_mul(multiplier)
            .unwrap_or(self.max_delay);
        let capped = exp_delay.min(self.max_delay);

        if !self.jitter {
            return capped;
        }

        let jitter_range_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX) / 2;
        if jitter_range_ms == 0 {
            return capped;
        }

        let jitter_ms = rand::rng().random_range(0..jitter_range_ms);
        (capped + Duration::from_millis(jitter_ms)).min(self.max_delay)
    }
}

/// What a completed session did.
#[derive(Debug)]
pub struct SessionSummary {
    /// Number of attempts started, including the one running at the
    /// deadline.
    pub attempts: u32,
    /// Total bytes copied across all attempts.
    pub bytes_written: u64,
    /// Wall-clock time from session start to termination.
    pub elapsed: Duration,
    /// Every output file written, one per attempt that got a stream.
    pub files: Vec<PathBuf>,
}

/// Record `request.stream_url` into `request.target_dir` until the session
/// deadline passes, reconnecting across dropped connections.
///
/// This is the top-level entry point for a recording session. The stream
/// URL is resolved once up front; a resolution failure aborts before any
/// file is created. Afterwards the controller loops: it starts an attempt
/// worker, waits at most the remaining budget, and either signals the
/// worker to stop (deadline reached, the normal terminal condition) or
/// starts a fresh attempt against the shrunken budget.
pub async fn record(
    request: RecordingRequest,
    config: RecorderConfig,
) -> Result<SessionSummary, RecordError> {
    if request.duration.is_zero() {
        return Err(RecordError::configuration(
            "recording duration must be positive",
        ));
    }

    let client = config::build_client(&config)?;
    let stream_url = resolve::resolve(&client, &request.stream_url).await?;
    let request = RecordingRequest {
        stream_url,
        ..request
    };

    let clock = SessionClock::start(request.duration);
    info!(
        station = %request.station,
        url = %request.stream_url,
        duration_secs = request.duration.as_secs_f64(),
        "session started"
    );

    let mut summary = SessionSummary {
        attempts: 0,
        bytes_written: 0,
        elapsed: Duration::ZERO,
        files: Vec::new(),
    };
    let mut empty_attempts: u32 = 0;

    loop {
        let remaining = clock.remaining();
        if remaining.is_zero() {
            break;
        }

        summary.attempts += 1;
        let attempt_no = summary.attempts;
        let stop = CancellationToken::new();
        let mut worker = tokio::spawn({
            let client = client.clone();
            let stop = stop.clone();
            let request = request.clone();
            async move { attempt::run_attempt(&client, &stop, &request, attempt_no).await }
        });

        // Bounded wait: whichever comes first, the remaining budget or the
        // worker's own exit.
        let outcome = match tokio::time::timeout(remaining, &mut worker).await {
            Ok(Ok(result)) => result?,
            Ok(Err(e)) => {
                return Err(RecordError::internal(format!("attempt task failed: {e}")));
            }
            Err(_) => {
                // Budget elapsed with the attempt still running: the normal
                // terminal condition.
                debug!(attempt = attempt_no, "deadline reached, signalling stop");
                stop.cancel();
                join_attempt(&mut worker).await?
            }
        };

        record_outcome(&mut summary, &outcome);

        match outcome.ended {
            AttemptEnd::DeadlineSignal => break,
            ref ended => {
                if clock.remaining().is_zero() {
                    break;
                }
                debug!(
                    attempt = attempt_no,
                    ended = ?ended,
                    bytes = outcome.bytes_written,
                    "stream interrupted before the deadline, reconnecting"
                );

                empty_attempts = if outcome.bytes_written == 0 {
                    empty_attempts.saturating_add(1)
                } else {
                    0
                };
                let pause = config
                    .reconnect
                    .delay_for(empty_attempts.saturating_sub(1));
                // Skip the pause when it would cross the deadline; the next
                // attempt still gets whatever budget is left.
                if pause < clock.remaining() {
                    tokio::time::sleep(pause).await;
                }
            }
        }
    }

    summary.elapsed = clock.elapsed();
    info!(
        attempts = summary.attempts,
        bytes = summary.bytes_written,
        elapsed_secs = summary.elapsed.as_secs_f64(),
        "session finished"
    );
    Ok(summary)
}

/// Await a signalled worker. The worker observes the stop signal at its
/// next chunk boundary and exits on its own; a worker that already finished
/// just yields its result (cancelling a finished attempt is a no-op).
async fn join_attempt(
    worker: &mut tokio::task::JoinHandle<Result<AttemptOutcome, RecordError>>,
) -> Result<AttemptOutcome, RecordError> {
    match worker.await {
        Ok(result) => result,
        Err(e) => Err(RecordError::internal(format!("attempt task failed: {e}"))),
    }
}

fn record_outcome(summary: &mut SessionSummary, outcome: &AttemptOutcome) {
    summary.bytes_written += outcome.bytes_written;
    if let Some(file) = &outcome.file {
        summary.files.push(file.clone());
    }
}
