// SPDX-License-Identifier: Apache-2.0

//! Polling loop for scan completion.
//!
//! A two-state machine: Polling until the scan reaches a terminal state,
//! or the timeout elapses. Transient fetch failures are logged and the loop
//! continues; only the timeout ends it without a terminal status.
//!
//! The loop is written against [`ScanStatusSource`] so it can be exercised
//! without a network.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::PosturaError;
use crate::types::ScanStatus;

/// Anything that can report the current status of a scan.
#[async_trait]
pub trait ScanStatusSource: Send + Sync {
    /// Fetches the current status of the given scan.
    async fn fetch_status(&self, scan_id: &str) -> Result<ScanStatus, PosturaError>;
}

/// Timing knobs for the polling loop.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    /// Overall timeout in minutes.
    pub timeout_minutes: u64,
    /// Delay between successful status fetches.
    pub poll_interval: Duration,
    /// Delay before re-polling after a transient failure.
    pub retry_interval: Duration,
}

impl PollSettings {
    /// Builds settings from application configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout_minutes: config.timeout_minutes,
            poll_interval: Duration::from_secs(config.poll_interval_seconds),
            retry_interval: Duration::from_secs(config.retry_interval_seconds),
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_minutes * 60)
    }
}

/// Polls until the scan reaches a terminal state or the timeout elapses.
///
/// Transient fetch failures never abort the loop. For any status sequence
/// that reaches a terminal state, the loop returns within the timeout plus
/// one poll interval.
///
/// # Errors
///
/// Returns `PosturaError::Timeout` if no terminal state is observed within
/// the timeout. The caller is expected to log it, attempt one final
/// best-effort status fetch, and continue.
pub async fn wait_for_completion<S: ScanStatusSource + ?Sized>(
    source: &S,
    scan_id: &str,
    settings: &PollSettings,
) -> Result<ScanStatus, PosturaError> {
    let deadline = Instant::now() + settings.timeout();

    info!(
        scan_id,
        timeout_minutes = settings.timeout_minutes,
        "waiting for scan to complete"
    );

    loop {
        if Instant::now() >= deadline {
            return Err(PosturaError::Timeout {
                scan_id: scan_id.to_string(),
                minutes: settings.timeout_minutes,
            });
        }

        match source.fetch_status(scan_id).await {
            Ok(status) => {
                info!(state = %status.status, "scan status");
                if status.status.is_terminal() {
                    return Ok(status);
                }
                tokio::time::sleep(settings.poll_interval).await;
            }
            Err(error) => {
                warn!(%error, "transient failure checking scan status");
                tokio::time::sleep(settings.retry_interval).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::types::ScanState;

    /// Scripted status source: plays back a fixed sequence, then repeats the
    /// last non-terminal answer forever.
    struct Scripted {
        responses: Mutex<VecDeque<Result<ScanState, ()>>>,
    }

    impl Scripted {
        fn new(responses: &[Result<ScanState, ()>]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().copied().collect()),
            }
        }
    }

    #[async_trait]
    impl ScanStatusSource for Scripted {
        async fn fetch_status(&self, scan_id: &str) -> Result<ScanStatus, PosturaError> {
            let next = self.responses.lock().unwrap().pop_front();
            match next {
                Some(Ok(state)) => Ok(ScanStatus {
                    scan_id: Some(scan_id.to_string()),
                    status: state,
                    ..ScanStatus::default()
                }),
                Some(Err(())) => Err(PosturaError::Api {
                    message: "scan status fetch failed with HTTP 503".to_string(),
                    status: Some(503),
                }),
                None => Ok(ScanStatus {
                    scan_id: Some(scan_id.to_string()),
                    status: ScanState::Running,
                    ..ScanStatus::default()
                }),
            }
        }
    }

    fn settings(timeout_minutes: u64) -> PollSettings {
        PollSettings {
            timeout_minutes,
            poll_interval: Duration::from_secs(10),
            retry_interval: Duration::from_secs(5),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_on_terminal_state() {
        let source = Scripted::new(&[
            Ok(ScanState::Queued),
            Ok(ScanState::Running),
            Ok(ScanState::Completed),
        ]);

        let status = wait_for_completion(&source, "s-1", &settings(30))
            .await
            .unwrap();
        assert_eq!(status.status, ScanState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_and_cancelled_are_terminal() {
        for terminal in [ScanState::Failed, ScanState::Cancelled] {
            let source = Scripted::new(&[Ok(ScanState::Running), Ok(terminal)]);
            let status = wait_for_completion(&source, "s-1", &settings(30))
                .await
                .unwrap();
            assert_eq!(status.status, terminal);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_do_not_abort() {
        let source = Scripted::new(&[Err(()), Err(()), Ok(ScanState::Completed)]);

        let status = wait_for_completion(&source, "s-1", &settings(30))
            .await
            .unwrap();
        assert_eq!(status.status, ScanState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_when_never_terminal() {
        let source = Scripted::new(&[]);
        let start = Instant::now();

        let err = wait_for_completion(&source, "s-9", &settings(1))
            .await
            .unwrap_err();
        match err {
            PosturaError::Timeout { scan_id, minutes } => {
                assert_eq!(scan_id, "s-9");
                assert_eq!(minutes, 1);
            }
            other => panic!("unexpected error: {other}"),
        }

        // Terminates within timeout + one poll interval.
        let elapsed = start.elapsed();
        assert!(elapsed <= Duration::from_secs(60) + Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_state_keeps_polling() {
        let source = Scripted::new(&[Ok(ScanState::Unknown), Ok(ScanState::Completed)]);

        let status = wait_for_completion(&source, "s-1", &settings(30))
            .await
            .unwrap();
        assert_eq!(status.status, ScanState::Completed);
    }
}
