//! Job poller
//!
//! Waits for a remote generation job to reach a terminal state.
//! One status check is in flight at a time; between checks the task sleeps
//! on the tokio timer, so many handles can be waited on concurrently by
//! spawning one wait per handle.

use async_trait::async_trait;
use genflow_core::domain::job::{JobHandle, JobStatus, Payload};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::PollConfig;
use crate::error::{PollError, Result};

/// Source of status snapshots for a job
///
/// Implemented by the service clients; tests supply scripted fetchers.
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    /// Fetches the current status of the job behind `handle`
    async fn fetch_status(&self, handle: &JobHandle) -> Result<JobStatus>;
}

/// Waits on generation jobs using a fixed budget and interval
#[derive(Debug, Clone, Default)]
pub struct JobPoller {
    config: PollConfig,
}

impl JobPoller {
    pub fn new(config: PollConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Polls `fetcher` until the job behind `handle` completes
    ///
    /// Returns the payload of the completed job rather than the whole
    /// `JobStatus`: `Completed` is the only status that reaches the caller,
    /// and its payload is the full status body. The wait ends early with
    /// `GenerationFailed` when the job fails, with `Transport` on any fetch
    /// error other than a tolerated "not found yet" (404), and with
    /// `Cancelled` as soon as `cancel` fires. Otherwise it ends with
    /// `Timeout` once `max_wait` has elapsed since the first check.
    /// Cancellation wins over an expired deadline.
    pub async fn wait_for_completion<F>(
        &self,
        handle: &JobHandle,
        fetcher: &F,
        cancel: &CancellationToken,
    ) -> std::result::Result<Payload, PollError>
    where
        F: StatusFetcher + ?Sized,
    {
        if handle.is_empty() {
            return Err(PollError::InvalidRequest(
                "job handle must not be empty".to_string(),
            ));
        }
        self.config.validate()?;

        let started = Instant::now();
        // An unrepresentable deadline means the budget never runs out
        let deadline = started.checked_add(self.config.max_wait);
        let mut attempt: u32 = 0;
        let mut not_found: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(cancelled(handle, attempt));
            }

            attempt += 1;
            match fetcher.fetch_status(handle).await {
                Ok(JobStatus::Completed(payload)) => {
                    info!(
                        %handle,
                        attempt,
                        elapsed = ?started.elapsed(),
                        "Generation completed"
                    );
                    return Ok(payload);
                }
                Ok(JobStatus::Failed(detail)) => {
                    warn!(%handle, attempt, %detail, "Generation failed");
                    return Err(PollError::GenerationFailed {
                        handle: handle.clone(),
                        detail,
                    });
                }
                Ok(JobStatus::Pending(state)) => {
                    debug!(%handle, attempt, %state, "Generation still running");
                }
                Err(e) if e.is_not_found() => {
                    not_found += 1;
                    if self.config.max_not_found.is_some_and(|limit| not_found > limit) {
                        warn!(%handle, not_found, "Status record never appeared");
                        return Err(e.into());
                    }
                    debug!(%handle, attempt, "Status not available yet");
                }
                Err(e) => {
                    warn!(%handle, attempt, error = %e, "Status check failed");
                    return Err(e.into());
                }
            }

            if cancel.is_cancelled() {
                return Err(cancelled(handle, attempt));
            }

            let now = Instant::now();
            if deadline.is_some_and(|deadline| now >= deadline) {
                break;
            }

            let wake = match (now.checked_add(self.config.poll_interval), deadline) {
                (Some(next), Some(deadline)) => next.min(deadline),
                (Some(next), None) => next,
                (None, Some(deadline)) => deadline,
                (None, None) => now,
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(handle, attempt)),
                _ = time::sleep_until(wake) => {}
            }

            if cancel.is_cancelled() {
                return Err(cancelled(handle, attempt));
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                break;
            }
        }

        warn!(
            %handle,
            attempt,
            max_wait = ?self.config.max_wait,
            "Generation did not complete in time"
        );
        Err(PollError::Timeout {
            handle: handle.clone(),
            max_wait: self.config.max_wait,
        })
    }
}

fn cancelled(handle: &JobHandle, attempt: u32) -> PollError {
    info!(%handle, attempt, "Wait cancelled");
    PollError::Cancelled {
        handle: handle.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, Clone)]
    enum Step {
        Pending(&'static str),
        Completed,
        Failed(&'static str),
        Http(u16),
    }

    /// Replays `script`, then repeats `fallback` forever
    struct ScriptedFetcher {
        script: Mutex<VecDeque<Step>>,
        fallback: Step,
        calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn new(script: Vec<Step>, fallback: Step) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fallback,
                calls: AtomicUsize::new(0),
            }
        }

        fn always(step: Step) -> Self {
            Self::new(Vec::new(), step)
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StatusFetcher for ScriptedFetcher {
        async fn fetch_status(&self, _handle: &JobHandle) -> Result<JobStatus> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let step = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone());

            match step {
                Step::Pending(label) => Ok(JobStatus::Pending(label.to_string())),
                Step::Completed => Ok(JobStatus::Completed(completed_payload())),
                Step::Failed(detail) => Ok(JobStatus::Failed(detail.to_string())),
                Step::Http(status) => Err(ClientError::api_error(status, "error")),
            }
        }
    }

    fn completed_payload() -> Payload {
        let mut payload = Payload::new();
        payload.insert("status".to_string(), json!("completed"));
        payload.insert("gammaUrl".to_string(), json!("https://gamma.app/docs/abc"));
        payload
    }

    fn poller(max_wait: u64, interval: u64) -> JobPoller {
        JobPoller::new(PollConfig::new(
            Duration::from_secs(max_wait),
            Duration::from_secs(interval),
        ))
    }

    fn handle() -> JobHandle {
        JobHandle::new("gen-1")
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_on_first_check_never_sleeps() {
        for max_wait in [0, 5, 300] {
            let fetcher = ScriptedFetcher::always(Step::Completed);
            let start = Instant::now();

            let payload = poller(max_wait, 5)
                .wait_for_completion(&handle(), &fetcher, &CancellationToken::new())
                .await
                .unwrap();

            assert_eq!(payload, completed_payload());
            assert_eq!(fetcher.calls(), 1);
            assert_eq!(start.elapsed(), Duration::ZERO);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_terminal() {
        let fetcher = ScriptedFetcher::new(
            vec![Step::Pending("pending"), Step::Pending("pending")],
            Step::Failed("content policy"),
        );
        let start = Instant::now();

        let err = poller(60, 5)
            .wait_for_completion(&handle(), &fetcher, &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            PollError::GenerationFailed { handle, detail } => {
                assert_eq!(handle.as_str(), "gen-1");
                assert_eq!(detail, "content policy");
            }
            other => panic!("expected GenerationFailed, got {:?}", other),
        }
        assert_eq!(fetcher.calls(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_after_ceil_budget_checks() {
        let cases = [(60, 5, 12), (10, 3, 4), (10, 5, 2), (0, 5, 1)];
        for (max_wait, interval, expected_calls) in cases {
            let fetcher = ScriptedFetcher::always(Step::Pending("processing"));
            let start = Instant::now();

            let err = poller(max_wait, interval)
                .wait_for_completion(&handle(), &fetcher, &CancellationToken::new())
                .await
                .unwrap_err();

            assert!(
                matches!(
                    err,
                    PollError::Timeout { max_wait: budget, .. }
                        if budget == Duration::from_secs(max_wait)
                ),
                "unexpected error {:?}",
                err
            );
            assert_eq!(
                fetcher.calls(),
                expected_calls,
                "max_wait={max_wait} interval={interval}"
            );
            assert_eq!(start.elapsed(), Duration::from_secs(max_wait));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_tolerated_until_completion() {
        let fetcher =
            ScriptedFetcher::new(vec![Step::Http(404), Step::Http(404)], Step::Completed);
        let start = Instant::now();

        let payload = poller(60, 5)
            .wait_for_completion(&handle(), &fetcher, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(payload["gammaUrl"], "https://gamma.app/docs/abc");
        assert_eq!(fetcher.calls(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_transport_errors_propagate_immediately() {
        let fetcher = ScriptedFetcher::new(vec![Step::Pending("pending")], Step::Http(500));

        let err = poller(300, 5)
            .wait_for_completion(&handle(), &fetcher, &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            PollError::Transport(e) => assert_eq!(e.status(), Some(500)),
            other => panic!("expected Transport, got {:?}", other),
        }
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_bound() {
        let fetcher = ScriptedFetcher::always(Step::Http(404));
        let poller = JobPoller::new(
            PollConfig::new(Duration::from_secs(300), Duration::from_secs(5))
                .with_max_not_found(Some(2)),
        );

        let err = poller
            .wait_for_completion(&handle(), &fetcher, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PollError::Transport(ref e) if e.is_not_found()));
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_states_keep_polling() {
        let fetcher = ScriptedFetcher::new(
            vec![Step::Pending(""), Step::Pending("rendering-images")],
            Step::Completed,
        );

        let result = poller(60, 5)
            .wait_for_completion(&handle(), &fetcher, &CancellationToken::new())
            .await;

        assert!(result.is_ok());
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_waits_on_terminal_job_agree() {
        let fetcher = ScriptedFetcher::always(Step::Completed);
        let poller = poller(60, 5);
        let cancel = CancellationToken::new();

        let first = poller.wait_for_completion(&handle(), &fetcher, &cancel).await.unwrap();
        let second = poller.wait_for_completion(&handle(), &fetcher, &cancel).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_first_check() {
        let fetcher = ScriptedFetcher::always(Step::Pending("pending"));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = poller(60, 5)
            .wait_for_completion(&handle(), &fetcher, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, PollError::Cancelled { .. }));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_sleep() {
        let fetcher = ScriptedFetcher::always(Step::Pending("pending"));
        let cancel = CancellationToken::new();
        let start = Instant::now();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_secs(7)).await;
            trigger.cancel();
        });

        let err = poller(60, 5)
            .wait_for_completion(&handle(), &fetcher, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, PollError::Cancelled { .. }));
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(start.elapsed(), Duration::from_secs(7));
    }

    /// Fires the token while a check is in flight, then reports `Pending`
    struct CancellingFetcher {
        cancel: CancellationToken,
        latency: Duration,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl StatusFetcher for CancellingFetcher {
        async fn fetch_status(&self, _handle: &JobHandle) -> Result<JobStatus> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            time::sleep(self.latency).await;
            self.cancel.cancel();
            Ok(JobStatus::Pending("processing".to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_check_wins_over_deadline() {
        // (max_wait, fetch latency): the single allowed check, and a check
        // that returns after the deadline has already passed
        for (max_wait, latency) in [(0, 0), (5, 6)] {
            let cancel = CancellationToken::new();
            let fetcher = CancellingFetcher {
                cancel: cancel.clone(),
                latency: Duration::from_secs(latency),
                calls: AtomicUsize::new(0),
            };

            let err = poller(max_wait, 5)
                .wait_for_completion(&handle(), &fetcher, &cancel)
                .await
                .unwrap_err();

            assert!(
                matches!(err, PollError::Cancelled { .. }),
                "max_wait={max_wait}: unexpected error {:?}",
                err
            );
            assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_requests_are_rejected_before_fetching() {
        let fetcher = ScriptedFetcher::always(Step::Completed);
        let cancel = CancellationToken::new();

        let err = poller(60, 5)
            .wait_for_completion(&JobHandle::new(""), &fetcher, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::InvalidRequest(_)));

        let err = poller(60, 0)
            .wait_for_completion(&handle(), &fetcher, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::InvalidRequest(_)));

        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_handles_poll_concurrently() {
        let fast = ScriptedFetcher::new(vec![Step::Pending("pending")], Step::Completed);
        let slow = ScriptedFetcher::new(
            vec![Step::Pending("pending"), Step::Pending("pending"), Step::Pending("pending")],
            Step::Completed,
        );
        let poller = poller(60, 5);
        let cancel = CancellationToken::new();
        let start = Instant::now();

        let (handle_a, handle_b) = (JobHandle::new("gen-a"), JobHandle::new("gen-b"));

        let (a, b) = tokio::join!(
            poller.wait_for_completion(&handle_a, &fast, &cancel),
            poller.wait_for_completion(&handle_b, &slow, &cancel),
        );

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(start.elapsed(), Duration::from_secs(15));
    }
}
