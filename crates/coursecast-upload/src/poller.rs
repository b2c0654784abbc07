//! Fixed-cadence status polling.
//!
//! A [`Poller`] queries once immediately and then every `interval` until the decision
//! function yields a terminal answer or the attempt ceiling is reached. Query errors end
//! polling at once; they are not retried.

use coursecast_core::models::{
    AssetStatus, AssetStatusResponse, UploadCompletion, UploadRecordStatus, UploadStatusResponse,
};
use coursecast_core::{PollPhase, PollPolicy, UploadError};
use std::future::Future;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Verdict on a single status response.
#[derive(Debug, Clone, PartialEq)]
pub enum PollDecision<T> {
    /// Not terminal yet, ask again after the interval.
    Continue,
    /// Terminal success, carrying what the next step needs.
    Advance(T),
    /// Terminal failure.
    Fail(UploadError),
}

/// Upload record: an asset id means the file landed; a failure status ends the session.
pub fn decide_upload_status(response: &UploadStatusResponse) -> PollDecision<String> {
    let asset_id = response
        .asset_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    match asset_id {
        Some(id) if response.status == UploadRecordStatus::AssetCreated => {
            PollDecision::Advance(id.to_string())
        }
        _ if response.status.is_failed() => {
            PollDecision::Fail(UploadError::UploadProcessingFailed {
                status: response.status.as_str().to_string(),
            })
        }
        _ => PollDecision::Continue,
    }
}

/// Asset: `ready` completes the session, `errored` fails it, anything else keeps waiting.
pub fn decide_asset_status(response: &AssetStatusResponse) -> PollDecision<UploadCompletion> {
    match response.status {
        AssetStatus::Ready => match UploadCompletion::from_ready_asset(response) {
            Some(completion) => PollDecision::Advance(completion),
            None => PollDecision::Fail(UploadError::ProcessingFailed(
                "asset is ready but has no playback id".to_string(),
            )),
        },
        AssetStatus::Errored => PollDecision::Fail(UploadError::ProcessingFailed(
            "asset status is errored".to_string(),
        )),
        AssetStatus::Preparing | AssetStatus::Unknown => PollDecision::Continue,
    }
}

/// Await `fut` unless `cancel` fires first.
pub(crate) async fn cancellable<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, UploadError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(UploadError::Cancelled),
        output = fut => Ok(output),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Poller {
    phase: PollPhase,
    policy: PollPolicy,
}

impl Poller {
    pub fn new(phase: PollPhase, policy: PollPolicy) -> Self {
        Self { phase, policy }
    }

    /// Run until `decide` returns a terminal verdict.
    ///
    /// At most `max_attempts` queries are issued, with no sleep after the last one.
    /// Exhausting the attempts yields the phase's timeout error, a failing query yields
    /// its status-check error, and a fired `cancel` yields [`UploadError::Cancelled`].
    pub async fn run<T, R, Q, Fut, D>(
        &self,
        cancel: &CancellationToken,
        mut query: Q,
        decide: D,
    ) -> Result<T, UploadError>
    where
        Q: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<R>>,
        D: Fn(&R) -> PollDecision<T>,
    {
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            let response = cancellable(cancel, query()).await?.map_err(|e| {
                tracing::warn!(
                    phase = %self.phase,
                    attempt,
                    error = %e,
                    "Status check failed"
                );
                self.phase.status_check_failed(format!("{:#}", e))
            })?;

            match decide(&response) {
                PollDecision::Advance(value) => {
                    tracing::info!(phase = %self.phase, attempt, "Polling reached terminal status");
                    return Ok(value);
                }
                PollDecision::Fail(err) => {
                    tracing::warn!(phase = %self.phase, attempt, error = %err, "Polling failed");
                    return Err(err);
                }
                PollDecision::Continue => {
                    tracing::debug!(
                        phase = %self.phase,
                        attempt,
                        max_attempts,
                        "Status not terminal yet"
                    );
                    if attempt < max_attempts {
                        cancellable(cancel, sleep(self.policy.interval)).await?;
                    }
                }
            }
        }

        tracing::warn!(phase = %self.phase, max_attempts, "Polling timed out");
        Err(self.phase.timeout_error(max_attempts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn upload(status: UploadRecordStatus, asset_id: Option<&str>) -> UploadStatusResponse {
        UploadStatusResponse {
            status,
            asset_id: asset_id.map(str::to_string),
        }
    }

    fn asset(status: AssetStatus, playback_id: Option<&str>) -> AssetStatusResponse {
        AssetStatusResponse {
            status,
            playback_id: playback_id.map(str::to_string),
            duration: Some(12.0),
        }
    }

    #[test]
    fn test_upload_decision() {
        assert_eq!(
            decide_upload_status(&upload(UploadRecordStatus::AssetCreated, Some("a1"))),
            PollDecision::Advance("a1".to_string())
        );
        // asset_created without an asset id keeps waiting
        assert_eq!(
            decide_upload_status(&upload(UploadRecordStatus::AssetCreated, Some("  "))),
            PollDecision::Continue
        );
        assert_eq!(
            decide_upload_status(&upload(UploadRecordStatus::Waiting, None)),
            PollDecision::Continue
        );
        assert_eq!(
            decide_upload_status(&upload(UploadRecordStatus::Unknown, None)),
            PollDecision::Continue
        );
        assert_eq!(
            decide_upload_status(&upload(UploadRecordStatus::TimedOut, None)),
            PollDecision::Fail(UploadError::UploadProcessingFailed {
                status: "timed_out".to_string()
            })
        );
    }

    #[test]
    fn test_asset_decision() {
        match decide_asset_status(&asset(AssetStatus::Ready, Some("p1"))) {
            PollDecision::Advance(completion) => {
                assert_eq!(completion.playback_id, "p1");
                assert_eq!(completion.duration_secs, 12.0);
            }
            other => panic!("unexpected decision: {:?}", other),
        }
        assert!(matches!(
            decide_asset_status(&asset(AssetStatus::Ready, None)),
            PollDecision::Fail(UploadError::ProcessingFailed(_))
        ));
        assert!(matches!(
            decide_asset_status(&asset(AssetStatus::Errored, None)),
            PollDecision::Fail(UploadError::ProcessingFailed(_))
        ));
        assert_eq!(
            decide_asset_status(&asset(AssetStatus::Preparing, None)),
            PollDecision::Continue
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_times_out_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let poller = Poller::new(
            PollPhase::Asset,
            PollPolicy::new(Duration::from_secs(5), 4),
        );
        let start = tokio::time::Instant::now();

        let result: Result<(), UploadError> = poller
            .run(
                &CancellationToken::new(),
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok(()) }
                },
                |_: &()| PollDecision::Continue,
            )
            .await;

        assert_eq!(result, Err(UploadError::ProcessingTimeout { attempts: 4 }));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // three sleeps between four queries, none after the last
        assert_eq!(start.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_error_stops_polling() {
        let calls = AtomicU32::new(0);
        let poller = Poller::new(PollPhase::UploadRecord, PollPolicy::upload_record());

        let result: Result<(), UploadError> = poller
            .run(
                &CancellationToken::new(),
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err::<(), _>(anyhow::anyhow!("connection reset")) }
                },
                |_: &()| PollDecision::Continue,
            )
            .await;

        match result {
            Err(UploadError::StatusCheckFailed { phase, reason }) => {
                assert_eq!(phase, PollPhase::UploadRecord);
                assert!(reason.contains("connection reset"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_token_ends_polling() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result: Result<(), UploadError> = Poller::new(PollPhase::Asset, PollPolicy::asset())
            .run(
                &cancel,
                || async { Ok(()) },
                |_: &()| PollDecision::Advance(()),
            )
            .await;

        assert_eq!(result, Err(UploadError::Cancelled));
    }
}
