//! Approval poller
//!
//! Polls a run's timeline until an approval checkpoint shows up or the
//! deadline passes. States: polling, then either found or timed out; both
//! are terminal.

use pipegate_client::PipelineApi;
use pipegate_core::domain::run::RunId;
use pipegate_core::domain::timeline::first_approval_checkpoint;
use std::sync::Arc;
use tokio::time::{self, Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::PollPolicy;
use crate::error::EngineError;

/// Terminal result of waiting for an approval checkpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalWait {
    /// Id of the first approval checkpoint in the timeline
    Found(String),
    /// The deadline elapsed without a checkpoint appearing
    TimedOut,
}

/// Waits for approval checkpoints on runs
pub struct ApprovalPoller {
    client: Arc<dyn PipelineApi>,
    policy: PollPolicy,
}

impl ApprovalPoller {
    /// Creates a new approval poller
    pub fn new(client: Arc<dyn PipelineApi>, policy: PollPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Polls the timeline of `run_id` for at most `deadline`
    ///
    /// Elapsed time is checked before each fetch, so no fetch starts once
    /// the deadline has passed; a fetch already in flight is allowed to
    /// finish. Transient client errors count as an empty round; a missing
    /// run, a rejected credential or any other refused request aborts.
    pub async fn wait_for_approval(
        &self,
        run_id: RunId,
        deadline: Duration,
    ) -> Result<ApprovalWait, EngineError> {
        if deadline.is_zero() {
            return Err(EngineError::InvalidDeadline);
        }
        self.policy.validate()?;

        info!(
            "Waiting up to {:?} for an approval checkpoint on run {}",
            deadline, run_id
        );

        let started = Instant::now();
        let mut delay = self.policy.interval;
        let mut attempt: u32 = 0;

        loop {
            if started.elapsed() >= deadline {
                info!(
                    "No approval checkpoint on run {} after {} attempt(s)",
                    run_id, attempt
                );
                return Ok(ApprovalWait::TimedOut);
            }

            attempt += 1;

            match self.client.fetch_timeline(run_id).await {
                Ok(records) => {
                    if let Some(checkpoint_id) = first_approval_checkpoint(&records) {
                        info!(
                            "Found approval checkpoint {} on run {} (attempt {})",
                            checkpoint_id, run_id, attempt
                        );
                        return Ok(ApprovalWait::Found(checkpoint_id.to_string()));
                    }
                    debug!(
                        "Run {} has {} timeline record(s), no approval yet",
                        run_id,
                        records.len()
                    );
                }
                Err(e) if e.is_unauthorized() => {
                    return Err(EngineError::Unauthorized(e));
                }
                Err(e) if e.is_fatal() => {
                    return Err(EngineError::RunUnavailable { run_id, source: e });
                }
                Err(e) if e.is_transient() => {
                    warn!("Timeline fetch for run {} failed, retrying: {}", run_id, e);
                }
                Err(e) => {
                    return Err(EngineError::TimelineRejected { run_id, source: e });
                }
            }

            let remaining = deadline.saturating_sub(started.elapsed());
            time::sleep(delay.min(remaining)).await;
            delay = self.policy.next_interval(delay);
        }
    }
}
