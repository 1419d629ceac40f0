//! Orchestrator
//!
//! Composes the client, the poller and the deduplicator into the
//! user-facing flows. Each flow runs sequentially on the caller's task.

use pipegate_client::{ClientError, PipelineApi};
use pipegate_core::domain::approval::{ApprovalDecision, DecisionTemplate, PendingApproval};
use pipegate_core::domain::run::{PipelineRun, RunRequest};
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{error, info, warn};

use crate::config::PollPolicy;
use crate::error::EngineError;
use crate::scheduler::{ApprovalPoller, ApprovalWait};
use crate::service::dedup::{reduce_to_latest_per_pipeline, sorted_by_pipeline};

/// Terminal outcome of [`Orchestrator::run_and_approve`]
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// A checkpoint appeared and the decision was accepted
    Decided {
        run: PipelineRun,
        decision: ApprovalDecision,
    },
    /// No checkpoint appeared before the deadline; nothing was submitted
    TimedOut { run: PipelineRun },
}

impl RunOutcome {
    pub fn run(&self) -> &PipelineRun {
        match self {
            RunOutcome::Decided { run, .. } | RunOutcome::TimedOut { run } => run,
        }
    }
}

/// Result of one submission in a batch
#[derive(Debug)]
pub struct ApprovalOutcome {
    pub approval: PendingApproval,
    pub decision: ApprovalDecision,
    pub result: Result<(), ClientError>,
}

impl ApprovalOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-approval outcomes of [`Orchestrator::approve_all_latest`], in submission order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ApprovalOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &ApprovalOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ApprovalOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(ApprovalOutcome::is_success)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Runs the trigger/poll/approve and list/dedup/approve-all flows
pub struct Orchestrator {
    client: Arc<dyn PipelineApi>,
    poller: ApprovalPoller,
}

impl Orchestrator {
    /// Creates an orchestrator on top of an already configured client
    pub fn new(client: Arc<dyn PipelineApi>, policy: PollPolicy) -> Self {
        let poller = ApprovalPoller::new(Arc::clone(&client), policy);
        Self { client, poller }
    }

    /// Triggers a run, waits for its approval checkpoint and decides it
    ///
    /// Inputs are validated before the run is triggered. A timeout ends the
    /// flow without a decision and is reported as [`RunOutcome::TimedOut`].
    pub async fn run_and_approve(
        &self,
        req: RunRequest,
        deadline: Duration,
        template: &DecisionTemplate,
    ) -> Result<RunOutcome, EngineError> {
        if deadline.is_zero() {
            return Err(EngineError::InvalidDeadline);
        }
        self.poller.policy().validate()?;

        let run = self
            .client
            .trigger_run(&req)
            .await
            .map_err(|source| EngineError::Trigger {
                pipeline_id: req.pipeline_id,
                source,
            })?;

        info!(
            "Triggered run {} ({}) of pipeline {} on {}",
            run.id, run.name, run.pipeline_id, run.branch_ref
        );

        match self.poller.wait_for_approval(run.id, deadline).await? {
            ApprovalWait::Found(checkpoint_id) => {
                let decision = self.approve_one(&checkpoint_id, template).await?;
                Ok(RunOutcome::Decided { run, decision })
            }
            ApprovalWait::TimedOut => {
                warn!(
                    "Run {} produced no approval checkpoint within {:?}",
                    run.id, deadline
                );
                Ok(RunOutcome::TimedOut { run })
            }
        }
    }

    /// Submits `template` for a single known approval
    pub async fn approve_one(
        &self,
        approval_id: &str,
        template: &DecisionTemplate,
    ) -> Result<ApprovalDecision, EngineError> {
        let decision = template.for_approval(approval_id);

        self.client
            .submit_decision(&decision)
            .await
            .map_err(|source| EngineError::Submit {
                approval_id: approval_id.to_string(),
                source,
            })?;

        info!("Approval {} {}", approval_id, decision.status);
        Ok(decision)
    }

    /// Lists all pending approvals, newest first
    pub async fn list_pending(&self) -> Result<Vec<PendingApproval>, EngineError> {
        let mut approvals = self
            .client
            .list_pending_approvals()
            .await
            .map_err(EngineError::ListApprovals)?;

        approvals.sort_by(|a, b| b.created_on.cmp(&a.created_on));
        Ok(approvals)
    }

    /// Decides the newest pending approval of every pipeline
    ///
    /// Submissions go out one at a time in pipeline-name order. A failed
    /// submission is recorded and the batch moves on. A rejected credential
    /// stops the batch; the outcomes so far travel with
    /// [`EngineError::BatchAborted`].
    pub async fn approve_all_latest(
        &self,
        template: &DecisionTemplate,
    ) -> Result<BatchReport, EngineError> {
        let pending = self
            .client
            .list_pending_approvals()
            .await
            .map_err(EngineError::ListApprovals)?;

        let total = pending.len();
        let latest = sorted_by_pipeline(reduce_to_latest_per_pipeline(pending));

        info!(
            "{} pending approval(s) across {} pipeline(s)",
            total,
            latest.len()
        );

        let mut report = BatchReport::default();

        for approval in latest {
            let decision = template.for_approval(approval.id.clone());
            match self.client.submit_decision(&decision).await {
                Ok(()) => {
                    info!(
                        "Approval {} of {} {}",
                        approval.id, approval.pipeline_name, decision.status
                    );
                    report.outcomes.push(ApprovalOutcome {
                        approval,
                        decision,
                        result: Ok(()),
                    });
                }
                Err(e) if e.is_unauthorized() => {
                    error!("Credential rejected, stopping batch: {}", e);
                    return Err(EngineError::BatchAborted { report, source: e });
                }
                Err(e) => {
                    error!(
                        "Failed to decide approval {} of {}: {}",
                        approval.id, approval.pipeline_name, e
                    );
                    report.outcomes.push(ApprovalOutcome {
                        approval,
                        decision,
                        result: Err(e),
                    });
                }
            }
        }

        Ok(report)
    }
}
