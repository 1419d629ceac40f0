//! The client contract the engine depends on

use async_trait::async_trait;
use pipegate_core::domain::approval::{ApprovalDecision, PendingApproval};
use pipegate_core::domain::run::{PipelineRun, RunId, RunRequest};
use pipegate_core::domain::timeline::TimelineRecord;

use crate::DevOpsClient;
use crate::error::Result;

/// Request/response operations against the remote pipeline service
///
/// Implementations perform exactly one remote call per method and never
/// retry; retry policy belongs to the caller. Trait-based so flows can be
/// exercised against a scripted service in tests.
#[async_trait]
pub trait PipelineApi: Send + Sync {
    /// Starts a run and returns it
    async fn trigger_run(&self, req: &RunRequest) -> Result<PipelineRun>;

    /// Returns the run's timeline records in service order
    async fn fetch_timeline(&self, run_id: RunId) -> Result<Vec<TimelineRecord>>;

    /// Returns all approvals awaiting a decision
    async fn list_pending_approvals(&self) -> Result<Vec<PendingApproval>>;

    /// Submits one decision
    async fn submit_decision(&self, decision: &ApprovalDecision) -> Result<()>;
}

#[async_trait]
impl PipelineApi for DevOpsClient {
    async fn trigger_run(&self, req: &RunRequest) -> Result<PipelineRun> {
        DevOpsClient::trigger_run(self, req).await
    }

    async fn fetch_timeline(&self, run_id: RunId) -> Result<Vec<TimelineRecord>> {
        DevOpsClient::fetch_timeline(self, run_id).await
    }

    async fn list_pending_approvals(&self) -> Result<Vec<PendingApproval>> {
        DevOpsClient::list_pending_approvals(self).await
    }

    async fn submit_decision(&self, decision: &ApprovalDecision) -> Result<()> {
        DevOpsClient::submit_decision(self, decision).await
    }
}
