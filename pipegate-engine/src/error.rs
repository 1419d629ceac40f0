//! Engine error types

use pipegate_client::ClientError;
use pipegate_core::domain::run::{PipelineId, RunId};
use thiserror::Error;

use crate::service::BatchReport;

/// Failures that end a flow
///
/// A timeout is not an error; see [`crate::ApprovalWait::TimedOut`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("deadline must be a positive duration")]
    InvalidDeadline,

    #[error("invalid poll policy: {0}")]
    InvalidPolicy(String),

    #[error("failed to trigger run of pipeline {pipeline_id}: {source}")]
    Trigger {
        pipeline_id: PipelineId,
        #[source]
        source: ClientError,
    },

    #[error("run {run_id} is no longer available: {source}")]
    RunUnavailable {
        run_id: RunId,
        #[source]
        source: ClientError,
    },

    #[error("timeline request for run {run_id} was rejected: {source}")]
    TimelineRejected {
        run_id: RunId,
        #[source]
        source: ClientError,
    },

    #[error("credential rejected: {0}")]
    Unauthorized(#[source] ClientError),

    #[error("failed to list pending approvals: {0}")]
    ListApprovals(#[source] ClientError),

    #[error("failed to submit decision for approval {approval_id}: {source}")]
    Submit {
        approval_id: String,
        #[source]
        source: ClientError,
    },

    #[error("batch aborted after {} submission(s): {}", .report.outcomes.len(), .source)]
    BatchAborted {
        report: BatchReport,
        #[source]
        source: ClientError,
    },
}

impl EngineError {
    /// The client error behind this failure, if any
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            EngineError::Trigger { source, .. }
            | EngineError::RunUnavailable { source, .. }
            | EngineError::TimelineRejected { source, .. }
            | EngineError::Submit { source, .. }
            | EngineError::BatchAborted { source, .. } => Some(source),
            EngineError::ListApprovals(source) | EngineError::Unauthorized(source) => Some(source),
            EngineError::InvalidDeadline | EngineError::InvalidPolicy(_) => None,
        }
    }

    /// Whether the service rejected the credential
    pub fn is_unauthorized(&self) -> bool {
        self.client_error().is_some_and(ClientError::is_unauthorized)
    }
}
