//! Scripted in-memory pipeline service for engine tests

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use pipegate_client::{ClientError, PipelineApi, Result};
use pipegate_core::domain::approval::{ApprovalDecision, PendingApproval};
use pipegate_core::domain::run::{PipelineRun, RunId, RunRequest, RunState};
use pipegate_core::domain::timeline::TimelineRecord;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

/// How a scripted call should fail
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Transport,
    Server,
    BadRequest,
    Unauthorized,
    NotFound,
}

impl Failure {
    pub fn to_error(self) -> ClientError {
        match self {
            // reqwest errors cannot be built by hand; a parse error stands in
            Failure::Transport => ClientError::ParseError("connection reset".to_string()),
            Failure::Server => ClientError::api_error(503, "service unavailable"),
            Failure::BadRequest => ClientError::api_error(400, "invalid build id"),
            Failure::Unauthorized => ClientError::Unauthorized {
                status: 401,
                message: "token expired".to_string(),
            },
            Failure::NotFound => ClientError::NotFound("build not found".to_string()),
        }
    }
}

#[derive(Default)]
pub struct ScriptedApi {
    pub run_id: RunId,
    pub trigger_failure: Option<Failure>,
    /// Consumed one per fetch; an exhausted script yields empty timelines
    pub timelines: Mutex<VecDeque<std::result::Result<Vec<TimelineRecord>, Failure>>>,
    pub pending: Vec<PendingApproval>,
    pub list_failure: Option<Failure>,
    /// Approval ids whose submission fails, and how
    pub failing_submissions: Vec<(String, Failure)>,

    pub triggered: Mutex<Vec<RunRequest>>,
    pub fetches: Mutex<Vec<tokio::time::Instant>>,
    pub submitted: Mutex<Vec<ApprovalDecision>>,
}

impl ScriptedApi {
    pub fn with_run(run_id: RunId) -> Self {
        Self {
            run_id,
            ..Default::default()
        }
    }

    pub fn push_timeline(&self, records: Vec<TimelineRecord>) {
        self.timelines.lock().unwrap().push_back(Ok(records));
    }

    pub fn push_failure(&self, failure: Failure) {
        self.timelines.lock().unwrap().push_back(Err(failure));
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }

    pub fn submitted_ids(&self) -> Vec<String> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.approval_id.clone())
            .collect()
    }

    pub fn distinct_submissions(&self) -> usize {
        self.submitted_ids().into_iter().collect::<HashSet<_>>().len()
    }
}

#[async_trait]
impl PipelineApi for ScriptedApi {
    async fn trigger_run(&self, req: &RunRequest) -> Result<PipelineRun> {
        self.triggered.lock().unwrap().push(req.clone());
        if let Some(failure) = self.trigger_failure {
            return Err(failure.to_error());
        }
        Ok(PipelineRun {
            id: self.run_id,
            pipeline_id: req.pipeline_id,
            name: format!("run-{}", self.run_id),
            state: RunState::InProgress,
            branch_ref: req.branch_ref.clone(),
            stages_to_skip: req.stages_to_skip.clone(),
            web_url: None,
        })
    }

    async fn fetch_timeline(&self, _run_id: RunId) -> Result<Vec<TimelineRecord>> {
        self.fetches.lock().unwrap().push(tokio::time::Instant::now());
        match self.timelines.lock().unwrap().pop_front() {
            Some(Ok(records)) => Ok(records),
            Some(Err(failure)) => Err(failure.to_error()),
            None => Ok(Vec::new()),
        }
    }

    async fn list_pending_approvals(&self) -> Result<Vec<PendingApproval>> {
        if let Some(failure) = self.list_failure {
            return Err(failure.to_error());
        }
        Ok(self.pending.clone())
    }

    async fn submit_decision(&self, decision: &ApprovalDecision) -> Result<()> {
        self.submitted.lock().unwrap().push(decision.clone());
        match self
            .failing_submissions
            .iter()
            .find(|(id, _)| *id == decision.approval_id)
        {
            Some((_, failure)) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

/// Minute offsets from a fixed base keep timestamps readable in tests
pub fn at_minute(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap() + chrono::Duration::minutes(minute)
}

pub fn approval(id: &str, pipeline: &str, minute: i64) -> PendingApproval {
    PendingApproval {
        id: id.to_string(),
        pipeline_name: pipeline.to_string(),
        pipeline_id: None,
        created_on: at_minute(minute),
        min_required_approvers: 1,
        detail_url: None,
    }
}
