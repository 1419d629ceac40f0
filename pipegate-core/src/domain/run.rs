//! Pipeline run domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier the remote service assigns to a run (unique per pipeline)
pub type RunId = i64;

/// Identifier of a pipeline definition
pub type PipelineId = i64;

const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// One triggered execution of a pipeline
///
/// Immutable once created; the engine never updates it after the trigger call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub id: RunId,
    pub pipeline_id: PipelineId,
    pub name: String,
    pub state: RunState,
    pub branch_ref: String,
    pub stages_to_skip: Vec<String>,
    pub web_url: Option<String>,
}

/// Run state as reported by the service at trigger time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunState {
    InProgress,
    Canceling,
    Completed,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunState::InProgress => "inProgress",
            RunState::Canceling => "canceling",
            RunState::Completed => "completed",
            RunState::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Everything needed to trigger a run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunRequest {
    pub pipeline_id: PipelineId,
    /// Fully qualified ref, see [`RunRequest::new`]
    pub branch_ref: String,
    /// Stage names to skip, sent in the given order
    pub stages_to_skip: Vec<String>,
    /// Pipeline variables injected into the run
    pub variables: BTreeMap<String, String>,
}

impl RunRequest {
    /// Creates a request for `branch`, qualifying bare branch names
    pub fn new(pipeline_id: PipelineId, branch: &str) -> Self {
        Self {
            pipeline_id,
            branch_ref: qualify_branch_ref(branch),
            stages_to_skip: Vec::new(),
            variables: BTreeMap::new(),
        }
    }

    pub fn with_stages_to_skip(mut self, stages: Vec<String>) -> Self {
        self.stages_to_skip = stages;
        self
    }

    pub fn with_variables(mut self, variables: BTreeMap<String, String>) -> Self {
        self.variables = variables;
        self
    }
}

/// Expands `main` into `refs/heads/main`; refs already under `refs/` pass through
pub fn qualify_branch_ref(branch: &str) -> String {
    if branch.starts_with("refs/") {
        branch.to_string()
    } else {
        format!("{}{}", BRANCH_REF_PREFIX, branch)
    }
}
