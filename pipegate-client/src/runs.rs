//! Run-related API endpoints

use pipegate_core::domain::run::{PipelineRun, RunId, RunRequest};
use pipegate_core::domain::timeline::TimelineRecord;
use pipegate_core::dto::run::{RunPipelineRequest, RunResponse};
use pipegate_core::dto::timeline::TimelineResponse;
use reqwest::Method;
use tracing::debug;

use crate::DevOpsClient;
use crate::error::Result;

impl DevOpsClient {
    // =============================================================================
    // Runs
    // =============================================================================

    /// Trigger a run of a pipeline
    ///
    /// # Arguments
    /// * `req` - Pipeline, branch ref, stages to skip and variables
    ///
    /// # Returns
    /// The created run
    pub async fn trigger_run(&self, req: &RunRequest) -> Result<PipelineRun> {
        let url = self.api_url(&format!("pipelines/{}/runs", req.pipeline_id));
        debug!(pipeline_id = req.pipeline_id, branch = %req.branch_ref, "triggering run");

        let response = self
            .request(Method::POST, &url)
            .json(&RunPipelineRequest::from(req))
            .send()
            .await?;

        let body: RunResponse = self.handle_response(response).await?;
        Ok(body.into_run(req)?)
    }

    /// Fetch the timeline of a run
    ///
    /// # Arguments
    /// * `run_id` - The run (build) id returned by [`DevOpsClient::trigger_run`]
    ///
    /// # Returns
    /// Timeline records in the order the service returned them
    pub async fn fetch_timeline(&self, run_id: RunId) -> Result<Vec<TimelineRecord>> {
        let url = self.api_url(&format!("build/builds/{}/timeline", run_id));
        let response = self.request(Method::GET, &url).send().await?;

        let body: TimelineResponse = self.handle_response(response).await?;
        Ok(body.into_records()?)
    }
}
