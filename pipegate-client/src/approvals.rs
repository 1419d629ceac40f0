//! Approval-related API endpoints

use pipegate_core::domain::approval::{ApprovalDecision, PendingApproval};
use pipegate_core::dto::approval::{ApprovalListResponse, ApprovalUpdate};
use reqwest::Method;
use tracing::debug;

use crate::DevOpsClient;
use crate::error::Result;

impl DevOpsClient {
    // =============================================================================
    // Approvals
    // =============================================================================

    /// List every approval awaiting a decision in the project
    pub async fn list_pending_approvals(&self) -> Result<Vec<PendingApproval>> {
        let url = self.api_url("pipelines/approvals?state=pending");
        let response = self.request(Method::GET, &url).send().await?;

        let body: ApprovalListResponse = self.handle_response(response).await?;
        Ok(body.into_pending()?)
    }

    /// Submit an approve/reject decision for one approval
    ///
    /// The endpoint accepts a batch; this always sends a single element.
    pub async fn submit_decision(&self, decision: &ApprovalDecision) -> Result<()> {
        let url = self.api_url("pipelines/approvals");
        debug!(approval_id = %decision.approval_id, status = %decision.status, "submitting decision");

        let response = self
            .request(Method::PATCH, &url)
            .json(&[ApprovalUpdate::from(decision)])
            .send()
            .await?;

        self.handle_empty_response(response).await
    }
}
