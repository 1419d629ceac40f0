//! Approval DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::{Links, MissingField, require};
use crate::domain::approval::{ApprovalDecision, ApprovalStatus, PendingApproval};

/// Response of `GET _apis/pipelines/approvals`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApprovalListResponse {
    pub count: Option<u32>,
    pub value: Option<Vec<ApprovalDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalDto {
    pub id: Option<String>,
    pub pipeline: Option<PipelineReference>,
    pub created_on: Option<DateTime<Utc>>,
    pub min_required_approvers: Option<u32>,
    pub status: Option<String>,
    #[serde(rename = "_links")]
    pub links: Option<Links>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineReference {
    /// The service sends this as a number on some endpoints and a string on others
    pub id: Option<JsonValue>,
    pub name: Option<String>,
}

impl PipelineReference {
    fn numeric_id(&self) -> Option<i64> {
        match self.id.as_ref()? {
            JsonValue::Number(n) => n.as_i64(),
            JsonValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl ApprovalDto {
    pub fn into_pending(self) -> Result<PendingApproval, MissingField> {
        let pipeline = require(self.pipeline, "value[].pipeline")?;
        let pipeline_id = pipeline.numeric_id();

        Ok(PendingApproval {
            id: require(self.id, "value[].id")?,
            pipeline_name: require(pipeline.name, "value[].pipeline.name")?,
            pipeline_id,
            created_on: require(self.created_on, "value[].createdOn")?,
            min_required_approvers: require(
                self.min_required_approvers,
                "value[].minRequiredApprovers",
            )?,
            detail_url: self.links.and_then(|l| l.self_link).and_then(|l| l.href),
        })
    }
}

impl ApprovalListResponse {
    pub fn into_pending(self) -> Result<Vec<PendingApproval>, MissingField> {
        require(self.value, "value")?
            .into_iter()
            .map(ApprovalDto::into_pending)
            .collect()
    }
}

/// One element of the `PATCH _apis/pipelines/approvals` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalUpdate {
    pub approval_id: String,
    pub comment: String,
    pub status: ApprovalStatus,
}

impl From<&ApprovalDecision> for ApprovalUpdate {
    fn from(decision: &ApprovalDecision) -> Self {
        Self {
            approval_id: decision.approval_id.clone(),
            comment: decision.comment.clone(),
            status: decision.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_into_pending() {
        let response: ApprovalListResponse = serde_json::from_value(json!({
            "count": 2,
            "value": [
                {
                    "id": "a1",
                    "pipeline": { "id": "7", "name": "web-app" },
                    "createdOn": "2024-05-01T10:00:00Z",
                    "minRequiredApprovers": 1,
                    "status": "pending",
                    "_links": { "self": { "href": "https://dev.azure.com/o/p/_apis/pipelines/approvals/a1" } }
                },
                {
                    "id": "a2",
                    "pipeline": { "id": 9, "name": "api" },
                    "createdOn": "2024-05-02T08:30:00.123Z",
                    "minRequiredApprovers": 2
                }
            ]
        }))
        .unwrap();

        let pending = response.into_pending().unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].pipeline_name, "web-app");
        assert_eq!(pending[0].pipeline_id, Some(7));
        assert!(pending[0].detail_url.is_some());
        assert_eq!(pending[1].pipeline_id, Some(9));
        assert_eq!(pending[1].min_required_approvers, 2);
        assert!(pending[1].detail_url.is_none());
    }

    #[test]
    fn test_missing_pipeline_name() {
        let response: ApprovalListResponse = serde_json::from_value(json!({
            "value": [{ "id": "a1", "pipeline": {}, "createdOn": "2024-05-01T10:00:00Z", "minRequiredApprovers": 1 }]
        }))
        .unwrap();

        assert_eq!(
            response.into_pending().unwrap_err(),
            MissingField("value[].pipeline.name")
        );
    }

    #[test]
    fn test_update_body() {
        let decision = ApprovalDecision {
            approval_id: "abc".to_string(),
            status: ApprovalStatus::Approved,
            comment: "ok".to_string(),
        };

        let body = serde_json::to_value(vec![ApprovalUpdate::from(&decision)]).unwrap();
        assert_eq!(
            body,
            json!([{ "approvalId": "abc", "comment": "ok", "status": "approved" }])
        );
    }
}
