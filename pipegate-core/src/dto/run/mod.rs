//! Run DTOs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Links, MissingField, require};
use crate::domain::run::{PipelineRun, RunRequest, RunState};

/// Body of `POST _apis/pipelines/{id}/runs`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPipelineRequest {
    pub resources: RunResources,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stages_to_skip: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, VariableValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResources {
    pub repositories: RepositoryResources,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryResources {
    #[serde(rename = "self")]
    pub self_repository: RepositoryRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRef {
    pub ref_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableValue {
    pub value: String,
}

impl From<&RunRequest> for RunPipelineRequest {
    fn from(req: &RunRequest) -> Self {
        Self {
            resources: RunResources {
                repositories: RepositoryResources {
                    self_repository: RepositoryRef {
                        ref_name: req.branch_ref.clone(),
                    },
                },
            },
            stages_to_skip: req.stages_to_skip.clone(),
            variables: req
                .variables
                .iter()
                .map(|(k, v)| (k.clone(), VariableValue { value: v.clone() }))
                .collect(),
        }
    }
}

/// Response of the trigger call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunResponse {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub state: Option<RunState>,
    #[serde(rename = "_links")]
    pub links: Option<Links>,
}

impl RunResponse {
    /// Builds the domain run, combining the response with what was requested
    pub fn into_run(self, req: &RunRequest) -> Result<PipelineRun, MissingField> {
        let id = require(self.id, "id")?;
        let name = require(self.name, "name")?;
        let web_url = self.links.and_then(|l| l.web).and_then(|w| w.href);

        Ok(PipelineRun {
            id,
            pipeline_id: req.pipeline_id,
            name,
            state: self.state.unwrap_or(RunState::Unknown),
            branch_ref: req.branch_ref.clone(),
            stages_to_skip: req.stages_to_skip.clone(),
            web_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let mut variables = BTreeMap::new();
        variables.insert("env".to_string(), "staging".to_string());

        let req = RunRequest::new(42, "main")
            .with_stages_to_skip(vec!["Deploy".to_string()])
            .with_variables(variables);

        let body = serde_json::to_value(RunPipelineRequest::from(&req)).unwrap();
        assert_eq!(
            body,
            json!({
                "resources": { "repositories": { "self": { "refName": "refs/heads/main" } } },
                "stagesToSkip": ["Deploy"],
                "variables": { "env": { "value": "staging" } }
            })
        );
    }

    #[test]
    fn test_request_body_omits_empty_collections() {
        let req = RunRequest::new(42, "main");
        let body = serde_json::to_value(RunPipelineRequest::from(&req)).unwrap();

        assert!(body.get("stagesToSkip").is_none());
        assert!(body.get("variables").is_none());
    }

    #[test]
    fn test_response_into_run() {
        let response: RunResponse = serde_json::from_value(json!({
            "id": 101,
            "name": "20240101.1",
            "state": "inProgress",
            "_links": { "web": { "href": "https://dev.azure.com/org/proj/_build/results?buildId=101" } }
        }))
        .unwrap();

        let run = response.into_run(&RunRequest::new(42, "main")).unwrap();
        assert_eq!(run.id, 101);
        assert_eq!(run.pipeline_id, 42);
        assert_eq!(run.state, RunState::InProgress);
        assert_eq!(run.branch_ref, "refs/heads/main");
        assert!(run.web_url.unwrap().ends_with("buildId=101"));
    }

    #[test]
    fn test_response_missing_id() {
        let response: RunResponse = serde_json::from_value(json!({ "name": "x" })).unwrap();
        let err = response.into_run(&RunRequest::new(1, "main")).unwrap_err();
        assert_eq!(err, MissingField("id"));
    }
}
