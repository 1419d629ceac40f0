//! Approval domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// An outstanding approval, viewed across all pipelines of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingApproval {
    pub id: String,
    pub pipeline_name: String,
    pub pipeline_id: Option<i64>,
    pub created_on: DateTime<Utc>,
    pub min_required_approvers: u32,
    pub detail_url: Option<String>,
}

/// Outcome submitted for an approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown approval status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid approval status `{0}` (expected `approved` or `rejected`)")]
pub struct InvalidStatus(pub String);

impl FromStr for ApprovalStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approved" | "approve" => Ok(ApprovalStatus::Approved),
            "rejected" | "reject" => Ok(ApprovalStatus::Rejected),
            _ => Err(InvalidStatus(s.to_string())),
        }
    }
}

/// A decision for exactly one approval
///
/// Single use: the engine submits it once and never retries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalDecision {
    pub approval_id: String,
    pub status: ApprovalStatus,
    pub comment: String,
}

/// Status and comment applied to every approval a flow resolves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionTemplate {
    pub status: ApprovalStatus,
    pub comment: String,
}

impl DecisionTemplate {
    pub fn new(status: ApprovalStatus, comment: impl Into<String>) -> Self {
        Self {
            status,
            comment: comment.into(),
        }
    }

    pub fn approve(comment: impl Into<String>) -> Self {
        Self::new(ApprovalStatus::Approved, comment)
    }

    pub fn reject(comment: impl Into<String>) -> Self {
        Self::new(ApprovalStatus::Rejected, comment)
    }

    /// Builds the decision for one approval id
    pub fn for_approval(&self, approval_id: impl Into<String>) -> ApprovalDecision {
        ApprovalDecision {
            approval_id: approval_id.into(),
            status: self.status,
            comment: self.comment.clone(),
        }
    }
}
