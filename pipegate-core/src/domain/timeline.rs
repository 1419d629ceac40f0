//! Run timeline domain types

use serde::{Deserialize, Serialize};

/// Record type tag of a manual approval checkpoint
pub const APPROVAL_CHECKPOINT_TYPE: &str = "Checkpoint.Approval";

/// One entry of a run's timeline (stage, job, task, checkpoint, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineRecord {
    pub id: String,
    pub record_type: String,
    pub name: Option<String>,
    pub state: Option<String>,
}

impl TimelineRecord {
    pub fn new(id: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            record_type: record_type.into(),
            name: None,
            state: None,
        }
    }

    /// Whether this record is a manual approval gate
    pub fn is_approval_checkpoint(&self) -> bool {
        self.record_type == APPROVAL_CHECKPOINT_TYPE
    }
}

/// Returns the id of the first approval checkpoint, in the order given
pub fn first_approval_checkpoint(records: &[TimelineRecord]) -> Option<&str> {
    records
        .iter()
        .find(|r| r.is_approval_checkpoint())
        .map(|r| r.id.as_str())
}
