//! Timeline DTOs

use serde::Deserialize;

use super::{MissingField, require};
use crate::domain::timeline::TimelineRecord;

/// Response of `GET _apis/build/builds/{id}/timeline`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineResponse {
    pub records: Option<Vec<TimelineRecordDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineRecordDto {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub name: Option<String>,
    pub state: Option<String>,
}

impl TimelineResponse {
    /// Converts every record, preserving the service's order
    pub fn into_records(self) -> Result<Vec<TimelineRecord>, MissingField> {
        require(self.records, "records")?
            .into_iter()
            .map(|r| {
                Ok(TimelineRecord {
                    id: require(r.id, "records[].id")?,
                    record_type: require(r.record_type, "records[].type")?,
                    name: r.name,
                    state: r.state,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_records_keeps_order() {
        let response: TimelineResponse = serde_json::from_value(json!({
            "records": [
                { "id": "t1", "type": "Task", "name": "Build", "state": "completed" },
                { "id": "abc", "type": "Checkpoint.Approval", "state": "inProgress" }
            ]
        }))
        .unwrap();

        let records = response.into_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "t1");
        assert_eq!(records[0].name.as_deref(), Some("Build"));
        assert!(records[1].is_approval_checkpoint());
    }

    #[test]
    fn test_missing_records() {
        let response: TimelineResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(
            response.into_records().unwrap_err(),
            MissingField("records")
        );
    }

    #[test]
    fn test_record_missing_type() {
        let response: TimelineResponse =
            serde_json::from_value(json!({ "records": [{ "id": "x" }] })).unwrap();
        assert_eq!(
            response.into_records().unwrap_err(),
            MissingField("records[].type")
        );
    }
}
