//! Service layer
//!
//! Business logic of the engine: reducing pending approvals to the latest
//! one per pipeline, and the orchestrator flows built on the client and the
//! poller.

mod dedup;
mod orchestrator;

pub use dedup::{reduce_to_latest_per_pipeline, sorted_by_pipeline};
pub use orchestrator::{ApprovalOutcome, BatchReport, Orchestrator, RunOutcome};
