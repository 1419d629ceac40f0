//! Pipegate Engine
//!
//! Run-poll-approve orchestration on top of [`pipegate_client::PipelineApi`].
//!
//! Architecture:
//! - Configuration: poll interval, backoff and default deadline
//! - Scheduler: the approval poller, a bounded-time wait for a checkpoint
//! - Services: latest-approval-per-pipeline reduction and the two flows
//!   (single run, batch) composed by the orchestrator
//!
//! Everything runs sequentially on the caller's task; no request overlaps
//! another and nothing is shared between invocations.

pub mod config;
pub mod error;
pub mod scheduler;
pub mod service;

#[cfg(test)]
mod testing;

pub use config::{DEFAULT_DEADLINE, PollPolicy};
pub use error::EngineError;
pub use scheduler::{ApprovalPoller, ApprovalWait};
pub use service::{
    ApprovalOutcome, BatchReport, Orchestrator, RunOutcome, reduce_to_latest_per_pipeline,
    sorted_by_pipeline,
};
