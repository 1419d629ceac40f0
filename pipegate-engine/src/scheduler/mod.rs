//! Scheduler layer
//!
//! Time-bounded waiting on the remote service. The poller owns the only
//! retry loop in the system; the client below it never retries.

pub mod poller;

pub use poller::{ApprovalPoller, ApprovalWait};
