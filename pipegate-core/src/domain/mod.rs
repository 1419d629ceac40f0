//! Core domain types
//!
//! These types are what the engine and CLI work with. They are decoupled
//! from the wire format of the remote service; see [`crate::dto`] for that.

pub mod approval;
pub mod run;
pub mod timeline;
