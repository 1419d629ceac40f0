//! Pipegate Core
//!
//! Core types for driving pipeline runs and approval gates on a remote
//! DevOps service.
//!
//! This crate contains:
//! - Domain types: runs, timeline records, pending approvals and decisions
//! - DTOs: wire shapes of the remote REST API and their conversion into
//!   domain types

pub mod domain;
pub mod dto;
