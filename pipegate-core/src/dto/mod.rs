//! Data Transfer Objects for the remote REST API
//!
//! Response DTOs keep every field optional and are converted into domain
//! types with explicit presence checks, so a malformed payload yields a
//! [`MissingField`] error instead of a panic.

pub mod approval;
pub mod run;
pub mod timeline;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A field the domain type requires was absent from the response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("response is missing required field `{0}`")]
pub struct MissingField(pub &'static str);

/// `{ "href": ... }` link object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Link {
    pub href: Option<String>,
}

/// `_links` object; the service uses `web` on runs and `self` on approvals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub web: Option<Link>,
    #[serde(default, rename = "self")]
    pub self_link: Option<Link>,
}

/// Unwraps an optional response field or names it in the error
pub(crate) fn require<T>(value: Option<T>, field: &'static str) -> Result<T, MissingField> {
    value.ok_or(MissingField(field))
}
