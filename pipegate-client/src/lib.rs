//! Pipegate HTTP Client
//!
//! A thin, type-safe client for the run and approval endpoints of an
//! Azure DevOps style pipeline service.
//!
//! The client is stateless apart from its configuration and carries no retry
//! logic: every failure is returned to the caller as a [`ClientError`].
//! The engine consumes it through the [`PipelineApi`] trait.
//!
//! # Example
//!
//! ```no_run
//! use pipegate_client::{Credential, DevOpsClient};
//! use pipegate_core::domain::run::RunRequest;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = DevOpsClient::new("my-org", "my-project", Credential::pat("token"));
//!
//!     let run = client.trigger_run(&RunRequest::new(42, "main")).await?;
//!     println!("Triggered run: {}", run.id);
//!     Ok(())
//! }
//! ```

mod api;
mod approvals;
pub mod error;
mod runs;

// Re-export commonly used types
pub use api::PipelineApi;
pub use error::{ClientError, Result};

use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

/// Public endpoint of the hosted service
pub const DEFAULT_HOST: &str = "https://dev.azure.com";

/// REST API version sent with every request
pub const API_VERSION: &str = "7.1";

/// Credential attached to every request
#[derive(Clone)]
pub enum Credential {
    /// Personal access token, sent as HTTP Basic with an empty user name
    PersonalAccessToken(String),
    /// OAuth / Entra access token, sent as `Bearer`
    Bearer(String),
}

impl Credential {
    pub fn pat(token: impl Into<String>) -> Self {
        Self::PersonalAccessToken(token.into())
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Credential::PersonalAccessToken(token) => builder.basic_auth("", Some(token)),
            Credential::Bearer(token) => builder.bearer_auth(token),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::PersonalAccessToken(_) => write!(f, "PersonalAccessToken(***)"),
            Credential::Bearer(_) => write!(f, "Bearer(***)"),
        }
    }
}

/// HTTP client for one organization/project of the pipeline service
///
/// Constructed once and passed by reference into every flow; there is no
/// process-wide client or credential.
#[derive(Debug, Clone)]
pub struct DevOpsClient {
    /// Project URL, e.g. "https://dev.azure.com/my-org/my-project"
    base_url: String,
    credential: Credential,
    /// HTTP client instance
    client: Client,
}

impl DevOpsClient {
    /// Create a client for a project on the hosted service
    ///
    /// # Example
    /// ```
    /// use pipegate_client::{Credential, DevOpsClient};
    ///
    /// let client = DevOpsClient::new("my-org", "my-project", Credential::pat("token"));
    /// assert_eq!(client.base_url(), "https://dev.azure.com/my-org/my-project");
    /// ```
    pub fn new(organization: &str, project: &str, credential: Credential) -> Self {
        Self::with_base_url(
            format!("{}/{}/{}", DEFAULT_HOST, organization, project),
            credential,
        )
    }

    /// Create a client against an explicit project URL (on-premises servers, proxies)
    pub fn with_base_url(base_url: impl Into<String>, credential: Credential) -> Self {
        Self::with_client(base_url, credential, Client::new())
    }

    /// Create a client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use pipegate_client::{Credential, DevOpsClient};
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = DevOpsClient::with_client(
    ///     "https://devops.example.com/tfs/DefaultCollection/proj",
    ///     Credential::bearer("token"),
    ///     http_client,
    /// );
    /// ```
    pub fn with_client(
        base_url: impl Into<String>,
        credential: Credential,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
            client,
        }
    }

    /// Get the project URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `{base}/_apis/{path}` with the API version appended
    fn api_url(&self, path: &str) -> String {
        let separator = if path.contains('?') { '&' } else { '?' };
        format!(
            "{}/_apis/{}{}api-version={}",
            self.base_url, path, separator, API_VERSION
        )
    }

    /// Starts an authenticated JSON request
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        self.credential.apply(builder)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        Self::error_for_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is not needed
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        Self::error_for_status(response).await.map(|_| ())
    }

    /// Passes a success response through, or turns the status and body into an error
    async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ClientError::from_status(status, error_text))
    }
}
