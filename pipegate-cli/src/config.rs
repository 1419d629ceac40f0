//! Configuration module
//!
//! Resolves organization, project, credential, branch and decision settings
//! from command-line flags and their environment variables.

use anyhow::Result;
use pipegate_client::{Credential, DevOpsClient};
use pipegate_core::domain::approval::DecisionTemplate;
use tracing::debug;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Organization name on the hosted service
    pub organization: Option<String>,

    /// Project name within the organization
    pub project: Option<String>,

    /// Explicit project URL; replaces organization/project when set
    pub base_url: Option<String>,

    /// Access token
    pub token: Option<String>,

    /// Send the token as a bearer token instead of a personal access token
    pub bearer: bool,

    /// Branch new runs are triggered on
    pub branch: String,

    /// Status and comment applied to every decision
    pub decision: DecisionTemplate,
}

impl Config {
    /// Validates the configuration
    ///
    /// Every missing value is reported at once, named by flag and
    /// environment variable.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();

        if self.base_url.is_none() {
            if is_blank(&self.organization) {
                missing.push("--org (PIPEGATE_ORG)");
            }
            if is_blank(&self.project) {
                missing.push("--project (PIPEGATE_PROJECT)");
            }
        }

        if is_blank(&self.token) {
            missing.push("--token (PIPEGATE_TOKEN)");
        }

        if self.branch.trim().is_empty() {
            missing.push("--branch (PIPEGATE_BRANCH)");
        }

        if !missing.is_empty() {
            anyhow::bail!("missing required configuration: {}", missing.join(", "));
        }

        if let Some(url) = &self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("base URL must start with http:// or https://");
            }
        }

        Ok(())
    }

    /// Builds the client for the configured project
    pub fn client(&self) -> Result<DevOpsClient> {
        self.validate()?;

        let token = self.token.clone().unwrap_or_default();
        let credential = if self.bearer {
            Credential::bearer(token)
        } else {
            Credential::pat(token)
        };

        let client = match &self.base_url {
            Some(url) => DevOpsClient::with_base_url(url.clone(), credential),
            None => DevOpsClient::new(
                self.organization.as_deref().unwrap_or_default(),
                self.project.as_deref().unwrap_or_default(),
                credential,
            ),
        };

        debug!("Using project URL {}", client.base_url());
        Ok(client)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            organization: Some("org".to_string()),
            project: Some("proj".to_string()),
            base_url: None,
            token: Some("token".to_string()),
            bearer: false,
            branch: "main".to_string(),
            decision: DecisionTemplate::approve("ok"),
        }
    }

    #[test]
    fn test_valid_config() {
        let config = config();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.client().unwrap().base_url(),
            "https://dev.azure.com/org/proj"
        );
    }

    #[test]
    fn test_reports_every_missing_value() {
        let mut config = config();
        config.organization = None;
        config.token = Some("  ".to_string());

        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("--org (PIPEGATE_ORG)"));
        assert!(message.contains("--token (PIPEGATE_TOKEN)"));
        assert!(!message.contains("--project"));
    }

    #[test]
    fn test_base_url_replaces_org_and_project() {
        let mut config = config();
        config.organization = None;
        config.project = None;
        config.base_url = Some("https://devops.example.com/tfs/coll/proj/".to_string());

        assert!(config.validate().is_ok());
        assert_eq!(
            config.client().unwrap().base_url(),
            "https://devops.example.com/tfs/coll/proj"
        );

        config.base_url = Some("devops.example.com".to_string());
        assert!(config.validate().is_err());
    }
}
