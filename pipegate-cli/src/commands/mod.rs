//! Commands module
//!
//! Defines all CLI commands and their handlers. Each command runs exactly
//! one engine flow.

mod approval;
mod run;

pub use approval::{ApproveArgs, ListApprovalsArgs};
pub use run::RunPipelineArgs;

use anyhow::Result;
use clap::Subcommand;
use pipegate_client::PipelineApi;
use pipegate_engine::Orchestrator;
use std::sync::Arc;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Trigger a run, wait for its approval checkpoint and decide it
    RunPipeline(RunPipelineArgs),
    /// Decide one approval by id
    Approve(ApproveArgs),
    /// List pending approvals
    ListApprovals(ListApprovalsArgs),
    /// Decide the newest pending approval of every pipeline
    ApproveLatest,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// Result indicating success or failure
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client: Arc<dyn PipelineApi> = Arc::new(config.client()?);

    match command {
        Commands::RunPipeline(args) => run::run_pipeline(client, config, args).await,
        Commands::Approve(args) => {
            let orchestrator = Orchestrator::new(client, Default::default());
            approval::approve(&orchestrator, config, &args.approval_id).await
        }
        Commands::ListApprovals(args) => {
            let orchestrator = Orchestrator::new(client, Default::default());
            approval::list_approvals(&orchestrator, args.latest).await
        }
        Commands::ApproveLatest => {
            let orchestrator = Orchestrator::new(client, Default::default());
            approval::approve_latest(&orchestrator, config).await
        }
    }
}

/// Parse a single key=value pair
pub(crate) fn parse_key_val(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow::anyhow!("invalid KEY=value: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("env=staging").unwrap(),
            ("env".to_string(), "staging".to_string())
        );
        assert_eq!(
            parse_key_val("query=a=b").unwrap(),
            ("query".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("novalue").is_err());
    }
}
