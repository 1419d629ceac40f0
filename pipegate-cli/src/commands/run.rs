//! Run command handler
//!
//! Triggers a pipeline run, waits for its approval checkpoint and submits
//! the configured decision.

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use pipegate_client::PipelineApi;
use pipegate_core::domain::run::RunRequest;
use pipegate_engine::{DEFAULT_DEADLINE, Orchestrator, PollPolicy, RunOutcome};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use super::parse_key_val;
use crate::config::Config;

/// Arguments of `run-pipeline`
#[derive(Args)]
pub struct RunPipelineArgs {
    /// Id of the pipeline to run
    #[arg(long)]
    pipeline_id: i64,

    /// Stage names to skip (repeat or comma-separate)
    #[arg(long = "skip-stage", value_delimiter = ',')]
    stages_to_skip: Vec<String>,

    /// Pipeline variables as a JSON object of strings
    #[arg(long)]
    variables: Option<String>,

    /// Pipeline variables as key=value pairs; override --variables
    #[arg(long = "var", value_parser = parse_key_val)]
    vars: Vec<(String, String)>,

    /// Maximum seconds to wait for the approval checkpoint
    #[arg(long, default_value_t = DEFAULT_DEADLINE.as_secs())]
    timeout: u64,

    /// Seconds between timeline polls
    #[arg(long, default_value = "5")]
    poll_interval: u64,

    /// Factor applied to the poll interval after every empty poll
    #[arg(long, default_value = "1.0")]
    backoff: f64,

    /// Upper bound in seconds for the poll interval under backoff
    #[arg(long, default_value = "60")]
    max_poll_interval: u64,
}

impl RunPipelineArgs {
    fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(Duration::from_secs(self.poll_interval)).with_backoff(
            self.backoff,
            Duration::from_secs(self.max_poll_interval.max(self.poll_interval)),
        )
    }
}

/// Merge `--variables` JSON with `--var` pairs
fn collect_variables(
    json: Option<&str>,
    pairs: &[(String, String)],
) -> Result<BTreeMap<String, String>> {
    let mut variables: BTreeMap<String, String> = match json {
        Some(raw) => serde_json::from_str(raw).context("Failed to parse --variables JSON")?,
        None => BTreeMap::new(),
    };

    for (key, value) in pairs {
        variables.insert(key.clone(), value.clone());
    }

    Ok(variables)
}

/// Run the single-pipeline flow
pub async fn run_pipeline(
    client: Arc<dyn PipelineApi>,
    config: &Config,
    args: RunPipelineArgs,
) -> Result<()> {
    let variables = collect_variables(args.variables.as_deref(), &args.vars)?;
    let orchestrator = Orchestrator::new(client, args.poll_policy());

    let req = RunRequest::new(args.pipeline_id, &config.branch)
        .with_stages_to_skip(args.stages_to_skip.clone())
        .with_variables(variables);

    println!(
        "Triggering pipeline {} on {}...",
        args.pipeline_id.to_string().cyan(),
        req.branch_ref.bold()
    );

    let outcome = orchestrator
        .run_and_approve(req, Duration::from_secs(args.timeout), &config.decision)
        .await?;

    let run = outcome.run();
    println!("{}", "✓ Pipeline run triggered".green().bold());
    println!("  Run ID: {}", run.id.to_string().cyan());
    println!("  Name:   {}", run.name.bold());
    println!("  State:  {}", run.state.to_string().yellow());
    if let Some(url) = &run.web_url {
        println!("  URL:    {}", url.dimmed());
    }

    match &outcome {
        RunOutcome::Decided { decision, .. } => {
            println!(
                "{}",
                format!("✓ Approval {} {}", decision.approval_id, decision.status)
                    .green()
                    .bold()
            );
        }
        RunOutcome::TimedOut { .. } => {
            println!(
                "{}",
                format!(
                    "No approval checkpoint appeared within {}s; nothing was decided.",
                    args.timeout
                )
                .yellow()
            );
        }
    }

    Ok(())
}
