//! Pipegate CLI
//!
//! Command-line interface for triggering pipeline runs and resolving their
//! approval gates.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use pipegate_core::domain::approval::{ApprovalStatus, DecisionTemplate};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pipegate")]
#[command(about = "Trigger pipeline runs and resolve their approval gates", long_about = None)]
struct Cli {
    /// Organization name
    #[arg(long, env = "PIPEGATE_ORG", global = true)]
    org: Option<String>,

    /// Project name
    #[arg(long, env = "PIPEGATE_PROJECT", global = true)]
    project: Option<String>,

    /// Project URL, for servers other than dev.azure.com
    #[arg(long, env = "PIPEGATE_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Personal access token (or bearer token with --bearer)
    #[arg(long, env = "PIPEGATE_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Send the token as a bearer token
    #[arg(long, env = "PIPEGATE_BEARER", global = true)]
    bearer: bool,

    /// Branch to run pipelines on
    #[arg(long, env = "PIPEGATE_BRANCH", default_value = "main", global = true)]
    branch: String,

    /// Decision to submit: approved or rejected
    #[arg(long, env = "PIPEGATE_STATUS", default_value = "approved", global = true)]
    status: ApprovalStatus,

    /// Comment attached to every decision
    #[arg(
        long,
        env = "PIPEGATE_COMMENT",
        default_value = "Approved by pipegate",
        global = true
    )]
    comment: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pipegate_cli=info,pipegate_engine=info,pipegate_client=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        organization: cli.org,
        project: cli.project,
        base_url: cli.base_url,
        token: cli.token,
        bearer: cli.bearer,
        branch: cli.branch,
        decision: DecisionTemplate::new(cli.status, cli.comment),
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
