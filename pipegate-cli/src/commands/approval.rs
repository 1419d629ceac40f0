//! Approval command handlers
//!
//! Handles deciding a single approval, listing pending approvals and the
//! approve-latest batch.

use anyhow::Result;
use clap::Args;
use colored::*;
use pipegate_core::domain::approval::PendingApproval;
use pipegate_engine::{
    ApprovalOutcome, BatchReport, EngineError, Orchestrator, reduce_to_latest_per_pipeline,
    sorted_by_pipeline,
};

use crate::config::Config;

/// Arguments of `approve`
#[derive(Args)]
pub struct ApproveArgs {
    /// Id of the approval to decide
    #[arg(long)]
    pub approval_id: String,
}

/// Arguments of `list-approvals`
#[derive(Args)]
pub struct ListApprovalsArgs {
    /// Only show the newest approval of each pipeline
    #[arg(long)]
    pub latest: bool,
}

/// Decide one approval
pub async fn approve(orchestrator: &Orchestrator, config: &Config, approval_id: &str) -> Result<()> {
    let decision = orchestrator.approve_one(approval_id, &config.decision).await?;

    println!(
        "{}",
        format!("✓ Approval {} {}", decision.approval_id, decision.status)
            .green()
            .bold()
    );

    Ok(())
}

/// List pending approvals
async fn list_pending(orchestrator: &Orchestrator, latest_only: bool) -> Result<Vec<PendingApproval>> {
    let approvals = orchestrator.list_pending().await?;
    if !latest_only {
        return Ok(approvals);
    }
    Ok(sorted_by_pipeline(reduce_to_latest_per_pipeline(approvals)))
}

/// Print pending approvals
pub async fn list_approvals(orchestrator: &Orchestrator, latest_only: bool) -> Result<()> {
    let approvals = list_pending(orchestrator, latest_only).await?;

    if approvals.is_empty() {
        println!("{}", "No pending approvals.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} pending approval(s):", approvals.len()).bold()
    );
    println!();
    for approval in &approvals {
        print_approval(approval);
    }

    Ok(())
}

/// Decide the newest approval of every pipeline
pub async fn approve_latest(orchestrator: &Orchestrator, config: &Config) -> Result<()> {
    let report = match orchestrator.approve_all_latest(&config.decision).await {
        Ok(report) => report,
        Err(EngineError::BatchAborted { report, source }) => {
            print_report(&report);
            anyhow::bail!("batch stopped, credential rejected: {}", source);
        }
        Err(e) => return Err(e.into()),
    };

    if report.is_empty() {
        println!("{}", "No pending approvals.".yellow());
        return Ok(());
    }

    print_report(&report);

    let succeeded = report.succeeded().count();
    let failed = report.failures().count();
    if failed > 0 {
        anyhow::bail!(
            "{} of {} approval(s) failed ({} {})",
            failed,
            report.len(),
            succeeded,
            config.decision.status
        );
    }

    println!(
        "{}",
        format!("✓ {} approval(s) {}", succeeded, config.decision.status)
            .green()
            .bold()
    );

    Ok(())
}

fn print_report(report: &BatchReport) {
    for outcome in &report.outcomes {
        print_outcome(outcome);
    }
}

fn print_outcome(outcome: &ApprovalOutcome) {
    match &outcome.result {
        Ok(()) => println!(
            "  {} {} {}",
            "✓".green(),
            outcome.approval.pipeline_name.bold(),
            outcome.approval.id.dimmed()
        ),
        Err(e) => println!(
            "  {} {} {}: {}",
            "✗".red(),
            outcome.approval.pipeline_name.bold(),
            outcome.approval.id.dimmed(),
            e.to_string().red()
        ),
    }
}

/// Print a pending approval summary
fn print_approval(approval: &PendingApproval) {
    println!("  {} {}", "▸".cyan(), approval.pipeline_name.bold());
    println!("    ID:        {}", approval.id.dimmed());
    println!(
        "    Created:   {}",
        approval
            .created_on
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!("    Approvers: {}", approval.min_required_approvers);
    if let Some(url) = &approval.detail_url {
        println!("    URL:       {}", url.dimmed());
    }
    println!();
}
