//! cloudaudit - AWS compliance audit CLI
//!
//! Each subcommand runs one compliance rule end to end: enumerate the
//! resources, evaluate the rule, write the Excel report and audit log
//! into the current directory.
//!
//! ## Exit codes
//!
//! - `0`: compliant (no violations)
//! - `2`: violations found (report written)
//! - `1`: operational error (auth, network, export); no report written
//!   for this run

use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing::Level;

use cloudaudit_aws::{
    AwsBucketCatalog, AwsComplianceStore, AwsIamDirectory, AwsInstanceFleet, AwsThreatDetector,
};
use cloudaudit_core::{AuditLog, AuditPipeline, ComplianceCheck, RunOutcome, RunReport, EXIT_ERROR};
use cloudaudit_rules::checks::unused_keys::DEFAULT_THRESHOLD_DAYS;
use cloudaudit_rules::{
    ConfigRulesCheck, Ec2HardeningCheck, GuardDutyCheck, IamMfaCheck, S3InventoryCheck,
    UnusedKeysCheck,
};

#[derive(Parser)]
#[command(name = "cloudaudit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AWS compliance audit toolkit", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines and a JSON run summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report AWS Config rules in NON_COMPLIANT state
    ConfigRules,

    /// Audit EC2 instances for termination protection, EBS encryption,
    /// and public IP exposure (all enabled regions)
    Ec2,

    /// Report IAM users with no MFA device enrolled
    IamMfa,

    /// Summarize GuardDuty findings from the last 24 hours by severity
    Guardduty,

    /// Inventory all S3 buckets (informational, never a violation)
    S3Inventory,

    /// Report active IAM access keys unused beyond a threshold
    UnusedKeys {
        /// Days without use before an active key is flagged
        #[arg(long, default_value_t = DEFAULT_THRESHOLD_DAYS)]
        threshold_days: i64,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    cloudaudit_core::init_tracing(cli.json, level);

    let code = match run(cli).await {
        Ok(report) => report.outcome.exit_code(),
        Err(err) => {
            tracing::error!("audit failed: {err:#}");
            EXIT_ERROR
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<RunReport> {
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;

    let report = match cli.command {
        Commands::ConfigRules => {
            execute(&ConfigRulesCheck::new(AwsComplianceStore::new(&config))).await?
        }
        Commands::Ec2 => execute(&Ec2HardeningCheck::new(AwsInstanceFleet::new(&config))).await?,
        Commands::IamMfa => execute(&IamMfaCheck::new(AwsIamDirectory::new(&config))).await?,
        Commands::Guardduty => {
            execute(&GuardDutyCheck::new(AwsThreatDetector::new(&config))).await?
        }
        Commands::S3Inventory => {
            execute(&S3InventoryCheck::new(AwsBucketCatalog::new(&config))).await?
        }
        Commands::UnusedKeys { threshold_days } => {
            let check = UnusedKeysCheck::new(AwsIamDirectory::new(&config))
                .with_threshold_days(threshold_days);
            execute(&check).await?
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(report)
}

/// Run one rule: open its audit log, drive the pipeline, return the
/// run report. Report and log land in the current directory under the
/// rule's fixed filenames.
async fn execute(check: &dyn ComplianceCheck) -> Result<RunReport> {
    let log = AuditLog::open(Path::new(check.log_filename()))
        .with_context(|| format!("Failed to open audit log: {}", check.log_filename()))?;

    AuditPipeline::run(check, &log, Path::new(check.report_filename()))
        .await
        .with_context(|| format!("{} check failed", check.name()))
}

fn print_summary(report: &RunReport) {
    println!();
    println!("Check:      {}", report.check_name);
    println!("Rows:       {}", report.row_count);
    println!("Violations: {}", report.violations);
    println!("Report:     {}", report.report_path.display());
    println!("Duration:   {}ms", report.duration_ms);
    match report.outcome {
        RunOutcome::Compliant => println!("Status:     compliant"),
        RunOutcome::ViolationsFound { count } => {
            println!("Status:     {count} violation(s) found")
        }
    }
}
