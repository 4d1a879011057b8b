use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "ec2-domainjoin-trigger",
    version,
    about = "Starts the domain join/unjoin automation for EC2 instances tagged with a start event"
)]
pub struct Config {
    /// Name or ARN of the SSM Automation runbook to start
    #[arg(long, env = "AUTOMATION_DOCUMENT_ARN")]
    pub automation_document: String,

    /// Runbook version passed to StartAutomationExecution
    #[arg(long, env = "AUTOMATION_DOCUMENT_VERSION", default_value = "$DEFAULT")]
    pub document_version: String,

    /// Instance tag key whose value selects Join or Unjoin
    #[arg(long, env = "TRIGGER_TAG_KEY", default_value = "StartEvent")]
    pub trigger_tag_key: String,

    /// Total seconds the EC2 waiters (stopped, running, status ok) of one
    /// invocation share. The invocation deadline caps it further.
    #[arg(long, env = "WAIT_TIMEOUT_SECONDS", default_value = "840")]
    pub wait_timeout_seconds: u64,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Dry run mode (no instance start, no automation execution)
    #[arg(long, env = "DRY_RUN", default_value = "false")]
    pub dry_run: bool,

    /// Log format: json or pretty
    #[arg(long, env = "LOG_FORMAT", default_value = "json")]
    pub log_format: String,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Reads configuration from environment variables only. The Lambda runtime
    /// passes no meaningful arguments to the bootstrap binary.
    pub fn from_env() -> Result<Self> {
        Self::try_parse_from([env!("CARGO_PKG_NAME")])
            .context("Failed to load configuration from environment")
    }

    pub fn display(&self, actual_region: &str) {
        let region_info = if let Some(region) = &self.region {
            region.clone()
        } else {
            format!("auto-detect ({})", actual_region)
        };

        tracing::info!(
            automation_document = %self.automation_document,
            document_version = %self.document_version,
            trigger_tag_key = %self.trigger_tag_key,
            wait_timeout_seconds = self.wait_timeout_seconds,
            dry_run = self.dry_run,
            region = %region_info,
            log_format = %self.log_format,
            log_level = %self.log_level,
            "Configuration initialized"
        );

        if self.dry_run {
            tracing::warn!(
                "DRY RUN MODE ENABLED - No instances will be started and no automation will run, only logged"
            );
        }
    }
}
