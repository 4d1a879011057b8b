use serde::Serialize;

use crate::activity::DomainActivity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Started,
    Skipped,
    DryRun,
}

/// Result returned to the Lambda runtime for each invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerOutcome {
    pub status: OutcomeStatus,
    pub instance_id: String,
    pub activity: Option<DomainActivity>,
    pub instance_started: bool,
    pub automation_execution_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TriggerOutcome {
    pub fn skipped(instance_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Skipped,
            instance_id: instance_id.into(),
            activity: None,
            instance_started: false,
            automation_execution_id: None,
            reason: Some(reason.into()),
        }
    }
}
