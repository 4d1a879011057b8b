use anyhow::Result;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::activity::{DomainActivity, TagDecision, evaluate_tags};
use crate::config::Config;
use crate::ec2::{InstanceOperations, PowerState, STATUS_PASSED};
use crate::error::TriggerError;
use crate::event::{InstanceEvent, InstanceId};
use crate::ssm::{AutomationOperations, AutomationRequest};
use crate::types::{OutcomeStatus, TriggerOutcome};

#[derive(Debug, Clone)]
pub struct TriggerSettings {
    pub document_name: String,
    pub document_version: String,
    pub trigger_tag_key: String,
    /// Total time all EC2 waiters of one invocation may spend together.
    pub wait_timeout: Duration,
    pub dry_run: bool,
}

impl From<&Config> for TriggerSettings {
    fn from(config: &Config) -> Self {
        Self {
            document_name: config.automation_document.clone(),
            document_version: config.document_version.clone(),
            trigger_tag_key: config.trigger_tag_key.clone(),
            wait_timeout: Duration::from_secs(config.wait_timeout_seconds),
            dry_run: config.dry_run,
        }
    }
}

/// Wait time shared by every waiter of one invocation.
#[derive(Debug, Clone, Copy)]
pub struct WaitBudget {
    deadline: Instant,
}

impl WaitBudget {
    pub fn new(total: Duration) -> Self {
        Self {
            deadline: Instant::now() + total,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Time granted to the next waiter, or an error once nothing is left.
    fn next_wait(&self, instance_id: &InstanceId, waiter: &'static str) -> Result<Duration> {
        let remaining = self.remaining();
        if remaining.is_zero() {
            return Err(TriggerError::WaitBudgetExhausted {
                instance_id: instance_id.to_string(),
                waiter,
            }
            .into());
        }
        Ok(remaining)
    }
}

/// What the trigger has to do to the instance before the runbook can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartAction {
    Start,
    WaitStoppedThenStart,
    AlreadyStarting,
    Unavailable,
}

impl StartAction {
    fn for_state(instance_id: &InstanceId, state: PowerState) -> Result<Self, TriggerError> {
        match state {
            PowerState::Stopped => Ok(Self::Start),
            PowerState::Stopping => Ok(Self::WaitStoppedThenStart),
            PowerState::Pending | PowerState::Running => Ok(Self::AlreadyStarting),
            PowerState::ShuttingDown | PowerState::Terminated => Ok(Self::Unavailable),
            PowerState::Unknown(code) => Err(TriggerError::UnexpectedState {
                instance_id: instance_id.to_string(),
                code,
            }),
        }
    }
}

pub struct DomainJoinTrigger<E, S> {
    ec2: E,
    ssm: S,
    settings: TriggerSettings,
}

impl<E, S> DomainJoinTrigger<E, S>
where
    E: InstanceOperations + Sync,
    S: AutomationOperations + Sync,
{
    pub fn new(ec2: E, ssm: S, settings: TriggerSettings) -> Self {
        Self { ec2, ssm, settings }
    }

    pub async fn handle(&self, event: &InstanceEvent) -> Result<TriggerOutcome> {
        self.handle_within(event, None).await
    }

    /// Like [`handle`](Self::handle), but the waiters never run past
    /// `time_limit` when it is shorter than the configured wait timeout.
    pub async fn handle_within(
        &self,
        event: &InstanceEvent,
        time_limit: Option<Duration>,
    ) -> Result<TriggerOutcome> {
        let budget = WaitBudget::new(
            time_limit.map_or(self.settings.wait_timeout, |limit| {
                limit.min(self.settings.wait_timeout)
            }),
        );
        let instance_id = event.instance_id()?;

        info!(
            instance_id = %instance_id,
            event_id = event.id.as_deref().unwrap_or("N/A"),
            source = event.source.as_deref().unwrap_or("N/A"),
            detail_type = event.detail_type.as_deref().unwrap_or("N/A"),
            wait_budget_seconds = budget.remaining().as_secs(),
            "Resolved instance from event"
        );

        let tags = self.ec2.describe_tags(&instance_id).await?;

        let activity = match evaluate_tags(&tags, &self.settings.trigger_tag_key) {
            TagDecision::Run(activity) => activity,
            TagDecision::InvalidValue(value) => {
                warn!(
                    instance_id = %instance_id,
                    tag_key = %self.settings.trigger_tag_key,
                    tag_value = %value,
                    "The tag value for {} is not valid to perform the domain join/unjoin automation. Value must be Join or Unjoin.",
                    self.settings.trigger_tag_key
                );
                return Ok(TriggerOutcome::skipped(
                    instance_id.as_str(),
                    format!(
                        "invalid {} tag value '{}'",
                        self.settings.trigger_tag_key, value
                    ),
                ));
            }
            TagDecision::NoTriggerTag => {
                debug!(
                    instance_id = %instance_id,
                    tag_key = %self.settings.trigger_tag_key,
                    tag_count = tags.len(),
                    "Instance has no trigger tag, nothing to do"
                );
                return Ok(TriggerOutcome::skipped(
                    instance_id.as_str(),
                    format!("no {} tag", self.settings.trigger_tag_key),
                ));
            }
        };

        let state = self.ec2.describe_power_state(&instance_id).await?;
        let action = StartAction::for_state(&instance_id, state)?;

        info!(
            instance_id = %instance_id,
            activity = %activity,
            power_state = %state,
            "Trigger tag found, preparing domain automation"
        );

        if action == StartAction::Unavailable {
            warn!(
                instance_id = %instance_id,
                power_state = %state,
                "Instance is terminating or terminated, skipping domain automation"
            );
            return Ok(TriggerOutcome {
                activity: Some(activity),
                ..TriggerOutcome::skipped(instance_id.as_str(), format!("instance is {}", state))
            });
        }

        if self.settings.dry_run {
            return Ok(self.dry_run_outcome(&instance_id, activity, state, action));
        }

        let instance_started = self.ensure_started(&instance_id, action, &budget).await?;
        self.ensure_healthy(&instance_id, &budget).await?;

        let request = AutomationRequest {
            document_name: self.settings.document_name.clone(),
            document_version: self.settings.document_version.clone(),
            instance_id: instance_id.clone(),
            activity,
        };
        let execution_id = self.ssm.start_automation(&request).await?;

        info!(
            instance_id = %instance_id,
            activity = %activity,
            automation_execution_id = %execution_id,
            instance_started = instance_started,
            result = "success",
            "Domain automation execution started"
        );

        Ok(TriggerOutcome {
            status: OutcomeStatus::Started,
            instance_id: instance_id.to_string(),
            activity: Some(activity),
            instance_started,
            automation_execution_id: Some(execution_id),
            reason: None,
        })
    }

    /// Returns whether this invocation issued a StartInstances call.
    async fn ensure_started(
        &self,
        instance_id: &InstanceId,
        action: StartAction,
        budget: &WaitBudget,
    ) -> Result<bool> {
        match action {
            StartAction::Start => {
                self.ec2.start_instance(instance_id).await?;
                Ok(true)
            }
            StartAction::WaitStoppedThenStart => {
                info!(
                    instance_id = %instance_id,
                    "Instance is stopping, waiting for it to stop before starting"
                );
                let timeout = budget.next_wait(instance_id, "instance_stopped")?;
                self.ec2.wait_until_stopped(instance_id, timeout).await?;
                self.ec2.start_instance(instance_id).await?;
                Ok(true)
            }
            StartAction::AlreadyStarting | StartAction::Unavailable => Ok(false),
        }
    }

    async fn ensure_healthy(&self, instance_id: &InstanceId, budget: &WaitBudget) -> Result<()> {
        let status = self.ec2.reachability_status(instance_id).await?;

        if status.as_deref() == Some(STATUS_PASSED) {
            debug!(
                instance_id = %instance_id,
                "Instance status check already passed"
            );
            return Ok(());
        }

        info!(
            instance_id = %instance_id,
            reachability = status.as_deref().unwrap_or("N/A"),
            wait_budget_seconds = budget.remaining().as_secs(),
            "Instance status check not passed yet, waiting for running and status ok"
        );

        let timeout = budget.next_wait(instance_id, "instance_running")?;
        self.ec2.wait_until_running(instance_id, timeout).await?;

        let timeout = budget.next_wait(instance_id, "instance_status_ok")?;
        self.ec2.wait_until_status_ok(instance_id, timeout).await?;

        Ok(())
    }

    fn dry_run_outcome(
        &self,
        instance_id: &InstanceId,
        activity: DomainActivity,
        state: PowerState,
        action: StartAction,
    ) -> TriggerOutcome {
        let would_start = matches!(
            action,
            StartAction::Start | StartAction::WaitStoppedThenStart
        );

        warn!(
            instance_id = %instance_id,
            activity = %activity,
            power_state = %state,
            would_start_instance = would_start,
            document_name = %self.settings.document_name,
            document_version = %self.settings.document_version,
            action = "start_automation",
            "DRY RUN: Would start domain automation (no action taken)"
        );

        TriggerOutcome {
            status: OutcomeStatus::DryRun,
            instance_id: instance_id.to_string(),
            activity: Some(activity),
            instance_started: false,
            automation_execution_id: None,
            reason: None,
        }
    }
}
