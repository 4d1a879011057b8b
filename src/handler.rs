use lambda_runtime::{Error, LambdaEvent};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{Instrument, error, info, info_span};

use crate::ec2::InstanceOperations;
use crate::event::InstanceEvent;
use crate::ssm::AutomationOperations;
use crate::trigger::DomainJoinTrigger;
use crate::types::TriggerOutcome;

/// Kept free at the end of an invocation for the automation call and logging.
pub const DEADLINE_MARGIN: Duration = Duration::from_secs(30);

/// Time the waiters may still use before the invocation deadline, given in
/// epoch milliseconds. A zero deadline means the runtime did not set one.
pub fn wait_limit(deadline_ms: u64, now: SystemTime) -> Option<Duration> {
    if deadline_ms == 0 {
        return None;
    }
    let now_ms = now.duration_since(UNIX_EPOCH).ok()?.as_millis();
    let left_ms = u128::from(deadline_ms).saturating_sub(now_ms);
    let left = Duration::from_millis(u64::try_from(left_ms).ok()?);
    Some(left.saturating_sub(DEADLINE_MARGIN))
}

/// Lambda entry point for one EventBridge delivery.
pub async fn function_handler<E, S>(
    event: LambdaEvent<InstanceEvent>,
    trigger: &DomainJoinTrigger<E, S>,
) -> Result<TriggerOutcome, Error>
where
    E: InstanceOperations + Sync,
    S: AutomationOperations + Sync,
{
    let (payload, context) = event.into_parts();
    let span = info_span!(
        "invocation",
        request_id = %context.request_id,
        event_id = payload.id.as_deref().unwrap_or("N/A"),
    );

    async move {
        let start_time = Instant::now();
        let time_limit = wait_limit(context.deadline, SystemTime::now());

        match trigger.handle_within(&payload, time_limit).await {
            Ok(outcome) => {
                let execution_id = outcome.automation_execution_id.as_deref();
                info!(
                    status = ?outcome.status,
                    instance_id = %outcome.instance_id,
                    automation_execution_id = execution_id.unwrap_or("N/A"),
                    total_execution_seconds = start_time.elapsed().as_secs_f64(),
                    "Invocation completed"
                );
                Ok(outcome)
            }
            Err(e) => {
                error!(
                    error = format!("{:#}", e),
                    resources = ?payload.resources,
                    total_execution_seconds = start_time.elapsed().as_secs_f64(),
                    "Invocation failed"
                );
                Err(e.into())
            }
        }
    }
    .instrument(span)
    .await
}
