use anyhow::{Context, Result};
use aws_sdk_ec2::client::Waiters;
use aws_sdk_ec2::operation::describe_instance_status::DescribeInstanceStatusOutput;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::Ec2Client;
use crate::event::InstanceId;

impl Ec2Client {
    pub(super) async fn get_reachability_status(
        &self,
        instance_id: &InstanceId,
    ) -> Result<Option<String>> {
        let response = self
            .client
            .describe_instance_status()
            .instance_ids(instance_id.as_str())
            .include_all_instances(true)
            .send()
            .await
            .context(format!(
                "Failed to describe instance status for {}",
                instance_id
            ))?;

        let status = Self::extract_reachability(&response);

        debug!(
            instance_id = %instance_id,
            reachability = status.as_deref().unwrap_or("N/A"),
            "Received instance status check result"
        );

        Ok(status)
    }

    pub(super) fn extract_reachability(response: &DescribeInstanceStatusOutput) -> Option<String> {
        response
            .instance_statuses()
            .first()
            .and_then(|status| status.instance_status())
            .and_then(|summary| summary.details().first())
            .and_then(|detail| detail.status())
            .map(|status| status.as_str().to_string())
    }

    pub(super) async fn wait_stopped(
        &self,
        instance_id: &InstanceId,
        timeout: Duration,
    ) -> Result<()> {
        let start_time = Instant::now();
        Self::log_wait_start(instance_id, "instance_stopped", timeout);

        self.client
            .wait_until_instance_stopped()
            .instance_ids(instance_id.as_str())
            .wait(timeout)
            .await
            .context(format!("Instance {} did not reach stopped state", instance_id))?;

        Self::log_wait_complete(instance_id, "instance_stopped", start_time);
        Ok(())
    }

    pub(super) async fn wait_running(
        &self,
        instance_id: &InstanceId,
        timeout: Duration,
    ) -> Result<()> {
        let start_time = Instant::now();
        Self::log_wait_start(instance_id, "instance_running", timeout);

        self.client
            .wait_until_instance_running()
            .instance_ids(instance_id.as_str())
            .wait(timeout)
            .await
            .context(format!("Instance {} did not reach running state", instance_id))?;

        Self::log_wait_complete(instance_id, "instance_running", start_time);
        Ok(())
    }

    pub(super) async fn wait_status_ok(
        &self,
        instance_id: &InstanceId,
        timeout: Duration,
    ) -> Result<()> {
        let start_time = Instant::now();
        Self::log_wait_start(instance_id, "instance_status_ok", timeout);

        self.client
            .wait_until_instance_status_ok()
            .instance_ids(instance_id.as_str())
            .wait(timeout)
            .await
            .context(format!("Instance {} did not pass status checks", instance_id))?;

        Self::log_wait_complete(instance_id, "instance_status_ok", start_time);
        Ok(())
    }

    fn log_wait_start(instance_id: &InstanceId, waiter: &str, timeout: Duration) {
        info!(
            instance_id = %instance_id,
            waiter = waiter,
            max_wait_seconds = timeout.as_secs(),
            "Waiting for instance"
        );
    }

    fn log_wait_complete(instance_id: &InstanceId, waiter: &str, start_time: Instant) {
        info!(
            instance_id = %instance_id,
            waiter = waiter,
            duration_seconds = start_time.elapsed().as_secs_f64(),
            "Instance wait completed"
        );
    }
}
