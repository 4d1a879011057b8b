use anyhow::{Context, Result};
use aws_config::SdkConfig;
use aws_sdk_ec2::Client;
use std::time::Duration;
use tracing::{debug, info};

use super::{InstanceOperations, PowerState};
use crate::activity::InstanceTag;
use crate::error::TriggerError;
use crate::event::InstanceId;

pub struct Ec2Client {
    pub(super) client: Client,
    pub(super) region: String,
}

impl Ec2Client {
    pub fn new(config: &SdkConfig) -> Self {
        let client = Self::from_client(Client::new(config));

        info!(
            region = %client.region,
            "AWS EC2 client initialized successfully"
        );

        client
    }

    pub fn from_client(client: Client) -> Self {
        let region = client
            .config()
            .region()
            .map(|r| r.as_ref())
            .unwrap_or("unknown")
            .to_string();

        Self { client, region }
    }

    async fn get_power_state(&self, instance_id: &InstanceId) -> Result<PowerState> {
        debug!(
            instance_id = %instance_id,
            "Sending DescribeInstances API request"
        );

        let response = self
            .client
            .describe_instances()
            .instance_ids(instance_id.as_str())
            .send()
            .await
            .context(format!("Failed to describe instance {}", instance_id))?;

        let state = response
            .reservations()
            .iter()
            .flat_map(|reservation| reservation.instances())
            .find(|instance| instance.instance_id() == Some(instance_id.as_str()))
            .and_then(|instance| instance.state())
            .ok_or_else(|| TriggerError::InstanceNotFound(instance_id.to_string()))?;

        let power_state = PowerState::from_code(state.code().unwrap_or(-1));

        debug!(
            instance_id = %instance_id,
            state_code = ?state.code(),
            power_state = %power_state,
            "Received instance power state"
        );

        Ok(power_state)
    }

    async fn start(&self, instance_id: &InstanceId) -> Result<()> {
        info!(
            instance_id = %instance_id,
            region = %self.region,
            api_action = "StartInstances",
            "Sending start request to AWS EC2 API"
        );

        let response = self
            .client
            .start_instances()
            .instance_ids(instance_id.as_str())
            .send()
            .await
            .context(format!("Failed to start instance {}", instance_id))?;

        for change in response.starting_instances() {
            info!(
                instance_id = change.instance_id().unwrap_or("unknown"),
                previous_state = ?change.previous_state().and_then(|s| s.name()),
                current_state = ?change.current_state().and_then(|s| s.name()),
                "Instance state transition requested"
            );
        }

        Ok(())
    }
}

impl InstanceOperations for Ec2Client {
    async fn describe_power_state(&self, instance_id: &InstanceId) -> Result<PowerState> {
        self.get_power_state(instance_id).await
    }

    async fn describe_tags(&self, instance_id: &InstanceId) -> Result<Vec<InstanceTag>> {
        self.get_instance_tags(instance_id).await
    }

    async fn start_instance(&self, instance_id: &InstanceId) -> Result<()> {
        self.start(instance_id).await
    }

    async fn reachability_status(&self, instance_id: &InstanceId) -> Result<Option<String>> {
        self.get_reachability_status(instance_id).await
    }

    async fn wait_until_stopped(&self, instance_id: &InstanceId, timeout: Duration) -> Result<()> {
        self.wait_stopped(instance_id, timeout).await
    }

    async fn wait_until_running(&self, instance_id: &InstanceId, timeout: Duration) -> Result<()> {
        self.wait_running(instance_id, timeout).await
    }

    async fn wait_until_status_ok(
        &self,
        instance_id: &InstanceId,
        timeout: Duration,
    ) -> Result<()> {
        self.wait_status_ok(instance_id, timeout).await
    }
}
