use anyhow::{Context, Result};
use aws_config::SdkConfig;
use aws_sdk_ssm::Client;
use std::future::Future;
use tracing::info;

use crate::activity::DomainActivity;
use crate::error::TriggerError;
use crate::event::InstanceId;

/// Runbook parameter receiving the target instance id.
pub const PARAM_INSTANCE_ID: &str = "InstanceId";
/// Runbook parameter receiving `Join` or `Unjoin`.
pub const PARAM_DOMAIN_JOIN_ACTIVITY: &str = "DomainJoinActivity";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationRequest {
    pub document_name: String,
    pub document_version: String,
    pub instance_id: InstanceId,
    pub activity: DomainActivity,
}

pub trait AutomationOperations {
    /// Starts the runbook and returns the automation execution id.
    fn start_automation(
        &self,
        request: &AutomationRequest,
    ) -> impl Future<Output = Result<String>> + Send;
}

pub struct SsmClient {
    client: Client,
}

impl SsmClient {
    pub fn new(config: &SdkConfig) -> Self {
        info!("AWS SSM client initialized successfully");
        Self::from_client(Client::new(config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl AutomationOperations for SsmClient {
    async fn start_automation(&self, request: &AutomationRequest) -> Result<String> {
        info!(
            instance_id = %request.instance_id,
            document_name = %request.document_name,
            document_version = %request.document_version,
            activity = %request.activity,
            api_action = "StartAutomationExecution",
            "Sending automation request to AWS SSM API"
        );

        let response = self
            .client
            .start_automation_execution()
            .document_name(&request.document_name)
            .document_version(&request.document_version)
            .parameters(
                PARAM_INSTANCE_ID,
                vec![request.instance_id.as_str().to_string()],
            )
            .parameters(
                PARAM_DOMAIN_JOIN_ACTIVITY,
                vec![request.activity.as_str().to_string()],
            )
            .send()
            .await
            .context(format!(
                "Failed to start automation {} for instance {}",
                request.document_name, request.instance_id
            ))?;

        let execution_id = response
            .automation_execution_id()
            .map(str::to_string)
            .ok_or_else(|| TriggerError::MissingExecutionId(request.instance_id.to_string()))?;

        Ok(execution_id)
    }
}
