use anyhow::Result;
use std::future::Future;
use std::time::Duration;

use crate::activity::InstanceTag;
use crate::event::InstanceId;

mod client;
mod state;
mod status;
mod tags;

pub use client::Ec2Client;
pub use state::PowerState;

/// Reachability detail value EC2 publishes once the instance status check passes.
pub const STATUS_PASSED: &str = "passed";

/// EC2 calls the trigger depends on. Implemented by [`Ec2Client`]; tests
/// substitute an in-memory fake.
pub trait InstanceOperations {
    fn describe_power_state(
        &self,
        instance_id: &InstanceId,
    ) -> impl Future<Output = Result<PowerState>> + Send;

    fn describe_tags(
        &self,
        instance_id: &InstanceId,
    ) -> impl Future<Output = Result<Vec<InstanceTag>>> + Send;

    fn start_instance(&self, instance_id: &InstanceId) -> impl Future<Output = Result<()>> + Send;

    /// First instance-status detail (`passed`, `failed`, `initializing`, ...),
    /// or `None` while EC2 has not published a status for the instance yet.
    fn reachability_status(
        &self,
        instance_id: &InstanceId,
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    fn wait_until_stopped(
        &self,
        instance_id: &InstanceId,
        timeout: Duration,
    ) -> impl Future<Output = Result<()>> + Send;

    fn wait_until_running(
        &self,
        instance_id: &InstanceId,
        timeout: Duration,
    ) -> impl Future<Output = Result<()>> + Send;

    fn wait_until_status_ok(
        &self,
        instance_id: &InstanceId,
        timeout: Duration,
    ) -> impl Future<Output = Result<()>> + Send;
}
