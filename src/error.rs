use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("Event carries no instance reference in resources or detail")]
    MissingInstanceReference,

    #[error("No EC2 instance id found in event resource: {0}")]
    InvalidInstanceReference(String),

    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    #[error("Instance {instance_id} reported unexpected state code {code}")]
    UnexpectedState { instance_id: String, code: i32 },

    #[error("Wait budget exhausted for instance {instance_id} before {waiter} wait")]
    WaitBudgetExhausted {
        instance_id: String,
        waiter: &'static str,
    },

    #[error("Automation execution for instance {0} returned no execution id")]
    MissingExecutionId(String),
}
