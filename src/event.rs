use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::TriggerError;

/// Matches both the legacy 8-hex and the current 17-hex instance id at the
/// end of a resource string such as an instance ARN.
static INSTANCE_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"i-[a-f0-9]{8}(?:[a-f0-9]{9})?$").expect("instance id pattern is valid")
});

const DETAIL_INSTANCE_ID: &str = "instance-id";

/// EventBridge envelope, reduced to the fields the trigger reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InstanceEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub detail_type: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub detail: Value,
}

impl InstanceEvent {
    /// Resolves the instance id from the first resource, falling back to
    /// `detail.instance-id` when the event lists no resources.
    pub fn instance_id(&self) -> Result<InstanceId, TriggerError> {
        if let Some(resource) = self.resources.first() {
            return InstanceId::extract(resource);
        }

        self.detail
            .get(DETAIL_INSTANCE_ID)
            .and_then(Value::as_str)
            .ok_or(TriggerError::MissingInstanceReference)
            .and_then(InstanceId::extract)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn extract(resource: &str) -> Result<Self, TriggerError> {
        INSTANCE_ID_PATTERN
            .find(resource)
            .map(|m| Self(m.as_str().to_string()))
            .ok_or_else(|| TriggerError::InvalidInstanceReference(resource.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
