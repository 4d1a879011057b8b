use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Value of the trigger tag, forwarded to the runbook as `DomainJoinActivity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DomainActivity {
    Join,
    Unjoin,
}

impl DomainActivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "Join",
            Self::Unjoin => "Unjoin",
        }
    }
}

impl fmt::Display for DomainActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainActivity {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Join" => Ok(Self::Join),
            "Unjoin" => Ok(Self::Unjoin),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceTag {
    pub key: String,
    pub value: String,
}

impl InstanceTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagDecision {
    Run(DomainActivity),
    InvalidValue(String),
    NoTriggerTag,
}

/// The first tag whose key equals `trigger_key` decides; later tags with the
/// same key are never consulted.
pub fn evaluate_tags(tags: &[InstanceTag], trigger_key: &str) -> TagDecision {
    match tags.iter().find(|tag| tag.key == trigger_key) {
        Some(tag) => match tag.value.parse::<DomainActivity>() {
            Ok(activity) => TagDecision::Run(activity),
            Err(value) => TagDecision::InvalidValue(value),
        },
        None => TagDecision::NoTriggerTag,
    }
}
