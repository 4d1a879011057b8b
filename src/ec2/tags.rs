use anyhow::{Context, Result};
use aws_sdk_ec2::types::{Filter, TagDescription};
use tracing::debug;

use super::Ec2Client;
use crate::activity::InstanceTag;
use crate::event::InstanceId;

const FILTER_RESOURCE_ID: &str = "resource-id";

impl Ec2Client {
    pub(super) async fn get_instance_tags(
        &self,
        instance_id: &InstanceId,
    ) -> Result<Vec<InstanceTag>> {
        debug!(
            instance_id = %instance_id,
            "Fetching tags for instance"
        );

        let response = self
            .client
            .describe_tags()
            .filters(
                Filter::builder()
                    .name(FILTER_RESOURCE_ID)
                    .values(instance_id.as_str())
                    .build(),
            )
            .send()
            .await
            .context(format!("Failed to describe tags for instance {}", instance_id))?;

        let tags = Self::to_instance_tags(response.tags());

        debug!(
            instance_id = %instance_id,
            tag_count = tags.len(),
            "Fetched instance tags"
        );

        Ok(tags)
    }

    /// Keeps tag order as returned by EC2. Entries without a key are dropped;
    /// a missing value is treated as empty.
    pub(super) fn to_instance_tags(descriptions: &[TagDescription]) -> Vec<InstanceTag> {
        descriptions
            .iter()
            .filter_map(|tag| {
                tag.key()
                    .map(|key| InstanceTag::new(key, tag.value().unwrap_or_default()))
            })
            .collect()
    }
}
