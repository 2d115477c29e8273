//! Backup instances: the protected datasources of a backup vault.

use azure_data_protection_core::error::DataProtectionResult;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::models::{path_segment, SystemData};
use crate::paging::{self, Page};
use crate::registry::OperationContext;

/// Registry name of this operation group.
pub const GROUP_NAME: &str = "backup_instances";

/// The datasource a backup instance protects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datasource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,

    /// ARM id of the protected resource.
    #[serde(rename = "resourceID")]
    pub resource_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

/// The policy a backup instance is protected with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyInfo {
    pub policy_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_parameters: Option<serde_json::Value>,
}

/// Backup instance properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupInstance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,

    pub data_source_info: Datasource,

    pub policy_info: PolicyInfo,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_protection_state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub protection_status: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    pub object_type: String,
}

/// A backup instance resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupInstanceResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_data: Option<SystemData>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BackupInstance>,
}

/// Operations on backup instances, bound to one API version.
#[derive(Debug, Clone)]
pub struct BackupInstancesOperations {
    context: OperationContext,
}

impl BackupInstancesOperations {
    pub fn new(context: OperationContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &OperationContext {
        &self.context
    }

    fn instance_path(
        &self,
        resource_group: &str,
        vault_name: &str,
        instance_name: &str,
    ) -> DataProtectionResult<String> {
        Ok(format!(
            "{}/backupInstances/{}",
            self.context.vault_scope(resource_group, vault_name)?,
            path_segment("backup_instance_name", instance_name)?
        ))
    }

    /// Get a backup instance.
    #[tracing::instrument(
        name = "dataprotection::backup_instances::get",
        skip(self),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn get(
        &self,
        resource_group: &str,
        vault_name: &str,
        instance_name: &str,
    ) -> DataProtectionResult<BackupInstanceResource> {
        tracing::debug!("getting backup instance");

        let path = self.instance_path(resource_group, vault_name, instance_name)?;
        let response = self
            .context
            .pipeline()
            .get(&path, self.context.api_version())
            .await?;

        Ok(response.json::<BackupInstanceResource>().await?)
    }

    /// Delete a backup instance, stopping its protection.
    #[tracing::instrument(
        name = "dataprotection::backup_instances::delete",
        skip(self),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn delete(
        &self,
        resource_group: &str,
        vault_name: &str,
        instance_name: &str,
    ) -> DataProtectionResult<()> {
        tracing::debug!("deleting backup instance");

        let path = self.instance_path(resource_group, vault_name, instance_name)?;
        self.context
            .pipeline()
            .delete(&path, self.context.api_version())
            .await?;

        Ok(())
    }

    /// Stream the pages of every backup instance in a vault.
    pub fn list_pages(
        &self,
        resource_group: &str,
        vault_name: &str,
    ) -> DataProtectionResult<
        impl Stream<Item = DataProtectionResult<Page<BackupInstanceResource>>> + Send + 'static,
    > {
        let path = format!(
            "{}/backupInstances",
            self.context.vault_scope(resource_group, vault_name)?
        );
        Ok(paging::pages(&self.context, path))
    }

    /// List every backup instance in a vault.
    #[tracing::instrument(
        name = "dataprotection::backup_instances::list",
        skip(self),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn list(
        &self,
        resource_group: &str,
        vault_name: &str,
    ) -> DataProtectionResult<Vec<BackupInstanceResource>> {
        tracing::debug!("listing backup instances");

        let instances = paging::collect_all(self.list_pages(resource_group, vault_name)?).await?;

        tracing::debug!(count = instances.len(), "backup instances listed");
        Ok(instances)
    }
}
