//! Backup policies of a backup vault.
//!
//! Policy rules are polymorphic (`AzureBackupRule`, `AzureRetentionRule`, ...)
//! and vary by datasource type, so they are carried as raw JSON.

use azure_data_protection_core::error::DataProtectionResult;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::models::{path_segment, write_response, SystemData, WriteResponse};
use crate::paging::{self, Page};
use crate::registry::OperationContext;

/// Registry name of this operation group.
pub const GROUP_NAME: &str = "backup_policies";

/// A backup policy definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPolicy {
    /// Discriminator, `"BackupPolicy"`.
    pub object_type: String,

    /// Datasource types the policy applies to,
    /// e.g. `"Microsoft.Compute/disks"`.
    pub datasource_types: Vec<String>,

    #[serde(default)]
    pub policy_rules: Vec<serde_json::Value>,
}

impl BackupPolicy {
    pub fn new(datasource_types: Vec<String>, policy_rules: Vec<serde_json::Value>) -> Self {
        Self {
            object_type: "BackupPolicy".into(),
            datasource_types,
            policy_rules,
        }
    }
}

/// A backup policy resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPolicyResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_data: Option<SystemData>,

    pub properties: BackupPolicy,
}

impl From<BackupPolicy> for BackupPolicyResource {
    fn from(properties: BackupPolicy) -> Self {
        Self {
            id: None,
            name: None,
            resource_type: None,
            system_data: None,
            properties,
        }
    }
}

/// Operations on backup policies, bound to one API version.
#[derive(Debug, Clone)]
pub struct BackupPoliciesOperations {
    context: OperationContext,
}

impl BackupPoliciesOperations {
    pub fn new(context: OperationContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &OperationContext {
        &self.context
    }

    fn policy_path(
        &self,
        resource_group: &str,
        vault_name: &str,
        policy_name: &str,
    ) -> DataProtectionResult<String> {
        Ok(format!(
            "{}/backupPolicies/{}",
            self.context.vault_scope(resource_group, vault_name)?,
            path_segment("policy_name", policy_name)?
        ))
    }

    /// Get a backup policy.
    #[tracing::instrument(
        name = "dataprotection::backup_policies::get",
        skip(self),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn get(
        &self,
        resource_group: &str,
        vault_name: &str,
        policy_name: &str,
    ) -> DataProtectionResult<BackupPolicyResource> {
        tracing::debug!("getting backup policy");

        let path = self.policy_path(resource_group, vault_name, policy_name)?;
        let response = self
            .context
            .pipeline()
            .get(&path, self.context.api_version())
            .await?;

        Ok(response.json::<BackupPolicyResource>().await?)
    }

    /// Create or replace a backup policy.
    ///
    /// Returns [`WriteResponse::Accepted`] if the service applies the write
    /// asynchronously.
    #[tracing::instrument(
        name = "dataprotection::backup_policies::create_or_update",
        skip(self, policy),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        vault_name: &str,
        policy_name: &str,
        policy: &BackupPolicyResource,
    ) -> DataProtectionResult<WriteResponse<BackupPolicyResource>> {
        tracing::debug!("creating or updating backup policy");

        let path = self.policy_path(resource_group, vault_name, policy_name)?;
        let response = self
            .context
            .pipeline()
            .put(&path, self.context.api_version(), policy)
            .await?;

        write_response(response).await
    }

    /// Delete a backup policy.
    #[tracing::instrument(
        name = "dataprotection::backup_policies::delete",
        skip(self),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn delete(
        &self,
        resource_group: &str,
        vault_name: &str,
        policy_name: &str,
    ) -> DataProtectionResult<()> {
        tracing::debug!("deleting backup policy");

        let path = self.policy_path(resource_group, vault_name, policy_name)?;
        self.context
            .pipeline()
            .delete(&path, self.context.api_version())
            .await?;

        Ok(())
    }

    /// Stream the pages of every policy in a vault.
    pub fn list_pages(
        &self,
        resource_group: &str,
        vault_name: &str,
    ) -> DataProtectionResult<
        impl Stream<Item = DataProtectionResult<Page<BackupPolicyResource>>> + Send + 'static,
    > {
        let path = format!(
            "{}/backupPolicies",
            self.context.vault_scope(resource_group, vault_name)?
        );
        Ok(paging::pages(&self.context, path))
    }

    /// List every policy in a vault.
    #[tracing::instrument(
        name = "dataprotection::backup_policies::list",
        skip(self),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn list(
        &self,
        resource_group: &str,
        vault_name: &str,
    ) -> DataProtectionResult<Vec<BackupPolicyResource>> {
        tracing::debug!("listing backup policies");

        let policies = paging::collect_all(self.list_pages(resource_group, vault_name)?).await?;

        tracing::debug!(count = policies.len(), "backup policies listed");
        Ok(policies)
    }
}
