//! Backup and restore jobs of a backup vault.
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_data_protection::client::DataProtectionClient;
//!
//! # async fn example(client: &DataProtectionClient) -> azure_data_protection_core::DataProtectionResult<()> {
//! for job in client.jobs()?.list("my-rg", "my-vault").await? {
//!     let props = job.properties;
//!     println!("{:?} {:?} {:?}", props.operation, props.status, props.start_time);
//! }
//! # Ok(())
//! # }
//! ```

use azure_data_protection_core::error::DataProtectionResult;
use futures::Stream;
use serde::Deserialize;

use crate::models::{path_segment, SystemData};
use crate::paging::{self, Page};
use crate::registry::OperationContext;

/// Registry name of this operation group.
pub const GROUP_NAME: &str = "jobs";

/// Details of a backup or restore job.
///
/// The service omits fields that do not apply to a job's datasource or
/// state, so everything is optional on the way in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureBackupJob {
    #[serde(rename = "activityID")]
    pub activity_id: Option<String>,

    pub backup_instance_friendly_name: Option<String>,

    pub backup_instance_id: Option<String>,

    pub data_source_id: Option<String>,

    pub data_source_location: Option<String>,

    pub data_source_name: Option<String>,

    pub data_source_type: Option<String>,

    /// ISO 8601 duration, e.g. `"PT2M30S"`.
    pub duration: Option<String>,

    /// ISO 8601 end time; absent while the job runs.
    pub end_time: Option<String>,

    pub error_details: Option<Vec<serde_json::Value>>,

    #[serde(default)]
    pub is_user_triggered: bool,

    /// e.g. `"Backup"`, `"Restore"`.
    pub operation: Option<String>,

    pub operation_category: Option<String>,

    pub policy_id: Option<String>,

    pub policy_name: Option<String>,

    #[serde(default)]
    pub progress_enabled: bool,

    pub source_resource_group: Option<String>,

    #[serde(rename = "sourceSubscriptionID")]
    pub source_subscription_id: Option<String>,

    /// ISO 8601 start time.
    pub start_time: Option<String>,

    /// e.g. `"InProgress"`, `"Completed"`, `"Failed"`.
    pub status: Option<String>,

    pub subscription_id: Option<String>,

    #[serde(default)]
    pub supported_actions: Vec<String>,

    pub vault_name: Option<String>,
}

/// A job resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureBackupJobResource {
    pub id: Option<String>,

    pub name: Option<String>,

    #[serde(rename = "type")]
    pub resource_type: Option<String>,

    pub system_data: Option<SystemData>,

    pub properties: AzureBackupJob,
}

/// Operations on jobs, bound to one API version.
#[derive(Debug, Clone)]
pub struct JobsOperations {
    context: OperationContext,
}

impl JobsOperations {
    pub fn new(context: OperationContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &OperationContext {
        &self.context
    }

    /// Get a job by id.
    ///
    /// # Tracing
    ///
    /// Emits a span named `dataprotection::jobs::get` with field `job_id`.
    #[tracing::instrument(
        name = "dataprotection::jobs::get",
        skip(self),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn get(
        &self,
        resource_group: &str,
        vault_name: &str,
        job_id: &str,
    ) -> DataProtectionResult<AzureBackupJobResource> {
        tracing::debug!("getting job");

        let path = format!(
            "{}/backupJobs/{}",
            self.context.vault_scope(resource_group, vault_name)?,
            path_segment("job_id", job_id)?
        );
        let response = self
            .context
            .pipeline()
            .get(&path, self.context.api_version())
            .await?;
        let job = response.json::<AzureBackupJobResource>().await?;

        tracing::debug!(status = ?job.properties.status, "job retrieved");
        Ok(job)
    }

    /// Stream the pages of every job in a vault.
    pub fn list_pages(
        &self,
        resource_group: &str,
        vault_name: &str,
    ) -> DataProtectionResult<
        impl Stream<Item = DataProtectionResult<Page<AzureBackupJobResource>>> + Send + 'static,
    > {
        let path = format!(
            "{}/backupJobs",
            self.context.vault_scope(resource_group, vault_name)?
        );
        Ok(paging::pages(&self.context, path))
    }

    /// List every job in a vault.
    #[tracing::instrument(
        name = "dataprotection::jobs::list",
        skip(self),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn list(
        &self,
        resource_group: &str,
        vault_name: &str,
    ) -> DataProtectionResult<Vec<AzureBackupJobResource>> {
        tracing::debug!("listing jobs");

        let jobs = paging::collect_all(self.list_pages(resource_group, vault_name)?).await?;

        tracing::debug!(count = jobs.len(), "jobs listed");
        Ok(jobs)
    }
}
