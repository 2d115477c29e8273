//! The operation-group registry.
//!
//! A registry maps group names (`"backup_vaults"`, `"jobs"`, ...) to factories
//! that bind an operation group to a pipeline and a resolved API version. It
//! is built once, then shared read-only by every client that uses it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use azure_data_protection_core::config::ClientConfiguration;
use azure_data_protection_core::error::{DataProtectionError, DataProtectionResult};
use azure_data_protection_core::pipeline::Pipeline;
use azure_data_protection_core::version::Profile;

use crate::backup_instances::{self, BackupInstancesOperations};
use crate::backup_policies::{self, BackupPoliciesOperations};
use crate::backup_vaults::{self, BackupVaultsOperations};
use crate::jobs::{self, JobsOperations};
use crate::models::{path_segment, PROVIDER_NAMESPACE};
use crate::operations::{self, DataProtectionOperations};

/// What every operation group is bound to: the shared pipeline and the API
/// version resolved for that group.
#[derive(Debug, Clone)]
pub struct OperationContext {
    pipeline: Pipeline,
    api_version: String,
}

impl OperationContext {
    pub fn new(pipeline: Pipeline, api_version: impl Into<String>) -> Self {
        Self {
            pipeline,
            api_version: api_version.into(),
        }
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn config(&self) -> &Arc<ClientConfiguration> {
        self.pipeline.config()
    }

    /// `/subscriptions/{subscriptionId}`
    pub(crate) fn subscription_scope(&self) -> String {
        format!("/subscriptions/{}", self.config().subscription_id())
    }

    /// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}`
    pub(crate) fn resource_group_scope(&self, resource_group: &str) -> DataProtectionResult<String> {
        Ok(format!(
            "{}/resourceGroups/{}",
            self.subscription_scope(),
            path_segment("resource_group", resource_group)?
        ))
    }

    /// `.../providers/Microsoft.DataProtection/backupVaults/{vaultName}`
    pub(crate) fn vault_scope(
        &self,
        resource_group: &str,
        vault_name: &str,
    ) -> DataProtectionResult<String> {
        Ok(format!(
            "{}/providers/{}/backupVaults/{}",
            self.resource_group_scope(resource_group)?,
            PROVIDER_NAMESPACE,
            path_segment("vault_name", vault_name)?
        ))
    }
}

/// An operation group bound to a resolved API version.
#[derive(Debug, Clone)]
pub enum OperationGroupHandle {
    BackupVaults(BackupVaultsOperations),
    BackupPolicies(BackupPoliciesOperations),
    BackupInstances(BackupInstancesOperations),
    Jobs(JobsOperations),
    Operations(DataProtectionOperations),
}

impl OperationGroupHandle {
    pub fn context(&self) -> &OperationContext {
        match self {
            Self::BackupVaults(ops) => ops.context(),
            Self::BackupPolicies(ops) => ops.context(),
            Self::BackupInstances(ops) => ops.context(),
            Self::Jobs(ops) => ops.context(),
            Self::Operations(ops) => ops.context(),
        }
    }

    /// The API version this handle sends with every request.
    pub fn api_version(&self) -> &str {
        self.context().api_version()
    }

    /// Name of the operation-group implementation behind this handle.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BackupVaults(_) => backup_vaults::GROUP_NAME,
            Self::BackupPolicies(_) => backup_policies::GROUP_NAME,
            Self::BackupInstances(_) => backup_instances::GROUP_NAME,
            Self::Jobs(_) => jobs::GROUP_NAME,
            Self::Operations(_) => operations::GROUP_NAME,
        }
    }

    pub fn into_backup_vaults(self) -> Option<BackupVaultsOperations> {
        match self {
            Self::BackupVaults(ops) => Some(ops),
            _ => None,
        }
    }

    pub fn into_backup_policies(self) -> Option<BackupPoliciesOperations> {
        match self {
            Self::BackupPolicies(ops) => Some(ops),
            _ => None,
        }
    }

    pub fn into_backup_instances(self) -> Option<BackupInstancesOperations> {
        match self {
            Self::BackupInstances(ops) => Some(ops),
            _ => None,
        }
    }

    pub fn into_jobs(self) -> Option<JobsOperations> {
        match self {
            Self::Jobs(ops) => Some(ops),
            _ => None,
        }
    }

    pub fn into_operations(self) -> Option<DataProtectionOperations> {
        match self {
            Self::Operations(ops) => Some(ops),
            _ => None,
        }
    }
}

/// Builds an operation group for a resolved context.
pub type OperationGroupFactory = fn(OperationContext) -> OperationGroupHandle;

/// Read-only mapping from group name to factory.
#[derive(Clone, Default)]
pub struct OperationGroupRegistry {
    factories: BTreeMap<String, OperationGroupFactory>,
}

impl OperationGroupRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation group this crate implements.
    pub fn standard() -> Self {
        Self::new()
            .register(backup_vaults::GROUP_NAME, |ctx| {
                OperationGroupHandle::BackupVaults(BackupVaultsOperations::new(ctx))
            })
            .register(backup_policies::GROUP_NAME, |ctx| {
                OperationGroupHandle::BackupPolicies(BackupPoliciesOperations::new(ctx))
            })
            .register(backup_instances::GROUP_NAME, |ctx| {
                OperationGroupHandle::BackupInstances(BackupInstancesOperations::new(ctx))
            })
            .register(jobs::GROUP_NAME, |ctx| {
                OperationGroupHandle::Jobs(JobsOperations::new(ctx))
            })
            .register(operations::GROUP_NAME, |ctx| {
                OperationGroupHandle::Operations(DataProtectionOperations::new(ctx))
            })
    }

    /// Add (or replace) the factory for `name`.
    pub fn register(mut self, name: impl Into<String>, factory: OperationGroupFactory) -> Self {
        self.factories.insert(name.into(), factory);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered group names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build the group registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DataProtectionError::UnknownOperationGroup`] if nothing is
    /// registered under `name`.
    pub fn create(
        &self,
        name: &str,
        context: OperationContext,
    ) -> DataProtectionResult<OperationGroupHandle> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| DataProtectionError::UnknownOperationGroup(name.to_string()))?;
        Ok(factory(context))
    }

    /// Check that every group a profile names is registered.
    pub fn validate_profile(&self, profile: &Profile) -> DataProtectionResult<()> {
        match profile.groups().find(|group| !self.contains(group)) {
            Some(unknown) => Err(DataProtectionError::UnknownOperationGroup(format!(
                "{unknown} (referenced by profile '{}')",
                profile.name
            ))),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for OperationGroupRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}
