//! The Data Protection client: operation-group dispatch.
//!
//! [`DataProtectionClient`] owns the shared pipeline, the version resolver,
//! and a read-only [`OperationGroupRegistry`]. Asking it for a group resolves
//! that group's API version and binds a fresh handle to it.
//!
//! # Examples
//!
//! ```rust,no_run
//! use azure_data_protection::client::DataProtectionClient;
//! use azure_data_protection_core::auth::ManagementCredential;
//! use azure_data_protection_core::config::ClientConfiguration;
//! use azure_data_protection_core::version::Profile;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfiguration::builder()
//!     .credential(ManagementCredential::azure_cli()?)
//!     .subscription_id("00000000-0000-0000-0000-000000000000")
//!     .profile(Profile::new("pinned").pin("jobs", "2021-01-01"))
//!     .build()?;
//!
//! let client = DataProtectionClient::new(config)?;
//! assert_eq!(client.jobs()?.context().api_version(), "2021-01-01");
//!
//! let group = client.get_operation_group("backup_vaults")?;
//! assert_eq!(group.api_version(), "2021-07-01");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use azure_data_protection_core::config::ClientConfiguration;
use azure_data_protection_core::error::{DataProtectionError, DataProtectionResult};
use azure_data_protection_core::pipeline::Pipeline;
use azure_data_protection_core::version::{ApiVersionSet, VersionResolver};

use crate::backup_instances::{self, BackupInstancesOperations};
use crate::backup_policies::{self, BackupPoliciesOperations};
use crate::backup_vaults::{self, BackupVaultsOperations};
use crate::jobs::{self, JobsOperations};
use crate::models;
use crate::operations::{self, DataProtectionOperations};
use crate::registry::{OperationContext, OperationGroupHandle, OperationGroupRegistry};

/// Dispatches operation-group lookups for one configuration.
///
/// The client is cheaply cloneable and can be shared across threads.
#[derive(Debug, Clone)]
pub struct DataProtectionClient {
    pipeline: Pipeline,
    resolver: Arc<VersionResolver>,
    registry: Arc<OperationGroupRegistry>,
}

/// Builder for [`DataProtectionClient`].
///
/// Use [`DataProtectionClient::builder()`] to create a new builder.
#[derive(Debug, Default)]
pub struct DataProtectionClientBuilder {
    configuration: Option<ClientConfiguration>,
    registry: Option<Arc<OperationGroupRegistry>>,
    api_versions: Option<ApiVersionSet>,
    http_client: Option<reqwest::Client>,
}

impl DataProtectionClient {
    pub fn builder() -> DataProtectionClientBuilder {
        DataProtectionClientBuilder::default()
    }

    /// Build a client with the standard registry and supported API versions.
    pub fn new(configuration: ClientConfiguration) -> DataProtectionResult<Self> {
        Self::builder().configuration(configuration).build()
    }

    pub fn config(&self) -> &Arc<ClientConfiguration> {
        self.pipeline.config()
    }

    pub fn registry(&self) -> &Arc<OperationGroupRegistry> {
        &self.registry
    }

    pub fn resolver(&self) -> &VersionResolver {
        &self.resolver
    }

    /// The client-wide API version: the explicitly requested one, or the
    /// default.
    pub fn api_version(&self) -> &str {
        self.config()
            .api_version()
            .unwrap_or_else(|| self.resolver.default_version())
    }

    /// The API version `group` would be bound to.
    pub fn api_version_for(&self, group: &str) -> DataProtectionResult<String> {
        if !self.registry.contains(group) {
            return Err(DataProtectionError::UnknownOperationGroup(group.to_string()));
        }
        let config = self.config();
        Ok(self
            .resolver
            .resolve(config.api_version(), config.profile(), group))
    }

    /// Look up an operation group by name and bind it to its resolved API
    /// version.
    ///
    /// # Errors
    ///
    /// Returns [`DataProtectionError::UnknownOperationGroup`] if `name` is not
    /// registered.
    pub fn get_operation_group(&self, name: &str) -> DataProtectionResult<OperationGroupHandle> {
        let api_version = self.api_version_for(name)?;
        tracing::trace!(group = name, api_version = %api_version, "binding operation group");

        self.registry
            .create(name, OperationContext::new(self.pipeline.clone(), api_version))
    }

    pub fn backup_vaults(&self) -> DataProtectionResult<BackupVaultsOperations> {
        let handle = self.get_operation_group(backup_vaults::GROUP_NAME)?;
        let kind = handle.kind();
        handle
            .into_backup_vaults()
            .ok_or_else(|| mismatched(backup_vaults::GROUP_NAME, kind))
    }

    pub fn backup_policies(&self) -> DataProtectionResult<BackupPoliciesOperations> {
        let handle = self.get_operation_group(backup_policies::GROUP_NAME)?;
        let kind = handle.kind();
        handle
            .into_backup_policies()
            .ok_or_else(|| mismatched(backup_policies::GROUP_NAME, kind))
    }

    pub fn backup_instances(&self) -> DataProtectionResult<BackupInstancesOperations> {
        let handle = self.get_operation_group(backup_instances::GROUP_NAME)?;
        let kind = handle.kind();
        handle
            .into_backup_instances()
            .ok_or_else(|| mismatched(backup_instances::GROUP_NAME, kind))
    }

    pub fn jobs(&self) -> DataProtectionResult<JobsOperations> {
        let handle = self.get_operation_group(jobs::GROUP_NAME)?;
        let kind = handle.kind();
        handle
            .into_jobs()
            .ok_or_else(|| mismatched(jobs::GROUP_NAME, kind))
    }

    pub fn operations(&self) -> DataProtectionResult<DataProtectionOperations> {
        let handle = self.get_operation_group(operations::GROUP_NAME)?;
        let kind = handle.kind();
        handle
            .into_operations()
            .ok_or_else(|| mismatched(operations::GROUP_NAME, kind))
    }
}

fn mismatched(name: &str, kind: &str) -> DataProtectionError {
    DataProtectionError::Configuration(format!(
        "operation group '{name}' is registered as '{kind}'"
    ))
}

impl DataProtectionClientBuilder {
    /// Set the client configuration. **Required.**
    pub fn configuration(mut self, configuration: ClientConfiguration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    /// Use a custom operation-group registry.
    ///
    /// Defaults to [`OperationGroupRegistry::standard()`].
    pub fn registry(mut self, registry: Arc<OperationGroupRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Override the supported API versions and their default.
    ///
    /// Defaults to [`models::SUPPORTED_API_VERSIONS`] with
    /// [`models::DEFAULT_API_VERSION`].
    pub fn api_versions(mut self, versions: ApiVersionSet) -> Self {
        self.api_versions = Some(versions);
        self
    }

    /// Set a custom HTTP client.
    ///
    /// **Note:** the configuration's timeouts are ignored in this case.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - no configuration is provided
    /// - the configuration's profile names an unregistered group
    /// - the default HTTP client cannot be created
    pub fn build(self) -> DataProtectionResult<DataProtectionClient> {
        let configuration = self
            .configuration
            .ok_or_else(|| DataProtectionError::invalid_argument("configuration is required"))?;

        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(OperationGroupRegistry::standard()));
        if let Some(profile) = configuration.profile() {
            registry.validate_profile(profile)?;
        }

        let versions = match self.api_versions {
            Some(versions) => versions,
            None => models::api_versions()?,
        };

        let configuration = Arc::new(configuration);
        let pipeline = match self.http_client {
            Some(http) => Pipeline::with_http_client(configuration, http),
            None => Pipeline::new(configuration)?,
        };

        Ok(DataProtectionClient {
            pipeline,
            resolver: Arc::new(VersionResolver::new(versions)),
            registry,
        })
    }
}
