//! Backup vault management.
//!
//! A backup vault is the top-level Data Protection resource: it owns backup
//! policies, backup instances, and the jobs they produce.
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_data_protection::backup_vaults::{BackupVaultResource, StorageSetting};
//! use azure_data_protection::client::DataProtectionClient;
//! use azure_data_protection::models::WriteResponse;
//!
//! # async fn example(client: &DataProtectionClient) -> azure_data_protection_core::DataProtectionResult<()> {
//! let vaults = client.backup_vaults()?;
//!
//! let vault = BackupVaultResource::new("westus", vec![StorageSetting::vault_store_locally_redundant()]);
//! match vaults.create_or_update("my-rg", "my-vault", &vault).await? {
//!     WriteResponse::Completed(created) => {
//!         println!("provisioning state: {:?}", created.properties.provisioning_state);
//!     }
//!     WriteResponse::Accepted(op) => println!("provisioning, track {:?}", op.async_operation),
//! }
//!
//! for vault in vaults.list_in_resource_group("my-rg").await? {
//!     println!("{}", vault.name.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use azure_data_protection_core::error::DataProtectionResult;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::models::{
    path_segment, require, write_response, DppIdentityDetails, SystemData, WriteResponse,
    PROVIDER_NAMESPACE,
};
use crate::paging::{self, Page};
use crate::registry::OperationContext;

/// Registry name of this operation group.
pub const GROUP_NAME: &str = "backup_vaults";

/// ARM resource type checked by name-availability requests.
const RESOURCE_TYPE: &str = "Microsoft.DataProtection/BackupVaults";

// ---------------------------------------------------------------------------
// Resource types
// ---------------------------------------------------------------------------

/// Where a vault keeps recovery points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageSettingStoreType {
    ArchiveStore,
    SnapshotStore,
    VaultStore,
}

/// Redundancy of a vault's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageSettingType {
    GeoRedundant,
    LocallyRedundant,
}

/// A storage setting of a backup vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSetting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datastore_type: Option<StorageSettingStoreType>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<StorageSettingType>,
}

impl StorageSetting {
    pub fn new(datastore_type: StorageSettingStoreType, storage_type: StorageSettingType) -> Self {
        Self {
            datastore_type: Some(datastore_type),
            storage_type: Some(storage_type),
        }
    }

    /// Vault store, locally redundant.
    pub fn vault_store_locally_redundant() -> Self {
        Self::new(
            StorageSettingStoreType::VaultStore,
            StorageSettingType::LocallyRedundant,
        )
    }

    /// Vault store, geo-redundant.
    pub fn vault_store_geo_redundant() -> Self {
        Self::new(
            StorageSettingStoreType::VaultStore,
            StorageSettingType::GeoRedundant,
        )
    }
}

/// Backup vault properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupVault {
    /// Provisioning state, set by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    /// Resource move state, set by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_move_state: Option<String>,

    pub storage_settings: Vec<StorageSetting>,
}

/// A backup vault resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupVaultResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<DppIdentityDetails>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_data: Option<SystemData>,

    pub properties: BackupVault,
}

impl BackupVaultResource {
    /// A vault definition ready for [`BackupVaultsOperations::create_or_update`].
    pub fn new(location: impl Into<String>, storage_settings: Vec<StorageSetting>) -> Self {
        Self {
            id: None,
            name: None,
            resource_type: None,
            location: Some(location.into()),
            tags: None,
            etag: None,
            identity: None,
            system_data: None,
            properties: BackupVault {
                storage_settings,
                ..BackupVault::default()
            },
        }
    }

    pub fn with_identity(mut self, identity: DppIdentityDetails) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Patch body for [`BackupVaultsOperations::update`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatchResourceRequestInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<DppIdentityDetails>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
}

#[derive(Debug, Serialize)]
struct CheckNameAvailabilityRequest<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    resource_type: &'a str,
}

/// Result of a name-availability check.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckNameAvailabilityResult {
    pub name_available: Option<bool>,
    pub reason: Option<String>,
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Operations on backup vaults, bound to one API version.
#[derive(Debug, Clone)]
pub struct BackupVaultsOperations {
    context: OperationContext,
}

impl BackupVaultsOperations {
    pub fn new(context: OperationContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &OperationContext {
        &self.context
    }

    /// Get a backup vault.
    ///
    /// # Tracing
    ///
    /// Emits a span named `dataprotection::backup_vaults::get` with fields
    /// `vault_name` and `api_version`.
    #[tracing::instrument(
        name = "dataprotection::backup_vaults::get",
        skip(self),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn get(
        &self,
        resource_group: &str,
        vault_name: &str,
    ) -> DataProtectionResult<BackupVaultResource> {
        tracing::debug!("getting backup vault");

        let path = self.context.vault_scope(resource_group, vault_name)?;
        let response = self
            .context
            .pipeline()
            .get(&path, self.context.api_version())
            .await?;
        let vault = response.json::<BackupVaultResource>().await?;

        Ok(vault)
    }

    /// Create or replace a backup vault.
    ///
    /// Returns [`WriteResponse::Accepted`] when the service answers
    /// `202 Accepted` and provisions the vault asynchronously.
    ///
    /// # Tracing
    ///
    /// Emits a span named `dataprotection::backup_vaults::create_or_update`.
    #[tracing::instrument(
        name = "dataprotection::backup_vaults::create_or_update",
        skip(self, vault),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        vault_name: &str,
        vault: &BackupVaultResource,
    ) -> DataProtectionResult<WriteResponse<BackupVaultResource>> {
        tracing::debug!("creating or updating backup vault");

        let path = self.context.vault_scope(resource_group, vault_name)?;
        let response = self
            .context
            .pipeline()
            .put(&path, self.context.api_version(), vault)
            .await?;
        let written = write_response::<BackupVaultResource>(response).await?;

        if let Some(vault) = written.resource() {
            tracing::debug!(
                provisioning_state = ?vault.properties.provisioning_state,
                "backup vault written"
            );
        }
        Ok(written)
    }

    /// Update the tags or identity of a backup vault.
    ///
    /// Like [`create_or_update`](Self::create_or_update), this may return
    /// [`WriteResponse::Accepted`].
    #[tracing::instrument(
        name = "dataprotection::backup_vaults::update",
        skip(self, patch),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn update(
        &self,
        resource_group: &str,
        vault_name: &str,
        patch: &PatchResourceRequestInput,
    ) -> DataProtectionResult<WriteResponse<BackupVaultResource>> {
        tracing::debug!("patching backup vault");

        let path = self.context.vault_scope(resource_group, vault_name)?;
        let response = self
            .context
            .pipeline()
            .patch(&path, self.context.api_version(), patch)
            .await?;

        write_response(response).await
    }

    /// Delete a backup vault.
    #[tracing::instrument(
        name = "dataprotection::backup_vaults::delete",
        skip(self),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn delete(&self, resource_group: &str, vault_name: &str) -> DataProtectionResult<()> {
        tracing::debug!("deleting backup vault");

        let path = self.context.vault_scope(resource_group, vault_name)?;
        let response = self
            .context
            .pipeline()
            .delete(&path, self.context.api_version())
            .await?;

        tracing::debug!(status = response.status().as_u16(), "backup vault deletion accepted");
        Ok(())
    }

    /// Stream the pages of every backup vault in the subscription.
    pub fn list_in_subscription_pages(
        &self,
    ) -> impl Stream<Item = DataProtectionResult<Page<BackupVaultResource>>> + Send + 'static {
        let path = format!(
            "{}/providers/{}/backupVaults",
            self.context.subscription_scope(),
            PROVIDER_NAMESPACE
        );
        paging::pages(&self.context, path)
    }

    /// List every backup vault in the subscription.
    #[tracing::instrument(
        name = "dataprotection::backup_vaults::list_in_subscription",
        skip(self),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn list_in_subscription(&self) -> DataProtectionResult<Vec<BackupVaultResource>> {
        tracing::debug!("listing backup vaults in subscription");

        let vaults = paging::collect_all(self.list_in_subscription_pages()).await?;

        tracing::debug!(count = vaults.len(), "backup vaults listed");
        Ok(vaults)
    }

    /// Stream the pages of every backup vault in a resource group.
    pub fn list_in_resource_group_pages(
        &self,
        resource_group: &str,
    ) -> DataProtectionResult<
        impl Stream<Item = DataProtectionResult<Page<BackupVaultResource>>> + Send + 'static,
    > {
        let path = format!(
            "{}/providers/{}/backupVaults",
            self.context.resource_group_scope(resource_group)?,
            PROVIDER_NAMESPACE
        );
        Ok(paging::pages(&self.context, path))
    }

    /// List every backup vault in a resource group.
    #[tracing::instrument(
        name = "dataprotection::backup_vaults::list_in_resource_group",
        skip(self),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn list_in_resource_group(
        &self,
        resource_group: &str,
    ) -> DataProtectionResult<Vec<BackupVaultResource>> {
        tracing::debug!("listing backup vaults in resource group");

        let vaults = paging::collect_all(self.list_in_resource_group_pages(resource_group)?).await?;

        tracing::debug!(count = vaults.len(), "backup vaults listed");
        Ok(vaults)
    }

    /// Check whether a vault name is available in a location.
    #[tracing::instrument(
        name = "dataprotection::backup_vaults::check_name_availability",
        skip(self),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn check_name_availability(
        &self,
        resource_group: &str,
        location: &str,
        vault_name: &str,
    ) -> DataProtectionResult<CheckNameAvailabilityResult> {
        let path = format!(
            "{}/providers/{}/locations/{}/checkNameAvailability",
            self.context.resource_group_scope(resource_group)?,
            PROVIDER_NAMESPACE,
            path_segment("location", location)?
        );
        let request = CheckNameAvailabilityRequest {
            name: require("vault_name", vault_name)?,
            resource_type: RESOURCE_TYPE,
        };

        let response = self
            .context
            .pipeline()
            .post(&path, self.context.api_version(), &request)
            .await?;
        let result = response.json::<CheckNameAvailabilityResult>().await?;

        tracing::debug!(available = ?result.name_available, "name availability checked");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_mock_client, TEST_AUTHORIZATION, TEST_SUBSCRIPTION_ID};
    use azure_data_protection_core::DataProtectionError;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn vault_path() -> String {
        format!(
            "/subscriptions/{TEST_SUBSCRIPTION_ID}/resourceGroups/rg1/providers/Microsoft.DataProtection/backupVaults/vault1"
        )
    }

    fn vault_json() -> serde_json::Value {
        serde_json::json!({
            "id": vault_path(),
            "name": "vault1",
            "type": "Microsoft.DataProtection/backupVaults",
            "location": "westus",
            "identity": {"type": "SystemAssigned", "principalId": "p1", "tenantId": "t1"},
            "properties": {
                "provisioningState": "Succeeded",
                "storageSettings": [{"datastoreType": "VaultStore", "type": "LocallyRedundant"}]
            }
        })
    }

    // --- Serialization tests ---

    #[test]
    fn test_vault_request_serialization() {
        let vault = BackupVaultResource::new(
            "westus",
            vec![StorageSetting::vault_store_geo_redundant()],
        )
        .with_identity(DppIdentityDetails::system_assigned())
        .with_tag("env", "test");

        let json = serde_json::to_value(&vault).unwrap();

        assert_eq!(json["location"], "westus");
        assert_eq!(json["identity"]["type"], "SystemAssigned");
        assert_eq!(json["tags"]["env"], "test");
        assert_eq!(json["properties"]["storageSettings"][0]["datastoreType"], "VaultStore");
        assert_eq!(json["properties"]["storageSettings"][0]["type"], "GeoRedundant");
        assert!(json.get("id").is_none());
        assert!(json["properties"].get("provisioningState").is_none());
    }

    #[test]
    fn test_vault_response_deserialization() {
        let vault: BackupVaultResource = serde_json::from_value(vault_json()).unwrap();

        assert_eq!(vault.name.as_deref(), Some("vault1"));
        assert_eq!(vault.properties.provisioning_state.as_deref(), Some("Succeeded"));
        assert_eq!(
            vault.properties.storage_settings,
            vec![StorageSetting::vault_store_locally_redundant()]
        );
        assert_eq!(
            vault.identity.and_then(|i| i.principal_id).as_deref(),
            Some("p1")
        );
    }

    // --- API tests ---

    #[tokio::test]
    async fn test_get_vault_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(vault_path()))
            .and(header("Authorization", TEST_AUTHORIZATION))
            .and(query_param("api-version", "2021-07-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vault_json()))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let vault = client
            .backup_vaults()
            .unwrap()
            .get("rg1", "vault1")
            .await
            .expect("should succeed");

        assert_eq!(vault.location.as_deref(), Some("westus"));
    }

    #[tokio::test]
    async fn test_get_vault_rejects_blank_name() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        let err = client
            .backup_vaults()
            .unwrap()
            .get("rg1", "")
            .await
            .unwrap_err();
        assert!(matches!(err, DataProtectionError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_create_or_update_vault() {
        let server = MockServer::start().await;
        let vault = BackupVaultResource::new(
            "westus",
            vec![StorageSetting::vault_store_locally_redundant()],
        );

        Mock::given(method("PUT"))
            .and(path(vault_path()))
            .and(query_param("api-version", "2021-07-01"))
            .and(body_json(serde_json::json!({
                "location": "westus",
                "properties": {
                    "storageSettings": [{"datastoreType": "VaultStore", "type": "LocallyRedundant"}]
                }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(vault_json()))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let created = client
            .backup_vaults()
            .unwrap()
            .create_or_update("rg1", "vault1", &vault)
            .await
            .expect("should succeed")
            .into_resource()
            .expect("vault returned");

        assert_eq!(created.id.as_deref(), Some(vault_path().as_str()));
    }

    #[tokio::test]
    async fn test_update_vault_sends_patch() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path(vault_path()))
            .and(body_json(serde_json::json!({"tags": {"owner": "ops"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(vault_json()))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let patch = PatchResourceRequestInput {
            tags: Some(HashMap::from([("owner".to_string(), "ops".to_string())])),
            ..PatchResourceRequestInput::default()
        };

        let updated = client
            .backup_vaults()
            .unwrap()
            .update("rg1", "vault1", &patch)
            .await
            .expect("should succeed");
        assert!(!updated.is_accepted());
    }

    #[tokio::test]
    async fn test_update_vault_accepted_without_body() {
        let server = MockServer::start().await;
        let status_url = format!("{}/operationStatus/op1?api-version=2021-07-01", server.uri());

        Mock::given(method("PATCH"))
            .and(path(vault_path()))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header("Azure-AsyncOperation", status_url.as_str())
                    .insert_header("Retry-After", "10"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let result = client
            .backup_vaults()
            .unwrap()
            .update("rg1", "vault1", &PatchResourceRequestInput::default())
            .await
            .expect("202 is a success");

        match result {
            WriteResponse::Accepted(op) => {
                assert_eq!(op.async_operation.as_deref(), Some(status_url.as_str()));
                assert_eq!(op.retry_after, Some(10));
                assert!(op.location.is_none());
            }
            other => panic!("Expected Accepted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_vault_accepted_with_location() {
        let server = MockServer::start().await;
        let vault = BackupVaultResource::new("westus", vec![]);

        Mock::given(method("PUT"))
            .and(path(vault_path()))
            .respond_with(
                ResponseTemplate::new(202).insert_header("Location", "https://management.azure.com/op"),
            )
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let result = client
            .backup_vaults()
            .unwrap()
            .create_or_update("rg1", "vault1", &vault)
            .await
            .expect("202 is a success");

        assert!(result.is_accepted());
        assert!(result.resource().is_none());
    }

    #[tokio::test]
    async fn test_vault_name_is_escaped_in_path() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("api-version", "2021-07-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vault_json()))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        client
            .backup_vaults()
            .unwrap()
            .get("rg1", "v?x=1#frag")
            .await
            .expect("should succeed");

        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests.len(), 1);
        let url = &requests[0].url;
        assert!(url.path().ends_with("/backupVaults/v%3Fx=1%23frag"));
        assert!(url.query_pairs().all(|(k, _)| k == "api-version"));
        assert!(url.fragment().is_none());
    }

    #[tokio::test]
    async fn test_delete_vault() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(vault_path()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        client
            .backup_vaults()
            .unwrap()
            .delete("rg1", "vault1")
            .await
            .expect("should succeed");
    }

    #[tokio::test]
    async fn test_list_in_subscription_follows_next_link() {
        let server = MockServer::start().await;
        let list_path = format!(
            "/subscriptions/{TEST_SUBSCRIPTION_ID}/providers/Microsoft.DataProtection/backupVaults"
        );

        Mock::given(method("GET"))
            .and(path(list_path.clone()))
            .and(query_param("$skipToken", "page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{"name": "vault2", "properties": {"storageSettings": []}}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(list_path.clone()))
            .and(query_param("api-version", "2021-07-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [vault_json()],
                "nextLink": format!("{}{}?api-version=2021-07-01&$skipToken=page2", server.uri(), list_path)
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let vaults = client
            .backup_vaults()
            .unwrap()
            .list_in_subscription()
            .await
            .expect("should succeed");

        let names: Vec<_> = vaults.iter().filter_map(|v| v.name.as_deref()).collect();
        assert_eq!(names, vec!["vault1", "vault2"]);
    }

    #[tokio::test]
    async fn test_list_in_resource_group() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!(
                "/subscriptions/{TEST_SUBSCRIPTION_ID}/resourceGroups/rg1/providers/Microsoft.DataProtection/backupVaults"
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [vault_json()]
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let vaults = client
            .backup_vaults()
            .unwrap()
            .list_in_resource_group("rg1")
            .await
            .expect("should succeed");

        assert_eq!(vaults.len(), 1);
    }

    #[tokio::test]
    async fn test_check_name_availability() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!(
                "/subscriptions/{TEST_SUBSCRIPTION_ID}/resourceGroups/rg1/providers/Microsoft.DataProtection/locations/westus/checkNameAvailability"
            )))
            .and(body_json(serde_json::json!({
                "name": "vault1",
                "type": "Microsoft.DataProtection/BackupVaults"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "nameAvailable": false,
                "reason": "AlreadyExists",
                "message": "The name is already in use."
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let result = client
            .backup_vaults()
            .unwrap()
            .check_name_availability("rg1", "westus", "vault1")
            .await
            .expect("should succeed");

        assert_eq!(result.name_available, Some(false));
        assert_eq!(result.reason.as_deref(), Some("AlreadyExists"));
    }

    #[tokio::test]
    async fn test_not_found_propagates_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(vault_path()))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"code": "ResourceNotFound", "message": "vault1 was not found"}
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = client
            .backup_vaults()
            .unwrap()
            .get("rg1", "vault1")
            .await
            .unwrap_err();

        assert!(matches!(err, DataProtectionError::Api { ref code, .. } if code == "ResourceNotFound"));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_get_vault_emits_span() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(vault_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(vault_json()))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        client
            .backup_vaults()
            .unwrap()
            .get("rg1", "vault1")
            .await
            .unwrap();

        assert!(logs_contain("dataprotection::backup_vaults::get"));
        assert!(logs_contain("vault1"));
    }
}
