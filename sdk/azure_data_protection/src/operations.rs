//! The resource provider's operation catalogue.

use azure_data_protection_core::error::DataProtectionResult;
use futures::Stream;
use serde::Deserialize;

use crate::models::PROVIDER_NAMESPACE;
use crate::paging::{self, Page};
use crate::registry::OperationContext;

/// Registry name of this operation group.
pub const GROUP_NAME: &str = "data_protection_operations";

/// Localized display strings for a provider operation.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientDiscoveryDisplay {
    pub description: Option<String>,
    pub operation: Option<String>,
    pub provider: Option<String>,
    pub resource: Option<String>,
}

/// One operation the resource provider exposes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDiscoveryValueForSingleApi {
    /// e.g. `"Microsoft.DataProtection/backupVaults/read"`.
    pub name: Option<String>,
    pub display: Option<ClientDiscoveryDisplay>,
    pub is_data_action: Option<bool>,
    pub origin: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DataProtectionOperations {
    context: OperationContext,
}

impl DataProtectionOperations {
    pub fn new(context: OperationContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &OperationContext {
        &self.context
    }

    pub fn list_pages(
        &self,
    ) -> impl Stream<Item = DataProtectionResult<Page<ClientDiscoveryValueForSingleApi>>> + Send + 'static
    {
        let path = format!("/providers/{PROVIDER_NAMESPACE}/operations");
        paging::pages(&self.context, path)
    }

    /// List every operation of the `Microsoft.DataProtection` provider.
    #[tracing::instrument(
        name = "dataprotection::operations::list",
        skip(self),
        fields(api_version = %self.context.api_version())
    )]
    pub async fn list(&self) -> DataProtectionResult<Vec<ClientDiscoveryValueForSingleApi>> {
        tracing::debug!("listing provider operations");

        let operations = paging::collect_all(self.list_pages()).await?;

        tracing::debug!(count = operations.len(), "provider operations listed");
        Ok(operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_mock_client;
    use azure_data_protection_core::DataProtectionError;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_operations() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/providers/Microsoft.DataProtection/operations"))
            .and(query_param("api-version", "2021-07-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{
                    "name": "Microsoft.DataProtection/backupVaults/read",
                    "isDataAction": false,
                    "origin": "user",
                    "display": {
                        "provider": "Microsoft.DataProtection",
                        "resource": "Backup Vaults",
                        "operation": "Get Backup Vault",
                        "description": "Gets a backup vault"
                    }
                }]
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let operations = client
            .operations()
            .unwrap()
            .list()
            .await
            .expect("should succeed");

        assert_eq!(operations.len(), 1);
        assert_eq!(
            operations[0].name.as_deref(),
            Some("Microsoft.DataProtection/backupVaults/read")
        );
        assert_eq!(
            operations[0]
                .display
                .as_ref()
                .and_then(|d| d.resource.as_deref()),
            Some("Backup Vaults")
        );
    }

    #[tokio::test]
    async fn test_next_link_to_other_host_is_not_followed() {
        let server = MockServer::start().await;
        let other = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/providers/Microsoft.DataProtection/operations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [],
                "nextLink": format!("{}/steal", other.uri())
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": []})))
            .expect(0)
            .mount(&other)
            .await;

        let client = setup_mock_client(&server).await;
        let err = client.operations().unwrap().list().await.unwrap_err();

        assert!(matches!(err, DataProtectionError::InvalidArgument(_)));
        let leaked = other.received_requests().await.expect("recording enabled");
        assert!(leaked.is_empty());
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_list_operations_emits_span() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/providers/Microsoft.DataProtection/operations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": []})))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        client.operations().unwrap().list().await.unwrap();

        assert!(logs_contain("dataprotection::operations::list"));
        assert!(logs_contain("2021-07-01"));
    }
}
