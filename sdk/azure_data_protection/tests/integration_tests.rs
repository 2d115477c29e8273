//! Integration tests for azure_data_protection.
//!
//! These tests require a live Azure subscription and a signed-in Azure CLI.
//! Run with: `cargo test --features integration-tests`
//!
//! Required environment variables:
//! - `AZURE_SUBSCRIPTION_ID`: The subscription to query
//! - `AZURE_DATA_PROTECTION_RESOURCE_GROUP`: A resource group to list vaults in
//!
//! Optional:
//! - `AZURE_DATA_PROTECTION_VAULT`: A backup vault whose policies and jobs are listed

#![cfg(feature = "integration-tests")]

use azure_data_protection::DataProtectionClient;
use azure_data_protection_core::auth::ManagementCredential;
use azure_data_protection_core::config::ClientConfiguration;
use azure_data_protection_core::version::Profile;

fn get_client() -> DataProtectionClient {
    let config = ClientConfiguration::builder()
        .credential(ManagementCredential::azure_cli().expect("Azure CLI credential"))
        .build()
        .expect("AZURE_SUBSCRIPTION_ID not set");

    DataProtectionClient::new(config).expect("Failed to build client")
}

fn get_resource_group() -> String {
    std::env::var("AZURE_DATA_PROTECTION_RESOURCE_GROUP")
        .expect("AZURE_DATA_PROTECTION_RESOURCE_GROUP not set")
}

#[tokio::test]
async fn test_list_provider_operations() {
    let client = get_client();

    let operations = client
        .operations()
        .expect("operations group")
        .list()
        .await
        .expect("list operations");

    assert!(operations.iter().any(|op| op
        .name
        .as_deref()
        .is_some_and(|name| name.starts_with("Microsoft.DataProtection/"))));
}

#[tokio::test]
async fn test_list_vaults() {
    let client = get_client();
    let resource_group = get_resource_group();
    let vaults = client.backup_vaults().expect("backup_vaults group");

    let in_group = vaults
        .list_in_resource_group(&resource_group)
        .await
        .expect("list vaults in resource group");
    let in_subscription = vaults
        .list_in_subscription()
        .await
        .expect("list vaults in subscription");

    assert!(in_subscription.len() >= in_group.len());
}

#[tokio::test]
async fn test_vault_children_with_pinned_version() {
    let Ok(vault_name) = std::env::var("AZURE_DATA_PROTECTION_VAULT") else {
        return;
    };
    let resource_group = get_resource_group();

    let config = ClientConfiguration::builder()
        .credential(ManagementCredential::azure_cli().expect("Azure CLI credential"))
        .profile(Profile::new("pinned").pin("jobs", "2021-01-01"))
        .build()
        .expect("AZURE_SUBSCRIPTION_ID not set");
    let client = DataProtectionClient::new(config).expect("Failed to build client");

    let vault = client
        .backup_vaults()
        .expect("backup_vaults group")
        .get(&resource_group, &vault_name)
        .await
        .expect("get vault");
    assert_eq!(vault.name.as_deref(), Some(vault_name.as_str()));

    client
        .backup_policies()
        .expect("backup_policies group")
        .list(&resource_group, &vault_name)
        .await
        .expect("list policies");

    let jobs = client.jobs().expect("jobs group");
    assert_eq!(jobs.context().api_version(), "2021-01-01");
    jobs.list(&resource_group, &vault_name)
        .await
        .expect("list jobs");
}
