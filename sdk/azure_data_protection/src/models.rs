//! Shared types for the Azure Data Protection resource provider.
//!
//! This module contains the supported API versions and the ARM envelope types
//! common to every operation group.

use azure_data_protection_core::error::{DataProtectionError, DataProtectionResult};
use azure_data_protection_core::version::ApiVersionSet;
use percent_encoding::{AsciiSet, CONTROLS};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Characters escaped in a single ARM path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

const ASYNC_OPERATION_HEADER: &str = "azure-asyncoperation";
const RETRY_AFTER_HEADER: &str = "retry-after";

/// Resource provider namespace used in every ARM path.
pub const PROVIDER_NAMESPACE: &str = "Microsoft.DataProtection";

/// API version used when neither an explicit version nor a profile selects one.
pub const DEFAULT_API_VERSION: &str = "2021-07-01";

/// Every API version this crate knows the shapes of, oldest first.
pub const SUPPORTED_API_VERSIONS: [&str; 4] = [
    "2021-01-01",
    "2021-02-01-preview",
    "2021-06-01-preview",
    "2021-07-01",
];

/// The supported versions with [`DEFAULT_API_VERSION`] as the default.
pub fn api_versions() -> DataProtectionResult<ApiVersionSet> {
    ApiVersionSet::new(SUPPORTED_API_VERSIONS, DEFAULT_API_VERSION)
}

/// Creation and modification metadata ARM attaches to resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<String>,
}

/// Managed identity attached to a backup vault.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DppIdentityDetails {
    /// Identity type, e.g. `"SystemAssigned"` or `"None"`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub identity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl DppIdentityDetails {
    /// A system-assigned managed identity.
    pub fn system_assigned() -> Self {
        Self {
            identity_type: Some("SystemAssigned".into()),
            ..Self::default()
        }
    }
}

/// The outcome of a PUT or PATCH on a resource that may be provisioned
/// asynchronously.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteResponse<T> {
    /// The service returned the written resource.
    Completed(T),
    /// The service accepted the request and is still applying it.
    Accepted(AcceptedOperation),
}

impl<T> WriteResponse<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn resource(&self) -> Option<&T> {
        match self {
            Self::Completed(resource) => Some(resource),
            Self::Accepted(_) => None,
        }
    }

    pub fn into_resource(self) -> Option<T> {
        match self {
            Self::Completed(resource) => Some(resource),
            Self::Accepted(_) => None,
        }
    }
}

/// Where to track a long-running write the service accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptedOperation {
    /// `Azure-AsyncOperation` status URL.
    pub async_operation: Option<String>,
    /// `Location` URL.
    pub location: Option<String>,
    /// Suggested polling interval in seconds.
    pub retry_after: Option<u64>,
}

impl AcceptedOperation {
    fn from_response(response: &Response) -> Self {
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };

        Self {
            async_operation: header(ASYNC_OPERATION_HEADER),
            location: header(reqwest::header::LOCATION.as_str()),
            retry_after: header(RETRY_AFTER_HEADER).and_then(|v| v.trim().parse().ok()),
        }
    }
}

/// Read a write response: `202 Accepted` or an empty body means the service
/// is still provisioning, anything else carries the resource.
pub(crate) async fn write_response<T: DeserializeOwned>(
    response: Response,
) -> DataProtectionResult<WriteResponse<T>> {
    let accepted = AcceptedOperation::from_response(&response);
    let status = response.status();
    let body = response.text().await?;

    if status == StatusCode::ACCEPTED || body.trim().is_empty() {
        tracing::debug!(
            status = status.as_u16(),
            async_operation = ?accepted.async_operation,
            "write accepted"
        );
        return Ok(WriteResponse::Accepted(accepted));
    }

    Ok(WriteResponse::Completed(serde_json::from_str(&body)?))
}

/// Validate and percent-encode one ARM path segment.
pub(crate) fn path_segment(label: &str, value: &str) -> DataProtectionResult<String> {
    let value = require(label, value)?;
    Ok(percent_encoding::utf8_percent_encode(value, PATH_SEGMENT).to_string())
}

/// Reject blank path segments so they cannot collapse an ARM path.
pub(crate) fn require<'a>(label: &str, value: &'a str) -> DataProtectionResult<&'a str> {
    if value.trim().is_empty() {
        Err(DataProtectionError::invalid_argument(format!(
            "{label} cannot be empty"
        )))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_versions_contain_default() {
        let set = api_versions().expect("valid version set");
        assert_eq!(set.default_version(), DEFAULT_API_VERSION);
        assert_eq!(set.len(), SUPPORTED_API_VERSIONS.len());
    }

    #[test]
    fn test_system_data_deserialization() {
        let json = serde_json::json!({
            "createdBy": "user@contoso.com",
            "createdByType": "User",
            "createdAt": "2021-07-01T10:00:00Z"
        });

        let data: SystemData = serde_json::from_value(json).unwrap();
        assert_eq!(data.created_by.as_deref(), Some("user@contoso.com"));
        assert_eq!(data.created_by_type.as_deref(), Some("User"));
        assert!(data.last_modified_at.is_none());
    }

    #[test]
    fn test_identity_serialization() {
        let json = serde_json::to_value(DppIdentityDetails::system_assigned()).unwrap();
        assert_eq!(json, serde_json::json!({"type": "SystemAssigned"}));
    }

    #[test]
    fn test_require_rejects_blank() {
        assert!(require("vault_name", "vault1").is_ok());
        let err = require("vault_name", " ").unwrap_err();
        assert!(err.to_string().contains("vault_name cannot be empty"));
    }

    #[test]
    fn test_path_segment_escapes_delimiters() {
        assert_eq!(path_segment("vault_name", "vault-1").unwrap(), "vault-1");
        assert_eq!(
            path_segment("vault_name", "v?x=1#frag").unwrap(),
            "v%3Fx=1%23frag"
        );
        assert_eq!(path_segment("vault_name", "a/../b").unwrap(), "a%2F..%2Fb");
        assert_eq!(path_segment("vault_name", "50%").unwrap(), "50%25");
        assert!(path_segment("vault_name", "").is_err());
    }

    #[test]
    fn test_write_response_accessors() {
        let done: WriteResponse<u32> = WriteResponse::Completed(7);
        assert!(!done.is_accepted());
        assert_eq!(done.resource(), Some(&7));

        let pending: WriteResponse<u32> = WriteResponse::Accepted(AcceptedOperation::default());
        assert!(pending.is_accepted());
        assert_eq!(pending.into_resource(), None);
    }
}
