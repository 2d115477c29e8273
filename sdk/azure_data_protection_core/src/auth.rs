//! Credentials and the authorization policy applied to every management request.
//!
//! Token acquisition is delegated to a credential provider: either a token the
//! caller already holds, or any [`TokenCredential`] from `azure_identity`.
//! [`BearerTokenPolicy`] pairs a credential with the OAuth2 scopes to request
//! and turns them into an `Authorization` header value.

use std::sync::Arc;

use azure_core::credentials::TokenCredential;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{DataProtectionError, DataProtectionResult};

/// OAuth2 scope for the Azure Resource Manager management plane.
pub const DEFAULT_SCOPE: &str = "https://management.azure.com/.default";

/// Environment variable holding a pre-acquired ARM access token.
pub const ACCESS_TOKEN_ENV: &str = "AZURE_ACCESS_TOKEN";

/// Credential types supported by the Data Protection client.
#[derive(Clone)]
pub enum ManagementCredential {
    /// A bearer token acquired out of band (e.g. `az account get-access-token`).
    AccessToken(SecretString),

    /// Any Microsoft Entra ID credential provider.
    TokenCredential(Arc<dyn TokenCredential>),
}

impl ManagementCredential {
    /// Use a bearer token the caller already holds.
    pub fn access_token(token: impl Into<String>) -> Self {
        Self::AccessToken(SecretString::from(token.into()))
    }

    /// Wrap an existing credential provider such as
    /// `azure_identity::ClientSecretCredential`.
    pub fn token_credential(credential: Arc<dyn TokenCredential>) -> Self {
        Self::TokenCredential(credential)
    }

    /// Authenticate through the Azure CLI's logged-in account.
    pub fn azure_cli() -> DataProtectionResult<Self> {
        let credential = azure_identity::AzureCliCredential::new(None)
            .map_err(|e| DataProtectionError::Auth(e.to_string()))?;
        Ok(Self::TokenCredential(credential))
    }

    /// Authenticate through whichever developer tool (Azure CLI, Azure
    /// Developer CLI) is signed in.
    pub fn developer_tools() -> DataProtectionResult<Self> {
        let credential = azure_identity::DeveloperToolsCredential::new(None)
            .map_err(|e| DataProtectionError::Auth(e.to_string()))?;
        Ok(Self::TokenCredential(credential))
    }

    /// Read a pre-acquired token from `AZURE_ACCESS_TOKEN`.
    pub fn from_env() -> DataProtectionResult<Self> {
        match std::env::var(ACCESS_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Ok(Self::access_token(token)),
            _ => Err(DataProtectionError::invalid_argument(format!(
                "{ACCESS_TOKEN_ENV} is not set"
            ))),
        }
    }

    /// Obtain a bearer token for the given scopes.
    pub async fn token(&self, scopes: &[&str]) -> DataProtectionResult<SecretString> {
        match self {
            Self::AccessToken(token) => Ok(token.clone()),
            Self::TokenCredential(credential) => {
                let access = credential
                    .get_token(scopes, None)
                    .await
                    .map_err(|e| DataProtectionError::Auth(e.to_string()))?;
                Ok(SecretString::from(access.token.secret().to_string()))
            }
        }
    }
}

impl std::fmt::Debug for ManagementCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessToken(_) => write!(f, "ManagementCredential::AccessToken(****)"),
            Self::TokenCredential(_) => write!(f, "ManagementCredential::TokenCredential"),
        }
    }
}

/// Authorization policy: a credential bound to the scopes it is asked for.
#[derive(Debug, Clone)]
pub struct BearerTokenPolicy {
    credential: ManagementCredential,
    scopes: Vec<String>,
}

impl BearerTokenPolicy {
    pub fn new(credential: ManagementCredential, scopes: Vec<String>) -> Self {
        Self { credential, scopes }
    }

    /// The scopes requested from the credential provider.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn credential(&self) -> &ManagementCredential {
        &self.credential
    }

    /// Resolve the credential to an `Authorization` header value.
    pub async fn authorization_header(&self) -> DataProtectionResult<String> {
        let scopes: Vec<&str> = self.scopes.iter().map(String::as_str).collect();
        let token = self.credential.token(&scopes).await?;
        Ok(format!("Bearer {}", token.expose_secret()))
    }
}
