//! Client configuration for the Azure Data Protection management plane.
//!
//! [`ClientConfiguration`] is immutable once built and is shared behind an
//! `Arc` by the pipeline and every operation group.
//!
//! # Examples
//!
//! ```rust,no_run
//! use azure_data_protection_core::auth::ManagementCredential;
//! use azure_data_protection_core::config::ClientConfiguration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfiguration::builder()
//!     .credential(ManagementCredential::azure_cli()?)
//!     .subscription_id("00000000-0000-0000-0000-000000000000")
//!     .build()?;
//! assert_eq!(config.base_url().as_str(), "https://management.azure.com/");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use url::Url;

use crate::auth::{BearerTokenPolicy, ManagementCredential, DEFAULT_SCOPE};
use crate::error::{DataProtectionError, DataProtectionResult};
use crate::version::Profile;

/// Public-cloud Azure Resource Manager endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";

/// Environment variable consulted when no subscription id is given.
pub const SUBSCRIPTION_ID_ENV: &str = "AZURE_SUBSCRIPTION_ID";

/// Environment variable consulted when no base URL is given.
pub const ENDPOINT_ENV: &str = "AZURE_DATA_PROTECTION_ENDPOINT";

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default read/response timeout (60 seconds).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Immutable settings shared by every request a client makes.
#[derive(Debug, Clone)]
pub struct ClientConfiguration {
    subscription_id: String,
    base_url: Url,
    api_version: Option<String>,
    profile: Option<Profile>,
    policy: BearerTokenPolicy,
    connect_timeout: Duration,
    read_timeout: Duration,
}

/// Builder for [`ClientConfiguration`].
///
/// Use [`ClientConfiguration::builder()`] to create a new builder.
#[derive(Debug, Default)]
pub struct ClientConfigurationBuilder {
    credential: Option<ManagementCredential>,
    subscription_id: Option<String>,
    base_url: Option<String>,
    api_version: Option<String>,
    profile: Option<Profile>,
    scopes: Option<Vec<String>>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl ClientConfiguration {
    pub fn builder() -> ClientConfigurationBuilder {
        ClientConfigurationBuilder::default()
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The explicitly requested API version, if any.
    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// OAuth2 scopes requested from the credential provider.
    pub fn scopes(&self) -> &[String] {
        self.policy.scopes()
    }

    pub fn credential(&self) -> &ManagementCredential {
        self.policy.credential()
    }

    /// The authorization policy built from the credential and scopes.
    pub fn authorization_policy(&self) -> &BearerTokenPolicy {
        &self.policy
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Build a full URL for an ARM path relative to the base URL.
    pub fn url(&self, path: &str) -> DataProtectionResult<Url> {
        self.base_url.join(path).map_err(|e| {
            DataProtectionError::invalid_argument(format!("failed to construct URL: {e}"))
        })
    }
}

impl ClientConfigurationBuilder {
    /// Set the credential used to acquire bearer tokens. **Required.**
    pub fn credential(mut self, credential: ManagementCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Set the Azure subscription id.
    ///
    /// If not set, the builder checks the `AZURE_SUBSCRIPTION_ID`
    /// environment variable.
    pub fn subscription_id(mut self, subscription_id: impl Into<String>) -> Self {
        self.subscription_id = Some(subscription_id.into());
        self
    }

    /// Set the Resource Manager base URL.
    ///
    /// If not set, the builder checks `AZURE_DATA_PROTECTION_ENDPOINT` and
    /// falls back to [`DEFAULT_ENDPOINT`].
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Force every operation group onto this API version.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Select per-group API versions through a profile.
    pub fn profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Override the OAuth2 scopes (e.g. for sovereign clouds).
    ///
    /// Defaults to [`DEFAULT_SCOPE`].
    pub fn credential_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Set the connection timeout used by the default HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout used by the default HTTP client.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Build the configuration. Performs no network calls.
    ///
    /// # Errors
    ///
    /// Returns [`DataProtectionError::InvalidArgument`] if:
    /// - no credential is provided
    /// - the subscription id is missing or blank
    /// - the base URL is not a valid URL
    /// - the scope list is empty
    pub fn build(self) -> DataProtectionResult<ClientConfiguration> {
        let credential = self
            .credential
            .ok_or_else(|| DataProtectionError::invalid_argument("credential is required"))?;

        let subscription_id = self
            .subscription_id
            .or_else(|| std::env::var(SUBSCRIPTION_ID_ENV).ok())
            .ok_or_else(|| {
                DataProtectionError::invalid_argument(
                    "subscription_id is required. Set it via builder or AZURE_SUBSCRIPTION_ID env var.",
                )
            })?;
        if subscription_id.trim().is_empty() {
            return Err(DataProtectionError::invalid_argument(
                "subscription_id cannot be empty",
            ));
        }

        let base_url_str = self
            .base_url
            .or_else(|| std::env::var(ENDPOINT_ENV).ok())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let base_url = Url::parse(&base_url_str).map_err(|e| {
            DataProtectionError::invalid_argument(format!("invalid base URL '{base_url_str}': {e}"))
        })?;

        let scopes = self
            .scopes
            .unwrap_or_else(|| vec![DEFAULT_SCOPE.to_string()]);
        if scopes.is_empty() {
            return Err(DataProtectionError::invalid_argument(
                "at least one credential scope is required",
            ));
        }

        Ok(ClientConfiguration {
            subscription_id,
            base_url,
            api_version: self.api_version,
            profile: self.profile,
            policy: BearerTokenPolicy::new(credential, scopes),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            read_timeout: self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT),
        })
    }
}
