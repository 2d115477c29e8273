//! Helpers for testing code built on this crate against a `wiremock` server.
//!
//! Enabled by the `test-support` feature.

use wiremock::MockServer;

use crate::auth::ManagementCredential;
use crate::config::{ClientConfiguration, ClientConfigurationBuilder};

/// Subscription id used by mock configurations.
pub const TEST_SUBSCRIPTION_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Access token used by mock configurations (not a real token).
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";

/// `Authorization` header value produced by [`TEST_ACCESS_TOKEN`].
pub const TEST_AUTHORIZATION: &str = "Bearer test-access-token";

/// A configuration builder pointed at `server`, with test credentials filled in.
pub fn mock_configuration_builder(server: &MockServer) -> ClientConfigurationBuilder {
    ClientConfiguration::builder()
        .credential(ManagementCredential::access_token(TEST_ACCESS_TOKEN))
        .subscription_id(TEST_SUBSCRIPTION_ID)
        .base_url(server.uri())
}

/// A ready-made configuration pointed at `server`.
///
/// # Panics
///
/// Panics if the mock server URI is not a valid URL.
pub fn mock_configuration(server: &MockServer) -> ClientConfiguration {
    mock_configuration_builder(server)
        .build()
        .expect("mock server URI should be a valid base URL")
}
