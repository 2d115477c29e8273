//! HTTP pipeline for Azure Resource Manager requests.
//!
//! [`Pipeline`] applies the configuration's authorization policy and the
//! `api-version` query parameter to every request, sends it over `reqwest`,
//! and maps ARM error bodies to [`DataProtectionError`]. It performs no
//! retries; transport errors are returned to the caller unchanged.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use azure_data_protection_core::auth::ManagementCredential;
//! use azure_data_protection_core::config::ClientConfiguration;
//! use azure_data_protection_core::pipeline::Pipeline;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfiguration::builder()
//!     .credential(ManagementCredential::developer_tools()?)
//!     .subscription_id("00000000-0000-0000-0000-000000000000")
//!     .build()?;
//!
//! let pipeline = Pipeline::new(Arc::new(config))?;
//! let response = pipeline
//!     .get("/providers/Microsoft.DataProtection/operations", "2021-07-01")
//!     .await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response};
use url::Url;

use crate::config::ClientConfiguration;
use crate::error::{DataProtectionError, DataProtectionResult};

/// Query parameter carrying the REST API version.
pub const API_VERSION_PARAM: &str = "api-version";

/// `User-Agent` sent by the default HTTP client.
pub const USER_AGENT: &str = concat!("azsdk-rust-data-protection/", env!("CARGO_PKG_VERSION"));

/// Maximum length for error messages to prevent sensitive data leaks.
const MAX_ERROR_MESSAGE_LEN: usize = 1000;

const REDACTED: &str = "[REDACTED]";

/// Prefixes whose following value is a secret: bearer tokens and SAS signatures.
const SECRET_MARKERS: [&str; 2] = ["Bearer ", "sig="];

/// Authenticated request pipeline shared by every operation group.
///
/// The pipeline is cheaply cloneable and can be shared across threads.
#[derive(Debug, Clone)]
pub struct Pipeline {
    http: HttpClient,
    config: Arc<ClientConfiguration>,
}

impl Pipeline {
    /// Create a pipeline with an HTTP client built from the configuration's
    /// timeouts.
    pub fn new(config: Arc<ClientConfiguration>) -> DataProtectionResult<Self> {
        let http = HttpClient::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.read_timeout())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http, config })
    }

    /// Create a pipeline around a caller-supplied HTTP client.
    ///
    /// **Note:** the configuration's timeouts are ignored in this case.
    pub fn with_http_client(config: Arc<ClientConfiguration>, http: HttpClient) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &Arc<ClientConfiguration> {
        &self.config
    }

    /// Build the full URL for an ARM path, tagged with `api_version`.
    pub fn url(&self, path: &str, api_version: &str) -> DataProtectionResult<Url> {
        let mut url = self.config.url(path)?;
        url.query_pairs_mut()
            .append_pair(API_VERSION_PARAM, api_version);
        Ok(url)
    }

    /// Send a GET request.
    pub async fn get(&self, path: &str, api_version: &str) -> DataProtectionResult<Response> {
        let url = self.url(path, api_version)?;
        self.execute(self.http.request(Method::GET, url)).await
    }

    /// Send a GET request to an absolute URL, such as a `nextLink`, which
    /// already carries its `api-version`.
    pub async fn get_url(&self, url: Url) -> DataProtectionResult<Response> {
        self.execute(self.http.request(Method::GET, url)).await
    }

    /// Send a PUT request with a JSON body.
    pub async fn put<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        api_version: &str,
        body: &T,
    ) -> DataProtectionResult<Response> {
        let url = self.url(path, api_version)?;
        self.execute(self.http.request(Method::PUT, url).json(body))
            .await
    }

    /// Send a PATCH request with a JSON body.
    pub async fn patch<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        api_version: &str,
        body: &T,
    ) -> DataProtectionResult<Response> {
        let url = self.url(path, api_version)?;
        self.execute(self.http.request(Method::PATCH, url).json(body))
            .await
    }

    /// Send a POST request with a JSON body.
    pub async fn post<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        api_version: &str,
        body: &T,
    ) -> DataProtectionResult<Response> {
        let url = self.url(path, api_version)?;
        self.execute(self.http.request(Method::POST, url).json(body))
            .await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str, api_version: &str) -> DataProtectionResult<Response> {
        let url = self.url(path, api_version)?;
        self.execute(self.http.request(Method::DELETE, url)).await
    }

    async fn execute(&self, request: RequestBuilder) -> DataProtectionResult<Response> {
        let auth = self
            .config
            .authorization_policy()
            .authorization_header()
            .await?;

        let response = request.header(AUTHORIZATION, auth).send().await?;
        tracing::trace!(status = response.status().as_u16(), url = %response.url(), "response received");

        Self::check_response(response).await
    }

    /// Check the response status and return an error if not successful.
    async fn check_response(response: Response) -> DataProtectionResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        // ARM error envelope: {"error": {"code": "...", "message": "..."}}
        if let Ok(error) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(err_obj) = error.get("error") {
                return Err(DataProtectionError::Api {
                    code: err_obj
                        .get("code")
                        .and_then(|c| c.as_str())
                        .unwrap_or("unknown")
                        .to_string(),
                    message: truncate_message(
                        err_obj
                            .get("message")
                            .and_then(|m| m.as_str())
                            .unwrap_or(&body),
                    ),
                });
            }
        }

        Err(DataProtectionError::http(status, truncate_message(&body)))
    }
}

fn is_secret_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '"' | '\'' | ',' | '&')
}

/// Replace bearer tokens and SAS signatures with `[REDACTED]`.
pub(crate) fn sanitize_error_message(msg: &str) -> String {
    let mut result = msg.to_string();

    for marker in SECRET_MARKERS {
        let mut search_start = 0;
        while let Some(relative_pos) = result[search_start..].find(marker) {
            let value_start = search_start + relative_pos + marker.len();
            let value_end = result[value_start..]
                .find(is_secret_delimiter)
                .map(|pos| value_start + pos)
                .unwrap_or(result.len());

            if value_end > value_start && !result[value_start..].starts_with(REDACTED) {
                result.replace_range(value_start..value_end, REDACTED);
                search_start = value_start + REDACTED.len();
            } else {
                search_start = value_end;
            }
        }
    }

    result
}

/// Sanitize, then cap the message at [`MAX_ERROR_MESSAGE_LEN`] bytes.
pub(crate) fn truncate_message(msg: &str) -> String {
    let sanitized = sanitize_error_message(msg);

    if sanitized.len() <= MAX_ERROR_MESSAGE_LEN {
        return sanitized;
    }

    let mut end = MAX_ERROR_MESSAGE_LEN;
    while !sanitized.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &sanitized[..end])
}
