//! Dashboard HTTP client for API interactions

use log::debug;
use reqwest::{Client, Url};
use std::time::Duration;

use crate::config::api;
use crate::error::{ProviderError, Result};

/// Goliat Dashboard API client
#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    token: String,
    base_url: String,
}

impl DashboardClient {
    /// Create a new client for the given backend URL
    ///
    /// The URL must be absolute `http` or `https`; a trailing `/` is dropped
    /// so endpoint paths can be appended directly.
    pub fn new(base_url: &str, token: String) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;

        let client = Client::builder()
            .user_agent(concat!(
                "terraform-provider-goliatdashboard/",
                env!("CARGO_PKG_VERSION")
            ))
            .connect_timeout(Duration::from_secs(api::CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(api::TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        debug!("Dashboard client targets {}", base_url);

        Ok(Self {
            client,
            token,
            base_url,
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API path
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Add standard headers to a request builder
    fn with_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
    }

    /// Create a GET request builder with standard headers
    pub(crate) fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.with_headers(self.client.get(url))
    }

    /// Create a PUT request builder with standard headers
    pub(crate) fn put(&self, url: &str) -> reqwest::RequestBuilder {
        self.with_headers(self.client.put(url))
    }

    /// Create a DELETE request builder with standard headers
    pub(crate) fn delete(&self, url: &str) -> reqwest::RequestBuilder {
        self.with_headers(self.client.delete(url))
    }

    /// Parse a list response, returning error for non-success status codes
    pub(crate) async fn parse_api_response<T>(
        &self,
        response: reqwest::Response,
        error_context: &str,
    ) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: format!("Failed to fetch {}: {}", error_context, body),
            });
        }
        let body = response.text().await?;
        debug!("Response for {}: {}", error_context, body);
        serde_json::from_str(&body).map_err(|e| {
            ProviderError::Json(format!("Failed to parse {}: {}", error_context, e))
        })
    }
}

/// Validate and normalize the configured backend URL
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| {
        ProviderError::config_attr("backend_url", format!("'{}' is not a valid URL: {}", raw, e))
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ProviderError::config_attr(
                "backend_url",
                format!("unsupported URL scheme '{}', expected http or https", other),
            ))
        }
    }

    if url.host_str().is_none() {
        return Err(ProviderError::config_attr(
            "backend_url",
            format!("'{}' has no host", raw),
        ));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
impl DashboardClient {
    /// Create a test client against a mock server
    pub fn test_client(base_url: &str) -> Self {
        Self::new(base_url, "test-token".to_string()).expect("mock server URL is valid")
    }
}
