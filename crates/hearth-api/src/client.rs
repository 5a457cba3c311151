use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{status_message, RequestError};

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone)]
/// Public struct `ApiClientConfig` used across Hearth components.
pub struct ApiClientConfig {
    pub api_base: String,
    pub auth_token: Option<String>,
    pub request_timeout_ms: u64,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".to_string(),
            auth_token: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone)]
/// Uniform request/response wrapper over the household backend.
///
/// Requests leaving this client are already authenticated: the bearer token
/// supplied at construction rides along as a default header. Every call is a
/// single attempt; retry policy belongs to the caller.
pub struct ApiClient {
    http: reqwest::Client,
    api_base: String,
}

impl ApiClient {
    pub fn new(config: ApiClientConfig) -> Result<Self, RequestError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = config.auth_token.as_deref().map(str::trim) {
            if !token.is_empty() {
                let bearer = format!("Bearer {token}");
                let value = HeaderValue::from_str(&bearer)
                    .map_err(|error| RequestError::Config(format!("invalid auth token: {error}")))?;
                headers.insert(AUTHORIZATION, value);
            }
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .build()
            .map_err(|error| RequestError::Config(format!("failed to build http client: {error}")))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        self.request_json(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, RequestError> {
        self.request_json(Method::POST, path, body).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, RequestError> {
        self.request_json(Method::PUT, path, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), RequestError> {
        self.request(Method::DELETE, path, None).await?;
        Ok(())
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, RequestError> {
        let response = self.request(method, path, body).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(RequestError::Decode)
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, RequestError> {
        let url = format!("{}{path}", self.api_base);
        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RequestError::Status {
            status: status.as_u16(),
            message: status_message(status, &body),
        })
    }
}
