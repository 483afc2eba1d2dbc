use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::catalog::Verb;
use crate::error::{ConnectorError, Result};

/// Thin wrapper over one authenticated invocation against the WTS API.
/// Holds no state beyond the credential; every call is independent.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api-test.helena.run";

    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        self.send(Verb::Get, path, query, None).await
    }

    /// Issues exactly one request. Non-2xx statuses and transport failures
    /// both surface as `ApiRequest` with the upstream message preserved.
    pub async fn send(
        &self,
        verb: Verb,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = match verb {
            Verb::Get => self.http.get(&url),
            Verb::Post => self.http.post(&url),
            Verb::Put => self.http.put(&url),
        }
        .header(ACCEPT, "application/json")
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {}", self.token));

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(?verb, %url, "request built");

        let response = request.send().await.map_err(ConnectorError::api)?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.trim().is_empty() {
                format!("request failed with status {}", status.as_u16())
            } else {
                format!("request failed with status {}: {}", status.as_u16(), text.trim())
            };
            tracing::debug!(status = status.as_u16(), "error response");
            return Err(ConnectorError::ApiRequest(message));
        }

        let data = response
            .json::<Value>()
            .await
            .map_err(ConnectorError::api)?;
        tracing::debug!(status = status.as_u16(), "response received");
        Ok(data)
    }
}
