use crate::config::StoreCredentials;
use crate::error::StoreError;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Low-level PostgREST client for the call-log table.
///
/// Cheaply cloneable and safe to share across concurrent save/fetch
/// operations; `reqwest::Client` pools connections internally. All failures
/// are reduced to an `"HTTP {status}: {body}"` detail string and classified
/// by [`StoreError::from_detail`], so the status digits carry the
/// 502/503/504/525 transient signal and the body carries PGRST204.
#[derive(Debug, Clone)]
pub struct Store {
    client: Client,
    creds: StoreCredentials,
}

impl Store {
    pub fn new(creds: StoreCredentials) -> Self {
        Self {
            client: Client::new(),
            creds,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.creds.url, self.creds.table)
    }

    /// Insert one row, returning the inserted representation on success.
    pub async fn insert(&self, payload: &Value) -> Result<Value, StoreError> {
        let response = self
            .client
            .post(self.table_url())
            .header("apikey", &self.creds.api_key)
            .header("Authorization", format!("Bearer {}", self.creds.api_key))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=representation")
            .timeout(Duration::from_secs(self.creds.timeout_seconds))
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        Ok(response.json::<Value>().await?)
    }

    /// Select rows with the given PostgREST query parameters.
    pub async fn select(&self, params: &[(&str, &str)]) -> Result<Vec<Value>, StoreError> {
        let response = self
            .client
            .get(self.table_url())
            .query(params)
            .header("apikey", &self.creds.api_key)
            .header("Authorization", format!("Bearer {}", self.creds.api_key))
            .timeout(Duration::from_secs(self.creds.timeout_seconds))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        Ok(response.json::<Vec<Value>>().await?)
    }

    async fn response_error(response: reqwest::Response) -> StoreError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unreadable response body".to_string());
        StoreError::from_detail(format!("HTTP {}: {}", status.as_u16(), body))
    }
}
