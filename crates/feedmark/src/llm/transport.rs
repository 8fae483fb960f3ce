//! Blocking JSON transport shared by the HTTP generators.
//!
//! Every failure on the wire surfaces as [`FeedmarkError::Generator`]; nothing
//! here retries.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{FeedmarkError, Result};

pub(super) struct Transport {
    client: Client,
    provider: &'static str,
    headers: HeaderMap,
}

impl Transport {
    pub(super) fn new(provider: &'static str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedmarkError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            client,
            provider,
            headers,
        })
    }

    /// Add a header sent with every request. Secrets are marked sensitive.
    pub(super) fn with_header(mut self, name: HeaderName, value: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(value).map_err(|e| {
            FeedmarkError::Config(format!("Invalid {} header for {}: {}", name, self.provider, e))
        })?;
        value.set_sensitive(true);
        self.headers.insert(name, value);
        Ok(self)
    }

    /// POST `body` to `url` and decode the JSON reply.
    pub(super) fn post<T: DeserializeOwned>(&self, url: &str, body: &Value) -> Result<T> {
        debug!(provider = self.provider, url, "posting feedback request");
        trace!(body = %body, "request body");

        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .map_err(|e| {
                let reason = if e.is_connect() {
                    "could not connect"
                } else if e.is_timeout() {
                    "timed out"
                } else {
                    "request failed"
                };
                FeedmarkError::Generator(format!("{} {}: {}", self.provider, reason, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(FeedmarkError::Generator(format!(
                "{} returned {}: {}",
                self.provider, status, detail
            )));
        }

        response.json::<T>().map_err(|e| {
            FeedmarkError::Generator(format!("{} sent an unreadable reply: {}", self.provider, e))
        })
    }
}

/// Environment variable holding a provider's API key.
pub(super) fn api_key_from_env(var: &str) -> Result<String> {
    std::env::var(var)
        .map_err(|_| FeedmarkError::Config(format!("{} environment variable not set", var)))
}
