//! HTTP geolocation providers.
//!
//! Each provider is a JSON endpoint that answers with the caller's country
//! code in a top-level field (`country_code` for ipapi.co and ipwho.is).

use std::time::Duration;

use async_trait::async_trait;
use blackarrow_core::config::GeoProviderConfig;
use blackarrow_core::error::{Result, SiteError};
use blackarrow_core::geo::GeoLookup;
use reqwest::Client;
use serde_json::Value;

/// A geolocation provider reached over HTTP(S).
#[derive(Clone)]
pub struct HttpGeoLookup {
    client: Client,
    name: String,
    url: String,
    country_field: String,
    timeout: Duration,
}

impl HttpGeoLookup {
    /// Builds a provider from its config entry.
    ///
    /// The client carries the provider's timeout as well, so a stalled
    /// connection is torn down even if the caller's own timer is dropped.
    pub fn from_config(config: &GeoProviderConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SiteError::geolocation(&config.name, format!("client build failed: {e}")))?;

        Ok(Self {
            client,
            name: config.name.clone(),
            url: config.url.clone(),
            country_field: config.country_field.clone(),
            timeout,
        })
    }

    /// Per-request timeout from the config entry.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self) -> Result<Value> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| SiteError::geolocation(&self.name, format!("request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(SiteError::geolocation(
                &self.name,
                format!("unexpected status {}", response.status()),
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| SiteError::geolocation(&self.name, format!("invalid JSON: {err}")))
    }
}

#[async_trait]
impl GeoLookup for HttpGeoLookup {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup_country(&self) -> Result<String> {
        let payload = self.fetch().await?;
        extract_country(&payload, &self.country_field).ok_or_else(|| {
            SiteError::geolocation(
                &self.name,
                format!("response has no usable '{}' field", self.country_field),
            )
        })
    }
}

/// Pulls a two-letter country code out of a provider response.
///
/// Anything other than a two-letter ASCII string is "no result".
pub fn extract_country(payload: &Value, field: &str) -> Option<String> {
    let code = payload.get(field)?.as_str()?.trim();
    (code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| code.to_ascii_uppercase())
}

/// Builds every configured provider, skipping entries that fail to build.
pub fn providers_from_config(configs: &[GeoProviderConfig]) -> Vec<HttpGeoLookup> {
    configs
        .iter()
        .filter_map(|config| match HttpGeoLookup::from_config(config) {
            Ok(provider) => Some(provider),
            Err(e) => {
                tracing::warn!("[Geolocation] Skipping provider {}: {}", config.name, e);
                None
            }
        })
        .collect()
}
