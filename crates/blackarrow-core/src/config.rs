//! Site configuration model.
//!
//! Loaded from `site.toml`; every section and field has a default so a
//! missing file or a partial file yields a working configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::region::{Region, default_subdomains};

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub region: RegionSettings,
    pub geolocation: GeolocationSettings,
    pub popups: PopupSettings,
    pub logging: LoggingSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RegionSettings {
    /// Region shown before resolution completes.
    pub default_region: Region,
    /// First DNS label → region, e.g. `uae = "UAE"`.
    pub subdomains: BTreeMap<String, Region>,
}

impl Default for RegionSettings {
    fn default() -> Self {
        Self {
            default_region: Region::Uk,
            subdomains: default_subdomains(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeolocationSettings {
    pub enabled: bool,
    /// Tried in order: the first is the primary, the second the fallback.
    pub providers: Vec<GeoProviderConfig>,
}

impl Default for GeolocationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            providers: vec![
                GeoProviderConfig {
                    name: "ipapi".to_string(),
                    url: "https://ipapi.co/json/".to_string(),
                    country_field: "country_code".to_string(),
                    timeout_ms: 3_000,
                },
                GeoProviderConfig {
                    name: "ipwho".to_string(),
                    url: "https://ipwho.is/".to_string(),
                    country_field: "country_code".to_string(),
                    timeout_ms: 3_000,
                },
            ],
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GeoProviderConfig {
    pub name: String,
    pub url: String,
    /// Top-level JSON field holding the ISO country code.
    #[serde(default = "default_country_field")]
    pub country_field: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_country_field() -> String {
    "country_code".to_string()
}

fn default_timeout_ms() -> u64 {
    3_000
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PopupSettings {
    /// Delay before the newsletter popup first asks for the slot.
    pub newsletter_delay_secs: u64,
}

impl Default for PopupSettings {
    fn default() -> Self {
        Self {
            newsletter_delay_secs: 15,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
