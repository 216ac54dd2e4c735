//! Cookie consent domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A visitor's cookie decision, stored as JSON in durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieConsent {
    /// Strictly necessary cookies cannot be refused.
    #[serde(default = "always_true")]
    pub necessary: bool,
    #[serde(default)]
    pub analytics: bool,
    #[serde(default)]
    pub marketing: bool,
    pub decided_at: DateTime<Utc>,
}

fn always_true() -> bool {
    true
}

impl CookieConsent {
    pub fn new(analytics: bool, marketing: bool) -> Self {
        Self {
            necessary: true,
            analytics,
            marketing,
            decided_at: Utc::now(),
        }
    }

    pub fn accept_all() -> Self {
        Self::new(true, true)
    }

    pub fn necessary_only() -> Self {
        Self::new(false, false)
    }

    /// Parses a stored decision. Malformed JSON is "no decision yet".
    pub fn from_stored(raw: &str) -> Option<Self> {
        serde_json::from_str::<CookieConsent>(raw)
            .ok()
            .map(|consent| Self {
                necessary: true,
                ..consent
            })
    }

    pub fn to_stored(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
