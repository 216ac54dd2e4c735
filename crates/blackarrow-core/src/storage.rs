//! Client storage abstraction.
//!
//! The site uses two stores with the same shape: a durable one (region,
//! theme, cookie consent) and a session-scoped one (service intent). Both are
//! plain string key-value maps; typed parsing happens in the coordinators.

use crate::error::Result;

/// Fixed storage keys. Only the coordinators write to these.
pub mod keys {
    /// Durable: region code (`UK` / `UAE` / `IND`).
    pub const REGION: &str = "blackarrow.region";
    /// Durable: theme (`light` / `dark`).
    pub const THEME: &str = "blackarrow.theme";
    /// Durable: JSON-encoded cookie decision.
    pub const COOKIE_CONSENT: &str = "blackarrow.cookie-consent";
    /// Session: last classified service intent.
    pub const SERVICE_INTENT: &str = "blackarrow.service-intent";
    /// Session: set once the newsletter popup has been dismissed.
    pub const NEWSLETTER_DISMISSED: &str = "blackarrow.newsletter-dismissed";
}

/// A string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Reads a key. `Ok(None)` means the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Reads a key, treating any storage failure as a missing value.
    fn get_or_absent(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("[Storage] Failed to read '{}', treating as absent: {}", key, e);
                None
            }
        }
    }
}
