//! Cookie consent decisions.

use std::sync::Arc;

use blackarrow_core::consent::CookieConsent;
use blackarrow_core::error::Result;
use blackarrow_core::overlay::PopupKind;
use blackarrow_core::storage::{KeyValueStore, keys};
use tokio::sync::watch;

use crate::overlay_arbiter::PopupArbiter;

/// Holds the visitor's cookie decision and drives the consent popup.
#[derive(Clone)]
pub struct CookieConsentManager {
    state: Arc<watch::Sender<Option<CookieConsent>>>,
    durable: Arc<dyn KeyValueStore>,
    popups: PopupArbiter,
}

impl CookieConsentManager {
    pub fn new(durable: Arc<dyn KeyValueStore>, popups: PopupArbiter) -> Self {
        let stored = durable
            .get_or_absent(keys::COOKIE_CONSENT)
            .and_then(|raw| CookieConsent::from_stored(&raw));
        let (state, _) = watch::channel(stored);

        Self {
            state: Arc::new(state),
            durable,
            popups,
        }
    }

    pub fn current(&self) -> Option<CookieConsent> {
        self.state.borrow().clone()
    }

    /// True until the visitor has made a decision.
    pub fn needs_prompt(&self) -> bool {
        self.state.borrow().is_none()
    }

    /// Shows the consent popup if a decision is needed and no other popup is
    /// visible. Returns whether the popup is showing.
    pub fn prompt(&self) -> bool {
        if !self.needs_prompt() {
            return false;
        }
        self.popups.request_activation(PopupKind::CookieConsent)
    }

    pub fn accept_all(&self) -> Result<CookieConsent> {
        self.record(CookieConsent::accept_all())
    }

    /// Keeps only strictly necessary cookies.
    pub fn reject_optional(&self) -> Result<CookieConsent> {
        self.record(CookieConsent::necessary_only())
    }

    pub fn save(&self, analytics: bool, marketing: bool) -> Result<CookieConsent> {
        self.record(CookieConsent::new(analytics, marketing))
    }

    pub fn analytics_allowed(&self) -> bool {
        self.state
            .borrow()
            .as_ref()
            .is_some_and(|consent| consent.analytics)
    }

    pub fn marketing_allowed(&self) -> bool {
        self.state
            .borrow()
            .as_ref()
            .is_some_and(|consent| consent.marketing)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<CookieConsent>> {
        self.state.subscribe()
    }

    /// Applies a decision. Storage failures are logged and the decision
    /// still holds for this visit; only encoding errors are returned.
    fn record(&self, consent: CookieConsent) -> Result<CookieConsent> {
        let raw = consent.to_stored()?;
        if let Err(e) = self.durable.set(keys::COOKIE_CONSENT, &raw) {
            tracing::warn!("[CookieConsentManager] Failed to persist consent: {}", e);
        }
        self.state.send_replace(Some(consent.clone()));
        self.popups.release(PopupKind::CookieConsent);

        tracing::info!(
            "[CookieConsentManager] Consent saved (analytics: {}, marketing: {})",
            consent.analytics,
            consent.marketing
        );
        Ok(consent)
    }
}
