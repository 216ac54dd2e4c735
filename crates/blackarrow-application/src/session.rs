//! Per-visit context that wires the coordinators together.
//!
//! Coordinators depend on each other in one direction only: consent and the
//! popup scheduler need the popup arbiter, the reminder banner needs the
//! region. [`SiteSessionBuilder::build`] creates them in that order.

use std::sync::Arc;
use std::time::Duration;

use blackarrow_core::config::{GeolocationSettings, SiteConfig};
use blackarrow_core::error::{Result, SiteError};
use blackarrow_core::intent::ReminderContent;
use blackarrow_core::overlay::PopupKind;
use blackarrow_core::storage::KeyValueStore;
use blackarrow_core::theme::ThemeMode;
use blackarrow_infrastructure::MemoryStore;
use blackarrow_infrastructure::geolocation::providers_from_config;
use tokio::task::JoinHandle;

use crate::consent_manager::CookieConsentManager;
use crate::intent_tracker::ServiceIntentTracker;
use crate::overlay_arbiter::{ModalArbiter, PopupArbiter};
use crate::popup_scheduler::{PopupScheduler, ScheduledPopup};
use crate::region_resolver::{ClientEnvironment, GeoChain, RegionResolver};
use crate::theme_service::ThemeService;

/// Everything one visitor's page needs, shared by clone.
#[derive(Clone)]
pub struct SiteSession {
    config: Arc<SiteConfig>,
    popups: PopupArbiter,
    modals: ModalArbiter,
    region: RegionResolver,
    theme: ThemeService,
    intent: ServiceIntentTracker,
    consent: CookieConsentManager,
    scheduler: PopupScheduler,
}

impl SiteSession {
    pub fn builder() -> SiteSessionBuilder {
        SiteSessionBuilder::new()
    }

    /// Starts region resolution. See [`RegionResolver::start`].
    pub fn start(&self, env: ClientEnvironment) -> Option<JoinHandle<()>> {
        self.region.start(env)
    }

    /// Schedules the newsletter popup with the configured delay.
    pub fn schedule_newsletter(&self) -> Option<ScheduledPopup> {
        let delay = Duration::from_secs(self.config.popups.newsletter_delay_secs);
        self.scheduler.schedule(PopupKind::Newsletter, delay)
    }

    /// Reminder banner copy in the current region's currency.
    pub fn reminder(&self) -> Option<ReminderContent> {
        self.intent.reminder(self.region.profile())
    }

    /// Cancels background work. Coordinators stay usable.
    pub fn shutdown(&self) {
        self.region.shutdown();
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn popups(&self) -> &PopupArbiter {
        &self.popups
    }

    pub fn modals(&self) -> &ModalArbiter {
        &self.modals
    }

    pub fn region(&self) -> &RegionResolver {
        &self.region
    }

    pub fn theme(&self) -> &ThemeService {
        &self.theme
    }

    pub fn intent(&self) -> &ServiceIntentTracker {
        &self.intent
    }

    pub fn consent(&self) -> &CookieConsentManager {
        &self.consent
    }

    pub fn scheduler(&self) -> &PopupScheduler {
        &self.scheduler
    }
}

/// Builder for [`SiteSession`].
///
/// Only the durable store is required. Session storage defaults to an
/// in-memory store and the geolocation chain is built from the config.
#[derive(Default)]
pub struct SiteSessionBuilder {
    durable: Option<Arc<dyn KeyValueStore>>,
    session: Option<Arc<dyn KeyValueStore>>,
    geo: Option<GeoChain>,
    config: Option<SiteConfig>,
    system_theme: Option<ThemeMode>,
}

impl SiteSessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that outlives the visit (region, theme, consent).
    pub fn with_durable_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.durable = Some(store);
        self
    }

    /// Storage scoped to the visit (service intent, dismissals).
    pub fn with_session_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.session = Some(store);
        self
    }

    /// Overrides the geolocation providers from the config.
    pub fn with_geo_chain(mut self, geo: GeoChain) -> Self {
        self.geo = Some(geo);
        self
    }

    pub fn with_config(mut self, config: SiteConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Host color scheme at mount. Defaults to light.
    pub fn with_system_theme(mut self, mode: ThemeMode) -> Self {
        self.system_theme = Some(mode);
        self
    }

    /// # Errors
    ///
    /// Returns [`SiteError::Config`] if no durable store was provided.
    pub fn build(self) -> Result<SiteSession> {
        let durable = self
            .durable
            .ok_or_else(|| SiteError::config("durable store not set"))?;
        let session: Arc<dyn KeyValueStore> = match self.session {
            Some(store) => store,
            None => Arc::new(MemoryStore::new()),
        };
        let config = self.config.unwrap_or_default();
        let geo = self
            .geo
            .unwrap_or_else(|| geo_chain_from_settings(&config.geolocation));

        let popups = PopupArbiter::popups();
        let modals = ModalArbiter::modals();
        let region = RegionResolver::new(Arc::clone(&durable), geo, &config.region);
        let theme = ThemeService::new(Arc::clone(&durable), self.system_theme.unwrap_or_default());
        let intent = ServiceIntentTracker::new(Arc::clone(&session));
        let consent = CookieConsentManager::new(durable, popups.clone());
        let scheduler = PopupScheduler::new(popups.clone(), session);

        tracing::debug!("[SiteSession] Session ready");

        Ok(SiteSession {
            config: Arc::new(config),
            popups,
            modals,
            region,
            theme,
            intent,
            consent,
            scheduler,
        })
    }
}

/// HTTP providers from config, or an empty chain when geolocation is off.
pub fn geo_chain_from_settings(settings: &GeolocationSettings) -> GeoChain {
    if !settings.enabled {
        tracing::debug!("[SiteSession] Geolocation disabled");
        return GeoChain::new();
    }

    providers_from_config(&settings.providers)
        .into_iter()
        .fold(GeoChain::new(), |chain, provider| {
            let timeout = provider.timeout();
            chain.with_provider(Arc::new(provider), timeout)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackarrow_core::region::{Region, RegionSelection};
    use blackarrow_core::storage::keys;

    #[test]
    fn test_build_requires_durable_store() {
        let err = SiteSession::builder().build().err().unwrap();
        assert!(err.is_config());
    }

    #[test]
    fn test_geo_chain_follows_settings() {
        let settings = GeolocationSettings::default();
        assert_eq!(geo_chain_from_settings(&settings).len(), 2);

        let disabled = GeolocationSettings {
            enabled: false,
            ..GeolocationSettings::default()
        };
        assert!(geo_chain_from_settings(&disabled).is_empty());
    }

    #[tokio::test]
    async fn test_session_restores_durable_state() {
        let durable = Arc::new(MemoryStore::with_entries([
            (keys::REGION, "UAE"),
            (keys::THEME, "dark"),
        ]));
        let session = SiteSession::builder()
            .with_durable_store(durable)
            .with_geo_chain(GeoChain::new())
            .build()
            .unwrap();

        assert!(session.start(ClientEnvironment::new("blackarrowtechnologies.com", "UTC")).is_none());
        assert_eq!(session.region().current(), RegionSelection::explicit(Region::Uae));
        assert_eq!(session.theme().current(), ThemeMode::Dark);
        assert!(session.consent().needs_prompt());
    }

    #[tokio::test]
    async fn test_reminder_uses_resolved_region() {
        let session = SiteSession::builder()
            .with_durable_store(Arc::new(MemoryStore::new()))
            .with_geo_chain(GeoChain::new())
            .build()
            .unwrap();

        session.region().set_region(Region::Ind);
        session.intent().navigate("/custom-web-app");
        assert!(session.reminder().is_none());

        session.intent().navigate("/about");
        let reminder = session.reminder().unwrap();
        assert!(reminder.subtitle.contains("₹2,49,999"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_newsletter_and_consent_share_popup_slot() {
        let session = SiteSession::builder()
            .with_durable_store(Arc::new(MemoryStore::new()))
            .with_geo_chain(GeoChain::new())
            .build()
            .unwrap();

        assert!(session.consent().prompt());
        let newsletter = session.schedule_newsletter().unwrap();
        assert!(!newsletter.outcome().await);

        session.consent().accept_all().unwrap();
        assert_eq!(session.popups().active(), None);
    }
}
