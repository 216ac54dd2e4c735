//! Region resolution and persistence.
//!
//! The resolver walks an ordered list of steps and stops at the first one
//! that yields a region:
//!
//! 1. regional subdomain of the serving hostname
//! 2. stored preference
//! 3. IP geolocation (primary provider, then one fallback)
//! 4. timezone heuristic (always yields, defaulting to UK)
//!
//! Steps 1-2 are synchronous and run before first render. Steps 3-4 run in a
//! background task; the UI shows the default region until they finish.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use blackarrow_core::config::RegionSettings;
use blackarrow_core::geo::GeoLookup;
use blackarrow_core::region::{
    Region, RegionOutcome, RegionProfile, RegionSelection, RegionSource, region_for_country,
    region_for_hostname, region_for_timezone,
};
use blackarrow_core::storage::{KeyValueStore, keys};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// What the host environment tells us about the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientEnvironment {
    /// Serving hostname, e.g. `uae.blackarrowtechnologies.com`.
    pub hostname: String,
    /// Resolved IANA timezone, e.g. `Asia/Kolkata`.
    pub timezone: String,
}

impl ClientEnvironment {
    pub fn new(hostname: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            timezone: timezone.into(),
        }
    }
}

/// Ordered geolocation providers, each with its own timeout.
#[derive(Clone, Default)]
pub struct GeoChain {
    providers: Vec<(Arc<dyn GeoLookup>, Duration)>,
}

impl GeoChain {
    /// A primary and exactly one fallback.
    pub const MAX_PROVIDERS: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a provider. Providers beyond [`Self::MAX_PROVIDERS`] are ignored.
    pub fn with_provider(mut self, provider: Arc<dyn GeoLookup>, timeout: Duration) -> Self {
        if self.providers.len() >= Self::MAX_PROVIDERS {
            tracing::warn!(
                "[RegionResolver] Ignoring extra geolocation provider '{}'",
                provider.name()
            );
            return self;
        }
        self.providers.push((provider, timeout));
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Asks each provider in turn until one reports a country.
    ///
    /// Errors and timeouts move on to the next provider. A country that
    /// maps to no region ends the step: the fallback would report the same
    /// place.
    pub async fn lookup_region(&self) -> Option<Region> {
        for (provider, timeout) in &self.providers {
            match tokio::time::timeout(*timeout, provider.lookup_country()).await {
                Ok(Ok(country)) => {
                    let region = region_for_country(&country);
                    tracing::debug!(
                        "[RegionResolver] {} reported {} -> {:?}",
                        provider.name(),
                        country,
                        region
                    );
                    return region;
                }
                Ok(Err(e)) => {
                    tracing::debug!("[RegionResolver] {} failed: {}", provider.name(), e);
                }
                Err(_) => {
                    tracing::debug!(
                        "[RegionResolver] {} timed out after {:?}",
                        provider.name(),
                        timeout
                    );
                }
            }
        }
        None
    }
}

/// One link of the resolution chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStep {
    Hostname,
    StoredPreference,
    Geolocation,
    Timezone,
}

impl ResolutionStep {
    /// Steps that can answer before first render.
    pub const IMMEDIATE: [ResolutionStep; 2] =
        [ResolutionStep::Hostname, ResolutionStep::StoredPreference];

    /// Steps that may wait on the network.
    pub const DEFERRED: [ResolutionStep; 2] =
        [ResolutionStep::Geolocation, ResolutionStep::Timezone];
}

/// Everything the steps read. Shared with the background task.
struct StepInputs {
    durable: Arc<dyn KeyValueStore>,
    geo: GeoChain,
    subdomains: BTreeMap<String, Region>,
}

impl StepInputs {
    /// Steps that never wait. Returns `None` for deferred-only steps.
    fn attempt_now(&self, step: ResolutionStep, env: &ClientEnvironment) -> Option<RegionOutcome> {
        match step {
            ResolutionStep::Hostname => region_for_hostname(&env.hostname, &self.subdomains)
                .map(|region| RegionOutcome::new(region, RegionSource::Hostname)),
            ResolutionStep::StoredPreference => self
                .durable
                .get_or_absent(keys::REGION)
                .and_then(|raw| Region::parse(&raw))
                .map(|region| RegionOutcome::new(region, RegionSource::StoredPreference)),
            ResolutionStep::Timezone => Some(RegionOutcome::new(
                region_for_timezone(&env.timezone),
                RegionSource::Timezone,
            )),
            ResolutionStep::Geolocation => None,
        }
    }

    async fn attempt(&self, step: ResolutionStep, env: &ClientEnvironment) -> Option<RegionOutcome> {
        let outcome = match step {
            ResolutionStep::Geolocation => self
                .geo
                .lookup_region()
                .await
                .map(|region| RegionOutcome::new(region, RegionSource::Geolocation)),
            _ => self.attempt_now(step, env),
        };

        if outcome.is_none() {
            tracing::trace!("[RegionResolver] {:?} gave no answer", step);
        }
        outcome
    }

    fn run_now(&self, steps: &[ResolutionStep], env: &ClientEnvironment) -> Option<RegionOutcome> {
        steps.iter().find_map(|step| self.attempt_now(*step, env))
    }

    async fn run(&self, steps: &[ResolutionStep], env: &ClientEnvironment) -> Option<RegionOutcome> {
        for step in steps {
            if let Some(outcome) = self.attempt(*step, env).await {
                return Some(outcome);
            }
        }
        None
    }
}

struct Inner {
    state: watch::Sender<RegionSelection>,
    inputs: Arc<StepInputs>,
    /// Token of the in-flight background detection, if any. Results are
    /// applied while holding this lock so that cancellation and application
    /// cannot interleave.
    detection: Mutex<Option<CancellationToken>>,
}

impl Inner {
    fn apply(&self, outcome: RegionOutcome) {
        let selection = outcome.selection();
        self.state.send_replace(selection);
        tracing::info!(
            "[RegionResolver] Region {} from {:?} (auto-detected: {})",
            selection.code,
            outcome.source,
            selection.is_auto_detected
        );

        if outcome.source.persists()
            && let Err(e) = self.inputs.durable.set(keys::REGION, outcome.region.code())
        {
            tracing::warn!("[RegionResolver] Failed to persist region: {}", e);
        }
    }

    fn cancel_detection(&self, slot: &mut Option<CancellationToken>) {
        if let Some(token) = slot.take() {
            token.cancel();
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let slot = self.detection.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = slot.take() {
            token.cancel();
        }
    }
}

/// Owns the visitor's [`RegionSelection`].
///
/// Clones share state. Dropping the last clone (or calling
/// [`RegionResolver::shutdown`]) discards any detection still in flight.
#[derive(Clone)]
pub struct RegionResolver {
    inner: Arc<Inner>,
}

impl RegionResolver {
    pub fn new(durable: Arc<dyn KeyValueStore>, geo: GeoChain, settings: &RegionSettings) -> Self {
        let (state, _) = watch::channel(RegionSelection::explicit(settings.default_region));
        Self {
            inner: Arc::new(Inner {
                state,
                inputs: Arc::new(StepInputs {
                    durable,
                    geo,
                    subdomains: settings.subdomains.clone(),
                }),
                detection: Mutex::new(None),
            }),
        }
    }

    /// Starts resolution for a page load.
    ///
    /// Hostname and stored preference are checked inline. If neither
    /// answers, geolocation and the timezone fallback run in a spawned task
    /// and the returned handle completes when that task does. Must be called
    /// inside a Tokio runtime.
    pub fn start(&self, env: ClientEnvironment) -> Option<JoinHandle<()>> {
        let mut slot = self.lock_detection();
        self.inner.cancel_detection(&mut slot);

        if let Some(outcome) = self
            .inner
            .inputs
            .run_now(&ResolutionStep::IMMEDIATE, &env)
        {
            self.inner.apply(outcome);
            return None;
        }

        let token = CancellationToken::new();
        *slot = Some(token.clone());
        drop(slot);

        let inputs = Arc::clone(&self.inner.inputs);
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);

        Some(tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => None,
                outcome = inputs.run(&ResolutionStep::DEFERRED, &env) => outcome,
            };

            let Some(outcome) = outcome else {
                tracing::debug!("[RegionResolver] Detection cancelled");
                return;
            };
            let Some(inner) = weak.upgrade() else {
                tracing::debug!("[RegionResolver] Resolver dropped, discarding {:?}", outcome);
                return;
            };

            let mut slot = inner.detection.lock().unwrap_or_else(PoisonError::into_inner);
            if token.is_cancelled() {
                tracing::debug!("[RegionResolver] Discarding late result {:?}", outcome);
                return;
            }
            slot.take();
            inner.apply(outcome);
        }))
    }

    /// Runs the whole chain to completion and applies the result.
    ///
    /// Registers as the in-flight detection, so a [`Self::set_region`] or
    /// [`Self::shutdown`] while it waits discards its result. Returns the
    /// selection current at completion.
    pub async fn resolve(&self, env: &ClientEnvironment) -> RegionSelection {
        let token = CancellationToken::new();
        {
            let mut slot = self.lock_detection();
            self.inner.cancel_detection(&mut slot);
            *slot = Some(token.clone());
        }

        let steps = ResolutionStep::IMMEDIATE
            .into_iter()
            .chain(ResolutionStep::DEFERRED)
            .collect::<Vec<_>>();

        let outcome = tokio::select! {
            _ = token.cancelled() => None,
            outcome = self.inner.inputs.run(&steps, env) => outcome,
        };

        {
            let mut slot = self.lock_detection();
            if token.is_cancelled() {
                tracing::debug!("[RegionResolver] Discarding superseded result {:?}", outcome);
            } else {
                slot.take();
                if let Some(outcome) = outcome {
                    self.inner.apply(outcome);
                }
            }
        }
        self.current()
    }

    /// Explicit choice from a region switcher.
    ///
    /// Bypasses the chain, cancels any pending detection, clears the
    /// auto-detected flag and persists unconditionally.
    pub fn set_region(&self, region: Region) {
        let mut slot = self.lock_detection();
        self.inner.cancel_detection(&mut slot);
        self.inner
            .apply(RegionOutcome::new(region, RegionSource::UserSelection));
    }

    /// Cancels pending detection without changing the region.
    pub fn shutdown(&self) {
        let mut slot = self.lock_detection();
        self.inner.cancel_detection(&mut slot);
    }

    pub fn current(&self) -> RegionSelection {
        *self.inner.state.borrow()
    }

    /// Localized details for the current region.
    pub fn profile(&self) -> &'static RegionProfile {
        RegionProfile::for_region(self.current().code)
    }

    pub fn subscribe(&self) -> watch::Receiver<RegionSelection> {
        self.inner.state.subscribe()
    }

    /// Whether a background detection is still running.
    pub fn is_detecting(&self) -> bool {
        self.lock_detection().is_some()
    }

    fn lock_detection(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.inner
            .detection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use blackarrow_core::error::{Result, SiteError};
    use blackarrow_infrastructure::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeLookup {
        name: &'static str,
        answer: Option<&'static str>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl FakeLookup {
        fn new(name: &'static str, answer: Option<&'static str>, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                name,
                answer,
                delay,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl GeoLookup for FakeLookup {
        fn name(&self) -> &str {
            self.name
        }

        async fn lookup_country(&self) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.answer
                .map(str::to_string)
                .ok_or_else(|| SiteError::geolocation(self.name, "unavailable"))
        }
    }

    fn resolver(durable: Arc<MemoryStore>, geo: GeoChain) -> RegionResolver {
        RegionResolver::new(durable, geo, &RegionSettings::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_chain_falls_back_after_timeout() {
        let slow = FakeLookup::new("slow", Some("GB"), Duration::from_secs(10));
        let backup = FakeLookup::new("backup", Some("IN"), Duration::from_millis(50));
        let chain = GeoChain::new()
            .with_provider(slow.clone(), Duration::from_secs(3))
            .with_provider(backup.clone(), Duration::from_secs(3));

        assert_eq!(chain.lookup_region().await, Some(Region::Ind));
        assert_eq!(slow.calls.load(Ordering::SeqCst), 1);
        assert_eq!(backup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_chain_stops_on_unmapped_country() {
        let primary = FakeLookup::new("primary", Some("US"), Duration::ZERO);
        let backup = FakeLookup::new("backup", Some("AE"), Duration::ZERO);
        let chain = GeoChain::new()
            .with_provider(primary.clone(), Duration::from_secs(1))
            .with_provider(backup.clone(), Duration::from_secs(1));

        assert_eq!(chain.lookup_region().await, None);
        assert_eq!(backup.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_chain_caps_providers() {
        let chain = GeoChain::new()
            .with_provider(FakeLookup::new("a", None, Duration::ZERO), Duration::from_secs(1))
            .with_provider(FakeLookup::new("b", None, Duration::ZERO), Duration::from_secs(1))
            .with_provider(FakeLookup::new("c", None, Duration::ZERO), Duration::from_secs(1));
        assert_eq!(chain.len(), GeoChain::MAX_PROVIDERS);
    }

    #[tokio::test]
    async fn test_start_resolves_stored_preference_inline() {
        let durable = Arc::new(MemoryStore::with_entries([(keys::REGION, "IND")]));
        let resolver = resolver(durable, GeoChain::new());

        let handle = resolver.start(ClientEnvironment::new("blackarrowtechnologies.com", "Europe/London"));
        assert!(handle.is_none());
        assert_eq!(resolver.current(), RegionSelection::explicit(Region::Ind));
    }

    #[tokio::test]
    async fn test_default_visible_until_detection_finishes() {
        let durable = Arc::new(MemoryStore::new());
        let geo = GeoChain::new().with_provider(
            FakeLookup::new("geo", Some("AE"), Duration::from_millis(20)),
            Duration::from_secs(3),
        );
        let resolver = resolver(durable.clone(), geo);

        let handle = resolver
            .start(ClientEnvironment::new("blackarrowtechnologies.com", "Europe/London"))
            .expect("detection should run in the background");
        assert_eq!(resolver.current(), RegionSelection::explicit(Region::Uk));
        assert!(resolver.is_detecting());

        handle.await.unwrap();
        assert_eq!(resolver.current(), RegionSelection::auto_detected(Region::Uae));
        assert!(!resolver.is_detecting());
        assert_eq!(durable.get_or_absent(keys::REGION), Some("UAE".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_region_discards_pending_detection() {
        let durable = Arc::new(MemoryStore::new());
        let geo = GeoChain::new().with_provider(
            FakeLookup::new("geo", Some("AE"), Duration::from_secs(1)),
            Duration::from_secs(3),
        );
        let resolver = resolver(durable.clone(), geo);

        let handle = resolver
            .start(ClientEnvironment::new("blackarrowtechnologies.com", "Asia/Dubai"))
            .unwrap();
        resolver.set_region(Region::Ind);
        handle.await.unwrap();

        assert_eq!(resolver.current(), RegionSelection::explicit(Region::Ind));
        assert_eq!(durable.get_or_absent(keys::REGION), Some("IND".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_region_during_resolve_wins() {
        let durable = Arc::new(MemoryStore::new());
        let geo = GeoChain::new().with_provider(
            FakeLookup::new("geo", Some("GB"), Duration::from_secs(1)),
            Duration::from_secs(3),
        );
        let resolver = resolver(durable.clone(), geo);

        let pending = tokio::spawn({
            let resolver = resolver.clone();
            async move {
                resolver
                    .resolve(&ClientEnvironment::new("blackarrowtechnologies.com", "Europe/London"))
                    .await
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(resolver.is_detecting());
        resolver.set_region(Region::Ind);

        assert_eq!(pending.await.unwrap(), RegionSelection::explicit(Region::Ind));
        assert_eq!(resolver.current(), RegionSelection::explicit(Region::Ind));
        assert!(!resolver.is_detecting());
        assert_eq!(durable.get_or_absent(keys::REGION), Some("IND".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_resolver_discards_result() {
        let durable = Arc::new(MemoryStore::new());
        let geo = GeoChain::new().with_provider(
            FakeLookup::new("geo", Some("AE"), Duration::from_secs(1)),
            Duration::from_secs(3),
        );
        let resolver = resolver(durable.clone(), geo);

        let handle = resolver
            .start(ClientEnvironment::new("blackarrowtechnologies.com", "Asia/Dubai"))
            .unwrap();
        drop(resolver);
        handle.await.unwrap();

        assert_eq!(durable.get_or_absent(keys::REGION), None);
    }
}
