#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use blackarrow_application::{GeoChain, SiteSession};
use blackarrow_core::error::{Result, SiteError};
use blackarrow_core::geo::GeoLookup;
use blackarrow_core::storage::KeyValueStore;

/// Scripted geolocation provider that counts its calls.
pub struct ScriptedGeo {
    name: &'static str,
    answer: Option<&'static str>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedGeo {
    pub fn country(name: &'static str, code: &'static str) -> Arc<Self> {
        Self::build(name, Some(code), Duration::ZERO)
    }

    pub fn failing(name: &'static str) -> Arc<Self> {
        Self::build(name, None, Duration::ZERO)
    }

    /// Answers only after `delay`, long enough to hit the chain timeout.
    pub fn stalled(name: &'static str, delay: Duration) -> Arc<Self> {
        Self::build(name, Some("GB"), delay)
    }

    fn build(name: &'static str, answer: Option<&'static str>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            name,
            answer,
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoLookup for ScriptedGeo {
    fn name(&self) -> &str {
        self.name
    }

    async fn lookup_country(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.answer
            .map(str::to_string)
            .ok_or_else(|| SiteError::geolocation(self.name, "service unavailable"))
    }
}

pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(3);

pub fn chain(providers: &[Arc<ScriptedGeo>]) -> GeoChain {
    providers.iter().fold(GeoChain::new(), |chain, provider| {
        chain.with_provider(provider.clone(), PROVIDER_TIMEOUT)
    })
}

pub fn session(durable: Arc<dyn KeyValueStore>, geo: GeoChain) -> SiteSession {
    SiteSession::builder()
        .with_durable_store(durable)
        .with_geo_chain(geo)
        .build()
        .expect("session should build")
}
