//! Session-scoped service intent tracking.

use std::sync::Arc;

use blackarrow_core::intent::{self, IntentSnapshot, ReminderContent, ServiceIntent};
use blackarrow_core::region::RegionProfile;
use blackarrow_core::storage::{KeyValueStore, keys};
use tokio::sync::watch;

/// Remembers which product flow the visitor was in.
///
/// Fed with every navigation path. The stored intent lives in session
/// storage, so it survives reloads but not the end of the session.
#[derive(Clone)]
pub struct ServiceIntentTracker {
    state: Arc<watch::Sender<IntentSnapshot>>,
    session: Arc<dyn KeyValueStore>,
}

impl ServiceIntentTracker {
    /// Creates a tracker, restoring any intent stored earlier this session.
    pub fn new(session: Arc<dyn KeyValueStore>) -> Self {
        let stored = session
            .get_or_absent(keys::SERVICE_INTENT)
            .and_then(|raw| ServiceIntent::parse(&raw));
        let (state, _) = watch::channel(intent::snapshot(stored, "/"));

        Self {
            state: Arc::new(state),
            session,
        }
    }

    /// Handles a navigation to `path` and returns the new snapshot.
    pub fn navigate(&self, path: &str) -> IntentSnapshot {
        let stored = self.last_visited_service();
        let next = intent::next_intent(stored, path);

        if next != stored
            && let Some(intent) = next
        {
            tracing::debug!("[ServiceIntentTracker] Intent {} from {}", intent, path);
            if let Err(e) = self.session.set(keys::SERVICE_INTENT, intent.as_str()) {
                tracing::warn!("[ServiceIntentTracker] Failed to store intent: {}", e);
            }
        }

        let snapshot = intent::snapshot(next, path);
        self.state.send_replace(snapshot.clone());
        snapshot
    }

    /// Forgets the intent, e.g. once the visitor has requested a quote.
    pub fn clear(&self) {
        if let Err(e) = self.session.remove(keys::SERVICE_INTENT) {
            tracing::warn!("[ServiceIntentTracker] Failed to clear intent: {}", e);
        }
        self.state.send_modify(|snapshot| {
            *snapshot = intent::snapshot(None, &snapshot.current_path);
        });
    }

    pub fn snapshot(&self) -> IntentSnapshot {
        self.state.borrow().clone()
    }

    pub fn last_visited_service(&self) -> Option<ServiceIntent> {
        self.state.borrow().last_visited_service
    }

    pub fn should_show_reminder(&self) -> bool {
        self.state.borrow().should_show_reminder
    }

    pub fn should_show_service_bar(&self) -> bool {
        self.state.borrow().should_show_service_bar
    }

    /// Banner copy when the reminder should be showing.
    pub fn reminder(&self, profile: &RegionProfile) -> Option<ReminderContent> {
        let snapshot = self.state.borrow();
        match snapshot.last_visited_service {
            Some(intent) if snapshot.should_show_reminder => {
                Some(ReminderContent::for_intent(intent, profile))
            }
            _ => None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<IntentSnapshot> {
        self.state.subscribe()
    }
}
