//! Delayed popup triggers.
//!
//! Popups such as the newsletter fire on a timer rather than on a click.
//! The arbiter applies requests in call order, so the delay lives here with
//! the caller.

use std::sync::Arc;
use std::time::Duration;

use blackarrow_core::overlay::PopupKind;
use blackarrow_core::storage::{KeyValueStore, keys};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::overlay_arbiter::PopupArbiter;

/// A pending popup request. Dropping it cancels the request.
pub struct ScheduledPopup {
    kind: PopupKind,
    token: CancellationToken,
    handle: Option<JoinHandle<bool>>,
}

impl ScheduledPopup {
    pub fn kind(&self) -> PopupKind {
        self.kind
    }

    /// Cancels the request if it has not fired yet.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Waits for the timer and returns whether the popup got the slot.
    /// A cancelled request reports `false`.
    pub async fn outcome(mut self) -> bool {
        match self.handle.take() {
            Some(handle) => handle.await.unwrap_or(false),
            None => false,
        }
    }
}

impl Drop for ScheduledPopup {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.token.cancel();
        }
    }
}

/// Schedules popups against the shared popup arbiter.
#[derive(Clone)]
pub struct PopupScheduler {
    popups: PopupArbiter,
    session: Arc<dyn KeyValueStore>,
}

impl PopupScheduler {
    pub fn new(popups: PopupArbiter, session: Arc<dyn KeyValueStore>) -> Self {
        Self { popups, session }
    }

    /// Requests `kind` after `delay`.
    ///
    /// Returns `None` when the popup should not be shown at all this
    /// session. Must be called inside a Tokio runtime.
    pub fn schedule(&self, kind: PopupKind, delay: Duration) -> Option<ScheduledPopup> {
        if self.is_dismissed(kind) {
            tracing::debug!("[PopupScheduler] {} already dismissed this session", kind);
            return None;
        }

        let token = CancellationToken::new();
        let popups = self.popups.clone();
        let child = token.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = child.cancelled() => {
                    tracing::debug!("[PopupScheduler] {} cancelled", kind);
                    false
                }
                _ = tokio::time::sleep(delay) => popups.request_activation(kind),
            }
        });

        Some(ScheduledPopup {
            kind,
            token,
            handle: Some(handle),
        })
    }

    /// Closes `kind` and remembers dismissals that should stick.
    pub fn dismiss(&self, kind: PopupKind) {
        self.popups.release(kind);

        if kind == PopupKind::Newsletter
            && let Err(e) = self.session.set(keys::NEWSLETTER_DISMISSED, "true")
        {
            tracing::warn!("[PopupScheduler] Failed to record dismissal: {}", e);
        }
    }

    fn is_dismissed(&self, kind: PopupKind) -> bool {
        kind == PopupKind::Newsletter
            && self
                .session
                .get_or_absent(keys::NEWSLETTER_DISMISSED)
                .is_some_and(|value| value == "true")
    }
}
