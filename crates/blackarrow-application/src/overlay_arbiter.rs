//! At-most-one-active arbitration for overlay tiers.
//!
//! Overlays are triggered from unrelated places (timers, scroll position,
//! clicks, route changes). Each tier gets one arbiter that owns its active
//! slot; overlays ask for the slot and hand it back when dismissed.

use std::fmt;
use std::sync::Arc;

use blackarrow_core::overlay::{ModalKind, PopupKind};
use tokio::sync::watch;

/// Grants a single active slot to one overlay id at a time.
///
/// Clones share the same slot. All operations are synchronous and applied in
/// call order; there is no internal debouncing or timeout eviction.
pub struct OverlayArbiter<T> {
    tier: &'static str,
    slot: Arc<watch::Sender<Option<T>>>,
}

impl<T> Clone for OverlayArbiter<T> {
    fn clone(&self) -> Self {
        Self {
            tier: self.tier,
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> OverlayArbiter<T>
where
    T: Copy + Eq + fmt::Display + Send + Sync + 'static,
{
    /// Creates an empty slot. `tier` is only used in logs.
    pub fn new(tier: &'static str) -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            tier,
            slot: Arc::new(slot),
        }
    }

    /// Grants the slot to `id` if it is free.
    ///
    /// Returns `true` when `id` now holds the slot (including when it already
    /// did) and `false` when another overlay is active. Denial is a normal
    /// outcome; the caller decides whether to retry or give up.
    pub fn request_activation(&self, id: T) -> bool {
        let mut granted = false;
        self.slot.send_if_modified(|active| match active {
            None => {
                *active = Some(id);
                granted = true;
                true
            }
            Some(current) => {
                granted = *current == id;
                false
            }
        });

        if granted {
            tracing::debug!("[{}] {} active", self.tier, id);
        } else {
            tracing::debug!("[{}] {} denied, slot is busy", self.tier, id);
        }
        granted
    }

    /// Frees the slot if `id` holds it.
    ///
    /// A release from an overlay that is not active is ignored, so a stale
    /// dismissal can never clear a newer overlay. Returns whether the slot
    /// was freed.
    pub fn release(&self, id: T) -> bool {
        let released = self.slot.send_if_modified(|active| {
            if *active == Some(id) {
                *active = None;
                true
            } else {
                false
            }
        });

        if released {
            tracing::debug!("[{}] {} released", self.tier, id);
        }
        released
    }

    /// The overlay currently holding the slot.
    pub fn active(&self) -> Option<T> {
        *self.slot.borrow()
    }

    pub fn is_active(&self, id: T) -> bool {
        self.active() == Some(id)
    }

    /// Change notifications for renderers.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.slot.subscribe()
    }
}

/// Popup tier: newsletter, cookie consent, lead magnet.
pub type PopupArbiter = OverlayArbiter<PopupKind>;

/// Modal tier: chat, audit request, quote request, exit intent.
pub type ModalArbiter = OverlayArbiter<ModalKind>;

impl OverlayArbiter<PopupKind> {
    pub fn popups() -> Self {
        Self::new("PopupArbiter")
    }
}

impl OverlayArbiter<ModalKind> {
    pub fn modals() -> Self {
        Self::new("ModalArbiter")
    }

    /// Opens a modal if no other modal is showing.
    pub fn open(&self, kind: ModalKind) -> bool {
        self.request_activation(kind)
    }

    /// Closes a modal; closing one that is not open does nothing.
    pub fn close(&self, kind: ModalKind) {
        self.release(kind);
    }
}
