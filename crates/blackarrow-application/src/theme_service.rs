//! Light/dark theme preference.

use std::sync::Arc;

use blackarrow_core::storage::{KeyValueStore, keys};
use blackarrow_core::theme::{ThemeMode, ThemeState};
use tokio::sync::watch;

/// Resolves and persists the display theme.
///
/// At mount the stored preference wins, otherwise light mode, whatever the
/// system prefers. System changes are applied live only until the visitor
/// makes an explicit choice.
#[derive(Clone)]
pub struct ThemeService {
    state: Arc<watch::Sender<ThemeState>>,
    durable: Arc<dyn KeyValueStore>,
}

impl ThemeService {
    /// `system` is the host color scheme at mount. It is remembered but
    /// does not pick the initial theme.
    pub fn new(durable: Arc<dyn KeyValueStore>, system: ThemeMode) -> Self {
        let stored = durable
            .get_or_absent(keys::THEME)
            .and_then(|raw| ThemeMode::parse(&raw));
        let (state, _) = watch::channel(ThemeState::from_stored(stored, system));

        Self {
            state: Arc::new(state),
            durable,
        }
    }

    pub fn state(&self) -> ThemeState {
        *self.state.borrow()
    }

    pub fn current(&self) -> ThemeMode {
        self.state.borrow().mode
    }

    /// Whether the visitor has chosen a theme.
    pub fn is_explicit(&self) -> bool {
        self.state.borrow().explicit
    }

    /// Explicit choice: persisted immediately, disables system updates.
    pub fn set_theme(&self, mode: ThemeMode) {
        self.state.send_modify(|state| {
            state.mode = mode;
            state.explicit = true;
        });

        if let Err(e) = self.durable.set(keys::THEME, mode.as_str()) {
            tracing::warn!("[ThemeService] Failed to persist theme: {}", e);
        }
        tracing::debug!("[ThemeService] Theme set to {}", mode);
    }

    /// Flips the theme and returns the new mode.
    pub fn toggle_theme(&self) -> ThemeMode {
        let next = self.current().toggled();
        self.set_theme(next);
        next
    }

    /// Notification that the system color scheme changed.
    ///
    /// Returns whether the change was applied.
    pub fn on_system_preference_changed(&self, mode: ThemeMode) -> bool {
        let mut applied = false;
        self.state.send_if_modified(|state| {
            let reported = state.system != mode;
            state.system = mode;
            if !state.explicit && state.mode != mode {
                state.mode = mode;
                applied = true;
            }
            reported || applied
        });
        applied
    }

    /// Last color scheme reported by the host.
    pub fn system_preference(&self) -> ThemeMode {
        self.state.borrow().system
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeState> {
        self.state.subscribe()
    }
}
