//! Application layer for the Black Arrow site.
//!
//! Coordinators that own observable UI state (region, overlays, theme,
//! service intent, cookie consent) on top of the core domain rules and the
//! infrastructure stores.

pub mod consent_manager;
pub mod intent_tracker;
pub mod overlay_arbiter;
pub mod popup_scheduler;
pub mod region_resolver;
pub mod session;
pub mod theme_service;

pub use consent_manager::CookieConsentManager;
pub use intent_tracker::ServiceIntentTracker;
pub use overlay_arbiter::{ModalArbiter, OverlayArbiter, PopupArbiter};
pub use popup_scheduler::{PopupScheduler, ScheduledPopup};
pub use region_resolver::{ClientEnvironment, GeoChain, RegionResolver, ResolutionStep};
pub use session::{SiteSession, SiteSessionBuilder};
pub use theme_service::ThemeService;
