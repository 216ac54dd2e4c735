//! Path classification for service intent.
//!
//! Paths are treated as opaque strings: only a trailing slash is dropped
//! before matching. Query strings and fragments are never inspected.

use super::model::{IntentSnapshot, ServiceIntent};

/// Path prefix table, most specific first. The first match wins.
const ROUTES: &[(&str, ServiceIntent)] = &[
    ("/services/landing-pages", ServiceIntent::LandingPage),
    ("/landing-page", ServiceIntent::LandingPage),
    ("/services/business-websites", ServiceIntent::BusinessWebsite),
    ("/business-website", ServiceIntent::BusinessWebsite),
    ("/services/web-applications", ServiceIntent::CustomWebApp),
    ("/custom-web-app", ServiceIntent::CustomWebApp),
    ("/services", ServiceIntent::Generic),
    ("/get-started", ServiceIntent::Generic),
];

/// Portfolio pages imply the generic intent, but never override a stored one.
const PORTFOLIO: &str = "/portfolio";

/// What a single path says about the visitor's intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Service(ServiceIntent),
    Portfolio,
    Unrelated,
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// Segment-aware prefix test: `/services` matches `/services/x`, not `/services-x`.
fn has_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Classifies a navigation path against the route table.
pub fn classify(path: &str) -> PathClass {
    let path = normalize(path);

    if let Some((_, intent)) = ROUTES.iter().find(|(prefix, _)| has_prefix(path, prefix)) {
        return PathClass::Service(*intent);
    }

    if has_prefix(path, PORTFOLIO) {
        PathClass::Portfolio
    } else {
        PathClass::Unrelated
    }
}

/// True when `path` belongs to the page family of `intent`.
pub fn in_family(intent: ServiceIntent, path: &str) -> bool {
    let path = normalize(path);

    let routed = ROUTES
        .iter()
        .filter(|(_, owner)| *owner == intent)
        .any(|(prefix, _)| has_prefix(path, prefix));

    routed || (intent == ServiceIntent::Generic && has_prefix(path, PORTFOLIO))
}

/// The entry page of a family, used as the reminder's call to action.
pub fn entry_path(intent: ServiceIntent) -> &'static str {
    ROUTES
        .iter()
        .find(|(_, owner)| *owner == intent)
        .map(|(prefix, _)| *prefix)
        .unwrap_or("/services")
}

/// Computes the intent to keep after navigating to `path`.
///
/// Unrelated paths keep the stored intent; that is exactly when the
/// reminder should appear.
pub fn next_intent(stored: Option<ServiceIntent>, path: &str) -> Option<ServiceIntent> {
    match classify(path) {
        PathClass::Service(intent) => Some(intent),
        PathClass::Portfolio => stored.or(Some(ServiceIntent::Generic)),
        PathClass::Unrelated => stored,
    }
}

/// Derives the banner flags for an intent at a path.
pub fn snapshot(intent: Option<ServiceIntent>, path: &str) -> IntentSnapshot {
    let inside = intent.is_some_and(|intent| in_family(intent, path));

    IntentSnapshot {
        last_visited_service: intent,
        current_path: path.to_string(),
        should_show_reminder: intent.is_some() && !inside,
        should_show_service_bar: inside,
    }
}
