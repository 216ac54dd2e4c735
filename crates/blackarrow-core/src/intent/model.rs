//! Service intent domain models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The product family a visitor was last exploring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceIntent {
    LandingPage,
    BusinessWebsite,
    CustomWebApp,
    Generic,
}

impl ServiceIntent {
    pub const ALL: [ServiceIntent; 4] = [
        ServiceIntent::LandingPage,
        ServiceIntent::BusinessWebsite,
        ServiceIntent::CustomWebApp,
        ServiceIntent::Generic,
    ];

    /// The value stored in session storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceIntent::LandingPage => "landing-page",
            ServiceIntent::BusinessWebsite => "business-website",
            ServiceIntent::CustomWebApp => "custom-web-app",
            ServiceIntent::Generic => "generic",
        }
    }

    /// Parses a stored value; unknown strings are treated as absent.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        ServiceIntent::ALL
            .into_iter()
            .find(|intent| intent.as_str() == trimmed)
    }

    /// Human-readable name used in reminder copy.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceIntent::LandingPage => "Landing Page",
            ServiceIntent::BusinessWebsite => "Business Website",
            ServiceIntent::CustomWebApp => "Custom Web App",
            ServiceIntent::Generic => "Website Project",
        }
    }
}

impl fmt::Display for ServiceIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable state of the intent tracker after a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentSnapshot {
    pub last_visited_service: Option<ServiceIntent>,
    pub current_path: String,
    /// An intent is stored and the visitor has left its page family.
    pub should_show_reminder: bool,
    /// The visitor is inside the stored intent's page family.
    pub should_show_service_bar: bool,
}

/// Copy for the sticky "continue where you left off" banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderContent {
    pub intent: ServiceIntent,
    pub title: String,
    pub subtitle: String,
    pub cta_path: String,
}
