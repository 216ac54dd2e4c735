//! Sticky reminder copy for a remembered service intent.

use super::classifier::entry_path;
use super::model::{ReminderContent, ServiceIntent};
use crate::region::RegionProfile;

impl ReminderContent {
    /// Builds the reminder for `intent`, pricing it from the region profile.
    pub fn for_intent(intent: ServiceIntent, profile: &RegionProfile) -> Self {
        let price = profile.format_price(profile.starting_price(intent));

        Self {
            intent,
            title: format!("Still thinking about your {}?", intent.label()),
            subtitle: format!("Packages from {} - pick up where you left off", price),
            cta_path: entry_path(intent).to_string(),
        }
    }
}
