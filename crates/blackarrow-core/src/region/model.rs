//! Region domain models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three market segments the site is localized for.
///
/// The serialized form (`"UK"`, `"UAE"`, `"IND"`) is also the value written
/// to durable storage under [`crate::storage::keys::REGION`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Region {
    #[default]
    #[serde(rename = "UK")]
    Uk,
    #[serde(rename = "UAE")]
    Uae,
    #[serde(rename = "IND")]
    Ind,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Uk, Region::Uae, Region::Ind];

    /// The storage code for this region.
    pub fn code(&self) -> &'static str {
        match self {
            Region::Uk => "UK",
            Region::Uae => "UAE",
            Region::Ind => "IND",
        }
    }

    /// Parses a stored or user-supplied code.
    ///
    /// Surrounding whitespace and case are ignored. Anything that is not one
    /// of the three codes yields `None`, which callers treat as "absent".
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Region::ALL
            .into_iter()
            .find(|region| region.code().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The region currently in effect for a visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSelection {
    pub code: Region,
    /// True when derived from geolocation or timezone heuristics rather
    /// than a subdomain, a stored preference or an explicit choice.
    pub is_auto_detected: bool,
}

impl RegionSelection {
    pub fn explicit(code: Region) -> Self {
        Self {
            code,
            is_auto_detected: false,
        }
    }

    pub fn auto_detected(code: Region) -> Self {
        Self {
            code,
            is_auto_detected: true,
        }
    }
}

/// Which resolution step produced a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSource {
    Hostname,
    StoredPreference,
    Geolocation,
    Timezone,
    UserSelection,
}

impl RegionSource {
    /// Whether a selection from this source is written back to durable storage.
    ///
    /// Hostname matches are re-evaluated on every load and stored
    /// preferences are already persisted.
    pub fn persists(&self) -> bool {
        matches!(
            self,
            RegionSource::Geolocation | RegionSource::Timezone | RegionSource::UserSelection
        )
    }

    pub fn is_auto_detected(&self) -> bool {
        matches!(self, RegionSource::Geolocation | RegionSource::Timezone)
    }
}

/// The result of a successful resolution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionOutcome {
    pub region: Region,
    pub source: RegionSource,
}

impl RegionOutcome {
    pub fn new(region: Region, source: RegionSource) -> Self {
        Self { region, source }
    }

    pub fn selection(&self) -> RegionSelection {
        RegionSelection {
            code: self.region,
            is_auto_detected: self.source.is_auto_detected(),
        }
    }
}
