//! Theme domain models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Light or dark display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Parses a stored value; anything other than `light`/`dark` is absent.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved theme plus whether the visitor chose it.
///
/// Once `explicit` is set, system preference changes are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThemeState {
    pub mode: ThemeMode,
    pub explicit: bool,
    /// Last color scheme reported by the host system.
    #[serde(default)]
    pub system: ThemeMode,
}

impl ThemeState {
    /// State at mount: the stored preference if any, otherwise light.
    ///
    /// The system preference at mount is recorded but never selects the
    /// initial mode; only later system changes can.
    pub fn from_stored(stored: Option<ThemeMode>, system: ThemeMode) -> Self {
        match stored {
            Some(mode) => Self {
                mode,
                explicit: true,
                system,
            },
            None => Self {
                mode: ThemeMode::Light,
                explicit: false,
                system,
            },
        }
    }
}
