//! Overlay identifiers for the two arbitration tiers.
//!
//! Popups and modals live in separate slots: one of each may be visible at
//! once, never two of the same tier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Low-priority, usually time- or scroll-triggered overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PopupKind {
    Newsletter,
    CookieConsent,
    LeadMagnet,
}

/// User- or event-triggered overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModalKind {
    Chat,
    AuditRequest,
    QuoteRequest,
    ExitIntent,
}

impl PopupKind {
    pub const ALL: [PopupKind; 3] = [
        PopupKind::Newsletter,
        PopupKind::CookieConsent,
        PopupKind::LeadMagnet,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(raw))
    }
}

impl ModalKind {
    pub const ALL: [ModalKind; 4] = [
        ModalKind::Chat,
        ModalKind::AuditRequest,
        ModalKind::QuoteRequest,
        ModalKind::ExitIntent,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for PopupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PopupKind::Newsletter => "newsletter",
            PopupKind::CookieConsent => "cookie-consent",
            PopupKind::LeadMagnet => "lead-magnet",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ModalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModalKind::Chat => "chat",
            ModalKind::AuditRequest => "audit-request",
            ModalKind::QuoteRequest => "quote-request",
            ModalKind::ExitIntent => "exit-intent",
        };
        f.write_str(name)
    }
}
