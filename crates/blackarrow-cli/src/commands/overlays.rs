use std::time::Duration;

use anyhow::{Context as _, Result};
use blackarrow_core::overlay::{ModalKind, PopupKind};
use serde_json::json;

use super::context::Context;

/// Plays the usual first-visit triggers against the arbiters: the cookie
/// prompt, the delayed newsletter popup, then any requested modals.
pub async fn run(ctx: &Context, newsletter_delay: Option<u64>, modals: &[String]) -> Result<()> {
    let session = ctx.session()?;

    let consent_prompt = session.consent().prompt();

    let scheduled = match newsletter_delay {
        Some(secs) => session
            .scheduler()
            .schedule(PopupKind::Newsletter, Duration::from_secs(secs)),
        None => session.schedule_newsletter(),
    };
    let newsletter = match scheduled {
        Some(pending) => json!(pending.outcome().await),
        None => json!("dismissed this session"),
    };

    let mut opened = Vec::with_capacity(modals.len());
    for name in modals {
        let kind = ModalKind::parse(name).with_context(|| format!("Unknown modal '{name}'"))?;
        opened.push(json!({ "modal": kind, "granted": session.modals().open(kind) }));
    }

    let report = json!({
        "cookieConsentShown": consent_prompt,
        "newsletterShown": newsletter,
        "modals": opened,
        "activePopup": session.popups().active(),
        "activeModal": session.modals().active(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
