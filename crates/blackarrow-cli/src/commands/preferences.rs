use anyhow::{Context as _, Result};
use blackarrow_core::theme::ThemeMode;

use super::context::Context;
use crate::{ConsentAction, ThemeAction};

pub fn theme(ctx: &Context, action: ThemeAction) -> Result<()> {
    let session = ctx.session()?;
    let theme = session.theme();

    match action {
        ThemeAction::Show => {}
        ThemeAction::Toggle => {
            theme.toggle_theme();
        }
        ThemeAction::Set { mode } => {
            let mode = ThemeMode::parse(&mode)
                .with_context(|| format!("Unknown theme '{mode}' (expected light or dark)"))?;
            theme.set_theme(mode);
        }
    }

    println!("{}", serde_json::to_string_pretty(&theme.state())?);
    Ok(())
}

pub fn consent(ctx: &Context, action: ConsentAction) -> Result<()> {
    let session = ctx.session()?;
    let consent = session.consent();

    let decision = match action {
        ConsentAction::Show => consent.current(),
        ConsentAction::Accept => Some(consent.accept_all()?),
        ConsentAction::Reject => Some(consent.reject_optional()?),
        ConsentAction::Save {
            analytics,
            marketing,
        } => Some(consent.save(analytics, marketing)?),
    };

    match decision {
        Some(decision) => println!("{}", serde_json::to_string_pretty(&decision)?),
        None => println!("No cookie decision recorded"),
    }
    Ok(())
}
