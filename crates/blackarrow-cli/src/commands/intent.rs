use anyhow::{Context as _, Result};
use blackarrow_core::intent::{IntentSnapshot, ReminderContent};
use blackarrow_core::region::{Region, RegionProfile};
use serde::Serialize;

use super::context::Context;

#[derive(Serialize)]
struct Step<'a> {
    path: &'a str,
    #[serde(flatten)]
    snapshot: IntentSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    reminder: Option<ReminderContent>,
}

/// Replays `paths` as one visit and prints the tracker state after each.
pub fn run(ctx: &Context, paths: &[String], region: Option<String>) -> Result<()> {
    let region = match region {
        Some(code) => Region::parse(&code)
            .with_context(|| format!("Unknown region '{code}' (expected UK, UAE or IND)"))?,
        None => ctx.config.region.default_region,
    };
    let profile = RegionProfile::for_region(region);

    let session = ctx.session()?;
    let tracker = session.intent();

    let steps = paths
        .iter()
        .map(|path| Step {
            path,
            snapshot: tracker.navigate(path),
            reminder: tracker.reminder(profile),
        })
        .collect::<Vec<_>>();

    println!("{}", serde_json::to_string_pretty(&steps)?);
    Ok(())
}
