use anyhow::{Context as _, Result};
use blackarrow_application::ClientEnvironment;
use blackarrow_core::intent::ServiceIntent;
use blackarrow_core::region::{Region, RegionProfile, RegionSelection};
use serde::Serialize;

use super::context::Context;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegionReport {
    #[serde(flatten)]
    selection: RegionSelection,
    display_name: &'static str,
    currency: &'static str,
    phone: &'static str,
    email: &'static str,
    office: &'static str,
    landing_page_from: String,
    business_website_from: String,
    custom_web_app_from: String,
}

impl RegionReport {
    fn new(selection: RegionSelection, profile: &'static RegionProfile) -> Self {
        let price = |intent| profile.format_price(profile.starting_price(intent));
        Self {
            selection,
            display_name: profile.display_name,
            currency: profile.currency_code,
            phone: profile.phone,
            email: profile.email,
            office: profile.office,
            landing_page_from: price(ServiceIntent::LandingPage),
            business_website_from: price(ServiceIntent::BusinessWebsite),
            custom_web_app_from: price(ServiceIntent::CustomWebApp),
        }
    }
}

pub async fn run(ctx: &Context, host: String, timezone: String, set: Option<String>) -> Result<()> {
    let session = ctx.session()?;

    let selection = match set {
        Some(code) => {
            let region = Region::parse(&code)
                .with_context(|| format!("Unknown region '{code}' (expected UK, UAE or IND)"))?;
            session.region().set_region(region);
            session.region().current()
        }
        None => {
            session
                .region()
                .resolve(&ClientEnvironment::new(host, timezone))
                .await
        }
    };

    let report = RegionReport::new(selection, session.region().profile());
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
