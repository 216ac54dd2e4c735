//! Per-region configuration table: currency, contact details and pricing.
//!
//! Every price shown to a visitor is formatted here so that currency symbols
//! come from one table instead of literals scattered through page content.

use super::model::Region;
use crate::intent::ServiceIntent;

/// How digits are grouped when formatting an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitGrouping {
    /// 1,234,567
    Thousands,
    /// 12,34,567 (lakh / crore)
    Indian,
}

/// Localized details for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionProfile {
    pub region: Region,
    pub display_name: &'static str,
    pub currency_code: &'static str,
    /// Written directly before the amount, including any spacing.
    pub currency_prefix: &'static str,
    pub grouping: DigitGrouping,
    pub phone: &'static str,
    pub email: &'static str,
    pub office: &'static str,
    pub landing_page_from: u64,
    pub business_website_from: u64,
    pub custom_web_app_from: u64,
}

const UK_PROFILE: RegionProfile = RegionProfile {
    region: Region::Uk,
    display_name: "United Kingdom",
    currency_code: "GBP",
    currency_prefix: "\u{00a3}",
    grouping: DigitGrouping::Thousands,
    phone: "+44 20 3858 0171",
    email: "uk@blackarrowtechnologies.com",
    office: "London, United Kingdom",
    landing_page_from: 499,
    business_website_from: 1_499,
    custom_web_app_from: 4_999,
};

const UAE_PROFILE: RegionProfile = RegionProfile {
    region: Region::Uae,
    display_name: "United Arab Emirates",
    currency_code: "AED",
    currency_prefix: "AED ",
    grouping: DigitGrouping::Thousands,
    phone: "+971 4 576 9012",
    email: "uae@blackarrowtechnologies.com",
    office: "Dubai, United Arab Emirates",
    landing_page_from: 2_499,
    business_website_from: 6_999,
    custom_web_app_from: 22_999,
};

const IND_PROFILE: RegionProfile = RegionProfile {
    region: Region::Ind,
    display_name: "India",
    currency_code: "INR",
    currency_prefix: "\u{20b9}",
    grouping: DigitGrouping::Indian,
    phone: "+91 80 4719 2230",
    email: "india@blackarrowtechnologies.com",
    office: "Bengaluru, India",
    landing_page_from: 24_999,
    business_website_from: 74_999,
    custom_web_app_from: 249_999,
};

impl RegionProfile {
    /// Looks up the static profile for a region.
    pub fn for_region(region: Region) -> &'static RegionProfile {
        match region {
            Region::Uk => &UK_PROFILE,
            Region::Uae => &UAE_PROFILE,
            Region::Ind => &IND_PROFILE,
        }
    }

    /// Starting price for a service family. `Generic` uses the cheapest package.
    pub fn starting_price(&self, intent: ServiceIntent) -> u64 {
        match intent {
            ServiceIntent::LandingPage | ServiceIntent::Generic => self.landing_page_from,
            ServiceIntent::BusinessWebsite => self.business_website_from,
            ServiceIntent::CustomWebApp => self.custom_web_app_from,
        }
    }

    /// Formats a whole-unit amount in this region's currency, e.g. `£1,499`.
    pub fn format_price(&self, amount: u64) -> String {
        format!("{}{}", self.currency_prefix, group_digits(amount, self.grouping))
    }
}

fn group_digits(amount: u64, grouping: DigitGrouping) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let group = match grouping {
        DigitGrouping::Thousands => 3,
        DigitGrouping::Indian => 2,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(group);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}
