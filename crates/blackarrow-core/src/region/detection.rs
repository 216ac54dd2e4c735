//! Pure region heuristics: hostname prefixes, country codes and timezones.
//!
//! These functions hold the lookup tables used by the resolution chain. They
//! perform no I/O, so the chain itself only has to decide *when* to call them.

use std::collections::BTreeMap;

use super::model::Region;

/// Matches the first DNS label of `hostname` against the configured
/// regional subdomain prefixes.
///
/// A port suffix and a leading `www.` are ignored. Single-label hosts such
/// as `localhost` never match.
pub fn region_for_hostname(hostname: &str, subdomains: &BTreeMap<String, Region>) -> Option<Region> {
    let host = hostname.trim().to_ascii_lowercase();
    let host = host.split(':').next().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);

    let mut labels = host.split('.');
    let first = labels.next()?;
    // Needs at least one more label, otherwise the "prefix" is the whole host
    labels.next()?;

    subdomains.get(first).copied()
}

/// Maps an ISO 3166-1 alpha-2 country code to a region.
///
/// The Gulf Cooperation Council states are served by the UAE office.
pub fn region_for_country(country_code: &str) -> Option<Region> {
    match country_code.trim().to_ascii_uppercase().as_str() {
        "GB" | "UK" => Some(Region::Uk),
        "AE" | "SA" | "QA" | "KW" | "BH" | "OM" => Some(Region::Uae),
        "IN" => Some(Region::Ind),
        _ => None,
    }
}

const UK_TIMEZONES: &[&str] = &["London", "Belfast", "Guernsey", "Jersey", "Isle_of_Man"];
const UAE_TIMEZONES: &[&str] = &["Dubai", "Muscat", "Qatar", "Riyadh", "Bahrain", "Kuwait"];
const IND_TIMEZONES: &[&str] = &["Kolkata", "Calcutta"];

/// Guesses a region from an IANA timezone identifier such as `Asia/Kolkata`.
///
/// Falls back to [`Region::Uk`] when nothing matches.
pub fn region_for_timezone(timezone: &str) -> Region {
    let table: [(Region, &[&str]); 3] = [
        (Region::Ind, IND_TIMEZONES),
        (Region::Uae, UAE_TIMEZONES),
        (Region::Uk, UK_TIMEZONES),
    ];

    table
        .into_iter()
        .find(|(_, needles)| needles.iter().any(|needle| timezone.contains(needle)))
        .map(|(region, _)| region)
        .unwrap_or_default()
}

/// The default subdomain prefix table.
pub fn default_subdomains() -> BTreeMap<String, Region> {
    [
        ("uk", Region::Uk),
        ("uae", Region::Uae),
        ("ae", Region::Uae),
        ("in", Region::Ind),
        ("india", Region::Ind),
    ]
    .into_iter()
    .map(|(prefix, region)| (prefix.to_string(), region))
    .collect()
}
