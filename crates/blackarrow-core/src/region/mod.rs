//! Region domain: selection model, detection heuristics and the profile table.

pub mod detection;
pub mod model;
pub mod profile;

pub use detection::{default_subdomains, region_for_country, region_for_hostname, region_for_timezone};
pub use model::{Region, RegionOutcome, RegionSelection, RegionSource};
pub use profile::{DigitGrouping, RegionProfile};
