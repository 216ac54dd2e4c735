//! Geolocation lookup abstraction.

use async_trait::async_trait;

use crate::error::Result;

/// A service that reports the visitor's country from their IP address.
///
/// Implementations return the two-letter country code exactly as the
/// provider reported it; mapping to a region happens in the resolver. Any
/// error, or a response without a country code, is "no result".
#[async_trait]
pub trait GeoLookup: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    async fn lookup_country(&self) -> Result<String>;
}
