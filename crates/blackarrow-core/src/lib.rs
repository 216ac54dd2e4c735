pub mod config;
pub mod consent;
pub mod error;
pub mod geo;
pub mod intent;
pub mod overlay;
pub mod region;
pub mod storage;
pub mod theme;

// Re-export common error type
pub use error::SiteError;
