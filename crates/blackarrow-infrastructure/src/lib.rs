pub mod config_service;
pub mod geolocation;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::geolocation::HttpGeoLookup;
pub use crate::storage::{FileStore, MemoryStore};
