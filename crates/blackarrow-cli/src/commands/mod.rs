pub mod context;
pub mod intent;
pub mod logging;
pub mod overlays;
pub mod preferences;
pub mod region;
