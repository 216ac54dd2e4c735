//! Service intent domain: what product family a visitor is exploring.

pub mod classifier;
pub mod model;
mod reminder;

pub use classifier::{PathClass, classify, in_family, next_intent, snapshot};
pub use model::{IntentSnapshot, ReminderContent, ServiceIntent};
