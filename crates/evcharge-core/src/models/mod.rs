//! Data models for evcharge.

pub mod config;
pub mod record;

pub use config::EvChargeConfig;
pub use record::{ChargeRecord, IdentityKey, CSV_COLUMNS};
