//! Charging-app plugins.
//!
//! Each plugin understands the OCR text of one app's charge-detail screen.
//! Plugins are registered explicitly in [`PluginRegistry::with_builtin_plugins`].
//!
//! ## Adding a new plugin
//!
//! 1. Run `evcharge scaffold <brand> <screenshot>` to seed `src/plugins/<brand>.rs`
//! 2. Fill in `parse` using the helpers in [`crate::rules`]
//! 3. Add `pub mod <brand>;` below and register it in `with_builtin_plugins`

pub mod electrify_america;
pub mod fordpass;
mod registry;

pub use electrify_america::ElectrifyAmericaPlugin;
pub use fordpass::FordPassPlugin;
pub use registry::PluginRegistry;

use crate::models::record::ChargeRecord;

/// Contract implemented by every charging-app parser.
pub trait ChargingAppPlugin: Send + Sync {
    /// Stable identifier, stamped into `charger_brand`.
    fn brand(&self) -> &'static str;

    /// Human-friendly name, also accepted by lookup.
    fn display_name(&self) -> &'static str;

    /// Dispatch priority; higher runs first.
    fn priority(&self) -> i32 {
        0
    }

    /// Cheap keyword test: does this text come from this app's screen?
    fn detect(&self, text: &str) -> bool;

    /// Extract a record. Fields that cannot be found stay unset.
    fn parse(&self, text: &str) -> ChargeRecord;
}
