//! Dispatch of raw OCR text to the matching plugin.

use tracing::{debug, info};

use crate::error::PluginError;
use crate::models::record::ChargeRecord;
use crate::plugins::{ChargingAppPlugin, PluginRegistry};

/// Selects a plugin for each OCR text and runs it.
///
/// The registry is fixed at construction; parsing only reads it.
pub struct ChargeParser {
    registry: PluginRegistry,
}

impl ChargeParser {
    /// Parser over an already populated registry.
    pub fn new(registry: PluginRegistry) -> Self {
        Self { registry }
    }

    /// Parser over every built-in plugin.
    pub fn with_builtin_plugins() -> Self {
        Self::new(PluginRegistry::with_builtin_plugins())
    }

    /// The registry, for listing and forced lookups.
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// First plugin, in registry order, that claims `text`.
    pub fn detect_plugin(&self, text: &str) -> Option<&dyn ChargingAppPlugin> {
        self.registry
            .all_ordered()
            .iter()
            .find(|p| p.detect(text))
            .map(|p| p.as_ref())
    }

    /// Parse `text` with the first matching plugin, or `None` when no plugin
    /// recognises it.
    pub fn parse_text(&self, text: &str) -> Option<ChargeRecord> {
        let Some(plugin) = self.detect_plugin(text) else {
            debug!("No plugin matched {} characters of text", text.len());
            return None;
        };
        info!("Parsing with plugin {}", plugin.brand());
        Some(run(plugin, text))
    }

    /// Parse `text` with a named plugin, skipping detection.
    pub fn parse_with(&self, name: &str, text: &str) -> Result<ChargeRecord, PluginError> {
        let plugin = self.registry.require(name)?;
        info!("Parsing with forced plugin {}", plugin.brand());
        Ok(run(plugin, text))
    }
}

fn run(plugin: &dyn ChargingAppPlugin, text: &str) -> ChargeRecord {
    let mut record = plugin.parse(text);
    record.charger_brand = Some(plugin.brand().to_string());
    record
}
