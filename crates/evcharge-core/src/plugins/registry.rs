//! Ordered plugin registry.

use std::cmp::Reverse;

use tracing::{debug, warn};

use super::{ChargingAppPlugin, ElectrifyAmericaPlugin, FordPassPlugin};
use crate::error::PluginError;

/// Plugins in dispatch order: priority descending, then brand ascending.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn ChargingAppPlugin>>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every plugin shipped with the crate.
    pub fn with_builtin_plugins() -> Self {
        let mut registry = Self::new();
        let builtins: Vec<Box<dyn ChargingAppPlugin>> = vec![
            Box::new(ElectrifyAmericaPlugin::new()),
            Box::new(FordPassPlugin::new()),
        ];
        for plugin in builtins {
            if let Err(e) = registry.register(plugin) {
                warn!("Skipping built-in plugin: {}", e);
            }
        }
        registry
    }

    /// Add a plugin, keeping dispatch order. Brands must be unique.
    pub fn register(&mut self, plugin: Box<dyn ChargingAppPlugin>) -> Result<(), PluginError> {
        let brand = plugin.brand();
        if self.plugins.iter().any(|p| p.brand() == brand) {
            return Err(PluginError::DuplicateBrand(brand.to_string()));
        }

        debug!("Registering plugin {} (priority {})", brand, plugin.priority());
        let position = self
            .plugins
            .partition_point(|p| order_key(p.as_ref()) <= order_key(plugin.as_ref()));
        self.plugins.insert(position, plugin);
        Ok(())
    }

    /// Plugins in the order dispatch tries them.
    pub fn all_ordered(&self) -> &[Box<dyn ChargingAppPlugin>] {
        &self.plugins
    }

    /// Find a plugin by brand or display name, ignoring case.
    pub fn lookup(&self, name: &str) -> Option<&dyn ChargingAppPlugin> {
        let name = name.trim();
        self.plugins
            .iter()
            .find(|p| p.brand().eq_ignore_ascii_case(name) || p.display_name().eq_ignore_ascii_case(name))
            .map(|p| p.as_ref())
    }

    /// Brands in dispatch order.
    pub fn brands(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.brand()).collect()
    }

    /// Lookup that reports the available brands on failure.
    pub fn require(&self, name: &str) -> Result<&dyn ChargingAppPlugin, PluginError> {
        self.lookup(name).ok_or_else(|| PluginError::UnknownPlugin {
            name: name.to_string(),
            available: self.brands().join(", "),
        })
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

fn order_key(plugin: &dyn ChargingAppPlugin) -> (Reverse<i32>, &'static str) {
    (Reverse(plugin.priority()), plugin.brand())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::ChargeRecord;

    struct Stub {
        brand: &'static str,
        priority: i32,
    }

    impl ChargingAppPlugin for Stub {
        fn brand(&self) -> &'static str {
            self.brand
        }
        fn display_name(&self) -> &'static str {
            "Stub App"
        }
        fn priority(&self) -> i32 {
            self.priority
        }
        fn detect(&self, _text: &str) -> bool {
            true
        }
        fn parse(&self, _text: &str) -> ChargeRecord {
            ChargeRecord::for_brand(self.brand)
        }
    }

    fn stub(brand: &'static str, priority: i32) -> Box<dyn ChargingAppPlugin> {
        Box::new(Stub { brand, priority })
    }

    #[test]
    fn test_order_by_priority_then_brand() {
        let mut registry = PluginRegistry::new();
        registry.register(stub("zeta", 0)).unwrap();
        registry.register(stub("alpha", 0)).unwrap();
        registry.register(stub("omega", 5)).unwrap();
        registry.register(stub("beta", -1)).unwrap();

        assert_eq!(registry.brands(), vec!["omega", "alpha", "zeta", "beta"]);
    }

    #[test]
    fn test_duplicate_brand_rejected() {
        let mut registry = PluginRegistry::new();
        registry.register(stub("alpha", 0)).unwrap();

        assert_eq!(
            registry.register(stub("alpha", 3)).unwrap_err(),
            PluginError::DuplicateBrand("alpha".to_string())
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_by_brand_or_display_name() {
        let registry = PluginRegistry::with_builtin_plugins();

        assert_eq!(registry.lookup("FORDPASS").map(|p| p.brand()), Some("fordpass"));
        assert_eq!(
            registry.lookup("Electrify America").map(|p| p.brand()),
            Some("electrify_america")
        );
        assert!(registry.lookup("chargepoint").is_none());
    }

    #[test]
    fn test_require_lists_available() {
        let registry = PluginRegistry::with_builtin_plugins();
        let err = registry.require("tesla").err().unwrap();

        assert_eq!(
            err.to_string(),
            "unknown plugin 'tesla'. Available plugins: fordpass, electrify_america"
        );
    }
}
