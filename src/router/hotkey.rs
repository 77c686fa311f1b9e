//! Single-key route lookup.
//!
//! The dispatcher has no state of its own: it scans the registry in
//! registration order and the first descriptor bound to the key wins.

use std::sync::Arc;

use super::descriptor::RouteDescriptor;
use super::registry::ScreenRegistry;

pub struct HotkeyDispatcher<'a> {
    registry: &'a ScreenRegistry,
}

impl<'a> HotkeyDispatcher<'a> {
    pub fn new(registry: &'a ScreenRegistry) -> Self {
        Self { registry }
    }

    /// First route bound to `key`, if any
    pub fn resolve(&self, key: &str) -> Option<&'a Arc<RouteDescriptor>> {
        if key.is_empty() {
            return None;
        }
        self.registry.iter().find(|route| route.matches_hotkey(key))
    }

    /// All (key, route id) bindings in registration order, for help text
    pub fn bindings(&self) -> Vec<(&'a str, &'a str)> {
        self.registry
            .iter()
            .filter_map(|route| route.hotkey.as_deref().map(|key| (key, route.id.as_str())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bridge_registry() -> ScreenRegistry {
        let mut registry = ScreenRegistry::new();
        registry.register(RouteDescriptor::new("dashboard", "Overview").hotkey("F1"));
        registry.register(RouteDescriptor::new("navigation", "Navigation"));
        registry.register(RouteDescriptor::new("engineering", "Engineering").hotkey("F4"));
        registry.register(RouteDescriptor::new("crew", "Crew").hotkey("F4"));
        registry
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let registry = bridge_registry();
        let dispatcher = HotkeyDispatcher::new(&registry);
        assert_eq!(dispatcher.resolve("F4").map(|r| r.id.as_str()), Some("engineering"));
        assert_eq!(dispatcher.resolve("F1").map(|r| r.id.as_str()), Some("dashboard"));
    }

    #[test]
    fn test_resolve_unmapped_key() {
        let registry = bridge_registry();
        let dispatcher = HotkeyDispatcher::new(&registry);
        assert!(dispatcher.resolve("F9").is_none());
        assert!(dispatcher.resolve("").is_none());
    }

    #[test]
    fn test_bindings_skip_routes_without_hotkey() {
        let registry = bridge_registry();
        let bindings = HotkeyDispatcher::new(&registry).bindings();
        assert_eq!(
            bindings,
            vec![("F1", "dashboard"), ("F4", "engineering"), ("F4", "crew")]
        );
    }
}
