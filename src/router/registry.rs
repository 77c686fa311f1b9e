use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

use super::descriptor::RouteDescriptor;

/// Ordered id -> descriptor mapping.
///
/// Registration order is preserved and is the order used for hotkey scanning.
/// Re-registering an id replaces the descriptor in place.
#[derive(Default)]
pub struct ScreenRegistry {
    routes: Vec<Arc<RouteDescriptor>>,
    index: HashMap<String, usize>,
}

impl ScreenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor, returning the one it replaced (if any)
    pub fn register(&mut self, descriptor: RouteDescriptor) -> Option<Arc<RouteDescriptor>> {
        if let Some(key) = &descriptor.hotkey {
            if let Some(owner) = self
                .routes
                .iter()
                .find(|r| r.id != descriptor.id && r.matches_hotkey(key))
            {
                warn!(
                    "Hotkey {} of route '{}' is already bound to '{}', first registration wins",
                    key, descriptor.id, owner.id
                );
            }
        }

        let descriptor = Arc::new(descriptor);
        match self.index.get(&descriptor.id) {
            Some(&slot) => {
                debug!("Replacing route descriptor '{}'", descriptor.id);
                Some(std::mem::replace(&mut self.routes[slot], descriptor))
            }
            None => {
                debug!("Registered route '{}'", descriptor.id);
                self.index.insert(descriptor.id.clone(), self.routes.len());
                self.routes.push(descriptor);
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<RouteDescriptor>> {
        self.index.get(id).map(|&slot| Arc::clone(&self.routes[slot]))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Registered ids in registration order. The iterator is `Clone`, so it can be restarted.
    pub fn ids(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.routes.iter().map(|r| r.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<RouteDescriptor>> + '_ {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(ids: &[&str]) -> ScreenRegistry {
        let mut registry = ScreenRegistry::new();
        for id in ids {
            registry.register(RouteDescriptor::new(*id, id.to_uppercase()));
        }
        registry
    }

    #[test]
    fn test_ids_follow_registration_order() {
        let registry = registry_with(&["dashboard", "life-support", "navigation"]);
        let ids: Vec<_> = registry.ids().collect();
        assert_eq!(ids, vec!["dashboard", "life-support", "navigation"]);
    }

    #[test]
    fn test_ids_iterator_is_restartable() {
        let registry = registry_with(&["dashboard", "crew"]);
        let ids = registry.ids();
        assert_eq!(ids.clone().count(), 2);
        assert_eq!(ids.last(), Some("crew"));
    }

    #[test]
    fn test_get_unknown_is_none() {
        let registry = registry_with(&["dashboard"]);
        assert!(registry.get("bridge").is_none());
        assert!(!registry.contains("bridge"));
    }

    #[test]
    fn test_reregister_overwrites_in_place() {
        let mut registry = registry_with(&["dashboard", "crew", "engineering"]);

        let replaced = registry.register(RouteDescriptor::new("crew", "Crew Roster").hotkey("F5"));

        assert_eq!(replaced.map(|r| r.title.clone()), Some("CREW".to_string()));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("crew").unwrap().title, "Crew Roster");
        let ids: Vec<_> = registry.ids().collect();
        assert_eq!(ids, vec!["dashboard", "crew", "engineering"]);
    }

    #[test]
    fn test_duplicate_hotkeys_are_accepted() {
        let mut registry = ScreenRegistry::new();
        registry.register(RouteDescriptor::new("engineering", "Engineering").hotkey("F4"));
        registry.register(RouteDescriptor::new("crew", "Crew").hotkey("F4"));

        let owners: Vec<_> = registry
            .iter()
            .filter(|r| r.matches_hotkey("F4"))
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(owners, vec!["engineering", "crew"]);
    }
}
