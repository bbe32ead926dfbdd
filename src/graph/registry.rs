//! Module registry for managing rack module types.
//!
//! The registry provides a central catalog of available module types,
//! enabling the patch graph and the patch loader to resolve modules by
//! their plugin/module identifier pair.

use std::collections::HashMap;

use super::descriptor::ModuleDescriptor;

/// Central registry of available module types.
///
/// The registry stores static descriptors keyed by the `plugin/module`
/// identifier pair, in registration order for stable listing.
///
/// # Example
///
/// ```ignore
/// let mut registry = ModuleRegistry::new();
/// registry.register(&VCO);
/// registry.register(&OUTPUT);
///
/// // Later, resolve descriptors by identity
/// if let Some(descriptor) = registry.lookup("core", "vco") {
///     // Instantiate the module...
/// }
/// ```
pub struct ModuleRegistry {
    /// Map of "plugin/module" key to index into `descriptors`.
    by_key: HashMap<String, usize>,
    /// Descriptors in registration order.
    descriptors: Vec<&'static ModuleDescriptor>,
}

impl ModuleRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            by_key: HashMap::new(),
            descriptors: Vec::new(),
        }
    }

    /// Registers a module type with the registry.
    ///
    /// # Panics
    ///
    /// Panics if a module with the same plugin/module identifier pair is
    /// already registered.
    pub fn register(&mut self, descriptor: &'static ModuleDescriptor) {
        let key = registry_key(descriptor.plugin_id, descriptor.module_id);
        if self.by_key.contains_key(&key) {
            panic!(
                "Module '{}/{}' is already registered",
                descriptor.plugin_id, descriptor.module_id
            );
        }
        self.by_key.insert(key, self.descriptors.len());
        self.descriptors.push(descriptor);
    }

    /// Resolves a descriptor by its plugin and module identifiers.
    ///
    /// Returns `None` if no module with the given identity is registered.
    pub fn lookup(&self, plugin_id: &str, module_id: &str) -> Option<&'static ModuleDescriptor> {
        self.by_key
            .get(&registry_key(plugin_id, module_id))
            .map(|&index| self.descriptors[index])
    }

    /// Returns all registered descriptors in registration order.
    ///
    /// Useful for displaying the module browser in the UI.
    pub fn list(&self) -> &[&'static ModuleDescriptor] {
        &self.descriptors
    }

    /// Returns the number of registered module types.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if no modules are registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Checks if a module with the given identity is registered.
    pub fn contains(&self, plugin_id: &str, module_id: &str) -> bool {
        self.by_key
            .contains_key(&registry_key(plugin_id, module_id))
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the composite lookup key for a module identity.
fn registry_key(plugin_id: &str, module_id: &str) -> String {
    format!("{}/{}", plugin_id, module_id)
}
