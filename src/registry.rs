//! Name-to-implementation registry for polymorphic config families.
//!
//! Every family (schedulers, search algorithms) owns its own registry
//! instance, constructed once and passed by reference. Registries are never
//! shared across unrelated families: two families registering the same name
//! would silently clobber each other.

/// Lookup failure for a name no entry was registered under.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no entry registered under `{0}`")]
pub struct RegistryError(pub String);

/// Ordered name→value mapping with lowercase keys.
///
/// Multiple names may alias the same value. Re-registering a name silently
/// replaces the previous value in place (last registration wins), keeping
/// the name's original position in iteration order.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` under the lowercased `name`, replacing any previous
    /// entry for that name.
    pub fn register(&mut self, name: &str, value: T) {
        let key = name.to_lowercase();
        match self.entries.iter_mut().find(|(n, _)| *n == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Register the same value under several names (canonical name plus
    /// aliases).
    pub fn register_aliases(&mut self, names: &[&str], value: T)
    where
        T: Clone,
    {
        for name in names {
            self.register(name, value.clone());
        }
    }

    /// Look up a name, failing if nothing was registered under it.
    pub fn get(&self, name: &str) -> Result<&T, RegistryError> {
        let key = name.to_lowercase();
        self.entries
            .iter()
            .find(|(n, _)| *n == key)
            .map(|(_, v)| v)
            .ok_or_else(|| RegistryError(key))
    }

    /// Whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        let key = name.to_lowercase();
        self.entries.iter().any(|(n, _)| *n == key)
    }

    /// Registered names in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Registered (name, value) pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
