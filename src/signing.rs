//! Signing Configurations
//!
//! Android build variants refer to signing configurations by name. This
//! module only ever deals with those names. The credential material itself
//! (keystores, passwords, aliases) is owned by the external toolchain and
//! never passes through here.

/// Name of the signing configuration Android creates implicitly.
pub const DEBUG: &str = "debug";

/// Signing Configuration Reference
///
/// A tagged lookup key naming an entry of a [`Registry`]. The reference is
/// resolved against an explicit registry at resolution time. It carries no
/// credential material.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct Ref(String);

impl Ref {
    /// Create a reference from a configuration name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Reference to the implicit `debug` configuration.
    pub fn debug() -> Self {
        Self::new(DEBUG)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ref {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signing Configuration
///
/// A named credential bundle as seen by the resolver. Only the name is
/// known here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub name: String,
}

/// Signing Configuration Registry
///
/// The set of signing configurations known to a build. Entries are kept
/// ordered by name so iteration is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
    configs: std::collections::BTreeMap<String, Config>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry containing only the implicit `debug` configuration.
    pub fn with_debug() -> Self {
        let mut registry = Self::new();
        registry.insert(Config { name: DEBUG.to_string() });
        registry
    }

    /// Insert a configuration, replacing any entry of the same name.
    pub fn insert(&mut self, config: Config) {
        self.configs.insert(config.name.clone(), config);
    }

    pub fn contains(&self, r: &Ref) -> bool {
        self.configs.contains_key(r.as_str())
    }

    /// Iterate all configuration names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify the implicit debug configuration
    //
    // A registry created via `with_debug()` must resolve the debug reference
    // and nothing else.
    #[test]
    fn registry_with_debug() {
        let registry = Registry::with_debug();

        assert!(registry.contains(&Ref::debug()));
        assert!(!registry.contains(&Ref::new("release")));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["debug"]);
    }

    // Verify insertion is keyed by name
    #[test]
    fn registry_insert_by_name() {
        let mut registry = Registry::with_debug();

        registry.insert(Config { name: "release".into() });
        registry.insert(Config { name: "release".into() });

        assert!(registry.contains(&Ref::new("release")));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["debug", "release"]);
    }
}
