//! Probe registry - index of all available probes

use crate::probes;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use surfmon_core::{Error, ProbeDescriptor, Result};
use tracing::debug;

/// Registry of probes, built once at startup and read-only afterwards
pub struct ProbeRegistry {
    /// Probes indexed by name
    probes: HashMap<String, Arc<dyn ProbeDescriptor>>,
}

impl ProbeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            probes: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in probe
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        for probe in probes::builtin() {
            registry.register(probe)?;
        }
        debug!("Registered {} built-in probes", registry.len());
        Ok(registry)
    }

    /// Register a probe. Fails if a probe with the same name is already present,
    /// leaving the registry unchanged.
    pub fn register(&mut self, probe: Arc<dyn ProbeDescriptor>) -> Result<()> {
        let name = probe.name().to_string();
        if self.probes.contains_key(&name) {
            return Err(Error::DuplicateProbe { name });
        }
        self.probes.insert(name, probe);
        Ok(())
    }

    /// Get a probe by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn ProbeDescriptor>> {
        self.probes.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.probes.contains_key(name)
    }

    /// Get all probe names, sorted
    pub fn names(&self) -> BTreeSet<&str> {
        self.probes.keys().map(|s| s.as_str()).collect()
    }

    /// Get all probes, sorted by name
    pub fn all(&self) -> Vec<Arc<dyn ProbeDescriptor>> {
        let mut all: Vec<_> = self.probes.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    /// Get number of registered probes
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Resolve probes by name, in the given order; unknown names are skipped
    pub fn by_names<S: AsRef<str>>(&self, names: &[S]) -> Vec<Arc<dyn ProbeDescriptor>> {
        names
            .iter()
            .filter_map(|name| self.probes.get(name.as_ref()).cloned())
            .collect()
    }
}

impl Default for ProbeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
