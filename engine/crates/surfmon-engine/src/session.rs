//! Invocation modes: analyze, compare two entries, list probes, list entries

use crate::diff::{DiffEngine, ProbeFilter};
use crate::error::EngineResult;
use crate::report::Report;
use std::sync::Arc;
use surfmon_collect::Collector;
use surfmon_core::{Anomaly, Error, ProbeDescriptor, Result};
use surfmon_probes::ProbeRegistry;
use surfmon_store::{CacheEntry, SnapshotStore};
use tracing::{info, warn};

pub const BASELINE_WARNING: &str = "no cache entry found yet so caching baseline";
pub const PARTIAL_RUN_WARNING: &str = "results NOT cached as only partial probe list being run";

/// One run of the tool against a loaded snapshot store
pub struct Session<'r, C> {
    registry: &'r ProbeRegistry,
    store: SnapshotStore,
    collector: C,
}

impl<'r, C: Collector> Session<'r, C> {
    pub fn new(registry: &'r ProbeRegistry, store: SnapshotStore, collector: C) -> Self {
        Self {
            registry,
            store,
            collector,
        }
    }

    /// One warning per requested name the registry does not know
    fn unknown_requested(&self, names: &[String]) -> Vec<Anomaly> {
        names
            .iter()
            .filter(|n| !self.registry.contains(n))
            .map(|name| {
                warn!("Ignoring unknown probe {}", name);
                Anomaly::warning(format!(
                    "unknown probe with name `{}` requested; ignored",
                    name
                ))
            })
            .collect()
    }

    /// Collect the host now and compare against the newest cached snapshot.
    ///
    /// With no `only` list every registered probe runs and the result is cached.
    /// With a list only those probes run and nothing is cached. Session warnings
    /// come before the diff's anomalies.
    pub fn analyze(&mut self, only: Option<&[String]>) -> EngineResult<Report> {
        let mut anomalies = Vec::new();

        let (probes, filter): (Vec<Arc<dyn ProbeDescriptor>>, Option<ProbeFilter>) = match only {
            None => (self.registry.all(), None),
            Some(names) => {
                anomalies.extend(self.unknown_requested(names));
                (
                    self.registry.by_names(names),
                    Some(names.iter().cloned().collect()),
                )
            }
        };

        let full_run = filter.is_none();
        let new = self.collector.collect(&probes)?;
        let old = self.store.last_entry();

        if full_run {
            if old.is_none() {
                anomalies.push(Anomaly::warning(BASELINE_WARNING));
            }
        } else {
            anomalies.push(Anomaly::warning(PARTIAL_RUN_WARNING));
        }

        let engine = DiffEngine::new(self.registry);
        let found = engine
            .compare(old, &new, filter.as_ref())
            .map_err(|abort| abort.after(std::mem::take(&mut anomalies)))?;
        anomalies.extend(found);

        let mut report = Report::new(anomalies);
        if full_run {
            let id = self.store.add_entry(new)?;
            info!("Cached snapshot as entry {}", id);
            report.cached_as = Some(id);
        }
        Ok(report)
    }

    /// Compare two cached entries, `old_id` as the baseline
    pub fn compare_entries(
        &self,
        old_id: u64,
        new_id: u64,
        only: Option<&[String]>,
    ) -> EngineResult<Report> {
        let new = self
            .store
            .entry(new_id)
            .ok_or(Error::EntryNotFound { id: new_id })?;
        let old = self
            .store
            .entry(old_id)
            .ok_or(Error::EntryNotFound { id: old_id })?;

        let mut anomalies = only.map_or_else(Vec::new, |names| self.unknown_requested(names));
        let filter: Option<ProbeFilter> = only.map(|names| names.iter().cloned().collect());
        let engine = DiffEngine::new(self.registry);
        let found = engine
            .compare(Some(old), new, filter.as_ref())
            .map_err(|abort| abort.after(std::mem::take(&mut anomalies)))?;
        anomalies.extend(found);
        Ok(Report::new(anomalies))
    }

    /// Every registered probe, sorted by name
    pub fn list_probes(&self) -> Vec<Arc<dyn ProbeDescriptor>> {
        self.registry.all()
    }

    /// Cached entries, ascending by id
    pub fn list_entries(&self) -> &[CacheEntry] {
        self.store.entries()
    }

    /// Apply the retention limit and persist the store
    pub fn finish(&mut self, max_entries: usize) -> Result<()> {
        let dropped = self.store.purge(max_entries)?;
        if dropped > 0 {
            info!("Dropped {} old cache entries", dropped);
        }
        self.store.save()
    }
}
