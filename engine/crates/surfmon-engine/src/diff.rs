//! Diff engine - compares two snapshots probe by probe

use std::collections::HashSet;
use surfmon_core::{Anomaly, Error, Snapshot};
use surfmon_probes::ProbeRegistry;
use thiserror::Error;
use tracing::{debug, warn};

/// Names of the probes a comparison is restricted to
pub type ProbeFilter = HashSet<String>;

/// A comparison stopped on a fatal probe error.
///
/// Carries every anomaly produced before the failing probe.
#[derive(Error, Debug)]
#[error("comparison aborted at probe {probe}")]
pub struct DiffAbort {
    pub probe: String,
    pub anomalies: Vec<Anomaly>,
    #[source]
    pub source: Error,
}

impl DiffAbort {
    /// Put `earlier` in front of the partial anomalies
    pub fn after(mut self, mut earlier: Vec<Anomaly>) -> Self {
        earlier.append(&mut self.anomalies);
        self.anomalies = earlier;
        self
    }
}

/// Compares snapshots using the probes of a registry
pub struct DiffEngine<'r> {
    registry: &'r ProbeRegistry,
}

impl<'r> DiffEngine<'r> {
    pub fn new(registry: &'r ProbeRegistry) -> Self {
        Self { registry }
    }

    /// Union of probe names: every key of `old` in order, then the keys only `new` has
    pub fn task_order<'s>(old: &'s Snapshot, new: &'s Snapshot) -> Vec<&'s str> {
        let mut tasks: Vec<&str> = old.names().collect();
        tasks.extend(new.names().filter(|name| !old.contains(name)));
        tasks
    }

    /// Compare `old` (absent means no baseline) against `new`.
    ///
    /// Probes outside `filter` are skipped without being parsed. Probes missing from
    /// the registry produce one warning each. The first fatal probe error aborts the
    /// comparison.
    pub fn compare(
        &self,
        old: Option<&Snapshot>,
        new: &Snapshot,
        filter: Option<&ProbeFilter>,
    ) -> Result<Vec<Anomaly>, DiffAbort> {
        let empty = Snapshot::new();
        let old = old.unwrap_or(&empty);
        let mut anomalies = Vec::new();

        for name in Self::task_order(old, new) {
            if let Some(filter) = filter {
                if !filter.contains(name) {
                    debug!("Skipping filtered probe {}", name);
                    continue;
                }
            }

            let Some(probe) = self.registry.get(name) else {
                warn!("Unknown probe {} in snapshot", name);
                anomalies.push(Anomaly::warning(format!(
                    "unknown probe with name `{}`; possibly produced by a newer/older version of the probe set",
                    name
                )));
                continue;
            };

            let old_raw = old.get(name).unwrap_or_default();
            let Some(new_raw) = new.get(name) else {
                return Err(DiffAbort {
                    probe: name.to_string(),
                    anomalies,
                    source: Error::MissingProbeOutput {
                        probe: name.to_string(),
                    },
                });
            };

            match probe.diff(old_raw, new_raw) {
                Ok(found) => {
                    debug!("Probe {} reported {} anomalies", name, found.len());
                    anomalies.extend(found);
                }
                Err(source) => {
                    return Err(DiffAbort {
                        probe: name.to_string(),
                        anomalies,
                        source,
                    });
                }
            }
        }

        Ok(anomalies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use surfmon_core::{CompareResult, Probe};

    /// Reports one change per line present only in the newer capture
    struct LinesProbe {
        name: &'static str,
        calls: Arc<AtomicUsize>,
    }

    impl LinesProbe {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl Probe for LinesProbe {
        type Parsed = Vec<String>;

        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "lines"
        }

        fn command(&self) -> &str {
            "true"
        }

        fn parse(&self, raw: &str) -> Vec<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            raw.lines().map(String::from).collect()
        }

        fn compare(&self, old: &Vec<String>, new: &Vec<String>) -> CompareResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(new
                .iter()
                .filter(|l| !old.contains(l))
                .map(|l| Anomaly::change(format!("{} added", l)))
                .collect())
        }
    }

    struct BrokenProbe;

    impl Probe for BrokenProbe {
        type Parsed = ();

        fn name(&self) -> &str {
            "broken"
        }

        fn description(&self) -> &str {
            "always violates its contract"
        }

        fn command(&self) -> &str {
            "true"
        }

        fn parse(&self, _raw: &str) {}

        fn compare(&self, _old: &(), _new: &()) -> CompareResult {
            Err(Error::ProbeContract {
                probe: "broken".into(),
                message: "no sequence produced".into(),
            })
        }
    }

    fn snap(pairs: &[(&str, &str)]) -> Snapshot {
        pairs.iter().copied().collect()
    }

    fn registry_with(probes: Vec<Arc<dyn surfmon_core::ProbeDescriptor>>) -> ProbeRegistry {
        let mut registry = ProbeRegistry::new();
        for probe in probes {
            registry.register(probe).unwrap();
        }
        registry
    }

    #[test]
    fn test_task_order_old_first_then_new_only() {
        let old = snap(&[("a", ""), ("b", "")]);
        let new = snap(&[("b", ""), ("c", "")]);
        assert_eq!(DiffEngine::task_order(&old, &new), vec!["a", "b", "c"]);

        let new_first = snap(&[("c", ""), ("a", ""), ("d", "")]);
        assert_eq!(
            DiffEngine::task_order(&old, &new_first),
            vec!["a", "b", "c", "d"]
        );
    }

    #[test]
    fn test_new_users_reported_in_line_order() {
        let registry = registry_with(vec![Arc::new(LinesProbe::new("users"))]);
        let engine = DiffEngine::new(&registry);

        let new = snap(&[("users", "alice\nbob")]);
        let anomalies = engine.compare(Some(&Snapshot::new()), &new, None).unwrap();
        assert_eq!(
            anomalies,
            vec![Anomaly::change("alice added"), Anomaly::change("bob added")]
        );
    }

    #[test]
    fn test_absent_old_equals_empty_old() {
        let registry = registry_with(vec![Arc::new(LinesProbe::new("users"))]);
        let engine = DiffEngine::new(&registry);

        let new = snap(&[("users", "root\nalice"), ("ghost", "x")]);
        assert_eq!(
            engine.compare(None, &new, None).unwrap(),
            engine.compare(Some(&Snapshot::new()), &new, None).unwrap()
        );
    }

    #[test]
    fn test_unknown_probe_single_warning() {
        let registry = ProbeRegistry::new();
        let engine = DiffEngine::new(&registry);

        let foo = snap(&[("foo", "x")]);
        let anomalies = engine.compare(Some(&foo), &foo, None).unwrap();
        assert_eq!(anomalies.len(), 1);
        assert!(anomalies[0].is_warning());
        assert!(anomalies[0].message().contains("`foo`"));
    }

    #[test]
    fn test_filter_skips_parse_and_compare() {
        let users = LinesProbe::new("users");
        let mounts = LinesProbe::new("mounts");
        let users_calls = users.calls.clone();
        let mounts_calls = mounts.calls.clone();
        let registry = registry_with(vec![Arc::new(users), Arc::new(mounts)]);
        let engine = DiffEngine::new(&registry);

        let old = snap(&[("users", "root"), ("mounts", "/")]);
        let new = snap(&[("users", "root\neve"), ("mounts", "/\n/mnt"), ("ghost", "")]);
        let filter: ProbeFilter = ["users".to_string()].into_iter().collect();

        let anomalies = engine.compare(Some(&old), &new, Some(&filter)).unwrap();
        assert_eq!(anomalies, vec![Anomaly::change("eve added")]);
        // parse twice + compare once
        assert_eq!(users_calls.load(Ordering::SeqCst), 3);
        assert_eq!(mounts_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_anomalies_follow_task_order() {
        let registry = registry_with(vec![
            Arc::new(LinesProbe::new("a")),
            Arc::new(LinesProbe::new("b")),
        ]);
        let engine = DiffEngine::new(&registry);

        let old = snap(&[("b", ""), ("a", "")]);
        let new = snap(&[("a", "1"), ("b", "2"), ("zz", "")]);
        let anomalies = engine.compare(Some(&old), &new, None).unwrap();
        let messages: Vec<_> = anomalies.iter().map(|a| a.message().to_string()).collect();
        assert_eq!(messages[0], "2 added");
        assert_eq!(messages[1], "1 added");
        assert!(anomalies[2].is_warning());
    }

    #[test]
    fn test_contract_violation_aborts_with_partial_results() {
        let registry = registry_with(vec![
            Arc::new(LinesProbe::new("users")),
            Arc::new(BrokenProbe),
            Arc::new(LinesProbe::new("mounts")),
        ]);
        let engine = DiffEngine::new(&registry);

        let new = snap(&[("users", "eve"), ("broken", ""), ("mounts", "/mnt")]);
        let abort = engine.compare(None, &new, None).unwrap_err();

        assert_eq!(abort.probe, "broken");
        assert_eq!(abort.anomalies, vec![Anomaly::change("eve added")]);
        assert!(matches!(abort.source, Error::ProbeContract { .. }));
        assert_eq!(abort.to_string(), "comparison aborted at probe broken");
        assert!(std::error::Error::source(&abort).is_some());

        let abort = abort.after(vec![Anomaly::warning("first")]);
        assert_eq!(
            abort.anomalies,
            vec![Anomaly::warning("first"), Anomaly::change("eve added")]
        );
    }

    #[test]
    fn test_missing_new_output_aborts() {
        let registry = registry_with(vec![Arc::new(LinesProbe::new("users"))]);
        let engine = DiffEngine::new(&registry);

        let old = snap(&[("users", "root")]);
        let abort = engine.compare(Some(&old), &Snapshot::new(), None).unwrap_err();
        assert!(matches!(abort.source, Error::MissingProbeOutput { .. }));
        assert!(abort.anomalies.is_empty());
    }

    #[test]
    fn test_builtin_users_probe_reports_additions() {
        let registry = ProbeRegistry::builtin().unwrap();
        let engine = DiffEngine::new(&registry);

        let new = snap(&[("users", "alice\nbob")]);
        let anomalies = engine.compare(None, &new, None).unwrap();
        assert_eq!(anomalies.len(), 2);
        assert!(anomalies.iter().all(|a| a.is_change()));
        assert!(anomalies[0].message().contains("alice"));
        assert!(anomalies[1].message().contains("bob"));
    }
}
