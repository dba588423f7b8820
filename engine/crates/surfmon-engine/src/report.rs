//! Result of one analysis or comparison

use surfmon_core::{Anomaly, AnomalyKind};

/// Ordered anomalies of one run, plus what happened to the new snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub anomalies: Vec<Anomaly>,
    /// Id the new snapshot was stored under, if it was cached
    pub cached_as: Option<u64>,
}

impl Report {
    pub fn new(anomalies: Vec<Anomaly>) -> Self {
        Self {
            anomalies,
            cached_as: None,
        }
    }

    /// Anomalies of one kind, in report order
    pub fn of_kind(&self, kind: AnomalyKind) -> impl Iterator<Item = &Anomaly> {
        self.anomalies.iter().filter(move |a| a.kind() == kind)
    }

    pub fn count(&self, kind: AnomalyKind) -> usize {
        self.of_kind(kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_keeps_relative_order() {
        let report = Report::new(vec![
            Anomaly::change("c1"),
            Anomaly::warning("w1"),
            Anomaly::change("c2"),
            Anomaly::debug("d1"),
            Anomaly::warning("w2"),
        ]);

        let changes: Vec<_> = report.of_kind(AnomalyKind::Change).map(|a| a.message()).collect();
        let warnings: Vec<_> = report.of_kind(AnomalyKind::Warning).map(|a| a.message()).collect();
        assert_eq!(changes, vec!["c1", "c2"]);
        assert_eq!(warnings, vec!["w1", "w2"]);
        assert_eq!(report.count(AnomalyKind::Debug), 1);
    }
}
