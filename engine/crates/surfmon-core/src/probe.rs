//! Probe trait - the interface all attack-surface probes implement

use crate::anomaly::Anomaly;
use crate::error::Result;

/// Result of comparing two parsed captures.
///
/// `Err` means the probe broke its own contract; the diff engine aborts the whole
/// comparison when it sees one.
pub type CompareResult = Result<Vec<Anomaly>>;

/// A typed probe: knows how to turn its raw capture into a structured value and how
/// to compare two such values.
pub trait Probe: Send + Sync {
    /// Structured form of one capture
    type Parsed;

    /// Unique name, also the key used in snapshots (e.g. "kernel_modules")
    fn name(&self) -> &str;

    /// One-line summary shown when listing probes
    fn description(&self) -> &str;

    /// Shell command whose stdout is the raw capture
    fn command(&self) -> &str;

    /// Parse a raw capture. An empty string is a valid capture meaning "nothing yet".
    fn parse(&self, raw: &str) -> Self::Parsed;

    /// Compare an older parsed capture with a newer one, in a stable order
    fn compare(&self, old: &Self::Parsed, new: &Self::Parsed) -> CompareResult;
}

/// Object-safe view of a probe, used by the registry and the diff engine.
///
/// Every [`Probe`] gets this for free; the parsed type never leaves the probe.
pub trait ProbeDescriptor: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn command(&self) -> &str;

    /// Parse both raw captures independently and compare them
    fn diff(&self, old_raw: &str, new_raw: &str) -> CompareResult;
}

impl<P: Probe> ProbeDescriptor for P {
    fn name(&self) -> &str {
        Probe::name(self)
    }

    fn description(&self) -> &str {
        Probe::description(self)
    }

    fn command(&self) -> &str {
        Probe::command(self)
    }

    fn diff(&self, old_raw: &str, new_raw: &str) -> CompareResult {
        let old = self.parse(old_raw);
        let new = self.parse(new_raw);
        self.compare(&old, &new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LineCount;

    impl Probe for LineCount {
        type Parsed = usize;

        fn name(&self) -> &str {
            "line_count"
        }

        fn description(&self) -> &str {
            "number of lines"
        }

        fn command(&self) -> &str {
            "wc -l"
        }

        fn parse(&self, raw: &str) -> usize {
            raw.lines().count()
        }

        fn compare(&self, old: &usize, new: &usize) -> CompareResult {
            if old == new {
                Ok(vec![])
            } else {
                Ok(vec![Anomaly::change(format!("{} -> {}", old, new))])
            }
        }
    }

    #[test]
    fn test_descriptor_parses_both_sides() {
        let probe: &dyn ProbeDescriptor = &LineCount;
        assert_eq!(probe.name(), "line_count");

        let anomalies = probe.diff("", "a\nb").unwrap();
        assert_eq!(anomalies, vec![Anomaly::change("0 -> 2")]);
        assert!(probe.diff("a", "b").unwrap().is_empty());
    }
}
