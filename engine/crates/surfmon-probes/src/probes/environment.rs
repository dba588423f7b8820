//! Environment probe: variables of the collecting process

use crate::records::{RecordDiff, Records};
use surfmon_core::{Anomaly, CompareResult, Probe};

/// Tracks environment variables. Differences are reported as debug output since they
/// mostly reflect how the tool was invoked.
pub struct EnvironmentProbe;

impl Probe for EnvironmentProbe {
    type Parsed = Records<String>;

    fn name(&self) -> &str {
        "environment"
    }

    fn description(&self) -> &str {
        "environment variables of the collecting shell"
    }

    fn command(&self) -> &str {
        "env"
    }

    fn parse(&self, raw: &str) -> Records<String> {
        Records::from_lines(raw, |line| {
            let (key, value) = line.split_once('=')?;
            if key.is_empty() || key.contains(char::is_whitespace) {
                return None;
            }
            Some((key.to_string(), value.to_string()))
        })
    }

    fn compare(&self, old: &Records<String>, new: &Records<String>) -> CompareResult {
        let diff = RecordDiff::between(old, new);
        let mut anomalies = Vec::new();

        for (key, value) in &diff.added {
            anomalies.push(Anomaly::debug(format!(
                "environment variable {} set to {}",
                key, value
            )));
        }
        for (key, _) in &diff.removed {
            anomalies.push(Anomaly::debug(format!("environment variable {} unset", key)));
        }
        for (key, before, after) in &diff.modified {
            anomalies.push(Anomaly::debug(format!(
                "environment variable {} changed from {} to {}",
                key, before, after
            )));
        }

        Ok(anomalies)
    }
}
