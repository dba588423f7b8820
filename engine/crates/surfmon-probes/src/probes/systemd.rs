//! systemd probe: units and their states

use crate::records::{RecordDiff, Records};
use surfmon_core::{Anomaly, CompareResult, Probe};

/// State columns of one unit from `systemctl list-units`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitState {
    pub load: String,
    pub active: String,
    pub sub: String,
}

impl std::fmt::Display for UnitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.active, self.sub)
    }
}

/// Tracks systemd units (services, sockets, timers, ...)
pub struct SystemdUnitsProbe;

impl Probe for SystemdUnitsProbe {
    type Parsed = Records<UnitState>;

    fn name(&self) -> &str {
        "systemd_units"
    }

    fn description(&self) -> &str {
        "systemd units and their load/active states"
    }

    fn command(&self) -> &str {
        "systemctl list-units --all --no-legend --plain --no-pager"
    }

    fn parse(&self, raw: &str) -> Records<UnitState> {
        Records::from_lines(raw, |line| {
            // Failed units are prefixed with a bullet unless --plain is honoured
            let line = line.trim_start_matches(['●', '*']).trim_start();
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 || parts[0] == "UNIT" {
                return None;
            }
            Some((
                parts[0].to_string(),
                UnitState {
                    load: parts[1].to_string(),
                    active: parts[2].to_string(),
                    sub: parts[3].to_string(),
                },
            ))
        })
    }

    fn compare(&self, old: &Records<UnitState>, new: &Records<UnitState>) -> CompareResult {
        let diff = RecordDiff::between(old, new);
        let mut anomalies = Vec::new();

        for (unit, state) in &diff.added {
            anomalies.push(Anomaly::change(format!("unit {} added ({})", unit, state)));
        }
        for (unit, _) in &diff.removed {
            anomalies.push(Anomaly::change(format!("unit {} removed", unit)));
        }
        for (unit, before, after) in &diff.modified {
            if before.load != after.load {
                anomalies.push(Anomaly::change(format!(
                    "unit {} load state changed from {} to {}",
                    unit, before.load, after.load
                )));
            }
            if before.active != after.active || before.sub != after.sub {
                anomalies.push(Anomaly::change(format!(
                    "unit {} changed from {} to {}",
                    unit, before, after
                )));
            }
        }

        Ok(anomalies)
    }
}
