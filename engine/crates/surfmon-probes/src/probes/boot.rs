//! Boot probe: detects reboots between snapshots

use crate::records::first_line;
use surfmon_core::{Anomaly, CompareResult, Probe};

/// Tracks the kernel boot id, which changes on every boot
pub struct BootIdProbe;

impl Probe for BootIdProbe {
    type Parsed = Option<String>;

    fn name(&self) -> &str {
        "boot_id"
    }

    fn description(&self) -> &str {
        "kernel boot id, changes on every reboot"
    }

    fn command(&self) -> &str {
        "cat /proc/sys/kernel/random/boot_id"
    }

    fn parse(&self, raw: &str) -> Option<String> {
        first_line(raw)
    }

    fn compare(&self, old: &Option<String>, new: &Option<String>) -> CompareResult {
        let anomalies = match (old, new) {
            (Some(before), Some(after)) if before != after => {
                vec![Anomaly::change("system was rebooted")]
            }
            (None, Some(id)) => vec![Anomaly::debug(format!("boot id is {}", id))],
            _ => Vec::new(),
        };
        Ok(anomalies)
    }
}
