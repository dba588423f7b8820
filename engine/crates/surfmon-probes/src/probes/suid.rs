//! SUID probe: setuid executables on the root filesystem

use crate::records::{RecordDiff, Records};
use surfmon_core::{Anomaly, CompareResult, Probe};

pub struct SuidBinariesProbe;

impl Probe for SuidBinariesProbe {
    /// Set of absolute paths
    type Parsed = Records<()>;

    fn name(&self) -> &str {
        "suid_binaries"
    }

    fn description(&self) -> &str {
        "setuid executables on local filesystems"
    }

    fn command(&self) -> &str {
        "find / -xdev -perm -4000 -type f 2>/dev/null"
    }

    fn parse(&self, raw: &str) -> Records<()> {
        Records::from_lines(raw, |line| {
            line.starts_with('/').then(|| (line.to_string(), ()))
        })
    }

    fn compare(&self, old: &Records<()>, new: &Records<()>) -> CompareResult {
        let diff = RecordDiff::between(old, new);
        let mut anomalies = Vec::new();

        for (path, _) in &diff.added {
            anomalies.push(Anomaly::change(format!("suid binary {} added", path)));
        }
        for (path, _) in &diff.removed {
            anomalies.push(Anomaly::change(format!("suid binary {} removed", path)));
        }

        Ok(anomalies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surfmon_core::ProbeDescriptor;

    #[test]
    fn test_suid_changes_ignore_noise() {
        let old = "/usr/bin/passwd\n/usr/bin/su\n";
        let new = "find: '/proc/1': Permission denied\n/usr/bin/passwd\n/tmp/.x/sh\n";
        let anomalies = SuidBinariesProbe.diff(old, new).unwrap();
        assert_eq!(
            anomalies,
            vec![
                Anomaly::change("suid binary /tmp/.x/sh added"),
                Anomaly::change("suid binary /usr/bin/su removed"),
            ]
        );
    }
}
