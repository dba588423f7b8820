//! Package probe: installed Debian packages

use crate::records::{RecordDiff, Records};
use surfmon_core::{Anomaly, CompareResult, Probe};

/// Tracks installed packages and their versions
pub struct PackagesProbe;

impl Probe for PackagesProbe {
    /// Package name -> version
    type Parsed = Records<String>;

    fn name(&self) -> &str {
        "packages"
    }

    fn description(&self) -> &str {
        "installed packages and versions"
    }

    fn command(&self) -> &str {
        "dpkg-query -W -f '${Package} ${Version}\\n'"
    }

    fn parse(&self, raw: &str) -> Records<String> {
        Records::from_lines(raw, |line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            let version = parts.next().unwrap_or_default();
            Some((name.to_string(), version.to_string()))
        })
    }

    fn compare(&self, old: &Records<String>, new: &Records<String>) -> CompareResult {
        let diff = RecordDiff::between(old, new);
        let mut anomalies = Vec::new();

        for (name, version) in &diff.added {
            anomalies.push(Anomaly::change(format!(
                "package {} {} installed",
                name, version
            )));
        }
        for (name, version) in &diff.removed {
            anomalies.push(Anomaly::change(format!(
                "package {} {} removed",
                name, version
            )));
        }
        for (name, before, after) in &diff.modified {
            anomalies.push(Anomaly::change(format!(
                "package {} changed from {} to {}",
                name, before, after
            )));
        }

        Ok(anomalies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surfmon_core::ProbeDescriptor;

    #[test]
    fn test_package_changes() {
        let old = "openssh-server 1:9.2p1-2\nnetcat 1.10-47\n";
        let new = "openssh-server 1:9.2p1-2+deb12u3\nnmap 7.93\n";
        let anomalies = PackagesProbe.diff(old, new).unwrap();
        assert_eq!(
            anomalies,
            vec![
                Anomaly::change("package nmap 7.93 installed"),
                Anomaly::change("package netcat 1.10-47 removed"),
                Anomaly::change(
                    "package openssh-server changed from 1:9.2p1-2 to 1:9.2p1-2+deb12u3"
                ),
            ]
        );
    }
}
