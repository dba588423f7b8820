//! Kernel probes: loaded modules and running kernel version

use crate::records::{first_line, RecordDiff, Records};
use surfmon_core::{Anomaly, CompareResult, Probe};

/// Tracks loaded kernel modules via /proc/modules
pub struct KernelModulesProbe;

impl Probe for KernelModulesProbe {
    /// Module name -> size in bytes as reported by the kernel
    type Parsed = Records<String>;

    fn name(&self) -> &str {
        "kernel_modules"
    }

    fn description(&self) -> &str {
        "loaded kernel modules"
    }

    fn command(&self) -> &str {
        "cat /proc/modules"
    }

    fn parse(&self, raw: &str) -> Records<String> {
        Records::from_lines(raw, |line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            // lsmod prints a header; /proc/modules does not
            if name == "Module" {
                return None;
            }
            let size = parts.next().unwrap_or_default();
            Some((name.to_string(), size.to_string()))
        })
    }

    fn compare(&self, old: &Records<String>, new: &Records<String>) -> CompareResult {
        let diff = RecordDiff::between(old, new);
        let mut anomalies = Vec::new();

        for (name, _) in &diff.added {
            anomalies.push(Anomaly::change(format!("kernel module {} loaded", name)));
        }
        for (name, _) in &diff.removed {
            anomalies.push(Anomaly::change(format!("kernel module {} unloaded", name)));
        }
        for (name, before, after) in &diff.modified {
            anomalies.push(Anomaly::debug(format!(
                "kernel module {} size changed from {} to {}",
                name, before, after
            )));
        }

        Ok(anomalies)
    }
}

/// Tracks the running kernel (uname -a)
pub struct KernelVersionProbe;

impl Probe for KernelVersionProbe {
    type Parsed = Option<String>;

    fn name(&self) -> &str {
        "kernel_version"
    }

    fn description(&self) -> &str {
        "running kernel version"
    }

    fn command(&self) -> &str {
        "uname -a"
    }

    fn parse(&self, raw: &str) -> Option<String> {
        first_line(raw)
    }

    fn compare(&self, old: &Option<String>, new: &Option<String>) -> CompareResult {
        let anomalies = match (old, new) {
            (None, Some(version)) => vec![Anomaly::debug(format!("kernel version is {}", version))],
            (Some(before), Some(after)) if before != after => vec![Anomaly::change(format!(
                "kernel changed from {} to {}",
                before, after
            ))],
            (Some(_), None) => vec![Anomaly::warning("kernel version could not be determined")],
            _ => Vec::new(),
        };
        Ok(anomalies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surfmon_core::ProbeDescriptor;

    const MODULES: &str = "ext4 999424 2 - Live 0x0000000000000000\n\
                           usbcore 344064 4 xhci_hcd, Live 0x0000000000000000\n";

    #[test]
    fn test_parse_proc_modules_and_lsmod() {
        let modules = KernelModulesProbe.parse(MODULES);
        assert_eq!(modules.get("ext4").map(String::as_str), Some("999424"));

        let lsmod = KernelModulesProbe.parse("Module Size Used by\nloop 40960 0\n");
        assert_eq!(lsmod.len(), 1);
        assert!(lsmod.contains("loop"));
    }

    #[test]
    fn test_module_load_and_unload() {
        let new = "ext4 999424 2 - Live 0x0\nnf_tables 307200 0 - Live 0x0\n";
        let anomalies = KernelModulesProbe.diff(MODULES, new).unwrap();
        assert_eq!(
            anomalies,
            vec![
                Anomaly::change("kernel module nf_tables loaded"),
                Anomaly::change("kernel module usbcore unloaded"),
            ]
        );
    }

    #[test]
    fn test_kernel_version() {
        let probe = KernelVersionProbe;
        assert_eq!(
            probe.diff("Linux h 6.1.0\n", "Linux h 6.5.0\n").unwrap(),
            vec![Anomaly::change("kernel changed from Linux h 6.1.0 to Linux h 6.5.0")]
        );
        assert!(probe.diff("Linux h 6.1.0", "Linux h 6.1.0").unwrap().is_empty());

        let first = probe.diff("", "Linux h 6.1.0").unwrap();
        assert_eq!(first.len(), 1);
        assert!(first[0].is_debug());
    }
}
