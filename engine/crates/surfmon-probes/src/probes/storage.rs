//! Storage probes: mount points and block devices

use crate::records::{RecordDiff, Records};
use surfmon_core::{Anomaly, CompareResult, Probe};

/// One mount from /proc/mounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device: String,
    pub fs_type: String,
    pub options: String,
}

/// Tracks mounted filesystems, keyed by mount point
pub struct MountsProbe;

impl Probe for MountsProbe {
    type Parsed = Records<MountEntry>;

    fn name(&self) -> &str {
        "mounts"
    }

    fn description(&self) -> &str {
        "mounted filesystems and their options"
    }

    fn command(&self) -> &str {
        "cat /proc/mounts"
    }

    fn parse(&self, raw: &str) -> Records<MountEntry> {
        Records::from_lines(raw, |line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 {
                return None;
            }
            Some((
                parts[1].to_string(),
                MountEntry {
                    device: parts[0].to_string(),
                    fs_type: parts[2].to_string(),
                    options: parts.get(3).copied().unwrap_or_default().to_string(),
                },
            ))
        })
    }

    fn compare(&self, old: &Records<MountEntry>, new: &Records<MountEntry>) -> CompareResult {
        let diff = RecordDiff::between(old, new);
        let mut anomalies = Vec::new();

        for (point, entry) in &diff.added {
            anomalies.push(Anomaly::change(format!(
                "{} mounted on {} ({}, {})",
                entry.device, point, entry.fs_type, entry.options
            )));
        }
        for (point, entry) in &diff.removed {
            anomalies.push(Anomaly::change(format!(
                "{} unmounted from {}",
                entry.device, point
            )));
        }
        for (point, before, after) in &diff.modified {
            if before.device != after.device || before.fs_type != after.fs_type {
                anomalies.push(Anomaly::change(format!(
                    "mount on {} changed from {} ({}) to {} ({})",
                    point, before.device, before.fs_type, after.device, after.fs_type
                )));
            }
            if before.options != after.options {
                anomalies.push(Anomaly::change(format!(
                    "mount options of {} changed from {} to {}",
                    point, before.options, after.options
                )));
            }
        }

        Ok(anomalies)
    }
}

/// One block device from lsblk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDevice {
    pub kind: String,
    pub size: String,
}

/// Tracks attached block devices
pub struct BlockDevicesProbe;

impl Probe for BlockDevicesProbe {
    type Parsed = Records<BlockDevice>;

    fn name(&self) -> &str {
        "block_devices"
    }

    fn description(&self) -> &str {
        "attached block devices"
    }

    fn command(&self) -> &str {
        "lsblk -rn -o NAME,TYPE,SIZE"
    }

    fn parse(&self, raw: &str) -> Records<BlockDevice> {
        Records::from_lines(raw, |line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                return None;
            }
            Some((
                parts[0].to_string(),
                BlockDevice {
                    kind: parts[1].to_string(),
                    size: parts.get(2).copied().unwrap_or_default().to_string(),
                },
            ))
        })
    }

    fn compare(&self, old: &Records<BlockDevice>, new: &Records<BlockDevice>) -> CompareResult {
        let diff = RecordDiff::between(old, new);
        let mut anomalies = Vec::new();

        for (name, dev) in &diff.added {
            anomalies.push(Anomaly::change(format!(
                "block device {} attached ({}, {})",
                name, dev.kind, dev.size
            )));
        }
        for (name, _) in &diff.removed {
            anomalies.push(Anomaly::change(format!("block device {} detached", name)));
        }
        for (name, before, after) in &diff.modified {
            anomalies.push(Anomaly::change(format!(
                "block device {} changed from {} {} to {} {}",
                name, before.kind, before.size, after.kind, after.size
            )));
        }

        Ok(anomalies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surfmon_core::ProbeDescriptor;

    const MOUNTS: &str = "/dev/sda1 / ext4 rw,relatime 0 0\n\
                          tmpfs /tmp tmpfs rw,nosuid,nodev 0 0\n";

    #[test]
    fn test_mount_added_and_options_changed() {
        let new = "/dev/sda1 / ext4 rw,relatime 0 0\n\
                   tmpfs /tmp tmpfs rw,nodev 0 0\n\
                   /dev/sdb1 /mnt vfat rw 0 0\n";
        let anomalies = MountsProbe.diff(MOUNTS, new).unwrap();
        assert_eq!(
            anomalies,
            vec![
                Anomaly::change("/dev/sdb1 mounted on /mnt (vfat, rw)"),
                Anomaly::change(
                    "mount options of /tmp changed from rw,nosuid,nodev to rw,nodev"
                ),
            ]
        );
    }

    #[test]
    fn test_unmount() {
        let anomalies = MountsProbe.diff(MOUNTS, "/dev/sda1 / ext4 rw,relatime 0 0").unwrap();
        assert_eq!(anomalies, vec![Anomaly::change("tmpfs unmounted from /tmp")]);
    }

    #[test]
    fn test_block_devices() {
        let old = "sda disk 100G\nsda1 part 100G\n";
        let new = "sda disk 100G\nsda1 part 100G\nsdb disk 16G\n";
        assert_eq!(
            BlockDevicesProbe.diff(old, new).unwrap(),
            vec![Anomaly::change("block device sdb attached (disk, 16G)")]
        );
        assert_eq!(
            BlockDevicesProbe.diff(new, old).unwrap(),
            vec![Anomaly::change("block device sdb detached")]
        );
    }
}
