//! User and group account probes (/etc/passwd, /etc/group)

use crate::records::{RecordDiff, Records};
use surfmon_core::{Anomaly, CompareResult, Probe};

/// One /etc/passwd entry. Missing fields parse as empty strings so that bare
/// user names are still tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserEntry {
    pub uid: String,
    pub gid: String,
    pub home: String,
    pub shell: String,
}

/// Tracks local user accounts
pub struct UsersProbe;

impl Probe for UsersProbe {
    type Parsed = Records<UserEntry>;

    fn name(&self) -> &str {
        "users"
    }

    fn description(&self) -> &str {
        "local user accounts from /etc/passwd"
    }

    fn command(&self) -> &str {
        "cat /etc/passwd"
    }

    fn parse(&self, raw: &str) -> Records<UserEntry> {
        Records::from_lines(raw, |line| {
            if line.starts_with('#') {
                return None;
            }
            let parts: Vec<&str> = line.split(':').collect();
            let name = parts[0].trim();
            if name.is_empty() {
                return None;
            }
            let field = |i: usize| parts.get(i).map(|s| s.to_string()).unwrap_or_default();
            Some((
                name.to_string(),
                UserEntry {
                    uid: field(2),
                    gid: field(3),
                    home: field(5),
                    shell: field(6),
                },
            ))
        })
    }

    fn compare(&self, old: &Records<UserEntry>, new: &Records<UserEntry>) -> CompareResult {
        let diff = RecordDiff::between(old, new);
        let mut anomalies = Vec::new();

        for (name, _) in &diff.added {
            anomalies.push(Anomaly::change(format!("user {} added", name)));
        }
        for (name, _) in &diff.removed {
            anomalies.push(Anomaly::change(format!("user {} removed", name)));
        }
        for (name, before, after) in &diff.modified {
            let fields = [
                ("uid", &before.uid, &after.uid),
                ("gid", &before.gid, &after.gid),
                ("home directory", &before.home, &after.home),
                ("shell", &before.shell, &after.shell),
            ];
            for (label, from, to) in fields {
                if from != to {
                    anomalies.push(Anomaly::change(format!(
                        "{} of user {} changed from {} to {}",
                        label, name, from, to
                    )));
                }
            }
        }

        Ok(anomalies)
    }
}

/// One /etc/group entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupEntry {
    pub gid: String,
    pub members: Vec<String>,
}

/// Tracks local groups and their membership
pub struct GroupsProbe;

impl Probe for GroupsProbe {
    type Parsed = Records<GroupEntry>;

    fn name(&self) -> &str {
        "groups"
    }

    fn description(&self) -> &str {
        "local groups and members from /etc/group"
    }

    fn command(&self) -> &str {
        "cat /etc/group"
    }

    fn parse(&self, raw: &str) -> Records<GroupEntry> {
        Records::from_lines(raw, |line| {
            if line.starts_with('#') {
                return None;
            }
            let parts: Vec<&str> = line.split(':').collect();
            let name = parts[0].trim();
            if name.is_empty() {
                return None;
            }
            let members = parts
                .get(3)
                .map(|m| {
                    m.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default();
            Some((
                name.to_string(),
                GroupEntry {
                    gid: parts.get(2).map(|s| s.to_string()).unwrap_or_default(),
                    members,
                },
            ))
        })
    }

    fn compare(&self, old: &Records<GroupEntry>, new: &Records<GroupEntry>) -> CompareResult {
        let diff = RecordDiff::between(old, new);
        let mut anomalies = Vec::new();

        for (name, entry) in &diff.added {
            if entry.members.is_empty() {
                anomalies.push(Anomaly::change(format!("group {} added", name)));
            } else {
                anomalies.push(Anomaly::change(format!(
                    "group {} added with members {}",
                    name,
                    entry.members.join(", ")
                )));
            }
        }
        for (name, _) in &diff.removed {
            anomalies.push(Anomaly::change(format!("group {} removed", name)));
        }
        for (name, before, after) in &diff.modified {
            if before.gid != after.gid {
                anomalies.push(Anomaly::change(format!(
                    "gid of group {} changed from {} to {}",
                    name, before.gid, after.gid
                )));
            }
            for member in after.members.iter().filter(|m| !before.members.contains(m)) {
                anomalies.push(Anomaly::change(format!(
                    "user {} added to group {}",
                    member, name
                )));
            }
            for member in before.members.iter().filter(|m| !after.members.contains(m)) {
                anomalies.push(Anomaly::change(format!(
                    "user {} removed from group {}",
                    member, name
                )));
            }
        }

        Ok(anomalies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surfmon_core::ProbeDescriptor;

    const PASSWD: &str = "root:x:0:0:root:/root:/bin/bash\n\
                          daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin\n";

    #[test]
    fn test_parse_passwd() {
        let users = UsersProbe.parse(PASSWD);
        assert_eq!(users.len(), 2);
        let root = users.get("root").unwrap();
        assert_eq!(root.uid, "0");
        assert_eq!(root.shell, "/bin/bash");
    }

    #[test]
    fn test_bare_names_reported_in_order() {
        let anomalies = UsersProbe.diff("", "alice\nbob").unwrap();
        assert_eq!(
            anomalies,
            vec![
                Anomaly::change("user alice added"),
                Anomaly::change("user bob added"),
            ]
        );
    }

    #[test]
    fn test_user_changes() {
        let new = "root:x:0:0:root:/root:/bin/sh\n\
                   mallory:x:0:0::/tmp:/bin/bash\n";
        let anomalies = UsersProbe.diff(PASSWD, new).unwrap();
        assert_eq!(
            anomalies,
            vec![
                Anomaly::change("user mallory added"),
                Anomaly::change("user daemon removed"),
                Anomaly::change("shell of user root changed from /bin/bash to /bin/sh"),
            ]
        );
    }

    #[test]
    fn test_group_membership_changes() {
        let old = "sudo:x:27:alice\nadm:x:4:\n";
        let new = "sudo:x:27:alice,mallory\ndocker:x:999:bob\n";
        let anomalies = GroupsProbe.diff(old, new).unwrap();
        assert_eq!(
            anomalies,
            vec![
                Anomaly::change("group docker added with members bob"),
                Anomaly::change("group adm removed"),
                Anomaly::change("user mallory added to group sudo"),
            ]
        );
    }

    #[test]
    fn test_unchanged_is_quiet() {
        assert!(UsersProbe.diff(PASSWD, PASSWD).unwrap().is_empty());
        assert!(GroupsProbe.diff("a:x:1:b", "a:x:1:b").unwrap().is_empty());
    }
}
