//! Network probe: listening TCP/UDP sockets

use crate::records::{RecordDiff, Records};
use surfmon_core::{Anomaly, CompareResult, Probe};

/// Tracks listening sockets.
///
/// Accepts `ss -tuln` output (with or without header) and falls back to
/// `netstat -tuln` column layout.
pub struct ListeningSocketsProbe;

impl ListeningSocketsProbe {
    fn parse_line(line: &str) -> Option<(String, ())> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            return None;
        }
        let proto = parts[0].to_ascii_lowercase();
        if !(proto.starts_with("tcp") || proto.starts_with("udp")) {
            return None;
        }
        // netstat: proto recv-q send-q local foreign [state]
        // ss:      netid state recv-q send-q local peer
        let local = if parts[1].parse::<u64>().is_ok() {
            parts[3]
        } else {
            parts.get(4).copied()?
        };
        Some((format!("{} {}", proto, local), ()))
    }
}

impl Probe for ListeningSocketsProbe {
    /// Keys are "<proto> <local address:port>"
    type Parsed = Records<()>;

    fn name(&self) -> &str {
        "listening_sockets"
    }

    fn description(&self) -> &str {
        "listening TCP and UDP sockets"
    }

    fn command(&self) -> &str {
        "ss -H -tuln"
    }

    fn parse(&self, raw: &str) -> Records<()> {
        Records::from_lines(raw, Self::parse_line)
    }

    fn compare(&self, old: &Records<()>, new: &Records<()>) -> CompareResult {
        let diff = RecordDiff::between(old, new);
        let mut anomalies = Vec::new();

        for (socket, _) in &diff.added {
            anomalies.push(Anomaly::change(format!("listening socket opened: {}", socket)));
        }
        for (socket, _) in &diff.removed {
            anomalies.push(Anomaly::change(format!("listening socket closed: {}", socket)));
        }

        Ok(anomalies)
    }
}
