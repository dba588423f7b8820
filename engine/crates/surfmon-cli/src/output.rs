//! Report and listing output

use colored::*;
use std::sync::Arc;
use surfmon_core::{AnomalyKind, ProbeDescriptor};
use surfmon_engine::Report;
use surfmon_store::CacheEntry;

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Renders reports as text lines, optionally coloured
#[derive(Debug, Clone, Copy, Default)]
pub struct Printer {
    pub color: bool,
    pub show_debug: bool,
}

impl Printer {
    fn paint(&self, text: String, color: Color) -> String {
        if self.color {
            text.as_str().color(color).to_string()
        } else {
            text
        }
    }

    /// Headline, then warnings, changes and (if enabled) debug messages
    pub fn report_lines(&self, report: &Report) -> Vec<String> {
        let changes = report.count(AnomalyKind::Change);
        let warnings = report.count(AnomalyKind::Warning);
        let debugs = if self.show_debug {
            report.count(AnomalyKind::Debug)
        } else {
            0
        };

        let debug_part = if debugs > 0 {
            format!(" and {} debug message{}", debugs, plural(debugs))
        } else {
            String::new()
        };
        let mut lines = vec![self.paint(
            format!(
                "{} change{} detected ({} warning{}{})",
                changes,
                plural(changes),
                warnings,
                plural(warnings),
                debug_part
            ),
            Color::Green,
        )];

        for a in report.of_kind(AnomalyKind::Warning) {
            lines.push(self.paint(format!("! {}", a.message()), Color::Red));
        }
        for a in report.of_kind(AnomalyKind::Change) {
            lines.push(self.paint(format!("+ {}", a.message()), Color::Cyan));
        }
        if self.show_debug {
            for a in report.of_kind(AnomalyKind::Debug) {
                lines.push(self.paint(format!("- {}", a.message()), Color::Blue));
            }
        }
        lines
    }

    pub fn print_report(&self, report: &Report) {
        for line in self.report_lines(report) {
            println!("{}", line);
        }
    }
}

pub fn entry_lines(entries: &[CacheEntry]) -> Vec<String> {
    let mut lines = vec![String::from("  ID\tTIMESTAMP")];
    lines.extend(
        entries
            .iter()
            .map(|e| format!("{:4}\t{}", e.id, e.timestamp.to_rfc3339())),
    );
    lines
}

pub fn probe_lines(probes: &[Arc<dyn ProbeDescriptor>]) -> Vec<String> {
    let width = probes.iter().map(|p| p.name().len()).max().unwrap_or(0);
    probes
        .iter()
        .map(|p| format!("{:width$}  {}", p.name(), p.description(), width = width))
        .collect()
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}
