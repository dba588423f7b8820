//! Local command execution for probe captures

use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;
use surfmon_core::{Error, ProbeDescriptor, Result, Snapshot};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Produces a snapshot for a set of probes
pub trait Collector {
    /// Capture every probe, in the given order. A probe that fails to run is recorded
    /// with whatever stdout it produced (possibly nothing).
    fn collect(&self, probes: &[Arc<dyn ProbeDescriptor>]) -> Result<Snapshot>;
}

/// Runs probe commands on this host through a shell
#[derive(Debug, Clone)]
pub struct LocalCollector {
    shell: String,
}

impl LocalCollector {
    pub fn new() -> Self {
        Self {
            shell: String::from("/bin/sh"),
        }
    }

    /// Use a different shell binary (invoked as `<shell> -c <command>`)
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    fn run(&self, probe: &dyn ProbeDescriptor, workdir: &Path) -> String {
        let command = probe.command();
        debug!("Running probe {}: {}", probe.name(), command);

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(o) => {
                if !o.status.success() {
                    warn!(
                        "Probe {} exited with {}: {}",
                        probe.name(),
                        o.status,
                        String::from_utf8_lossy(&o.stderr).trim()
                    );
                }
                String::from_utf8_lossy(&o.stdout).into_owned()
            }
            Err(e) => {
                warn!("Failed to run probe {}: {}", probe.name(), e);
                String::new()
            }
        }
    }
}

impl Default for LocalCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for LocalCollector {
    fn collect(&self, probes: &[Arc<dyn ProbeDescriptor>]) -> Result<Snapshot> {
        // Commands run in a scratch directory that is removed afterwards
        let workdir = TempDir::new()
            .map_err(|e| Error::Collection(format!("Failed to create work directory: {}", e)))?;

        info!("Collecting {} probes", probes.len());
        let mut snapshot = Snapshot::new();
        for probe in probes {
            let raw = self.run(probe.as_ref(), workdir.path());
            snapshot.insert(probe.name(), raw);
        }

        Ok(snapshot)
    }
}
