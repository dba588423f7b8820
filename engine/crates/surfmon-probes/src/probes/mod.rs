//! Built-in probes
//!
//! Each probe captures one category of host state with a shell command and knows how
//! to compare two such captures.

pub mod accounts;
pub mod boot;
pub mod environment;
pub mod kernel;
pub mod network;
pub mod packages;
pub mod storage;
pub mod suid;
pub mod systemd;

use std::sync::Arc;
use surfmon_core::ProbeDescriptor;

pub use accounts::{GroupsProbe, UsersProbe};
pub use boot::BootIdProbe;
pub use environment::EnvironmentProbe;
pub use kernel::{KernelModulesProbe, KernelVersionProbe};
pub use network::ListeningSocketsProbe;
pub use packages::PackagesProbe;
pub use storage::{BlockDevicesProbe, MountsProbe};
pub use suid::SuidBinariesProbe;
pub use systemd::SystemdUnitsProbe;

/// Every built-in probe, in no particular order
pub fn builtin() -> Vec<Arc<dyn ProbeDescriptor>> {
    vec![
        Arc::new(UsersProbe),
        Arc::new(GroupsProbe),
        Arc::new(KernelModulesProbe),
        Arc::new(KernelVersionProbe),
        Arc::new(ListeningSocketsProbe),
        Arc::new(MountsProbe),
        Arc::new(BlockDevicesProbe),
        Arc::new(PackagesProbe),
        Arc::new(SuidBinariesProbe),
        Arc::new(SystemdUnitsProbe),
        Arc::new(EnvironmentProbe),
        Arc::new(BootIdProbe),
    ]
}
